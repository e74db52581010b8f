//! Paradigm expander (component E): the four small operations that turn
//! a stem + paradigm id into the other stem variants, the endings those
//! variants accept, and the annotated display form.

use crate::errors::AnalysisError;
use crate::morph::forms::Stem;

use super::tables::{
    AnnotationTable, EndGroupId, EndGroupTable, EndingId, EndingTable, FormId, HyphenationClassId,
    ParadigmId, ParadigmTable, PhoneticClassId,
};

/// Replaces the suffix of `stem` whose length equals
/// `paradigms[paradigm_id].0[from_slot].stem_delta.len()` with
/// `paradigms[paradigm_id].0[to_slot].stem_delta`.
///
/// Returns `Err(AnalysisError::BadParadigmSlot)` if either slot is out of
/// range, or `Ok(None)` if `stem` is too short to carry the `from_slot`
/// delta -- "not this paradigm", not an error.
pub fn rewrite_stem(
    paradigms: &ParadigmTable,
    paradigm_id: ParadigmId,
    from_slot: usize,
    to_slot: usize,
    stem: &str,
) -> Result<Option<Stem>, AnalysisError> {
    let row = paradigms
        .row(paradigm_id)
        .ok_or(AnalysisError::BadParadigmSlot {
            paradigm_id,
            slot: from_slot as u16,
        })?;
    let from = row.0.get(from_slot).ok_or(AnalysisError::BadParadigmSlot {
        paradigm_id,
        slot: from_slot as u16,
    })?;
    let to = row.0.get(to_slot).ok_or(AnalysisError::BadParadigmSlot {
        paradigm_id,
        slot: to_slot as u16,
    })?;

    let strip = from.stem_delta.chars().count();
    let stem_chars: Vec<char> = stem.chars().collect();
    if stem_chars.len() < strip {
        return Ok(None);
    }

    let mut out: String = stem_chars[..stem_chars.len() - strip].iter().collect();
    out.push_str(&to.stem_delta);
    Ok(Some(Stem::from(out.as_str())))
}

/// Walks `endgroup_data[endgroup_id]` looking for a row whose ending id
/// is `ending_id` and whose form-id run contains `form_id`.
pub fn endgroup_accepts(
    groups: &EndGroupTable,
    endgroup_id: EndGroupId,
    ending_id: EndingId,
    form_id: FormId,
) -> bool {
    let Some(entry) = groups.get(endgroup_id) else {
        return false;
    };
    entry
        .rows
        .iter()
        .any(|(eid, forms)| *eid == ending_id && forms.contains(&form_id))
}

/// Collects all `(ending_id, ending_string)` pairs licensed for
/// `form_id` within `endgroup_id`.
pub fn enumerate_endings<'a>(
    groups: &EndGroupTable,
    endings: &'a EndingTable,
    endgroup_id: EndGroupId,
    form_id: FormId,
) -> Vec<(EndingId, &'a str)> {
    let Some(entry) = groups.get(endgroup_id) else {
        return Vec::new();
    };
    entry
        .rows
        .iter()
        .filter(|(_, forms)| forms.contains(&form_id))
        .filter_map(|(eid, _)| endings.get(*eid).map(|s| (*eid, s.as_str())))
        .collect()
}

/// Which annotation tables to apply: two independent flags, hyphenation
/// markers and phonetic markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnnotationFlags {
    pub hyphenation: bool,
    pub phonetic: bool,
}

impl AnnotationFlags {
    pub const NONE: AnnotationFlags = AnnotationFlags {
        hyphenation: false,
        phonetic: false,
    };
    pub const HYPHENATION: AnnotationFlags = AnnotationFlags {
        hyphenation: true,
        phonetic: false,
    };
    pub const PHONETIC: AnnotationFlags = AnnotationFlags {
        hyphenation: false,
        phonetic: true,
    };
}

/// Applies the flagged annotation tables' markers at their recorded
/// positions, producing the annotated display form.
pub fn annotate(
    hyphenation: &AnnotationTable,
    phonetic: &AnnotationTable,
    stem: &str,
    hyphenation_class_id: HyphenationClassId,
    phonetic_class_id: PhoneticClassId,
    flags: AnnotationFlags,
) -> String {
    let mut inserts: Vec<(u16, char)> = Vec::new();

    if flags.hyphenation {
        if let Some(a) = hyphenation.get(hyphenation_class_id) {
            inserts.extend(a.0.iter().copied());
        }
    }
    if flags.phonetic {
        if let Some(a) = phonetic.get(phonetic_class_id) {
            inserts.extend(a.0.iter().copied());
        }
    }

    if inserts.is_empty() {
        return stem.to_string();
    }
    inserts.sort_by_key(|(pos, _)| *pos);

    let chars: Vec<char> = stem.chars().collect();
    let mut out = String::with_capacity(stem.len() + inserts.len());
    let mut next_insert = inserts.iter().peekable();

    for (i, c) in chars.iter().enumerate() {
        while let Some((pos, marker)) = next_insert.peek() {
            if *pos as usize == i {
                out.push(*marker);
                next_insert.next();
            } else {
                break;
            }
        }
        out.push(*c);
    }
    while let Some((pos, marker)) = next_insert.peek() {
        if *pos as usize >= chars.len() {
            out.push(*marker);
            next_insert.next();
        } else {
            break;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::tables::{EndGroupEntry, ParadigmCell, ParadigmRow};
    use smallvec::smallvec;

    fn sample_paradigms() -> ParadigmTable {
        ParadigmTable(vec![ParadigmRow(vec![
            ParadigmCell {
                end_group: 0,
                stem_delta: "a".into(),
            },
            ParadigmCell {
                end_group: 1,
                stem_delta: "u".into(),
            },
        ])])
    }

    #[test]
    fn rewrite_stem_swaps_recorded_suffix() {
        let paradigms = sample_paradigms();
        let result = rewrite_stem(&paradigms, 0, 0, 1, "kala").unwrap();
        assert_eq!(result.as_deref(), Some("kalu"));
    }

    #[test]
    fn rewrite_stem_rejects_too_short_input() {
        let paradigms = sample_paradigms();
        let result = rewrite_stem(&paradigms, 0, 0, 1, "").unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn endgroup_accepts_checks_form_membership() {
        let groups = EndGroupTable(vec![EndGroupEntry {
            rows: vec![(5, smallvec![10, 11]), (6, smallvec![12])],
        }]);
        assert!(endgroup_accepts(&groups, 0, 5, 11));
        assert!(!endgroup_accepts(&groups, 0, 5, 12));
        assert!(!endgroup_accepts(&groups, 0, 7, 10));
    }

    #[test]
    fn enumerate_endings_collects_matching_rows() {
        let groups = EndGroupTable(vec![EndGroupEntry {
            rows: vec![(1, smallvec![100]), (2, smallvec![100, 200])],
        }]);
        let endings = EndingTable(vec!["".into(), "le".into(), "ga".into()]);
        let mut found = enumerate_endings(&groups, &endings, 0, 100);
        found.sort();
        assert_eq!(found, vec![(1, "le"), (2, "ga")]);
    }

    #[test]
    fn annotate_inserts_markers_at_recorded_positions() {
        use crate::lexicon::tables::Annotation;
        let hyphenation = AnnotationTable(vec![Annotation(vec![(2, '-')])]);
        let phonetic = AnnotationTable(vec![Annotation::default()]);
        let out = annotate(
            &hyphenation,
            &phonetic,
            "kassi",
            0,
            0,
            AnnotationFlags::HYPHENATION,
        );
        assert_eq!(out, "ka-ssi");
    }
}
