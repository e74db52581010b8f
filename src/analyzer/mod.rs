//! Word analyser (component F): decomposes `word = prefix* + stem +
//! suffix* + ending + clitic` against a loaded lexicon.

pub mod cap_pattern;
pub mod guesser;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::errors::AnalysisError;
use crate::lexicon::paradigm::{self, AnnotationFlags};
use crate::lexicon::stem_search::StemLookup;
use crate::lexicon::tables::{EndingId, FormId, ParadigmId, MAX_SUFFIX_CHAIN};
use crate::lexicon::{ByteSource, Lexicon};
use crate::morph::forms::{FormName, PartOfSpeech, Stem};

use cap_pattern::CapPattern;

/// Where an analysis came from; the guesser's three origins stay
/// distinct end to end because the synthesiser's `*`-form expansion
/// branches on which one produced a candidate paradigm (open question 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Dictionary,
    UserDictionary,
    GuesserSuffix,
    GuesserAnalogy,
    GuesserCompound,
    /// Not an error: an empty-handed result when nothing matched at all.
    Unknown,
}

/// One reading of a word.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub stem: Stem,
    pub ending: EndingId,
    pub ending_string: String,
    pub clitic: Option<String>,
    pub pos: PartOfSpeech,
    pub form: FormName,
    pub paradigm_id: ParadigmId,
    pub within_paradigm_index: u16,
    pub origin: Origin,
}

impl Analysis {
    /// Surface form this analysis would produce: stem + ending + clitic,
    /// case-restored by `pattern`.
    pub fn surface(&self, pattern: CapPattern) -> String {
        let mut out = format!("{}{}", self.stem, self.ending_string);
        if let Some(clitic) = &self.clitic {
            out.push_str(clitic);
        }
        pattern.apply(&out)
    }
}

/// A possibly-empty bag of readings for one word, ordered by
/// `(paradigm_id, within_paradigm_index, ending_id, form)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisSet(pub Vec<Analysis>);

impl AnalysisSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn sort(&mut self) {
        self.0.sort_by(|a, b| {
            (a.paradigm_id, a.within_paradigm_index, a.ending, &a.form).cmp(&(
                b.paradigm_id,
                b.within_paradigm_index,
                b.ending,
                &b.form,
            ))
        });
    }
}

/// A small fixed set of clitic strings the analyser strips before
/// ending splitting. Estonian has few productive clitics; the emphatic
/// `-gi`/`-ki` pair is the attested, closed set.
const CLITICS: &[&str] = &["gi", "ki"];

#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyseFlags {
    pub guess: bool,
    pub hyphenation: bool,
    pub phonetic: bool,
    /// When set, a capitalised word that analyses as a common noun also
    /// gets a proper-noun reading alongside it (CLI `--propername`).
    pub propername: bool,
}

impl AnalyseFlags {
    fn annotation_flags(self) -> AnnotationFlags {
        AnnotationFlags {
            hyphenation: self.hyphenation,
            phonetic: self.phonetic,
        }
    }
}

/// Known prefixes recognised at step 4; empty in the base lexicon shape
/// used here (Estonian has essentially no productive derivational
/// prefixes outside loanwords), kept as a slice so a richer lexicon
/// variant can populate it without changing the algorithm.
const KNOWN_PREFIXES: &[&str] = &[];

/// Runs the full word-analyser pipeline.
pub fn analyse<S: ByteSource>(
    lexicon: &mut Lexicon<S>,
    word: &str,
) -> Result<AnalysisSet, AnalysisError> {
    analyse_with_flags(lexicon, word, AnalyseFlags::default())
}

pub fn analyse_with_flags<S: ByteSource>(
    lexicon: &mut Lexicon<S>,
    word: &str,
    flags: AnalyseFlags,
) -> Result<AnalysisSet, AnalysisError> {
    if word.is_empty() {
        return Ok(AnalysisSet::default());
    }

    let pattern = CapPattern::of(word);
    let folded = word.to_lowercase();

    // Step 2: closed-class short-circuits. A hit in any closed-class
    // list yields a single analysis tagged with that class's POS and no
    // further decomposition.
    if let Some(mut set) = closed_class_hit(lexicon, &folded) {
        for analysis in set.0.iter_mut() {
            analysis.stem = Stem::from(pattern.apply(&analysis.stem).as_str());
        }
        return Ok(set);
    }

    let mut out = AnalysisSet::default();

    // Step 1: clitic strip. Try with and without each known clitic so a
    // word that merely happens to end in "gi"/"ki" isn't mis-stripped
    // when the un-stripped reading also analyses.
    let mut candidates: Vec<(&str, Option<&str>)> = vec![(folded.as_str(), None)];
    for clitic in CLITICS {
        if let Some(head) = folded.strip_suffix(clitic) {
            if !head.is_empty() {
                candidates.push((head, Some(*clitic)));
            }
        }
    }

    for (head, clitic) in candidates {
        decompose(lexicon, head, clitic, flags.annotation_flags(), &mut out.0)?;
    }

    if out.is_empty() {
        // Step 8: compound decomposition from the right.
        try_compound(lexicon, &folded, flags.annotation_flags(), &mut out.0)?;
    }

    if out.is_empty() && flags.guess {
        out = guesser::guess(lexicon, &folded, flags.annotation_flags())?;
    }

    if flags.propername && !matches!(pattern, CapPattern::Lower) {
        let extra: Vec<Analysis> = out
            .0
            .iter()
            .filter(|a| a.pos == PartOfSpeech::Noun)
            .cloned()
            .map(|mut a| {
                a.pos = PartOfSpeech::ProperNoun;
                a
            })
            .collect();
        out.0.extend(extra);
    }

    // Restore the input's casing on every candidate stem. Lookups run
    // case-folded throughout, so this is the one place the pattern
    // captured up front gets used.
    for analysis in out.0.iter_mut() {
        let restored = pattern.apply(&analysis.stem);
        analysis.stem = Stem::from(restored.as_str());
    }

    out.sort();
    debug!(word, analyses = out.0.len(), "analysed word");
    Ok(out)
}

fn closed_class_hit<S: ByteSource>(lexicon: &Lexicon<S>, word: &str) -> Option<AnalysisSet> {
    use crate::lexicon::header::ClosedClass;

    for class in ClosedClass::ALL {
        let list = &lexicon.closed_classes[class as usize];
        if list.contains(word) {
            let pos = match class {
                ClosedClass::Abbreviation => PartOfSpeech::Abbreviation,
                ClosedClass::Cardinal => PartOfSpeech::CardinalNumeral,
                ClosedClass::RomanNumeral => PartOfSpeech::RomanNumeral,
                ClosedClass::Other => PartOfSpeech::Other,
            };
            return Some(AnalysisSet(vec![Analysis {
                stem: Stem::from(word),
                ending: 0,
                ending_string: String::new(),
                clitic: None,
                pos,
                form: FormName::from(""),
                paradigm_id: 0,
                within_paradigm_index: 0,
                origin: Origin::Dictionary,
            }]));
        }
    }
    None
}

/// Steps 3-7: ending split, prefix split, stem lookup, suffix
/// re-attribution, paradigm filter. Appends any hits to `out`.
fn decompose<S: ByteSource>(
    lexicon: &mut Lexicon<S>,
    head: &str,
    clitic: Option<&str>,
    ann_flags: AnnotationFlags,
    out: &mut Vec<Analysis>,
) -> Result<(), AnalysisError> {
    let head_chars: Vec<char> = head.chars().collect();

    // Ending id 0 (empty ending) is always tried;
    // `enumerate_endings_longest_first` below naturally includes it
    // since every ending string is tried regardless of length.
    let ending_count = lexicon.endings.0.len();
    let mut ending_order: Vec<usize> = (0..ending_count).collect();
    ending_order.sort_by_key(|&i| std::cmp::Reverse(lexicon.endings.0[i].chars().count()));

    for ending_id in ending_order {
        let ending_str = lexicon.endings.0[ending_id].to_string();
        let ending_len = ending_str.chars().count();
        if ending_len > head_chars.len() {
            continue;
        }
        let split_at = head_chars.len() - ending_len;
        if head_chars[split_at..].iter().collect::<String>() != ending_str {
            continue;
        }
        let rest_no_prefix: String = head_chars[..split_at].iter().collect();

        // Step 4: prefix split over a small known set (possibly empty).
        let mut rest_candidates: Vec<(&str, &str)> = vec![(rest_no_prefix.as_str(), "")];
        for prefix in KNOWN_PREFIXES {
            if let Some(rest) = rest_no_prefix.strip_prefix(prefix) {
                rest_candidates.push((rest, prefix));
            }
        }

        for (rest, prefix) in rest_candidates {
            try_stem(
                lexicon,
                rest,
                prefix,
                ending_id as EndingId,
                &ending_str,
                clitic,
                ann_flags,
                0,
                out,
            )?;
        }
    }

    Ok(())
}

/// Step 5-7, with step 6's suffix re-attribution recursing up to
/// `MAX_SUFFIX_CHAIN` times.
#[allow(clippy::too_many_arguments)]
fn try_stem<S: ByteSource>(
    lexicon: &mut Lexicon<S>,
    rest: &str,
    prefix: &str,
    ending_id: EndingId,
    ending_str: &str,
    clitic: Option<&str>,
    ann_flags: AnnotationFlags,
    chain_depth: usize,
    out: &mut Vec<Analysis>,
) -> Result<(), AnalysisError> {
    if rest.is_empty() {
        return Ok(());
    }

    let lookup = lexicon.stem_search(rest)?;

    let StemLookup::Hit {
        pos_class_id,
        homonyms,
    } = lookup
    else {
        return Ok(());
    };

    let Some(pos_class) = lexicon.pos_classes.get(pos_class_id) else {
        return Ok(());
    };
    let pos_by_homonym: Vec<PartOfSpeech> = pos_class.0.clone();

    for (hom_idx, homonym) in homonyms.iter().enumerate() {
        let Some(&pos) = pos_by_homonym.get(hom_idx) else {
            continue;
        };

        emit_for_endgroup(
            lexicon,
            rest,
            prefix,
            homonym.paradigm_id,
            homonym.within_paradigm_index,
            homonym.hyphenation_class,
            homonym.phonetic_class,
            pos,
            ending_id,
            ending_str,
            clitic,
            ann_flags,
            Origin::Dictionary,
            out,
        );

        // Step 6: suffix re-attribution. Walk the suffix table looking
        // for a registered suffix matching the stem's tail.
        if chain_depth < MAX_SUFFIX_CHAIN {
            try_suffix_chain(
                lexicon,
                rest,
                prefix,
                ending_id,
                ending_str,
                clitic,
                ann_flags,
                chain_depth,
                out,
            )?;
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn try_suffix_chain<S: ByteSource>(
    lexicon: &mut Lexicon<S>,
    rest: &str,
    prefix: &str,
    ending_id: EndingId,
    ending_str: &str,
    clitic: Option<&str>,
    ann_flags: AnnotationFlags,
    chain_depth: usize,
    out: &mut Vec<Analysis>,
) -> Result<(), AnalysisError> {
    for suffix in lexicon.suffixes.0.clone() {
        if !rest.ends_with(suffix.suffix.as_str()) {
            continue;
        }
        let tail_len = suffix.suffix.chars().count();
        let keep = tail_len.saturating_sub(suffix.chars_belong_to_stem as usize);
        let rest_chars: Vec<char> = rest.chars().collect();
        if rest_chars.len() < keep {
            continue;
        }
        let new_stem: String = rest_chars[..rest_chars.len() - keep].iter().collect();
        if new_stem.is_empty() {
            continue;
        }

        for info in suffix.stem_infos.iter() {
            emit_for_endgroup(
                lexicon,
                &new_stem,
                prefix,
                info.paradigm_id,
                info.within_paradigm_index,
                info.hyphenation_class,
                info.phonetic_class,
                PartOfSpeech::Other,
                ending_id,
                ending_str,
                clitic,
                ann_flags,
                Origin::Dictionary,
                out,
            );
        }

        try_stem(
            lexicon,
            &new_stem,
            prefix,
            ending_id,
            ending_str,
            clitic,
            ann_flags,
            chain_depth + 1,
            out,
        )?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn emit_for_endgroup<S: ByteSource>(
    lexicon: &mut Lexicon<S>,
    stem: &str,
    prefix: &str,
    paradigm_id: ParadigmId,
    within_paradigm_index: u16,
    hyphenation_class: u16,
    phonetic_class: u16,
    pos: PartOfSpeech,
    ending_id: EndingId,
    ending_str: &str,
    clitic: Option<&str>,
    ann_flags: AnnotationFlags,
    origin: Origin,
    out: &mut Vec<Analysis>,
) {
    let Some(row) = lexicon.paradigms.row(paradigm_id) else {
        return;
    };
    let Some(cell) = row.0.get(within_paradigm_index as usize) else {
        return;
    };
    let end_group = cell.end_group;

    for (form_id, form_name) in forms_for_endgroup(lexicon, end_group, ending_id) {
        if !paradigm::endgroup_accepts(&lexicon.ending_groups, end_group, ending_id, form_id) {
            continue;
        }
        let annotated = paradigm::annotate(
            &lexicon.hyphenation,
            &lexicon.phonetic,
            stem,
            hyphenation_class,
            phonetic_class,
            ann_flags,
        );
        let full_stem = format!("{prefix}{annotated}");
        trace!(stem = %full_stem, ending = ending_str, "emitting analysis");
        out.push(Analysis {
            stem: Stem::from(full_stem.as_str()),
            ending: ending_id,
            ending_string: ending_str.to_string(),
            clitic: clitic.map(str::to_string),
            pos,
            form: form_name,
            paradigm_id,
            within_paradigm_index,
            origin,
        });
    }
}

fn forms_for_endgroup<S: ByteSource>(
    lexicon: &Lexicon<S>,
    end_group: crate::lexicon::tables::EndGroupId,
    ending_id: EndingId,
) -> SmallVec<[(FormId, FormName); 4]> {
    let Some(entry) = lexicon.ending_groups.get(end_group) else {
        return SmallVec::new();
    };
    entry
        .rows
        .iter()
        .filter(|(eid, _)| *eid == ending_id)
        .flat_map(|(_, forms)| forms.iter())
        .filter_map(|&form_id| {
            lexicon
                .forms
                .get(form_id)
                .map(|name| (form_id, name.clone()))
        })
        .collect()
}

/// Estonian sonorants and vowels count as voiced for clitic-allomorph
/// purposes; anything outside that documented set declines to voice
/// rather than guess (fails closed).
pub(crate) fn is_voiced(c: char) -> bool {
    matches!(
        c,
        'a' | 'e' | 'i' | 'o' | 'u' | 'õ' | 'ä' | 'ö' | 'ü' | 'l' | 'm' | 'n' | 'r' | 'v' | 'j'
    )
}

/// Step 8: compound decomposition. Splits `word` at each internal
/// underscore/equals/plus/hyphen boundary and recurses on the
/// right-hand component; the left component is analysed independently
/// and its lemma prepended onto the right's.
fn try_compound<S: ByteSource>(
    lexicon: &mut Lexicon<S>,
    word: &str,
    ann_flags: AnnotationFlags,
    out: &mut Vec<Analysis>,
) -> Result<(), AnalysisError> {
    const JOINTS: &[char] = &['_', '=', '+', '-'];

    let chars: Vec<char> = word.chars().collect();
    for split in (1..chars.len()).rev() {
        let left: String = chars[..split].iter().collect();
        let right: String = chars[split..].iter().collect();
        if !JOINTS.contains(&chars[split]) && left.len() < 2 {
            continue;
        }

        let mut right_analyses = Vec::new();
        decompose(lexicon, &right, None, ann_flags, &mut right_analyses)?;
        if right_analyses.is_empty() {
            continue;
        }

        let mut left_analyses = Vec::new();
        decompose(lexicon, &left, None, ann_flags, &mut left_analyses)?;
        let Some(left_hit) = left_analyses.into_iter().next() else {
            continue;
        };

        for mut right_hit in right_analyses {
            right_hit.stem = Stem::from(format!("{}{}", left_hit.stem, right_hit.stem).as_str());
            out.push(right_hit);
        }
        if !out.is_empty() {
            return Ok(());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cap_pattern_is_reexported() {
        let _ = CapPattern::of("test");
    }
}
