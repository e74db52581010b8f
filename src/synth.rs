//! Synthesiser (component H): lemma + POS + form-set -> surface forms.

use std::collections::HashSet;

use crate::analyzer::{analyse_with_flags, guesser, is_voiced, AnalyseFlags};
use crate::errors::AnalysisError;
use crate::lexicon::paradigm::{self, AnnotationFlags};
use crate::lexicon::{ByteSource, Lexicon};
use crate::morph::forms::PartOfSpeech;

/// A synthesis request.
#[derive(Debug, Clone)]
pub struct SynthesiseRequest<'a> {
    pub lemma: &'a str,
    pub pos: PartOfSpeech,
    /// Target forms; `"*"` expands to the lexicon's full productive-form
    /// list, empty means "the lemma form itself".
    pub form_set: &'a [String],
    pub clitic: Option<&'a str>,
    /// A word expected to share the paradigm, used to disambiguate
    /// homograph lemmas that select more than one paradigm.
    pub paradigm_example: Option<&'a str>,
    pub guess: bool,
    pub phonetic: bool,
}

/// Runs the full synthesis pipeline.
pub fn synthesise<S: ByteSource>(
    lexicon: &mut Lexicon<S>,
    req: &SynthesiseRequest,
) -> Result<Vec<String>, AnalysisError> {
    let ann_flags = AnnotationFlags {
        hyphenation: false,
        phonetic: req.phonetic,
    };

    // Step 1: analyse the lemma, keep readings matching the target POS.
    let lemma_analyses = analyse_with_flags(lexicon, req.lemma, AnalyseFlags::default())?;
    let mut candidates: Vec<_> = lemma_analyses
        .0
        .into_iter()
        .filter(|a| a.pos == req.pos)
        .collect();

    // Step 2: narrow by paradigm example, if given.
    if let Some(example) = req.paradigm_example.filter(|s| !s.is_empty()) {
        let example_analyses = analyse_with_flags(lexicon, example, AnalyseFlags::default())?;
        let allowed: HashSet<_> = example_analyses.0.iter().map(|a| a.paradigm_id).collect();
        candidates.retain(|a| allowed.contains(&a.paradigm_id));
    }

    // Step 4: fall back to the guesser's suffix-stripping path.
    if candidates.is_empty() && req.guess {
        let guessed = guesser::guess(lexicon, &req.lemma.to_lowercase(), ann_flags)?;
        candidates = guessed.0.into_iter().filter(|a| a.pos == req.pos).collect();
    }

    let mut out = Vec::new();
    let mut seen = HashSet::new();

    // Step 3: for each candidate paradigm cell, rewrite the stem and
    // enumerate endings for each target form.
    for candidate in &candidates {
        let Some(row) = lexicon.paradigms.row(candidate.paradigm_id) else {
            continue;
        };
        let row_len = row.0.len();

        let target_forms: Vec<String> = if req.form_set.is_empty() {
            vec![candidate.form.to_string()]
        } else {
            expand_form_set(lexicon, req.form_set)
        };

        for to_slot in 0..row_len {
            let Some(stem_variant) = paradigm::rewrite_stem(
                &lexicon.paradigms,
                candidate.paradigm_id,
                candidate.within_paradigm_index as usize,
                to_slot,
                &candidate.stem,
            )?
            else {
                continue;
            };

            let Some(cell) = lexicon.paradigms.row(candidate.paradigm_id).and_then(|r| r.0.get(to_slot)) else {
                continue;
            };
            let end_group = cell.end_group;

            for form in &target_forms {
                let Some(form_id) = lexicon.forms.id_of(form) else {
                    continue;
                };
                let endings =
                    paradigm::enumerate_endings(&lexicon.ending_groups, &lexicon.endings, end_group, form_id);

                for (_, ending_str) in endings {
                    let mut surface = format!("{stem_variant}{ending_str}");
                    if let Some(clitic) = req.clitic {
                        surface.push_str(&voice(&surface, clitic));
                    }
                    if seen.insert(surface.clone()) {
                        out.push(surface);
                    }
                }
            }
        }
    }

    Ok(out)
}

/// Expands `"*"` to the lexicon's full form pool, passes everything else
/// through unchanged.
fn expand_form_set<S: ByteSource>(lexicon: &Lexicon<S>, form_set: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(form_set.len());
    for form in form_set {
        if form == "*" {
            out.extend(lexicon.forms.0.iter().map(|f| f.to_string()));
        } else {
            out.push(form.clone());
        }
    }
    out
}

/// Clitic voicing: the emphatic clitic's two written allomorphs, `gi`
/// after a voiced sound and `ki` otherwise. Any
/// other clitic string passes through unchanged -- this rule fails
/// closed rather than guess at an alternation it wasn't told about.
fn voice(stem_plus_ending: &str, clitic: &str) -> String {
    if !matches!(clitic, "gi" | "ki") {
        return clitic.to_string();
    }
    match stem_plus_ending.chars().last() {
        Some(c) if is_voiced(c) => "gi".to_string(),
        Some(_) => "ki".to_string(),
        None => clitic.to_string(),
    }
}
