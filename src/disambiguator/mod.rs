//! Disambiguator: trigram-HMM Viterbi decoding over a sentence's
//! `AnalysisSet`s.
//!
//! Each `AnalysisSet` is pruned to the readings matching the decoded
//! tag. If none match -- the tag table and the input disagree -- the
//! set is left unpruned rather than emptied.

pub mod model;

use std::collections::HashMap;

use tracing::trace;

use crate::analyzer::AnalysisSet;
use crate::morph::forms::GrammaticalTag;

pub use model::{DisambiguationModel, TagId};

/// Back-off penalty (in log-probability) applied when a trigram is
/// missing from the table and scoring has to fall back to a bigram
/// approximation, and again when it falls all the way back to unigram
/// counts.
const BACKOFF_PENALTY: f32 = -2.0;
/// Emission log-probability assigned to a candidate tag that is in
/// neither the lexical table nor a matching ambiguity class -- present
/// in the word's own reading list but otherwise unseen by the model.
const UNSEEN_TAG_LOGP: f32 = -9.0;

impl DisambiguationModel {
    fn log_unigram(&self, k: TagId) -> f32 {
        let total: u64 = self.unigram.iter().map(|&c| c as u64).sum();
        if total == 0 {
            return f32::NEG_INFINITY;
        }
        let c = self.unigram.get(k as usize).copied().unwrap_or(0);
        if c == 0 {
            return f32::NEG_INFINITY;
        }
        ((c as f64) / (total as f64)).ln() as f32
    }

    fn transition_logp(&self, i: TagId, j: TagId, k: TagId) -> f32 {
        if let Ok(idx) = self
            .trigrams
            .binary_search_by_key(&(i, j, k), |&(a, b, c, _)| (a, b, c))
        {
            return self.trigrams[idx].3;
        }
        let bigram: Vec<f32> = self
            .trigrams
            .iter()
            .filter(|&&(_, bj, bk, _)| bj == j && bk == k)
            .map(|&(_, _, _, p)| p)
            .collect();
        if !bigram.is_empty() {
            let avg = bigram.iter().sum::<f32>() / bigram.len() as f32;
            return avg + BACKOFF_PENALTY;
        }
        self.log_unigram(k) + 2.0 * BACKOFF_PENALTY
    }

    /// Emission log-probability of `word` given `tag`, from the lexical
    /// table when the word is known, otherwise from the first ambiguity
    /// class whose tag set is a superset of `candidate_tags`, otherwise a
    /// flat low probability shared by every candidate.
    fn emission_logp(&self, word: &str, tag: TagId, candidate_tags: &[TagId]) -> f32 {
        if let Some(entries) = self.lexical.get(word) {
            return entries
                .iter()
                .find(|&&(t, _)| t == tag)
                .map(|&(_, p)| p)
                .unwrap_or(f32::NEG_INFINITY);
        }
        for class in &self.ambiguity_classes {
            let class_tags: Vec<TagId> = class.iter().map(|&(t, _)| t).collect();
            if candidate_tags.iter().all(|t| class_tags.contains(t)) {
                if let Some(&(_, p)) = class.iter().find(|&&(t, _)| t == tag) {
                    return p;
                }
            }
        }
        UNSEEN_TAG_LOGP
    }
}

/// One word's candidate readings, expressed as model tag ids paired with
/// the index into its `AnalysisSet` that produced them.
struct WordCandidates {
    word: String,
    tags: Vec<(TagId, usize)>,
}

fn candidates_for(model: &DisambiguationModel, word: &str, set: &AnalysisSet) -> WordCandidates {
    let mut tags = Vec::new();
    for (idx, analysis) in set.0.iter().enumerate() {
        let key = GrammaticalTag::new(analysis.pos.as_char(), analysis.form.clone()).to_string();
        if let Some(tag_id) = model.tag_id(&key) {
            tags.push((tag_id, idx));
        }
    }
    WordCandidates {
        word: word.to_string(),
        tags,
    }
}

/// Runs Viterbi trigram decoding over `words`, moving each word's
/// model-preferred reading to the front of its `AnalysisSet`. Words with
/// no reading known to the model (empty `tags`) are passed through
/// untouched and do not constrain neighbouring transitions.
pub fn disambiguate(model: &DisambiguationModel, words: &mut [(String, AnalysisSet)]) {
    let sentinel = model.sentinel_tag;
    let candidates: Vec<WordCandidates> = words
        .iter()
        .map(|(w, set)| candidates_for(model, w, set))
        .collect();

    // Viterbi over states (t_{i-1}, t_i); (sentinel, sentinel) opens the
    // lattice and a second sentinel step closes it, so sentence boundaries
    // act as a fixed context on both ends.
    let mut scores: HashMap<(TagId, TagId), f32> = HashMap::new();
    scores.insert((sentinel, sentinel), 0.0);
    // back[i] maps the state reached *after* word i to the state it came from.
    let mut back: Vec<HashMap<(TagId, TagId), (TagId, TagId)>> = Vec::with_capacity(words.len());

    for wc in &candidates {
        let mut next_scores: HashMap<(TagId, TagId), f32> = HashMap::new();
        let mut next_back: HashMap<(TagId, TagId), (TagId, TagId)> = HashMap::new();

        if wc.tags.is_empty() {
            // No model-known reading: pass every live state through
            // unscored rather than collapsing the lattice to nothing.
            back.push(next_back);
            continue;
        }

        let tag_ids: Vec<TagId> = wc.tags.iter().map(|&(t, _)| t).collect();
        for (&(prevprev, prev), &score) in &scores {
            for &k in &tag_ids {
                let step = model.transition_logp(prevprev, prev, k)
                    + model.emission_logp(&wc.word, k, &tag_ids);
                let new_state = (prev, k);
                let candidate = score + step;
                if candidate > *next_scores.get(&new_state).unwrap_or(&f32::NEG_INFINITY) {
                    next_scores.insert(new_state, candidate);
                    next_back.insert(new_state, (prevprev, prev));
                }
            }
        }
        scores = next_scores;
        back.push(next_back);
    }

    // Close the lattice with a final sentinel transition and trace back.
    let mut best_state = None;
    let mut best_score = f32::NEG_INFINITY;
    for (&(prevprev, prev), &score) in &scores {
        let closing = score + model.transition_logp(prevprev, prev, sentinel);
        if closing > best_score {
            best_score = closing;
            best_state = Some((prevprev, prev));
        }
    }

    let Some(mut state) = best_state else {
        trace!("disambiguator: empty lattice, leaving all readings untouched");
        return;
    };

    let mut chosen_tag: Vec<Option<TagId>> = vec![None; words.len()];
    for i in (0..words.len()).rev() {
        if candidates[i].tags.is_empty() {
            continue;
        }
        chosen_tag[i] = Some(state.1);
        match back[i].get(&state) {
            Some(&prev_state) => state = prev_state,
            None => break,
        }
    }

    for (i, tag) in chosen_tag.into_iter().enumerate() {
        let Some(tag) = tag else { continue };
        let matching: Vec<usize> = candidates[i]
            .tags
            .iter()
            .filter(|&&(t, _)| t == tag)
            .map(|&(_, idx)| idx)
            .collect();
        if matching.is_empty() {
            continue;
        }
        let set = &mut words[i].1 .0;
        let mut kept = Vec::with_capacity(matching.len());
        for &idx in &matching {
            kept.push(set[idx].clone());
        }
        *set = kept;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{Analysis, Origin};
    use crate::morph::forms::{FormName, Stem};

    fn model_with_two_tags() -> DisambiguationModel {
        DisambiguationModel {
            tags: vec!["Z boundary".into(), "S sg n".into(), "V indic".into()],
            sentinel_tag: 0,
            unigram: vec![10, 5, 5],
            trigrams: vec![
                (0, 0, 1, -0.1),
                (0, 1, 2, -0.1),
                (1, 2, 0, -0.1),
                (0, 0, 2, -5.0),
            ],
            ambiguity_classes: vec![],
            lexical: Default::default(),
        }
    }

    fn analysis(pos: char, form: &str) -> Analysis {
        Analysis {
            stem: Stem::from("x"),
            ending: Default::default(),
            ending_string: String::new(),
            clitic: None,
            pos: crate::morph::forms::PartOfSpeech::from_char(pos).unwrap(),
            form: FormName::from(form),
            paradigm_id: 0,
            within_paradigm_index: 0,
            origin: Origin::Dictionary,
        }
    }

    #[test]
    fn prefers_the_trigram_scored_reading() {
        let model = model_with_two_tags();
        let mut words = vec![(
            "x".to_string(),
            AnalysisSet(vec![analysis('V', "indic"), analysis('S', "sg n")]),
        )];
        disambiguate(&model, &mut words);
        assert_eq!(words[0].1 .0.len(), 1);
        assert_eq!(words[0].1 .0[0].pos, crate::morph::forms::PartOfSpeech::Noun);
    }

    #[test]
    fn unscoreable_word_is_left_untouched() {
        let model = model_with_two_tags();
        let original = vec![analysis('V', "indic"), analysis('S', "sg n")];
        let mut words = vec![("x".to_string(), AnalysisSet(original.clone()))];
        // Wipe the lattice by using a model whose tags never match.
        let mut empty_model = model;
        empty_model.tags = vec!["Z boundary".into()];
        empty_model.sentinel_tag = 0;
        disambiguate(&empty_model, &mut words);
        assert_eq!(words[0].1 .0, original);
    }
}
