//! Spell-checking façade: reuses the analyser rather than a dedicated
//! index. A word is correctly spelled if it has at least one
//! dictionary-backed analysis; suggestions are single-edit mutations of
//! the word filtered back down through the same analyser.

use crate::analyzer::{analyse_with_flags, AnalyseFlags, Origin};
use crate::errors::AnalysisError;
use crate::lexicon::{ByteSource, Lexicon};

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzõäöüšž";
const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Clone)]
pub struct SpellResult {
    pub correct: bool,
    pub suggestions: Vec<String>,
}

fn is_dictionary_backed(analyses: &crate::analyzer::AnalysisSet) -> bool {
    analyses
        .0
        .iter()
        .any(|a| matches!(a.origin, Origin::Dictionary | Origin::UserDictionary))
}

/// Checks `word` and, when `suggest` is set and the word isn't correctly
/// spelled, proposes up to `MAX_SUGGESTIONS` single-edit corrections the
/// analyser accepts.
pub fn check<S: ByteSource>(
    lexicon: &mut Lexicon<S>,
    word: &str,
    suggest: bool,
) -> Result<SpellResult, AnalysisError> {
    let analyses = analyse_with_flags(lexicon, word, AnalyseFlags::default())?;
    let correct = is_dictionary_backed(&analyses);
    if correct || !suggest {
        return Ok(SpellResult {
            correct,
            suggestions: Vec::new(),
        });
    }

    let mut suggestions = Vec::new();
    for candidate in single_edits(word) {
        if suggestions.len() >= MAX_SUGGESTIONS {
            break;
        }
        if suggestions.contains(&candidate) {
            continue;
        }
        let set = analyse_with_flags(lexicon, &candidate, AnalyseFlags::default())?;
        if is_dictionary_backed(&set) {
            suggestions.push(candidate);
        }
    }
    Ok(SpellResult {
        correct,
        suggestions,
    })
}

/// Every word one deletion, substitution, insertion or adjacent
/// transposition away from `word` (classic Norvig-style candidate set).
fn single_edits(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut out = Vec::new();

    for i in 0..chars.len() {
        let mut c = chars.clone();
        c.remove(i);
        out.push(c.into_iter().collect());
    }

    for i in 0..chars.len() {
        for r in ALPHABET.chars() {
            if r == chars[i] {
                continue;
            }
            let mut c = chars.clone();
            c[i] = r;
            out.push(c.into_iter().collect());
        }
    }

    for i in 0..=chars.len() {
        for r in ALPHABET.chars() {
            let mut c = chars.clone();
            c.insert(i, r);
            out.push(c.into_iter().collect());
        }
    }

    for i in 0..chars.len().saturating_sub(1) {
        let mut c = chars.clone();
        c.swap(i, i + 1);
        out.push(c.into_iter().collect());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_edits_include_one_deletion_and_one_transposition() {
        let edits = single_edits("ab");
        assert!(edits.contains(&"a".to_string()));
        assert!(edits.contains(&"ba".to_string()));
    }
}
