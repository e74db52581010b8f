//! Guesser (component G): the three unknown-word strategies the analyser
//! falls back to when it finds nothing. The first strategy to produce a
//! non-empty result wins; its origin tag rides along so the synthesiser
//! can tell a guessed paradigm from a dictionary one.

use tracing::debug;

use crate::errors::AnalysisError;
use crate::lexicon::paradigm::AnnotationFlags;
use crate::lexicon::{ByteSource, Lexicon};
use crate::morph::forms::{PartOfSpeech, Stem};

use super::{analyse_with_flags, emit_for_endgroup, AnalyseFlags, Analysis, AnalysisSet, Origin};

/// Runs strategies 1-3 in order, returning the first non-empty result.
pub fn guess<S: ByteSource>(
    lexicon: &mut Lexicon<S>,
    word: &str,
    ann_flags: AnnotationFlags,
) -> Result<AnalysisSet, AnalysisError> {
    let mut out = Vec::new();

    suffix_guess(lexicon, word, ann_flags, &mut out)?;
    if out.is_empty() {
        analogy_guess(lexicon, word, ann_flags, &mut out)?;
    }
    if out.is_empty() {
        compound_guess(lexicon, word, ann_flags, &mut out)?;
    }

    let mut set = AnalysisSet(out);
    set.sort();
    debug!(word, guesses = set.0.len(), "guessed word");
    Ok(set)
}

/// Strategy 1: strip a registered suffix off the word's tail, longest
/// first, and attribute the remainder to that suffix's stem-info
/// readings directly (the suffix's `reduced_ending` stands in for the
/// ending split F would otherwise have done).
fn suffix_guess<S: ByteSource>(
    lexicon: &mut Lexicon<S>,
    word: &str,
    ann_flags: AnnotationFlags,
    out: &mut Vec<Analysis>,
) -> Result<(), AnalysisError> {
    let word_chars: Vec<char> = word.chars().collect();
    let mut suffixes = lexicon.suffixes.0.clone();
    suffixes.sort_by_key(|s| std::cmp::Reverse(s.suffix.chars().count()));

    for suffix in suffixes {
        if !word.ends_with(suffix.suffix.as_str()) {
            continue;
        }
        let tail_len = suffix.suffix.chars().count();
        let keep = tail_len.saturating_sub(suffix.chars_belong_to_stem as usize);
        if word_chars.len() < keep {
            continue;
        }
        let stem: String = word_chars[..word_chars.len() - keep].iter().collect();
        if stem.is_empty() {
            continue;
        }

        let ending_id = suffix.reduced_ending;
        let ending_str = lexicon
            .endings
            .get(ending_id)
            .map(|e| e.to_string())
            .unwrap_or_default();

        for info in suffix.stem_infos.iter() {
            emit_for_endgroup(
                lexicon,
                &stem,
                "",
                info.paradigm_id,
                info.within_paradigm_index,
                info.hyphenation_class,
                info.phonetic_class,
                PartOfSpeech::Other,
                ending_id,
                &ending_str,
                None,
                ann_flags,
                Origin::GuesserSuffix,
                out,
            );
        }
    }

    Ok(())
}

/// Strategy 2: the analogy sub-lexicon. An entry whose word shares a
/// tail with the input is analysed normally, then that analysis's stem
/// has its shared tail swapped for the input's own tail; surviving
/// candidates are the ones whose surface form reconstructs the input
/// exactly.
fn analogy_guess<S: ByteSource>(
    lexicon: &mut Lexicon<S>,
    word: &str,
    ann_flags: AnnotationFlags,
    out: &mut Vec<Analysis>,
) -> Result<(), AnalysisError> {
    let word_chars: Vec<char> = word.chars().collect();
    let entries = lexicon.analogy.0.clone();

    for entry in entries {
        let analogy_chars: Vec<char> = entry.analogy_word.chars().collect();
        let shared = shared_tail_len(&word_chars, &analogy_chars);
        if shared == 0 {
            continue;
        }

        let analyses = analyse_with_flags(
            lexicon,
            &entry.analogy_word,
            AnalyseFlags {
                guess: false,
                hyphenation: ann_flags.hyphenation,
                phonetic: ann_flags.phonetic,
                propername: false,
            },
        )?;

        for analysis in analyses.0 {
            let stem_chars: Vec<char> = analysis.stem.chars().collect();
            if stem_chars.len() < shared {
                continue;
            }
            let head_len = stem_chars.len() - shared;
            let word_tail_start = word_chars.len().saturating_sub(shared);
            let mut new_stem: String = stem_chars[..head_len].iter().collect();
            new_stem.extend(word_chars[word_tail_start..].iter());

            let surface = format!("{new_stem}{}", analysis.ending_string);
            if surface != word {
                continue;
            }

            out.push(Analysis {
                stem: Stem::from(new_stem.as_str()),
                ending: analysis.ending,
                ending_string: analysis.ending_string.clone(),
                clitic: analysis.clitic.clone(),
                pos: entry.pos,
                form: analysis.form.clone(),
                paradigm_id: entry.paradigm_id,
                within_paradigm_index: analysis.within_paradigm_index,
                origin: Origin::GuesserAnalogy,
            });
        }
    }

    Ok(())
}

/// Strategy 3: split the word at each point right-to-left; once a
/// right-hand piece analyses under strategy 1 or 2, treat the left as
/// opaque and prepend it verbatim.
fn compound_guess<S: ByteSource>(
    lexicon: &mut Lexicon<S>,
    word: &str,
    ann_flags: AnnotationFlags,
    out: &mut Vec<Analysis>,
) -> Result<(), AnalysisError> {
    let chars: Vec<char> = word.chars().collect();

    for split in (1..chars.len()).rev() {
        let left: String = chars[..split].iter().collect();
        let right: String = chars[split..].iter().collect();

        let mut right_guesses = Vec::new();
        suffix_guess(lexicon, &right, ann_flags, &mut right_guesses)?;
        if right_guesses.is_empty() {
            analogy_guess(lexicon, &right, ann_flags, &mut right_guesses)?;
        }
        if right_guesses.is_empty() {
            continue;
        }

        for mut analysis in right_guesses {
            analysis.stem = Stem::from(format!("{left}{}", analysis.stem).as_str());
            analysis.origin = Origin::GuesserCompound;
            out.push(analysis);
        }
        return Ok(());
    }

    Ok(())
}

fn shared_tail_len(a: &[char], b: &[char]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_tail_len_counts_common_suffix() {
        let a: Vec<char> = "kalakene".chars().collect();
        let b: Vec<char> = "majakene".chars().collect();
        assert_eq!(shared_tail_len(&a, &b), 5);
    }

    #[test]
    fn shared_tail_len_is_zero_for_disjoint_tails() {
        let a: Vec<char> = "kala".chars().collect();
        let b: Vec<char> = "maja".chars().collect();
        assert_eq!(shared_tail_len(&a, &b), 0);
    }
}
