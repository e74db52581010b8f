//! Sentence wrapper (component I): a FIFO over tokens that analyses
//! words once a small look-ahead window has arrived, forwarding any
//! non-word token untouched.

use std::collections::VecDeque;

use crate::analyzer::{analyse_with_flags, AnalyseFlags, AnalysisSet};
use crate::errors::AnalysisError;
use crate::lexicon::{ByteSource, Lexicon};

/// Look-ahead depth before a queued word is analysed and emitted. Sized
/// for proper-name and multi-word-expression checks, not tuned further
/// than that.
const LOOKAHEAD: usize = 3;

/// One slot in the sentence queue.
#[derive(Debug, Clone)]
pub enum Token {
    Word(String),
    /// A non-word token (punctuation, markup) forwarded untouched.
    Tag(String),
    /// A word already analysed, waiting to be drained by `flush`.
    Analysed(String, AnalysisSet),
}

/// Owns an input queue of pending tokens and an output queue of
/// analysed/forwarded ones. Tokens never reorder.
pub struct SentenceWrapper {
    pending: VecDeque<Token>,
    output: Vec<Token>,
    flags: AnalyseFlags,
}

impl SentenceWrapper {
    pub fn new(flags: AnalyseFlags) -> Self {
        SentenceWrapper {
            pending: VecDeque::new(),
            output: Vec::new(),
            flags,
        }
    }

    /// Queues a word for analysis.
    pub fn push_word(&mut self, word: impl Into<String>) {
        self.pending.push_back(Token::Word(word.into()));
    }

    /// Forwards a non-word token untouched.
    pub fn push_tag(&mut self, tag: impl Into<String>) {
        self.pending.push_back(Token::Tag(tag.into()));
    }

    /// Analyses every word that now has `LOOKAHEAD` tokens queued behind
    /// it, draining them into the output queue.
    fn drain_ready<S: ByteSource>(
        &mut self,
        lexicon: &mut Lexicon<S>,
        force: bool,
    ) -> Result<(), AnalysisError> {
        while force || self.pending.len() > LOOKAHEAD {
            let Some(token) = self.pending.pop_front() else {
                break;
            };
            match token {
                Token::Tag(t) => self.output.push(Token::Tag(t)),
                Token::Analysed(w, set) => self.output.push(Token::Analysed(w, set)),
                Token::Word(w) => {
                    let set = analyse_with_flags(lexicon, &w, self.flags)?;
                    self.output.push(Token::Analysed(w, set));
                }
            }
            if !force && self.pending.len() <= LOOKAHEAD {
                break;
            }
        }
        Ok(())
    }

    /// Analyses any still-queued words and returns the full, ordered
    /// output.
    pub fn flush<S: ByteSource>(
        &mut self,
        lexicon: &mut Lexicon<S>,
    ) -> Result<Vec<Token>, AnalysisError> {
        self.drain_ready(lexicon, true)?;
        Ok(std::mem::take(&mut self.output))
    }

    /// Drains whatever the look-ahead window currently allows without
    /// forcing the tail; useful for streaming callers that want partial
    /// output before the sentence ends.
    pub fn poll<S: ByteSource>(
        &mut self,
        lexicon: &mut Lexicon<S>,
    ) -> Result<Vec<Token>, AnalysisError> {
        self.drain_ready(lexicon, false)?;
        Ok(std::mem::take(&mut self.output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Lexicon;

    fn empty_lexicon() -> Lexicon<crate::lexicon::SliceSource> {
        crate::test_infrastructure::empty_lexicon()
    }

    #[test]
    fn tags_pass_through_untouched_and_in_order() {
        let mut lexicon = empty_lexicon();
        let mut wrapper = SentenceWrapper::new(AnalyseFlags::default());
        wrapper.push_tag(".");
        wrapper.push_word("maja");
        wrapper.push_tag("!");

        let out = wrapper.flush(&mut lexicon).unwrap();
        assert_eq!(out.len(), 3);
        assert!(matches!(&out[0], Token::Tag(t) if t == "."));
        assert!(matches!(&out[2], Token::Tag(t) if t == "!"));
    }
}
