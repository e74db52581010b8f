//! Lexicon-driven morphological analyser, synthesiser and disambiguator
//! for Estonian: a binary dictionary file drives word analysis, word
//! synthesis, spell-checking and a trigram-HMM disambiguator, wired
//! together behind `MorphEngine`.

/// Word analyser (component F), guesser (component G) and cap-pattern
/// case restoration.
pub mod analyzer;
/// Trigram-HMM Viterbi disambiguator (component J).
pub mod disambiguator;
pub mod errors;
/// Byte-packed I/O, block cache, loader, stem search and paradigm
/// expansion (components A-E).
pub mod lexicon;
/// Part-of-speech and grammatical-form vocabulary.
pub mod morph;
/// Sentence wrapper (component I).
pub mod sentence;
/// Spell-checking façade built on the analyser.
pub mod spell;
/// Synthesiser (component H).
pub mod synth;
/// User dictionary overlay, consulted before the main lexicon.
pub mod user_dict;

#[cfg(test)]
pub(crate) mod test_infrastructure;

pub use analyzer::{analyse, analyse_with_flags, AnalyseFlags, Analysis, AnalysisSet, Origin};
pub use disambiguator::{disambiguate, DisambiguationModel};
pub use errors::{AnalysisError, EngineError, LexiconError, VabaResult};
pub use lexicon::{ByteSource, Lexicon, MmapSource, SliceSource};
pub use sentence::{SentenceWrapper, Token};
pub use spell::SpellResult;
pub use synth::SynthesiseRequest;
pub use user_dict::UserDictionary;

use std::path::Path;

/// Bundles a loaded lexicon with an optional disambiguation model and an
/// optional user dictionary overlay; the crate's main entry point for
/// callers who don't want to wire the components themselves.
pub struct MorphEngine<S: ByteSource> {
    pub lexicon: Lexicon<S>,
    pub model: Option<DisambiguationModel>,
    pub user_dictionary: Option<UserDictionary>,
}

impl MorphEngine<SliceSource> {
    /// Loads the entire dictionary file into memory.
    pub fn open(lex_path: impl AsRef<Path>) -> VabaResult<Self> {
        let lexicon = Lexicon::open(lex_path)?;
        Ok(MorphEngine {
            lexicon,
            model: None,
            user_dictionary: None,
        })
    }
}

impl MorphEngine<MmapSource> {
    /// Memory-maps the dictionary file; stems blocks are paged in lazily.
    pub fn open_mmap(lex_path: impl AsRef<Path>) -> VabaResult<Self> {
        let lexicon = Lexicon::open_mmap(lex_path)?;
        Ok(MorphEngine {
            lexicon,
            model: None,
            user_dictionary: None,
        })
    }
}

impl<S: ByteSource> MorphEngine<S> {
    pub fn with_model(mut self, model: DisambiguationModel) -> Self {
        self.model = Some(model);
        self
    }

    pub fn load_model(&mut self, model_path: impl AsRef<Path>) -> VabaResult<()> {
        self.model = Some(DisambiguationModel::open(model_path)?);
        Ok(())
    }

    pub fn load_user_dictionary(&mut self, path: impl AsRef<Path>) -> VabaResult<()> {
        self.user_dictionary = Some(UserDictionary::open(path)?);
        Ok(())
    }

    /// A user dictionary hit short-circuits the lexicon entirely; only a
    /// miss falls through to the regular analyser pipeline.
    pub fn analyse(&mut self, word: &str, flags: AnalyseFlags) -> VabaResult<AnalysisSet> {
        if let Some(set) = self.user_dictionary.as_ref().and_then(|d| d.lookup(word)) {
            return Ok(set.clone());
        }
        Ok(analyse_with_flags(&mut self.lexicon, word, flags)?)
    }

    pub fn synthesise(&mut self, req: &SynthesiseRequest) -> VabaResult<Vec<String>> {
        Ok(synth::synthesise(&mut self.lexicon, req)?)
    }

    pub fn spell_check(&mut self, word: &str, suggest: bool) -> VabaResult<SpellResult> {
        Ok(spell::check(&mut self.lexicon, word, suggest)?)
    }

    /// Disambiguates a whole sentence in place. A no-op when no model has
    /// been loaded -- callers still get the analyser's own readings.
    pub fn disambiguate_sentence(&self, words: &mut [(String, AnalysisSet)]) {
        if let Some(model) = &self.model {
            disambiguate(model, words);
        }
    }
}
