use std::path::PathBuf;
use thiserror::Error;

pub type VabaResult<T, E = EngineError> = std::result::Result<T, E>;

/// Top-level error returned by the CLI and by any call that can touch I/O.
///
/// A thin top enum that `#[from]`-wraps the two domain-specific error
/// enums plus the raw I/O/serde errors the CLI frontends hit.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("couldn't open file {file}: {error}")]
    File {
        file: PathBuf,
        error: std::io::Error,
    },

    #[error("IO err -> {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON err -> {0}")]
    Json(#[from] serde_json::Error),

    #[error("lexicon err -> {0}")]
    Lexicon(#[from] LexiconError),

    #[error("analysis err -> {0}")]
    Analysis(#[from] AnalysisError),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("empty lexicon path")]
    EmptyLexiconPath,
}

/// Fatal dictionary-load errors: the lexicon handle that triggered one
/// must be discarded and never observed half-initialised.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexiconError {
    #[error("header field {field} out of range: {value}")]
    HeaderOutOfRange { field: &'static str, value: u64 },

    #[error("unknown header field: {0}")]
    UnknownHeaderField(&'static str),

    #[error("short read: wanted {wanted} bytes, file had {available}")]
    ShortRead { wanted: usize, available: usize },

    #[error("size mismatch in {table}: expected multiple of {unit}, got {actual}")]
    SizeMismatch {
        table: &'static str,
        unit: usize,
        actual: usize,
    },

    #[error("index {index} out of range for {table} (len {len})")]
    IndexOutOfRange {
        table: &'static str,
        index: usize,
        len: usize,
    },

    #[error("missing end-of-block sentinel in stems block {block_id}")]
    MissingSentinel { block_id: u32 },

    #[error("seek past end of file: offset {offset}, file len {len}")]
    SeekPastEnd { offset: u64, len: u64 },

    #[error("character {0:#06x} exceeds the Unicode BMP and cannot be widened")]
    CharOutOfRange(u32),

    #[error("block cache returned block {got}, requested {requested}")]
    CacheMismatch { requested: u32, got: u32 },

    #[error("dictionary is corrupt: {0}")]
    Corrupt(String),

    #[error("disambiguation model file is corrupt: {0}")]
    CorruptModel(String),
}

/// Non-fatal errors from a single analyse/synthesise/disambiguate call.
/// Finding no analysis for a word is *not* one of these -- it is
/// represented by an empty result list, never by `Err`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("empty word passed where a non-empty stem was required")]
    EmptyStem,

    #[error("suffix chain exceeded MAX_SUFFIX_CHAIN ({0}) links")]
    SuffixChainTooDeep(usize),

    #[error("paradigm {paradigm_id} has no slot {slot}")]
    BadParadigmSlot { paradigm_id: u32, slot: u16 },

    #[error("form '{0}' is not a known grammatical form for this lexicon")]
    UnknownForm(String),

    #[error("part of speech '{0}' is not known to this lexicon")]
    UnknownPos(char),

    #[error("malformed user dictionary line: {0}")]
    MalformedUserDictionaryLine(String),

    #[error("lexicon err during analysis -> {0}")]
    Lexicon(#[from] LexiconError),
}
