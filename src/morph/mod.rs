/// Part-of-speech and grammatical-form vocabulary used throughout the
/// engine, and small helpers for turning the lexicon's POS-class strings
/// into queryable tags.
pub mod forms;

pub use forms::{GrammaticalTag, PartOfSpeech};
