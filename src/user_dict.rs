//! User dictionary overlay: a flat text file of pre-formatted analyses
//! consulted before the main lexicon. A hit short-circuits the word
//! analyser entirely -- the paradigm machinery never runs for that word.
//!
//! Line format: `word<TAB>reading[;reading...]`, one line per key.
//! A reading is `stem,ending,pos,form[,clitic]`. Blank lines and lines
//! starting with `#` are skipped. The file is unordered; if a word
//! appears on more than one line, the last line wins.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::analyzer::{Analysis, AnalysisSet, Origin};
use crate::errors::AnalysisError;
use crate::morph::forms::{FormName, PartOfSpeech, Stem};

#[derive(Debug, Clone, Default)]
pub struct UserDictionary(HashMap<String, AnalysisSet>);

impl UserDictionary {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let text = fs::read_to_string(path.as_ref())
            .map_err(|e| AnalysisError::MalformedUserDictionaryLine(e.to_string()))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, AnalysisError> {
        let mut entries = HashMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (word, readings) = line.split_once('\t').ok_or_else(|| {
                AnalysisError::MalformedUserDictionaryLine(line.to_string())
            })?;
            let mut analyses = Vec::new();
            for reading in readings.split(';') {
                analyses.push(parse_reading(reading)?);
            }
            entries.insert(word.to_string(), AnalysisSet(analyses));
        }
        Ok(UserDictionary(entries))
    }

    pub fn lookup(&self, word: &str) -> Option<&AnalysisSet> {
        self.0.get(word)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

fn parse_reading(reading: &str) -> Result<Analysis, AnalysisError> {
    let fields: Vec<&str> = reading.split(',').collect();
    if fields.len() < 4 {
        return Err(AnalysisError::MalformedUserDictionaryLine(
            reading.to_string(),
        ));
    }
    let stem = fields[0];
    let ending_string = fields[1];
    let pos_char = fields[2].chars().next().ok_or_else(|| {
        AnalysisError::MalformedUserDictionaryLine(reading.to_string())
    })?;
    let pos = PartOfSpeech::from_char(pos_char).ok_or(AnalysisError::UnknownPos(pos_char))?;
    let form = fields[3];
    let clitic = fields.get(4).filter(|s| !s.is_empty()).map(|s| s.to_string());

    Ok(Analysis {
        stem: Stem::from(stem),
        ending: 0,
        ending_string: ending_string.to_string(),
        clitic,
        pos,
        form: FormName::from(form),
        paradigm_id: 0,
        within_paradigm_index: 0,
        origin: Origin::UserDictionary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_single_reading_line() {
        let dict = UserDictionary::parse("kass\tkas,s,S,sg n\n").unwrap();
        let set = dict.lookup("kass").unwrap();
        assert_eq!(set.0.len(), 1);
        assert_eq!(set.0[0].origin, Origin::UserDictionary);
        assert_eq!(set.0[0].pos, PartOfSpeech::Noun);
    }

    #[test]
    fn later_line_for_the_same_word_replaces_the_earlier_one() {
        let dict = UserDictionary::parse(
            "kass\tkas,s,S,sg n\nkass\tkass,,S,sg n\n",
        )
        .unwrap();
        let set = dict.lookup("kass").unwrap();
        assert_eq!(set.0.len(), 1);
        assert_eq!(set.0[0].stem.as_str(), "kass");
    }

    #[test]
    fn multiple_readings_split_on_semicolon() {
        let dict = UserDictionary::parse("viga\tviga,,S,sg n;viga,,V,da\n").unwrap();
        let set = dict.lookup("viga").unwrap();
        assert_eq!(set.0.len(), 2);
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        let dict = UserDictionary::parse("# comment\n\nkass\tkas,s,S,sg n\n").unwrap();
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn malformed_line_is_rejected() {
        assert!(UserDictionary::parse("kass\n").is_err());
    }
}
