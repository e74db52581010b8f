//! Disambiguation model file: tag list, unigram counts, sorted trigram
//! log-probabilities, ambiguity classes and lexical entries.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read as _;
use std::path::Path;

use tracing::debug;

use crate::errors::LexiconError;
use crate::lexicon::header::MAGIC;
use crate::lexicon::io::ByteReader;

pub type TagId = u16;

/// A decoded disambiguation model.
#[derive(Debug, Clone)]
pub struct DisambiguationModel {
    pub tags: Vec<String>,
    /// Index of the sentence-boundary sentinel tag within `tags`.
    pub sentinel_tag: TagId,
    pub unigram: Vec<u32>,
    /// `(i, j, k, logp)` sorted ascending by `(i, j, k)`.
    pub trigrams: Vec<(TagId, TagId, TagId, f32)>,
    /// Each class is the tag-log-prob set an unseen word with that
    /// ambiguity class is scored against.
    pub ambiguity_classes: Vec<Vec<(TagId, f32)>>,
    pub lexical: HashMap<String, Vec<(TagId, f32)>>,
}

impl DisambiguationModel {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let mut file = File::open(path.as_ref())
            .map_err(|e| LexiconError::Corrupt(format!("opening model file: {e}")))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|e| LexiconError::Corrupt(format!("reading model file: {e}")))?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LexiconError> {
        let mut r = ByteReader::new(bytes);

        let magic = r.read_u32()?;
        if magic != MAGIC {
            return Err(LexiconError::CorruptModel(format!(
                "bad magic: {magic:#010x}"
            )));
        }
        let _version = r.read_u16()?;

        let tag_count = r.read_u32()? as usize;
        let mut tags = Vec::with_capacity(tag_count);
        for _ in 0..tag_count {
            tags.push(r.read_length_prefixed_string(false)?);
        }
        let sentinel_tag = r.read_u16()?;
        if sentinel_tag as usize >= tags.len() {
            return Err(LexiconError::CorruptModel(
                "sentinel tag index out of range".into(),
            ));
        }

        let unigram_count = r.read_u32()? as usize;
        if unigram_count != tag_count {
            return Err(LexiconError::SizeMismatch {
                table: "unigram",
                unit: tag_count,
                actual: unigram_count,
            });
        }
        let mut unigram = Vec::with_capacity(unigram_count);
        for _ in 0..unigram_count {
            unigram.push(r.read_u32()?);
        }

        let trigram_count = r.read_u32()? as usize;
        let mut trigrams = Vec::with_capacity(trigram_count);
        for _ in 0..trigram_count {
            let i = r.read_u16()?;
            let j = r.read_u16()?;
            let k = r.read_u16()?;
            let logp = r.read_f32()?;
            trigrams.push((i, j, k, logp));
        }
        if !trigrams.windows(2).all(|w| (w[0].0, w[0].1, w[0].2) <= (w[1].0, w[1].1, w[1].2)) {
            return Err(LexiconError::CorruptModel(
                "trigram table is not sorted by (i, j, k)".into(),
            ));
        }

        let class_count = r.read_u32()? as usize;
        let mut ambiguity_classes = Vec::with_capacity(class_count);
        for _ in 0..class_count {
            let entry_count = r.read_u8()? as usize;
            let mut entries = Vec::with_capacity(entry_count);
            for _ in 0..entry_count {
                let tag = r.read_u16()?;
                let logp = r.read_f32()?;
                entries.push((tag, logp));
            }
            ambiguity_classes.push(entries);
        }

        let lexical_count = r.read_u32()? as usize;
        let mut lexical = HashMap::with_capacity(lexical_count);
        for _ in 0..lexical_count {
            let word = r.read_length_prefixed_string(false)?;
            let entry_count = r.read_u8()? as usize;
            let mut entries = Vec::with_capacity(entry_count);
            for _ in 0..entry_count {
                let tag = r.read_u16()?;
                let logp = r.read_f32()?;
                entries.push((tag, logp));
            }
            lexical.insert(word, entries);
        }

        debug!(
            tags = tags.len(),
            trigrams = trigrams.len(),
            lexical = lexical.len(),
            "decoded disambiguation model"
        );

        Ok(DisambiguationModel {
            tags,
            sentinel_tag,
            unigram,
            trigrams,
            ambiguity_classes,
            lexical,
        })
    }

    pub fn tag_id(&self, tag: &str) -> Option<TagId> {
        self.tags.iter().position(|t| t == tag).map(|i| i as TagId)
    }
}
