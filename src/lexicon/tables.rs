//! Runtime representations of the lexicon's flat tables (component C).
//!
//! Everything here is an index into a flat `Vec`, never a pointer or a
//! `Rc` graph: paradigms reference ending-groups which reference endings
//! which live in a different pool, and the cleanest acyclic way to model
//! that in Rust is integer ids into sibling tables, exactly as the
//! on-disk format already does.

use allocative::Allocative;
use smallvec::SmallVec;

use crate::morph::forms::{Ending, FormName, PartOfSpeech, Stem};

pub type EndingId = u32;
pub type FormId = u32;
pub type EndGroupId = u32;
pub type ParadigmId = u32;
pub type HyphenationClassId = u16;
pub type PhoneticClassId = u16;

/// Id `0` is reserved for the empty ending.
pub const EMPTY_ENDING: EndingId = 0;

/// Suffix chains are bounded so the recursive re-attribution in the word
/// analyser's suffix-chain step cannot loop.
pub const MAX_SUFFIX_CHAIN: usize = 4;

/// Bound on how many stem-info readings a single suffix-table entry can
/// carry (`SUF_LGCNT`).
pub const SUF_LGCNT: usize = 4;

#[derive(Debug, Clone, Default, Allocative)]
pub struct EndingTable(pub Vec<Ending>);

impl EndingTable {
    pub fn get(&self, id: EndingId) -> Option<&Ending> {
        self.0.get(id as usize)
    }
}

#[derive(Debug, Clone, Default, Allocative)]
pub struct FormTable(pub Vec<FormName>);

impl FormTable {
    pub fn get(&self, id: FormId) -> Option<&FormName> {
        self.0.get(id as usize)
    }

    pub fn id_of(&self, form: &str) -> Option<FormId> {
        self.0.iter().position(|f| f.as_str() == form).map(|i| i as FormId)
    }
}

/// One row of `endgroup_data`: the ending ids licensed on a stem plus,
/// for each, the form ids it realises in this group.
#[derive(Debug, Clone, Default, Allocative)]
pub struct EndGroupEntry {
    pub rows: Vec<(EndingId, SmallVec<[FormId; 4]>)>,
}

#[derive(Debug, Clone, Default, Allocative)]
pub struct EndGroupTable(pub Vec<EndGroupEntry>);

impl EndGroupTable {
    pub fn get(&self, id: EndGroupId) -> Option<&EndGroupEntry> {
        self.0.get(id as usize)
    }
}

/// Packed suffix-info reading. The on-disk record packs several fields
/// into two-byte groups and must be widened field-by-field rather than
/// `memcpy`d, because the in-memory record (this one) is wider.
#[derive(Debug, Clone, Copy, Allocative)]
pub struct StemInfo {
    pub end_group: EndGroupId,
    pub paradigm_id: ParadigmId,
    pub within_paradigm_index: u16,
    pub hyphenation_class: HyphenationClassId,
    pub phonetic_class: PhoneticClassId,
}

/// Per-homonym info attached to a stem record in the stems-block area;
/// distinct from `StemInfo` above because a stem record has no
/// `end_group` of its own -- the ending group is chosen by the paradigm
/// the reading points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Allocative)]
pub struct StemHomonym {
    pub paradigm_id: ParadigmId,
    pub within_paradigm_index: u16,
    pub hyphenation_class: HyphenationClassId,
    pub phonetic_class: PhoneticClassId,
}

#[derive(Debug, Clone, Allocative)]
pub struct SuffixEntry {
    pub suffix: Stem,
    pub reduced_ending: EndingId,
    /// Bitset over `PartOfSpeech` the suffix may attach to.
    pub attachable_stem_classes: u32,
    pub required_stem_ending_class: u32,
    /// How many trailing characters of the suffix are re-attributed to
    /// the stem when this suffix applies.
    pub chars_belong_to_stem: u8,
    pub stem_infos: SmallVec<[StemInfo; SUF_LGCNT]>,
}

#[derive(Debug, Clone, Default, Allocative)]
pub struct SuffixTable(pub Vec<SuffixEntry>);

#[derive(Debug, Clone, Allocative)]
pub struct PrefixEntry {
    pub prefix: Stem,
    pub attachable_pos: u32,
    pub hyphenation_class: HyphenationClassId,
    pub phonetic_class: PhoneticClassId,
}

#[derive(Debug, Clone, Default, Allocative)]
pub struct PrefixTable(pub Vec<PrefixEntry>);

/// `(endgroup_id, stem_delta)`, one cell of a paradigm row.
///
/// `stem_delta` plays two roles depending on which slot it's read from:
/// as the *source* slot in `rewrite_stem`, its length is how many
/// trailing characters to strip off the input stem; as the *target*
/// slot, its content is what gets appended in their place.
#[derive(Debug, Clone, Allocative)]
pub struct ParadigmCell {
    pub end_group: EndGroupId,
    pub stem_delta: Stem,
}

#[derive(Debug, Clone, Default, Allocative)]
pub struct ParadigmRow(pub Vec<ParadigmCell>);

#[derive(Debug, Clone, Default, Allocative)]
pub struct ParadigmTable(pub Vec<ParadigmRow>);

impl ParadigmTable {
    pub fn row(&self, id: ParadigmId) -> Option<&ParadigmRow> {
        self.0.get(id as usize)
    }
}

/// One overlay: positions (relative to stem start) and marker characters
/// to insert to produce the annotated display form.
#[derive(Debug, Clone, Default, Allocative)]
pub struct Annotation(pub Vec<(u16, char)>);

#[derive(Debug, Clone, Default, Allocative)]
pub struct AnnotationTable(pub Vec<Annotation>);

impl AnnotationTable {
    pub fn get(&self, id: u16) -> Option<&Annotation> {
        self.0.get(id as usize)
    }
}

/// Sorted set of strings, searched by binary lookup.
#[derive(Debug, Clone, Default, Allocative)]
pub struct ClosedClassList(pub Vec<String>);

impl ClosedClassList {
    pub fn contains(&self, word: &str) -> bool {
        self.0.binary_search_by(|probe| probe.as_str().cmp(word)).is_ok()
    }
}

#[derive(Debug, Clone, Default, Allocative)]
pub struct PosClassStrings(pub Vec<crate::morph::forms::PosClass>);

impl PosClassStrings {
    pub fn get(&self, id: u32) -> Option<&crate::morph::forms::PosClass> {
        self.0.get(id as usize)
    }
}

/// The binary-search directory: canonical pre-order over stem prefixes,
/// one entry per stems block.
#[derive(Debug, Clone, Default, Allocative)]
pub struct Directory(pub Vec<String>);

impl Directory {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn key(&self, idx: usize) -> Option<&str> {
        self.0.get(idx).map(|s| s.as_str())
    }
}

/// One `(analogy_word, pos, paradigm_slot)` triple from the guesser's
/// companion sub-lexicon (strategy 2).
#[derive(Debug, Clone, Allocative)]
pub struct AnalogyEntry {
    pub analogy_word: Stem,
    pub pos: PartOfSpeech,
    pub paradigm_id: ParadigmId,
}

#[derive(Debug, Clone, Default, Allocative)]
pub struct AnalogyTable(pub Vec<AnalogyEntry>);

pub fn pos_bit(pos: PartOfSpeech) -> u32 {
    1u32 << (pos.as_char() as u32 - 'A' as u32)
}

pub fn pos_set_contains(set: u32, pos: PartOfSpeech) -> bool {
    set & pos_bit(pos) != 0
}
