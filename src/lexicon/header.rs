//! Dictionary file header (part of component C).
//!
//! Byte-exact, little-endian. The header carries a byte offset to every
//! subsequent region plus the per-block byte size and counts; the
//! loader trusts nothing else about the file's shape.

use super::io::ByteReader;
use crate::errors::LexiconError;

pub const MAGIC: u32 = 0x4D52_4156; // "VABM" – arbitrary but load-bearing: wrong magic is corrupt, not "maybe fine".
pub const FORMAT_VERSION: u16 = 1;

/// Fixed-size array of closed-class lists: abbreviations, cardinal-number
/// spellings, Roman numerals, and a catch-all "other closed class" bucket.
pub const CLOSED_CLASS_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosedClass {
    Abbreviation = 0,
    Cardinal = 1,
    RomanNumeral = 2,
    Other = 3,
}

impl ClosedClass {
    pub const ALL: [ClosedClass; CLOSED_CLASS_COUNT] = [
        ClosedClass::Abbreviation,
        ClosedClass::Cardinal,
        ClosedClass::RomanNumeral,
        ClosedClass::Other,
    ];
}

#[derive(Debug, Clone, Copy)]
pub struct RegionOffset {
    pub offset: u32,
    pub count: u32,
}

#[derive(Debug, Clone)]
pub struct Header {
    pub format_version: u16,
    /// Whether length-prefixed strings include their trailing NUL in the
    /// count -- the loader follows the header, never guesses.
    pub strings_include_trailing_zero: bool,
    /// Whether suffix-info `ssl1` fields are one or two bytes wide; both
    /// widths are tolerated.
    pub suffix_class_id_width: u8,

    pub endings: RegionOffset,
    pub forms: RegionOffset,
    pub ending_groups: RegionOffset,
    pub form_group_data_len: u32,
    pub form_group_data_offset: u32,
    pub suffixes: RegionOffset,
    pub suffix_info_offset: u32,
    pub prefixes: RegionOffset,
    pub prefix_info_offset: u32,
    pub pos_class_strings: RegionOffset,
    pub closed_classes: [RegionOffset; CLOSED_CLASS_COUNT],
    pub paradigm_table: RegionOffset,
    pub hyphenation_annotations: RegionOffset,
    pub phonetic_annotations: RegionOffset,
    pub analogy: RegionOffset,

    pub directory_count: u32,
    pub directory_offset: u32,
    pub key_pool_offset: u32,

    pub block_size: u32,
    pub block_count: u32,
    pub blocks_origin: u64,
}

impl Header {
    /// Parses the fixed-layout header starting at byte 0 of the file.
    pub fn parse(bytes: &[u8]) -> Result<Self, LexiconError> {
        let mut r = ByteReader::new(bytes);

        let magic = r.read_u32()?;
        if magic != MAGIC {
            return Err(LexiconError::Corrupt(format!(
                "bad magic: {magic:#010x}"
            )));
        }

        let format_version = r.read_u16()?;
        if format_version == 0 || format_version > FORMAT_VERSION {
            return Err(LexiconError::UnknownHeaderField("format_version"));
        }

        let strings_include_trailing_zero = r.read_u8()? != 0;
        let suffix_class_id_width = r.read_u8()?;
        if suffix_class_id_width != 1 && suffix_class_id_width != 2 {
            return Err(LexiconError::HeaderOutOfRange {
                field: "suffix_class_id_width",
                value: suffix_class_id_width as u64,
            });
        }

        let region = |r: &mut ByteReader| -> Result<RegionOffset, LexiconError> {
            Ok(RegionOffset {
                offset: r.read_u32()?,
                count: r.read_u32()?,
            })
        };

        let endings = region(&mut r)?;
        let forms = region(&mut r)?;
        let ending_groups = region(&mut r)?;
        let form_group_data_offset = r.read_u32()?;
        let form_group_data_len = r.read_u32()?;
        let suffixes = region(&mut r)?;
        let suffix_info_offset = r.read_u32()?;
        let prefixes = region(&mut r)?;
        let prefix_info_offset = r.read_u32()?;
        let pos_class_strings = region(&mut r)?;

        let mut closed_classes = [RegionOffset { offset: 0, count: 0 }; CLOSED_CLASS_COUNT];
        for slot in closed_classes.iter_mut() {
            *slot = region(&mut r)?;
        }

        let paradigm_table = region(&mut r)?;
        let hyphenation_annotations = region(&mut r)?;
        let phonetic_annotations = region(&mut r)?;
        let analogy = region(&mut r)?;

        let directory_count = r.read_u32()?;
        let directory_offset = r.read_u32()?;
        let key_pool_offset = r.read_u32()?;

        let block_size = r.read_u32()?;
        if block_size == 0 {
            return Err(LexiconError::HeaderOutOfRange {
                field: "block_size",
                value: 0,
            });
        }
        let block_count = r.read_u32()?;
        let blocks_origin = r.read_u32()? as u64;

        let header = Header {
            format_version,
            strings_include_trailing_zero,
            suffix_class_id_width,
            endings,
            forms,
            ending_groups,
            form_group_data_len,
            form_group_data_offset,
            suffixes,
            suffix_info_offset,
            prefixes,
            prefix_info_offset,
            pos_class_strings,
            closed_classes,
            paradigm_table,
            hyphenation_annotations,
            phonetic_annotations,
            analogy,
            directory_count,
            directory_offset,
            key_pool_offset,
            block_size,
            block_count,
            blocks_origin,
        };

        let needed = header.blocks_origin + header.block_size as u64 * header.block_count as u64;
        if needed > bytes.len() as u64 {
            return Err(LexiconError::ShortRead {
                wanted: needed as usize,
                available: bytes.len(),
            });
        }

        Ok(header)
    }

    pub fn block_offset(&self, block_id: u32) -> u64 {
        self.blocks_origin + block_id as u64 * self.block_size as u64
    }
}
