//! Assembles `Header` + `BlockCache` + the flat tables into one `Lexicon`
//! (component C). This is the only place that knows the concrete byte
//! layout of each region; everything downstream works with the decoded
//! `tables` structs and ids.
//!
//! Layout of each region (all offsets are absolute byte offsets into the
//! file, all counts come from the matching `RegionOffset.count`):
//!
//! - endings / forms: `count` length-prefixed strings back to back.
//! - ending_groups: `count` fixed records `{ row_count: u32, rows_offset: u32 }`
//!   (`rows_offset` relative to `form_group_data_offset`); each row in the
//!   group data blob is `{ ending_id: u32, form_count: u8, form_ids: [u32; form_count] }`.
//! - suffixes: `count` length-prefixed strings; suffix_info (parallel,
//!   `count` entries at `suffix_info_offset`): `{ reduced_ending: u32,
//!   attachable_stem_classes: u32, required_stem_ending_class: <1 or 2
//!   bytes per suffix_class_id_width>, chars_belong_to_stem: u8,
//!   stem_info_count: u8, stem_info_count * StemInfo }`, `StemInfo` =
//!   `{ end_group: u32, paradigm_id: u32, within_paradigm_index: u16,
//!   hyphenation_class: u16, phonetic_class: u16 }`.
//! - prefixes: `count` length-prefixed strings; prefix_info (parallel):
//!   `{ attachable_pos: u32, hyphenation_class: u16, phonetic_class: u16 }`.
//! - pos_class_strings: `count` length-prefixed strings, each parsed with
//!   `PosClass::parse`.
//! - closed_classes\[4\]: each a `count`-length run of length-prefixed
//!   strings, sorted ascending on disk (binary search depends on it).
//! - paradigm_table: `count` rows, each `{ cell_count: u8, cells }`, cell =
//!   `{ end_group: u32, stem_delta: length-prefixed string }`.
//! - hyphenation_annotations / phonetic_annotations: `count` entries, each
//!   `{ marker_count: u8, markers: [{ position: u16, marker: char }; marker_count] }`.
//! - directory: `directory_count` entries of `{ key_len: u8, key_offset: u16 }`
//!   (`key_offset` a character offset into the key pool at `key_pool_offset`),
//!   sorted ascending -- these widths are fixed, unlike the rest of this
//!   layout.
//! - analogy: `count` records `{ analogy_word: length-prefixed string,
//!   pos: u8 (POS-class letter), paradigm_id: u32 }`, the guesser's
//!   companion sub-lexicon (strategy 2).

use std::fs::File;
use std::path::Path;

use tracing::{debug, instrument};

use crate::errors::LexiconError;
use crate::morph::forms::PosClass;

use super::block_cache::{BlockCache, ByteSource, MmapSource, SliceSource};
use super::header::Header;
use super::io::ByteReader;
use super::tables::{
    AnalogyEntry, AnalogyTable, Annotation, AnnotationTable, ClosedClassList, Directory,
    EndGroupEntry, EndGroupTable, EndingTable, FormTable, ParadigmCell, ParadigmRow,
    ParadigmTable, PosClassStrings, PrefixEntry, PrefixTable, StemInfo, SuffixEntry, SuffixTable,
};
use crate::morph::forms::PartOfSpeech;

/// A fully loaded dictionary: header, decoded flat tables, and a block
/// cache positioned over the stems area. Holds its byte source so a
/// `Lexicon` is self-contained once `open`/`open_mmap` returns.
pub struct Lexicon<S: ByteSource> {
    pub header: Header,
    pub endings: EndingTable,
    pub forms: FormTable,
    pub ending_groups: EndGroupTable,
    pub suffixes: SuffixTable,
    pub prefixes: PrefixTable,
    pub pos_classes: PosClassStrings,
    pub closed_classes: [ClosedClassList; super::header::CLOSED_CLASS_COUNT],
    pub paradigms: ParadigmTable,
    pub hyphenation: AnnotationTable,
    pub phonetic: AnnotationTable,
    pub directory: Directory,
    pub analogy: AnalogyTable,
    source: S,
    cache: BlockCache,
}

impl Lexicon<SliceSource> {
    /// Loads an entire dictionary file into memory up front. Useful for
    /// tests and small lexicons; production callers should prefer
    /// `open_mmap`.
    #[instrument(skip_all)]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let bytes = std::fs::read(path.as_ref())
            .map_err(|e| LexiconError::Corrupt(format!("reading lexicon file: {e}")))?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, LexiconError> {
        let header = Header::parse(&bytes)?;
        let tables = DecodedTables::decode(&bytes, &header)?;
        debug!(
            endings = tables.endings.0.len(),
            suffixes = tables.suffixes.0.len(),
            directory = tables.directory.len(),
            "decoded lexicon tables"
        );
        Ok(Self::assemble(header, tables, SliceSource(bytes)))
    }
}

impl Lexicon<MmapSource> {
    /// Memory-maps the dictionary file; tables are still decoded eagerly
    /// (they're small relative to the stems area), only the stems blocks
    /// are paged in lazily through the block cache.
    #[instrument(skip_all)]
    pub fn open_mmap(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let file = File::open(path.as_ref())
            .map_err(|e| LexiconError::Corrupt(format!("opening lexicon file: {e}")))?;
        let mmap = unsafe { memmap::Mmap::map(&file) }
            .map_err(|e| LexiconError::Corrupt(format!("mmapping lexicon file: {e}")))?;
        let header = Header::parse(&mmap)?;
        let tables = DecodedTables::decode(&mmap, &header)?;
        Ok(Self::assemble(header, tables, MmapSource(mmap)))
    }
}

impl<S: ByteSource> Lexicon<S> {
    fn assemble(header: Header, tables: DecodedTables, source: S) -> Self {
        Lexicon {
            header,
            endings: tables.endings,
            forms: tables.forms,
            ending_groups: tables.ending_groups,
            suffixes: tables.suffixes,
            prefixes: tables.prefixes,
            pos_classes: tables.pos_classes,
            closed_classes: tables.closed_classes,
            paradigms: tables.paradigms,
            hyphenation: tables.hyphenation,
            phonetic: tables.phonetic,
            directory: tables.directory,
            analogy: tables.analogy,
            source,
            cache: BlockCache::new(),
        }
    }

    /// Reads one stems block, going through the cache.
    pub fn block(&mut self, block_id: u32) -> Result<&[u8], LexiconError> {
        self.cache.read(&mut self.source, &self.header, block_id)
    }

    /// Component D entry point: directory lookup followed by a block
    /// walk.
    pub fn stem_search(
        &mut self,
        s: &str,
    ) -> Result<super::stem_search::StemLookup, LexiconError> {
        use super::stem_search::{locate_block, walk_block, StemLookup};

        let Some(block_idx) = locate_block(&self.directory.0, s) else {
            return Ok(StemLookup::NotAnywhere);
        };
        if block_idx as u32 >= self.header.block_count {
            return Ok(StemLookup::NotAnywhere);
        }
        let block = self.block(block_idx as u32)?.to_vec();
        walk_block(&block, s)
    }
}

/// Intermediate bag of decoded tables, kept private so a half-decoded
/// lexicon never escapes `decode` on an `Err` path.
struct DecodedTables {
    endings: EndingTable,
    forms: FormTable,
    ending_groups: EndGroupTable,
    suffixes: SuffixTable,
    prefixes: PrefixTable,
    pos_classes: PosClassStrings,
    closed_classes: [ClosedClassList; super::header::CLOSED_CLASS_COUNT],
    paradigms: ParadigmTable,
    hyphenation: AnnotationTable,
    phonetic: AnnotationTable,
    directory: Directory,
    analogy: AnalogyTable,
}

impl DecodedTables {
    fn decode(bytes: &[u8], header: &Header) -> Result<Self, LexiconError> {
        let trailing_zero = header.strings_include_trailing_zero;

        let endings = EndingTable(
            read_strings(
                bytes,
                header.endings.offset as usize,
                header.endings.count as usize,
                trailing_zero,
            )?
            .iter()
            .map(|s| smallstr::SmallString::from(s.as_str()))
            .collect(),
        );

        let forms = FormTable(
            read_strings(
                bytes,
                header.forms.offset as usize,
                header.forms.count as usize,
                trailing_zero,
            )?
            .iter()
            .map(|s| smallstr::SmallString::from(s.as_str()))
            .collect(),
        );

        let ending_groups = read_ending_groups(bytes, header)?;

        let suffix_strings = read_strings(
            bytes,
            header.suffixes.offset as usize,
            header.suffixes.count as usize,
            trailing_zero,
        )?;
        let suffixes = read_suffix_info(bytes, header, suffix_strings)?;

        let prefix_strings = read_strings(
            bytes,
            header.prefixes.offset as usize,
            header.prefixes.count as usize,
            trailing_zero,
        )?;
        let prefixes = read_prefix_info(bytes, header, prefix_strings)?;

        let pos_class_raw = read_strings(
            bytes,
            header.pos_class_strings.offset as usize,
            header.pos_class_strings.count as usize,
            trailing_zero,
        )?;
        let mut pos_classes = Vec::with_capacity(pos_class_raw.len());
        for s in pos_class_raw {
            let parsed = PosClass::parse(&s).map_err(|c| {
                LexiconError::Corrupt(format!("unknown POS-class letter '{c}' in {s:?}"))
            })?;
            pos_classes.push(parsed);
        }
        let pos_classes = PosClassStrings(pos_classes);

        let mut closed_classes_vec = Vec::with_capacity(super::header::CLOSED_CLASS_COUNT);
        for region in header.closed_classes {
            let strings = read_strings(
                bytes,
                region.offset as usize,
                region.count as usize,
                trailing_zero,
            )?;
            closed_classes_vec.push(ClosedClassList(strings));
        }
        let closed_classes: [ClosedClassList; super::header::CLOSED_CLASS_COUNT] =
            closed_classes_vec
                .try_into()
                .map_err(|_| LexiconError::Corrupt("closed-class region count mismatch".into()))?;

        let paradigms = read_paradigms(bytes, header, trailing_zero)?;
        let hyphenation = read_annotations(bytes, header.hyphenation_annotations.offset as usize, header.hyphenation_annotations.count as usize)?;
        let phonetic = read_annotations(bytes, header.phonetic_annotations.offset as usize, header.phonetic_annotations.count as usize)?;

        let directory = read_directory(bytes, header)?;
        let analogy = read_analogy(bytes, header)?;

        Ok(DecodedTables {
            endings,
            forms,
            ending_groups,
            suffixes,
            prefixes,
            pos_classes,
            closed_classes,
            paradigms,
            hyphenation,
            phonetic,
            directory,
            analogy,
        })
    }
}

fn read_strings(
    bytes: &[u8],
    offset: usize,
    count: usize,
    trailing_zero: bool,
) -> Result<Vec<String>, LexiconError> {
    let mut r = ByteReader::at(bytes, offset);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(r.read_length_prefixed_string(trailing_zero)?);
    }
    Ok(out)
}

fn read_ending_groups(bytes: &[u8], header: &Header) -> Result<EndGroupTable, LexiconError> {
    let mut r = ByteReader::at(bytes, header.ending_groups.offset as usize);
    let mut groups = Vec::with_capacity(header.ending_groups.count as usize);

    for group_id in 0..header.ending_groups.count {
        let row_count = r.read_u32()? as usize;
        let rows_offset = r.read_u32()?;
        let base = header.form_group_data_offset as u64 + rows_offset as u64;
        if base > header.form_group_data_offset as u64 + header.form_group_data_len as u64 {
            return Err(LexiconError::IndexOutOfRange {
                table: "form_group_data",
                index: base as usize,
                len: (header.form_group_data_offset + header.form_group_data_len) as usize,
            });
        }

        let mut rows_reader = ByteReader::at(bytes, base as usize);
        let mut rows = Vec::with_capacity(row_count);
        for _ in 0..row_count {
            let ending_id = rows_reader.read_u32()?;
            let form_count = rows_reader.read_u8()? as usize;
            let mut form_ids = smallvec::SmallVec::with_capacity(form_count);
            for _ in 0..form_count {
                form_ids.push(rows_reader.read_u32()?);
            }
            rows.push((ending_id, form_ids));
        }
        groups.push(EndGroupEntry { rows });
        debug!(group_id, row_count, "decoded ending group");
    }

    Ok(EndGroupTable(groups))
}

fn read_suffix_class_field(r: &mut ByteReader, width: u8) -> Result<u32, LexiconError> {
    match width {
        1 => Ok(r.read_u8()? as u32),
        2 => Ok(r.read_u16()? as u32),
        other => Err(LexiconError::HeaderOutOfRange {
            field: "suffix_class_id_width",
            value: other as u64,
        }),
    }
}

fn read_suffix_info(
    bytes: &[u8],
    header: &Header,
    strings: Vec<String>,
) -> Result<SuffixTable, LexiconError> {
    let mut r = ByteReader::at(bytes, header.suffix_info_offset as usize);
    let mut out = Vec::with_capacity(strings.len());

    for suffix in strings {
        let reduced_ending = r.read_u32()?;
        let attachable_stem_classes = r.read_u32()?;
        let required_stem_ending_class = read_suffix_class_field(&mut r, header.suffix_class_id_width)?;
        let chars_belong_to_stem = r.read_u8()?;
        let stem_info_count = r.read_u8()? as usize;
        if stem_info_count > super::tables::SUF_LGCNT {
            return Err(LexiconError::Corrupt(format!(
                "suffix {suffix:?} has {stem_info_count} stem-info readings, max is {}",
                super::tables::SUF_LGCNT
            )));
        }

        let mut stem_infos = smallvec::SmallVec::new();
        for _ in 0..stem_info_count {
            stem_infos.push(StemInfo {
                end_group: r.read_u32()?,
                paradigm_id: r.read_u32()?,
                within_paradigm_index: r.read_u16()?,
                hyphenation_class: r.read_u16()?,
                phonetic_class: r.read_u16()?,
            });
        }

        out.push(SuffixEntry {
            suffix: smallstr::SmallString::from(suffix.as_str()),
            reduced_ending,
            attachable_stem_classes,
            required_stem_ending_class,
            chars_belong_to_stem,
            stem_infos,
        });
    }

    Ok(SuffixTable(out))
}

fn read_prefix_info(
    bytes: &[u8],
    header: &Header,
    strings: Vec<String>,
) -> Result<PrefixTable, LexiconError> {
    let mut r = ByteReader::at(bytes, header.prefix_info_offset as usize);
    let mut out = Vec::with_capacity(strings.len());

    for prefix in strings {
        out.push(PrefixEntry {
            prefix: smallstr::SmallString::from(prefix.as_str()),
            attachable_pos: r.read_u32()?,
            hyphenation_class: r.read_u16()?,
            phonetic_class: r.read_u16()?,
        });
    }

    Ok(PrefixTable(out))
}

fn read_paradigms(
    bytes: &[u8],
    header: &Header,
    trailing_zero: bool,
) -> Result<ParadigmTable, LexiconError> {
    let mut r = ByteReader::at(bytes, header.paradigm_table.offset as usize);
    let mut rows = Vec::with_capacity(header.paradigm_table.count as usize);

    for _ in 0..header.paradigm_table.count {
        let cell_count = r.read_u8()? as usize;
        let mut cells = Vec::with_capacity(cell_count);
        for _ in 0..cell_count {
            let end_group = r.read_u32()?;
            let stem_delta = r.read_length_prefixed_string(trailing_zero)?;
            cells.push(ParadigmCell {
                end_group,
                stem_delta: smallstr::SmallString::from(stem_delta.as_str()),
            });
        }
        rows.push(ParadigmRow(cells));
    }

    Ok(ParadigmTable(rows))
}

fn read_annotations(bytes: &[u8], offset: usize, count: usize) -> Result<AnnotationTable, LexiconError> {
    let mut r = ByteReader::at(bytes, offset);
    let mut out = Vec::with_capacity(count);

    for _ in 0..count {
        let marker_count = r.read_u8()? as usize;
        let mut markers = Vec::with_capacity(marker_count);
        for _ in 0..marker_count {
            let position = r.read_u16()?;
            let marker = r.read_char()?;
            markers.push((position, marker));
        }
        out.push(Annotation(markers));
    }

    Ok(AnnotationTable(out))
}

fn read_directory(bytes: &[u8], header: &Header) -> Result<Directory, LexiconError> {
    let mut r = ByteReader::at(bytes, header.directory_offset as usize);
    let mut entries = Vec::with_capacity(header.directory_count as usize);

    for _ in 0..header.directory_count {
        // Fixed widths: `(key_length:u8, key_offset:u16)`; key_offset is
        // a character offset into the key pool, not a byte offset.
        let key_len = r.read_u8()? as usize;
        let key_offset_chars = r.read_u16()? as usize;
        let key_byte_offset = header.key_pool_offset as usize + key_offset_chars * 2;
        let mut kr = ByteReader::at(bytes, key_byte_offset);
        let chars = kr.read_wide_chars(key_len)?;
        entries.push(chars.into_iter().collect::<String>());
    }

    if !entries.windows(2).all(|w| w[0] <= w[1]) {
        return Err(LexiconError::Corrupt(
            "directory keys are not sorted ascending".into(),
        ));
    }

    Ok(Directory(entries))
}

fn read_analogy(bytes: &[u8], header: &Header) -> Result<AnalogyTable, LexiconError> {
    let trailing_zero = header.strings_include_trailing_zero;
    let mut r = ByteReader::at(bytes, header.analogy.offset as usize);
    let mut out = Vec::with_capacity(header.analogy.count as usize);

    for _ in 0..header.analogy.count {
        let analogy_word = r.read_length_prefixed_string(trailing_zero)?;
        let pos_char = r.read_u8()? as u32;
        let pos_char = char::from_u32(pos_char)
            .ok_or(LexiconError::CharOutOfRange(pos_char))?;
        let pos = PartOfSpeech::from_char(pos_char).ok_or_else(|| {
            LexiconError::Corrupt(format!("unknown POS letter '{pos_char}' in analogy table"))
        })?;
        let paradigm_id = r.read_u32()?;
        out.push(AnalogyEntry {
            analogy_word: smallstr::SmallString::from(analogy_word.as_str()),
            pos,
            paradigm_id,
        });
    }

    Ok(AnalogyTable(out))
}
