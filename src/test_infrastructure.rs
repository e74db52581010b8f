//! Test fixture builders: small in-memory lexicons for unit and
//! integration tests, built byte-exact rather than faked.

use crate::lexicon::{Lexicon, SliceSource};

/// Byte length of the fixed-layout header every builder here writes first.
const HEADER_LEN: u32 = 160;

fn write_lp_string(buf: &mut Vec<u8>, s: &str) {
    let chars: Vec<char> = s.chars().collect();
    buf.extend_from_slice(&(chars.len() as u32).to_le_bytes());
    for c in chars {
        buf.extend_from_slice(&(c as u16).to_le_bytes());
    }
}

/// Builds the smallest legal dictionary file: a valid header with every
/// region empty and zero stems blocks. Good for exercising code paths
/// that don't need actual stems (sentence wrapper plumbing, CLI wiring).
pub(crate) fn empty_lexicon() -> Lexicon<SliceSource> {
    Lexicon::from_bytes(empty_lexicon_bytes()).expect("empty lexicon fixture must parse")
}

fn empty_lexicon_bytes() -> Vec<u8> {
    let mut buf = Vec::new();

    buf.extend_from_slice(&crate::lexicon::header::MAGIC.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // format_version
    buf.push(0); // strings_include_trailing_zero
    buf.push(1); // suffix_class_id_width

    let region = |buf: &mut Vec<u8>| {
        buf.extend_from_slice(&0u32.to_le_bytes()); // offset
        buf.extend_from_slice(&0u32.to_le_bytes()); // count
    };

    region(&mut buf); // endings
    region(&mut buf); // forms
    region(&mut buf); // ending_groups
    buf.extend_from_slice(&0u32.to_le_bytes()); // form_group_data_offset
    buf.extend_from_slice(&0u32.to_le_bytes()); // form_group_data_len
    region(&mut buf); // suffixes
    buf.extend_from_slice(&0u32.to_le_bytes()); // suffix_info_offset
    region(&mut buf); // prefixes
    buf.extend_from_slice(&0u32.to_le_bytes()); // prefix_info_offset
    region(&mut buf); // pos_class_strings
    for _ in 0..crate::lexicon::header::CLOSED_CLASS_COUNT {
        region(&mut buf); // closed_classes[i]
    }
    region(&mut buf); // paradigm_table
    region(&mut buf); // hyphenation_annotations
    region(&mut buf); // phonetic_annotations
    region(&mut buf); // analogy

    buf.extend_from_slice(&0u32.to_le_bytes()); // directory_count
    buf.extend_from_slice(&0u32.to_le_bytes()); // directory_offset
    buf.extend_from_slice(&0u32.to_le_bytes()); // key_pool_offset

    buf.extend_from_slice(&1u32.to_le_bytes()); // block_size
    buf.extend_from_slice(&0u32.to_le_bytes()); // block_count

    let blocks_origin = buf.len() as u32 + 4;
    buf.extend_from_slice(&blocks_origin.to_le_bytes());

    buf
}

/// Builds a small but populated dictionary: one stem, "kass" (cat), a
/// single noun paradigm with a nominative (empty ending, "sg n") and a
/// partitive ("i" ending, "sg p") cell, so `analyse`/`synthesise` can run
/// against something real instead of an empty shell.
pub(crate) fn make_dict() -> Lexicon<SliceSource> {
    Lexicon::from_bytes(make_dict_bytes()).expect("populated lexicon fixture must parse")
}

fn make_dict_bytes() -> Vec<u8> {
    let mut body = Vec::new();

    let endings_offset = HEADER_LEN + body.len() as u32;
    write_lp_string(&mut body, ""); // ending 0: empty
    write_lp_string(&mut body, "i"); // ending 1

    let forms_offset = HEADER_LEN + body.len() as u32;
    write_lp_string(&mut body, "sg n"); // form 0
    write_lp_string(&mut body, "sg p"); // form 1

    let ending_groups_offset = HEADER_LEN + body.len() as u32;
    body.extend_from_slice(&2u32.to_le_bytes()); // row_count
    body.extend_from_slice(&0u32.to_le_bytes()); // rows_offset (relative to form_group_data_offset)

    let form_group_data_offset = HEADER_LEN + body.len() as u32;
    body.extend_from_slice(&0u32.to_le_bytes()); // row 0: ending 0 ...
    body.push(1);
    body.extend_from_slice(&0u32.to_le_bytes()); // ... realises form 0
    body.extend_from_slice(&1u32.to_le_bytes()); // row 1: ending 1 ...
    body.push(1);
    body.extend_from_slice(&1u32.to_le_bytes()); // ... realises form 1
    let form_group_data_len = HEADER_LEN + body.len() as u32 - form_group_data_offset;

    let suffixes_offset = HEADER_LEN + body.len() as u32;
    let suffix_info_offset = HEADER_LEN + body.len() as u32;
    let prefixes_offset = HEADER_LEN + body.len() as u32;
    let prefix_info_offset = HEADER_LEN + body.len() as u32;

    let pos_class_strings_offset = HEADER_LEN + body.len() as u32;
    write_lp_string(&mut body, "S"); // pos_class 0: one noun homonym

    let closed_class_offset = HEADER_LEN + body.len() as u32; // all four empty, same offset

    let paradigm_table_offset = HEADER_LEN + body.len() as u32;
    body.push(1); // cell_count
    body.extend_from_slice(&0u32.to_le_bytes()); // end_group
    write_lp_string(&mut body, ""); // stem_delta (no rewrite between the paradigm's one slot)

    let hyphenation_offset = HEADER_LEN + body.len() as u32;
    let phonetic_offset = HEADER_LEN + body.len() as u32;
    let analogy_offset = HEADER_LEN + body.len() as u32;

    let directory_offset = HEADER_LEN + body.len() as u32;
    body.push(4); // key_len
    body.extend_from_slice(&0u16.to_le_bytes()); // key_offset_chars

    let key_pool_offset = HEADER_LEN + body.len() as u32;
    for c in "kass".chars() {
        body.extend_from_slice(&(c as u16).to_le_bytes());
    }

    let block_size: u32 = 32;
    let blocks_origin = HEADER_LEN + body.len() as u32;
    let mut block = Vec::new();
    block.extend_from_slice(&0u16.to_le_bytes()); // common_prefix_len
    block.extend_from_slice(&4u16.to_le_bytes()); // extra_len
    block.extend_from_slice(&0u32.to_le_bytes()); // pos_class_id
    for c in "kass".chars() {
        block.extend_from_slice(&(c as u16).to_le_bytes());
    }
    block.push(1); // homonym_count
    block.extend_from_slice(&0u32.to_le_bytes()); // paradigm_id
    block.extend_from_slice(&0u16.to_le_bytes()); // within_paradigm_index
    block.extend_from_slice(&0u16.to_le_bytes()); // hyphenation_class
    block.extend_from_slice(&0u16.to_le_bytes()); // phonetic_class
    block.extend_from_slice(&0xFFFFu16.to_le_bytes()); // sentinel
    block.resize(block_size as usize, 0);
    body.extend_from_slice(&block);

    let mut buf = Vec::with_capacity(HEADER_LEN as usize + body.len());
    buf.extend_from_slice(&crate::lexicon::header::MAGIC.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // format_version
    buf.push(0); // strings_include_trailing_zero
    buf.push(1); // suffix_class_id_width

    let region = |buf: &mut Vec<u8>, offset: u32, count: u32| {
        buf.extend_from_slice(&offset.to_le_bytes());
        buf.extend_from_slice(&count.to_le_bytes());
    };

    region(&mut buf, endings_offset, 2);
    region(&mut buf, forms_offset, 2);
    region(&mut buf, ending_groups_offset, 1);
    buf.extend_from_slice(&form_group_data_offset.to_le_bytes());
    buf.extend_from_slice(&form_group_data_len.to_le_bytes());
    region(&mut buf, suffixes_offset, 0);
    buf.extend_from_slice(&suffix_info_offset.to_le_bytes());
    region(&mut buf, prefixes_offset, 0);
    buf.extend_from_slice(&prefix_info_offset.to_le_bytes());
    region(&mut buf, pos_class_strings_offset, 1);
    for _ in 0..crate::lexicon::header::CLOSED_CLASS_COUNT {
        region(&mut buf, closed_class_offset, 0);
    }
    region(&mut buf, paradigm_table_offset, 1);
    region(&mut buf, hyphenation_offset, 0);
    region(&mut buf, phonetic_offset, 0);
    region(&mut buf, analogy_offset, 0);

    buf.extend_from_slice(&1u32.to_le_bytes()); // directory_count
    buf.extend_from_slice(&directory_offset.to_le_bytes());
    buf.extend_from_slice(&key_pool_offset.to_le_bytes());

    buf.extend_from_slice(&block_size.to_le_bytes());
    buf.extend_from_slice(&1u32.to_le_bytes()); // block_count
    buf.extend_from_slice(&blocks_origin.to_le_bytes());

    buf.extend_from_slice(&body);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{analyse_with_flags, AnalyseFlags};
    use crate::morph::forms::PartOfSpeech;
    use crate::synth::{synthesise, SynthesiseRequest};

    #[test]
    fn empty_lexicon_parses_and_has_no_stems() {
        let lexicon = empty_lexicon();
        assert_eq!(lexicon.header.block_count, 0);
        assert!(lexicon.directory.is_empty());
    }

    #[test]
    fn make_dict_parses_and_has_one_stem() {
        let lexicon = make_dict();
        assert_eq!(lexicon.header.block_count, 1);
        assert_eq!(lexicon.directory.0, vec!["kass".to_string()]);
    }

    #[test]
    fn dictionary_stem_analyses_as_its_empty_ending_reading() {
        let mut lexicon = make_dict();
        let set = analyse_with_flags(&mut lexicon, "kass", AnalyseFlags::default()).unwrap();
        assert!(set.0.iter().any(|a| a.pos == PartOfSpeech::Noun
            && a.form.as_str() == "sg n"
            && a.ending_string.is_empty()));
    }

    #[test]
    fn synthesise_then_analyse_round_trips_through_the_same_paradigm() {
        let mut lexicon = make_dict();
        let req = SynthesiseRequest {
            lemma: "kass",
            pos: PartOfSpeech::Noun,
            form_set: &["sg p".to_string()],
            clitic: None,
            paradigm_example: None,
            guess: false,
            phonetic: false,
        };
        let surfaces = synthesise(&mut lexicon, &req).unwrap();
        assert_eq!(surfaces, vec!["kassi".to_string()]);

        let set = analyse_with_flags(&mut lexicon, "kassi", AnalyseFlags::default()).unwrap();
        assert!(set
            .0
            .iter()
            .any(|a| a.pos == PartOfSpeech::Noun && a.form.as_str() == "sg p"));
    }
}
