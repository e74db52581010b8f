//! Stem search (component D): binary-search the directory for the block
//! a stem would live in, then linearly walk that block's delta-encoded
//! prefix records.
//!
//! Directory comparison is grounded on `cTYVEDETABEL::KOtsi` in the
//! original source: a byte-by-byte compare up to the shared prefix
//! length, falling back to a length comparison on a full prefix match.
//! That is exactly what `Ord for str` already does (`"ab" < "abc"`), so
//! the directory is just a sorted `Vec<String>` searched with
//! `binary_search`.

use crate::errors::LexiconError;
use crate::lexicon::header::Header;
use crate::lexicon::io::ByteReader;
use crate::lexicon::tables::{ParadigmId, StemHomonym};

/// Outcome of looking up one stem string.
#[derive(Debug, Clone, PartialEq)]
pub enum StemLookup {
    /// `s` is present; `pos_class_id` selects the POS-class string whose
    /// length gives the homonym count, `homonyms` carries one entry per
    /// reading.
    Hit {
        pos_class_id: u32,
        homonyms: Vec<StemHomonym>,
    },
    /// Not present in this block, but a longer prefix sharing this one's
    /// lead could still occur later in the block.
    NotHere,
    /// No stem with this prefix can occur anywhere in the dictionary.
    NotAnywhere,
}

/// Locates the directory entry / block a stem prefix would fall into.
/// Returns `None` for a zero-length stem (a miss, reported as
/// `NotAnywhere` by the caller).
pub(crate) fn locate_block(directory: &[String], s: &str) -> Option<usize> {
    if s.is_empty() {
        return None;
    }
    match directory.binary_search_by(|key| key.as_str().cmp(s)) {
        Ok(idx) => Some(idx),
        Err(0) => Some(0),
        Err(idx) => Some(idx - 1),
    }
}

/// Walks one decoded block looking for `s`.
///
/// `k` is "characters of `s` matched so far by the reconstructed stem
/// chain". Because records are delta-encoded against their immediate
/// predecessor and stored in lexicographic order, a record whose
/// `common_prefix_len` undershoots `k` has already diverged from `s`
/// earlier than the predecessor did, which (given the sort order) means
/// no later record can match `s` either. A record whose own reconstructed
/// stem sorts before `s` does not end the walk -- only a record that
/// sorts *after* `s`, or the block sentinel, does.
pub(crate) fn walk_block(block: &[u8], s: &str) -> Result<StemLookup, LexiconError> {
    let target: Vec<char> = s.chars().collect();
    let mut r = ByteReader::new(block);
    let mut reconstructed: Vec<char> = Vec::new();
    let mut k: usize = 0;

    loop {
        if r.is_at_end() {
            return Ok(StemLookup::NotHere);
        }

        let common_prefix_len = match r.read_char_or_sentinel()? {
            None => return Ok(StemLookup::NotHere),
            Some(c) => c as usize,
        };
        if common_prefix_len < k {
            return Ok(StemLookup::NotAnywhere);
        }

        let extra_len = r.read_u16()? as usize;
        let pos_class_id = r.read_u32()?;
        let extra_chars = r.read_wide_chars(extra_len)?;

        if common_prefix_len > target.len() {
            return Ok(StemLookup::NotHere);
        }

        reconstructed.truncate(common_prefix_len);
        reconstructed.extend_from_slice(&extra_chars);

        // The homonym count comes from the POS-class string this record
        // points at, which the stems area does not itself store; it is
        // written right after `pos_class_id` so a walk can stay
        // positioned without consulting the pos-class table.
        let homonym_count = r.read_u8()? as usize;
        let mut homonyms = Vec::with_capacity(homonym_count);
        for _ in 0..homonym_count {
            homonyms.push(StemHomonym {
                paradigm_id: r.read_u32()? as ParadigmId,
                within_paradigm_index: r.read_u16()?,
                hyphenation_class: r.read_u16()?,
                phonetic_class: r.read_u16()?,
            });
        }

        let compare_len = (target.len().saturating_sub(common_prefix_len)).min(extra_chars.len());
        let extra_slice = &extra_chars[..compare_len];
        let target_slice = &target[common_prefix_len..common_prefix_len + compare_len];
        let diverge_at = extra_slice.iter().zip(target_slice).position(|(a, b)| a != b);

        match diverge_at {
            None => {
                let reconstructed_len = common_prefix_len + extra_chars.len();
                if reconstructed_len == target.len() {
                    return Ok(StemLookup::Hit {
                        pos_class_id,
                        homonyms,
                    });
                }
                if reconstructed_len > target.len() {
                    // reconstructed is a strict extension of `s`, which sorts
                    // after `s`: no later record can be `s` either.
                    return Ok(StemLookup::NotHere);
                }
                // reconstructed is a strict prefix of `s`; keep walking.
                k = reconstructed_len;
            }
            Some(i) => {
                if extra_slice[i] < target_slice[i] {
                    // This record sorts before `s` -- a match can still turn
                    // up later in the block.
                    k = common_prefix_len + i;
                } else {
                    // This record sorts after `s`: nothing later can match.
                    return Ok(StemLookup::NotHere);
                }
            }
        }
    }
}

/// Runs the full stem search: directory lookup, then block walk.
pub fn stem_search<F>(
    header: &Header,
    directory: &[String],
    s: &str,
    mut load_block: F,
) -> Result<StemLookup, LexiconError>
where
    F: FnMut(u32) -> Result<Vec<u8>, LexiconError>,
{
    let block_id = match locate_block(directory, s) {
        None => return Ok(StemLookup::NotAnywhere),
        Some(idx) => idx as u32,
    };
    if block_id >= header.block_count {
        return Ok(StemLookup::NotAnywhere);
    }
    let block = load_block(block_id)?;
    walk_block(&block, s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locates_block_for_exact_and_between_keys() {
        let dir = vec!["kala".to_string(), "maja".to_string(), "puu".to_string()];
        assert_eq!(locate_block(&dir, "maja"), Some(1));
        assert_eq!(locate_block(&dir, "mati"), Some(1));
        assert_eq!(locate_block(&dir, "aa"), Some(0));
        assert_eq!(locate_block(&dir, ""), None);
    }

    fn encode_record(common_prefix_len: u16, extra: &str, pos_class_id: u32, homonyms: u8) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&common_prefix_len.to_le_bytes());
        out.extend_from_slice(&(extra.chars().count() as u16).to_le_bytes());
        out.extend_from_slice(&pos_class_id.to_le_bytes());
        for c in extra.chars() {
            out.extend_from_slice(&(c as u16).to_le_bytes());
        }
        out.push(homonyms);
        for _ in 0..homonyms {
            out.extend_from_slice(&1u32.to_le_bytes()); // paradigm_id
            out.extend_from_slice(&0u16.to_le_bytes()); // within_paradigm_index
            out.extend_from_slice(&0u16.to_le_bytes()); // hyphenation_class
            out.extend_from_slice(&0u16.to_le_bytes()); // phonetic_class
        }
        out
    }

    #[test]
    fn finds_exact_stem_in_block() {
        let mut block = encode_record(0, "maja", 3, 1);
        block.extend_from_slice(&0xFFFFu16.to_le_bytes());
        let result = walk_block(&block, "maja").unwrap();
        assert!(matches!(result, StemLookup::Hit { pos_class_id: 3, .. }));
    }

    #[test]
    fn missing_stem_past_sentinel_is_not_here() {
        let mut block = encode_record(0, "maja", 3, 1);
        block.extend_from_slice(&0xFFFFu16.to_le_bytes());
        let result = walk_block(&block, "puu").unwrap();
        assert_eq!(result, StemLookup::NotHere);
    }

    #[test]
    fn a_record_sorting_before_the_target_does_not_end_the_walk() {
        // "kala" then "maja", in that (sorted) order, searching for "maja":
        // the first record diverges from "maja" at index 0 but sorts before
        // it, so the walk must keep going instead of quitting early.
        let mut block = encode_record(0, "kala", 1, 0);
        block.extend_from_slice(&encode_record(0, "maja", 3, 1));
        block.extend_from_slice(&0xFFFFu16.to_le_bytes());
        let result = walk_block(&block, "maja").unwrap();
        assert!(matches!(result, StemLookup::Hit { pos_class_id: 3, .. }));
    }

    #[test]
    fn a_record_sorting_after_the_target_ends_the_walk() {
        let mut block = encode_record(0, "puu", 1, 0);
        block.extend_from_slice(&0xFFFFu16.to_le_bytes());
        let result = walk_block(&block, "maja").unwrap();
        assert_eq!(result, StemLookup::NotHere);
    }
}
