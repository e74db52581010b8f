//! Byte-packed I/O primitives (component A).
//!
//! All multi-byte fields on disk are little-endian; this module
//! recombines bytes explicitly rather than trusting host endianness,
//! exactly as the original analyser did.

use crate::errors::LexiconError;

/// The on-disk sentinel marking end-of-block in the stems area.
pub const BLOCK_SENTINEL: u16 = 0xFFFF;

/// A cursor over a borrowed byte slice. Every region of the lexicon file
/// (header, pools, the currently cached stems block) is read through one
/// of these; none of them own their bytes, which keeps the "lexicon owns
/// cache owns buffer" ownership graph acyclic.
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn at(bytes: &'a [u8], pos: usize) -> Self {
        Self { bytes, pos }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn need(&self, n: usize) -> Result<(), LexiconError> {
        if self.remaining() < n {
            Err(LexiconError::ShortRead {
                wanted: n,
                available: self.remaining(),
            })
        } else {
            Ok(())
        }
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], LexiconError> {
        self.need(n)?;
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn skip(&mut self, n: usize) -> Result<(), LexiconError> {
        self.read_bytes(n).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8, LexiconError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, LexiconError> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, LexiconError> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_f32(&mut self) -> Result<f32, LexiconError> {
        let b = self.read_bytes(4)?;
        Ok(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// One fixed-width (2 bytes on disk) character, widened to `char`.
    /// Fails on UTF-16 surrogate code points: those are not valid Unicode
    /// scalar values, so decoding fails whenever a 16-bit code unit can't
    /// widen to one (the on-disk width never exceeds the BMP; the only
    /// way that happens is a surrogate).
    pub fn read_char(&mut self) -> Result<char, LexiconError> {
        let code = self.read_u16()? as u32;
        char::from_u32(code).ok_or(LexiconError::CharOutOfRange(code))
    }

    /// Like `read_char` but recognises the block-area sentinel instead of
    /// treating it as a failure; returns `None` on the sentinel.
    pub fn read_char_or_sentinel(&mut self) -> Result<Option<char>, LexiconError> {
        let code = self.read_u16()?;
        if code == BLOCK_SENTINEL {
            return Ok(None);
        }
        Ok(Some(
            char::from_u32(code as u32).ok_or(LexiconError::CharOutOfRange(code as u32))?,
        ))
    }

    /// A run of `count` fixed-width characters.
    pub fn read_wide_chars(&mut self, count: usize) -> Result<Vec<char>, LexiconError> {
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(self.read_char()?);
        }
        Ok(out)
    }

    /// A length-prefixed string: a `u32` character count followed by that
    /// many 2-byte characters. `trailing_zero_included` must come from the
    /// header -- the loader follows the header, never guesses.
    pub fn read_length_prefixed_string(
        &mut self,
        trailing_zero_included: bool,
    ) -> Result<String, LexiconError> {
        let count = self.read_u32()? as usize;
        let chars = self.read_wide_chars(count)?;
        let s: String = if trailing_zero_included {
            chars
                .into_iter()
                .take_while(|&c| c != '\0')
                .collect()
        } else {
            chars.into_iter().collect()
        };
        Ok(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_le_integers() {
        let bytes = [0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0xFF];
        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.read_u16().unwrap(), 1);
        assert_eq!(r.read_u32().unwrap(), 2);
        assert_eq!(r.read_u8().unwrap(), 0xFF);
    }

    #[test]
    fn short_read_is_an_error() {
        let bytes = [0x01];
        let mut r = ByteReader::new(&bytes);
        assert!(matches!(
            r.read_u16(),
            Err(LexiconError::ShortRead { wanted: 2, available: 1 })
        ));
    }

    #[test]
    fn surrogate_code_point_fails_to_widen() {
        let bytes = 0xD800u16.to_le_bytes();
        let mut r = ByteReader::new(&bytes);
        assert!(matches!(r.read_char(), Err(LexiconError::CharOutOfRange(0xD800))));
    }

    #[test]
    fn sentinel_is_recognised() {
        let bytes = BLOCK_SENTINEL.to_le_bytes();
        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.read_char_or_sentinel().unwrap(), None);
    }

    #[test]
    fn length_prefixed_string_respects_trailing_zero_flag() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&4u32.to_le_bytes());
        for c in ['h', 'i', '!', '\0'] {
            bytes.extend_from_slice(&(c as u16).to_le_bytes());
        }
        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.read_length_prefixed_string(true).unwrap(), "hi!");

        let mut r2 = ByteReader::new(&bytes);
        assert_eq!(r2.read_length_prefixed_string(false).unwrap(), "hi!\0");
    }
}
