// Per-variant tokenizers.
//
// Each tokenizer walks a compressed body (the bytes just past the 4-byte
// header) and yields tokens lazily, most-significant flag bit first. The
// sequence ends when the declared decompressed size has been accounted
// for or the body runs out of bytes — a short stream is not an error
// here; the decoder and verifier report it through their size checks.

use super::token::{FLAG_GROUP, Token};

// ---------------------------------------------------------------------------
// Displacement mode (variant 10 only)
// ---------------------------------------------------------------------------

/// Displacement bias applied when decoding variant-10 matches.
///
/// Standalone streams store `displacement - 1`; streams inside an overlay
/// frame store `displacement - 3`. The asymmetry is a property of the
/// historical overlay compressor and must be selected by the caller,
/// never inferred from the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispMode {
    #[default]
    Standalone,
    Overlay,
}

impl DispMode {
    #[inline]
    pub(crate) fn disp_extra(self) -> usize {
        match self {
            DispMode::Standalone => 1,
            DispMode::Overlay => 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Positioned token
// ---------------------------------------------------------------------------

/// A token plus where it sits in the compressed body.
///
/// Offsets are relative to the start of the body slice; callers working
/// with whole files add the header length themselves.
#[derive(Debug, Clone, Copy)]
pub struct TokenAt {
    pub token: Token,
    /// Offset of the token's first byte.
    pub offset: usize,
    /// Offset of the flag byte governing this token.
    pub flag_offset: usize,
}

// ---------------------------------------------------------------------------
// Shared flag-bit cursor
// ---------------------------------------------------------------------------

/// Cursor state common to both variants: byte position, remaining flag
/// bits, and the running total of output bytes accounted for.
#[derive(Debug)]
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    decompressed_size: usize,
    produced: usize,
    flags: u8,
    flags_left: u8,
    flag_offset: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8], decompressed_size: usize) -> Self {
        Self {
            data,
            pos: 0,
            decompressed_size,
            produced: 0,
            flags: 0,
            flags_left: 0,
            flag_offset: 0,
        }
    }

    #[inline]
    fn byte(&mut self) -> Option<u8> {
        let b = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(b)
    }

    /// Pull the next flag bit, reading a fresh flag byte when the current
    /// group of eight is spent. A `0x00` flag byte simply yields eight
    /// literal flags; the historical all-literal shortcut needs no
    /// special case.
    fn flag(&mut self) -> Option<bool> {
        if self.flags_left == 0 {
            self.flag_offset = self.pos;
            self.flags = self.byte()?;
            self.flags_left = FLAG_GROUP as u8;
        }
        let is_match = self.flags & 0x80 != 0;
        self.flags <<= 1;
        self.flags_left -= 1;
        Some(is_match)
    }

    #[inline]
    fn finished(&self) -> bool {
        self.produced >= self.decompressed_size
    }
}

// ---------------------------------------------------------------------------
// Variant 10
// ---------------------------------------------------------------------------

/// Lazy token sequence for a variant-10 body.
#[derive(Debug)]
pub struct Lz10Tokens<'a> {
    cursor: Cursor<'a>,
    disp_extra: usize,
}

impl<'a> Lz10Tokens<'a> {
    pub fn new(data: &'a [u8], decompressed_size: usize, mode: DispMode) -> Self {
        Self {
            cursor: Cursor::new(data, decompressed_size),
            disp_extra: mode.disp_extra(),
        }
    }
}

impl Iterator for Lz10Tokens<'_> {
    type Item = TokenAt;

    fn next(&mut self) -> Option<TokenAt> {
        if self.cursor.finished() {
            return None;
        }
        let is_match = self.cursor.flag()?;
        let offset = self.cursor.pos;
        let token = if is_match {
            let hi = self.cursor.byte()? as usize;
            let lo = self.cursor.byte()? as usize;
            let sh = hi << 8 | lo;
            Token::Match {
                length: (sh >> 12) + 3,
                displacement: (sh & 0xFFF) + self.disp_extra,
            }
        } else {
            Token::Literal(self.cursor.byte()?)
        };
        self.cursor.produced += token.output_len();
        Some(TokenAt {
            token,
            offset,
            flag_offset: self.cursor.flag_offset,
        })
    }
}

// ---------------------------------------------------------------------------
// Variant 11
// ---------------------------------------------------------------------------

/// Lazy token sequence for a variant-11 body.
///
/// Match lengths use a three-tier encoding selected by the 4-bit
/// indicator of the first match byte: `0` = 8-bit extended length,
/// `1` = 16-bit extended length, anything else is the length itself
/// (minus one). The displacement always sits in the low nibble of the
/// final length byte and the byte after it.
#[derive(Debug)]
pub struct Lz11Tokens<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Lz11Tokens<'a> {
    pub fn new(data: &'a [u8], decompressed_size: usize) -> Self {
        Self {
            cursor: Cursor::new(data, decompressed_size),
        }
    }

    fn read_match(&mut self) -> Option<Token> {
        let b = self.cursor.byte()? as usize;
        let indicator = b >> 4;
        let (length, disp_hi) = match indicator {
            0 => {
                // 8-bit extended length; indicator nibble is zero so the
                // whole first byte contributes.
                let b2 = self.cursor.byte()? as usize;
                ((b << 4 | b2 >> 4) + 0x11, b2)
            }
            1 => {
                let b2 = self.cursor.byte()? as usize;
                let b3 = self.cursor.byte()? as usize;
                (((b & 0xF) << 12 | b2 << 4 | b3 >> 4) + 0x111, b3)
            }
            _ => (indicator + 1, b),
        };
        let trailing = self.cursor.byte()? as usize;
        Some(Token::Match {
            length,
            displacement: ((disp_hi & 0xF) << 8 | trailing) + 1,
        })
    }
}

impl Iterator for Lz11Tokens<'_> {
    type Item = TokenAt;

    fn next(&mut self) -> Option<TokenAt> {
        if self.cursor.finished() {
            return None;
        }
        let is_match = self.cursor.flag()?;
        let offset = self.cursor.pos;
        let token = if is_match {
            self.read_match()?
        } else {
            Token::Literal(self.cursor.byte()?)
        };
        self.cursor.produced += token.output_len();
        Some(TokenAt {
            token,
            offset,
            flag_offset: self.cursor.flag_offset,
        })
    }
}

// ---------------------------------------------------------------------------
// Variant dispatch
// ---------------------------------------------------------------------------

/// Either tokenizer behind one iterator type.
#[derive(Debug)]
pub enum Tokens<'a> {
    Lz10(Lz10Tokens<'a>),
    Lz11(Lz11Tokens<'a>),
}

impl Iterator for Tokens<'_> {
    type Item = TokenAt;

    fn next(&mut self) -> Option<TokenAt> {
        match self {
            Tokens::Lz10(t) => t.next(),
            Tokens::Lz11(t) => t.next(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn collect10(data: &[u8], size: usize, mode: DispMode) -> Vec<Token> {
        Lz10Tokens::new(data, size, mode).map(|t| t.token).collect()
    }

    #[test]
    fn empty_stream_yields_nothing() {
        assert!(collect10(b"\x00", 0, DispMode::Standalone).is_empty());
    }

    #[test]
    fn zero_flag_byte_is_eight_literals() {
        let tokens = collect10(b"\x00abcdefgh", 8, DispMode::Standalone);
        assert_eq!(tokens.len(), 8);
        assert_eq!(tokens[0], Token::Literal(b'a'));
        assert_eq!(tokens[7], Token::Literal(b'h'));
    }

    #[test]
    fn lz10_match_decodes_length_and_displacement() {
        // Flag 0x08: four literals, then one match. sh = 0xD003.
        let tokens = collect10(b"\x08abcd\xd0\x03", 20, DispMode::Standalone);
        assert_eq!(tokens.len(), 5);
        assert_eq!(
            tokens[4],
            Token::Match {
                length: 16,
                displacement: 4
            }
        );
    }

    #[test]
    fn lz10_overlay_mode_biases_displacement() {
        let tokens = collect10(b"\x08abcd\xd0\x03", 20, DispMode::Overlay);
        assert_eq!(
            tokens[4],
            Token::Match {
                length: 16,
                displacement: 6
            }
        );
    }

    #[test]
    fn lz10_stops_at_declared_size() {
        // More body than the declared size needs; the extra byte is padding.
        let tokens = collect10(b"\x00ab\xff", 2, DispMode::Standalone);
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn lz10_short_stream_ends_sequence() {
        // Match field truncated after one byte: the sequence just ends.
        let tokens = collect10(b"\x80\xd0", 20, DispMode::Standalone);
        assert!(tokens.is_empty());
    }

    #[test]
    fn lz11_inline_length() {
        let tokens: Vec<_> = Lz11Tokens::new(b"\x08abcd\xf0\x03", 20)
            .map(|t| t.token)
            .collect();
        assert_eq!(
            tokens[4],
            Token::Match {
                length: 16,
                displacement: 4
            }
        );
    }

    #[test]
    fn lz11_extended_8bit_length() {
        let tokens: Vec<_> = Lz11Tokens::new(b"\x08abcd\x01\x30\x03", 40)
            .map(|t| t.token)
            .collect();
        assert_eq!(
            tokens[4],
            Token::Match {
                length: 36,
                displacement: 4
            }
        );
    }

    #[test]
    fn lz11_extended_16bit_length() {
        let tokens: Vec<_> = Lz11Tokens::new(b"\x08abcd\x10\x07\xb0\x03", 400)
            .map(|t| t.token)
            .collect();
        assert_eq!(
            tokens[4],
            Token::Match {
                length: 396,
                displacement: 4
            }
        );
    }

    #[test]
    fn offsets_track_flag_bytes() {
        let positions: Vec<_> = Lz10Tokens::new(b"\x08abcd\xd0\x03", 20, DispMode::Standalone)
            .map(|t| (t.offset, t.flag_offset))
            .collect();
        assert_eq!(positions[0], (1, 0));
        assert_eq!(positions[4], (5, 0));
    }
}
