// Token model shared by every stage of the codec.
//
// A compressed body is a run of flag bytes, each governing up to eight
// tokens. Every token is either a literal byte or a back-reference into
// output already produced.

// ---------------------------------------------------------------------------
// Format constants
// ---------------------------------------------------------------------------

/// History window capacity, fixed by the format.
pub const WINDOW_SIZE: usize = 4096;

/// Shortest back-reference either variant can represent.
pub const MATCH_MIN: usize = 3;

/// Longest variant-10 match (4-bit length field plus the implicit 3).
pub const LZ10_MATCH_MAX: usize = MATCH_MIN + 0xF;

/// Variant-11 inline tier ceiling (`indicator + 1` with a 4-bit indicator).
pub const LZ11_INLINE_MAX: usize = 0x10;

/// Variant-11 8-bit extended tier ceiling (`0x11` bias plus 8 length bits).
pub const LZ11_EXTENDED_MAX: usize = 0x110;

/// Longest variant-11 match (`0x111` bias plus 16 length bits).
pub const LZ11_MATCH_MAX: usize = 0x111 + 0xFFFF;

/// Tokens grouped under one flag byte.
pub const FLAG_GROUP: usize = 8;

/// Filler byte used to pad the encoded body to a 4-byte multiple.
pub const PAD_BYTE: u8 = 0xFF;

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// One decoded unit of the compressed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A byte copied through unchanged.
    Literal(u8),
    /// A back-reference: copy `length` bytes, each read `displacement`
    /// bytes behind the current write position.
    Match { length: usize, displacement: usize },
}

impl Token {
    /// Is this a back-reference?
    #[inline]
    pub fn is_match(&self) -> bool {
        matches!(self, Token::Match { .. })
    }

    /// Bytes of output this token expands to.
    #[inline]
    pub fn output_len(&self) -> usize {
        match *self {
            Token::Literal(_) => 1,
            Token::Match { length, .. } => length,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
