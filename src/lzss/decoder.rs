// Token-resolving decoder.
//
// Consumes a tokenizer's output and materializes the declared number of
// bytes: literals append themselves, matches copy from earlier output.
// Self-overlapping matches are legal and required, so match copies stay
// byte-by-byte — each read must be able to see bytes written earlier in
// the same match.

use log::debug;
use thiserror::Error;

use super::header::{CompressionHeader, FormatError, HEADER_LEN, Variant};
use super::token::Token;
use super::tokenizer::{DispMode, Lz10Tokens, Lz11Tokens, TokenAt, Tokens};

// ---------------------------------------------------------------------------
// Decoder error
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("compressed stream too short: produced {got} of {expected} bytes")]
    TooShort { got: usize, expected: usize },

    #[error("declared size exceeded mid-token: produced {got} of {expected} bytes")]
    Overrun { got: usize, expected: usize },

    #[error(
        "match displacement {displacement} reaches before the output start \
         ({written} bytes written, token at body offset {offset:#x})"
    )]
    BadDisplacement {
        displacement: usize,
        written: usize,
        offset: usize,
    },
}

// ---------------------------------------------------------------------------
// Header-driven entry point
// ---------------------------------------------------------------------------

/// Decompress a standalone compressed file (4-byte header plus body).
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let header = CompressionHeader::parse(data)?;
    debug!(
        "decompressing {} stream, declared size {}",
        header.variant, header.decompressed_size
    );
    let body = &data[HEADER_LEN..];
    match header.variant {
        Variant::Lz10 => {
            decompress_raw_lzss10(body, header.decompressed_size, DispMode::Standalone)
        }
        Variant::Lz11 => decompress_raw_lzss11(body, header.decompressed_size),
    }
}

// ---------------------------------------------------------------------------
// Raw (headerless) entry points
// ---------------------------------------------------------------------------

/// Decompress a headerless variant-10 body to exactly `decompressed_size`
/// bytes. `mode` selects the displacement bias (overlay streams use 3).
pub fn decompress_raw_lzss10(
    data: &[u8],
    decompressed_size: usize,
    mode: DispMode,
) -> Result<Vec<u8>, DecodeError> {
    resolve_tokens(
        Tokens::Lz10(Lz10Tokens::new(data, decompressed_size, mode)),
        decompressed_size,
    )
}

/// Decompress a headerless variant-11 body to exactly `decompressed_size`
/// bytes.
pub fn decompress_raw_lzss11(
    data: &[u8],
    decompressed_size: usize,
) -> Result<Vec<u8>, DecodeError> {
    resolve_tokens(
        Tokens::Lz11(Lz11Tokens::new(data, decompressed_size)),
        decompressed_size,
    )
}

// ---------------------------------------------------------------------------
// Token resolution
// ---------------------------------------------------------------------------

fn resolve_tokens(tokens: Tokens<'_>, decompressed_size: usize) -> Result<Vec<u8>, DecodeError> {
    let mut out: Vec<u8> = Vec::with_capacity(decompressed_size);

    for TokenAt { token, offset, .. } in tokens {
        match token {
            Token::Literal(b) => out.push(b),
            Token::Match {
                length,
                displacement,
            } => {
                if displacement > out.len() {
                    return Err(DecodeError::BadDisplacement {
                        displacement,
                        written: out.len(),
                        offset,
                    });
                }
                for _ in 0..length {
                    let b = out[out.len() - displacement];
                    out.push(b);
                }
            }
        }
    }

    if out.len() < decompressed_size {
        return Err(DecodeError::TooShort {
            got: out.len(),
            expected: decompressed_size,
        });
    }
    if out.len() > decompressed_size {
        return Err(DecodeError::Overrun {
            got: out.len(),
            expected: decompressed_size,
        });
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
