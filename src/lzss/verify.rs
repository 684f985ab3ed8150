// Structural verifier.
//
// Replays the tokenizer's parsing rules without materializing any
// output: only a running length is tracked. Batch validation of large
// file sets does not need the decoded bytes, just the guarantee that a
// decoder would accept the stream.

use thiserror::Error;

use super::header::{CompressionHeader, FormatError, HEADER_LEN, Variant};
use super::token::Token;
use super::tokenizer::{DispMode, Lz10Tokens, Lz11Tokens, TokenAt, Tokens};

// ---------------------------------------------------------------------------
// Verification error
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("not an LZSS-compressed file (tag {0:#04x})")]
    NotLzss(u8),

    #[error("input too short for a compression header: {0} bytes")]
    Truncated(usize),

    #[error(
        "displacement reaches before the stream start: length {length:#x}, \
         displacement {displacement:#x}, token at {offset:#x}, flag byte at {flag_offset:#x}"
    )]
    DisplacementUnderflow {
        length: usize,
        displacement: usize,
        /// File offset of the offending token.
        offset: usize,
        /// File offset of its flag byte.
        flag_offset: usize,
    },

    #[error("decompressed size does not match: got {got:#x}, expected {expected:#x}")]
    SizeMismatch { got: usize, expected: usize },
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Successful verification summary.
#[derive(Debug, Clone, Copy)]
pub struct VerifyReport {
    pub variant: Variant,
    pub decompressed_size: usize,
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verify a standalone compressed file without decompressing it.
pub fn verify(data: &[u8]) -> Result<VerifyReport, VerificationError> {
    let header = CompressionHeader::parse(data).map_err(|e| match e {
        FormatError::UnknownTag(tag) => VerificationError::NotLzss(tag),
        _ => VerificationError::Truncated(data.len()),
    })?;
    let expected = header.decompressed_size;

    let body = &data[HEADER_LEN..];
    let tokens = match header.variant {
        Variant::Lz10 => Tokens::Lz10(Lz10Tokens::new(body, expected, DispMode::Standalone)),
        Variant::Lz11 => Tokens::Lz11(Lz11Tokens::new(body, expected)),
    };

    let mut length = 0usize;
    for TokenAt {
        token,
        offset,
        flag_offset,
    } in tokens
    {
        match token {
            Token::Literal(_) => length += 1,
            Token::Match {
                length: count,
                displacement,
            } => {
                if displacement > length {
                    return Err(VerificationError::DisplacementUnderflow {
                        length,
                        displacement,
                        offset: offset + HEADER_LEN,
                        flag_offset: flag_offset + HEADER_LEN,
                    });
                }
                length += count;
            }
        }
    }

    if length != expected {
        return Err(VerificationError::SizeMismatch {
            got: length,
            expected,
        });
    }

    Ok(VerifyReport {
        variant: header.variant,
        decompressed_size: expected,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lzss::encoder::compress;

    #[test]
    fn accepts_encoder_output() {
        let input = b"around the rugged rock the ragged rascal ran";
        for variant in [Variant::Lz10, Variant::Lz11] {
            let packed = compress(input, variant).unwrap();
            let report = verify(&packed).unwrap();
            assert_eq!(report.variant, variant);
            assert_eq!(report.decompressed_size, input.len());
        }
    }

    #[test]
    fn rejects_unknown_tag() {
        let err = verify(&[0x42, 0x00, 0x00, 0x00, 0x00]).unwrap_err();
        assert!(matches!(err, VerificationError::NotLzss(0x42)));
    }

    #[test]
    fn rejects_truncated_input() {
        let err = verify(&[0x10]).unwrap_err();
        assert!(matches!(err, VerificationError::Truncated(1)));
    }

    #[test]
    fn rejects_short_stream() {
        // Declared size 8 but only two literals in the body.
        let err = verify(&[0x10, 0x08, 0x00, 0x00, 0x00, b'a', b'b']).unwrap_err();
        assert!(matches!(
            err,
            VerificationError::SizeMismatch {
                got: 2,
                expected: 8
            }
        ));
    }

    #[test]
    fn rejects_displacement_before_start() {
        // First token is a match: nothing has been produced yet, and the
        // diagnostic points at the token and its flag byte.
        let data = [0x10, 0x14, 0x00, 0x00, 0x80, 0xD0, 0x03];
        let err = verify(&data).unwrap_err();
        match err {
            VerificationError::DisplacementUnderflow {
                length,
                displacement,
                offset,
                flag_offset,
            } => {
                assert_eq!(length, 0);
                assert_eq!(displacement, 4);
                assert_eq!(offset, 5);
                assert_eq!(flag_offset, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn corrupted_displacement_is_caught() {
        // Valid stream, then widen the match displacement so it reaches
        // before the start of the output.
        let mut packed = compress(&b"abcd".repeat(5), Variant::Lz10).unwrap();
        assert!(verify(&packed).is_ok());
        // Body: flag 0x08, 4 literals, then the 16-bit match field.
        packed[9] = 0xD0 | 0x0F; // displacement high nibble -> 0xF03 + 1
        packed[10] = 0xFF;
        let err = verify(&packed).unwrap_err();
        assert!(matches!(
            err,
            VerificationError::DisplacementUnderflow { .. }
        ));
    }
}
