// Flag-grouped encoder.
//
// Turns the match finder's token stream back into the binary format:
// a 4-byte header, then chunks of up to eight tokens each led by one
// flag byte (bit = 1 per match, MSB first), then 0xFF filler to a
// 4-byte boundary.

use std::io::{self, Write};

use thiserror::Error;

use super::header::{CompressionHeader, MAX_DECOMPRESSED_SIZE, Variant};
use super::token::{
    FLAG_GROUP, LZ10_MATCH_MAX, LZ11_EXTENDED_MAX, LZ11_INLINE_MAX, LZ11_MATCH_MAX, MATCH_MIN,
    PAD_BYTE, Token, WINDOW_SIZE,
};
use super::tokenizer::DispMode;
use super::window::MatchTokens;

// ---------------------------------------------------------------------------
// Encoder error
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("input of {0} bytes exceeds the 24-bit size field")]
    InputTooLarge(usize),

    /// Out-of-range values here mean the token producer is broken, not
    /// that the user input is bad; the matcher never emits them.
    #[error("match displacement {0} is outside the representable range")]
    DisplacementRange(usize),

    #[error("match length {0} is outside the representable range")]
    LengthRange(usize),
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Compress `input` into a standalone compressed file.
pub fn compress(input: &[u8], variant: Variant) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::with_capacity(input.len() / 2 + 16);
    compress_into(input, variant, &mut out)?;
    Ok(out)
}

/// Compress `input`, writing the header, body, and padding to `w`.
pub fn compress_into<W: Write>(
    input: &[u8],
    variant: Variant,
    w: &mut W,
) -> Result<(), EncodeError> {
    if input.len() > MAX_DECOMPRESSED_SIZE {
        return Err(EncodeError::InputTooLarge(input.len()));
    }

    let header = CompressionHeader {
        variant,
        decompressed_size: input.len(),
    };
    w.write_all(&header.to_bytes())?;

    let match_max = match variant {
        Variant::Lz10 => LZ10_MATCH_MAX,
        Variant::Lz11 => LZ11_MATCH_MAX,
    };

    let mut tokens = MatchTokens::new(input, match_max);
    let mut group: Vec<Token> = Vec::with_capacity(FLAG_GROUP);
    let mut chunk: Vec<u8> = Vec::with_capacity(1 + FLAG_GROUP * 4);
    let mut body_len = 0usize;

    loop {
        group.clear();
        group.extend(tokens.by_ref().take(FLAG_GROUP));
        if group.is_empty() {
            break;
        }

        chunk.clear();
        let mut flags = 0u8;
        for (i, t) in group.iter().enumerate() {
            if t.is_match() {
                flags |= 0x80 >> i;
            }
        }
        chunk.push(flags);

        for &t in &group {
            match t {
                Token::Literal(b) => chunk.push(b),
                Token::Match {
                    length,
                    displacement,
                } => match variant {
                    Variant::Lz10 => {
                        pack_match_lz10(length, displacement, DispMode::Standalone, &mut chunk)?
                    }
                    Variant::Lz11 => pack_match_lz11(length, displacement, &mut chunk)?,
                },
            }
        }

        w.write_all(&chunk)?;
        body_len += chunk.len();
    }

    // Pad the body to a 4-byte multiple.
    let padding = (4 - body_len % 4) % 4;
    w.write_all(&[PAD_BYTE; 3][..padding])?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Per-variant match packing
// ---------------------------------------------------------------------------

/// Pack a variant-10 match as a big-endian 16-bit field:
/// `(length - 3) << 12 | (displacement - disp_extra)`.
fn pack_match_lz10(
    length: usize,
    displacement: usize,
    mode: DispMode,
    out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    if !(MATCH_MIN..=LZ10_MATCH_MAX).contains(&length) {
        return Err(EncodeError::LengthRange(length));
    }
    let extra = mode.disp_extra();
    if displacement < extra || displacement - extra >= WINDOW_SIZE {
        return Err(EncodeError::DisplacementRange(displacement));
    }
    let sh = ((length - MATCH_MIN) << 12 | (displacement - extra)) as u16;
    out.extend_from_slice(&sh.to_be_bytes());
    Ok(())
}

/// Pack a variant-11 match using the narrowest length tier that fits.
fn pack_match_lz11(
    length: usize,
    displacement: usize,
    out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    if !(1..=WINDOW_SIZE).contains(&displacement) {
        return Err(EncodeError::DisplacementRange(displacement));
    }
    if length < MATCH_MIN {
        return Err(EncodeError::LengthRange(length));
    }
    let disp = displacement - 1;
    match length {
        MATCH_MIN..=LZ11_INLINE_MAX => {
            out.push(((length - 1) << 4 | disp >> 8) as u8);
            out.push(disp as u8);
        }
        ..=LZ11_EXTENDED_MAX => {
            let l = length - (LZ11_INLINE_MAX + 1);
            out.push((l >> 4) as u8);
            out.push(((l & 0xF) << 4 | disp >> 8) as u8);
            out.push(disp as u8);
        }
        ..=LZ11_MATCH_MAX => {
            let l = length - (LZ11_EXTENDED_MAX + 1);
            out.push((0x10 | l >> 12) as u8);
            out.push((l >> 4) as u8);
            out.push(((l & 0xF) << 4 | disp >> 8) as u8);
            out.push(disp as u8);
        }
        _ => return Err(EncodeError::LengthRange(length)),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
