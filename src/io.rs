// File-level helpers for the LZSS codec.
//
// Provides `compress_file()`, `decompress_file()`, `decompress_overlay_file()`
// and `verify_file()` convenience functions. LZSS payloads are small (the
// header caps decompressed size at 16 MiB), so files are read whole rather
// than streamed.

use std::path::Path;

use thiserror::Error;

use crate::lzss::decoder::DecodeError;
use crate::lzss::encoder::EncodeError;
use crate::lzss::verify::{self, VerificationError};
use crate::lzss::{self, Variant};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `compress_file()`.
#[derive(Debug, Clone)]
pub struct CompressStats {
    /// Format variant written.
    pub variant: Variant,
    /// Input file size in bytes.
    pub input_size: u64,
    /// Compressed output size in bytes, including the 4-byte header.
    pub output_size: u64,
}

impl CompressStats {
    /// Compressed size as a fraction of the input size.
    pub fn ratio(&self) -> f64 {
        if self.input_size == 0 {
            return 1.0;
        }
        self.output_size as f64 / self.input_size as f64
    }
}

/// Statistics returned by `decompress_file()` and `decompress_overlay_file()`.
#[derive(Debug, Clone)]
pub struct DecompressStats {
    /// Compressed input size in bytes.
    pub input_size: u64,
    /// Decompressed output size in bytes.
    pub output_size: u64,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file-level operations.
#[derive(Debug, Error)]
pub enum IoError {
    /// I/O error (file open, read, write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Compression error.
    #[error("compress error: {0}")]
    Encode(#[from] EncodeError),
    /// Decompression error.
    #[error("decompress error: {0}")]
    Decode(#[from] DecodeError),
    /// Verification failure.
    #[error("verify error: {0}")]
    Verify(#[from] VerificationError),
}

// ---------------------------------------------------------------------------
// compress_file
// ---------------------------------------------------------------------------

/// Compress `input_path` into a headered LZSS file at `output_path`.
pub fn compress_file(
    input_path: &Path,
    output_path: &Path,
    variant: Variant,
) -> Result<CompressStats, IoError> {
    let input = std::fs::read(input_path)?;
    let packed = lzss::compress(&input, variant)?;
    std::fs::write(output_path, &packed)?;

    Ok(CompressStats {
        variant,
        input_size: input.len() as u64,
        output_size: packed.len() as u64,
    })
}

// ---------------------------------------------------------------------------
// decompress_file
// ---------------------------------------------------------------------------

/// Decompress a headered LZSS file at `input_path` to `output_path`.
///
/// The variant is selected by the header tag byte.
pub fn decompress_file(input_path: &Path, output_path: &Path) -> Result<DecompressStats, IoError> {
    let input = std::fs::read(input_path)?;
    let unpacked = lzss::decompress(&input)?;
    std::fs::write(output_path, &unpacked)?;

    Ok(DecompressStats {
        input_size: input.len() as u64,
        output_size: unpacked.len() as u64,
    })
}

/// Decompress an overlay-framed file (trailer at the end, backward stream)
/// at `input_path` to `output_path`.
pub fn decompress_overlay_file(
    input_path: &Path,
    output_path: &Path,
) -> Result<DecompressStats, IoError> {
    let input = std::fs::read(input_path)?;
    let unpacked = lzss::decompress_overlay(&input)?;
    std::fs::write(output_path, &unpacked)?;

    Ok(DecompressStats {
        input_size: input.len() as u64,
        output_size: unpacked.len() as u64,
    })
}

// ---------------------------------------------------------------------------
// verify_file
// ---------------------------------------------------------------------------

/// Statistics returned by `verify_file()`.
#[derive(Debug, Clone)]
pub struct VerifyStats {
    /// Format variant found in the header.
    pub variant: Variant,
    /// Declared decompressed size.
    pub decompressed_size: u64,
    /// Compressed file size in bytes.
    pub input_size: u64,
}

/// Verify the headered LZSS file at `path` without materializing output.
pub fn verify_file(path: &Path) -> Result<VerifyStats, IoError> {
    let input = std::fs::read(path)?;
    let report = verify::verify(&input)?;

    Ok(VerifyStats {
        variant: report.variant,
        decompressed_size: report.decompressed_size as u64,
        input_size: input.len() as u64,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
