// LZSS format implementation.
//
// This module provides encoding, decoding, and structural verification
// of the LZSS10/LZSS11 formats used in console ROM binaries, plus the
// backward overlay framing used for in-place decompression of ARM
// binary sections.
//
// # Modules
//
// - `token`     — Literal/Match token model and format constants
// - `header`    — Standalone 4-byte header and 8-byte overlay trailer
// - `tokenizer` — Lazy per-variant token iterators
// - `decoder`   — Token resolution into output bytes
// - `window`    — Sliding-window match finder
// - `encoder`   — Flag-grouped binary emission
// - `overlay`   — Backward in-place overlay decompression
// - `verify`    — Output-free structural validation

pub mod decoder;
pub mod encoder;
pub mod header;
pub mod overlay;
pub mod token;
pub mod tokenizer;
pub mod verify;
pub mod window;

// Re-export key types for convenience.
pub use decoder::{DecodeError, decompress, decompress_raw_lzss10, decompress_raw_lzss11};
pub use encoder::{EncodeError, compress, compress_into};
pub use header::{CompressionHeader, FormatError, HEADER_LEN, OverlayHeader, Variant};
pub use overlay::decompress_overlay;
pub use token::Token;
pub use tokenizer::{DispMode, Lz10Tokens, Lz11Tokens, TokenAt, Tokens};
pub use verify::{VerificationError, VerifyReport, verify};
pub use window::{MatchTokens, SlidingWindow};
