//! Nitrolz: LZSS10/LZSS11 codec for console ROM binaries.
//!
//! The crate provides:
//! - The LZSS format engine (`lzss`): tokenizer, decoder, encoder,
//!   sliding-window match finder, overlay framer, and verifier
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use nitrolz::lzss::{self, Variant};
//!
//! let data = b"abcabcabcabcabcabc";
//! let packed = lzss::compress(data, Variant::Lz10).unwrap();
//! let unpacked = lzss::decompress(&packed).unwrap();
//! assert_eq!(unpacked, data);
//! ```

pub mod io;
pub mod lzss;

#[cfg(feature = "cli")]
pub mod cli;
