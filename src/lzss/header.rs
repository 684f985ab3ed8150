// LZSS header framings.
//
// Two framings exist side by side: a 4-byte word at the start of a
// standalone compressed file (format tag in the low byte, 24-bit
// decompressed size above it), and an 8-byte trailer at the end of an
// overlay-framed binary driving backward in-place decompression.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Tags and limits
// ---------------------------------------------------------------------------

/// Format tag for raw LZSS10.
pub const LZ10_TAG: u8 = 0x10;
/// Format tag for extended LZSS11.
pub const LZ11_TAG: u8 = 0x11;

/// Size of the standalone compression header.
pub const HEADER_LEN: usize = 4;
/// Size of the overlay trailer.
pub const OVERLAY_TRAILER_LEN: usize = 8;

/// Largest decompressed size the 24-bit header field can carry (16 MiB - 1).
pub const MAX_DECOMPRESSED_SIZE: usize = 0xFF_FFFF;

// ---------------------------------------------------------------------------
// Format error
// ---------------------------------------------------------------------------

/// Structural problems with a header or trailer.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unrecognized format tag {0:#04x} (expected 0x10 or 0x11)")]
    UnknownTag(u8),

    #[error("input too short for a compression header: {0} bytes")]
    TruncatedHeader(usize),

    #[error("input too short for an overlay trailer: {0} bytes")]
    TruncatedTrailer(usize),

    #[error(
        "overlay trailer out of range: end_delta {end_delta:#x}, padding {padding}, \
         file length {file_len:#x}"
    )]
    OverlayRange {
        end_delta: usize,
        padding: usize,
        file_len: usize,
    },

    #[error(
        "overlay trailer claims {claimed:#x} decompressed bytes from a \
         {stream_len:#x}-byte stream"
    )]
    OverlaySize { claimed: u64, stream_len: usize },
}

// ---------------------------------------------------------------------------
// Format variant
// ---------------------------------------------------------------------------

/// The two decoder variants, selected by the header tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Lz10,
    Lz11,
}

impl Variant {
    /// The header tag byte for this variant.
    #[inline]
    pub fn tag(self) -> u8 {
        match self {
            Variant::Lz10 => LZ10_TAG,
            Variant::Lz11 => LZ11_TAG,
        }
    }

    /// Map a tag byte back to a variant.
    pub fn from_tag(tag: u8) -> Result<Self, FormatError> {
        match tag {
            LZ10_TAG => Ok(Variant::Lz10),
            LZ11_TAG => Ok(Variant::Lz11),
            other => Err(FormatError::UnknownTag(other)),
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::Lz10 => write!(f, "lzss10"),
            Variant::Lz11 => write!(f, "lzss11"),
        }
    }
}

// ---------------------------------------------------------------------------
// Standalone compression header
// ---------------------------------------------------------------------------

/// Parsed 4-byte standalone header.
///
/// Packed little-endian as `tag | decompressed_size << 8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionHeader {
    pub variant: Variant,
    pub decompressed_size: usize,
}

impl CompressionHeader {
    /// Parse the header at the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self, FormatError> {
        if data.len() < HEADER_LEN {
            return Err(FormatError::TruncatedHeader(data.len()));
        }
        let word = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        let variant = Variant::from_tag((word & 0xFF) as u8)?;
        Ok(Self {
            variant,
            decompressed_size: (word >> 8) as usize,
        })
    }

    /// Encode the header as its 4-byte wire form.
    ///
    /// The caller is responsible for keeping `decompressed_size` within
    /// [`MAX_DECOMPRESSED_SIZE`]; the excess bits do not fit the field.
    pub fn to_bytes(self) -> [u8; HEADER_LEN] {
        debug_assert!(self.decompressed_size <= MAX_DECOMPRESSED_SIZE);
        let word = (self.decompressed_size as u32) << 8 | self.variant.tag() as u32;
        word.to_le_bytes()
    }
}

// ---------------------------------------------------------------------------
// Overlay trailer
// ---------------------------------------------------------------------------

/// Parsed 8-byte overlay trailer.
///
/// Layout: two little-endian `u32` fields. The first packs the padding
/// count into its high byte and `end_delta` into the low 24 bits; the
/// second is `start_delta`. Deltas are measured from the trailer:
/// `end_delta` reaches back to where decompression ends, `start_delta`
/// reaches forward to where it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayHeader {
    /// Distance from the file end back to the start of the compressed region.
    pub end_delta: u32,
    /// Extra room the decompressed data claims past the file end.
    pub start_delta: u32,
    /// Trailing bytes of the region not part of the compressed stream
    /// (the trailer itself plus any filler before it).
    pub padding: u8,
}

impl OverlayHeader {
    /// Parse the trailer from the last 8 bytes of `file`.
    pub fn parse(file: &[u8]) -> Result<Self, FormatError> {
        if file.len() < OVERLAY_TRAILER_LEN {
            return Err(FormatError::TruncatedTrailer(file.len()));
        }
        let tail = &file[file.len() - OVERLAY_TRAILER_LEN..];
        let end_field = u32::from_le_bytes([tail[0], tail[1], tail[2], tail[3]]);
        let start_delta = u32::from_le_bytes([tail[4], tail[5], tail[6], tail[7]]);
        Ok(Self {
            end_delta: end_field & 0xFF_FFFF,
            start_delta,
            padding: (end_field >> 24) as u8,
        })
    }

    /// Total size of the decompressed region. Widened so the sum of the
    /// two wire fields cannot overflow.
    #[inline]
    pub fn decompressed_size(&self) -> u64 {
        self.start_delta as u64 + self.end_delta as u64
    }

    /// Encode the trailer as its 8-byte wire form.
    pub fn to_bytes(self) -> [u8; OVERLAY_TRAILER_LEN] {
        let end_field = (self.padding as u32) << 24 | (self.end_delta & 0xFF_FFFF);
        let mut out = [0u8; OVERLAY_TRAILER_LEN];
        out[..4].copy_from_slice(&end_field.to_le_bytes());
        out[4..].copy_from_slice(&self.start_delta.to_le_bytes());
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
