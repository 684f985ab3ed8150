// Backward, in-place overlay decompression.
//
// Overlay-framed binaries keep a compressed tail that the loader expands
// leftward over itself; decompressed output is never smaller than its
// compressed source, so the expansion cannot clobber unread input.
// Reversing the region turns the leftward decode into an ordinary
// forward variant-10 decode in overlay displacement mode.

use log::debug;

use super::decoder::{self, DecodeError};
use super::header::{FormatError, OVERLAY_TRAILER_LEN, OverlayHeader};
use super::tokenizer::DispMode;

/// Decompress an overlay-framed file.
///
/// The output is the untouched file prefix followed by the decompressed
/// tail; everything from the start of the compressed region onward is
/// replaced by its (larger) decompression. The whole region is held in
/// memory — decompression runs backward, so it cannot stream.
pub fn decompress_overlay(file: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let trailer = OverlayHeader::parse(file)?;
    let end_delta = trailer.end_delta as usize;
    let padding = trailer.padding as usize;

    // The padding field counts the 8-byte trailer plus any filler before
    // it, so it can never be smaller than the trailer.
    if end_delta > file.len() || padding < OVERLAY_TRAILER_LEN || padding > end_delta {
        return Err(FormatError::OverlayRange {
            end_delta,
            padding,
            file_len: file.len(),
        }
        .into());
    }

    // A match token turns at most two stream bytes into eighteen output
    // bytes, so the stream length bounds how far the region can claim
    // to expand. Anything beyond that is a corrupt trailer, not data.
    let stream_len = end_delta - padding;
    let claimed = trailer.decompressed_size();
    if claimed > stream_len as u64 * 9 {
        return Err(FormatError::OverlaySize { claimed, stream_len }.into());
    }
    let decompressed_size = claimed as usize;

    debug!(
        "overlay trailer: end_delta={end_delta:#x} start_delta={:#x} padding={padding} \
         decompressed_size={decompressed_size:#x}",
        trailer.start_delta
    );

    // The compressed region ends at the file end; its last `padding`
    // bytes (filler plus the trailer itself) are not part of the stream.
    let region_start = file.len() - end_delta;
    let mut compressed = file[region_start..file.len() - padding].to_vec();
    compressed.reverse();

    let decompressed =
        decoder::decompress_raw_lzss10(&compressed, decompressed_size, DispMode::Overlay)?;

    let mut out = Vec::with_capacity(region_start + decompressed_size);
    out.extend_from_slice(&file[..region_start]);
    out.extend(decompressed.iter().rev());
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // Overlay frame whose 7 compressed bytes reversed-decode to "abcd"
    // repeated five times: region covers the whole file, padding covers
    // one filler byte plus the trailer.
    const FRAMED: &[u8] = b"\x01\xd0abcd\x08\xff\x10\x00\x00\x09\x04\x00\x00\x00";

    #[test]
    fn framed_tail_decompresses() {
        let out = decompress_overlay(FRAMED).unwrap();
        assert_eq!(out, b"abcd".repeat(5));
    }

    #[test]
    fn prefix_is_passed_through_unchanged() {
        // The trailer's deltas are measured from the file end, so the
        // same frame works behind any prefix.
        let prefix = b"PREFIX--";
        let mut file = prefix.to_vec();
        file.extend_from_slice(FRAMED);
        let out = decompress_overlay(&file).unwrap();
        assert_eq!(&out[..prefix.len()], prefix);
        assert_eq!(&out[prefix.len()..], b"abcd".repeat(5));
    }

    #[test]
    fn bad_padding_is_rejected() {
        let hdr = OverlayHeader {
            end_delta: 8,
            start_delta: 0,
            padding: 4, // smaller than the trailer itself
        };
        let err = decompress_overlay(&hdr.to_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Format(FormatError::OverlayRange { .. })
        ));
    }

    #[test]
    fn overflowing_size_claim_is_rejected() {
        // start_delta near u32::MAX would overflow the size sum and
        // cannot possibly come out of an 8-byte file.
        let hdr = OverlayHeader {
            end_delta: 8,
            start_delta: u32::MAX,
            padding: 8,
        };
        let err = decompress_overlay(&hdr.to_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Format(FormatError::OverlaySize { .. })
        ));
    }

    #[test]
    fn oversized_end_delta_is_rejected() {
        let hdr = OverlayHeader {
            end_delta: 0x100,
            start_delta: 0,
            padding: 8,
        };
        let err = decompress_overlay(&hdr.to_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Format(FormatError::OverlayRange { .. })
        ));
    }

    #[test]
    fn truncated_trailer_is_rejected() {
        let err = decompress_overlay(b"\x00\x01\x02").unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Format(FormatError::TruncatedTrailer(3))
        ));
    }
}
