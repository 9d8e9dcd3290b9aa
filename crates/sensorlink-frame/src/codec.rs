use bytes::{BufMut, BytesMut};

use crate::error::{FrameError, Result};

/// Frame separator; every marker sequence starts with it.
pub const SEP: u8 = 0x80;

/// Header tag: a frame starts with SEP SEP SEP HDR.
pub const HDR: u8 = 0x81;

/// Trailer tag: the payload is followed by SEP TRL.
pub const TRL: u8 = 0x82;

/// Escape introducer for payload bytes that collide with the markers.
pub const ESC: u8 = 0xFE;

/// Escape code for a literal SEP byte inside the payload.
pub const ESC_SEP: u8 = 0x01;

/// Escape code for a literal ESC byte inside the payload.
pub const ESC_ESC: u8 = 0x02;

/// Maximum unescaped payload length, bounded by the one-byte length field.
pub const MAX_PAYLOAD: usize = 255;

/// Wire bytes around the payload: header (4) + length (1) + trailer (2) +
/// checksum (4). Escaping can add up to one more byte per payload byte.
pub const FRAME_OVERHEAD: usize = 11;

/// Fold one byte into the rolling checksum.
///
/// A 32-bit mixing function, not a CRC polynomial:
/// `crc = (crc << 8) + byte + (crc >> 11)`, all modulo 2^32.
#[inline]
pub fn checksum_step(crc: u32, byte: u8) -> u32 {
    (crc << 8)
        .wrapping_add(u32::from(byte))
        .wrapping_add(crc >> 11)
}

/// Checksum of a whole payload, as transmitted after the trailer.
pub fn checksum(payload: &[u8]) -> u32 {
    payload.iter().fold(0, |crc, &b| checksum_step(crc, b))
}

/// Encode a payload into the wire format.
///
/// ```text
/// ┌────────────────┬───────┬─────────────────┬───────────┬─────────────┐
/// │ 0x80 0x80 0x80 │ len   │ escaped payload │ 0x80 0x82 │ checksum    │
/// │ 0x81 (header)  │ (1B)  │                 │ (trailer) │ (4B BE)     │
/// └────────────────┴───────┴─────────────────┴───────────┴─────────────┘
/// ```
///
/// `len` counts *unescaped* payload bytes; the checksum covers them in
/// order. Payload bytes 0x80 and 0xFE are escaped to `0xFE 0x01` and
/// `0xFE 0x02` so they can never be mistaken for markers.
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD,
        });
    }

    // Worst case every payload byte escapes to two.
    dst.reserve(FRAME_OVERHEAD + payload.len() * 2);

    dst.put_slice(&[SEP, SEP, SEP, HDR]);
    dst.put_u8(payload.len() as u8);

    let mut crc = 0u32;
    for &byte in payload {
        crc = checksum_step(crc, byte);
        match byte {
            SEP => dst.put_slice(&[ESC, ESC_SEP]),
            ESC => dst.put_slice(&[ESC, ESC_ESC]),
            _ => dst.put_u8(byte),
        }
    }

    dst.put_slice(&[SEP, TRL]);
    dst.put_u32(crc);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_produces_exact_wire_bytes() {
        let mut buf = BytesMut::new();
        encode_frame(&[0x01, 0x02, 0x80, 0xFE], &mut buf).unwrap();

        assert_eq!(
            buf.as_ref(),
            &[
                0x80, 0x80, 0x80, 0x81, // header
                0x04, // unescaped length
                0x01, 0x02, 0xFE, 0x01, 0xFE, 0x02, // payload, SEP/ESC escaped
                0x80, 0x82, // trailer
                0x01, 0x02, 0x81, 0x1E, // checksum, big-endian
            ]
        );
    }

    #[test]
    fn encode_empty_payload() {
        let mut buf = BytesMut::new();
        encode_frame(&[], &mut buf).unwrap();

        assert_eq!(
            buf.as_ref(),
            &[0x80, 0x80, 0x80, 0x81, 0x00, 0x80, 0x82, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn encode_rejects_oversized_payload() {
        let mut buf = BytesMut::new();
        let payload = vec![0u8; MAX_PAYLOAD + 1];

        let err = encode_frame(&payload, &mut buf).unwrap_err();
        assert!(matches!(
            err,
            FrameError::PayloadTooLarge { size: 256, max: 255 }
        ));
        // Nothing partially transmitted.
        assert!(buf.is_empty());
    }

    #[test]
    fn max_payload_encodes() {
        let mut buf = BytesMut::new();
        let payload = vec![0x80u8; MAX_PAYLOAD];

        encode_frame(&payload, &mut buf).unwrap();
        // Every byte escapes to two.
        assert_eq!(buf.len(), FRAME_OVERHEAD + MAX_PAYLOAD * 2);
        assert_eq!(buf[4], 0xFF);
    }

    #[test]
    fn checksum_accumulates_over_unescaped_bytes() {
        assert_eq!(checksum(&[]), 0);
        assert_eq!(checksum(&[0x01]), 1);
        assert_eq!(checksum(&[0x01, 0x02]), 0x102);
        assert_eq!(checksum(&[0x01, 0x02, 0x80, 0xFE]), 0x0102_811E);
    }

    #[test]
    fn checksum_shift_feedback_kicks_in() {
        // Once crc grows past 2^11 the (crc >> 11) term contributes:
        // 0xFFFF << 8 = 0xFFFF00, + 0xFF, + (0xFFFF >> 11 = 0x1F).
        assert_eq!(checksum(&[0xFF, 0xFF]), 0xFFFF);
        assert_eq!(checksum(&[0xFF, 0xFF, 0xFF]), 0x0100_001E);
    }

    #[test]
    fn checksum_wraps_instead_of_overflowing() {
        let mut crc = u32::MAX;
        crc = checksum_step(crc, 0xFF);
        // Must not panic in debug builds; exact value pinned for regressions.
        assert_eq!(
            crc,
            (u32::MAX << 8)
                .wrapping_add(0xFF)
                .wrapping_add(u32::MAX >> 11)
        );
    }

    #[test]
    fn markers_never_appear_raw_in_escaped_payload() {
        let mut buf = BytesMut::new();
        let payload = vec![0x80, 0xFE, 0x80, 0xFE];
        encode_frame(&payload, &mut buf).unwrap();

        // Strip header, length, trailer, checksum; inspect escaped region.
        let escaped = &buf[5..buf.len() - 6];
        assert_eq!(escaped, &[0xFE, 0x01, 0xFE, 0x02, 0xFE, 0x01, 0xFE, 0x02]);
    }
}
