//! Frame reconstruction from misaligned promiscuous captures.
//!
//! In promiscuous mode the radio hands us raw on-air bytes with no framing
//! help: the capture preamble only loosely anchors to the link's real
//! preamble byte, so the frame may arrive shifted by one bit relative to
//! byte boundaries. The ESB on-air layout is
//!
//! ```text
//! [address:5][PCF:9 bits][payload:N][CRC:2]
//! ```
//!
//! and because the Packet Control Field is nine bits long, everything
//! after it (payload and CRC) sits one bit to the left of the capture's
//! byte grid. Reconstruction therefore:
//!
//! 1. tries the buffer as captured, then once more with every bit shifted
//!    right by one (the half-preamble-bit misalignment case),
//! 2. reads the payload length from the top 6 bits of byte 5 and rejects
//!    lengths that cannot fit the capture,
//! 3. re-assembles the bit-shifted CRC and validates it against a
//!    [`crc16_update`] run over the exact protected bit span,
//! 4. un-shifts the payload bytes.
//!
//! A capture that fails both alignment trials is simply not a frame; that
//! is the common case on a noisy channel and is not an error.

use crate::consts::{
    CRC_INIT, ESB_ADDR_LEN, ESB_FRAME_OVERHEAD, ESB_MAX_CAPTURE_LEN, ESB_MAX_PAYLOAD_LEN,
    ESB_MIN_CAPTURE_LEN,
};
use crate::crc::crc16_update;
use heapless::Vec;

/// A verified frame recovered from a promiscuous capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EsbFrame {
    /// Device address, as transmitted (first address byte first).
    pub address: [u8; ESB_ADDR_LEN],
    /// Un-shifted payload bytes.
    pub payload: Vec<u8, ESB_MAX_PAYLOAD_LEN>,
    /// Channel the frame was captured on.
    pub channel: u8,
}

/// Attempts to recover a CRC-valid frame from a raw capture.
///
/// Tries the capture as-is, then shifted right by one bit. Returns the
/// first alignment that yields a valid CRC, or `None` when neither does
/// (nothing captured this cycle, not an error).
pub fn reassemble(raw: &[u8], channel: u8) -> Option<EsbFrame> {
    if raw.len() < ESB_MIN_CAPTURE_LEN {
        return None;
    }
    let len = raw.len().min(ESB_MAX_CAPTURE_LEN);

    let mut buf = [0u8; ESB_MAX_CAPTURE_LEN];
    for offset in 0..2 {
        let buf = &mut buf[..len];
        buf.copy_from_slice(&raw[..len]);
        if offset == 1 {
            shift_right_one_bit(buf);
        }
        if let Some(frame) = try_alignment(buf, channel) {
            return Some(frame);
        }
    }
    None
}

/// Shifts the whole buffer right by one bit: bit 0 of byte `i` becomes
/// bit 7 of byte `i + 1`, and a zero enters at the top of byte 0.
fn shift_right_one_bit(buf: &mut [u8]) {
    for x in (0..buf.len()).rev() {
        buf[x] = if x > 0 {
            (buf[x - 1] << 7) | (buf[x] >> 1)
        } else {
            buf[x] >> 1
        };
    }
}

/// Validates one alignment of the capture and extracts the frame on
/// success.
fn try_alignment(buf: &[u8], channel: u8) -> Option<EsbFrame> {
    // Payload length lives in the upper 6 bits of the PCF byte.
    let payload_len = (buf[ESB_ADDR_LEN] >> 2) as usize;
    if payload_len == 0 || payload_len > buf.len() - ESB_FRAME_OVERHEAD {
        return None;
    }

    // The CRC is carried one bit left-shifted: 7 bits in buf[6+L], 8 in
    // buf[7+L], and its final bit at the top of buf[8+L].
    let mut given =
        (((buf[6 + payload_len] as u16) << 9) | ((buf[7 + payload_len] as u16) << 1)).swap_bytes();
    if buf[8 + payload_len] & 0x80 != 0 {
        given |= 0x0100;
    }

    // The protected span is the address, the PCF, and the payload: the
    // first 6+L bytes whole, plus one trailing bit.
    let mut calc = CRC_INIT;
    for &b in &buf[..6 + payload_len] {
        calc = crc16_update(calc, b, 8);
    }
    calc = crc16_update(calc, buf[6 + payload_len] & 0x80, 1);
    calc = calc.swap_bytes();

    if calc != given {
        return None;
    }

    let mut address = [0u8; ESB_ADDR_LEN];
    address.copy_from_slice(&buf[..ESB_ADDR_LEN]);

    // Payload bytes straddle byte boundaries one bit to the left.
    let mut payload = Vec::new();
    for x in 0..payload_len {
        let byte = (buf[6 + x] << 1) | (buf[7 + x] >> 7);
        // Length was bounds-checked against capacity above.
        payload.push(byte).ok()?;
    }

    Some(EsbFrame {
        address,
        payload,
        channel,
    })
}

/// Builds a byte-aligned capture of a valid frame: packs the payload one
/// bit left of the byte grid and appends a matching CRC, exactly
/// inverting what `try_alignment` undoes. Test fixture shared with the
/// engine tests.
#[cfg(test)]
pub(crate) fn pack_capture(
    address: &[u8; ESB_ADDR_LEN],
    payload: &[u8],
) -> Vec<u8, ESB_MAX_CAPTURE_LEN> {
    let l = payload.len();
    let mut buf: Vec<u8, ESB_MAX_CAPTURE_LEN> = Vec::new();
    buf.resize_default(l + ESB_FRAME_OVERHEAD).unwrap();

    buf[..ESB_ADDR_LEN].copy_from_slice(address);
    buf[ESB_ADDR_LEN] = (l as u8) << 2;
    for (x, &b) in payload.iter().enumerate() {
        buf[6 + x] |= b >> 1;
        buf[7 + x] |= b << 7;
    }

    let mut crc = CRC_INIT;
    for x in 0..6 + l {
        crc = crc16_update(crc, buf[x], 8);
    }
    crc = crc16_update(crc, buf[6 + l] & 0x80, 1);

    buf[6 + l] |= (crc >> 9) as u8;
    buf[7 + l] = (crc >> 1) as u8;
    buf[8 + l] |= (crc as u8 & 1) << 7;
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shifts a capture left by one bit, losing the top bit of byte 0:
    /// the mirror image of the reconstructor's offset-1 trial.
    fn shift_left_one_bit(buf: &[u8]) -> Vec<u8, ESB_MAX_CAPTURE_LEN> {
        let mut out: Vec<u8, ESB_MAX_CAPTURE_LEN> = Vec::new();
        for x in 0..buf.len() {
            let next = if x + 1 < buf.len() { buf[x + 1] >> 7 } else { 0 };
            out.push((buf[x] << 1) | next).unwrap();
        }
        out
    }

    const ADDR: [u8; 5] = [0x5A, 0x23, 0x9F, 0xC1, 0x70];

    #[test]
    fn aligned_capture_reassembles() {
        let payload = [0x08, 0x01, 0x02, 0x03];
        let capture = pack_capture(&ADDR, &payload);

        let frame = reassemble(&capture, 42).expect("valid frame");
        assert_eq!(frame.address, ADDR);
        assert_eq!(frame.payload.as_slice(), &payload);
        assert_eq!(frame.channel, 42);
    }

    #[test]
    fn one_bit_shifted_capture_reassembles_identically() {
        // Top bit of the first address byte must be clear: the shift
        // pushes it out of the capture window.
        let payload = [0x00, 0xC2, 0x10, 0x20, 0x30];
        let capture = pack_capture(&ADDR, &payload);
        let shifted = shift_left_one_bit(&capture);

        let from_aligned = reassemble(&capture, 7).expect("aligned");
        let from_shifted = reassemble(&shifted, 7).expect("offset-1");
        assert_eq!(from_aligned, from_shifted);
    }

    #[test]
    fn corrupted_crc_is_rejected() {
        let payload = [0x08, 0x01];
        let mut capture = pack_capture(&ADDR, &payload);
        let last = capture.len() - 1;
        capture[last] ^= 0x80;
        assert!(reassemble(&capture, 3).is_none());
    }

    #[test]
    fn corrupted_payload_bit_is_rejected() {
        let payload = [0x08, 0x01, 0x02];
        let mut capture = pack_capture(&ADDR, &payload);
        capture[7] ^= 0x01;
        assert!(reassemble(&capture, 3).is_none());
    }

    #[test]
    fn zero_length_field_is_rejected() {
        let mut capture = pack_capture(&ADDR, &[0x08, 0x01]);
        capture[5] = 0;
        assert!(reassemble(&capture, 3).is_none());
    }

    #[test]
    fn oversized_length_field_is_rejected() {
        let mut capture = pack_capture(&ADDR, &[0x08, 0x01]);
        // Claim a payload longer than the capture can hold.
        capture[5] = 32 << 2;
        assert!(reassemble(&capture, 3).is_none());
    }

    #[test]
    fn runt_capture_is_ignored() {
        assert!(reassemble(&[0xAA; 9], 3).is_none());
    }
}
