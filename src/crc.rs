//! CRC-16 validation for promiscuously captured ESB frames.
//!
//! Enhanced-ShockBurst protects each frame with a CRC-CCITT (polynomial
//! `0x1021`, seed `0xFFFF`) computed most-significant-bit first over the
//! address, the 9-bit Packet Control Field, and the payload. Because the
//! PCF is nine bits long, the protected span is **not** byte aligned: the
//! last contribution to the checksum is a single bit. The update function
//! here therefore takes an explicit bit count so a trailing partial byte
//! can be folded in exactly.

/// Folds `bits` bits of `byte` (taken from the most significant end) into
/// a running CRC-CCITT value.
///
/// `byte` is XOR-ed into the top 8 bits of the register, then the register
/// is advanced one bit at a time, `bits` times. Pass `8` for whole bytes;
/// pass a masked byte and a smaller count for a trailing partial byte
/// (e.g. `crc16_update(crc, b & 0x80, 1)` for one final bit).
///
/// The seed for a fresh frame is [`CRC_INIT`](crate::consts::CRC_INIT).
pub fn crc16_update(crc: u16, byte: u8, bits: u8) -> u16 {
    let mut crc = crc ^ ((byte as u16) << 8);
    for _ in 0..bits {
        if crc & 0x8000 != 0 {
            crc = (crc << 1) ^ 0x1021;
        } else {
            crc <<= 1;
        }
    }
    crc
}
