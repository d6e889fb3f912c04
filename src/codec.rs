//! Vendor wire codecs: outbound frame construction for keystroke injection.
//!
//! Two mutually incompatible receiver protocols are reproduced here:
//!
//! - **Microsoft** (19-byte frames): XOR-negate checksum in the last byte,
//!   a 16-bit little-endian session sequence counter the receiver tracks,
//!   and, on the encrypted variant, an address-keyed XOR keystream over
//!   bytes 4.. of the frame. The counter increments on *every* frame
//!   (sync, key-down, key-up) and wraps at 16 bits.
//! - **Logitech Unifying** (10-byte frames): two's-complement sum checksum,
//!   up to six simultaneous keycodes, no counter and no sync preamble.
//!
//! Key-up frames for Microsoft are derived from the key-down frame the way
//! the receivers expect: un-apply the keystream (the XOR is self-inverse),
//! zero the volatile bytes, stamp the next counter value, re-checksum, and
//! re-apply the keystream. Getting the byte ranges of that dance wrong is
//! the classic way to lose key-release events, so it has dedicated tests.

use crate::consts::{
    ESB_ADDR_LEN, LOGITECH_FRAME_LEN, LOGITECH_MAX_KEYS, MS_FRAME_LEN, MS_SYNC_FRAMES,
};
use crate::fingerprint::DeviceType;
use crate::keymap::KeyPress;
use heapless::Vec;

/// An outbound frame, sized for the largest vendor format.
pub type FrameBuf = Vec<u8, MS_FRAME_LEN>;

/// A key-down frame and its paired key-up frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFrames {
    /// Frame pressing the key.
    pub down: FrameBuf,
    /// Frame releasing it.
    pub up: FrameBuf,
}

/// Frame builder for one vendor protocol, holding any per-session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VendorCodec {
    /// Microsoft wireless keyboard protocol.
    Microsoft {
        /// Whether frames are XOR-obfuscated with the device address.
        encrypted: bool,
        /// Session sequence counter; one increment per transmitted frame.
        sequence: u16,
    },
    /// Logitech Unifying keyboard protocol.
    Logitech,
}

impl VendorCodec {
    /// Picks the codec for a fingerprinted device, with fresh session
    /// state.
    pub fn for_device(device_type: DeviceType) -> Self {
        match device_type {
            DeviceType::MicrosoftPlain => VendorCodec::Microsoft {
                encrypted: false,
                sequence: 0,
            },
            DeviceType::MicrosoftEncrypted => VendorCodec::Microsoft {
                encrypted: true,
                sequence: 0,
            },
            DeviceType::Logitech => VendorCodec::Logitech,
        }
    }

    /// Number of null frames the receiver needs before the first real
    /// keystroke of a session.
    pub fn sync_frame_count(&self) -> usize {
        match self {
            VendorCodec::Microsoft { .. } => MS_SYNC_FRAMES,
            VendorCodec::Logitech => 0,
        }
    }

    /// Builds one null frame (no modifier, no key), consuming one
    /// sequence increment on Microsoft. Used for receiver
    /// synchronization.
    pub fn null_frame(&mut self, address: &[u8; ESB_ADDR_LEN]) -> FrameBuf {
        match self {
            VendorCodec::Microsoft {
                encrypted,
                sequence,
            } => ms_key_frame(*encrypted, sequence, address, KeyPress::default()),
            VendorCodec::Logitech => logitech_frame(0, &[]),
        }
    }

    /// Builds the key-down/key-up frame pair for one keystroke.
    ///
    /// On Microsoft both frames consume a sequence increment, and the
    /// key-up frame is derived from the key-down frame (decrypt, re-zero,
    /// restamp, re-encrypt) exactly as the receivers expect.
    pub fn keystroke(&mut self, address: &[u8; ESB_ADDR_LEN], press: KeyPress) -> KeyFrames {
        match self {
            VendorCodec::Microsoft {
                encrypted,
                sequence,
            } => {
                let down = ms_key_frame(*encrypted, sequence, address, press);
                let mut up = down.clone();
                ms_release_in_place(&mut up, *encrypted, sequence, address);
                KeyFrames { down, up }
            }
            VendorCodec::Logitech => KeyFrames {
                down: logitech_frame(press.modifier, &[press.keycode]),
                up: logitech_frame(0, &[]),
            },
        }
    }
}

/// Builds a Microsoft keyboard frame and advances the sequence counter.
///
/// Layout: `[0x08][pad:3][seq_lo][seq_hi][0x43][modifier][pad][keycode]`
/// `[pad:8][checksum]`. The checksum covers the first 18 bytes; the
/// keystream, when enabled, covers bytes 4.. including the checksum.
fn ms_key_frame(
    encrypted: bool,
    sequence: &mut u16,
    address: &[u8; ESB_ADDR_LEN],
    press: KeyPress,
) -> FrameBuf {
    let mut frame = FrameBuf::new();
    let _ = frame.resize_default(MS_FRAME_LEN);

    frame[0] = 0x08; // keyboard frame type
    frame[4] = *sequence as u8;
    frame[5] = (*sequence >> 8) as u8;
    frame[6] = 67; // 0x43, keyboard-data-present flag
    frame[7] = press.modifier;
    frame[9] = press.keycode;
    *sequence = sequence.wrapping_add(1);

    ms_checksum(&mut frame);
    if encrypted {
        ms_crypt(&mut frame, address);
    }
    frame
}

/// Rewrites a just-built key-down frame into its key-up companion.
///
/// The frame arrives exactly as transmitted (encrypted if the session
/// is). Order matters: un-apply the keystream first, then zero bytes
/// 4..18, stamp the next sequence value and the data flag, re-checksum,
/// and re-apply the keystream.
fn ms_release_in_place(
    frame: &mut FrameBuf,
    encrypted: bool,
    sequence: &mut u16,
    address: &[u8; ESB_ADDR_LEN],
) {
    if encrypted {
        ms_crypt(frame, address);
    }
    for b in &mut frame[4..MS_FRAME_LEN - 1] {
        *b = 0;
    }
    frame[4] = *sequence as u8;
    frame[5] = (*sequence >> 8) as u8;
    frame[6] = 67;
    *sequence = sequence.wrapping_add(1);

    ms_checksum(frame);
    if encrypted {
        ms_crypt(frame, address);
    }
}

/// Writes the Microsoft checksum: bitwise NOT of the XOR of all bytes
/// except the last.
fn ms_checksum(frame: &mut [u8]) {
    let (body, tail) = frame.split_at_mut(frame.len() - 1);
    tail[0] = !body.iter().fold(0, |acc, &b| acc ^ b);
}

/// Applies (or, being self-inverse, removes) the Microsoft keystream:
/// every byte from index 4 onward is XOR-ed with the device address,
/// cycled with period 5.
fn ms_crypt(frame: &mut [u8], address: &[u8; ESB_ADDR_LEN]) {
    for (i, b) in frame.iter_mut().enumerate().skip(4) {
        *b ^= address[(i - 4) % ESB_ADDR_LEN];
    }
}

/// Builds a Logitech Unifying keyboard frame:
/// `[0x00][0xC1][modifier][key1..key6][checksum]`.
///
/// The checksum is the two's complement of the byte sum, i.e.
/// `0xFF - (sum mod 256) + 1`.
fn logitech_frame(modifier: u8, keys: &[u8]) -> FrameBuf {
    let mut frame = FrameBuf::new();
    let _ = frame.resize_default(LOGITECH_FRAME_LEN);

    frame[1] = 0xC1; // keyboard report subtype
    frame[2] = modifier;
    for (slot, &key) in frame[3..3 + LOGITECH_MAX_KEYS].iter_mut().zip(keys) {
        *slot = key;
    }

    let sum = frame[..LOGITECH_FRAME_LEN - 1]
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_add(b));
    frame[LOGITECH_FRAME_LEN - 1] = 0xFFu8.wrapping_sub(sum).wrapping_add(1);
    frame
}
