//! Constants used across the ESB sniff/inject engine.
//!
//! This module defines protocol-wide constants for capture buffer sizing,
//! the link-layer frame layout, the channel sweep, vendor frame sizes, and
//! the timing of injection bursts.
//!
//! ## Key Concepts
//!
//! - **Capture bounds**: a promiscuous read is clamped to the largest
//!   on-air frame the nRF24-class parts can produce (37 bytes); anything
//!   shorter than the fixed link overhead plus one payload byte is noise.
//! - **Channel sweep**: the 2.4 GHz band is swept from channel 2 to 84
//!   (2.402–2.484 GHz), the range wireless HID receivers actually occupy.
//! - **Frame overhead**: 5 address bytes + 1 PCF byte + 2 CRC bytes, with
//!   the payload and CRC carried one bit left-shifted in the raw capture.
//! - **Burst timing**: delays between transmitted frames that the targeted
//!   receivers tolerate; tightening these drops keystrokes on real hardware.

/// Seed value for a fresh CRC-16 computation over a captured frame.
pub const CRC_INIT: u16 = 0xFFFF;

/// Length (in bytes) of the full over-the-air device address.
pub const ESB_ADDR_LEN: usize = 5;

/// Largest raw capture the reconstructor will look at.
///
/// Anything longer is truncated before alignment trials; the real frame
/// never extends past this on nRF24-class radios.
pub const ESB_MAX_CAPTURE_LEN: usize = 37;

/// Smallest raw capture worth an alignment trial: address (5) + PCF (1)
/// + CRC (2) + at least one payload byte, plus the trailing bit spill.
pub const ESB_MIN_CAPTURE_LEN: usize = 10;

/// Fixed non-payload overhead of a reconstructed frame, in bytes.
///
/// Address (5) + PCF (1) + CRC (2), plus the byte holding the spill-over
/// bit of the left-shifted CRC. A payload of length `L` therefore needs a
/// capture of at least `L + ESB_FRAME_OVERHEAD` bytes.
pub const ESB_FRAME_OVERHEAD: usize = 9;

/// Largest payload a reconstructed frame can carry.
pub const ESB_MAX_PAYLOAD_LEN: usize = 32;

/// First channel of the scan sweep (2.402 GHz).
pub const SCAN_CHANNEL_FIRST: u8 = 2;

/// Last channel of the scan sweep (2.484 GHz).
pub const SCAN_CHANNEL_LAST: u8 = 84;

/// Listen windows attempted on each channel before hopping.
pub const SCAN_TRIES_PER_CHANNEL: u8 = 3;

/// Gap between listen windows on the same channel, in microseconds.
pub const SCAN_LISTEN_GAP_US: u64 = 200;

/// Pause between full band sweeps, in milliseconds.
pub const SCAN_PASS_GAP_MS: u64 = 50;

/// Backoff before retrying when the shared radio lock is busy, in
/// milliseconds.
pub const RADIO_BACKOFF_MS: u64 = 100;

/// Capacity of the target registry.
pub const MAX_TARGETS: usize = 16;

/// Length of a Microsoft keyboard frame.
pub const MS_FRAME_LEN: usize = 19;

/// Number of null frames sent to synchronize a Microsoft receiver with
/// the session sequence counter before the first real keystroke.
pub const MS_SYNC_FRAMES: usize = 6;

/// Length of a Logitech Unifying keyboard frame.
pub const LOGITECH_FRAME_LEN: usize = 10;

/// Number of simultaneous keycodes a Logitech frame can carry.
pub const LOGITECH_MAX_KEYS: usize = 6;

/// Delay between a key-down frame and its paired key-up frame, in
/// milliseconds.
pub const INTER_FRAME_DELAY_MS: u32 = 5;

/// Post-keystroke delay for raw HID pairs and script key lines, in
/// milliseconds.
pub const KEY_DELAY_MS: u32 = 10;

/// Post-keystroke delay for injected text characters, in milliseconds.
pub const TEXT_DELAY_MS: u32 = 5;

/// Upper bound accepted by the script `DELAY` directive, in milliseconds.
pub const SCRIPT_DELAY_MAX_MS: u32 = 30_000;

/// Address width, in bytes, configured on the radio for transmission.
pub const TX_ADDR_WIDTH: u8 = 5;

/// Maximum PA level, used for every injection burst.
pub const PA_LEVEL_MAX: u8 = 3;

/// Opcode of the "target discovered" notification record.
pub const EVT_TARGET_FOUND: u8 = 0x01;

/// Opcode of the "scan complete" notification record.
pub const EVT_SCAN_COMPLETE: u8 = 0x02;

/// Opcode of the "attack complete" notification record.
pub const EVT_ATTACK_COMPLETE: u8 = 0x03;

/// Size of the largest encoded notification record
/// (target discovered: opcode + 4 fixed bytes + 5 address bytes).
pub const EVT_MAX_LEN: usize = 10;
