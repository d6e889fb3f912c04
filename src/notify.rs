//! Outbound engine events and their binary wire records.
//!
//! The engine reports progress through a [`Notifier`], an opaque pub/sub
//! sink (a BLE notification characteristic on handheld builds).
//! Each event encodes to a small opcode-prefixed binary record; the
//! transport framing around it belongs to the notifier implementation.

use crate::consts::{
    ESB_ADDR_LEN, EVT_ATTACK_COMPLETE, EVT_MAX_LEN, EVT_SCAN_COMPLETE, EVT_TARGET_FOUND,
};
use crate::fingerprint::DeviceType;
use heapless::Vec;

/// An engine progress event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A new target was appended to the registry.
    TargetFound {
        /// Registry index of the new target.
        index: u8,
        /// Fingerprinted vendor protocol.
        device_type: DeviceType,
        /// Channel the device was first seen on.
        channel: u8,
        /// Link address bytes.
        address: [u8; ESB_ADDR_LEN],
        /// Meaningful length of `address`.
        addr_len: u8,
    },
    /// A scan session ended (stop request observed).
    ScanComplete {
        /// Number of targets in the registry at scan end.
        targets: u8,
    },
    /// An attack session ended (completion, stop, or aborted session).
    AttackComplete {
        /// Registry index that was under attack.
        target: u8,
    },
}

impl Event {
    /// Encodes the event as its binary notification record.
    ///
    /// - Target discovered:
    ///   `[opcode][index][deviceType][channel][addrLen][address...]`
    /// - Scan complete: `[opcode][targetCount]`
    /// - Attack complete: `[opcode][targetIndex]`
    pub fn encode(&self) -> Vec<u8, EVT_MAX_LEN> {
        let mut out = Vec::new();
        match *self {
            Event::TargetFound {
                index,
                device_type,
                channel,
                address,
                addr_len,
            } => {
                let _ = out.push(EVT_TARGET_FOUND);
                let _ = out.push(index);
                let _ = out.push(device_type as u8);
                let _ = out.push(channel);
                let _ = out.push(addr_len);
                let len = (addr_len as usize).min(ESB_ADDR_LEN);
                let _ = out.extend_from_slice(&address[..len]);
            }
            Event::ScanComplete { targets } => {
                let _ = out.push(EVT_SCAN_COMPLETE);
                let _ = out.push(targets);
            }
            Event::AttackComplete { target } => {
                let _ = out.push(EVT_ATTACK_COMPLETE);
                let _ = out.push(target);
            }
        }
        out
    }
}

/// Outbound event sink.
///
/// Implementations forward encoded records to whatever transport the
/// operator is on; the engine only guarantees ordering per session.
pub trait Notifier {
    /// Delivers one event.
    fn notify(&self, event: Event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_found_record_layout() {
        let event = Event::TargetFound {
            index: 2,
            device_type: DeviceType::Logitech,
            channel: 56,
            address: [0xDE, 0xAD, 0xBE, 0xEF, 0x42],
            addr_len: 5,
        };
        assert_eq!(
            event.encode().as_slice(),
            &[
                EVT_TARGET_FOUND,
                2,
                DeviceType::Logitech as u8,
                56,
                5,
                0xDE,
                0xAD,
                0xBE,
                0xEF,
                0x42
            ]
        );
    }

    #[test]
    fn short_address_truncates_the_record() {
        let event = Event::TargetFound {
            index: 0,
            device_type: DeviceType::MicrosoftPlain,
            channel: 2,
            address: [1, 2, 3, 0, 0],
            addr_len: 3,
        };
        assert_eq!(
            event.encode().as_slice(),
            &[EVT_TARGET_FOUND, 0, DeviceType::MicrosoftPlain as u8, 2, 3, 1, 2, 3]
        );
    }

    #[test]
    fn completion_records() {
        assert_eq!(
            Event::ScanComplete { targets: 4 }.encode().as_slice(),
            &[EVT_SCAN_COMPLETE, 4]
        );
        assert_eq!(
            Event::AttackComplete { target: 1 }.encode().as_slice(),
            &[EVT_ATTACK_COMPLETE, 1]
        );
    }
}
