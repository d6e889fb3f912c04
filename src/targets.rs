//! Bounded, deduplicated registry of discovered targets.
//!
//! Every CRC-verified, classified capture is upserted here, keyed by the
//! raw link address. A device seen again (possibly after hopping) keeps
//! its registry slot and only has its channel refreshed, so the slot index
//! stays stable for the whole scan session; it is the handle the operator
//! uses to pick an attack target. The registry is cleared in bulk when a
//! new scan starts and never shrinks mid-session.

use crate::consts::{ESB_ADDR_LEN, MAX_TARGETS};
use crate::fingerprint::DeviceType;
use heapless::Vec;

/// A discovered wireless HID device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Link address bytes; only the first `addr_len` are meaningful.
    pub address: [u8; ESB_ADDR_LEN],
    /// Number of meaningful address bytes (1..=5).
    pub addr_len: u8,
    /// Channel the device was last seen on.
    pub channel: u8,
    /// Vendor protocol fingerprinted from the payload shape.
    pub device_type: DeviceType,
    /// Whether this slot refers to a live discovery from the current scan.
    pub active: bool,
}

impl Target {
    /// The meaningful address bytes.
    pub fn address_bytes(&self) -> &[u8] {
        &self.address[..self.addr_len as usize]
    }
}

/// Outcome of a registry upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// A new slot was appended at this index.
    Added(usize),
    /// The address was already known; its channel was refreshed.
    Updated(usize),
    /// The registry is at capacity; the sighting was dropped.
    Full,
}

/// Fixed-capacity, insertion-ordered set of [`Target`]s.
#[derive(Debug, Default)]
pub struct TargetRegistry {
    slots: Vec<Target, MAX_TARGETS>,
}

impl TargetRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Finds the slot holding `address`, comparing length and raw bytes
    /// over active entries only.
    pub fn find(&self, address: &[u8]) -> Option<usize> {
        self.slots
            .iter()
            .position(|t| t.active && t.address_bytes() == address)
    }

    /// Records a sighting of `address` on `channel`.
    ///
    /// A known address keeps its slot and type; only the channel is
    /// refreshed (devices hop). A new address is appended if capacity
    /// remains; at capacity the sighting is dropped with [`Upsert::Full`].
    /// Addresses longer than [`ESB_ADDR_LEN`] are truncated, though the
    /// reconstructor always hands us exactly 5 bytes.
    pub fn upsert(&mut self, address: &[u8], channel: u8, device_type: DeviceType) -> Upsert {
        if let Some(idx) = self.find(address) {
            self.slots[idx].channel = channel;
            return Upsert::Updated(idx);
        }

        let mut addr = [0u8; ESB_ADDR_LEN];
        let len = address.len().min(ESB_ADDR_LEN);
        addr[..len].copy_from_slice(&address[..len]);

        let target = Target {
            address: addr,
            addr_len: len as u8,
            channel,
            device_type,
            active: true,
        };
        match self.slots.push(target) {
            Ok(()) => Upsert::Added(self.slots.len() - 1),
            Err(_) => Upsert::Full,
        }
    }

    /// Returns the target at `index` if that slot is active.
    pub fn get(&self, index: usize) -> Option<&Target> {
        self.slots.get(index).filter(|t| t.active)
    }

    /// Number of active targets.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|t| t.active).count()
    }

    /// `true` when no active targets are known.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over all slots in sighting order.
    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.slots.iter()
    }

    /// Deactivates and discards every slot. Called only at the start of a
    /// new scan session, never while an attack holds a target index.
    pub fn clear(&mut self) {
        for t in self.slots.iter_mut() {
            t.active = false;
        }
        self.slots.clear();
    }
}
