//! The radio seam: an opaque nRF24-class transceiver.
//!
//! The engine never touches SPI registers or pins itself; everything it
//! needs from the hardware is behind [`RadioLink`]. Implementations wrap
//! a real transceiver driver (and its bus arbitration) on firmware, or a
//! scripted mock in tests. `receive` is non-blocking in the `nb` sense:
//! `WouldBlock` means the listen window closed with nothing captured,
//! which during a scan is the overwhelmingly common outcome.

/// Over-the-air data rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataRate {
    /// 1 Mbps.
    Mbps1,
    /// 2 Mbps, what the targeted HID transceivers use.
    Mbps2,
}

/// Transceiver primitives consumed by the scan and attack loops.
///
/// Mutual exclusion against other users of the same radio (jammer,
/// spectrum tools) is the caller's concern: the engine keeps the radio
/// behind a lock and holds it for the duration of a scan pass or
/// injection burst.
pub trait RadioLink {
    /// Hardware-level failure type.
    type Error: core::fmt::Debug;

    /// Tunes to a 2.4 GHz channel (0..=125).
    fn set_channel(&mut self, channel: u8) -> Result<(), Self::Error>;

    /// Selects the over-the-air data rate.
    fn set_data_rate(&mut self, rate: DataRate) -> Result<(), Self::Error>;

    /// Configures the on-air address width in bytes.
    fn set_address_width(&mut self, width: u8) -> Result<(), Self::Error>;

    /// Sets the power-amplifier level (0..=3).
    fn set_pa_level(&mut self, level: u8) -> Result<(), Self::Error>;

    /// Enters promiscuous receive mode: short pseudo-address matching the
    /// preamble, CRC checking off, raw bytes delivered as captured.
    fn enter_promiscuous(&mut self) -> Result<(), Self::Error>;

    /// Reads one raw capture into `buf`, returning the number of bytes.
    ///
    /// `Err(nb::Error::WouldBlock)` means nothing was captured this
    /// window.
    fn receive(&mut self, buf: &mut [u8]) -> nb::Result<usize, Self::Error>;

    /// Configures transmit mode addressed to `address`.
    fn set_tx_mode(&mut self, address: &[u8]) -> Result<(), Self::Error>;

    /// Transmits one frame.
    fn transmit(&mut self, frame: &[u8]) -> Result<(), Self::Error>;

    /// Drives the CE pin low, idling the RF front end.
    fn ce_low(&mut self) -> Result<(), Self::Error>;

    /// Drives the CE pin high, (re-)arming the RF front end.
    fn ce_high(&mut self) -> Result<(), Self::Error>;
}
