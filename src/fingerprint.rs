//! Vendor fingerprinting of captured HID payloads.
//!
//! Wireless HID transmitters do not announce a vendor ID; the transmitting
//! device is classified by the *shape* of its verified payload: length
//! plus a few leading bytes. Payloads that match no known shape are
//! dropped on the floor: an unclassified capture never reaches the target
//! registry.

/// Vendor protocol spoken by a discovered device.
///
/// The discriminants are the values carried in the
/// [`TargetFound`](crate::notify::Event::TargetFound) notification record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DeviceType {
    /// Microsoft wireless keyboard, plaintext frames.
    MicrosoftPlain = 0,
    /// Microsoft wireless keyboard with the address-keyed XOR keystream.
    MicrosoftEncrypted = 1,
    /// Logitech Unifying keyboard or mouse.
    Logitech = 2,
}

/// Classifies a verified payload, or returns `None` for unknown shapes.
///
/// Known shapes:
/// - 19 bytes, `payload[0] == 0x08`, `payload[6] == 0x40`: Microsoft,
///   plaintext keyboard report.
/// - 19 bytes, `payload[0] == 0x0A`: Microsoft, encrypted keyboard report.
/// - Leading `0x00` and one of the Logitech Unifying report shapes:
///   10-byte keepalive (`0xC2`) or mouse movement (`0x4F`), 22-byte
///   encrypted keystroke (`0xD3`), 5-byte wake-up (`0x40`).
pub fn classify(payload: &[u8]) -> Option<DeviceType> {
    if payload.len() == 19 {
        if payload[0] == 0x08 && payload[6] == 0x40 {
            return Some(DeviceType::MicrosoftPlain);
        }
        if payload[0] == 0x0A {
            return Some(DeviceType::MicrosoftEncrypted);
        }
    }

    if payload.len() >= 2 && payload[0] == 0x00 {
        let logitech = matches!(
            (payload.len(), payload[1]),
            (10, 0xC2) | (10, 0x4F) | (22, 0xD3) | (5, 0x40)
        );
        if logitech {
            return Some(DeviceType::Logitech);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(len: usize, lead: &[u8]) -> heapless::Vec<u8, 32> {
        let mut p = heapless::Vec::new();
        p.resize_default(len).unwrap();
        p[..lead.len()].copy_from_slice(lead);
        p
    }

    #[test]
    fn microsoft_plain_shape() {
        let p = payload(19, &[0x08, 0, 0, 0, 0, 0, 0x40]);
        assert_eq!(classify(&p), Some(DeviceType::MicrosoftPlain));
    }

    #[test]
    fn microsoft_encrypted_shape() {
        let p = payload(19, &[0x0A]);
        assert_eq!(classify(&p), Some(DeviceType::MicrosoftEncrypted));
    }

    #[test]
    fn microsoft_without_data_flag_is_unknown() {
        let p = payload(19, &[0x08, 0, 0, 0, 0, 0, 0x00]);
        assert_eq!(classify(&p), None);
    }

    #[test]
    fn logitech_shapes() {
        assert_eq!(
            classify(&payload(10, &[0x00, 0xC2])),
            Some(DeviceType::Logitech)
        );
        assert_eq!(
            classify(&payload(10, &[0x00, 0x4F])),
            Some(DeviceType::Logitech)
        );
        assert_eq!(
            classify(&payload(22, &[0x00, 0xD3])),
            Some(DeviceType::Logitech)
        );
        assert_eq!(
            classify(&payload(5, &[0x00, 0x40])),
            Some(DeviceType::Logitech)
        );
    }

    #[test]
    fn unknown_subtype_is_unclassified() {
        assert_eq!(classify(&payload(10, &[0x00, 0x99])), None);
    }

    #[test]
    fn wrong_length_is_unclassified() {
        assert_eq!(classify(&payload(12, &[0x00, 0xC2])), None);
        assert_eq!(classify(&payload(18, &[0x08, 0, 0, 0, 0, 0, 0x40])), None);
    }

    #[test]
    fn short_payloads_do_not_panic() {
        assert_eq!(classify(&[]), None);
        assert_eq!(classify(&[0x00]), None);
    }
}
