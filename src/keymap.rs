//! USB HID usage tables for keystroke construction.
//!
//! Both vendor codecs ultimately carry a standard USB HID keyboard report:
//! one modifier byte plus a keycode from the HID usage table (US layout).
//! This module maps printable ASCII to `(modifier, keycode)` pairs and
//! resolves the key names used by the script language (`ENTER`, `GUI`,
//! `F5`, ...). Characters and names with no mapping are skipped by the
//! callers, never treated as errors.

/// No modifier.
pub const MOD_NONE: u8 = 0x00;
/// Left Control.
pub const MOD_CTRL: u8 = 0x01;
/// Left Shift.
pub const MOD_SHIFT: u8 = 0x02;
/// Left Alt.
pub const MOD_ALT: u8 = 0x04;
/// Left GUI (Windows / Command).
pub const MOD_GUI: u8 = 0x08;

/// HID usage for the Enter key.
pub const KEY_ENTER: u8 = 0x28;

/// A logical keypress: HID modifier mask plus keycode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyPress {
    /// HID modifier bitmask.
    pub modifier: u8,
    /// HID keycode (usage ID, keyboard page).
    pub keycode: u8,
}

impl KeyPress {
    /// A keypress with no modifier.
    pub const fn plain(keycode: u8) -> Self {
        Self {
            modifier: MOD_NONE,
            keycode,
        }
    }

    /// A keypress with Shift held.
    const fn shifted(keycode: u8) -> Self {
        Self {
            modifier: MOD_SHIFT,
            keycode,
        }
    }

    /// A bare modifier with no keycode.
    const fn modifier_only(modifier: u8) -> Self {
        Self {
            modifier,
            keycode: 0,
        }
    }
}

/// Maps a printable ASCII byte (US layout) to its HID keypress.
///
/// Newline maps to Enter with no modifier; tab maps to Tab. Returns
/// `None` for bytes with no keyboard representation, which the injection
/// paths silently skip.
pub fn ascii_to_hid(c: u8) -> Option<KeyPress> {
    let press = match c {
        b'a'..=b'z' => KeyPress::plain(c - b'a' + 0x04),
        b'A'..=b'Z' => KeyPress::shifted(c - b'A' + 0x04),
        b'1'..=b'9' => KeyPress::plain(c - b'1' + 0x1E),
        b'0' => KeyPress::plain(0x27),
        b'\n' => KeyPress::plain(KEY_ENTER),
        b'\t' => KeyPress::plain(0x2B),
        b' ' => KeyPress::plain(0x2C),
        b'-' => KeyPress::plain(0x2D),
        b'=' => KeyPress::plain(0x2E),
        b'[' => KeyPress::plain(0x2F),
        b']' => KeyPress::plain(0x30),
        b'\\' => KeyPress::plain(0x31),
        b';' => KeyPress::plain(0x33),
        b'\'' => KeyPress::plain(0x34),
        b'`' => KeyPress::plain(0x35),
        b',' => KeyPress::plain(0x36),
        b'.' => KeyPress::plain(0x37),
        b'/' => KeyPress::plain(0x38),
        b'!' => KeyPress::shifted(0x1E),
        b'@' => KeyPress::shifted(0x1F),
        b'#' => KeyPress::shifted(0x20),
        b'$' => KeyPress::shifted(0x21),
        b'%' => KeyPress::shifted(0x22),
        b'^' => KeyPress::shifted(0x23),
        b'&' => KeyPress::shifted(0x24),
        b'*' => KeyPress::shifted(0x25),
        b'(' => KeyPress::shifted(0x26),
        b')' => KeyPress::shifted(0x27),
        b'_' => KeyPress::shifted(0x2D),
        b'+' => KeyPress::shifted(0x2E),
        b'{' => KeyPress::shifted(0x2F),
        b'}' => KeyPress::shifted(0x30),
        b'|' => KeyPress::shifted(0x31),
        b':' => KeyPress::shifted(0x33),
        b'"' => KeyPress::shifted(0x34),
        b'~' => KeyPress::shifted(0x35),
        b'<' => KeyPress::shifted(0x36),
        b'>' => KeyPress::shifted(0x37),
        b'?' => KeyPress::shifted(0x38),
        _ => return None,
    };
    Some(press)
}

/// Script key names and their HID mappings.
///
/// Modifier names (`CTRL`, `GUI`, ...) map to a bare modifier so a second
/// token can contribute the keycode (`GUI r`). Aliases follow the common
/// DuckyScript spellings.
static KEY_NAMES: &[(&str, KeyPress)] = &[
    ("ENTER", KeyPress::plain(KEY_ENTER)),
    ("ESC", KeyPress::plain(0x29)),
    ("ESCAPE", KeyPress::plain(0x29)),
    ("BACKSPACE", KeyPress::plain(0x2A)),
    ("TAB", KeyPress::plain(0x2B)),
    ("SPACE", KeyPress::plain(0x2C)),
    ("CAPSLOCK", KeyPress::plain(0x39)),
    ("PRINTSCREEN", KeyPress::plain(0x46)),
    ("SCROLLLOCK", KeyPress::plain(0x47)),
    ("PAUSE", KeyPress::plain(0x48)),
    ("BREAK", KeyPress::plain(0x48)),
    ("INSERT", KeyPress::plain(0x49)),
    ("HOME", KeyPress::plain(0x4A)),
    ("PAGEUP", KeyPress::plain(0x4B)),
    ("DELETE", KeyPress::plain(0x4C)),
    ("DEL", KeyPress::plain(0x4C)),
    ("END", KeyPress::plain(0x4D)),
    ("PAGEDOWN", KeyPress::plain(0x4E)),
    ("RIGHT", KeyPress::plain(0x4F)),
    ("RIGHTARROW", KeyPress::plain(0x4F)),
    ("LEFT", KeyPress::plain(0x50)),
    ("LEFTARROW", KeyPress::plain(0x50)),
    ("DOWN", KeyPress::plain(0x51)),
    ("DOWNARROW", KeyPress::plain(0x51)),
    ("UP", KeyPress::plain(0x52)),
    ("UPARROW", KeyPress::plain(0x52)),
    ("APP", KeyPress::plain(0x65)),
    ("MENU", KeyPress::plain(0x65)),
    ("F1", KeyPress::plain(0x3A)),
    ("F2", KeyPress::plain(0x3B)),
    ("F3", KeyPress::plain(0x3C)),
    ("F4", KeyPress::plain(0x3D)),
    ("F5", KeyPress::plain(0x3E)),
    ("F6", KeyPress::plain(0x3F)),
    ("F7", KeyPress::plain(0x40)),
    ("F8", KeyPress::plain(0x41)),
    ("F9", KeyPress::plain(0x42)),
    ("F10", KeyPress::plain(0x43)),
    ("F11", KeyPress::plain(0x44)),
    ("F12", KeyPress::plain(0x45)),
    ("CTRL", KeyPress::modifier_only(MOD_CTRL)),
    ("CONTROL", KeyPress::modifier_only(MOD_CTRL)),
    ("SHIFT", KeyPress::modifier_only(MOD_SHIFT)),
    ("ALT", KeyPress::modifier_only(MOD_ALT)),
    ("GUI", KeyPress::modifier_only(MOD_GUI)),
    ("WINDOWS", KeyPress::modifier_only(MOD_GUI)),
    ("COMMAND", KeyPress::modifier_only(MOD_GUI)),
];

/// Resolves a script key name (case-insensitive) to its HID mapping.
pub fn lookup_key_name(name: &str) -> Option<KeyPress> {
    KEY_NAMES
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, press)| press)
}
