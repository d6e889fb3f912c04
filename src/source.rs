//! Keystroke sources: lazy producers of the injection event stream.
//!
//! Three interchangeable origins feed the injector with the same stream of
//! [`KeyEvent`]s:
//!
//! - [`RawKeys`]: a flat byte buffer of `(modifier, keycode)` pairs, no
//!   translation; the operator already speaks HID.
//! - [`TextKeys`]: an ASCII string pushed through the
//!   [`keymap`](crate::keymap) lookup table; unmappable characters are
//!   skipped.
//! - [`ScriptKeys`]: a parsed keystroke script, with `STRING` lines
//!   flattened into per-character strokes and `DELAY` lines surfaced as
//!   explicit waits.
//!
//! Each stroke carries the post-keystroke delay its origin calls for, so
//! the injector can pace frames without knowing where they came from.

use crate::consts::{KEY_DELAY_MS, TEXT_DELAY_MS};
use crate::keymap::{KeyPress, ascii_to_hid};
use crate::script::{ScriptLine, parse_line};

/// One step of an injection session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// Press (and then release) a key, pausing afterwards.
    Stroke {
        /// The key to press.
        press: KeyPress,
        /// Pause after the key-up frame, in milliseconds.
        post_delay_ms: u32,
    },
    /// Pause without touching the keyboard (script `DELAY`).
    Wait(u32),
}

impl KeyEvent {
    fn stroke(press: KeyPress, post_delay_ms: u32) -> Self {
        KeyEvent::Stroke {
            press,
            post_delay_ms,
        }
    }
}

/// Keystrokes from a raw `(modifier, keycode)` pair buffer.
///
/// A trailing odd byte is ignored.
#[derive(Debug, Clone)]
pub struct RawKeys<'a> {
    pairs: core::slice::ChunksExact<'a, u8>,
}

impl<'a> RawKeys<'a> {
    /// Wraps a flat pair buffer.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            pairs: bytes.chunks_exact(2),
        }
    }
}

impl<'a> Iterator for RawKeys<'a> {
    type Item = KeyEvent;

    fn next(&mut self) -> Option<KeyEvent> {
        let pair = self.pairs.next()?;
        let press = KeyPress {
            modifier: pair[0],
            keycode: pair[1],
        };
        Some(KeyEvent::stroke(press, KEY_DELAY_MS))
    }
}

/// Keystrokes translated from an ASCII string.
///
/// Unmappable characters are skipped silently; newline becomes Enter.
#[derive(Debug, Clone)]
pub struct TextKeys<'a> {
    bytes: core::str::Bytes<'a>,
}

impl<'a> TextKeys<'a> {
    /// Wraps a text to inject.
    pub fn new(text: &'a str) -> Self {
        Self {
            bytes: text.bytes(),
        }
    }
}

impl<'a> Iterator for TextKeys<'a> {
    type Item = KeyEvent;

    fn next(&mut self) -> Option<KeyEvent> {
        loop {
            let c = self.bytes.next()?;
            if let Some(press) = ascii_to_hid(c) {
                return Some(KeyEvent::stroke(press, TEXT_DELAY_MS));
            }
        }
    }
}

/// Keystrokes from a parsed script.
///
/// Lines are consumed lazily; a `STRING` line is expanded one character
/// at a time so a stop request between characters takes effect promptly.
#[derive(Debug, Clone)]
pub struct ScriptKeys<'a> {
    lines: core::str::Lines<'a>,
    pending_text: Option<TextKeys<'a>>,
}

impl<'a> ScriptKeys<'a> {
    /// Wraps the full script text.
    pub fn new(script: &'a str) -> Self {
        Self {
            lines: script.lines(),
            pending_text: None,
        }
    }
}

impl<'a> Iterator for ScriptKeys<'a> {
    type Item = KeyEvent;

    fn next(&mut self) -> Option<KeyEvent> {
        loop {
            if let Some(text) = &mut self.pending_text {
                match text.next() {
                    Some(ev) => return Some(ev),
                    None => self.pending_text = None,
                }
            }

            match parse_line(self.lines.next()?) {
                ScriptLine::Nop => continue,
                ScriptLine::Delay(ms) => return Some(KeyEvent::Wait(ms)),
                ScriptLine::Text(text) => self.pending_text = Some(TextKeys::new(text)),
                ScriptLine::Key(press) => return Some(KeyEvent::stroke(press, KEY_DELAY_MS)),
            }
        }
    }
}

/// A keystroke source of any origin.
#[derive(Debug, Clone)]
pub enum KeystrokeSource<'a> {
    /// Flat `(modifier, keycode)` pairs.
    Raw(RawKeys<'a>),
    /// ASCII text.
    Text(TextKeys<'a>),
    /// Keystroke script.
    Script(ScriptKeys<'a>),
}

impl<'a> KeystrokeSource<'a> {
    /// Source over raw HID pairs.
    pub fn raw(bytes: &'a [u8]) -> Self {
        KeystrokeSource::Raw(RawKeys::new(bytes))
    }

    /// Source over an ASCII string.
    pub fn text(text: &'a str) -> Self {
        KeystrokeSource::Text(TextKeys::new(text))
    }

    /// Source over a script body.
    pub fn script(script: &'a str) -> Self {
        KeystrokeSource::Script(ScriptKeys::new(script))
    }
}

impl<'a> Iterator for KeystrokeSource<'a> {
    type Item = KeyEvent;

    fn next(&mut self) -> Option<KeyEvent> {
        match self {
            KeystrokeSource::Raw(it) => it.next(),
            KeystrokeSource::Text(it) => it.next(),
            KeystrokeSource::Script(it) => it.next(),
        }
    }
}
