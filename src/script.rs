//! Parser for the line-oriented keystroke script language.
//!
//! One directive per line, DuckyScript style:
//!
//! ```text
//! REM provision the box        comment, ignored
//! DELAY 500                    pause 500 ms
//! STRING hello world           inject each character
//! GUI r                        key name, optionally combined
//! CTRL ALT                     two names: modifiers OR together
//! ```
//!
//! A line that parses to nothing (unknown first token, out-of-range
//! delay) is a no-op, never a script-fatal error: real-world scripts are
//! messy and a bad line should not abort an attack mid-way.

use crate::consts::SCRIPT_DELAY_MAX_MS;
use crate::keymap::{KeyPress, ascii_to_hid, lookup_key_name};

/// One parsed script line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptLine<'a> {
    /// Comment, blank line, unknown directive, or out-of-range delay.
    Nop,
    /// Pause for this many milliseconds.
    Delay(u32),
    /// Inject each character of the text.
    Text(&'a str),
    /// Press a named key (with any combined modifiers).
    Key(KeyPress),
}

/// Parses one script line.
pub fn parse_line(line: &str) -> ScriptLine<'_> {
    let line = line.trim();
    if line.is_empty() || line.starts_with("REM") || line.starts_with("//") {
        return ScriptLine::Nop;
    }

    if let Some(rest) = line.strip_prefix("DELAY") {
        return match rest.trim().parse::<u32>() {
            Ok(ms) if (1..=SCRIPT_DELAY_MAX_MS).contains(&ms) => ScriptLine::Delay(ms),
            _ => ScriptLine::Nop,
        };
    }

    if let Some(text) = line.strip_prefix("STRING ") {
        return ScriptLine::Text(text);
    }

    parse_key_line(line)
}

/// Resolves a bare key-name line, with an optional second token.
///
/// The first token must be a known key name. A one-character second token
/// is looked up as ASCII: its modifier is OR-ed in and its keycode wins.
/// A longer second token is looked up as another key name: modifiers OR
/// together, and its keycode wins only when nonzero (so `CTRL SHIFT`
/// stays a pure chord).
fn parse_key_line(line: &str) -> ScriptLine<'_> {
    let mut tokens = line.splitn(2, ' ');
    let first = tokens.next().unwrap_or("");
    let second = tokens.next().map(str::trim).unwrap_or("");

    let Some(mut press) = lookup_key_name(first) else {
        return ScriptLine::Nop;
    };

    if second.len() == 1 {
        if let Some(entry) = ascii_to_hid(second.as_bytes()[0]) {
            press.modifier |= entry.modifier;
            press.keycode = entry.keycode;
        }
    } else if second.len() > 1 {
        if let Some(entry) = lookup_key_name(second) {
            press.modifier |= entry.modifier;
            if entry.keycode != 0 {
                press.keycode = entry.keycode;
            }
        }
    }

    ScriptLine::Key(press)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::{KEY_ENTER, MOD_ALT, MOD_CTRL, MOD_GUI};

    #[test]
    fn comments_and_blanks_are_nops() {
        assert_eq!(parse_line("REM set up stage two"), ScriptLine::Nop);
        assert_eq!(parse_line("// alt comment style"), ScriptLine::Nop);
        assert_eq!(parse_line("   "), ScriptLine::Nop);
    }

    #[test]
    fn delay_in_range_parses() {
        assert_eq!(parse_line("DELAY 10"), ScriptLine::Delay(10));
        assert_eq!(parse_line("DELAY 30000"), ScriptLine::Delay(30000));
    }

    #[test]
    fn delay_out_of_range_is_a_nop() {
        assert_eq!(parse_line("DELAY 40000"), ScriptLine::Nop);
        assert_eq!(parse_line("DELAY 0"), ScriptLine::Nop);
        assert_eq!(parse_line("DELAY soon"), ScriptLine::Nop);
    }

    #[test]
    fn string_keeps_the_raw_text() {
        assert_eq!(
            parse_line("STRING echo pwned > /tmp/x"),
            ScriptLine::Text("echo pwned > /tmp/x")
        );
    }

    #[test]
    fn bare_key_name() {
        assert_eq!(
            parse_line("ENTER"),
            ScriptLine::Key(KeyPress::plain(KEY_ENTER))
        );
    }

    #[test]
    fn gui_r_combines_modifier_and_character() {
        assert_eq!(
            parse_line("GUI r"),
            ScriptLine::Key(KeyPress {
                modifier: MOD_GUI,
                keycode: 0x15
            })
        );
    }

    #[test]
    fn two_names_or_their_modifiers() {
        assert_eq!(
            parse_line("CTRL ALT"),
            ScriptLine::Key(KeyPress {
                modifier: MOD_CTRL | MOD_ALT,
                keycode: 0
            })
        );
        assert_eq!(
            parse_line("CTRL DELETE"),
            ScriptLine::Key(KeyPress {
                modifier: MOD_CTRL,
                keycode: 0x4C
            })
        );
    }

    #[test]
    fn unknown_first_token_is_skipped() {
        assert_eq!(parse_line("FROBNICATE now"), ScriptLine::Nop);
    }

    #[test]
    fn key_names_are_case_insensitive() {
        assert_eq!(
            parse_line("gui r"),
            ScriptLine::Key(KeyPress {
                modifier: MOD_GUI,
                keycode: 0x15
            })
        );
    }
}
