//! Read-only access to stored keystroke scripts.
//!
//! Scripts live wherever the host keeps them (an SD card on handheld
//! builds); the engine only ever reads a whole script by path. The
//! trait exists so tests can feed scripts from memory.

use std::io;

/// Script file source.
pub trait ScriptStore {
    /// Reads the script at `path` into memory.
    fn load(&self, path: &str) -> io::Result<String>;
}

/// [`ScriptStore`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl ScriptStore for FsStore {
    fn load(&self, path: &str) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}
