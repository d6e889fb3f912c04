//! # hidjack
//!
//! A sniffing and keystroke-injection engine for the 2.4 GHz wireless HID
//! protocols of the MouseJack family, built around nRF24-class (Enhanced
//! ShockBurst) transceivers.
//!
//! The crate turns a promiscuous-capable radio into a three-stage pipeline:
//!
//! - **Sniff**: sweep the band in promiscuous mode, recover bit-shifted
//!   frames from raw captures, and validate them with the link CRC
//! - **Fingerprint**: classify verified payloads by shape into the known
//!   vulnerable vendor protocols (Microsoft plain/encrypted, Logitech
//!   Unifying) and collect them in a bounded target registry
//! - **Inject**: forge vendor keyboard frames (checksums, sequence
//!   counters, XOR keystream) and type raw HID pairs, ASCII strings, or
//!   DuckyScript-style scripts at a chosen target
//!
//! ## Crate features
//! | Feature         | Description |
//! |-----------------|-------------|
//! | `std` (default) | Enables the threaded session [`engine`] and the filesystem script [`store`] |
//!
//! With `std` disabled the protocol layers (CRC, frame reconstruction,
//! fingerprinting, codecs, script parsing, keystroke sources) remain
//! available for `#![no_std]` firmware, which brings its own scheduling.
//!
//! ## Usage
//!
//! ```ignore
//! use hidjack::engine::Engine;
//!
//! let mut engine = Engine::new(radio, notifier);
//! engine.start_scan()?;
//! // ... TargetFound notifications arrive as devices chatter ...
//! engine.stop_scan();
//! engine.wait_idle();
//! engine.inject_string(0, "echo hello")?;
//! ```
//!
//! `radio` is anything implementing [`radio::RadioLink`]; `notifier` is
//! anything implementing [`notify::Notifier`]. Sessions run on a
//! background thread and report through the notifier.
//!
//! ## Integration Notes
//!
//! - Injection timing matters: the inter-frame and post-keystroke delays
//!   in [`consts`] are what the targeted receivers tolerate, and
//!   tightening them drops keystrokes on real hardware.
//! - The engine shares the radio through a lock and backs off when
//!   another user holds it; only one session runs at a time.
//! - Use only against devices you are authorized to assess.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

pub use heapless;

pub mod codec;
pub mod consts;
pub mod crc;
#[cfg(feature = "std")]
pub mod engine;
pub mod fingerprint;
pub mod frame;
pub mod keymap;
pub mod notify;
pub mod radio;
pub mod script;
pub mod source;
#[cfg(feature = "std")]
pub mod store;
pub mod targets;
