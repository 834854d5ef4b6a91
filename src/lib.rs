//! Hardware-independent core of the macropad firmware: key bindings, scanning, report emission,
//! scan scheduling, the scan loop and the LED animation.
//!
//! The firmware binary (`src/main.rs`, `build-binary` feature) plugs embassy-rp pins and
//! embassy-usb into the traits defined here. Building this library alone needs no hardware
//! crates, so `cargo test` runs on the host.

#![cfg_attr(not(test), no_std)]

pub mod animator;
pub mod config;
pub mod emitter;
pub mod error;
pub mod keycode;
pub mod keymap;
pub mod report;
pub mod scan;
pub mod scanner;
pub mod scheduler;

pub use emitter::{Emission, EmitterState, ReportEmitter, ReportTransport, StatusIndicator};
pub use error::Error;
pub use keymap::{Keymap, Level, MACROPAD_KEYMAP};
pub use report::KeyReport;
pub use scan::{scan, ActiveKeySet, LineReader};
pub use scanner::{Scanner, Tick};
pub use scheduler::{LinkState, ReportMode, ScanScheduler, SchedulerAction};
