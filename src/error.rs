//! Unified error types for the ventilation firmware.
//!
//! The control core itself has no failure paths: speeds are clamped and
//! invalid mode indices are rejected at the edge, before they reach the
//! controller.  This enum covers those edges (bus index conversion,
//! configuration validation, channel routing).  All variants are `Copy`.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A raw bus/parameter index does not name a variant of the mode enum.
    InvalidEnumerant { what: &'static str, value: u8 },
    /// Configuration failed range validation.
    Config(&'static str),
    /// A command addressed a channel that does not exist.
    UnknownChannel(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnumerant { what, value } => {
                write!(f, "invalid {what} index: {value}")
            }
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::UnknownChannel(idx) => write!(f, "unknown channel: {idx}"),
        }
    }
}

impl core::error::Error for Error {}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
