//! Ventilation fan firmware library.
//!
//! Exposes the pure-logic modules for integration testing.  The control
//! core talks to the board only through the port traits in [`app::ports`];
//! ESP-IDF specifics live in the binary behind the `espidf` feature.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod pins;


pub use error::{Error, Result};
