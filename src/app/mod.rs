//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the rules for one ventilation board: the per-fan
//! control state machine, the bus-facing channel glue and the board
//! service that owns them.  All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod channel;
pub mod commands;
pub mod controller;
pub mod events;
pub mod ports;
pub mod service;
