//! Actuator drivers and timer helpers.

pub mod cross_flow;
pub mod timer_wheel;
