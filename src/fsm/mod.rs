//! Fan control state: the four mode axes and the decision type produced by
//! environment evaluation.
//!
//! ```text
//!   readings ──▶ FanContext::evaluate() ──▶ SpeedDecision ──▶ FanController
//!                 (pure, no I/O)                              (arbitration)
//! ```
//!
//! The modes are kept together in one [`Modes`] value owned by
//! [`context::FanContext`].  Actuators receive it by reference whenever they
//! refresh their outputs, so there is exactly one authoritative copy.

pub mod context;

use serde::{Deserialize, Serialize};

use crate::error::Error;

// ---------------------------------------------------------------------------
// Mode axes
// ---------------------------------------------------------------------------

/// Top-level on/off/automatic governance of the fan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum OperatingMode {
    Off = 0,
    Manual = 1,
    Automatic = 2,
}

/// Airflow topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum VentilationMode {
    /// Balanced operation, airflow direction alternates periodically.
    HeatRecovery = 0,
    SupplyAir = 1,
    ExhaustAir = 2,
}

/// Algorithm used to pick the automatic speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ControlMode {
    /// Fixed speed once the humidity threshold is exceeded.
    Threshold = 0,
    /// Speed proportional to the humidity excess.
    Adaptive = 1,
}

/// How inside/outside humidity readings are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum HumiditySensorMode {
    Relative = 0,
    /// Dew-point comparison of inside vs. outside air.
    Absolute = 1,
}

macro_rules! impl_try_from_index {
    ($ty:ident, $what:literal, { $($idx:literal => $variant:ident),+ $(,)? }) => {
        impl TryFrom<u8> for $ty {
            type Error = Error;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $($idx => Ok(Self::$variant),)+
                    _ => Err(Error::InvalidEnumerant { what: $what, value }),
                }
            }
        }
    };
}

impl_try_from_index!(OperatingMode, "operating mode", {
    0 => Off,
    1 => Manual,
    2 => Automatic,
});
impl_try_from_index!(VentilationMode, "ventilation mode", {
    0 => HeatRecovery,
    1 => SupplyAir,
    2 => ExhaustAir,
});
impl_try_from_index!(ControlMode, "control mode", {
    0 => Threshold,
    1 => Adaptive,
});
impl_try_from_index!(HumiditySensorMode, "humidity sensor mode", {
    0 => Relative,
    1 => Absolute,
});

// ---------------------------------------------------------------------------
// Mode set
// ---------------------------------------------------------------------------

/// All four mode axes of one fan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modes {
    pub operating: OperatingMode,
    pub ventilation: VentilationMode,
    pub control: ControlMode,
    pub humidity_sensor: HumiditySensorMode,
}

impl Default for Modes {
    fn default() -> Self {
        Self {
            operating: OperatingMode::Manual,
            ventilation: VentilationMode::HeatRecovery,
            control: ControlMode::Threshold,
            humidity_sensor: HumiditySensorMode::Relative,
        }
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Outcome of one environment evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedDecision {
    /// Leave the current speed untouched (inside the hysteresis band, or
    /// not in automatic mode).
    Hold,
    /// Switch the fan off.
    Stop,
    /// Run at the given (unclamped) speed index.
    Run(i16),
}
