//! GPIO / peripheral pin assignments for the fan controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Each fan uses two PWM outputs (one per motor
//! winding) and one digital output that switches the fan's supply relay.

use serde::{Deserialize, Serialize};

/// The three outputs driving one two-phase fan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanPins {
    /// PWM output for winding S1.
    pub phase1: u8,
    /// PWM output for winding S2.
    pub phase2: u8,
    /// Digital output: HIGH = fan supply on.
    pub enable: u8,
}

// ---------------------------------------------------------------------------
// Fan 1
// ---------------------------------------------------------------------------

pub const FAN1: FanPins = FanPins {
    phase1: 1,
    phase2: 2,
    enable: 3,
};

// ---------------------------------------------------------------------------
// Fan 2
// ---------------------------------------------------------------------------

pub const FAN2: FanPins = FanPins {
    phase1: 4,
    phase2: 5,
    enable: 6,
};

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// PWM carrier frequency for the fan windings (10 kHz).
pub const FAN_PWM_FREQ_HZ: u32 = 10_000;
/// PWM timer resolution (bits).  10-bit gives 0 – 1023 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 10;
/// Number of duty levels at [`PWM_RESOLUTION_BITS`].
pub const PWM_RESOLUTION: u16 = 1 << PWM_RESOLUTION_BITS;
