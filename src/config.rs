//! Channel and module configuration.
//!
//! All tunable parameters for the fan channels.  Values are supplied by the
//! host at startup; this crate does not persist them.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fsm::{ControlMode, HumiditySensorMode, OperatingMode, VentilationMode};

/// Maximum number of fan channels on one board.
pub const MAX_CHANNELS: usize = 2;

/// How a mode axis is governed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeSetting<M> {
    /// Applied once at setup; bus commands for this axis are ignored.
    Fixed(M),
    /// Left at the power-on default; selected at runtime over the bus.
    BusSwitchable,
}

impl<M: Copy> ModeSetting<M> {
    pub fn fixed(&self) -> Option<M> {
        match self {
            Self::Fixed(m) => Some(*m),
            Self::BusSwitchable => None,
        }
    }

    pub fn is_bus_switchable(&self) -> bool {
        matches!(self, Self::BusSwitchable)
    }
}

/// Configuration of one fan channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    // --- Modes ---
    pub operating_mode: ModeSetting<OperatingMode>,
    pub ventilation_mode: ModeSetting<VentilationMode>,
    pub control_mode: ControlMode,
    pub humidity_sensor_mode: HumiditySensorMode,

    // --- Humidity thresholds ---
    /// Relative humidity (%) above which the fan engages.
    pub threshold_humidity_on: f32,
    /// Relative humidity (%) below which the fan releases.
    pub threshold_humidity_off: f32,
    /// Speed index (0-5) used in threshold control mode.
    pub threshold_speed: u8,

    // --- Auto-stop timer ---
    /// Preset runtime (seconds); 0 selects `timer_manual_secs`.
    pub timer_selection_secs: u32,
    /// Free runtime (seconds) used when no preset is selected.
    pub timer_manual_secs: u32,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            operating_mode: ModeSetting::Fixed(OperatingMode::Manual),
            ventilation_mode: ModeSetting::Fixed(VentilationMode::HeatRecovery),
            control_mode: ControlMode::Threshold,
            humidity_sensor_mode: HumiditySensorMode::Relative,

            threshold_humidity_on: 60.0,
            threshold_humidity_off: 60.0,
            threshold_speed: 4,

            timer_selection_secs: 0,
            timer_manual_secs: 1_800, // 30 min
        }
    }
}

impl ChannelConfig {
    /// Countdown length for a timer activation.
    pub fn timer_runtime_secs(&self) -> u32 {
        if self.timer_selection_secs == 0 {
            self.timer_manual_secs
        } else {
            self.timer_selection_secs
        }
    }

    /// Reject values the controller cannot sensibly act on.
    pub fn validate(&self) -> Result<()> {
        let humidity_ok = |v: f32| v.is_finite() && (0.0..=100.0).contains(&v);
        if !humidity_ok(self.threshold_humidity_on) {
            return Err(Error::Config("threshold_humidity_on must be within 0-100 %"));
        }
        if !humidity_ok(self.threshold_humidity_off) {
            return Err(Error::Config("threshold_humidity_off must be within 0-100 %"));
        }
        if self.threshold_speed > crate::drivers::cross_flow::MAX_SPEED {
            return Err(Error::Config("threshold_speed must be within 0-5"));
        }
        if self.timer_runtime_secs() == 0 {
            return Err(Error::Config("timer runtime must be non-zero"));
        }
        Ok(())
    }
}

/// Board-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// Delay after boot before fans are reset and considered live (ms).
    pub startup_delay_ms: u32,
    pub channels: [ChannelConfig; MAX_CHANNELS],
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            startup_delay_ms: 5_000,
            channels: [ChannelConfig::default(), ChannelConfig::default()],
        }
    }
}

impl ModuleConfig {
    pub fn validate(&self) -> Result<()> {
        self.channels.iter().try_for_each(ChannelConfig::validate)
    }
}
