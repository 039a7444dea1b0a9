//! Authoritative per-fan control state.
//!
//! `FanContext` holds the modes, the latest environmental readings, the
//! hysteresis parameters and the manual-override latch.  It performs no I/O:
//! [`FanContext::evaluate`] turns the current state into a
//! [`SpeedDecision`] and the controller decides whether to apply it.

use crate::control::dew_point::dew_point;
use crate::control::hysteresis::{BandAction, HysteresisBand};

use super::{ControlMode, HumiditySensorMode, Modes, OperatingMode, SpeedDecision};

/// Scales the adaptive-mode humidity excess into a speed index.
pub const CONTROL_GAIN: f32 = 0.18;

/// One side of the building envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AirSample {
    /// Relative humidity (%).
    pub relative_humidity: f32,
    /// Temperature (°C).
    pub temperature: f32,
}

impl AirSample {
    pub fn dew_point(&self) -> f32 {
        dew_point(self.relative_humidity, self.temperature)
    }
}

/// Mode, environment and override state of one fan.
#[derive(Debug, Clone)]
pub struct FanContext {
    pub modes: Modes,
    pub inside: AirSample,
    pub outside: AirSample,
    /// Relative humidity (%) above which the fan engages.
    pub threshold_humidity_on: f32,
    /// Relative humidity (%) below which the fan releases.
    pub threshold_humidity_off: f32,
    /// Speed index used in [`ControlMode::Threshold`].
    pub threshold_speed: i16,
    /// Set by an explicit speed command; suppresses automatic decisions.
    pub manual_override: bool,
}

impl Default for FanContext {
    fn default() -> Self {
        Self {
            modes: Modes::default(),
            inside: AirSample::default(),
            outside: AirSample::default(),
            threshold_humidity_on: 60.0,
            threshold_humidity_off: 60.0,
            threshold_speed: 4,
            manual_override: false,
        }
    }
}

impl FanContext {
    pub fn band(&self) -> HysteresisBand {
        HysteresisBand::new(self.threshold_humidity_on, self.threshold_humidity_off)
    }

    /// Store a new inside humidity reading.
    ///
    /// Returns `true` if the reading crossed a threshold relative to the
    /// previous one; a crossing also releases the manual override.
    pub fn apply_inside_humidity(&mut self, relative_humidity: f32) -> bool {
        let crossed = self
            .band()
            .crossed(self.inside.relative_humidity, relative_humidity);
        if crossed {
            self.manual_override = false;
        }
        self.inside.relative_humidity = relative_humidity;
        crossed
    }

    /// Outside air carries strictly less moisture than inside air.
    pub fn outside_drier(&self) -> bool {
        self.inside.dew_point() > self.outside.dew_point()
    }

    /// Decide what the automatic logic wants right now.
    pub fn evaluate(&self) -> SpeedDecision {
        if self.modes.operating != OperatingMode::Automatic {
            return SpeedDecision::Hold;
        }

        // Ventilating cannot dry the room if outside air is as humid.
        if self.modes.humidity_sensor == HumiditySensorMode::Absolute && !self.outside_drier() {
            return SpeedDecision::Stop;
        }

        match self.band().classify(self.inside.relative_humidity) {
            BandAction::Engage => SpeedDecision::Run(self.automatic_speed()),
            BandAction::Release => SpeedDecision::Stop,
            BandAction::Hold => SpeedDecision::Hold,
        }
    }

    /// Speed index requested once the band engages.
    pub fn automatic_speed(&self) -> i16 {
        match self.modes.control {
            ControlMode::Threshold => self.threshold_speed,
            ControlMode::Adaptive => {
                let delta = match self.modes.humidity_sensor {
                    HumiditySensorMode::Relative => {
                        (self.inside.relative_humidity - self.threshold_humidity_on).max(0.0)
                    }
                    // No extra hysteresis on the dew point difference.
                    HumiditySensorMode::Absolute => {
                        self.inside.dew_point() - self.outside.dew_point()
                    }
                };
                // `as` saturates and maps NaN to 0; the actuator clamps.
                (CONTROL_GAIN * delta).floor() as i16
            }
        }
    }
}
