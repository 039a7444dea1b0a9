//! Two-phase cross-flow fan driver (push-pull heat-recovery unit).
//!
//! The motor has two windings, S1 and S2, each fed from one PWM output.
//! Duty is centred on half scale; the speed step swings it up or down
//! depending on the phase sign:
//!
//! ```text
//!   duty = (12 + sign · step) · 1024 / 24
//!
//!   step:   0    4    6    8    9    10
//!   speed:  0    1    2    3    4     5
//! ```
//!
//! In heat-recovery mode both signs flip every 60 s so the fan alternately
//! blows in and out through the heat exchanger.  Supply-air mode runs with
//! both signs negative, exhaust-air with both positive.

use log::debug;

use crate::app::ports::{Actuator, FanHardware, TimerSlot, TimerToken};
use crate::fsm::{Modes, OperatingMode, VentilationMode};
use crate::pins::{FanPins, PWM_RESOLUTION};

/// Duty steps indexed by speed.
pub const FAN_STEPS: [i16; 6] = [0, 4, 6, 8, 9, 10];
/// Highest valid speed index.
pub const MAX_SPEED: u8 = (FAN_STEPS.len() - 1) as u8;
/// Airflow direction period in heat-recovery mode.
pub const DIRECTION_PERIOD_MS: u64 = 60_000;

const PWM_BASE: i16 = 24;
const PWM_CENTRE: i16 = 12;

/// Duty for a fraction of [`PWM_BASE`] at the board's PWM resolution.
pub fn pwm_level(fraction: i16) -> u16 {
    let level = i32::from(fraction) * i32::from(PWM_RESOLUTION) / i32::from(PWM_BASE);
    level.clamp(0, i32::from(PWM_RESOLUTION) - 1) as u16
}

/// Actuator for one two-phase cross-flow fan.
pub struct CrossFlowDriver {
    pins: FanPins,
    fan_step: i16,
    direction: [i16; 2],
    /// Token of the running direction timer, if any.
    direction_timer: Option<TimerToken>,
    last_token: TimerToken,
}

impl CrossFlowDriver {
    pub fn new(pins: FanPins) -> Self {
        Self {
            pins,
            fan_step: FAN_STEPS[0],
            direction: [1, 1],
            direction_timer: None,
            last_token: TimerToken::new(TimerSlot::Direction, 0),
        }
    }

    pub fn pins(&self) -> FanPins {
        self.pins
    }

    /// Current duty step (an entry of [`FAN_STEPS`]).
    pub fn fan_step(&self) -> i16 {
        self.fan_step
    }

    /// Current phase signs (S1, S2).
    pub fn direction(&self) -> (i16, i16) {
        (self.direction[0], self.direction[1])
    }

    pub fn is_direction_timer_active(&self) -> bool {
        self.direction_timer.is_some()
    }

    /// Duty currently commanded on each phase.
    pub fn duties(&self) -> (u16, u16) {
        (
            pwm_level(PWM_CENTRE + self.direction[0] * self.fan_step),
            pwm_level(PWM_CENTRE + self.direction[1] * self.fan_step),
        )
    }

    fn write_pwm<H: FanHardware>(&self, hw: &mut H) {
        let (s1, s2) = self.duties();
        hw.set_pwm(self.pins.phase1, s1);
        hw.set_pwm(self.pins.phase2, s2);
    }

    fn start_direction_timer<H: FanHardware>(&mut self, hw: &mut H) {
        let token = self.last_token.next();
        self.last_token = token;
        self.direction_timer = Some(token);
        hw.start_repeating_timer(token, DIRECTION_PERIOD_MS);
        debug!("cross-flow: direction timer started ({} ms)", DIRECTION_PERIOD_MS);
    }

    fn stop_direction_timer<H: FanHardware>(&mut self, hw: &mut H) {
        self.direction_timer = None;
        hw.stop_repeating_timer();
    }
}

impl Actuator for CrossFlowDriver {
    fn attach<H: FanHardware>(&mut self, hw: &mut H) {
        hw.configure_pins(self.pins);
        self.fan_step = FAN_STEPS[0];
        self.write_pwm(hw);
    }

    fn apply_speed<H: FanHardware>(&mut self, hw: &mut H, modes: &Modes, index: i16) {
        let index = index.clamp(0, i16::from(MAX_SPEED)) as usize;
        self.fan_step = FAN_STEPS[index];
        self.refresh_outputs(hw, modes);
    }

    fn current_speed(&self) -> u8 {
        FAN_STEPS
            .iter()
            .position(|&step| step == self.fan_step)
            .map_or(0, |idx| idx as u8)
    }

    fn refresh_outputs<H: FanHardware>(&mut self, hw: &mut H, modes: &Modes) {
        let powered = modes.operating != OperatingMode::Off;
        if !powered {
            self.fan_step = FAN_STEPS[0];
        }
        hw.set_digital(self.pins.enable, powered);

        // Baseline direction; heat recovery alternates from here.
        self.direction = match modes.ventilation {
            VentilationMode::SupplyAir => [-1, -1],
            VentilationMode::HeatRecovery | VentilationMode::ExhaustAir => [1, 1],
        };

        let heat_recovery = modes.ventilation == VentilationMode::HeatRecovery;
        let running = self.fan_step != FAN_STEPS[0];
        if heat_recovery && self.direction_timer.is_none() && running {
            self.start_direction_timer(hw);
        }
        if (!heat_recovery && self.direction_timer.is_some()) || !running {
            self.stop_direction_timer(hw);
        }

        self.write_pwm(hw);
    }

    fn on_timer<H: FanHardware>(&mut self, hw: &mut H, token: TimerToken) -> bool {
        if self.direction_timer != Some(token) {
            return false;
        }
        self.direction[0] = -self.direction[0];
        self.direction[1] = -self.direction[1];
        self.write_pwm(hw);
        true
    }
}
