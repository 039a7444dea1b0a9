//! Fan controller: the control state machine for one fan.
//!
//! [`FanController`] owns the [`FanContext`], an [`Actuator`] and the
//! [`FanHardware`] it drives.  Every call runs to completion synchronously;
//! timer expiries come back in through [`FanController::handle_timer`].
//!
//! ## Speed arbitration
//!
//! ```text
//!   set_fan_speed(v) ──(override := true)──▶ change_speed(v, forced)
//!   evaluate() ─────── Run / Stop ─────────▶ change_speed(v, not forced)
//!                                                │
//!                           override && !forced ─┴─▶ dropped
//!                                                └─▶ actuator.apply_speed
//!                                                    speed callback(actual)
//! ```
//!
//! Forced changes: explicit speed commands, leaving automatic mode,
//! countdown expiry and `stop_timer`.  Everything the automatic logic
//! decides is non-forced.

use log::{debug, info};

use crate::fsm::context::FanContext;
use crate::fsm::{
    ControlMode, HumiditySensorMode, Modes, OperatingMode, SpeedDecision, VentilationMode,
};

use super::ports::{Actuator, FanHardware, TimerSlot, TimerToken};

/// Receives the speed index after every applied change.
pub type SpeedChangeCallback = Box<dyn FnMut(u8)>;
/// Invoked when an armed countdown elapses.
pub type TimerCallback = Box<dyn FnMut()>;

/// Control state machine for one fan.
pub struct FanController<A, H> {
    hw: H,
    actuator: A,
    ctx: FanContext,
    /// Token of the armed countdown, if any.
    countdown: Option<TimerToken>,
    last_countdown: TimerToken,
    timer_callback: Option<TimerCallback>,
    speed_callback: Option<SpeedChangeCallback>,
}

impl<A: Actuator, H: FanHardware> FanController<A, H> {
    /// Attach the actuator to the hardware and start in the default modes
    /// (manual, heat recovery, threshold control, relative humidity).
    pub fn new(mut hw: H, mut actuator: A) -> Self {
        actuator.attach(&mut hw);
        Self {
            hw,
            actuator,
            ctx: FanContext::default(),
            countdown: None,
            last_countdown: TimerToken::new(TimerSlot::Countdown, 0),
            timer_callback: None,
            speed_callback: None,
        }
    }

    // ── Mode setters ──────────────────────────────────────────

    pub fn set_operating_mode(&mut self, mode: OperatingMode) {
        let previous = self.ctx.modes.operating;
        info!("fan: operating mode {:?} -> {:?}", previous, mode);

        if mode != OperatingMode::Automatic
            && previous == OperatingMode::Automatic
            && !self.ctx.manual_override
        {
            // Stop whatever the automatic logic had started.
            self.change_speed(0, true);
        }

        self.ctx.modes.operating = mode;
        self.ctx.manual_override = false;
        self.update_mode();
        self.update_environment();
    }

    pub fn set_ventilation_mode(&mut self, mode: VentilationMode) {
        info!("fan: ventilation mode -> {:?}", mode);
        self.ctx.modes.ventilation = mode;
        self.update_mode();
    }

    pub fn set_control_mode(&mut self, mode: ControlMode) {
        info!("fan: control mode -> {:?}", mode);
        self.ctx.modes.control = mode;
        self.update_environment();
    }

    /// Takes effect on the next environment update.
    pub fn set_humidity_sensor_mode(&mut self, mode: HumiditySensorMode) {
        self.ctx.modes.humidity_sensor = mode;
    }

    /// Takes effect on the next environment update.
    pub fn set_threshold_humidity_on(&mut self, relative_humidity: f32) {
        self.ctx.threshold_humidity_on = relative_humidity;
    }

    /// Takes effect on the next environment update.
    pub fn set_threshold_humidity_off(&mut self, relative_humidity: f32) {
        self.ctx.threshold_humidity_off = relative_humidity;
    }

    /// Takes effect on the next environment update.
    pub fn set_threshold_speed(&mut self, speed: i16) {
        self.ctx.threshold_speed = speed;
    }

    // ── Speed ─────────────────────────────────────────────────

    /// External speed command.  Latches the manual override and always
    /// applies.
    pub fn set_fan_speed(&mut self, speed: i16) {
        self.ctx.manual_override = true;
        self.change_speed(speed, true);
    }

    /// Current speed index as reported by the actuator.
    pub fn fan_speed(&self) -> u8 {
        self.actuator.current_speed()
    }

    /// Register the speed-change listener.  Replaces any previous one.
    pub fn set_speed_change_callback(&mut self, callback: impl FnMut(u8) + 'static) {
        self.speed_callback = Some(Box::new(callback));
    }

    // ── Countdown ─────────────────────────────────────────────

    /// Arm the auto-stop countdown.  Re-arming replaces the previous
    /// countdown and callback.
    pub fn set_timer(&mut self, seconds_remaining: u64, callback: impl FnMut() + 'static) {
        let token = self.last_countdown.next();
        self.last_countdown = token;
        self.countdown = Some(token);
        self.timer_callback = Some(Box::new(callback));
        self.hw
            .start_one_shot_timer(token, seconds_remaining.saturating_mul(1000));
        info!("fan: auto-stop in {} s", seconds_remaining);
    }

    /// Stop the fan and cancel the countdown.  The callback will not fire.
    pub fn stop_timer(&mut self) {
        self.change_speed(0, true);
        self.hw.stop_one_shot_timer();
        self.countdown = None;
        self.timer_callback = None;
        info!("fan: auto-stop cancelled");
    }

    pub fn is_timer_armed(&self) -> bool {
        self.countdown.is_some()
    }

    /// Dispatch an expired timer.  Returns `false` for stale or unknown
    /// tokens.
    pub fn handle_timer(&mut self, token: TimerToken) -> bool {
        match token.slot {
            TimerSlot::Countdown => {
                if self.countdown != Some(token) {
                    debug!("fan: stale countdown token {:?}", token);
                    return false;
                }
                self.countdown = None;
                info!("fan: auto-stop elapsed");
                self.change_speed(0, true);
                // The callback stays registered; only stop_timer clears it.
                if let Some(cb) = self.timer_callback.as_mut() {
                    cb();
                }
                true
            }
            TimerSlot::Direction => self.actuator.on_timer(&mut self.hw, token),
        }
    }

    // ── Environment ───────────────────────────────────────────

    /// Store the inside humidity.  Returns `true` if it crossed a threshold,
    /// which also releases the manual override.
    pub fn set_inside_humidity(&mut self, relative_humidity: f32) -> bool {
        let crossed = self.ctx.apply_inside_humidity(relative_humidity);
        if crossed {
            debug!("fan: humidity threshold crossed at {:.1}%", relative_humidity);
        }
        self.update_environment();
        crossed
    }

    pub fn set_inside_temperature(&mut self, temperature: f32) {
        self.ctx.inside.temperature = temperature;
        self.update_environment();
    }

    pub fn set_outside_humidity(&mut self, relative_humidity: f32) {
        self.ctx.outside.relative_humidity = relative_humidity;
        self.update_environment();
    }

    pub fn set_outside_temperature(&mut self, temperature: f32) {
        self.ctx.outside.temperature = temperature;
        self.update_environment();
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn modes(&self) -> &Modes {
        &self.ctx.modes
    }

    pub fn context(&self) -> &FanContext {
        &self.ctx
    }

    pub fn is_manual_override_active(&self) -> bool {
        self.ctx.manual_override
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn hw(&self) -> &H {
        &self.hw
    }

    pub fn hw_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    // ── Internal ──────────────────────────────────────────────

    /// The single arbitration point between manual and automatic control.
    fn change_speed(&mut self, speed: i16, force: bool) {
        if !force && self.ctx.manual_override {
            debug!("fan: manual override active, ignoring automatic speed {}", speed);
            return;
        }
        self.actuator.apply_speed(&mut self.hw, &self.ctx.modes, speed);

        let actual = self.actuator.current_speed();
        debug!("fan: speed {} (requested {})", actual, speed);
        if let Some(cb) = self.speed_callback.as_mut() {
            cb(actual);
        }
    }

    fn update_mode(&mut self) {
        self.actuator.refresh_outputs(&mut self.hw, &self.ctx.modes);
    }

    fn update_environment(&mut self) {
        match self.ctx.evaluate() {
            SpeedDecision::Hold => {}
            SpeedDecision::Stop => self.change_speed(0, false),
            SpeedDecision::Run(speed) => self.change_speed(speed, false),
        }
    }
}
