//! embedded-hal adapter: binds one fan's pin ids to HAL pin objects.
//!
//! The two winding outputs are any [`SetDutyCycle`] implementation (LEDC
//! channel on ESP32, PWM slice on RP2040, mock in tests); the supply relay
//! is any [`OutputPin`].  Timers are software timers in a [`TimerWheel`]
//! advanced by the main loop through [`TimerSource::poll_expired`], which
//! keeps every expiry on the control context.
//!
//! HAL write failures are logged and dropped: the control core has no error
//! path for a PWM write and the next refresh rewrites every output anyway.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::{info, warn};

use crate::app::ports::{FanHardware, FiredTimers, TimerSource, TimerToken};
use crate::drivers::timer_wheel::TimerWheel;
use crate::pins::{FanPins, PWM_RESOLUTION};

/// Concrete [`FanHardware`] for one fan.
pub struct HalFanHardware<P1, P2, EN> {
    phase1: P1,
    phase2: P2,
    enable: EN,
    pins: FanPins,
    configured: bool,
    timers: TimerWheel,
}

impl<P1, P2, EN> HalFanHardware<P1, P2, EN>
where
    P1: SetDutyCycle,
    P2: SetDutyCycle,
    EN: OutputPin,
{
    /// `pins` names the ids the actuator will use for each output.
    pub fn new(pins: FanPins, phase1: P1, phase2: P2, enable: EN) -> Self {
        Self {
            phase1,
            phase2,
            enable,
            pins,
            configured: false,
            timers: TimerWheel::new(),
        }
    }

    pub fn timers(&self) -> &TimerWheel {
        &self.timers
    }

    pub fn phase1(&self) -> &P1 {
        &self.phase1
    }

    pub fn phase2(&self) -> &P2 {
        &self.phase2
    }

    pub fn enable_pin(&self) -> &EN {
        &self.enable
    }

    /// Give the pins back (e.g. to reconfigure the board).
    pub fn release(self) -> (P1, P2, EN) {
        (self.phase1, self.phase2, self.enable)
    }
}

impl<P1, P2, EN> FanHardware for HalFanHardware<P1, P2, EN>
where
    P1: SetDutyCycle,
    P2: SetDutyCycle,
    EN: OutputPin,
{
    fn configure_pins(&mut self, pins: FanPins) {
        if pins != self.pins {
            warn!(
                "hal: actuator pins {:?} differ from board binding {:?}",
                pins, self.pins
            );
        }
        self.configured = true;
        info!(
            "hal: fan pins S1={} S2={} SW={}",
            self.pins.phase1, self.pins.phase2, self.pins.enable
        );
    }

    fn set_pwm(&mut self, pin: u8, duty: u16) {
        if !self.configured {
            warn!("hal: PWM write on pin {} before configuration", pin);
        }
        let duty = duty.min(PWM_RESOLUTION);
        let result = if pin == self.pins.phase1 {
            self.phase1
                .set_duty_cycle_fraction(duty, PWM_RESOLUTION)
                .map_err(|e| embedded_hal::pwm::Error::kind(&e))
        } else if pin == self.pins.phase2 {
            self.phase2
                .set_duty_cycle_fraction(duty, PWM_RESOLUTION)
                .map_err(|e| embedded_hal::pwm::Error::kind(&e))
        } else {
            warn!("hal: no PWM output bound to pin {}", pin);
            return;
        };
        if let Err(kind) = result {
            warn!("hal: PWM write on pin {} failed: {:?}", pin, kind);
        }
    }

    fn set_digital(&mut self, pin: u8, high: bool) {
        if pin != self.pins.enable {
            warn!("hal: no digital output bound to pin {}", pin);
            return;
        }
        let result = if high {
            self.enable.set_high()
        } else {
            self.enable.set_low()
        };
        if let Err(e) = result {
            warn!(
                "hal: digital write on pin {} failed: {:?}",
                pin,
                embedded_hal::digital::Error::kind(&e)
            );
        }
    }

    fn start_repeating_timer(&mut self, token: TimerToken, interval_ms: u64) {
        self.timers.arm_repeating(token, interval_ms);
    }

    fn stop_repeating_timer(&mut self) {
        self.timers.cancel_repeating();
    }

    fn start_one_shot_timer(&mut self, token: TimerToken, delay_ms: u64) {
        self.timers.arm_one_shot(token, delay_ms);
    }

    fn stop_one_shot_timer(&mut self) {
        self.timers.cancel_one_shot();
    }
}

impl<P1, P2, EN> TimerSource for HalFanHardware<P1, P2, EN>
where
    P1: SetDutyCycle,
    P2: SetDutyCycle,
    EN: OutputPin,
{
    fn poll_expired(&mut self, elapsed_ms: u64) -> FiredTimers {
        self.timers.advance(elapsed_ms)
    }
}
