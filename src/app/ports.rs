//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   FanController ──▶ Actuator ──▶ FanHardware ──▶ pins / timers
//!        │
//!        └──▶ EventSink (feedback, via the channel layer)
//! ```
//!
//! The controller never touches a clock.  Timers are armed through
//! [`FanHardware`] with a [`TimerToken`]; when one expires the hardware
//! adapter hands the token back (see [`TimerSource`]) and the host passes it
//! to [`FanController::handle_timer`](super::controller::FanController::handle_timer)
//! on the control context.  A token that no longer matches what the
//! controller armed is stale and is ignored.

use crate::fsm::Modes;
use crate::pins::FanPins;

// ───────────────────────────────────────────────────────────────
// Timer tokens
// ───────────────────────────────────────────────────────────────

/// Which of the two timers a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSlot {
    /// Repeating airflow-direction alternation timer (actuator).
    Direction,
    /// One-shot auto-stop countdown (controller).
    Countdown,
}

/// Identifies one arming of a timer.  Re-arming bumps the generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerToken {
    pub slot: TimerSlot,
    pub generation: u32,
}

impl TimerToken {
    pub fn new(slot: TimerSlot, generation: u32) -> Self {
        Self { slot, generation }
    }

    /// The token for the next arming of the same slot.
    pub fn next(self) -> Self {
        Self {
            slot: self.slot,
            generation: self.generation.wrapping_add(1),
        }
    }
}

/// Upper bound on timer expiries reported by one poll.
pub const MAX_FIRED_PER_POLL: usize = 8;

/// Expired timers collected during one poll, oldest first.
pub type FiredTimers = heapless::Vec<TimerToken, MAX_FIRED_PER_POLL>;

// ───────────────────────────────────────────────────────────────
// Hardware port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Capabilities one fan needs from the board.
///
/// Implementations must not call back into the controller; expiries are
/// reported through [`TimerSource`] instead.
pub trait FanHardware {
    /// Configure the two PWM outputs and the enable output.
    fn configure_pins(&mut self, pins: FanPins);

    /// Set a PWM duty (0 – 1023 at 10-bit resolution).
    fn set_pwm(&mut self, pin: u8, duty: u16);

    /// Drive a digital output.
    fn set_digital(&mut self, pin: u8, high: bool);

    /// Arm the repeating timer, replacing any previous arming.
    fn start_repeating_timer(&mut self, token: TimerToken, interval_ms: u64);

    /// Disarm the repeating timer.  No-op when not armed.
    fn stop_repeating_timer(&mut self);

    /// Arm the one-shot timer, replacing any previous arming.
    fn start_one_shot_timer(&mut self, token: TimerToken, delay_ms: u64);

    /// Disarm the one-shot timer.  No-op when not armed.
    fn stop_one_shot_timer(&mut self);
}

/// Host-side view of a hardware adapter's timers.
pub trait TimerSource {
    /// Advance by `elapsed_ms` and return the tokens of every timer that
    /// expired in that window.
    fn poll_expired(&mut self, elapsed_ms: u64) -> FiredTimers;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (concrete motor topology)
// ───────────────────────────────────────────────────────────────

/// Maps an abstract speed index onto a particular motor's outputs.
///
/// The controller owns the modes and passes them in on every call; the
/// actuator owns the notion of "current speed".
pub trait Actuator {
    /// Configure the outputs and drive the initial (stopped) state.
    fn attach<H: FanHardware>(&mut self, hw: &mut H);

    /// Clamp and apply a speed index, then refresh every mode-dependent
    /// output.
    fn apply_speed<H: FanHardware>(&mut self, hw: &mut H, modes: &Modes, index: i16);

    /// Current speed index.
    fn current_speed(&self) -> u8;

    /// Re-derive enable output, direction and PWM from the modes.
    fn refresh_outputs<H: FanHardware>(&mut self, hw: &mut H, modes: &Modes);

    /// Handle an expired actuator-owned timer.  Returns `false` when the
    /// token is not (or no longer) one of this actuator's.
    fn on_timer<H: FanHardware>(&mut self, hw: &mut H, token: TimerToken) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → bus feedback / logging)
// ───────────────────────────────────────────────────────────────

/// Receives the feedback events produced by fan channels.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::FanEvent);
}
