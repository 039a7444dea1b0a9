//! Software timers for one fan: a repeating slot and a one-shot slot.
//!
//! The wheel does not read a clock.  The owner advances it with the time
//! elapsed since the previous call (typically from the main loop tick) and
//! gets back the tokens of every timer that expired in that window, in
//! chronological order.  Arming a slot replaces whatever it held.

use log::warn;

use crate::app::ports::{FiredTimers, TimerToken};

#[derive(Debug, Clone, Copy)]
struct Armed {
    token: TimerToken,
    remaining_ms: u64,
}

#[derive(Debug, Clone, Copy)]
struct Repeating {
    armed: Armed,
    period_ms: u64,
}

#[derive(Debug, Default)]
pub struct TimerWheel {
    repeating: Option<Repeating>,
    one_shot: Option<Armed>,
}

impl TimerWheel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the repeating slot.  A zero interval is treated as 1 ms.
    pub fn arm_repeating(&mut self, token: TimerToken, interval_ms: u64) {
        let period_ms = interval_ms.max(1);
        self.repeating = Some(Repeating {
            armed: Armed {
                token,
                remaining_ms: period_ms,
            },
            period_ms,
        });
    }

    pub fn cancel_repeating(&mut self) {
        self.repeating = None;
    }

    /// Arm the one-shot slot.  A zero delay fires on the next advance.
    pub fn arm_one_shot(&mut self, token: TimerToken, delay_ms: u64) {
        self.one_shot = Some(Armed {
            token,
            remaining_ms: delay_ms,
        });
    }

    pub fn cancel_one_shot(&mut self) {
        self.one_shot = None;
    }

    pub fn is_repeating_armed(&self) -> bool {
        self.repeating.is_some()
    }

    pub fn is_one_shot_armed(&self) -> bool {
        self.one_shot.is_some()
    }

    /// Time until the next expiry, if anything is armed.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        let r = self.repeating.map(|r| r.armed.remaining_ms);
        let o = self.one_shot.map(|o| o.remaining_ms);
        match (r, o) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Advance by `elapsed_ms` and collect expired tokens.
    ///
    /// The last slot of the returned buffer is reserved for the one-shot;
    /// repeating expiries beyond that are dropped without losing phase.
    pub fn advance(&mut self, elapsed_ms: u64) -> FiredTimers {
        let mut fired = FiredTimers::new();
        let mut budget = elapsed_ms;
        let mut dropped: u64 = 0;

        while let Some(step) = self.next_deadline_ms() {
            if step > budget {
                break;
            }
            budget -= step;
            self.consume(step);

            if let Some(shot) = self.one_shot.filter(|s| s.remaining_ms == 0) {
                self.one_shot = None;
                push(&mut fired, shot.token);
            }
            let Some(rep) = self
                .repeating
                .as_mut()
                .filter(|r| r.armed.remaining_ms == 0)
            else {
                continue;
            };
            rep.armed.remaining_ms = rep.period_ms;
            if fired.len() + 1 < fired.capacity() {
                push(&mut fired, rep.armed.token);
                continue;
            }

            // Skip whole periods, but not past the one-shot deadline.
            let period_ms = rep.period_ms;
            let horizon = self
                .one_shot
                .map_or(budget, |s| s.remaining_ms.min(budget));
            let skipped = horizon / period_ms;
            let skip_ms = skipped * period_ms;
            budget -= skip_ms;
            if let Some(shot) = self.one_shot.as_mut() {
                shot.remaining_ms -= skip_ms;
            }
            dropped += skipped + 1;
        }

        if dropped > 0 {
            warn!("timer: dropped {} repeating expiries", dropped);
        }
        self.consume(budget);
        fired
    }

    fn consume(&mut self, ms: u64) {
        if let Some(rep) = self.repeating.as_mut() {
            rep.armed.remaining_ms = rep.armed.remaining_ms.saturating_sub(ms);
        }
        if let Some(shot) = self.one_shot.as_mut() {
            shot.remaining_ms = shot.remaining_ms.saturating_sub(ms);
        }
    }
}

fn push(fired: &mut FiredTimers, token: TimerToken) {
    if fired.push(token).is_err() {
        warn!("timer: expiry queue full, dropping {:?}", token);
    }
}
