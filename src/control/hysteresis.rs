//! Two-threshold humidity hysteresis.
//!
//! The band is described by an *on* threshold and an *off* threshold.  Both
//! orderings are legal and they are evaluated by different branches:
//!
//! * `off >= on`: labelled "negative hysteresis" in the parameter set,
//!   although in conventional terms this is the overlapping band.  The
//!   engage check runs first.
//! * `off < on`: labelled "positive hysteresis".  The release check runs
//!   first.
//!
//! The labels are kept as the device documentation uses them; only the
//! branch behaviour matters.

/// What the band says about the current reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandAction {
    /// Reading is strictly above the on threshold.
    Engage,
    /// Reading is strictly below the off threshold.
    Release,
    /// Neither: leave the fan as it is.
    Hold,
}

/// The on/off threshold pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HysteresisBand {
    pub on: f32,
    pub off: f32,
}

impl HysteresisBand {
    pub fn new(on: f32, off: f32) -> Self {
        Self { on, off }
    }

    /// Classify a reading against the band.
    pub fn classify(&self, humidity: f32) -> BandAction {
        if self.off >= self.on {
            // "negative hysteresis"
            if humidity > self.on {
                return BandAction::Engage;
            }
            if humidity < self.off {
                return BandAction::Release;
            }
        } else {
            // "positive hysteresis"
            if humidity < self.off {
                return BandAction::Release;
            }
            if humidity > self.on {
                return BandAction::Engage;
            }
        }
        BandAction::Hold
    }

    /// True if moving from `previous` to `next` crosses the on threshold
    /// upwards or the off threshold downwards.
    pub fn crossed(&self, previous: f32, next: f32) -> bool {
        let up = previous < self.on && next >= self.on;
        let down = previous >= self.off && next < self.off;
        up || down
    }
}
