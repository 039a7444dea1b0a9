//! Outbound feedback events.
//!
//! Fan channels emit these through the [`EventSink`](super::ports::EventSink)
//! port.  Adapters on the other side decide what to do with them: update a
//! bus status object, log to serial, etc.

use crate::fsm::VentilationMode;

/// Structured events emitted by the fan service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FanEvent {
    /// The applied speed index changed (or was re-applied).
    SpeedFeedback { channel: u8, speed: u8 },

    /// Bus-switched operating mode was applied.
    OperatingModeFeedback { channel: u8, automatic: bool },

    /// Bus-switched ventilation mode was applied.
    VentilationModeFeedback { channel: u8, mode: VentilationMode },

    /// Auto-stop countdown armed (`true`) or ended / cancelled (`false`).
    TimerFeedback { channel: u8, active: bool },

    /// Startup delay elapsed and all fans were reset.
    StartupComplete,
}
