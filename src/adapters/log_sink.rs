//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing fan feedback events to the logger
//! (UART / USB-CDC in production).  A bus adapter would implement the same
//! trait and update its status objects instead.

use log::info;

use crate::app::events::FanEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`FanEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &FanEvent) {
        match event {
            FanEvent::SpeedFeedback { channel, speed } => {
                info!("SPEED | fan{} level={}", channel + 1, speed);
            }
            FanEvent::OperatingModeFeedback { channel, automatic } => {
                info!(
                    "MODE  | fan{} {}",
                    channel + 1,
                    if *automatic { "automatic" } else { "manual" }
                );
            }
            FanEvent::VentilationModeFeedback { channel, mode } => {
                info!("VENT  | fan{} {:?}", channel + 1, mode);
            }
            FanEvent::TimerFeedback { channel, active } => {
                info!(
                    "TIMER | fan{} {}",
                    channel + 1,
                    if *active { "running" } else { "stopped" }
                );
            }
            FanEvent::StartupComplete => {
                info!("START | startup delay elapsed, fans reset");
            }
        }
    }
}
