//! Fan service: the hexagonal core for one board.
//!
//! [`FanService`] owns every [`FanChannel`] on the board together with the
//! startup clock.  All I/O flows through the port traits: each channel's
//! [`FanHardware`] drives outputs and reports expired timers, events leave
//! through the [`EventSink`] passed in at the call site.
//!
//! ```text
//!  ChannelCommand ──▶ ┌──────────────────────┐ ──▶ EventSink
//!                     │      FanService      │
//!    TimerSource ───▶ │  FanChannel × N      │ ──▶ FanHardware
//!                     └──────────────────────┘
//! ```

use log::{info, warn};

use crate::config::{MAX_CHANNELS, ModuleConfig};
use crate::error::{Error, Result};

use super::channel::FanChannel;
use super::commands::ChannelCommand;
use super::controller::FanController;
use super::events::FanEvent;
use super::ports::{Actuator, EventSink, FanHardware, TimerSource};

pub struct FanService<A, H> {
    channels: heapless::Vec<FanChannel<A, H>, MAX_CHANNELS>,
    startup_delay_ms: u64,
    uptime_ms: u64,
    started: bool,
}

impl<A: Actuator, H: FanHardware + TimerSource> FanService<A, H> {
    /// Pair each fan with its channel configuration, in order.  Fans beyond
    /// [`MAX_CHANNELS`] have no configuration and are ignored.
    pub fn new(
        config: ModuleConfig,
        fans: impl IntoIterator<Item = FanController<A, H>>,
    ) -> Self {
        let mut channels = heapless::Vec::new();
        for (index, (fan, channel_config)) in fans.into_iter().zip(config.channels).enumerate() {
            if channels
                .push(FanChannel::new(index as u8, fan, channel_config))
                .is_err()
            {
                warn!("service: channel {} exceeds board capacity", index);
            }
        }
        Self {
            channels,
            startup_delay_ms: u64::from(config.startup_delay_ms),
            uptime_ms: 0,
            started: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn setup(&mut self, configured: bool) {
        for channel in &mut self.channels {
            channel.setup(configured);
        }
        info!(
            "service: {} channel(s) set up (configured={})",
            self.channels.len(),
            configured
        );
    }

    /// Advance the board clock by `elapsed_ms`.
    ///
    /// Once the startup delay has passed, every fan is stopped and
    /// [`FanEvent::StartupComplete`] is emitted (once).  Expired hardware
    /// timers are dispatched to their channel on every call.
    pub fn poll(&mut self, elapsed_ms: u64, sink: &mut impl EventSink) {
        self.uptime_ms = self.uptime_ms.saturating_add(elapsed_ms);

        if !self.started && self.uptime_ms >= self.startup_delay_ms {
            self.started = true;
            for channel in &mut self.channels {
                channel.reset(sink);
            }
            sink.emit(&FanEvent::StartupComplete);
            info!("service: startup complete after {} ms", self.uptime_ms);
        }

        for channel in &mut self.channels {
            let fired = channel.fan_mut().hw_mut().poll_expired(elapsed_ms);
            for token in fired {
                channel.handle_timer(token, sink);
            }
        }
    }

    // ── Commands ──────────────────────────────────────────────

    pub fn handle_command(
        &mut self,
        channel: usize,
        cmd: ChannelCommand,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let target = self
            .channels
            .get_mut(channel)
            .ok_or(Error::UnknownChannel(channel))?;
        target.handle(cmd, sink);
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn uptime_ms(&self) -> u64 {
        self.uptime_ms
    }

    pub fn channel(&self, index: usize) -> Option<&FanChannel<A, H>> {
        self.channels.get(index)
    }

    pub fn channel_mut(&mut self, index: usize) -> Option<&mut FanChannel<A, H>> {
        self.channels.get_mut(index)
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
