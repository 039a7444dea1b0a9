//! Fan channel: binds one controller to its configuration and bus I/O.
//!
//! The channel applies a [`ChannelConfig`] at setup, translates decoded bus
//! commands into controller calls, and turns controller callbacks into
//! [`FanEvent`] feedback.  Callbacks fire from inside controller calls, so
//! they only queue into a shared outbox; the outbox is flushed to the
//! [`EventSink`] once the call has returned.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use log::debug;

use crate::config::ChannelConfig;
use crate::fsm::{OperatingMode, VentilationMode};

use super::commands::ChannelCommand;
use super::controller::FanController;
use super::events::FanEvent;
use super::ports::{Actuator, EventSink, FanHardware, TimerToken};

type Outbox = Rc<RefCell<VecDeque<FanEvent>>>;

pub struct FanChannel<A, H> {
    index: u8,
    fan: FanController<A, H>,
    config: ChannelConfig,
    outbox: Outbox,
}

impl<A: Actuator, H: FanHardware> FanChannel<A, H> {
    pub fn new(index: u8, fan: FanController<A, H>, config: ChannelConfig) -> Self {
        Self {
            index,
            fan,
            config,
            outbox: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    /// Apply the configuration and hook up speed feedback.  An unconfigured
    /// device keeps the controller's power-on defaults.
    pub fn setup(&mut self, configured: bool) {
        if !configured {
            return;
        }

        if let Some(mode) = self.config.operating_mode.fixed() {
            self.fan.set_operating_mode(mode);
        }
        if let Some(mode) = self.config.ventilation_mode.fixed() {
            self.fan.set_ventilation_mode(mode);
        }
        self.fan.set_control_mode(self.config.control_mode);
        self.fan
            .set_humidity_sensor_mode(self.config.humidity_sensor_mode);
        self.fan
            .set_threshold_humidity_on(self.config.threshold_humidity_on);
        self.fan
            .set_threshold_humidity_off(self.config.threshold_humidity_off);
        self.fan
            .set_threshold_speed(i16::from(self.config.threshold_speed));

        let outbox = Rc::clone(&self.outbox);
        let channel = self.index;
        self.fan.set_speed_change_callback(move |speed| {
            outbox
                .borrow_mut()
                .push_back(FanEvent::SpeedFeedback { channel, speed });
        });
    }

    /// Stop the fan as an explicit command (used after the startup delay).
    pub fn reset(&mut self, sink: &mut impl EventSink) {
        self.fan.set_fan_speed(0);
        self.flush(sink);
    }

    pub fn handle(&mut self, cmd: ChannelCommand, sink: &mut impl EventSink) {
        match cmd {
            ChannelCommand::Level(level) => self.fan.set_fan_speed(i16::from(level)),
            ChannelCommand::LevelStep { up } => {
                let current = i16::from(self.fan.fan_speed());
                let target = if up { current + 1 } else { current - 1 };
                self.fan.set_fan_speed(target);
            }
            ChannelCommand::OperatingModeSwitch { automatic } => {
                if self.config.operating_mode.is_bus_switchable() {
                    let mode = if automatic {
                        OperatingMode::Automatic
                    } else {
                        OperatingMode::Manual
                    };
                    self.fan.set_operating_mode(mode);
                    self.queue(FanEvent::OperatingModeFeedback {
                        channel: self.index,
                        automatic,
                    });
                }
            }
            ChannelCommand::VentilationMode(raw) => {
                if self.config.ventilation_mode.is_bus_switchable() {
                    match VentilationMode::try_from(raw) {
                        Ok(mode) => {
                            self.fan.set_ventilation_mode(mode);
                            self.queue(FanEvent::VentilationModeFeedback {
                                channel: self.index,
                                mode,
                            });
                        }
                        Err(e) => debug!("channel {}: {}", self.index, e),
                    }
                }
            }
            ChannelCommand::InsideTemperature(t) => self.fan.set_inside_temperature(t),
            ChannelCommand::InsideHumidity(rh) => {
                self.fan.set_inside_humidity(rh);
            }
            ChannelCommand::OutsideTemperature(t) => self.fan.set_outside_temperature(t),
            ChannelCommand::OutsideHumidity(rh) => self.fan.set_outside_humidity(rh),
            ChannelCommand::Timer { enable } => self.handle_timer_command(enable),
        }
        self.flush(sink);
    }

    /// Dispatch an expired hardware timer to the controller.
    pub fn handle_timer(&mut self, token: TimerToken, sink: &mut impl EventSink) -> bool {
        let handled = self.fan.handle_timer(token);
        self.flush(sink);
        handled
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    pub fn fan(&self) -> &FanController<A, H> {
        &self.fan
    }

    pub fn fan_mut(&mut self) -> &mut FanController<A, H> {
        &mut self.fan
    }

    // ── Internal ──────────────────────────────────────────────

    fn handle_timer_command(&mut self, enable: bool) {
        let channel = self.index;
        if enable {
            let outbox = Rc::clone(&self.outbox);
            let runtime = u64::from(self.config.timer_runtime_secs());
            self.fan.set_timer(runtime, move || {
                outbox.borrow_mut().push_back(FanEvent::TimerFeedback {
                    channel,
                    active: false,
                });
            });
            self.queue(FanEvent::TimerFeedback {
                channel,
                active: true,
            });
        } else {
            self.fan.stop_timer();
            self.queue(FanEvent::TimerFeedback {
                channel,
                active: false,
            });
        }
    }

    fn queue(&self, event: FanEvent) {
        self.outbox.borrow_mut().push_back(event);
    }

    fn flush(&self, sink: &mut impl EventSink) {
        // Take the batch first so the sink can't observe a held borrow.
        let pending: Vec<FanEvent> = self.outbox.borrow_mut().drain(..).collect();
        for event in &pending {
            sink.emit(event);
        }
    }
}
