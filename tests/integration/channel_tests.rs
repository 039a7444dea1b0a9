//! Integration tests for bus commands → fan channel → feedback events.

use ventfan::app::channel::FanChannel;
use ventfan::app::commands::ChannelCommand;
use ventfan::app::events::FanEvent;
use ventfan::app::ports::TimerSource;
use ventfan::config::{ChannelConfig, ModeSetting};
use ventfan::drivers::cross_flow::CrossFlowDriver;
use ventfan::fsm::{ControlMode, OperatingMode, VentilationMode};

use crate::mock_hw::{CollectingSink, MockHardware, fan};

type Channel = FanChannel<CrossFlowDriver, MockHardware>;

fn channel(config: ChannelConfig) -> (Channel, CollectingSink) {
    let mut ch = FanChannel::new(0, fan(), config);
    ch.setup(true);
    (ch, CollectingSink::new())
}

fn switchable() -> ChannelConfig {
    ChannelConfig {
        operating_mode: ModeSetting::BusSwitchable,
        ventilation_mode: ModeSetting::BusSwitchable,
        ..ChannelConfig::default()
    }
}

// ── Setup ─────────────────────────────────────────────────────

#[test]
fn setup_applies_fixed_modes_and_thresholds() {
    let (ch, _) = channel(ChannelConfig {
        operating_mode: ModeSetting::Fixed(OperatingMode::Automatic),
        ventilation_mode: ModeSetting::Fixed(VentilationMode::ExhaustAir),
        control_mode: ControlMode::Adaptive,
        threshold_humidity_on: 70.0,
        threshold_humidity_off: 65.0,
        threshold_speed: 2,
        ..ChannelConfig::default()
    });

    let modes = ch.fan().modes();
    assert_eq!(modes.operating, OperatingMode::Automatic);
    assert_eq!(modes.ventilation, VentilationMode::ExhaustAir);
    assert_eq!(modes.control, ControlMode::Adaptive);

    let ctx = ch.fan().context();
    assert_eq!(ctx.threshold_humidity_on, 70.0);
    assert_eq!(ctx.threshold_humidity_off, 65.0);
    assert_eq!(ctx.threshold_speed, 2);
}

#[test]
fn bus_switchable_modes_keep_power_on_defaults() {
    let (ch, _) = channel(switchable());
    let modes = ch.fan().modes();
    assert_eq!(modes.operating, OperatingMode::Manual);
    assert_eq!(modes.ventilation, VentilationMode::HeatRecovery);
}

// ── Speed commands ────────────────────────────────────────────

#[test]
fn level_command_reports_speed_feedback() {
    let (mut ch, mut sink) = channel(ChannelConfig::default());
    ch.handle(ChannelCommand::Level(3), &mut sink);

    assert_eq!(ch.fan().fan_speed(), 3);
    assert_eq!(
        sink.events,
        vec![FanEvent::SpeedFeedback {
            channel: 0,
            speed: 3
        }]
    );
}

#[test]
fn level_steps_walk_the_speed_range() {
    let (mut ch, mut sink) = channel(ChannelConfig::default());
    for _ in 0..7 {
        ch.handle(ChannelCommand::LevelStep { up: true }, &mut sink);
    }
    assert_eq!(ch.fan().fan_speed(), 5);
    assert_eq!(
        sink.last(),
        Some(&FanEvent::SpeedFeedback {
            channel: 0,
            speed: 5
        })
    );

    ch.handle(ChannelCommand::LevelStep { up: false }, &mut sink);
    assert_eq!(ch.fan().fan_speed(), 4);
}

// ── Mode commands ─────────────────────────────────────────────

#[test]
fn operating_mode_switch_is_applied_and_echoed() {
    let (mut ch, mut sink) = channel(switchable());
    ch.handle(
        ChannelCommand::OperatingModeSwitch { automatic: true },
        &mut sink,
    );

    assert_eq!(ch.fan().modes().operating, OperatingMode::Automatic);
    assert!(sink.has(&FanEvent::OperatingModeFeedback {
        channel: 0,
        automatic: true
    }));
}

#[test]
fn ventilation_mode_switch_is_applied_and_echoed() {
    let (mut ch, mut sink) = channel(switchable());
    ch.handle(ChannelCommand::VentilationMode(1), &mut sink);

    assert_eq!(ch.fan().modes().ventilation, VentilationMode::SupplyAir);
    assert_eq!(
        sink.events,
        vec![FanEvent::VentilationModeFeedback {
            channel: 0,
            mode: VentilationMode::SupplyAir
        }]
    );
}

#[test]
fn fixed_ventilation_mode_ignores_bus() {
    let (mut ch, mut sink) = channel(ChannelConfig::default());
    ch.handle(ChannelCommand::VentilationMode(2), &mut sink);
    assert_eq!(ch.fan().modes().ventilation, VentilationMode::HeatRecovery);
    assert!(sink.events.is_empty());
}

// ── Environment ───────────────────────────────────────────────

#[test]
fn humidity_input_drives_automatic_speed() {
    let (mut ch, mut sink) = channel(ChannelConfig {
        operating_mode: ModeSetting::Fixed(OperatingMode::Automatic),
        ..ChannelConfig::default()
    });
    sink.clear();

    ch.handle(ChannelCommand::InsideTemperature(21.0), &mut sink);
    ch.handle(ChannelCommand::InsideHumidity(75.0), &mut sink);
    assert_eq!(ch.fan().fan_speed(), 4);
    assert_eq!(
        sink.last(),
        Some(&FanEvent::SpeedFeedback {
            channel: 0,
            speed: 4
        })
    );

    ch.handle(ChannelCommand::OutsideTemperature(4.0), &mut sink);
    ch.handle(ChannelCommand::OutsideHumidity(60.0), &mut sink);
    assert_eq!(ch.fan().context().outside.temperature, 4.0);
    assert_eq!(ch.fan().context().outside.relative_humidity, 60.0);
}

// ── Timer ─────────────────────────────────────────────────────

#[test]
fn timer_enable_reports_running_then_stopped_on_expiry() {
    let (mut ch, mut sink) = channel(ChannelConfig {
        timer_selection_secs: 600,
        ..ChannelConfig::default()
    });
    ch.handle(ChannelCommand::Level(2), &mut sink);
    sink.clear();

    ch.handle(ChannelCommand::Timer { enable: true }, &mut sink);
    assert_eq!(
        sink.events,
        vec![FanEvent::TimerFeedback {
            channel: 0,
            active: true
        }]
    );
    sink.clear();

    let fired = ch.fan_mut().hw_mut().poll_expired(600_000);
    for token in fired {
        ch.handle_timer(token, &mut sink);
    }
    assert_eq!(ch.fan().fan_speed(), 0);
    assert!(sink.has(&FanEvent::SpeedFeedback {
        channel: 0,
        speed: 0
    }));
    assert_eq!(
        sink.last(),
        Some(&FanEvent::TimerFeedback {
            channel: 0,
            active: false
        })
    );
}

#[test]
fn timer_uses_manual_runtime_without_selection() {
    let (mut ch, mut sink) = channel(ChannelConfig {
        timer_manual_secs: 120,
        ..ChannelConfig::default()
    });
    ch.handle(ChannelCommand::Timer { enable: true }, &mut sink);
    assert_eq!(ch.fan().hw().timers.next_deadline_ms(), Some(120_000));
}

#[test]
fn timer_disable_stops_fan_and_reports_stopped() {
    let (mut ch, mut sink) = channel(ChannelConfig::default());
    ch.handle(ChannelCommand::Level(3), &mut sink);
    ch.handle(ChannelCommand::Timer { enable: true }, &mut sink);
    sink.clear();

    ch.handle(ChannelCommand::Timer { enable: false }, &mut sink);
    assert_eq!(ch.fan().fan_speed(), 0);
    assert_eq!(
        sink.events,
        vec![
            FanEvent::SpeedFeedback {
                channel: 0,
                speed: 0
            },
            FanEvent::TimerFeedback {
                channel: 0,
                active: false
            },
        ]
    );
    assert!(!ch.fan().is_timer_armed());
    assert!(ch.fan_mut().hw_mut().poll_expired(10_000_000).is_empty());
}

#[test]
fn reset_stops_fan_and_latches_override() {
    let (mut ch, mut sink) = channel(ChannelConfig::default());
    ch.handle(ChannelCommand::Level(5), &mut sink);
    ch.reset(&mut sink);
    assert_eq!(ch.fan().fan_speed(), 0);
    assert!(ch.fan().is_manual_override_active());
}

#[test]
fn unconfigured_channel_keeps_defaults() {
    let mut ch = FanChannel::new(
        1,
        fan(),
        ChannelConfig {
            operating_mode: ModeSetting::Fixed(OperatingMode::Off),
            ..ChannelConfig::default()
        },
    );
    ch.setup(false);
    assert_eq!(ch.fan().modes().operating, OperatingMode::Manual);
    assert_eq!(ch.index(), 1);
}
