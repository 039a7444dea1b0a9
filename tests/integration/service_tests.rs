//! Integration tests for the board-level fan service: startup delay, timer
//! dispatch and command routing across two channels.

use ventfan::Error;
use ventfan::app::commands::ChannelCommand;
use ventfan::app::events::FanEvent;
use ventfan::app::service::FanService;
use ventfan::config::{ChannelConfig, ModuleConfig};
use ventfan::drivers::cross_flow::CrossFlowDriver;
use ventfan::pins;

use crate::mock_hw::{CollectingSink, MockHardware, fan_on};

type Service = FanService<CrossFlowDriver, MockHardware>;

fn service(config: ModuleConfig) -> (Service, CollectingSink) {
    let fans = [fan_on(pins::FAN1), fan_on(pins::FAN2)];
    let mut svc = FanService::new(config, fans);
    svc.setup(true);
    (svc, CollectingSink::new())
}

#[test]
fn startup_resets_every_fan_once_after_delay() {
    let (mut svc, mut sink) = service(ModuleConfig::default());
    assert_eq!(svc.channel_count(), 2);

    svc.handle_command(1, ChannelCommand::Level(3), &mut sink)
        .expect("channel 1 exists");
    sink.clear();

    svc.poll(4_900, &mut sink);
    assert!(!svc.is_started());
    assert!(sink.events.is_empty());

    svc.poll(100, &mut sink);
    assert!(svc.is_started());
    assert_eq!(
        sink.events,
        vec![
            FanEvent::SpeedFeedback {
                channel: 0,
                speed: 0
            },
            FanEvent::SpeedFeedback {
                channel: 1,
                speed: 0
            },
            FanEvent::StartupComplete,
        ]
    );
    let fan2 = svc.channel(1).expect("channel 1").fan();
    assert_eq!(fan2.fan_speed(), 0);

    sink.clear();
    svc.poll(10_000, &mut sink);
    assert!(!sink.has(&FanEvent::StartupComplete));
}

#[test]
fn commands_route_to_their_channel() {
    let (mut svc, mut sink) = service(ModuleConfig::default());
    svc.handle_command(0, ChannelCommand::Level(2), &mut sink)
        .expect("channel 0 exists");
    svc.handle_command(1, ChannelCommand::Level(5), &mut sink)
        .expect("channel 1 exists");

    let speed = |i: usize| svc.channel(i).expect("channel").fan().fan_speed();
    assert_eq!(speed(0), 2);
    assert_eq!(speed(1), 5);
    assert_eq!(
        sink.last(),
        Some(&FanEvent::SpeedFeedback {
            channel: 1,
            speed: 5
        })
    );

    // Each channel drives its own pins.
    let hw1 = svc.channel(0).expect("channel").fan().hw();
    let hw2 = svc.channel(1).expect("channel").fan().hw();
    assert_eq!(hw1.pwm(pins::FAN1.phase1), 768);
    assert_eq!(hw2.pwm(pins::FAN2.phase1), 938);
}

#[test]
fn unknown_channel_is_rejected() {
    let (mut svc, mut sink) = service(ModuleConfig::default());
    let err = svc
        .handle_command(2, ChannelCommand::Level(1), &mut sink)
        .unwrap_err();
    assert_eq!(err, Error::UnknownChannel(2));
    assert!(sink.events.is_empty());
}

#[test]
fn poll_dispatches_direction_timers_per_channel() {
    let (mut svc, mut sink) = service(ModuleConfig::default());
    svc.poll(5_000, &mut sink);
    svc.handle_command(0, ChannelCommand::Level(3), &mut sink)
        .expect("channel 0 exists");

    let phase1 = |svc: &Service| {
        svc.channel(0)
            .expect("channel")
            .fan()
            .hw()
            .pwm(pins::FAN1.phase1)
    };
    assert_eq!(phase1(&svc), 853);

    svc.poll(60_000, &mut sink);
    assert_eq!(phase1(&svc), 170, "direction reversed");

    // The idle fan never started a direction timer.
    let hw2 = svc.channel(1).expect("channel").fan().hw();
    assert!(!hw2.direction_timer_running());
}

#[test]
fn poll_delivers_countdown_expiry_feedback() {
    let mut config = ModuleConfig::default();
    config.channels[1] = ChannelConfig {
        timer_selection_secs: 300,
        ..ChannelConfig::default()
    };
    let (mut svc, mut sink) = service(config);
    svc.poll(5_000, &mut sink);

    svc.handle_command(1, ChannelCommand::Level(4), &mut sink)
        .expect("channel 1 exists");
    svc.handle_command(1, ChannelCommand::Timer { enable: true }, &mut sink)
        .expect("channel 1 exists");
    sink.clear();

    // Ten-second ticks, as a slow main loop would deliver them.
    for _ in 0..30 {
        svc.poll(10_000, &mut sink);
    }
    assert_eq!(
        svc.channel(1).expect("channel").fan().fan_speed(),
        0,
        "countdown stopped the fan"
    );
    assert_eq!(
        sink.last(),
        Some(&FanEvent::TimerFeedback {
            channel: 1,
            active: false
        })
    );
}
