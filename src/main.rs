//! Ventilation fan firmware: main entry point.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Adapters (outer ring)                   │
//! │  HalFanHardware × 2 (LEDC + GPIO)      LogEventSink     │
//! │  ──────────────── Port Trait Boundary ───────────────   │
//! │  ┌───────────────────────────────────────────────────┐  │
//! │  │  FanService ── FanChannel ── FanController        │  │
//! │  │                                └─ CrossFlowDriver │  │
//! │  └───────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Instant;

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyOutputPin, Output, OutputPin, PinDriver};
use esp_idf_hal::ledc::config::TimerConfig;
use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver, Resolution};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::FromValueType;
use log::info;

use ventfan::adapters::hal::HalFanHardware;
use ventfan::adapters::log_sink::LogEventSink;
use ventfan::app::controller::FanController;
use ventfan::app::service::FanService;
use ventfan::config::ModuleConfig;
use ventfan::drivers::cross_flow::CrossFlowDriver;
use ventfan::pins;

/// Control loop period.
const LOOP_PERIOD_MS: u32 = 100;

type BoardHardware<'d> =
    HalFanHardware<LedcDriver<'d>, LedcDriver<'d>, PinDriver<'d, AnyOutputPin, Output>>;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  ventfan v{}                          ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = ModuleConfig::default();
    config.validate()?;

    // ── 3. PWM + GPIO ─────────────────────────────────────────
    let p = Peripherals::take()?;
    let timer = LedcTimerDriver::new(
        p.ledc.timer0,
        &TimerConfig::new()
            .frequency(pins::FAN_PWM_FREQ_HZ.Hz().into())
            .resolution(Resolution::Bits10),
    )?;

    let fan1: BoardHardware = HalFanHardware::new(
        pins::FAN1,
        LedcDriver::new(p.ledc.channel0, &timer, p.pins.gpio1)?,
        LedcDriver::new(p.ledc.channel1, &timer, p.pins.gpio2)?,
        PinDriver::output(p.pins.gpio3.downgrade_output())?,
    );
    let fan2: BoardHardware = HalFanHardware::new(
        pins::FAN2,
        LedcDriver::new(p.ledc.channel2, &timer, p.pins.gpio4)?,
        LedcDriver::new(p.ledc.channel3, &timer, p.pins.gpio5)?,
        PinDriver::output(p.pins.gpio6.downgrade_output())?,
    );

    // ── 4. Service ────────────────────────────────────────────
    let fans = [
        FanController::new(fan1, CrossFlowDriver::new(pins::FAN1)),
        FanController::new(fan2, CrossFlowDriver::new(pins::FAN2)),
    ];
    let mut service = FanService::new(config, fans);
    let mut sink = LogEventSink::new();
    service.setup(true);

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    let mut last = Instant::now();
    loop {
        FreeRtos::delay_ms(LOOP_PERIOD_MS);
        let now = Instant::now();
        let elapsed_ms = now.duration_since(last).as_millis() as u64;
        // Carry the sub-millisecond remainder into the next period.
        last += std::time::Duration::from_millis(elapsed_ms);
        service.poll(elapsed_ms, &mut sink);
    }
}
