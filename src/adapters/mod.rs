//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements    | Connects to                          |
//! |------------|---------------|--------------------------------------|
//! | `hal`      | FanHardware   | embedded-hal PWM + GPIO, soft timers |
//! |            | TimerSource   |                                      |
//! | `log_sink` | EventSink     | Serial log output                    |

pub mod hal;
pub mod log_sink;
