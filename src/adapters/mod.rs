//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements      | Connects to                 |
//! |------------|-----------------|-----------------------------|
//! | `hardware` | ProximityPort   | PIR + HC-SR04 (SensorHub)   |
//! |            | IndicatorPort   | Stoplight LEDs              |
//! | `log_sink` | EventSink       | `log` facade                |
//! | `rpi`      | (constructor)   | `rppal` GPIO, `rpi` feature |

pub mod hardware;
pub mod log_sink;
#[cfg(feature = "rpi")]
pub mod rpi;
