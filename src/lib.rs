//! ParkAssist library.
//!
//! A garage parking assistant: a PIR sensor wakes the system, an HC-SR04
//! ranger measures the gap to the wall, and a three-lamp stoplight shows
//! how close the car is.  Hardware access is behind port traits; the
//! Raspberry Pi backend is enabled with the `rpi` feature.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod bands;
pub mod config;
pub mod diagnostics;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod indicator;
pub mod pins;
pub mod sensors;
pub mod session;
pub mod shutdown;
