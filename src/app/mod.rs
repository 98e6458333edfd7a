//! Application core: pure domain logic, zero I/O.
//!
//! The rules of the parking assistant: wait for motion, announce it, then
//! map each distance sample to a colour band.  All interaction with
//! hardware happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
