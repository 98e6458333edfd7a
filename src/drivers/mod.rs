//! Output drivers.

pub mod stoplight;
