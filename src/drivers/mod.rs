//! Indicator drivers, hardware initialisation, and peripheral helpers.

pub mod hw_init;
pub mod level_bank;
pub mod status_led;
pub mod watchdog;
