//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the Verdant loop: read the
//! climate and soil sensors, classify fan and pump levels, actuate, report.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
