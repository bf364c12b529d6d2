//! Verdant firmware library.
//!
//! Exposes the sensing, inference and control modules for integration
//! testing. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module; off target the
//! hardware helpers fall back to in-memory simulation.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod inference;
pub mod pins;
pub mod sensors;
