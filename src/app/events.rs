//! Outbound application events.
//!
//! The [`ControlLoop`](super::service::ControlLoop) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them — log to serial, or drop them.

use crate::error::{InferenceError, SensorError};

use super::ports::Bank;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The loop has been constructed and is about to run its first cycle.
    Started,

    /// The climate reading failed or was implausible; the cycle was skipped.
    SensorFault {
        error: SensorError,
        /// Faulted cycles in a row, including this one.
        consecutive: u32,
    },

    /// One bank's classifier failed; that bank was driven to level 0.
    InferenceFailed { bank: Bank, error: InferenceError },

    /// A full cycle completed.
    Cycle(CycleReport),
}

/// Everything observed and commanded during one completed cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    pub cycle: u64,
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub soil_raw: u16,
    pub soil_pct: f32,
    /// Level applied to the fan bank (after clamping).
    pub fan_level: i32,
    /// Level applied to the pump bank (after clamping).
    pub pump_level: i32,
}
