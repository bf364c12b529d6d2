//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlLoop (domain)
//! ```
//!
//! Two layers of ports live here:
//!
//! * **Line-level ports** ([`SingleWireLine`], [`AnalogSource`]) are the
//!   narrow primitives the sensor drivers are written against. Test doubles
//!   implement them to play back scripted line levels or ADC counts.
//! * **Domain ports** ([`SensorPort`], [`ActuatorPort`], [`InferencePort`],
//!   [`EventSink`]) are what the [`ControlLoop`](super::service::ControlLoop)
//!   consumes via generics, so the loop never touches hardware directly.
//!
//! Microsecond and millisecond waits go through
//! [`embedded_hal::delay::DelayNs`] rather than a bespoke trait.

use crate::error::{InferenceError, TransmissionError};
use crate::inference::{Classification, FeatureVector};
use crate::sensors::frame::SensorReading;
use crate::sensors::soil_moisture::MoistureReading;

// ───────────────────────────────────────────────────────────────
// Line-level ports (driven adapters: GPIO / ADC → drivers)
// ───────────────────────────────────────────────────────────────

/// Logic level of a digital line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineLevel {
    Low,
    High,
}

impl LineLevel {
    pub fn is_high(self) -> bool {
        matches!(self, Self::High)
    }
}

impl From<bool> for LineLevel {
    fn from(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }
}

/// Direction of a bidirectional line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// A single bidirectional GPIO line, time-shared between host and sensor.
pub trait SingleWireLine {
    /// Switch the line between host-driven and sensor-driven.
    fn set_direction(&mut self, direction: Direction);

    /// Drive the line (only meaningful while [`Direction::Output`]).
    fn write(&mut self, level: LineLevel);

    /// Sample the line.
    fn read(&mut self) -> LineLevel;

    /// Return the line to its idle state. Called when a decode attempt ends,
    /// whichever way it ends.
    fn release(&mut self) {
        self.set_direction(Direction::Input);
    }
}

/// A single analog channel.
pub trait AnalogSource {
    /// One raw conversion (0 – 4095 for a 12-bit converter).
    fn read_raw(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the loop calls this to obtain sensor data.
pub trait SensorPort {
    /// One decode attempt of the climate sensor. Never retried internally.
    fn read_climate(&mut self) -> Result<SensorReading, TransmissionError>;

    /// One averaged soil moisture reading.
    fn read_soil(&mut self) -> MoistureReading;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// The two four-output actuator banks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bank {
    Fan,
    Pump,
}

/// Write-side port: the loop calls this to command outputs.
pub trait ActuatorPort {
    /// Show `level` on `bank`. Returns the level actually applied after
    /// clamping to [0, 4].
    fn set_level(&mut self, bank: Bank, level: i32) -> i32;

    /// Assert or clear the sensor-fault indicator.
    fn set_sensor_error(&mut self, on: bool);

    /// Darken every output.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Inference port (driven adapter: domain → model runtime)
// ───────────────────────────────────────────────────────────────

/// Opaque classifier: features in, per-class scores and argmax out.
/// Quantisation, tensor layout and model format stay behind this trait.
pub trait InferencePort {
    fn infer(&mut self, features: &FeatureVector) -> Result<Classification, InferenceError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / diagnostics)
// ───────────────────────────────────────────────────────────────

/// The loop emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go; dropping them is fine.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
