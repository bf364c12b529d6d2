//! Unified error types for the Verdant firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! control loop's error handling uniform. The sensor-side variants are
//! `Copy` so they can be carried inside events and stats without
//! allocation.

use core::fmt;

use crate::config::ConfigError;
use crate::drivers::hw_init::HwInitError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// The climate sensor could not be read or returned implausible data.
    Sensor(SensorError),
    /// The inference collaborator failed to produce a class.
    Inference(InferenceError),
    /// Configuration is invalid or could not be parsed.
    Config(ConfigError),
    /// Peripheral initialisation failed.
    Init(HwInitError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Inference(e) => write!(f, "inference: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Init(e) => write!(f, "init: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Single-wire transmission errors
// ---------------------------------------------------------------------------

/// The protocol phase in which a bounded wait ran out of poll iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the sensor to pull the line low after the host request.
    AwaitAckLow,
    /// Waiting for the end of the sensor's low acknowledgment pulse.
    AwaitAckHigh,
    /// Waiting for the end of the sensor's pre-data high pulse.
    AwaitDataStart,
    /// Waiting for the low lead-in of data bit `bit` (0 = MSB) to end.
    BitLeadingLow { bit: u8 },
    /// Measuring the high pulse of data bit `bit`; the line never fell.
    BitHigh { bit: u8 },
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitAckLow => write!(f, "await ack low"),
            Self::AwaitAckHigh => write!(f, "await ack high"),
            Self::AwaitDataStart => write!(f, "await data start"),
            Self::BitLeadingLow { bit } => write!(f, "bit {bit} leading low"),
            Self::BitHigh { bit } => write!(f, "bit {bit} high pulse"),
        }
    }
}

/// Failure of a single decode attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmissionError {
    /// A wait phase hit the polling limit (sensor absent or not ready).
    Timeout(Phase),
    /// The four data bytes summed to more than `checksum + 1`.
    ChecksumMismatch { sum: u16, checksum: u8 },
}

impl fmt::Display for TransmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout(phase) => write!(f, "timeout during {phase}"),
            Self::ChecksumMismatch { sum, checksum } => {
                write!(f, "checksum mismatch (sum={sum}, checksum={checksum})")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorError {
    /// The frame decoder failed.
    Transmission(TransmissionError),
    /// A syntactically valid frame carried humidity outside [0, 100] %.
    HumidityOutOfRange(f32),
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transmission(e) => write!(f, "transmission error: {e}"),
            Self::HumidityOutOfRange(rh) => write!(f, "humidity {rh:.1}% out of range"),
        }
    }
}

impl From<TransmissionError> for SensorError {
    fn from(e: TransmissionError) -> Self {
        Self::Transmission(e)
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

impl From<TransmissionError> for Error {
    fn from(e: TransmissionError) -> Self {
        Self::Sensor(SensorError::Transmission(e))
    }
}

// ---------------------------------------------------------------------------
// Inference errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceError {
    /// Input or output tensor has an element type the glue cannot handle.
    /// Carries the engine's raw type code.
    UnsupportedTensor(u8),
    /// The engine's invoke step reported failure.
    InvokeFailed,
    /// The output tensor has no classes to choose from.
    NoClasses,
}

impl fmt::Display for InferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedTensor(code) => write!(f, "unsupported tensor type {code}"),
            Self::InvokeFailed => write!(f, "invoke failed"),
            Self::NoClasses => write!(f, "model produced no classes"),
        }
    }
}

impl From<InferenceError> for Error {
    fn from(e: InferenceError) -> Self {
        Self::Inference(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
