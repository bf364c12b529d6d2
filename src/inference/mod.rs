//! Level inference — features in, a discrete fan / pump level out.
//!
//! The control loop only sees [`InferencePort`](crate::app::ports::InferencePort).
//! Behind it:
//!
//! * [`tensor`] — quantise / dequantise glue between float features and
//!   whatever element type a model's tensors use.
//! * [`classifier`] — [`QuantizedClassifier`](classifier::QuantizedClassifier),
//!   the `InferencePort` adapter over any tensor-level model.
//! * [`dense`] — a built-in fully-connected + softmax model, so the board
//!   runs without an external interpreter.

pub mod classifier;
pub mod dense;
pub mod tensor;

/// Number of input features.
pub const FEATURE_COUNT: usize = 3;

/// Upper bound on output classes read back from a model.
pub const MAX_CLASSES: usize = 16;

/// `(temperature °C, relative humidity %, soil moisture %)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f32; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(temperature_c: f32, humidity_pct: f32, moisture_pct: f32) -> Self {
        Self([temperature_c, humidity_pct, moisture_pct])
    }

    pub fn as_array(&self) -> &[f32; FEATURE_COUNT] {
        &self.0
    }
}

/// Per-class scores and the winning class index.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub scores: heapless::Vec<f32, MAX_CLASSES>,
    pub class: usize,
}

impl Classification {
    /// Winning class as an actuation level (unclamped).
    pub fn level(&self) -> i32 {
        self.class as i32
    }
}
