//! Built-in single-layer classifier.
//!
//! One fully-connected layer followed by softmax:
//! `p = softmax(W·x + b)`, with one weight row and one bias per class.
//! Weights come from [`ModelConfig`](crate::config::ModelConfig) so they
//! can be retuned without a rebuild.
//!
//! # Default weights
//!
//! The shipped defaults use a "ramp" layout that turns a linear score
//! `s = g·x + c` into the nearest level: row `k` is `k·g` and bias `k` is
//! `k·c − k²/2`. The logit `k·s − k²/2` peaks at `k = round(s)`, so the
//! winning class tracks `s` and saturates at the ends.

use serde::{Deserialize, Serialize};

use super::classifier::TensorModel;
use super::tensor::{Tensor, TensorMut};
use super::{FEATURE_COUNT, MAX_CLASSES};
use crate::error::InferenceError;

/// Levels per bank (0 ..= 4).
const DEFAULT_CLASSES: usize = 5;

/// Weight rows and biases of a dense layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseWeights {
    pub weights: heapless::Vec<[f32; FEATURE_COUNT], MAX_CLASSES>,
    pub bias: heapless::Vec<f32, MAX_CLASSES>,
}

impl DenseWeights {
    /// Ramp weights for score `gain·x + offset` over `DEFAULT_CLASSES` levels.
    fn ramp(gain: [f32; FEATURE_COUNT], offset: f32) -> Self {
        let mut weights = heapless::Vec::new();
        let mut bias = heapless::Vec::new();
        for k in 0..DEFAULT_CLASSES {
            let kf = k as f32;
            let _ = weights.push(gain.map(|g| g * kf));
            let _ = bias.push(kf * offset - 0.5 * kf * kf);
        }
        Self { weights, bias }
    }

    /// Fan level rises with temperature and, more gently, with humidity.
    /// 24 °C / 60 % lands on level 1; each extra 5 °C adds a level.
    pub fn default_fan() -> Self {
        Self::ramp([1.0 / 5.0, 1.0 / 40.0, 0.0], -5.5)
    }

    /// Pump level falls as the soil gets wetter: 4 when bone dry, 0 from
    /// about 60 % moisture upward.
    pub fn default_pump() -> Self {
        Self::ramp([0.0, 0.0, -1.0 / 15.0], 4.0)
    }

    pub fn classes(&self) -> usize {
        self.weights.len()
    }

    /// One bias per weight row, and at least one class.
    pub fn is_consistent(&self) -> bool {
        !self.weights.is_empty() && self.weights.len() == self.bias.len()
    }
}

/// [`TensorModel`] evaluating a [`DenseWeights`] layer in `f32`.
#[derive(Debug, Clone)]
pub struct DenseModel {
    layer: DenseWeights,
    input: [f32; FEATURE_COUNT],
    output: heapless::Vec<f32, MAX_CLASSES>,
}

impl DenseModel {
    pub fn new(layer: DenseWeights) -> Self {
        Self {
            layer,
            input: [0.0; FEATURE_COUNT],
            output: heapless::Vec::new(),
        }
    }

    pub fn weights(&self) -> &DenseWeights {
        &self.layer
    }
}

impl TensorModel for DenseModel {
    fn input(&mut self) -> TensorMut<'_> {
        TensorMut::Float32(&mut self.input)
    }

    fn invoke(&mut self) -> Result<(), InferenceError> {
        if !self.layer.is_consistent() {
            return Err(InferenceError::InvokeFailed);
        }
        self.output.clear();
        for (row, b) in self.layer.weights.iter().zip(&self.layer.bias) {
            let logit = row.iter().zip(&self.input).map(|(w, x)| w * x).sum::<f32>() + b;
            let _ = self.output.push(logit);
        }
        softmax(&mut self.output);
        Ok(())
    }

    fn output(&self) -> Tensor<'_> {
        Tensor::Float32(&self.output)
    }
}

/// In-place softmax, shifted by the max logit for stability.
fn softmax(values: &mut [f32]) {
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut total = 0.0;
    for v in values.iter_mut() {
        *v = (*v - max).exp();
        total += *v;
    }
    if total > 0.0 {
        for v in values.iter_mut() {
            *v /= total;
        }
    }
}
