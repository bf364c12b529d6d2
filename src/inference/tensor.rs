//! Tensor element handling for quantised models.
//!
//! Models quantised to 8 bits expose an affine mapping per tensor:
//! `real = (q − zero_point) × scale`. Inputs are quantised with
//! round-to-nearest and saturated to the element type; outputs are
//! dequantised back to float scores.

use log::warn;

use super::MAX_CLASSES;
use crate::error::InferenceError;

/// Affine quantisation parameters of one tensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantParams {
    pub scale: f32,
    pub zero_point: i32,
}

impl QuantParams {
    /// `round(x / scale) + zero_point`, saturated to `[min, max]`.
    pub fn quantize(self, x: f32, min: i32, max: i32) -> i32 {
        ((x / self.scale).round() as i32)
            .saturating_add(self.zero_point)
            .clamp(min, max)
    }

    pub fn dequantize(self, q: i32) -> f32 {
        (q - self.zero_point) as f32 * self.scale
    }
}

/// Read-only view of a model tensor.
#[derive(Debug)]
pub enum Tensor<'a> {
    Float32(&'a [f32]),
    Int8(&'a [i8], QuantParams),
    UInt8(&'a [u8], QuantParams),
    /// Element type the glue does not handle; carries the engine's type code.
    Unsupported(u8),
}

/// Writable view of a model tensor.
#[derive(Debug)]
pub enum TensorMut<'a> {
    Float32(&'a mut [f32]),
    Int8(&'a mut [i8], QuantParams),
    UInt8(&'a mut [u8], QuantParams),
    Unsupported(u8),
}

/// Write `values` into an input tensor, quantising if needed.
/// Extra values beyond the tensor's length are ignored.
pub fn fill_input(tensor: TensorMut<'_>, values: &[f32]) -> Result<(), InferenceError> {
    match tensor {
        TensorMut::Float32(data) => {
            for (slot, &v) in data.iter_mut().zip(values) {
                *slot = v;
            }
        }
        TensorMut::Int8(data, q) => {
            for (slot, &v) in data.iter_mut().zip(values) {
                *slot = q.quantize(v, i32::from(i8::MIN), i32::from(i8::MAX)) as i8;
            }
        }
        TensorMut::UInt8(data, q) => {
            for (slot, &v) in data.iter_mut().zip(values) {
                *slot = q.quantize(v, 0, i32::from(u8::MAX)) as u8;
            }
        }
        TensorMut::Unsupported(code) => {
            warn!("inference: unsupported input tensor type {}", code);
            return Err(InferenceError::UnsupportedTensor(code));
        }
    }
    Ok(())
}

/// Dequantise an output tensor into `out`, keeping at most [`MAX_CLASSES`].
pub fn read_scores(
    tensor: Tensor<'_>,
    out: &mut heapless::Vec<f32, MAX_CLASSES>,
) -> Result<(), InferenceError> {
    out.clear();
    match tensor {
        Tensor::Float32(data) => {
            for &v in data.iter().take(MAX_CLASSES) {
                let _ = out.push(v);
            }
        }
        Tensor::Int8(data, q) => {
            for &v in data.iter().take(MAX_CLASSES) {
                let _ = out.push(q.dequantize(i32::from(v)));
            }
        }
        Tensor::UInt8(data, q) => {
            for &v in data.iter().take(MAX_CLASSES) {
                let _ = out.push(q.dequantize(i32::from(v)));
            }
        }
        Tensor::Unsupported(code) => {
            warn!("inference: unsupported output tensor type {}", code);
            return Err(InferenceError::UnsupportedTensor(code));
        }
    }
    Ok(())
}

/// Index of the first maximal score. `None` for an empty slice.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let (first, rest) = scores.split_first()?;
    let mut best = 0;
    let mut max = *first;
    for (i, &s) in rest.iter().enumerate() {
        if s > max {
            max = s;
            best = i + 1;
        }
    }
    Some(best)
}
