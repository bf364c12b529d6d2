//! [`InferencePort`] adapter over a tensor-level model.

use log::trace;

use super::tensor::{self, Tensor, TensorMut};
use super::{Classification, FeatureVector};
use crate::app::ports::InferencePort;
use crate::error::InferenceError;

/// A model runtime seen as one input tensor, one output tensor and an
/// invoke step in between.
pub trait TensorModel {
    fn input(&mut self) -> TensorMut<'_>;
    fn invoke(&mut self) -> Result<(), InferenceError>;
    fn output(&self) -> Tensor<'_>;
}

/// Quantises features into the model, runs it, dequantises the scores and
/// picks the first maximal class.
pub struct QuantizedClassifier<M> {
    name: &'static str,
    model: M,
}

impl<M: TensorModel> QuantizedClassifier<M> {
    pub fn new(name: &'static str, model: M) -> Self {
        Self { name, model }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn model(&self) -> &M {
        &self.model
    }
}

impl<M: TensorModel> InferencePort for QuantizedClassifier<M> {
    fn infer(&mut self, features: &FeatureVector) -> Result<Classification, InferenceError> {
        tensor::fill_input(self.model.input(), features.as_array())?;
        self.model.invoke()?;

        let mut scores = heapless::Vec::new();
        tensor::read_scores(self.model.output(), &mut scores)?;
        let class = tensor::argmax(&scores).ok_or(InferenceError::NoClasses)?;
        trace!("{}: scores {:?} -> class {}", self.name, scores.as_slice(), class);
        Ok(Classification { scores, class })
    }
}
