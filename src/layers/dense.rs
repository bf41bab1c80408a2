use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activations::Activation;
use crate::error::{DqnError, Result};
use super::initialization::WeightInit;

/// A fully connected (dense) layer: `act(x · W + b)`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DenseLayer {
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
    pub activation: Activation,
}

/// Values recorded during a training forward pass, consumed by backpropagation.
#[derive(Clone, Debug)]
pub struct LayerCache {
    inputs: Array2<f32>,
    pre_activation: Array2<f32>,
}

/// Parameter gradients of one dense layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradients {
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
}

impl DenseLayer {
    /// Create a new dense layer with the given sizes, activation and initialization.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        init: WeightInit,
        rng: &mut R,
    ) -> Result<Self> {
        let weights = init.initialize_weights((input_size, output_size), rng)?;
        let biases = init.initialize_biases(input_size, output_size, rng)?;
        Ok(DenseLayer { weights, biases, activation })
    }

    pub fn with_weights(mut self, weights: Array2<f32>) -> Result<Self> {
        if weights.dim() != self.weights.dim() {
            return Err(DqnError::dimension_mismatch(
                format!("{:?}", self.weights.dim()),
                format!("{:?}", weights.dim()),
            ));
        }
        self.weights = weights;
        Ok(self)
    }

    pub fn with_biases(mut self, biases: Array1<f32>) -> Result<Self> {
        if biases.dim() != self.biases.dim() {
            return Err(DqnError::dimension_mismatch(
                format!("{:?}", self.biases.dim()),
                format!("{:?}", biases.dim()),
            ));
        }
        self.biases = biases;
        Ok(self)
    }

    pub fn input_size(&self) -> usize {
        self.weights.shape()[0]
    }

    pub fn output_size(&self) -> usize {
        self.weights.shape()[1]
    }

    fn affine(&self, inputs: ArrayView2<f32>) -> Array2<f32> {
        inputs.dot(&self.weights) + &self.biases.view().insert_axis(Axis(0))
    }

    /// Forward pass for a batch without recording anything.
    pub fn forward_batch(&self, inputs: ArrayView2<f32>) -> Array2<f32> {
        let mut outputs = self.affine(inputs);
        self.activation.apply_batch(&mut outputs);
        outputs
    }

    /// Forward pass for a batch that also returns the cache needed by
    /// [`DenseLayer::backward_batch`].
    pub fn forward_batch_cached(&self, inputs: ArrayView2<f32>) -> (Array2<f32>, LayerCache) {
        let pre_activation = self.affine(inputs);
        let mut outputs = pre_activation.clone();
        self.activation.apply_batch(&mut outputs);
        let cache = LayerCache {
            inputs: inputs.to_owned(),
            pre_activation,
        };
        (outputs, cache)
    }

    /// Backpropagate `output_errors` (dL/d output, one row per sample).
    ///
    /// Returns the error with respect to this layer's inputs and the
    /// parameter gradients, summed over the batch.
    pub fn backward_batch(&self, cache: &LayerCache, output_errors: ArrayView2<f32>) -> (Array2<f32>, Gradients) {
        let activation_deriv = self.activation.derivative_batch(cache.pre_activation.view());
        let adjusted_error = &output_errors * &activation_deriv;
        let weight_gradients = cache.inputs.t().dot(&adjusted_error);
        let bias_gradients = adjusted_error.sum_axis(Axis(0));
        let input_errors = adjusted_error.dot(&self.weights.t());

        (input_errors, Gradients { weights: weight_gradients, biases: bias_gradients })
    }
}
