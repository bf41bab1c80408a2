use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;
use serde::{Serialize, Deserialize};
use std::fs;
use std::path::Path;

use crate::activations::Activation;
use crate::error::{DqnError, Result};
use crate::layers::{DenseLayer, Gradients, LayerCache, WeightInit};
use crate::optimizer::Optimizer;

/// Feed-forward action-value approximator.
///
/// Maps an observation of length `input_size()` to one value per discrete
/// action. The online and the target network of an agent are two instances
/// of this type.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct QNetwork {
    pub layers: Vec<DenseLayer>,
}

/// Per-layer caches from [`QNetwork::forward_train`].
#[derive(Clone, Debug)]
pub struct ForwardCache {
    layers: Vec<LayerCache>,
}

impl QNetwork {
    /// Create a network with the given layer sizes.
    ///
    /// Hidden layers use ReLU; the last layer uses `output_activation`.
    /// `layer_sizes` includes the input and output sizes.
    pub fn new<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        output_activation: Activation,
        init: WeightInit,
        rng: &mut R,
    ) -> Result<Self> {
        if layer_sizes.len() < 2 {
            return Err(DqnError::invalid_parameter(
                "layer_sizes",
                "network must have at least input and output sizes",
            ));
        }
        if let Some(position) = layer_sizes.iter().position(|&size| size == 0) {
            return Err(DqnError::InvalidParameter {
                name: "layer_sizes".to_string(),
                reason: format!("layer {} has zero units", position),
            });
        }

        let last = layer_sizes.len() - 2;
        let layers = layer_sizes
            .windows(2)
            .enumerate()
            .map(|(i, window)| {
                let activation = if i == last { output_activation } else { Activation::Relu };
                DenseLayer::new(window[0], window[1], activation, init, rng)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(QNetwork { layers })
    }

    /// Build a network from existing layers, checking that consecutive sizes agree.
    pub fn from_layers(layers: Vec<DenseLayer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(DqnError::invalid_parameter("layers", "network needs at least one layer"));
        }
        for pair in layers.windows(2) {
            if pair[0].output_size() != pair[1].input_size() {
                return Err(DqnError::dimension_mismatch(
                    pair[0].output_size().to_string(),
                    pair[1].input_size().to_string(),
                ));
            }
        }
        Ok(QNetwork { layers })
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, DenseLayer::input_size)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, DenseLayer::output_size)
    }

    fn check_input(&self, width: usize) -> Result<()> {
        if width != self.input_size() {
            return Err(DqnError::DimensionMismatch {
                expected: format!("observation of length {}", self.input_size()),
                actual: format!("length {}", width),
            });
        }
        Ok(())
    }

    /// Inference-only forward pass for a single observation.
    pub fn forward(&self, input: ArrayView1<f32>) -> Result<Array1<f32>> {
        let output = self.forward_batch(input.insert_axis(Axis(0)))?;
        Ok(output.index_axis_move(Axis(0), 0))
    }

    /// Inference-only forward pass for a batch of observations, one per row.
    pub fn forward_batch(&self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_input(inputs.ncols())?;
        let mut current = inputs.to_owned();
        for layer in &self.layers {
            current = layer.forward_batch(current.view());
        }
        Ok(current)
    }

    /// Forward pass that records what [`QNetwork::backward`] needs.
    pub fn forward_train(&self, inputs: ArrayView2<f32>) -> Result<(Array2<f32>, ForwardCache)> {
        self.check_input(inputs.ncols())?;
        let mut caches = Vec::with_capacity(self.layers.len());
        let mut current = inputs.to_owned();
        for layer in &self.layers {
            let (output, cache) = layer.forward_batch_cached(current.view());
            caches.push(cache);
            current = output;
        }
        Ok((current, ForwardCache { layers: caches }))
    }

    /// Backpropagate the gradient of the loss with respect to the network
    /// outputs. Returns one [`Gradients`] per layer, in layer order.
    pub fn backward(&self, cache: &ForwardCache, output_grad: ArrayView2<f32>) -> Result<Vec<Gradients>> {
        if cache.layers.len() != self.layers.len() {
            return Err(DqnError::dimension_mismatch(
                format!("{} cached layers", self.layers.len()),
                format!("{} cached layers", cache.layers.len()),
            ));
        }
        if output_grad.ncols() != self.output_size() {
            return Err(DqnError::dimension_mismatch(
                format!("gradient width {}", self.output_size()),
                format!("gradient width {}", output_grad.ncols()),
            ));
        }

        let mut gradients = Vec::with_capacity(self.layers.len());
        let mut current_error = output_grad.to_owned();
        for (layer, layer_cache) in self.layers.iter().zip(&cache.layers).rev() {
            let (input_error, layer_gradients) = layer.backward_batch(layer_cache, current_error.view());
            gradients.push(layer_gradients);
            current_error = input_error;
        }
        gradients.reverse();
        Ok(gradients)
    }

    /// Apply one optimizer step to every layer.
    pub fn apply_gradients<O: Optimizer + ?Sized>(
        &mut self,
        optimizer: &mut O,
        gradients: &[Gradients],
        learning_rate: f32,
    ) -> Result<()> {
        if gradients.len() != self.layers.len() {
            return Err(DqnError::dimension_mismatch(
                format!("{} gradient sets", self.layers.len()),
                format!("{} gradient sets", gradients.len()),
            ));
        }
        optimizer.step(&mut self.layers, gradients, learning_rate);
        Ok(())
    }

    /// Overwrite every parameter with a verbatim copy of `other`'s.
    pub fn copy_parameters_from(&mut self, other: &QNetwork) {
        self.layers.clone_from(&other.layers);
    }

    /// Total number of trainable scalars.
    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(|l| l.weights.len() + l.biases.len()).sum()
    }

    /// Save the network parameters to a bincode file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = bincode::serialize(self)?;
        fs::write(path, serialized)?;
        Ok(())
    }

    /// Load network parameters saved by [`QNetwork::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        let network: Self = bincode::deserialize(&data)?;
        Self::from_layers(network.layers)
    }
}

/// Index of the largest value; ties go to the lowest index.
///
/// NaN never compares greater, so an all-NaN input yields `0`.
pub fn argmax(values: ArrayView1<f32>) -> usize {
    let mut best_index = 0;
    let mut best_value = f32::NEG_INFINITY;
    for (index, &value) in values.iter().enumerate() {
        if value > best_value {
            best_index = index;
            best_value = value;
        }
    }
    best_index
}
