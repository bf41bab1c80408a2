use ndarray::{Array1, ArrayView1};
use serde::{Serialize, Deserialize};

/// Trait defining the interface for loss functions over a vector of
/// per-transition predictions.
pub trait Loss {
    /// Compute the scalar loss
    fn compute(&self, predictions: ArrayView1<f32>, targets: ArrayView1<f32>) -> f32;

    /// Gradient of the loss with respect to each prediction
    fn gradient(&self, predictions: ArrayView1<f32>, targets: ArrayView1<f32>) -> Array1<f32>;
}

/// How per-transition losses are combined into one scalar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LossReduction {
    /// Sum over the episode; the loss grows with episode length.
    #[default]
    Sum,
    /// Mean over the episode.
    Mean,
}

/// Squared temporal-difference error `(target - prediction)^2`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SquaredError {
    pub reduction: LossReduction,
}

impl SquaredError {
    pub fn new(reduction: LossReduction) -> Self {
        SquaredError { reduction }
    }

    fn scale(&self, n: usize) -> f32 {
        match self.reduction {
            LossReduction::Sum => 1.0,
            LossReduction::Mean if n == 0 => 0.0,
            LossReduction::Mean => 1.0 / n as f32,
        }
    }
}

impl Loss for SquaredError {
    fn compute(&self, predictions: ArrayView1<f32>, targets: ArrayView1<f32>) -> f32 {
        let diff = &targets - &predictions;
        diff.mapv(|x| x * x).sum() * self.scale(predictions.len())
    }

    fn gradient(&self, predictions: ArrayView1<f32>, targets: ArrayView1<f32>) -> Array1<f32> {
        let scale = 2.0 * self.scale(predictions.len());
        (&predictions - &targets) * scale
    }
}
