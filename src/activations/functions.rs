use ndarray::{Array1, Array2, ArrayView2};
use serde::{Serialize, Deserialize};

/// The activation functions a dense layer of the value network can apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Activation {
    #[default]
    Relu,
    Linear,
}

impl Activation {
    /// Apply the activation function to an input array in-place.
    pub fn apply(&self, input: &mut Array1<f32>) {
        match self {
            Activation::Relu => {
                input.mapv_inplace(|v| v.max(0.0));
            }
            Activation::Linear => {}
        }
    }

    /// Apply the activation function to a batch of input arrays in-place.
    pub fn apply_batch(&self, inputs: &mut Array2<f32>) {
        match self {
            Activation::Relu => {
                inputs.mapv_inplace(|v| v.max(0.0));
            }
            Activation::Linear => {}
        }
    }

    /// Compute the derivative of the activation function for a batch of
    /// pre-activation values.
    ///
    /// The ReLU derivative at exactly zero is taken as zero.
    pub fn derivative_batch(&self, inputs: ArrayView2<f32>) -> Array2<f32> {
        match self {
            Activation::Relu => {
                inputs.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 })
            }
            Activation::Linear => {
                Array2::ones(inputs.dim())
            }
        }
    }
}
