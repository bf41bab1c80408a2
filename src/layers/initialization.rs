use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::Uniform;
use serde::{Serialize, Deserialize};

use crate::error::{DqnError, Result};

/// Weight initialization strategies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum WeightInit {
    /// Uniform in `±1/sqrt(fan_in)` for weights and biases, the default of a
    /// PyTorch `nn.Linear` layer.
    #[default]
    FanInUniform,

    /// Xavier/Glorot uniform initialization, zero biases
    XavierUniform,

    /// Uniform distribution with custom range for weights, zero biases
    Uniform { min: f32, max: f32 },

    /// All zeros
    Zeros,
}

impl WeightInit {
    /// Initialize weights of shape `(fan_in, fan_out)`
    pub fn initialize_weights<R: Rng + ?Sized>(&self, shape: (usize, usize), rng: &mut R) -> Result<Array2<f32>> {
        let (fan_in, fan_out) = shape;

        match *self {
            WeightInit::FanInUniform => {
                let limit = fan_in_limit(fan_in)?;
                Ok(Array2::random_using(shape, Uniform::new_inclusive(-limit, limit), rng))
            }

            WeightInit::XavierUniform => {
                if fan_in + fan_out == 0 {
                    return Err(DqnError::invalid_parameter("weight_init", "Xavier initialization needs a non-empty layer"));
                }
                let limit = (6.0 / (fan_in + fan_out) as f32).sqrt();
                Ok(Array2::random_using(shape, Uniform::new_inclusive(-limit, limit), rng))
            }

            WeightInit::Uniform { min, max } => {
                if !(min < max) {
                    return Err(DqnError::InvalidParameter {
                        name: "weight_init".to_string(),
                        reason: format!("uniform range [{}, {}) is empty", min, max),
                    });
                }
                Ok(Array2::random_using(shape, Uniform::new(min, max), rng))
            }

            WeightInit::Zeros => Ok(Array2::zeros(shape)),
        }
    }

    /// Initialize biases for a layer with `fan_in` inputs and `size` outputs
    pub fn initialize_biases<R: Rng + ?Sized>(&self, fan_in: usize, size: usize, rng: &mut R) -> Result<Array1<f32>> {
        match self {
            WeightInit::FanInUniform => {
                let limit = fan_in_limit(fan_in)?;
                Ok(Array1::random_using(size, Uniform::new_inclusive(-limit, limit), rng))
            }
            WeightInit::XavierUniform | WeightInit::Uniform { .. } | WeightInit::Zeros => {
                Ok(Array1::zeros(size))
            }
        }
    }
}

fn fan_in_limit(fan_in: usize) -> Result<f32> {
    if fan_in == 0 {
        return Err(DqnError::invalid_parameter("weight_init", "fan-in must be positive"));
    }
    Ok(1.0 / (fan_in as f32).sqrt())
}
