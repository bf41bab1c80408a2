//! Immutable hyperparameters of a DQN agent.

use serde::{Serialize, Deserialize};
use std::path::Path;

use crate::activations::Activation;
use crate::error::{DqnError, Result};
use crate::layers::WeightInit;
use crate::loss::LossReduction;
use crate::optimizer::OptimizerConfig;

/// Agent configuration. Defaults reproduce the reference CartPole setup.
///
/// Fields missing from a JSON file take their default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DqnConfig {
    /// Observation dimension
    pub input_dim: usize,

    /// Number of discrete actions
    pub output_dim: usize,

    /// Hidden layer widths
    pub hidden_sizes: Vec<usize>,

    /// Activation after the output layer. `Relu` forces every action-value
    /// to be non-negative; `Linear` is the conventional choice.
    pub output_activation: Activation,

    pub weight_init: WeightInit,

    pub epsilon_start: f32,
    pub epsilon_min: f32,
    pub epsilon_decay: f32,

    /// Discount factor
    pub gamma: f32,

    pub learning_rate: f32,

    pub optimizer: OptimizerConfig,

    /// Episodes between hard copies of the online network into the target network
    pub target_update: usize,

    /// Episodes per reward window
    pub reward_window: usize,

    /// Training stops once a window's mean reward exceeds this
    pub success_threshold: f32,

    /// Force the bootstrap term of the last transition of every episode to zero,
    /// whatever its `done` flag says
    pub zero_last_bootstrap: bool,

    /// Also zero the bootstrap term of every transition flagged `done`
    pub bootstrap_on_done: bool,

    pub loss_reduction: LossReduction,

    /// Stop after this many episodes even without convergence
    pub max_episodes: Option<usize>,

    /// Return an error instead of continuing when the loss is not finite
    pub abort_on_non_finite_loss: bool,

    /// Episodes run by performance replay
    pub replay_episodes: usize,

    /// Seed for weight initialization and exploration
    pub seed: Option<u64>,
}

impl Default for DqnConfig {
    fn default() -> Self {
        DqnConfig {
            input_dim: 4,
            output_dim: 2,
            hidden_sizes: vec![255, 120],
            output_activation: Activation::Relu,
            weight_init: WeightInit::FanInUniform,
            epsilon_start: 1.0,
            epsilon_min: 0.01,
            epsilon_decay: 0.999,
            gamma: 0.999,
            learning_rate: 1e-3,
            optimizer: OptimizerConfig::default(),
            target_update: 10,
            reward_window: 100,
            success_threshold: 197.0,
            zero_last_bootstrap: true,
            bootstrap_on_done: false,
            loss_reduction: LossReduction::Sum,
            max_episodes: None,
            abort_on_non_finite_loss: false,
            replay_episodes: 3,
            seed: None,
        }
    }
}

impl DqnConfig {
    /// Full layer sizes, input and output included.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden_sizes.len() + 2);
        sizes.push(self.input_dim);
        sizes.extend_from_slice(&self.hidden_sizes);
        sizes.push(self.output_dim);
        sizes
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_dim == 0 || self.output_dim == 0 || self.hidden_sizes.contains(&0) {
            return Err(DqnError::invalid_parameter("layer sizes", "every layer needs at least one unit"));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(DqnError::InvalidParameter {
                name: "gamma".to_string(),
                reason: format!("{} is outside [0, 1]", self.gamma),
            });
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(DqnError::InvalidParameter {
                name: "learning_rate".to_string(),
                reason: format!("{} must be positive and finite", self.learning_rate),
            });
        }
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return Err(DqnError::InvalidParameter {
                name: "epsilon_decay".to_string(),
                reason: format!("{} is outside (0, 1]", self.epsilon_decay),
            });
        }
        if self.epsilon_min > self.epsilon_start {
            return Err(DqnError::InvalidParameter {
                name: "epsilon_min".to_string(),
                reason: format!("{} exceeds epsilon_start {}", self.epsilon_min, self.epsilon_start),
            });
        }
        if self.target_update == 0 {
            return Err(DqnError::invalid_parameter("target_update", "must be at least 1"));
        }
        if !self.success_threshold.is_finite() {
            return Err(DqnError::InvalidParameter {
                name: "success_threshold".to_string(),
                reason: format!("{} is not finite", self.success_threshold),
            });
        }
        if self.reward_window == 0 {
            return Err(DqnError::invalid_parameter("reward_window", "must be at least 1"));
        }
        Ok(())
    }

    /// Read a JSON configuration file and validate it.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: DqnConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
