use serde::{Serialize, Deserialize};

use crate::error::{DqnError, Result};

/// Epsilon-greedy exploration rate with multiplicative per-episode decay.
///
/// Decay never increases the rate and never takes it below `min`.
/// [`EpsilonSchedule::set_epsilon`] is an explicit override for replay and
/// tests and may raise it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpsilonSchedule {
    epsilon: f32,
    min: f32,
    decay: f32,
}

impl EpsilonSchedule {
    pub fn new(start: f32, min: f32, decay: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&start) || !(0.0..=1.0).contains(&min) {
            return Err(DqnError::InvalidParameter {
                name: "epsilon".to_string(),
                reason: format!("start {} and floor {} must lie in [0, 1]", start, min),
            });
        }
        if min > start {
            return Err(DqnError::InvalidParameter {
                name: "epsilon_min".to_string(),
                reason: format!("floor {} exceeds starting rate {}", min, start),
            });
        }
        if !(decay > 0.0 && decay <= 1.0) {
            return Err(DqnError::InvalidParameter {
                name: "epsilon_decay".to_string(),
                reason: format!("decay {} must lie in (0, 1]", decay),
            });
        }
        Ok(EpsilonSchedule { epsilon: start, min, decay })
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    /// Decay once, as done after every training episode.
    pub fn decay(&mut self) -> f32 {
        if self.epsilon > self.min {
            self.epsilon = (self.epsilon * self.decay).max(self.min);
        }
        self.epsilon
    }

    /// Override the current rate, clamped to `[min, 1]`. Unlike [`EpsilonSchedule::decay`]
    /// this can raise the rate.
    pub fn set_epsilon(&mut self, epsilon: f32) {
        self.epsilon = epsilon.clamp(self.min, 1.0);
    }
}
