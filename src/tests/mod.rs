// Test modules for all components
pub mod test_activations;
pub mod test_config;
pub mod test_environment;

use image::RgbImage;
use ndarray::array;

use crate::environment::{Environment, State, Step};
use crate::error::Result;

/// Deterministic environment: every episode lasts `length` steps, every
/// reward is `1.0`, and the observation drifts linearly with the step index.
pub struct FixedEpisodeEnv {
    pub length: usize,
    pub t: usize,
    pub sampled: usize,
    pub closed: bool,
    pub renders: usize,
}

impl FixedEpisodeEnv {
    pub fn new(length: usize) -> Self {
        FixedEpisodeEnv { length, t: 0, sampled: 0, closed: false, renders: 0 }
    }

    fn observation(&self) -> State {
        let t = self.t as f32 * 0.1;
        array![t, 0.5 * t, -0.5 * t, 1.0]
    }
}

impl Environment for FixedEpisodeEnv {
    fn observation_dim(&self) -> usize {
        4
    }

    fn action_count(&self) -> usize {
        2
    }

    fn reset(&mut self) -> Result<State> {
        self.t = 0;
        Ok(self.observation())
    }

    fn step(&mut self, _action: usize) -> Result<Step> {
        self.t += 1;
        Ok(Step { next_state: self.observation(), reward: 1.0, done: self.t >= self.length })
    }

    fn sample_action(&mut self) -> usize {
        self.sampled += 1;
        self.sampled % 2
    }

    fn render(&mut self) -> Option<RgbImage> {
        self.renders += 1;
        Some(RgbImage::new(8, 6))
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
