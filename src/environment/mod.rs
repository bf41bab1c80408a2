//! # Environment Adapter
//!
//! The agent drives any type implementing [`Environment`]. A CartPole
//! implementation is bundled in [`cartpole`].

pub mod cartpole;

use image::RgbImage;
use ndarray::Array1;

use crate::error::Result;

pub use cartpole::CartPole;

/// Observation vector.
pub type State = Array1<f32>;

/// Outcome of one [`Environment::step`].
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub next_state: State,
    pub reward: f32,
    pub done: bool,
}

/// Episodic environment with a discrete action space.
pub trait Environment {
    /// Length of the observation vectors returned by `reset` and `step`.
    fn observation_dim(&self) -> usize;

    /// Number of discrete actions; valid actions are `0..action_count()`.
    fn action_count(&self) -> usize;

    /// Start a new episode and return its first observation.
    fn reset(&mut self) -> Result<State>;

    /// Advance the current episode by one action.
    fn step(&mut self, action: usize) -> Result<Step>;

    /// Draw a uniformly random valid action.
    fn sample_action(&mut self) -> usize;

    /// Render the current state as an RGB frame, if the environment can.
    fn render(&mut self) -> Option<RgbImage> {
        None
    }

    /// Release the environment's resources.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
