//! # cartpole_dqn - Episodic Deep Q-Learning for CartPole
//!
//! Trains an action-value network on the cart-pole balancing task with a
//! basic variant of deep Q-learning, then replays the learned policy and
//! exports the rendered frames as an animated GIF.
//!
//! The training loop collects one full episode, computes one aggregate loss
//! over it and takes one gradient step per episode. An online network is
//! trained; a target network, hard-copied from it every few episodes,
//! provides the bootstrap targets.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cartpole_dqn::agent::DqnAgent;
//! use cartpole_dqn::config::DqnConfig;
//! use cartpole_dqn::environment::CartPole;
//! use cartpole_dqn::export::GifExporter;
//!
//! let config = DqnConfig { max_episodes: Some(500), ..DqnConfig::default() };
//! let mut agent = DqnAgent::new(config).unwrap();
//! let mut env = CartPole::new(Some(7));
//!
//! let summary = agent.train(&mut env).unwrap();
//! let replay = agent.perform(&mut env, &mut GifExporter::new("cartpole.gif")).unwrap();
//! println!("{} episodes, replay rewards {:?}", summary.episodes, replay.episode_rewards);
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Activation functions (ReLU, Linear)
//! - [`agent`] - The DQN agent: action selection, update rule, training loop, replay
//! - [`config`] - Immutable hyperparameter configuration
//! - [`environment`] - Environment trait and the CartPole implementation
//! - [`episode_buffer`] - Per-episode transition storage
//! - [`error`] - Error types and result handling
//! - [`exploration`] - Epsilon decay schedule
//! - [`export`] - Frame exporters (GIF)
//! - [`layers`] - Dense layers and weight initialization
//! - [`loss`] - Squared TD error with sum or mean reduction
//! - [`metrics`] - Training history and reward windows
//! - [`network`] - The action-value network
//! - [`optimizer`] - SGD and Adam

pub mod activations;
pub mod agent;
pub mod config;
pub mod environment;
pub mod episode_buffer;
pub mod error;
pub mod exploration;
pub mod export;
pub mod layers;
pub mod loss;
pub mod metrics;
pub mod network;
pub mod optimizer;

#[cfg(test)]
mod tests;
