//! # Reinforcement Learning Agent
//!
//! [`DqnAgent`] implements a basic episodic variant of deep Q-learning:
//!
//! - **Online network**: selects actions and is updated by one gradient step
//!   after every episode.
//! - **Target network**: a hard copy of the online network, refreshed every
//!   `target_update` episodes, that supplies bootstrap targets.
//! - **Exploration**: epsilon-greedy with multiplicative decay after every
//!   episode, floored at `epsilon_min`.
//! - **Episode buffer**: every transition of one episode, used once for the
//!   update and then cleared. There is no replay memory and no minibatch
//!   sampling.
//!
//! ## Update rule
//!
//! For an episode of `N` transitions the target of transition `i` is
//! `r_i + gamma * max_a Q_target(s'_i, a)`. The bootstrap term of the last
//! transition is zeroed by position (`zero_last_bootstrap`), not by its
//! `done` flag. The loss is `sum_i (target_i - Q(s_i, a_i))^2`, so its scale
//! grows with the episode length unless `LossReduction::Mean` is selected.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use cartpole_dqn::agent::DqnAgent;
//! use cartpole_dqn::config::DqnConfig;
//! use cartpole_dqn::environment::{CartPole, Environment};
//!
//! let mut agent = DqnAgent::new(DqnConfig::default()).unwrap();
//! let mut env = CartPole::new(None);
//! let state = env.reset().unwrap();
//! let action = agent.choose_action(state.view(), &mut env).unwrap();
//! ```

mod dqn;
pub use dqn::{DqnAgent, EpisodeReport, ReplaySummary, TrainingSummary, UpdateReport};
