use image::RgbImage;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::DqnConfig;
use crate::environment::{Environment, State, Step};
use crate::episode_buffer::{EpisodeBatch, EpisodeBuffer};
use crate::error::{DqnError, Result};
use crate::exploration::EpsilonSchedule;
use crate::export::FrameExporter;
use crate::loss::{Loss, SquaredError};
use crate::metrics::{MetricsTracker, RewardWindow};
use crate::network::{argmax, QNetwork};
use crate::optimizer::OptimizerWrapper;

/// Deep Q-Network agent trained one whole episode at a time.
///
/// Owns an online network updated by gradient descent after every episode,
/// a target network refreshed by hard copy every `target_update` episodes,
/// the optimizer and the exploration schedule.
///
/// # Example
///
/// ```rust,no_run
/// use cartpole_dqn::agent::DqnAgent;
/// use cartpole_dqn::config::DqnConfig;
/// use cartpole_dqn::environment::CartPole;
/// use cartpole_dqn::export::GifExporter;
///
/// let mut agent = DqnAgent::new(DqnConfig::default()).unwrap();
/// let mut env = CartPole::new(Some(0));
/// let summary = agent.train(&mut env).unwrap();
/// println!("converged after {} episodes: {}", summary.episodes, summary.converged);
///
/// let mut exporter = GifExporter::new("cartpole.gif");
/// agent.perform(&mut env, &mut exporter).unwrap();
/// ```
pub struct DqnAgent {
    /// Online network used for action selection and trained every episode
    pub q_network: QNetwork,

    /// Target network used for bootstrap targets
    pub target_network: QNetwork,

    optimizer: OptimizerWrapper,
    exploration: EpsilonSchedule,
    loss: SquaredError,
    config: DqnConfig,
    episodes_trained: usize,
    rng: StdRng,
}

/// Result of one gradient update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateReport {
    pub loss: f32,
    /// Bootstrapped targets, one per transition
    pub targets: Array1<f32>,
    /// Online values of the actions taken, before the update
    pub predictions: Array1<f32>,
}

/// What happened during one training episode.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeReport {
    pub episode: usize,
    pub reward: f32,
    /// Transitions stored in the buffer before it was cleared
    pub steps: usize,
    pub update: UpdateReport,
    /// Exploration rate after this episode's decay
    pub epsilon: f32,
    pub target_synced: bool,
}

/// Outcome of [`DqnAgent::train`].
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub episodes: usize,
    pub converged: bool,
    pub final_epsilon: f32,
    pub last_window_mean: Option<f32>,
    pub metrics: MetricsTracker,
}

/// Outcome of [`DqnAgent::perform`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaySummary {
    pub episode_rewards: Vec<f32>,
    pub frames: usize,
}

impl DqnAgent {
    /// Create an agent whose target network starts as a copy of the online network.
    pub fn new(config: DqnConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let q_network = QNetwork::new(&config.layer_sizes(), config.output_activation, config.weight_init, &mut rng)?;
        Self::assemble(config, q_network, rng)
    }

    /// Create an agent around an existing online network.
    pub fn with_network(config: DqnConfig, q_network: QNetwork) -> Result<Self> {
        config.validate()?;
        if q_network.input_size() != config.input_dim || q_network.output_size() != config.output_dim {
            return Err(DqnError::DimensionMismatch {
                expected: format!("{} -> {}", config.input_dim, config.output_dim),
                actual: format!("{} -> {}", q_network.input_size(), q_network.output_size()),
            });
        }
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::assemble(config, q_network, rng)
    }

    fn assemble(config: DqnConfig, q_network: QNetwork, rng: StdRng) -> Result<Self> {
        let exploration = EpsilonSchedule::new(config.epsilon_start, config.epsilon_min, config.epsilon_decay)?;
        Ok(DqnAgent {
            target_network: q_network.clone(),
            q_network,
            optimizer: OptimizerWrapper::from_config(config.optimizer),
            exploration,
            loss: SquaredError::new(config.loss_reduction),
            config,
            episodes_trained: 0,
            rng,
        })
    }

    pub fn config(&self) -> &DqnConfig {
        &self.config
    }

    pub fn epsilon(&self) -> f32 {
        self.exploration.epsilon()
    }

    /// Override the exploration rate; clamped to `[epsilon_min, 1]`.
    pub fn set_epsilon(&mut self, epsilon: f32) {
        self.exploration.set_epsilon(epsilon);
    }

    pub fn episodes_trained(&self) -> usize {
        self.episodes_trained
    }

    /// Epsilon-greedy action: a sampled action with probability epsilon,
    /// otherwise the greedy action. The network is not evaluated on the
    /// random branch.
    pub fn choose_action<E: Environment + ?Sized>(&mut self, state: ArrayView1<f32>, env: &mut E) -> Result<usize> {
        if self.rng.gen::<f32>() < self.exploration.epsilon() {
            Ok(env.sample_action())
        } else {
            self.choose_action_perform(state)
        }
    }

    /// Greedy action of the online network; ties go to the lowest index.
    pub fn choose_action_perform(&self, state: ArrayView1<f32>) -> Result<usize> {
        let q_values = self.q_network.forward(state)?;
        Ok(argmax(q_values.view()))
    }

    /// Bootstrapped targets `reward + gamma * max_a Q_target(next_state, a)`.
    ///
    /// With `zero_last_bootstrap` the bootstrap term of the final row is zero
    /// regardless of its `done` flag; with `bootstrap_on_done` every row
    /// flagged done gets a zero bootstrap term too.
    pub fn compute_targets(&self, batch: &EpisodeBatch) -> Result<Array1<f32>> {
        if batch.is_empty() {
            return Ok(Array1::zeros(0));
        }
        let next_q = self.target_network.forward_batch(batch.next_states.view())?;
        let mut bootstrap = next_q.map_axis(Axis(1), |row| row.fold(f32::NEG_INFINITY, |max, &v| max.max(v)));

        if self.config.bootstrap_on_done {
            bootstrap.zip_mut_with(&batch.dones, |b, &done| {
                if done > 0.5 {
                    *b = 0.0;
                }
            });
        }
        if self.config.zero_last_bootstrap {
            let last = bootstrap.len() - 1;
            bootstrap[last] = 0.0;
        }

        Ok(&batch.rewards + &(bootstrap * self.config.gamma))
    }

    /// One gradient step of the online network on a whole episode.
    pub fn update(&mut self, batch: &EpisodeBatch) -> Result<UpdateReport> {
        if batch.is_empty() {
            return Err(DqnError::EmptyBuffer("no transitions to train on".to_string()));
        }
        let num_actions = self.q_network.output_size();
        if let Some(&action) = batch.actions.iter().find(|&&a| a >= num_actions) {
            return Err(DqnError::InvalidAction { action, max_actions: num_actions });
        }

        let targets = self.compute_targets(batch)?;
        let (outputs, cache) = self.q_network.forward_train(batch.states.view())?;
        let predictions: Array1<f32> = batch
            .actions
            .iter()
            .enumerate()
            .map(|(i, &action)| outputs[[i, action]])
            .collect();

        let loss = self.loss.compute(predictions.view(), targets.view());
        if !loss.is_finite() {
            warn!(loss, episode = self.episodes_trained, "non-finite loss");
            if self.config.abort_on_non_finite_loss {
                return Err(DqnError::NumericalError(format!(
                    "loss became {} after {} episodes",
                    loss, self.episodes_trained
                )));
            }
        }

        // Only the taken action's output receives a gradient.
        let prediction_grad = self.loss.gradient(predictions.view(), targets.view());
        let mut output_grad = Array2::zeros(outputs.dim());
        for (i, (&action, &grad)) in batch.actions.iter().zip(prediction_grad.iter()).enumerate() {
            output_grad[[i, action]] = grad;
        }

        let gradients = self.q_network.backward(&cache, output_grad.view())?;
        self.q_network
            .apply_gradients(&mut self.optimizer, &gradients, self.config.learning_rate)?;

        Ok(UpdateReport { loss, targets, predictions })
    }

    /// Hard copy of the online parameters into the target network.
    pub fn sync_target(&mut self) {
        self.target_network.copy_parameters_from(&self.q_network);
    }

    fn check_observation(&self, state: &State) -> Result<()> {
        if state.len() != self.config.input_dim {
            return Err(DqnError::DimensionMismatch {
                expected: format!("observation of length {}", self.config.input_dim),
                actual: format!("observation of length {}", state.len()),
            });
        }
        Ok(())
    }

    fn check_step(&self, step: &Step) -> Result<()> {
        self.check_observation(&step.next_state)?;
        if !step.reward.is_finite() {
            return Err(DqnError::NumericalError(format!(
                "environment returned reward {}",
                step.reward
            )));
        }
        Ok(())
    }

    /// Play one episode with epsilon-greedy actions, storing every transition.
    /// Returns the episode reward.
    pub fn collect_episode<E: Environment + ?Sized>(&mut self, env: &mut E, buffer: &mut EpisodeBuffer) -> Result<f32> {
        let mut state = env.reset()?;
        self.check_observation(&state)?;
        let mut episode_reward = 0.0;

        loop {
            let action = self.choose_action(state.view(), env)?;
            let step = env.step(action)?;
            self.check_step(&step)?;

            episode_reward += step.reward;
            buffer.store(state, step.next_state.clone(), action, step.reward, step.done);
            state = step.next_state;

            if step.done {
                return Ok(episode_reward);
            }
        }
    }

    /// Collect an episode, update on it, clear the buffer, decay epsilon and
    /// sync the target network when the episode count hits the interval.
    pub fn train_episode<E: Environment + ?Sized>(&mut self, env: &mut E, buffer: &mut EpisodeBuffer) -> Result<EpisodeReport> {
        let reward = self.collect_episode(env, buffer)?;
        let batch = buffer.get()?;
        let steps = buffer.len();
        buffer.clear();

        let update = self.update(&batch)?;
        let epsilon = self.exploration.decay();

        self.episodes_trained += 1;
        let target_synced = self.episodes_trained % self.config.target_update == 0;
        if target_synced {
            self.sync_target();
            debug!(episode = self.episodes_trained, "target network synced");
        }

        debug!(
            episode = self.episodes_trained,
            reward,
            steps,
            loss = update.loss,
            epsilon,
            "episode finished"
        );

        Ok(EpisodeReport {
            episode: self.episodes_trained,
            reward,
            steps,
            update,
            epsilon,
            target_synced,
        })
    }

    /// Train until a reward window's mean exceeds `success_threshold`, or
    /// until `max_episodes` when set.
    pub fn train<E: Environment + ?Sized>(&mut self, env: &mut E) -> Result<TrainingSummary> {
        let mut buffer = EpisodeBuffer::new();
        let mut window = RewardWindow::new(self.config.reward_window);
        let mut metrics = MetricsTracker::default();
        let mut last_window_mean = None;
        let mut converged = false;
        let mut episodes = 0;

        info!(
            parameters = self.q_network.parameter_count(),
            epsilon = self.epsilon(),
            "starting training"
        );

        loop {
            if self.config.max_episodes.is_some_and(|max| episodes >= max) {
                info!(episodes, "episode limit reached without convergence");
                break;
            }

            let report = self.train_episode(env, &mut buffer)?;
            episodes += 1;
            metrics.record_episode(report.reward, report.steps, report.update.loss, report.epsilon);

            if let Some(mean) = window.push(report.reward) {
                metrics.record_window_mean(mean);
                last_window_mean = Some(mean);
                info!(episode = report.episode, mean_reward = mean, epsilon = report.epsilon, "reward window complete");
                if mean > self.config.success_threshold {
                    info!(episode = report.episode, mean_reward = mean, "solved");
                    converged = true;
                    break;
                }
            }
        }

        Ok(TrainingSummary {
            episodes,
            converged,
            final_epsilon: self.epsilon(),
            last_window_mean,
            metrics,
        })
    }

    /// Replay `replay_episodes` greedy episodes, render every step and hand
    /// the frames to `exporter`. The environment is closed afterwards, also
    /// when the replay fails; the replay error then takes precedence.
    pub fn perform<E, X>(&self, env: &mut E, exporter: &mut X) -> Result<ReplaySummary>
    where
        E: Environment + ?Sized,
        X: FrameExporter + ?Sized,
    {
        let replay = self.replay(env, exporter);
        let closed = env.close();
        let summary = replay?;
        closed?;
        Ok(summary)
    }

    fn replay<E, X>(&self, env: &mut E, exporter: &mut X) -> Result<ReplaySummary>
    where
        E: Environment + ?Sized,
        X: FrameExporter + ?Sized,
    {
        let mut frames: Vec<RgbImage> = Vec::new();
        let mut episode_rewards = Vec::with_capacity(self.config.replay_episodes);

        for episode in 0..self.config.replay_episodes {
            let mut state = env.reset()?;
            self.check_observation(&state)?;
            let mut episode_reward = 0.0;
            loop {
                let action = self.choose_action_perform(state.view())?;
                let step = env.step(action)?;
                self.check_step(&step)?;
                episode_reward += step.reward;
                if let Some(frame) = env.render() {
                    frames.push(frame);
                }
                state = step.next_state;
                if step.done {
                    break;
                }
            }
            info!(episode, reward = episode_reward, "replay episode finished");
            episode_rewards.push(episode_reward);
        }

        if !frames.is_empty() {
            exporter.export(&frames)?;
        }

        Ok(ReplaySummary { episode_rewards, frames: frames.len() })
    }

    /// Save the online network as a bincode checkpoint.
    pub fn save_network<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.q_network.save(path)
    }

    /// Load a checkpoint into both the online and the target network.
    pub fn load_network<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let network = QNetwork::load(path)?;
        if network.input_size() != self.config.input_dim || network.output_size() != self.config.output_dim {
            return Err(DqnError::DimensionMismatch {
                expected: format!("{} -> {}", self.config.input_dim, self.config.output_dim),
                actual: format!("{} -> {}", network.input_size(), network.output_size()),
            });
        }
        self.q_network = network;
        self.sync_target();
        Ok(())
    }
}
