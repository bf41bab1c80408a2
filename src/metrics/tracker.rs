use std::collections::VecDeque;
use std::path::Path;
use serde::{Serialize, Deserialize};

/// Per-episode training history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Reward collected in each episode
    pub episode_rewards: VecDeque<f32>,

    /// Steps taken in each episode
    pub episode_lengths: VecDeque<usize>,

    /// Loss of the update that followed each episode
    pub losses: VecDeque<f32>,

    /// Exploration rate after each episode's decay
    pub epsilons: VecDeque<f32>,

    /// Mean reward of every completed reward window
    pub window_means: Vec<f32>,
}

/// Tracks metrics during training, keeping at most `history_size` entries
/// per series.
#[derive(Debug, Clone)]
pub struct MetricsTracker {
    metrics: TrainingMetrics,
    history_size: usize,
    episode_count: usize,
    total_steps: usize,
}

fn push_bounded<T>(series: &mut VecDeque<T>, value: T, limit: usize) {
    if series.len() >= limit {
        series.pop_front();
    }
    series.push_back(value);
}

impl MetricsTracker {
    pub fn new(history_size: usize) -> Self {
        MetricsTracker {
            metrics: TrainingMetrics::default(),
            history_size: history_size.max(1),
            episode_count: 0,
            total_steps: 0,
        }
    }

    /// Record a finished training episode
    pub fn record_episode(&mut self, reward: f32, length: usize, loss: f32, epsilon: f32) {
        push_bounded(&mut self.metrics.episode_rewards, reward, self.history_size);
        push_bounded(&mut self.metrics.episode_lengths, length, self.history_size);
        push_bounded(&mut self.metrics.losses, loss, self.history_size);
        push_bounded(&mut self.metrics.epsilons, epsilon, self.history_size);
        self.episode_count += 1;
        self.total_steps += length;
    }

    /// Record the mean of a completed reward window
    pub fn record_window_mean(&mut self, mean: f32) {
        self.metrics.window_means.push(mean);
    }

    pub fn metrics(&self) -> &TrainingMetrics {
        &self.metrics
    }

    pub fn episode_count(&self) -> usize {
        self.episode_count
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Mean reward over the most recent `window` episodes
    pub fn avg_episode_reward(&self, window: usize) -> Option<f32> {
        if self.metrics.episode_rewards.is_empty() || window == 0 {
            return None;
        }

        let n = window.min(self.metrics.episode_rewards.len());
        let sum: f32 = self.metrics.episode_rewards.iter().rev().take(n).sum();
        Some(sum / n as f32)
    }

    /// Save metrics to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::error::Result<()> {
        let serialized = serde_json::to_string_pretty(&self.metrics)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    /// Load metrics saved by [`MetricsTracker::save`].
    ///
    /// Episode and step counts are recomputed from the loaded history.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> crate::error::Result<()> {
        let data = std::fs::read_to_string(path)?;
        self.metrics = serde_json::from_str(&data)?;
        self.episode_count = self.metrics.episode_lengths.len();
        self.total_steps = self.metrics.episode_lengths.iter().sum();
        Ok(())
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new(1000)
    }
}

/// Tumbling window over episode rewards.
///
/// Each window covers `size` consecutive episodes and is evaluated once,
/// when its last episode is pushed; the accumulator then starts over.
/// Incomplete windows are never averaged.
#[derive(Debug, Clone)]
pub struct RewardWindow {
    size: usize,
    sum: f32,
    count: usize,
}

impl RewardWindow {
    pub fn new(size: usize) -> Self {
        RewardWindow { size: size.max(1), sum: 0.0, count: 0 }
    }

    /// Add one episode's reward; returns the window mean when this completes a window.
    pub fn push(&mut self, reward: f32) -> Option<f32> {
        self.sum += reward;
        self.count += 1;
        if self.count < self.size {
            return None;
        }
        let mean = self.sum / self.size as f32;
        self.sum = 0.0;
        self.count = 0;
        Some(mean)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Episodes collected in the current, incomplete window
    pub fn pending(&self) -> usize {
        self.count
    }
}
