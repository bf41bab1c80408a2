pub mod tracker;

pub use tracker::{MetricsTracker, RewardWindow, TrainingMetrics};
