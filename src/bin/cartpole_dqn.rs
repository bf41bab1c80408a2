//! Train a DQN agent on CartPole, then replay the learned policy into a GIF.

use anyhow::{Context, Result};
use cartpole_dqn::agent::DqnAgent;
use cartpole_dqn::config::DqnConfig;
use cartpole_dqn::environment::CartPole;
use cartpole_dqn::export::GifExporter;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file with agent hyperparameters; missing fields use defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the agent and the environment.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Stop training after this many episodes even if unsolved.
    #[arg(long)]
    max_episodes: Option<usize>,

    /// Where the replay animation is written.
    #[arg(long, default_value = "cartpole.gif")]
    gif: PathBuf,

    /// Save the trained online network to this path.
    #[arg(long)]
    save_model: Option<PathBuf>,

    /// Write the training history as JSON to this path.
    #[arg(long)]
    metrics: Option<PathBuf>,

    /// Skip the replay phase.
    #[arg(long)]
    no_replay: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DqnConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => DqnConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.max_episodes.is_some() {
        config.max_episodes = args.max_episodes;
    }

    let mut agent = DqnAgent::new(config.clone()).context("failed to build agent")?;
    let mut env = CartPole::new(config.seed);

    let summary = agent.train(&mut env).context("training failed")?;
    tracing::info!(
        episodes = summary.episodes,
        converged = summary.converged,
        epsilon = summary.final_epsilon,
        "training finished"
    );

    if let Some(path) = &args.metrics {
        summary
            .metrics
            .save(path)
            .with_context(|| format!("failed to write metrics to {}", path.display()))?;
    }
    if let Some(path) = &args.save_model {
        agent
            .save_network(path)
            .with_context(|| format!("failed to save model to {}", path.display()))?;
        tracing::info!(path = %path.display(), "saved online network");
    }

    if !args.no_replay {
        let mut exporter = GifExporter::new(&args.gif);
        let replay = agent.perform(&mut env, &mut exporter).context("replay failed")?;
        tracing::info!(rewards = ?replay.episode_rewards, frames = replay.frames, "replay finished");
    }

    Ok(())
}
