//! Command-line driver: loads a run config, builds the network and calls
//! `train_step` in a loop, logging the deviation as it shrinks.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use delta_nn::{train_loop, Network, RunConfig, TrainConfig};

#[derive(Parser)]
#[command(name = "delta-nn")]
#[command(about = "Train a small feedforward network on a single sample", long_about = None)]
struct Cli {
    /// JSON run config; defaults to the 4-4-4 sigmoid demo
    #[arg(short, long)]
    config: Option<String>,

    /// Override the number of training steps
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Override the learning rate
    #[arg(short, long)]
    learning_rate: Option<f64>,

    /// Pause between steps, in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Seed for weight initialisation
    #[arg(long)]
    seed: Option<u64>,

    /// Verbosity level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Level {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::from(cli.log_level))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut run = match &cli.config {
        Some(path) => RunConfig::load_json(path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => RunConfig::default(),
    };
    if let Some(rate) = cli.learning_rate {
        run.network.learning_rate = rate;
    }
    if let Some(seed) = cli.seed {
        run.network.seed = Some(seed);
    }
    if let Some(iterations) = cli.iterations {
        run.training.iterations = iterations;
    }

    let mut network = Network::from_spec(&run.network).context("failed to build network")?;
    info!(
        widths = ?run.network.widths,
        activator = ?run.network.activator,
        learning_rate = network.learning_rate(),
        "network ready"
    );

    let mut config = TrainConfig::from_spec(&run.training);
    if let Some(ms) = cli.interval_ms {
        config.interval = (ms > 0).then(|| Duration::from_millis(ms));
    }
    let last = train_loop(&mut network, &config)?;

    network.forward()?;
    println!("label:      {:?}", network.label());
    println!("prediction: {:?}", network.prediction().unwrap_or_default());
    println!("deviation:  {:.6}", network.squared_deviation().unwrap_or_default());
    match last {
        Some(last) => println!("last step:  {last:.6}"),
        None => println!("last step:  none (stopped before the first step)"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_parses_known_values() {
        let cli = Cli::try_parse_from(["delta-nn", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(Level::from(cli.log_level), Level::DEBUG);
        let cli = Cli::try_parse_from(["delta-nn"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Info);
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        assert!(Cli::try_parse_from(["delta-nn", "--log-level", "verbose"]).is_err());
    }
}
