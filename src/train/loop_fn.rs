use std::sync::atomic::Ordering;
use std::thread;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::{NnError, Result};
use crate::loss::SquaredDeviation;
use crate::network::network::Network;
use crate::train::step_stats::StepStats;
use crate::train::train_config::TrainConfig;

/// Calls `network.train_step()` up to `config.iterations` times and returns
/// the squared deviation seen by the **last completed step**, or `None` when
/// no step ran.
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
///
/// # Errors
/// `InvalidConfig` when `iterations == 0`; any error from `train_step`.
pub fn train_loop(network: &mut Network, config: &TrainConfig) -> Result<Option<f64>> {
    if config.iterations == 0 {
        return Err(NnError::InvalidConfig("iterations must be at least 1".into()));
    }

    let start = Instant::now();
    let mut last_deviation = None;
    let mut completed = 0;

    for iteration in 1..=config.iterations {
        if stop_requested(config) {
            debug!(iteration, "stop flag set");
            break;
        }

        let squared_deviation = network.train_step()?;
        last_deviation = Some(squared_deviation);
        completed = iteration;

        let stats = StepStats {
            iteration,
            total_iterations: config.iterations,
            elapsed_ms: start.elapsed().as_millis() as u64,
            squared_deviation,
            deviation_magnitude: SquaredDeviation::magnitude_of(squared_deviation),
        };

        if config.log_every > 0 && iteration % config.log_every == 0 {
            info!(
                iteration,
                deviation = stats.deviation_magnitude,
                elapsed_ms = stats.elapsed_ms,
                "training"
            );
        }

        if let Some(ref tx) = config.progress_tx {
            if tx.send(stats).is_err() {
                debug!(iteration, "progress receiver dropped");
                break;
            }
        }

        if let Some(interval) = config.interval {
            if iteration < config.iterations {
                thread::sleep(interval);
            }
        }
    }

    info!(
        iterations = completed,
        squared_deviation = ?last_deviation,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "training finished"
    );
    Ok(last_deviation)
}

fn stop_requested(config: &TrainConfig) -> bool {
    config.stop_flag
        .as_ref()
        .map(|flag| flag.load(Ordering::Relaxed))
        .unwrap_or(false)
}
