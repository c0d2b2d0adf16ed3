use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};
use std::time::Duration;

use serde::{Serialize, Deserialize};

use crate::train::step_stats::StepStats;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `iterations`  — number of `train_step` calls
/// - `log_every`   — emit an `info!` line every this many steps; `0` logs only
///                   the summary
/// - `interval`    — optional pause between steps, for callers that want to
///                   watch the deviation move in real time
/// - `progress_tx` — optional channel sender; one `StepStats` is sent per
///                   completed step.  If the receiver is dropped the loop
///                   terminates early.
/// - `stop_flag`   — optional atomic flag; when set to `true` from another
///                   thread the loop terminates before the next step.
pub struct TrainConfig {
    pub iterations: usize,
    pub log_every: usize,
    pub interval: Option<Duration>,
    pub progress_tx: Option<mpsc::Sender<StepStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig` with no pacing, channel or stop flag.
    pub fn new(iterations: usize) -> Self {
        TrainConfig {
            iterations,
            log_every: 0,
            interval: None,
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub fn from_spec(spec: &TrainingSpec) -> Self {
        TrainConfig {
            iterations: spec.iterations,
            log_every: spec.log_every,
            interval: (spec.interval_ms > 0).then(|| Duration::from_millis(spec.interval_ms)),
            progress_tx: None,
            stop_flag: None,
        }
    }
}

/// The serialisable part of a `TrainConfig`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingSpec {
    pub iterations: usize,
    pub log_every: usize,
    pub interval_ms: u64,
}

impl Default for TrainingSpec {
    fn default() -> Self {
        TrainingSpec {
            iterations: 100,
            log_every: 10,
            interval_ms: 0,
        }
    }
}
