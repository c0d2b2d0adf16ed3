use serde::{Serialize, Deserialize};

/// Per-step training statistics emitted by `train_loop`.
///
/// `(elapsed_ms, deviation_magnitude)` is the point a deviation-over-time
/// chart plots; the loop itself never draws anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepStats {
    /// 1-based step number.
    pub iteration: usize,
    /// Total steps requested for this run.
    pub total_iterations: usize,
    /// Milliseconds since the run started, measured after this step.
    pub elapsed_ms: u64,
    /// Σ (label − prediction)² at this step's forward pass.
    pub squared_deviation: f64,
    /// √squared_deviation.
    pub deviation_magnitude: f64,
}
