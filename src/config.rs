use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::network::spec::NetworkSpec;
use crate::train::train_config::TrainingSpec;

/// Everything a training run reads from its JSON config file.
///
/// ```json
/// { "network":  { "widths": [4, 4, 4], "learning_rate": 0.5 },
///   "training": { "iterations": 100, "log_every": 10, "interval_ms": 0 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub network: NetworkSpec,
    pub training: TrainingSpec,
}

impl RunConfig {
    /// Deserializes a `RunConfig` from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<RunConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
