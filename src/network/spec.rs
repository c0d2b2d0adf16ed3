use serde::{Serialize, Deserialize};

use crate::activation::Activator;

/// Describes a network and its single training pair.
///
/// Fields:
/// - `widths`        — units per layer, input side first. Layer `i` maps
///                     `widths[i - 1] → widths[i]`; layer 0 maps
///                     `widths[0] → widths[0]`
/// - `activator`     — activation shared by every layer
/// - `sample`        — training input, length `widths[0]`
/// - `label`         — training target, length of the last width
/// - `learning_rate` — gradient step size
/// - `seed`          — optional RNG seed for reproducible initialisation
///
/// Missing JSON fields fall back to [`NetworkSpec::default`], the 4-4-4 demo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSpec {
    pub widths: Vec<usize>,
    pub activator: Activator,
    pub sample: Vec<f64>,
    pub label: Vec<f64>,
    pub learning_rate: f64,
    pub seed: Option<u64>,
}

impl Default for NetworkSpec {
    fn default() -> Self {
        NetworkSpec {
            widths: vec![4, 4, 4],
            activator: Activator::Sigmoid,
            sample: vec![0.2, 0.1, 0.15, 0.1],
            label: vec![0.4, 0.8, 0.2, 0.6],
            learning_rate: 0.5,
            seed: None,
        }
    }
}
