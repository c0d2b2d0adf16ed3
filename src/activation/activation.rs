use serde::{Serialize, Deserialize};

/// Pointwise nonlinearity applied after a layer's linear transform.
///
/// Both variants express their derivative in terms of the *activated* output
/// rather than the pre-activation input, so a layer only has to cache what it
/// produced. For ReLU this is exact: `max(0, x) > 0` holds iff `x > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activator {
    #[default]
    Sigmoid,
    #[serde(alias = "ReLU")]
    ReLU,
}

impl Activator {
    /// Element-wise activation `f(x)`.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            Activator::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activator::ReLU => if x > 0.0 { x } else { 0.0 },
        }
    }

    /// Element-wise derivative `f'(x)` evaluated from `y = f(x)`.
    pub fn derivative(&self, y: f64) -> f64 {
        match self {
            Activator::Sigmoid => y * (1.0 - y),
            Activator::ReLU => if y > 0.0 { 1.0 } else { 0.0 },
        }
    }

    pub fn forward(&self, input: &[f64]) -> Vec<f64> {
        input.iter().map(|&x| self.function(x)).collect()
    }

    /// Derivative vector for an already-activated vector.
    pub fn backward(&self, activated: &[f64]) -> Vec<f64> {
        activated.iter().map(|&y| self.derivative(y)).collect()
    }
}
