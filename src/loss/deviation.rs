use crate::error::{check_len, Result};

/// Deviation between a prediction and its label.
///
/// The error term is `label − prediction` (not the usual MSE gradient
/// `prediction − label`), matching the sign the layers' `+=` update expects.
pub struct SquaredDeviation;

impl SquaredDeviation {
    /// Per-output error: `label − prediction`.
    pub fn error(prediction: &[f64], label: &[f64]) -> Result<Vec<f64>> {
        check_len("SquaredDeviation::error", label.len(), prediction.len())?;
        Ok(label.iter().zip(prediction.iter())
            .map(|(t, y)| t - y)
            .collect())
    }

    /// Scalar: Σ (label − prediction)²
    pub fn loss(prediction: &[f64], label: &[f64]) -> Result<f64> {
        Ok(SquaredDeviation::error(prediction, label)?
            .iter()
            .map(|e| e * e)
            .sum())
    }

    /// Euclidean norm of the error vector.
    pub fn magnitude(prediction: &[f64], label: &[f64]) -> Result<f64> {
        Ok(SquaredDeviation::magnitude_of(SquaredDeviation::loss(prediction, label)?))
    }

    /// Norm from an already-computed squared deviation.
    pub fn magnitude_of(squared_deviation: f64) -> f64 {
        squared_deviation.sqrt()
    }
}
