pub mod matrix;

use crate::error::{check_len, Result};

/// Element-wise (Hadamard) product of two same-length vectors.
pub fn hadamard(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    check_len("hadamard", a.len(), b.len())?;
    Ok(a.iter().zip(b.iter()).map(|(x, y)| x * y).collect())
}
