use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Serialize, Deserialize};

use crate::error::{check_len, NnError, Result};

/// Dense row-major matrix of `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix::filled(rows, cols, 0.0)
    }

    pub fn filled(rows: usize, cols: usize, value: f64) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![value; cols]; rows],
        }
    }

    /// Samples every entry from N(0, 1).
    pub fn standard_normal<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for row in res.data.iter_mut() {
            for x in row.iter_mut() {
                *x = rng.sample(StandardNormal);
            }
        }
        res
    }

    /// Builds a matrix from rows; every row must have the same length.
    pub fn from_rows(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let rows = data.len();
        let cols = data.first().map(|r| r.len()).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(NnError::InvalidConfig("matrix must have at least one entry".into()));
        }
        for row in &data {
            check_len("Matrix::from_rows", cols, row.len())?;
        }
        Ok(Matrix { rows, cols, data })
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    /// `self · v`, length `rows`.
    pub fn mul_vec(&self, v: &[f64]) -> Result<Vec<f64>> {
        check_len("Matrix::mul_vec", self.cols, v.len())?;
        Ok(self.data.iter()
            .map(|row| row.iter().zip(v.iter()).map(|(w, x)| w * x).sum())
            .collect())
    }

    /// `selfᵀ · v`, length `cols`, without materialising the transpose.
    pub fn transpose_mul_vec(&self, v: &[f64]) -> Result<Vec<f64>> {
        check_len("Matrix::transpose_mul_vec", self.rows, v.len())?;
        let mut res = vec![0.0; self.cols];
        for (row, &d) in self.data.iter().zip(v.iter()) {
            for (r, w) in res.iter_mut().zip(row.iter()) {
                *r += w * d;
            }
        }
        Ok(res)
    }

    /// Outer product `a ⊗ b`: entry `[i][j] = a[i] * b[j]`.
    pub fn outer(a: &[f64], b: &[f64]) -> Matrix {
        Matrix {
            rows: a.len(),
            cols: b.len(),
            data: a.iter()
                .map(|&ai| b.iter().map(|&bj| ai * bj).collect())
                .collect(),
        }
    }

    /// `self += scale * other`, in place.
    pub fn add_scaled(&mut self, scale: f64, other: &Matrix) -> Result<()> {
        check_len("Matrix::add_scaled (rows)", self.rows, other.rows)?;
        check_len("Matrix::add_scaled (cols)", self.cols, other.cols)?;
        for (row, other_row) in self.data.iter_mut().zip(other.data.iter()) {
            for (x, o) in row.iter_mut().zip(other_row.iter()) {
                *x += scale * o;
            }
        }
        Ok(())
    }

    pub fn fill(&mut self, value: f64) {
        for row in self.data.iter_mut() {
            for x in row.iter_mut() {
                *x = value;
            }
        }
    }
}
