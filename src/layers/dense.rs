use rand::Rng;
use rand_distr::StandardNormal;
use tracing::trace;

use crate::activation::Activator;
use crate::error::{check_len, NnError, Result};
use crate::math::{hadamard, matrix::Matrix};

/// Where a layer is in the forward → backward → update cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed or re-initialised; nothing cached yet.
    Fresh,
    Forwarded,
    Backwarded,
    /// Parameters changed; cached input no longer matches them.
    Updated,
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::Fresh => "fresh",
            Phase::Forwarded => "forwarded",
            Phase::Backwarded => "backwarded",
            Phase::Updated => "updated",
        }
    }
}

/// A fully connected layer: `output = f(W · input + b)`.
///
/// `weights` has shape `(output_size, input_size)`: row `i` holds the incoming
/// weights of output unit `i`. `bias` has one entry per output unit.
#[derive(Debug, Clone)]
pub struct Layer {
    /// Position in the owning network, used only in error reports.
    index: usize,
    weights: Matrix,
    bias: Vec<f64>,
    activator: Activator,
    last_input: Vec<f64>,
    last_output: Vec<f64>,
    weight_gradient: Matrix,
    bias_gradient: Vec<f64>,
    phase: Phase,
}

impl Layer {
    /// Creates a layer with weights and bias drawn from N(0, 1).
    pub fn new(input_size: usize, output_size: usize, activator: Activator) -> Result<Layer> {
        Layer::with_rng(input_size, output_size, activator, &mut rand::thread_rng())
    }

    /// Same as [`Layer::new`] but draws from the supplied RNG.
    pub fn with_rng<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activator: Activator,
        rng: &mut R,
    ) -> Result<Layer> {
        if input_size == 0 || output_size == 0 {
            return Err(NnError::InvalidConfig(format!(
                "layer sizes must be non-zero, got {input_size} -> {output_size}"
            )));
        }
        let weights = Matrix::standard_normal(output_size, input_size, rng);
        let bias = (0..output_size).map(|_| rng.sample(StandardNormal)).collect();
        Ok(Layer::assemble(weights, bias, activator))
    }

    /// Builds a layer from explicit parameters.
    pub fn from_parameters(weights: Matrix, bias: Vec<f64>, activator: Activator) -> Result<Layer> {
        check_len("Layer::from_parameters (bias)", weights.rows, bias.len())?;
        if weights.cols == 0 {
            return Err(NnError::InvalidConfig("layer must have at least one input".into()));
        }
        Ok(Layer::assemble(weights, bias, activator))
    }

    fn assemble(weights: Matrix, bias: Vec<f64>, activator: Activator) -> Layer {
        let (rows, cols) = (weights.rows, weights.cols);
        Layer {
            index: 0,
            weights,
            bias,
            activator,
            last_input: vec![0.0; cols],
            last_output: vec![0.0; rows],
            weight_gradient: Matrix::zeros(rows, cols),
            bias_gradient: vec![0.0; rows],
            phase: Phase::Fresh,
        }
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    /// Fills every weight with `weight` and every bias with `bias`.
    pub fn initialize(&mut self, weight: f64, bias: f64) {
        self.weights.fill(weight);
        self.bias.iter_mut().for_each(|b| *b = bias);
        self.phase = Phase::Fresh;
    }

    pub fn input_size(&self) -> usize {
        self.weights.cols
    }

    pub fn output_size(&self) -> usize {
        self.weights.rows
    }

    pub fn activator(&self) -> Activator {
        self.activator
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn bias(&self) -> &[f64] {
        &self.bias
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Output of the most recent forward call.
    pub fn output(&self) -> Option<&[f64]> {
        match self.phase {
            Phase::Fresh => None,
            _ => Some(&self.last_output),
        }
    }

    /// Gradient computed by the most recent backward call, before it is applied.
    pub fn weight_gradient(&self) -> Option<&Matrix> {
        match self.phase {
            Phase::Backwarded => Some(&self.weight_gradient),
            _ => None,
        }
    }

    pub fn bias_gradient(&self) -> Option<&[f64]> {
        match self.phase {
            Phase::Backwarded => Some(&self.bias_gradient),
            _ => None,
        }
    }

    /// Computes `f(W · input + b)` and caches `input` for the backward pass.
    pub fn forward(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        check_len("Layer::forward", self.input_size(), input.len())?;
        let mut z = self.weights.mul_vec(input)?;
        for (zi, bi) in z.iter_mut().zip(self.bias.iter()) {
            *zi += bi;
        }
        let output = self.activator.forward(&z);

        self.last_input.clear();
        self.last_input.extend_from_slice(input);
        self.last_output.clone_from(&output);
        self.phase = Phase::Forwarded;
        trace!(layer = self.index, ?output, "forward");
        Ok(output)
    }

    /// Stores `δ ⊗ input` and `δ` as this layer's gradients and returns the
    /// delta for the previous layer, `(Wᵀ · δ) ⊙ f'(input)`.
    ///
    /// `input` is the previous layer's activated output, so the returned value
    /// is that layer's delta as long as both layers share an activator. For the
    /// first layer the input is raw data and the returned delta is meaningless.
    pub fn backward(&mut self, delta: &[f64]) -> Result<Vec<f64>> {
        if self.phase != Phase::Forwarded {
            return Err(self.sequence_error("backward"));
        }
        check_len("Layer::backward", self.output_size(), delta.len())?;

        self.weight_gradient = Matrix::outer(delta, &self.last_input);
        self.bias_gradient.clear();
        self.bias_gradient.extend_from_slice(delta);

        let propagated = self.weights.transpose_mul_vec(delta)?;
        let previous = hadamard(&propagated, &self.activator.backward(&self.last_input))?;
        self.phase = Phase::Backwarded;
        trace!(layer = self.index, ?previous, "backward");
        Ok(previous)
    }

    /// `W += rate · ∇W`, `b += rate · ∇b`.
    ///
    /// The gradients already carry the `(label − prediction)` sign, so adding
    /// them moves downhill on the squared deviation.
    pub fn update_parameters(&mut self, rate: f64) -> Result<()> {
        if self.phase != Phase::Backwarded {
            return Err(self.sequence_error("update_parameters"));
        }
        self.weights.add_scaled(rate, &self.weight_gradient)?;
        for (b, g) in self.bias.iter_mut().zip(self.bias_gradient.iter()) {
            *b += rate * g;
        }
        self.phase = Phase::Updated;
        Ok(())
    }

    pub(crate) fn sequence_error(&self, operation: &'static str) -> NnError {
        NnError::InvalidSequence {
            layer: self.index,
            operation,
            phase: self.phase.name(),
        }
    }
}
