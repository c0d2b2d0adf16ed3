use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::activation::Activator;
use crate::error::{check_len, NnError, Result};
use crate::layers::{Layer, Phase};
use crate::loss::SquaredDeviation;
use crate::math::hadamard;
use crate::network::spec::NetworkSpec;

const DEFAULT_LEARNING_RATE: f64 = 0.5;

/// A stack of dense layers trained on one sample/label pair.
///
/// One training step is `forward → backward → update_parameters`; calling
/// these out of order fails with [`NnError::InvalidSequence`] instead of
/// reusing stale cached state.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
    sample: Vec<f64>,
    label: Vec<f64>,
    learning_rate: f64,
}

impl Network {
    /// Builds one layer per entry in `widths`, all sharing `activator`, with
    /// parameters drawn from N(0, 1).
    pub fn new(
        widths: &[usize],
        activator: Activator,
        sample: Vec<f64>,
        label: Vec<f64>,
    ) -> Result<Network> {
        Network::with_rng(widths, activator, sample, label, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(
        widths: &[usize],
        activator: Activator,
        sample: Vec<f64>,
        label: Vec<f64>,
        rng: &mut R,
    ) -> Result<Network> {
        if widths.is_empty() {
            return Err(NnError::InvalidConfig("network needs at least one layer".into()));
        }
        let mut layers = Vec::with_capacity(widths.len());
        let mut input_size = widths[0];
        for &width in widths {
            layers.push(Layer::with_rng(input_size, width, activator, rng)?);
            input_size = width;
        }
        Network::from_layers(layers, sample, label)
    }

    /// Wraps explicitly built layers. Each layer's input size must equal the
    /// previous layer's output size, and all layers must share one activator,
    /// since a layer differentiates its input with its own activator.
    pub fn from_layers(mut layers: Vec<Layer>, sample: Vec<f64>, label: Vec<f64>) -> Result<Network> {
        let first = layers.first()
            .ok_or_else(|| NnError::InvalidConfig("network needs at least one layer".into()))?;
        let activator = first.activator();
        for pair in layers.windows(2) {
            check_len("Network::from_layers", pair[0].output_size(), pair[1].input_size())?;
        }
        if layers.iter().any(|l| l.activator() != activator) {
            return Err(NnError::InvalidConfig("all layers must share one activator".into()));
        }
        for (i, layer) in layers.iter_mut().enumerate() {
            layer.set_index(i);
        }

        let mut network = Network {
            layers,
            sample: Vec::new(),
            label: Vec::new(),
            learning_rate: DEFAULT_LEARNING_RATE,
        };
        network.set_training_pair(sample, label)?;
        Ok(network)
    }

    /// Builds a network from a [`NetworkSpec`], seeding the RNG when the spec
    /// carries a seed.
    pub fn from_spec(spec: &NetworkSpec) -> Result<Network> {
        let mut network = match spec.seed {
            Some(seed) => Network::with_rng(
                &spec.widths,
                spec.activator,
                spec.sample.clone(),
                spec.label.clone(),
                &mut StdRng::seed_from_u64(seed),
            )?,
            None => Network::new(&spec.widths, spec.activator, spec.sample.clone(), spec.label.clone())?,
        };
        network.set_learning_rate(spec.learning_rate)?;
        Ok(network)
    }

    /// The 4-4-4 sigmoid network with the fixed demo training pair.
    pub fn demo() -> Result<Network> {
        Network::from_spec(&NetworkSpec::default())
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Mutable access to individual layers, e.g. for `Layer::initialize`.
    /// The number and shape of layers cannot change through this slice.
    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].input_size()
    }

    pub fn output_size(&self) -> usize {
        self.output_layer().output_size()
    }

    pub fn sample(&self) -> &[f64] {
        &self.sample
    }

    pub fn label(&self) -> &[f64] {
        &self.label
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn set_learning_rate(&mut self, rate: f64) -> Result<()> {
        if !rate.is_finite() {
            return Err(NnError::InvalidConfig(format!("learning rate must be finite, got {rate}")));
        }
        self.learning_rate = rate;
        Ok(())
    }

    /// Replaces the training pair. Lengths must match the input and output sizes.
    pub fn set_training_pair(&mut self, sample: Vec<f64>, label: Vec<f64>) -> Result<()> {
        check_len("Network sample", self.input_size(), sample.len())?;
        check_len("Network label", self.output_size(), label.len())?;
        self.sample = sample;
        self.label = label;
        Ok(())
    }

    /// Feeds the sample through every layer and returns the prediction.
    pub fn forward(&mut self) -> Result<&[f64]> {
        let mut current = self.sample.clone();
        for layer in &mut self.layers {
            current = layer.forward(&current)?;
        }
        Ok(self.output_layer().output().unwrap_or_default())
    }

    /// Propagates `(label − prediction) ⊙ f'(prediction)` from the output layer
    /// back to the first, leaving every layer with fresh gradients.
    pub fn backward(&mut self) -> Result<()> {
        self.require_phase(Phase::Forwarded, "Network::backward")?;
        let output_layer = self.output_layer();
        let prediction = output_layer.output().unwrap_or_default();
        let error = SquaredDeviation::error(prediction, &self.label)?;
        debug!(?prediction, label = ?self.label, ?error, "output deviation");
        let mut delta = hadamard(&error, &output_layer.activator().backward(prediction))?;

        // The delta returned by the first layer has no consumer; it is
        // overwritten and dropped.
        for layer in self.layers.iter_mut().rev() {
            delta = layer.backward(&delta)?;
        }
        Ok(())
    }

    /// Applies each layer's stored gradients scaled by `rate`. Either every
    /// layer is updated or none is.
    pub fn update_parameters(&mut self, rate: f64) -> Result<()> {
        self.require_phase(Phase::Backwarded, "Network::update_parameters")?;
        for layer in &mut self.layers {
            layer.update_parameters(rate)?;
        }
        Ok(())
    }

    /// One atomic iteration: forward, backward, update with the configured
    /// learning rate. Returns the squared deviation seen by this step's
    /// forward pass, i.e. before the update.
    pub fn train_step(&mut self) -> Result<f64> {
        self.forward()?;
        let deviation = self.squared_deviation().unwrap_or_default();
        self.backward()?;
        self.update_parameters(self.learning_rate)?;
        Ok(deviation)
    }

    /// Output of the most recent forward pass, if any.
    pub fn prediction(&self) -> Option<&[f64]> {
        self.output_layer().output()
    }

    /// `label − prediction` for the most recent forward pass.
    pub fn deviation(&self) -> Option<Vec<f64>> {
        let prediction = self.prediction()?;
        SquaredDeviation::error(prediction, &self.label).ok()
    }

    /// Σ (label − prediction)² for the most recent forward pass.
    pub fn squared_deviation(&self) -> Option<f64> {
        let prediction = self.prediction()?;
        SquaredDeviation::loss(prediction, &self.label).ok()
    }

    /// Fails on the first layer not in `phase`, before anything is mutated.
    fn require_phase(&self, phase: Phase, operation: &'static str) -> Result<()> {
        match self.layers.iter().find(|l| l.phase() != phase) {
            Some(layer) => Err(layer.sequence_error(operation)),
            None => Ok(()),
        }
    }

    fn output_layer(&self) -> &Layer {
        &self.layers[self.layers.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(x: f64, t: f64) -> Network {
        let mut network = Network::new(&[1], Activator::Sigmoid, vec![x], vec![t]).unwrap();
        network.layers_mut()[0].initialize(1.0, 1.0);
        network
    }

    #[test]
    fn widths_444_compose() {
        let network = Network::demo().unwrap();
        assert_eq!(network.layers().len(), 3);
        assert_eq!(network.layers()[0].output_size(), 4);
        assert_eq!(network.layers()[1].input_size(), 4);
        assert!(network.layers().iter().all(|l| l.input_size() == 4 && l.output_size() == 4));
        assert_eq!(network.learning_rate(), 0.5);
    }

    #[test]
    fn unequal_widths_chain() {
        let network = Network::new(&[3, 5, 2], Activator::Sigmoid, vec![0.1; 3], vec![0.5; 2]).unwrap();
        let shapes: Vec<_> = network.layers().iter().map(|l| (l.input_size(), l.output_size())).collect();
        assert_eq!(shapes, vec![(3, 3), (3, 5), (5, 2)]);
        assert_eq!(network.input_size(), 3);
        assert_eq!(network.output_size(), 2);
    }

    #[test]
    fn invalid_construction() {
        assert!(matches!(
            Network::new(&[], Activator::Sigmoid, vec![], vec![]),
            Err(NnError::InvalidConfig(_))
        ));
        assert!(Network::new(&[2, 0], Activator::Sigmoid, vec![0.0; 2], vec![]).is_err());
        assert!(matches!(
            Network::new(&[2, 2], Activator::Sigmoid, vec![0.0; 3], vec![0.0; 2]),
            Err(NnError::InvalidShape { context: "Network sample", .. })
        ));
        assert!(matches!(
            Network::new(&[2, 2], Activator::Sigmoid, vec![0.0; 2], vec![0.0; 1]),
            Err(NnError::InvalidShape { context: "Network label", .. })
        ));
    }

    #[test]
    fn from_layers_checks_chaining_and_activators() {
        let a = Layer::new(2, 3, Activator::Sigmoid).unwrap();
        let b = Layer::new(2, 1, Activator::Sigmoid).unwrap();
        assert!(matches!(
            Network::from_layers(vec![a.clone(), b], vec![0.0; 2], vec![0.0]),
            Err(NnError::InvalidShape { context: "Network::from_layers", expected: 3, actual: 2 })
        ));

        let relu = Layer::new(3, 1, Activator::ReLU).unwrap();
        assert!(matches!(
            Network::from_layers(vec![a.clone(), relu], vec![0.0; 2], vec![0.0]),
            Err(NnError::InvalidConfig(_))
        ));

        let c = Layer::new(3, 1, Activator::Sigmoid).unwrap();
        let network = Network::from_layers(vec![a, c], vec![0.0; 2], vec![0.0]).unwrap();
        assert_eq!((network.input_size(), network.output_size()), (2, 1));
        assert!(Network::from_layers(vec![], vec![], vec![]).is_err());
    }

    #[test]
    fn forward_is_idempotent() {
        let mut network = Network::demo().unwrap();
        let first = network.forward().unwrap().to_vec();
        let second = network.forward().unwrap().to_vec();
        assert_eq!(first, second);
        assert_eq!(network.prediction().unwrap(), &second[..]);
    }

    #[test]
    fn prediction_needs_forward() {
        let network = Network::demo().unwrap();
        assert!(network.prediction().is_none());
        assert!(network.deviation().is_none());
        assert!(network.squared_deviation().is_none());
    }

    #[test]
    fn deviation_is_label_minus_prediction() {
        let mut network = single(0.2, 0.4);
        let y = network.forward().unwrap()[0];
        assert_eq!(network.deviation().unwrap(), vec![0.4 - y]);
        assert_eq!(network.squared_deviation().unwrap(), (0.4 - y) * (0.4 - y));
    }

    #[test]
    fn out_of_order_calls_fail() {
        let mut network = Network::demo().unwrap();
        assert!(matches!(network.backward(), Err(NnError::InvalidSequence { .. })));
        assert!(matches!(network.update_parameters(0.5), Err(NnError::InvalidSequence { .. })));

        network.forward().unwrap();
        assert!(network.update_parameters(0.5).is_err());
        network.backward().unwrap();
        assert!(network.backward().is_err());
        network.update_parameters(0.5).unwrap();
        assert!(network.backward().is_err());
        assert!(network.update_parameters(0.5).is_err());
    }

    #[test]
    fn failed_update_leaves_every_layer_untouched() {
        let mut network = Network::new(&[2, 2, 2], Activator::Sigmoid, vec![0.3, 0.6], vec![0.2, 0.9]).unwrap();
        network.forward().unwrap();
        network.backward().unwrap();
        network.layers_mut()[2].initialize(0.1, 0.1);
        let before: Vec<_> = network.layers().iter().map(|l| (l.weights().clone(), l.bias().to_vec())).collect();

        assert!(matches!(
            network.update_parameters(0.5),
            Err(NnError::InvalidSequence { layer: 2, phase: "fresh", .. })
        ));
        let after: Vec<_> = network.layers().iter().map(|l| (l.weights().clone(), l.bias().to_vec())).collect();
        assert_eq!(before, after);
        assert_eq!(network.layers()[0].phase(), Phase::Backwarded);
        assert_eq!(network.layers()[1].phase(), Phase::Backwarded);
    }

    #[test]
    fn failed_backward_computes_no_gradients() {
        let mut network = Network::new(&[2, 2, 2], Activator::Sigmoid, vec![0.3, 0.6], vec![0.2, 0.9]).unwrap();
        network.forward().unwrap();
        network.layers_mut()[0].initialize(0.1, 0.1);

        assert!(matches!(
            network.backward(),
            Err(NnError::InvalidSequence { layer: 0, operation: "Network::backward", .. })
        ));
        assert!(network.layers().iter().all(|l| l.weight_gradient().is_none()));
        assert_eq!(network.layers()[2].phase(), Phase::Forwarded);
    }

    #[test]
    fn train_step_reduces_deviation() {
        let mut network = single(0.2, 0.4);
        let before = network.train_step().unwrap();
        let after = network.train_step().unwrap();
        assert!(after < before);
    }

    #[test]
    fn train_pair_can_be_replaced() {
        let mut network = Network::demo().unwrap();
        network.set_training_pair(vec![0.0; 4], vec![1.0; 4]).unwrap();
        assert_eq!(network.label(), &[1.0; 4]);
        assert!(network.set_training_pair(vec![0.0; 3], vec![1.0; 4]).is_err());
        assert_eq!(network.sample(), &[0.0; 4]);
    }

    #[test]
    fn non_finite_learning_rate_is_rejected() {
        let mut network = Network::demo().unwrap();
        assert!(network.set_learning_rate(f64::NAN).is_err());
        network.set_learning_rate(0.1).unwrap();
        assert_eq!(network.learning_rate(), 0.1);
    }

    #[test]
    fn seeded_specs_are_reproducible() {
        let spec = NetworkSpec { seed: Some(42), ..NetworkSpec::default() };
        let mut a = Network::from_spec(&spec).unwrap();
        let mut b = Network::from_spec(&spec).unwrap();
        assert_eq!(a.forward().unwrap(), b.forward().unwrap());
    }
}
