//! Feedforward network parameters and forward propagation
//!
//! A network with L layer boundaries owns L weight matrices and L bias vectors:
//! `weights[l][n][i]` is the weight from input `i` to neuron `n` of layer `l`,
//! and `biases[l][n]` is that neuron's bias.

use crate::error::{NetworkError, Result};
use crate::utils::Activation;
use rand::Rng;
use rand_distr::StandardNormal;

/// Fully connected feedforward network.
///
/// Parameters are the only mutable state. They are read by [`Network::calculate`]
/// and mutated in place by the training algorithm through [`Network::parameters_mut`].
///
/// # Example
///
/// ```
/// use digit_net::{Activation, Network};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let network = Network::new(&[784, 30, 10], Activation::Sigmoid, &mut rng).unwrap();
/// assert_eq!(network.layer_sizes(), vec![784, 30, 10]);
/// assert_eq!(network.calculate(&vec![0.0; 784]).len(), 10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    weights: Vec<Vec<Vec<f64>>>,
    biases: Vec<Vec<f64>>,
    activation: Activation,
}

impl Network {
    /// Create a network with standard-normal initialization.
    ///
    /// Every weight and bias is drawn independently from N(0, 1), layer by layer,
    /// weights of a layer before its biases.
    ///
    /// # Arguments
    ///
    /// * `layer_sizes` - Neuron count per layer, input layer first (at least 2 entries)
    /// * `activation` - Activation applied after every layer
    /// * `rng` - Random number generator for parameter initialization
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if fewer than two sizes are given or any size is zero.
    pub fn new<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        activation: Activation,
        rng: &mut R,
    ) -> Result<Self> {
        validate_layer_sizes(layer_sizes)?;

        let mut weights = Vec::with_capacity(layer_sizes.len() - 1);
        let mut biases = Vec::with_capacity(layer_sizes.len() - 1);

        for pair in layer_sizes.windows(2) {
            let (fan_in, neurons) = (pair[0], pair[1]);

            let layer: Vec<Vec<f64>> = (0..neurons)
                .map(|_| {
                    (0..fan_in)
                        .map(|_| rng.sample::<f64, _>(StandardNormal))
                        .collect()
                })
                .collect();
            let layer_biases: Vec<f64> = (0..neurons)
                .map(|_| rng.sample::<f64, _>(StandardNormal))
                .collect();

            weights.push(layer);
            biases.push(layer_biases);
        }

        Ok(Self {
            weights,
            biases,
            activation,
        })
    }

    /// Build a network from explicit parameters.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the tensors are empty, if weights and biases
    /// disagree on layer or neuron counts, if a layer's neurons have differing
    /// fan-in, or if a layer's fan-in differs from the previous layer's width.
    pub fn from_parameters(
        weights: Vec<Vec<Vec<f64>>>,
        biases: Vec<Vec<f64>>,
        activation: Activation,
    ) -> Result<Self> {
        validate_parameters(&weights, &biases)?;
        Ok(Self {
            weights,
            biases,
            activation,
        })
    }

    /// Forward one layer: `activation(sum_i(weight[n][i] * inputs[i]) + bias[n])` per neuron.
    ///
    /// # Panics
    ///
    /// Panics if `inputs` is not as long as each neuron's weight vector. That is a
    /// wiring error, not a runtime condition.
    pub fn feed_forward(
        &self,
        layer: &[Vec<f64>],
        layer_biases: &[f64],
        inputs: &[f64],
    ) -> Vec<f64> {
        feed_forward(self.activation, layer, layer_biases, inputs)
    }

    /// Run the inputs through every layer and return the output layer's activations.
    pub fn calculate(&self, inputs: &[f64]) -> Vec<f64> {
        let mut current = inputs.to_vec();
        for (layer, layer_biases) in self.weights.iter().zip(&self.biases) {
            current = self.feed_forward(layer, layer_biases, &current);
        }
        current
    }

    /// Index of the strongest output unit.
    pub fn predict(&self, inputs: &[f64]) -> usize {
        argmax(&self.calculate(inputs))
    }

    pub fn weights(&self) -> &[Vec<Vec<f64>>] {
        &self.weights
    }

    pub fn biases(&self) -> &[Vec<f64>] {
        &self.biases
    }

    /// Mutable views of both parameter tensors for the update step.
    ///
    /// Shapes are fixed: only element values may change through these slices.
    pub fn parameters_mut(&mut self) -> (&mut [Vec<Vec<f64>>], &mut [Vec<f64>]) {
        (self.weights.as_mut_slice(), self.biases.as_mut_slice())
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Number of layer boundaries (weight matrices).
    pub fn layer_count(&self) -> usize {
        self.weights.len()
    }

    /// Neuron count per layer, input layer first.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.weights.len() + 1);
        sizes.push(self.input_size());
        sizes.extend(self.biases.iter().map(Vec::len));
        sizes
    }

    pub fn input_size(&self) -> usize {
        self.weights
            .first()
            .and_then(|layer| layer.first())
            .map_or(0, Vec::len)
    }

    pub fn output_size(&self) -> usize {
        self.biases.last().map_or(0, Vec::len)
    }

    /// Total count of weights and biases.
    pub fn parameter_count(&self) -> usize {
        let weights: usize = self
            .weights
            .iter()
            .flat_map(|layer| layer.iter().map(Vec::len))
            .sum();
        let biases: usize = self.biases.iter().map(Vec::len).sum();
        weights + biases
    }

    /// Replace both tensors at once, keeping the activation.
    ///
    /// The network is left untouched if the new tensors are inconsistent.
    pub(crate) fn replace_parameters(
        &mut self,
        weights: Vec<Vec<Vec<f64>>>,
        biases: Vec<Vec<f64>>,
    ) -> Result<()> {
        validate_parameters(&weights, &biases)?;
        self.weights = weights;
        self.biases = biases;
        Ok(())
    }
}

pub(crate) fn feed_forward(
    activation: Activation,
    layer: &[Vec<f64>],
    layer_biases: &[f64],
    inputs: &[f64],
) -> Vec<f64> {
    let mut results = vec![0.0; layer.len()];

    for (result, (neuron, &bias)) in results.iter_mut().zip(layer.iter().zip(layer_biases)) {
        assert_eq!(
            neuron.len(),
            inputs.len(),
            "inputs length must match the neuron's weight count"
        );

        let mut sum = 0.0;
        for (weight, input) in neuron.iter().zip(inputs) {
            sum += weight * input;
        }

        *result = activation.activate(sum + bias);
    }

    results
}

pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0usize;
    for (i, &value) in values.iter().enumerate().skip(1) {
        if value > values[best] {
            best = i;
        }
    }
    best
}

fn validate_layer_sizes(layer_sizes: &[usize]) -> Result<()> {
    if layer_sizes.len() < 2 {
        return Err(NetworkError::InvalidConfiguration(format!(
            "at least 2 layer sizes are required, got {}",
            layer_sizes.len()
        )));
    }
    if let Some(index) = layer_sizes.iter().position(|&size| size == 0) {
        return Err(NetworkError::InvalidConfiguration(format!(
            "layer {} has size 0",
            index
        )));
    }
    Ok(())
}

fn validate_parameters(weights: &[Vec<Vec<f64>>], biases: &[Vec<f64>]) -> Result<()> {
    if weights.is_empty() {
        return Err(NetworkError::InvalidConfiguration(
            "network must have at least one layer".to_string(),
        ));
    }
    if weights.len() != biases.len() {
        return Err(NetworkError::InvalidConfiguration(format!(
            "{} weight layers but {} bias layers",
            weights.len(),
            biases.len()
        )));
    }

    let mut expected_fan_in: Option<usize> = None;
    for (index, (layer, layer_biases)) in weights.iter().zip(biases).enumerate() {
        if layer.is_empty() {
            return Err(NetworkError::InvalidConfiguration(format!(
                "layer {} has no neurons",
                index
            )));
        }
        if layer.len() != layer_biases.len() {
            return Err(NetworkError::InvalidConfiguration(format!(
                "layer {} has {} neurons but {} biases",
                index,
                layer.len(),
                layer_biases.len()
            )));
        }

        let fan_in = expected_fan_in.unwrap_or(layer[0].len());
        if fan_in == 0 {
            return Err(NetworkError::InvalidConfiguration(
                "input layer has size 0".to_string(),
            ));
        }
        if let Some(neuron) = layer.iter().position(|neuron| neuron.len() != fan_in) {
            return Err(NetworkError::InvalidConfiguration(format!(
                "layer {} neuron {} has {} weights, expected {}",
                index,
                neuron,
                layer[neuron].len(),
                fan_in
            )));
        }
        expected_fan_in = Some(layer.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_network_creation_shapes() {
        let mut rng = StdRng::seed_from_u64(42);
        let network = Network::new(&[4, 3, 2], Activation::Sigmoid, &mut rng).unwrap();

        assert_eq!(network.layer_count(), 2);
        assert_eq!(network.weights()[0].len(), 3);
        assert_eq!(network.weights()[0][0].len(), 4);
        assert_eq!(network.weights()[1].len(), 2);
        assert_eq!(network.weights()[1][0].len(), 3);
        assert_eq!(network.biases()[0].len(), 3);
        assert_eq!(network.biases()[1].len(), 2);
        assert_eq!(network.layer_sizes(), vec![4, 3, 2]);
    }

    #[test]
    fn test_network_parameter_count() {
        let mut rng = StdRng::seed_from_u64(42);
        let network = Network::new(&[784, 30, 10], Activation::Sigmoid, &mut rng).unwrap();

        assert_eq!(network.parameter_count(), 784 * 30 + 30 + 30 * 10 + 10);
    }

    #[test]
    fn test_deterministic_initialization() {
        let mut rng1 = StdRng::seed_from_u64(7);
        let mut rng2 = StdRng::seed_from_u64(7);

        let network1 = Network::new(&[5, 4, 3], Activation::Tanh, &mut rng1).unwrap();
        let network2 = Network::new(&[5, 4, 3], Activation::Tanh, &mut rng2).unwrap();

        assert_eq!(network1, network2);
    }

    #[test]
    fn test_rejects_single_layer() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = Network::new(&[784], Activation::Sigmoid, &mut rng);
        assert!(matches!(result, Err(NetworkError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_rejects_zero_sized_layer() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = Network::new(&[784, 0, 10], Activation::Sigmoid, &mut rng);
        assert!(matches!(result, Err(NetworkError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_from_parameters_rejects_fan_in_mismatch() {
        let weights = vec![vec![vec![0.1, 0.2]], vec![vec![0.3, 0.4]]];
        let biases = vec![vec![0.0], vec![0.0]];

        let result = Network::from_parameters(weights, biases, Activation::Sigmoid);
        assert!(matches!(result, Err(NetworkError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_from_parameters_rejects_bias_count_mismatch() {
        let weights = vec![vec![vec![0.1, 0.2], vec![0.3, 0.4]]];
        let biases = vec![vec![0.0]];

        let result = Network::from_parameters(weights, biases, Activation::Sigmoid);
        assert!(matches!(result, Err(NetworkError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_argmax_prefers_first_maximum() {
        assert_eq!(argmax(&[0.1, 0.9, 0.9, 0.2]), 1);
        assert_eq!(argmax(&[0.5]), 0);
    }

    #[test]
    #[should_panic(expected = "inputs length must match")]
    fn test_feed_forward_panics_on_wrong_input_length() {
        let network = Network::from_parameters(
            vec![vec![vec![1.0, 1.0]]],
            vec![vec![0.0]],
            Activation::Sigmoid,
        )
        .unwrap();
        network.calculate(&[1.0, 2.0, 3.0]);
    }
}
