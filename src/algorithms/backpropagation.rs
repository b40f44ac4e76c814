//! Backpropagation with per-example gradient descent
//!
//! For a network with L layers and cached activations `a[0..=L]` (`a[0]` is the input):
//!
//! - output delta: `delta[k] = (a[L][k] - target[k]) * f'(a[L][k])`
//! - hidden delta: `delta[j] = sum_k(W[l+1][k][j] * delta_next[k]) * f'(a[l+1][j])`
//! - gradients: `gradW[l][k][i] = a[l][i] * delta[k]`, `gradB[l] = delta`
//!
//! where `f'` is the activation derivative evaluated on the activated value.

use crate::algorithms::LearningAlgorithm;
use crate::dataset::Record;
use crate::network::{feed_forward, Network};
use crate::optimizers::Sgd;
use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;

/// Step size of every update.
pub const LEARNING_RATE: f64 = 1.0;

/// Weight and bias gradients for one example, shaped like the network's tensors.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub weights: Vec<Vec<Vec<f64>>>,
    pub biases: Vec<Vec<f64>>,
}

impl Gradients {
    /// Descend along these gradients, layer by layer.
    ///
    /// # Panics
    ///
    /// Panics if the gradients were computed for a different topology.
    pub fn apply(&self, network: &mut Network, optimizer: Sgd) {
        let (weights, biases) = network.parameters_mut();
        assert_eq!(
            weights.len(),
            self.weights.len(),
            "gradients and network must have the same number of layers"
        );

        for (layer_biases, gradients) in biases.iter_mut().zip(&self.biases) {
            optimizer.update(layer_biases, gradients);
        }
        for (layer, gradients) in weights.iter_mut().zip(&self.weights) {
            optimizer.update_layer(layer, gradients);
        }
    }
}

/// Backpropagation trainer holding the exclusive borrow of one network.
///
/// The rng only drives the per-epoch shuffle, so a seeded rng makes training
/// reproducible.
pub struct Backpropagation<'a, R> {
    network: &'a mut Network,
    rng: R,
    optimizer: Sgd,
}

impl<'a, R: Rng> Backpropagation<'a, R> {
    pub fn new(network: &'a mut Network, rng: R) -> Self {
        Self {
            network,
            rng,
            optimizer: Sgd::new(LEARNING_RATE),
        }
    }

    pub fn network(&self) -> &Network {
        &*self.network
    }

    /// Compute the gradients for one example without touching the parameters.
    ///
    /// # Panics
    ///
    /// Panics if the record's input or output length does not fit the network.
    pub fn gradients(&self, record: &Record) -> Gradients {
        let network: &Network = &*self.network;
        let activation = network.activation();
        let weights = network.weights();
        let biases = network.biases();
        let layer_count = weights.len();

        // Forward pass, caching every layer's output.
        let mut activations: Vec<Vec<f64>> = Vec::with_capacity(layer_count + 1);
        activations.push(record.inputs.clone());
        for (layer, layer_biases) in weights.iter().zip(biases) {
            let inputs = &activations[activations.len() - 1];
            let next = feed_forward(activation, layer, layer_biases, inputs);
            activations.push(next);
        }

        let output = &activations[layer_count];
        assert_eq!(
            output.len(),
            record.outputs.len(),
            "target length must match the output layer size"
        );

        let mut weight_gradients = vec![Vec::new(); layer_count];
        let mut bias_gradients = vec![Vec::new(); layer_count];

        // Output layer.
        let mut delta: Vec<f64> = output
            .iter()
            .zip(&record.outputs)
            .map(|(&a, &target)| (a - target) * activation.derivative(a))
            .collect();
        weight_gradients[layer_count - 1] = outer(&delta, &activations[layer_count - 1]);
        bias_gradients[layer_count - 1] = delta.clone();

        // Hidden layers, back to front.
        for layer_index in (0..layer_count - 1).rev() {
            let next_layer = &weights[layer_index + 1];
            let layer_output = &activations[layer_index + 1];

            let mut new_delta = vec![0.0; layer_output.len()];
            for (j, value) in new_delta.iter_mut().enumerate() {
                let mut error = 0.0;
                for (neuron, &next_delta) in next_layer.iter().zip(&delta) {
                    error += neuron[j] * next_delta;
                }
                *value = error * activation.derivative(layer_output[j]);
            }
            delta = new_delta;

            weight_gradients[layer_index] = outer(&delta, &activations[layer_index]);
            bias_gradients[layer_index] = delta.clone();
        }

        Gradients {
            weights: weight_gradients,
            biases: bias_gradients,
        }
    }

    /// Fraction of records whose strongest output unit matches the label.
    pub fn accuracy(&self, records: &[Record]) -> f64 {
        if records.is_empty() {
            return 0.0;
        }
        let network: &Network = &*self.network;
        let correct = records
            .par_iter()
            .filter(|record| network.predict(&record.inputs) == record.label())
            .count();
        correct as f64 / records.len() as f64
    }
}

impl<R: Rng> LearningAlgorithm for Backpropagation<'_, R> {
    fn train(&mut self, record: &Record) {
        let gradients = self.gradients(record);
        gradients.apply(&mut *self.network, self.optimizer);
    }

    fn train_epoch(&mut self, records: &[Record]) {
        let mut order: Vec<usize> = (0..records.len()).collect();
        order.shuffle(&mut self.rng);

        for &index in &order {
            self.train(&records[index]);
        }

        debug!("Trained one epoch over {} records", records.len());
    }

    fn evaluate(&self, record: &Record) -> f64 {
        root_mean_squared_error(&*self.network, record)
    }

    /// Records are scored in parallel against the shared borrow of the network.
    ///
    /// An empty set yields NaN.
    fn evaluate_set(&self, records: &[Record]) -> f64 {
        let network: &Network = &*self.network;
        let total: f64 = records
            .par_iter()
            .map(|record| root_mean_squared_error(network, record))
            .sum();
        let error = total / records.len() as f64;

        if !error.is_finite() {
            warn!(
                "Evaluation over {} records produced a non-finite error",
                records.len()
            );
        }
        error
    }
}

/// `sqrt(mean_k((predicted[k] - target[k])^2))` for one record.
///
/// # Panics
///
/// Panics if the record's output length differs from the network's output size.
pub fn root_mean_squared_error(network: &Network, record: &Record) -> f64 {
    let results = network.calculate(&record.inputs);
    assert_eq!(
        results.len(),
        record.outputs.len(),
        "target length must match the output layer size"
    );

    let mut mse = 0.0;
    for (result, target) in results.iter().zip(&record.outputs) {
        mse += (result - target) * (result - target);
    }
    mse /= results.len() as f64;

    mse.sqrt()
}

// gradient[k][i] = previous[i] * delta[k]
fn outer(delta: &[f64], previous: &[f64]) -> Vec<Vec<f64>> {
    delta
        .iter()
        .map(|&d| previous.iter().map(|&a| a * d).collect())
        .collect()
}
