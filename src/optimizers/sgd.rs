//! Stochastic Gradient Descent (SGD) update
//!
//! This module provides the vanilla update `parameter = parameter - learning_rate * gradient`
//! for flat slices and for the network's nested weight/bias tensors.

/// Stochastic Gradient Descent without momentum or regularization.
///
/// `w = w - η * ∇L/∂w`
///
/// # Example
///
/// ```
/// use digit_net::optimizers::Sgd;
///
/// let optimizer = Sgd::new(0.1);
/// let mut params = vec![1.0, 2.0, 3.0];
/// optimizer.update(&mut params, &[0.1, 0.2, 0.3]);
/// assert!((params[0] - 0.99).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }

    /// Apply `parameter[i] -= learning_rate * gradient[i]` in place.
    ///
    /// # Panics
    ///
    /// Panics if `parameters` and `gradients` have different lengths.
    pub fn update(&self, parameters: &mut [f64], gradients: &[f64]) {
        assert_eq!(
            parameters.len(),
            gradients.len(),
            "Parameters and gradients must have the same length"
        );

        for (param, grad) in parameters.iter_mut().zip(gradients) {
            *param -= self.learning_rate * grad;
        }
    }

    /// Update one layer's weight matrix, neuron by neuron.
    pub fn update_layer(&self, layer: &mut [Vec<f64>], gradients: &[Vec<f64>]) {
        assert_eq!(
            layer.len(),
            gradients.len(),
            "Parameters and gradients must have the same length"
        );

        for (neuron, neuron_gradients) in layer.iter_mut().zip(gradients) {
            self.update(neuron, neuron_gradients);
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sgd_new() {
        let optimizer = Sgd::new(0.01);
        assert_eq!(optimizer.learning_rate(), 0.01);
    }

    #[test]
    fn test_sgd_update() {
        let optimizer = Sgd::new(0.1);
        let mut params = vec![1.0, 2.0, 3.0];
        let grads = vec![0.1, 0.2, 0.3];

        optimizer.update(&mut params, &grads);

        assert!((params[0] - 0.99).abs() < 1e-12);
        assert!((params[1] - 1.98).abs() < 1e-12);
        assert!((params[2] - 2.97).abs() < 1e-12);
    }

    #[test]
    fn test_sgd_unit_rate_subtracts_gradient() {
        let optimizer = Sgd::new(1.0);
        let mut params = vec![0.5, -0.5];

        optimizer.update(&mut params, &[0.25, -0.25]);

        assert_eq!(params, vec![0.25, -0.25]);
    }

    #[test]
    fn test_sgd_update_layer() {
        let optimizer = Sgd::new(1.0);
        let mut layer = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let grads = vec![vec![0.5, 0.5], vec![1.0, -1.0]];

        optimizer.update_layer(&mut layer, &grads);

        assert_eq!(layer, vec![vec![0.5, 1.5], vec![2.0, 5.0]]);
    }

    #[test]
    #[should_panic(expected = "Parameters and gradients must have the same length")]
    fn test_sgd_mismatched_lengths() {
        let optimizer = Sgd::new(0.01);
        let mut params = vec![1.0, 2.0];
        let grads = vec![0.1, 0.2, 0.3];
        optimizer.update(&mut params, &grads);
    }

    #[test]
    fn test_sgd_zero_learning_rate() {
        let optimizer = Sgd::new(0.0);
        let mut params = vec![1.0, 2.0, 3.0];
        let original = params.clone();

        optimizer.update(&mut params, &[0.1, 0.2, 0.3]);

        assert_eq!(params, original);
    }

    #[test]
    fn test_sgd_negative_gradients() {
        let optimizer = Sgd::new(0.1);
        let mut params = vec![1.0, 2.0];

        optimizer.update(&mut params, &[-0.5, -1.0]);

        assert!((params[0] - 1.05).abs() < 1e-12);
        assert!((params[1] - 2.1).abs() < 1e-12);
    }
}
