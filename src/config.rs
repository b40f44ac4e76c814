//! Configuration structures for training
//!
//! This module provides the configuration read by the `mnist_mlp` binary:
//! network topology, activation function, convergence criterion and file paths.

use crate::error::{NetworkError, Result};
use crate::utils::Activation;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Configuration for a training run.
///
/// Every field is optional in the JSON file and falls back to the digit
/// dataset defaults.
///
/// # Example
///
/// ```json
/// {
///   "layer_sizes": [784, 30, 10],
///   "activation": "sigmoid",
///   "convergence_threshold": 0.005,
///   "max_epochs": 50,
///   "seed": 1,
///   "train_path": "./data/mnist_train.csv",
///   "test_path": "./data/mnist_test.csv",
///   "model_path": "./network.json"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingConfig {
    /// Neuron count per layer, input layer first
    pub layer_sizes: Vec<usize>,

    /// Activation function: "sigmoid" or "tanh"
    pub activation: Activation,

    /// Training stops once the test-set RMSE is at or below this value
    pub convergence_threshold: f64,

    /// Upper bound on epochs; unbounded when absent
    pub max_epochs: Option<usize>,

    /// Seed for initialization and shuffling; drawn from entropy when absent
    pub seed: Option<u64>,

    /// Training dataset CSV
    pub train_path: String,

    /// Test dataset CSV
    pub test_path: String,

    /// Destination of the trained parameters
    pub model_path: String,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            layer_sizes: vec![784, 30, 10],
            activation: Activation::Sigmoid,
            convergence_threshold: 0.005,
            max_epochs: None,
            seed: None,
            train_path: "./data/mnist_train.csv".to_string(),
            test_path: "./data/mnist_test.csv".to_string(),
            model_path: "./network.json".to_string(),
        }
    }
}

/// Loads a training configuration from a JSON file.
///
/// # Returns
///
/// `Ok(TrainingConfig)` on success, or an error if the file cannot be read,
/// the JSON is invalid, or a value is out of range.
///
/// # Examples
///
/// ```no_run
/// use digit_net::config::load_config;
///
/// let cfg = load_config("config/mnist_mlp.json").unwrap();
/// assert_eq!(cfg.layer_sizes, vec![784, 30, 10]);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<TrainingConfig> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses and validates a configuration from a JSON string.
pub fn parse_config(contents: &str) -> Result<TrainingConfig> {
    let config: TrainingConfig = serde_json::from_str(contents)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &TrainingConfig) -> Result<()> {
    if config.layer_sizes.len() < 2 {
        return Err(NetworkError::InvalidConfiguration(
            "layer_sizes must have at least 2 entries".to_string(),
        ));
    }

    if config.layer_sizes.contains(&0) {
        return Err(NetworkError::InvalidConfiguration(
            "layer_sizes must all be positive".to_string(),
        ));
    }

    if config.convergence_threshold.is_nan() || config.convergence_threshold <= 0.0 {
        return Err(NetworkError::InvalidConfiguration(
            "convergence_threshold must be positive".to_string(),
        ));
    }

    if config.max_epochs == Some(0) {
        return Err(NetworkError::InvalidConfiguration(
            "max_epochs must be positive".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config, TrainingConfig::default());
    }

    #[test]
    fn test_parse_tanh() {
        let config = parse_config(r#"{"activation": "tanh"}"#).unwrap();
        assert_eq!(config.activation, Activation::Tanh);
    }

    #[test]
    fn test_rejects_unknown_activation() {
        let result = parse_config(r#"{"activation": "relu"}"#);
        assert!(matches!(result, Err(NetworkError::Json(_))));
    }

    #[test]
    fn test_rejects_single_layer() {
        let result = parse_config(r#"{"layer_sizes": [784]}"#);
        assert!(matches!(result, Err(NetworkError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_rejects_zero_threshold() {
        let result = parse_config(r#"{"convergence_threshold": 0.0}"#);
        assert!(matches!(result, Err(NetworkError::InvalidConfiguration(_))));
    }
}
