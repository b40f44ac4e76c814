//! Digit Network Library
//!
//! A minimal feedforward neural network trained by per-example backpropagation,
//! used to classify handwritten digits decoded from a pixel CSV file.
//!
//! # Modules
//!
//! - `network`: Parameter tensors and forward propagation
//! - `algorithms`: Learning algorithm trait and the backpropagation implementation
//! - `optimizers`: Gradient descent update rule
//! - `dataset`: Records and the streaming CSV decoder
//! - `snapshot`: JSON persistence of weights and biases
//! - `utils`: Activation functions
//! - `config`: Training configuration for the `mnist_mlp` binary
//! - `error`: Crate error type

pub mod algorithms;
pub mod config;
pub mod dataset;
pub mod error;
pub mod network;
pub mod optimizers;
pub mod snapshot;
pub mod utils;

pub use algorithms::{Backpropagation, Gradients, LearningAlgorithm};
pub use dataset::Record;
pub use error::{NetworkError, Result};
pub use network::Network;
pub use snapshot::Snapshot;
pub use utils::Activation;
