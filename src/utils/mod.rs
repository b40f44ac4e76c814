//! Shared utilities for the network implementation
//!
//! This module provides the activation functions used by forward propagation
//! and by the backpropagation delta computation.

pub mod activations;

pub use activations::{sigmoid, sigmoid_derivative, tanh, tanh_derivative, Activation};
