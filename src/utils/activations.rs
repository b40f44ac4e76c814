//! Activation functions for the network
//!
//! Both derivatives are expressed in activation space: they take the value
//! already produced by the activation, not the raw weighted sum.
//! - Sigmoid: y = 1 / (1 + exp(-x)), dy = y * (1 - y)
//! - Tanh: y = tanh(x), dy = 1 - y^2

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sigmoid activation function.
///
/// Returns the sigmoid of the input: 1 / (1 + exp(-x))
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Sigmoid derivative assuming y = sigmoid(z).
///
/// Returns the derivative: y * (1 - y)
pub fn sigmoid_derivative(y: f64) -> f64 {
    y * (1.0 - y)
}

/// Hyperbolic tangent activation function.
pub fn tanh(x: f64) -> f64 {
    x.tanh()
}

/// Tanh derivative assuming y = tanh(z).
///
/// Returns the derivative: 1 - y^2
pub fn tanh_derivative(y: f64) -> f64 {
    1.0 - y.powi(2)
}

/// The closed set of activation functions a network can be built with.
///
/// Dispatch is a plain `match`, so the call in the innermost training loop
/// stays monomorphic.
///
/// # Example
///
/// ```
/// use digit_net::Activation;
///
/// let y = Activation::Sigmoid.activate(0.0);
/// assert_eq!(y, 0.5);
/// assert_eq!(Activation::Sigmoid.derivative(y), 0.25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Sigmoid,
    Tanh,
}

impl Activation {
    /// Applies the activation to a weighted sum.
    #[inline]
    pub fn activate(self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => sigmoid(x),
            Activation::Tanh => tanh(x),
        }
    }

    /// Derivative evaluated on an already-activated value.
    #[inline]
    pub fn derivative(self, y: f64) -> f64 {
        match self {
            Activation::Sigmoid => sigmoid_derivative(y),
            Activation::Tanh => tanh_derivative(y),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Activation::Sigmoid => "sigmoid",
            Activation::Tanh => "tanh",
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Activation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sigmoid" => Ok(Activation::Sigmoid),
            "tanh" => Ok(Activation::Tanh),
            other => Err(format!(
                "Invalid activation function '{}'. Must be one of: sigmoid, tanh",
                other
            )),
        }
    }
}
