//! Parameter update rule
//!
//! Training uses plain stochastic gradient descent:
//! `parameter = parameter - learning_rate * gradient`, applied once per example.

pub mod sgd;

pub use sgd::Sgd;
