//! Learning algorithms
//!
//! This module defines the LearningAlgorithm trait shared by training
//! strategies, and its backpropagation implementation.
//!
//! # Example
//!
//! ```
//! use digit_net::{Activation, Backpropagation, LearningAlgorithm, Network, Record};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let mut network = Network::new(&[2, 3, 1], Activation::Sigmoid, &mut rng).unwrap();
//! let records = vec![
//!     Record::new(vec![0.0, 1.0], vec![1.0]),
//!     Record::new(vec![1.0, 1.0], vec![0.0]),
//! ];
//!
//! let mut algorithm = Backpropagation::new(&mut network, rng);
//! let error = algorithm.train_and_evaluate(&records, &records);
//! assert!(error.is_finite());
//! ```

pub mod backpropagation;

pub use backpropagation::{Backpropagation, Gradients, LEARNING_RATE};

use crate::dataset::Record;

/// Core trait for training strategies that update a network one example at a time.
///
/// Training methods take `&mut self` because they write the network's parameters;
/// evaluation takes `&self` and never writes, so it cannot overlap a training call.
pub trait LearningAlgorithm {
    /// Train on a single example and update the parameters in place.
    fn train(&mut self, record: &Record);

    /// Train once on every record, in a freshly shuffled order.
    fn train_epoch(&mut self, records: &[Record]);

    /// Train one epoch on `training`, then return the error on `test`.
    fn train_and_evaluate(&mut self, training: &[Record], test: &[Record]) -> f64 {
        self.train_epoch(training);
        self.evaluate_set(test)
    }

    /// Error of the network's prediction for one record.
    fn evaluate(&self, record: &Record) -> f64;

    /// Mean per-record error over a set.
    fn evaluate_set(&self, records: &[Record]) -> f64;
}
