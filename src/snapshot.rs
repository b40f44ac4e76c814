//! JSON persistence of network parameters
//!
//! A snapshot is exactly `{"weights": [[[...]]], "biases": [[...]]}`. The
//! activation function is not part of it: loading keeps the receiving
//! network's activation.
//!
//! `serde_json` writes the shortest representation that round-trips and, with
//! the `float_roundtrip` feature, parses it back exactly, so a save followed by
//! a load reproduces every `f64` bit for bit.

use crate::error::Result;
use crate::network::Network;
use crate::utils::Activation;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Serialized form of a network's parameters.
///
/// # Example
///
/// ```json
/// {
///   "weights": [[[0.15, 0.2], [0.25, 0.3]], [[0.4, 0.45]]],
///   "biases": [[0.35, 0.35], [0.6]]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub weights: Vec<Vec<Vec<f64>>>,
    pub biases: Vec<Vec<f64>>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Turn the snapshot into a network using the given activation.
    pub fn into_network(self, activation: Activation) -> Result<Network> {
        Network::from_parameters(self.weights, self.biases, activation)
    }
}

impl From<&Network> for Snapshot {
    fn from(network: &Network) -> Self {
        Self {
            weights: network.weights().to_vec(),
            biases: network.biases().to_vec(),
        }
    }
}

impl Network {
    /// Serialize the current parameters to a JSON string.
    pub fn save(&self) -> Result<String> {
        Snapshot::from(self).to_json()
    }

    /// Replace the parameters with those in `json`.
    ///
    /// The snapshot may describe a different topology; it only has to be
    /// internally consistent. On error the network is unchanged.
    pub fn load(&mut self, json: &str) -> Result<()> {
        self.load_snapshot(Snapshot::from_json(json)?)
    }

    pub fn load_snapshot(&mut self, snapshot: Snapshot) -> Result<()> {
        self.replace_parameters(snapshot.weights, snapshot.biases)
    }

    /// Write the parameters to a JSON file, creating or truncating it.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &Snapshot::from(self))?;
        writer.flush()?;

        info!(
            "Saved {} parameters to {}",
            self.parameter_count(),
            path.display()
        );
        Ok(())
    }

    /// Read a JSON snapshot file into a new network.
    pub fn load_from_file<P: AsRef<Path>>(path: P, activation: Activation) -> Result<Network> {
        let path = path.as_ref();
        let file = fs::File::open(path)?;
        let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))?;
        let network = snapshot.into_network(activation)?;

        info!(
            "Loaded network {:?} from {}",
            network.layer_sizes(),
            path.display()
        );
        Ok(network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_snapshot_field_names() {
        let network = Network::from_parameters(
            vec![vec![vec![0.5, -0.25]]],
            vec![vec![0.125]],
            Activation::Sigmoid,
        )
        .unwrap();

        let json = network.save().unwrap();
        assert_eq!(json, r#"{"weights":[[[0.5,-0.25]]],"biases":[[0.125]]}"#);
    }

    #[test]
    fn test_save_load_is_bit_identical() {
        let mut rng = StdRng::seed_from_u64(3);
        let original = Network::new(&[6, 5, 4], Activation::Sigmoid, &mut rng).unwrap();
        let json = original.save().unwrap();

        let mut restored = Network::new(&[2, 2], Activation::Sigmoid, &mut rng).unwrap();
        restored.load(&json).unwrap();

        assert_eq!(restored.weights(), original.weights());
        assert_eq!(restored.biases(), original.biases());
    }

    #[test]
    fn test_load_keeps_activation() {
        let mut rng = StdRng::seed_from_u64(3);
        let source = Network::new(&[2, 2], Activation::Sigmoid, &mut rng).unwrap();
        let mut target = Network::new(&[2, 2], Activation::Tanh, &mut rng).unwrap();

        target.load(&source.save().unwrap()).unwrap();
        assert_eq!(target.activation(), Activation::Tanh);
    }

    #[test]
    fn test_failed_load_leaves_network_unchanged() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut network = Network::new(&[3, 2], Activation::Sigmoid, &mut rng).unwrap();
        let before = network.clone();

        let bad = r#"{"weights":[[[1.0,2.0]]],"biases":[[1.0,2.0]]}"#;
        let result = network.load(bad);

        assert!(matches!(result, Err(NetworkError::InvalidConfiguration(_))));
        assert_eq!(network, before);
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut network = Network::new(&[3, 2], Activation::Sigmoid, &mut rng).unwrap();

        let result = network.load("{\"weights\": ");
        assert!(matches!(result, Err(NetworkError::Json(_))));
    }
}
