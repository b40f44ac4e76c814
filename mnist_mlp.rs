use digit_net::config::{load_config, TrainingConfig};
use digit_net::dataset::{self, NUM_INPUTS, NUM_OUTPUTS};
use digit_net::{Backpropagation, LearningAlgorithm, Network, NetworkError, Record};
use getopts::Options;
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::env;
use std::process;
use std::time::Instant;

// Per-example backpropagation on the pixel-CSV digit dataset.
// Trains until the test-set RMSE reaches the configured threshold, then saves
// the parameters as JSON.

struct CliOptions {
    config: TrainingConfig,
    load_path: Option<String>,
}

fn usage(program: &str, opts: &Options) -> String {
    let brief = format!("Usage: {} [options]", program);
    opts.usage(&brief)
}

fn build_options() -> Options {
    let mut opts = Options::new();
    opts.optopt("c", "config", "training configuration JSON", "FILE");
    opts.optopt(
        "l",
        "load",
        "resume from a saved network instead of random init",
        "FILE",
    );
    opts.optflag("h", "help", "print this help menu");
    opts
}

/// Parses command-line arguments into the run configuration.
///
/// Returns `Ok(None)` when help was requested.
fn parse_args(args: &[String]) -> Result<Option<CliOptions>, NetworkError> {
    let opts = build_options();
    let program = args.first().map_or("mnist_mlp", String::as_str);

    let matches = opts
        .parse(args.iter().skip(1))
        .map_err(|err| NetworkError::InvalidConfiguration(err.to_string()))?;

    if matches.opt_present("h") {
        println!("{}", usage(program, &opts));
        return Ok(None);
    }

    let config = match matches.opt_str("c") {
        Some(path) => load_config(path)?,
        None => TrainingConfig::default(),
    };

    Ok(Some(CliOptions {
        config,
        load_path: matches.opt_str("l"),
    }))
}

fn check_topology(network: &Network) -> Result<(), NetworkError> {
    if network.input_size() != NUM_INPUTS || network.output_size() != NUM_OUTPUTS {
        return Err(NetworkError::InvalidConfiguration(format!(
            "network {:?} does not fit {} pixel inputs and {} digit outputs",
            network.layer_sizes(),
            NUM_INPUTS,
            NUM_OUTPUTS
        )));
    }
    Ok(())
}

fn load_dataset(path: &str) -> Result<Vec<Record>, NetworkError> {
    let records = dataset::decode_file(path)?;
    if records.is_empty() {
        return Err(NetworkError::InvalidConfiguration(format!(
            "dataset {} has no records",
            path
        )));
    }
    Ok(records)
}

/// Trains until the test error drops to the threshold or `max_epochs` is reached.
///
/// Returns the number of epochs run and the last test error.
fn train_until_converged<A: LearningAlgorithm>(
    algorithm: &mut A,
    train_set: &[Record],
    test_set: &[Record],
    config: &TrainingConfig,
) -> (usize, f64) {
    let mut epoch = 0usize;
    loop {
        epoch += 1;
        let start_time = Instant::now();
        let error = algorithm.train_and_evaluate(train_set, test_set);
        let duration = start_time.elapsed().as_secs_f32();

        println!("Epoch {}, Error: {:.6} Time: {:.6}", epoch, error, duration);

        if error <= config.convergence_threshold {
            info!(
                "Converged after {} epochs (threshold {})",
                epoch, config.convergence_threshold
            );
            return (epoch, error);
        }

        if let Some(max_epochs) = config.max_epochs {
            if epoch >= max_epochs {
                warn!(
                    "Stopped after {} epochs without reaching threshold {}",
                    epoch, config.convergence_threshold
                );
                return (epoch, error);
            }
        }
    }
}

fn run(options: CliOptions) -> Result<(), NetworkError> {
    let program_start = Instant::now();
    let config = options.config;

    println!("Loading training data...");
    let load_start = Instant::now();
    let train_set = load_dataset(&config.train_path)?;

    println!("Loading test data...");
    let test_set = load_dataset(&config.test_path)?;
    let load_time = load_start.elapsed().as_secs_f64();
    println!("Data loading time: {:.2} seconds", load_time);
    info!(
        "{} training records, {} test records",
        train_set.len(),
        test_set.len()
    );

    println!("Initializing neural network...");
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut network = match options.load_path {
        Some(ref path) => Network::load_from_file(path, config.activation)?,
        None => Network::new(&config.layer_sizes, config.activation, &mut rng)?,
    };
    check_topology(&network)?;
    info!(
        "Network {:?} with {} activation, {} parameters",
        network.layer_sizes(),
        network.activation(),
        network.parameter_count()
    );

    println!("Training neural network...");
    let train_start = Instant::now();
    let mut algorithm = Backpropagation::new(&mut network, rng);
    let (epochs, error) = train_until_converged(&mut algorithm, &train_set, &test_set, &config);
    let train_time = train_start.elapsed().as_secs_f64();
    println!("Total training time: {:.2} seconds", train_time);

    println!("Testing neural network...");
    let test_start = Instant::now();
    let accuracy = algorithm.accuracy(&test_set) * 100.0;
    println!("Test Accuracy: {:.2}%", accuracy);
    let test_time = test_start.elapsed().as_secs_f64();
    println!("Testing time: {:.2} seconds", test_time);

    println!("Saving model...");
    network.save_to_file(&config.model_path)?;
    println!("Model saved to {}", config.model_path);

    let total_time = program_start.elapsed().as_secs_f64();
    println!("\n=== Performance Summary ===");
    println!("Epochs: {}", epochs);
    println!("Final test error: {:.6}", error);
    println!("Data loading time: {:.2} seconds", load_time);
    println!("Total training time: {:.2} seconds", train_time);
    println!("Testing time: {:.2} seconds", test_time);
    println!("Total program time: {:.2} seconds", total_time);
    println!("========================");

    Ok(())
}

fn main() {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(Some(options)) => options,
        Ok(None) => return,
        Err(err) => {
            error!("{}", err);
            let program = args.first().map_or("mnist_mlp", String::as_str);
            eprintln!("{}", usage(program, &build_options()));
            process::exit(2);
        }
    };

    if let Err(err) = run(options) {
        error!("{}", err);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use digit_net::Activation;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_defaults() {
        let options = parse_args(&args(&["mnist_mlp"])).unwrap().unwrap();
        assert_eq!(options.config, TrainingConfig::default());
        assert!(options.load_path.is_none());
    }

    #[test]
    fn test_parse_args_help() {
        assert!(parse_args(&args(&["mnist_mlp", "-h"])).unwrap().is_none());
    }

    #[test]
    fn test_parse_args_config_and_load() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"activation": "tanh", "max_epochs": 3}"#)
            .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let options = parse_args(&args(&["mnist_mlp", "-c", &path, "--load", "net.json"]))
            .unwrap()
            .unwrap();

        assert_eq!(options.config.activation, Activation::Tanh);
        assert_eq!(options.config.max_epochs, Some(3));
        assert_eq!(options.load_path.as_deref(), Some("net.json"));
    }

    #[test]
    fn test_parse_args_unknown_flag() {
        let result = parse_args(&args(&["mnist_mlp", "--bogus"]));
        assert!(matches!(result, Err(NetworkError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_check_topology() {
        let mut rng = StdRng::seed_from_u64(1);
        let good =
            Network::new(&[NUM_INPUTS, 4, NUM_OUTPUTS], Activation::Sigmoid, &mut rng).unwrap();
        let bad = Network::new(&[3, 2], Activation::Sigmoid, &mut rng).unwrap();

        assert!(check_topology(&good).is_ok());
        assert!(check_topology(&bad).is_err());
    }

    #[test]
    fn test_train_until_converged_respects_max_epochs() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut network = Network::new(&[2, 2], Activation::Sigmoid, &mut rng).unwrap();
        let records = vec![Record::new(vec![0.0, 1.0], vec![1.0, 0.0])];
        let config = TrainingConfig {
            convergence_threshold: 1e-300,
            max_epochs: Some(2),
            ..TrainingConfig::default()
        };

        let mut algorithm = Backpropagation::new(&mut network, rng);
        let (epochs, _) = train_until_converged(&mut algorithm, &records, &records, &config);
        assert_eq!(epochs, 2);
    }
}
