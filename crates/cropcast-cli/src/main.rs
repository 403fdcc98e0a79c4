use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use serde::Serialize;
use std::path::PathBuf;

use cropcast_core::config::ModelConfig;
use cropcast_core::dataset::{read_labeled_csv, FEATURE_NAMES};
use cropcast_core::error::CropcastError;
use cropcast_core::metrics::format_confusion;
use cropcast_core::recommend::{FeatureVector, Recommendation, Recommender};
use cropcast_core::store::{save_model, DEFAULT_MODEL_FILE};
use cropcast_core::training::train_model;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("CROPCAST_LOG", "error,cropcast=info"))
        .init();

    let matches = Command::new("cropcast")
        .version(clap::crate_version!())
        .about("\u{1F33E} Cropcast - crop recommendations from soil and climate measurements")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("train")
                .about("Train a crop classifier from a labeled CSV table")
                .arg(
                    Arg::new("data")
                        .help("Path to the labeled training CSV (7 feature columns plus 'label')")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("File path the serialized model will be written to")
                        .default_value(DEFAULT_MODEL_FILE)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help("Path to a JSON model configuration overriding the defaults")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("predict")
                .about("Predict the top 3 crops and print a JSON envelope on stdout")
                .arg(
                    Arg::new("model")
                        .short('m')
                        .long("model")
                        .help("Path to the trained model file")
                        .default_value(DEFAULT_MODEL_FILE)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("features")
                        .help("Exactly 7 numeric values: N P K temperature humidity ph rainfall")
                        .num_args(0..)
                        .allow_hyphen_values(true)
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                ),
        )
        .subcommand(
            Command::new("recommend")
                .about("Print ranked crop recommendations as text")
                .arg(
                    Arg::new("model")
                        .short('m')
                        .long("model")
                        .help("Path to the trained model file")
                        .default_value(DEFAULT_MODEL_FILE)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(numeric_flag("n", "Nitrogen index (N)", "50"))
                .arg(numeric_flag("p", "Phosphorus index (P)", "50"))
                .arg(numeric_flag("k", "Potassium index (K)", "50"))
                .arg(numeric_flag("temperature", "Temperature in \u{00B0}C", "25.0"))
                .arg(numeric_flag("humidity", "Relative humidity in %", "70.0"))
                .arg(numeric_flag("ph", "Soil pH", "6.5"))
                .arg(numeric_flag("rainfall", "Rainfall in mm", "150.0")),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    match matches.subcommand() {
        Some(("train", sub_m)) => handle_train(sub_m),
        Some(("predict", sub_m)) => handle_predict(sub_m),
        Some(("recommend", sub_m)) => handle_recommend(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn numeric_flag(name: &'static str, help: &'static str, default: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .default_value(default)
        .allow_hyphen_values(true)
        .value_parser(clap::value_parser!(f64))
        .value_hint(ValueHint::Other)
}

// ---------------------------------------------------------------------------
// train
// ---------------------------------------------------------------------------

fn handle_train(matches: &ArgMatches) -> Result<()> {
    let data_path: &PathBuf = matches.get_one("data").unwrap();
    let output_path: &PathBuf = matches.get_one("output").unwrap();

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => load_model_config(path)?,
        None => ModelConfig::default(),
    };

    log::info!("[Cropcast::Train] Training from {:?}", data_path);
    match run_train(data_path, output_path, &config) {
        Ok(()) => Ok(()),
        Err(e) => {
            log::error!("Training failed: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn load_model_config(path: &PathBuf) -> Result<ModelConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config: ModelConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    Ok(config)
}

fn run_train(data_path: &PathBuf, output_path: &PathBuf, config: &ModelConfig) -> Result<()> {
    let dataset = read_labeled_csv(data_path)?;
    let outcome = train_model(&dataset, config)?;

    println!("Accuracy: {:.2}", outcome.evaluation.accuracy * 100.0);
    println!(
        "Confusion Matrix:\n{}",
        format_confusion(&outcome.evaluation.confusion, &dataset.labels)
    );
    println!("Classification Report:\n{}", outcome.evaluation.report);

    save_model(&outcome.model, output_path)?;
    println!("Model saved to {}", output_path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// predict
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct PredictEnvelope {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    recommendations: Option<Vec<Recommendation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn handle_predict(matches: &ArgMatches) -> Result<()> {
    let model_path: &PathBuf = matches.get_one("model").unwrap();
    let raw: Vec<String> = matches
        .get_many::<String>("features")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    match run_predict(model_path, &raw) {
        Ok(recommendations) => {
            let envelope = PredictEnvelope {
                success: true,
                recommendations: Some(recommendations),
                error: None,
            };
            println!("{}", serde_json::to_string(&envelope)?);
            Ok(())
        }
        Err(err) => {
            let envelope = PredictEnvelope {
                success: false,
                recommendations: None,
                error: Some(err.to_string()),
            };
            // stdout stays a single valid JSON object; the non-zero status
            // makes failures scriptable without parsing it
            println!("{}", serde_json::to_string(&envelope)?);
            std::process::exit(1)
        }
    }
}

fn run_predict(model_path: &PathBuf, raw: &[String]) -> Result<Vec<Recommendation>, CropcastError> {
    let values = parse_features(raw)?;
    let features = FeatureVector::from_slice(&values)?;
    let recommender = Recommender::from_path(model_path)?;
    Ok(recommender.predict_top3(&features))
}

fn parse_features(raw: &[String]) -> Result<Vec<f64>, CropcastError> {
    if raw.len() != FEATURE_NAMES.len() {
        return Err(CropcastError::InvalidInput(format!(
            "Expected {} features: {} (got {})",
            FEATURE_NAMES.len(),
            FEATURE_NAMES.join(", "),
            raw.len()
        )));
    }
    raw.iter()
        .zip(FEATURE_NAMES.iter())
        .map(|(value, name)| {
            value.parse::<f64>().map_err(|_| {
                CropcastError::InvalidInput(format!(
                    "Feature '{}' must be numeric, got '{}'",
                    name, value
                ))
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// recommend
// ---------------------------------------------------------------------------

fn handle_recommend(matches: &ArgMatches) -> Result<()> {
    let model_path: &PathBuf = matches.get_one("model").unwrap();
    let values: Vec<f64> = ["n", "p", "k", "temperature", "humidity", "ph", "rainfall"]
        .iter()
        .map(|name| *matches.get_one::<f64>(name).unwrap())
        .collect();

    match run_recommend(model_path, &values) {
        Ok(()) => Ok(()),
        Err(e) => {
            log::error!("Recommendation failed: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn run_recommend(model_path: &PathBuf, values: &[f64]) -> Result<()> {
    let features = FeatureVector::from_slice(values)?;
    let recommender = Recommender::from_path(model_path)?;
    let recommendations = recommender.predict_top3(&features);

    println!("Top {} recommended crops:", recommendations.len());
    for (rank, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} \u{2014} {:.2}% probability",
            rank + 1,
            rec.crop.to_uppercase(),
            rec.probability
        );
    }
    Ok(())
}
