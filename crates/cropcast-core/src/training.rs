//! Offline training pipeline: split, fit, evaluate, hand back the artifact.
use std::cmp::Ordering;

use ndarray::Array2;

use crate::config::ModelConfig;
use crate::dataset::{stratified_split, Dataset};
use crate::error::CropcastError;
use crate::metrics::{accuracy, classification_report, confusion_matrix, ClassificationReport};
use crate::models::factory::build_classifier;
use crate::models::CropClassifier;
use crate::store::CropModel;

/// Fixed seed for the train/test shuffle so runs are reproducible.
pub const SPLIT_SEED: u64 = 42;

/// Share of rows held out for evaluation.
pub const TEST_FRACTION: f64 = 0.2;

/// Held-out evaluation of a freshly trained model.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub accuracy: f64,
    pub confusion: Array2<u64>,
    pub report: ClassificationReport,
}

/// A fitted model plus its held-out evaluation. Nothing is persisted here;
/// the caller decides whether the artifact is written.
pub struct TrainOutcome {
    pub model: CropModel,
    pub evaluation: Evaluation,
}

/// Train a classifier on 80% of the data and evaluate it on the rest.
///
/// The split is stratified per label with a seeded shuffle, so repeated
/// runs over the same table produce the same model and metrics.
pub fn train_model(
    dataset: &Dataset,
    config: &ModelConfig,
) -> Result<TrainOutcome, CropcastError> {
    let (train_idx, test_idx) = stratified_split(dataset, TEST_FRACTION, SPLIT_SEED)?;
    log::info!(
        "Training on {} samples, evaluating on {} held-out samples ({} classes)",
        train_idx.len(),
        test_idx.len(),
        dataset.n_classes()
    );

    let train = dataset.select(&train_idx);
    let test = dataset.select(&test_idx);

    let mut classifier = build_classifier(config);
    classifier.fit(&train.x, &train.y, &dataset.labels)?;

    let proba = classifier.predict_proba(&test.x);
    let y_pred: Vec<usize> = proba
        .rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(Ordering::Equal))
                .map(|(idx, _)| idx)
                .unwrap_or(0)
        })
        .collect();

    let evaluation = Evaluation {
        accuracy: accuracy(&test.y, &y_pred),
        confusion: confusion_matrix(&test.y, &y_pred, dataset.n_classes()),
        report: classification_report(&test.y, &y_pred, &dataset.labels),
    };
    log::info!(
        "Held-out accuracy: {:.2}%",
        evaluation.accuracy * 100.0
    );

    Ok(TrainOutcome {
        model: CropModel::new(classifier),
        evaluation,
    })
}
