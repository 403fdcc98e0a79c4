//! Labeled-table loading and train/test splitting.
//!
//! The training input is a CSV table with a header row carrying the seven
//! feature columns plus a categorical `label` column. Column lookup is by
//! name, so extra columns and arbitrary column order are tolerated.
use std::collections::HashMap;
use std::path::Path;

use csv::StringRecord;
use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::CropcastError;

/// Fixed feature order every model in this crate is trained and served on.
pub const FEATURE_NAMES: [&str; 7] = [
    "N",
    "P",
    "K",
    "temperature",
    "humidity",
    "ph",
    "rainfall",
];

/// Name of the categorical target column in the training table.
pub const LABEL_COLUMN: &str = "label";

/// Parsed training data ready for model fitting.
///
/// `y` holds label-encoded targets indexing into `labels`, which is the
/// sorted crop vocabulary determined at load time.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub x: Array2<f32>,
    pub y: Vec<usize>,
    pub labels: Vec<String>,
}

impl Dataset {
    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    pub fn n_classes(&self) -> usize {
        self.labels.len()
    }

    /// New dataset containing only the given rows. The label vocabulary is
    /// retained as-is so encoded targets stay valid across subsets.
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            x: self.x.select(Axis(0), indices),
            y: indices.iter().map(|&i| self.y[i]).collect(),
            labels: self.labels.clone(),
        }
    }
}

/// Read a labeled CSV table into a `Dataset`.
///
/// Fails with `CropcastError::DataFormat` when the label column or any of
/// the seven feature columns is missing, a feature value does not parse as
/// a finite number, or fewer than 2 distinct labels are present.
pub fn read_labeled_csv<P: AsRef<Path>>(path: P) -> Result<Dataset, CropcastError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(&path)
        .map_err(|e| {
            CropcastError::DataFormat(format!(
                "Failed to open {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

    let headers = reader
        .headers()
        .map_err(|e| CropcastError::DataFormat(format!("Failed to read header row: {}", e)))?
        .clone();

    let label_idx = find_column(&headers, LABEL_COLUMN)
        .ok_or_else(|| CropcastError::DataFormat(format!("Missing '{}' column", LABEL_COLUMN)))?;

    let feature_indices = FEATURE_NAMES
        .iter()
        .map(|name| {
            find_column(&headers, name).ok_or_else(|| {
                CropcastError::DataFormat(format!("Missing feature column '{}'", name))
            })
        })
        .collect::<Result<Vec<usize>, CropcastError>>()?;

    let mut features = Vec::new();
    let mut raw_labels = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            CropcastError::DataFormat(format!("Failed to read row {}: {}", row_idx + 1, e))
        })?;

        for (&col_idx, name) in feature_indices.iter().zip(FEATURE_NAMES.iter()) {
            let raw = record.get(col_idx).ok_or_else(|| {
                CropcastError::DataFormat(format!(
                    "Missing value for '{}' at row {}",
                    name,
                    row_idx + 1
                ))
            })?;
            let value = raw.parse::<f32>().map_err(|_| {
                CropcastError::DataFormat(format!(
                    "Non-numeric value '{}' for '{}' at row {}",
                    raw,
                    name,
                    row_idx + 1
                ))
            })?;
            if !value.is_finite() {
                return Err(CropcastError::DataFormat(format!(
                    "Non-finite value for '{}' at row {}",
                    name,
                    row_idx + 1
                )));
            }
            features.push(value);
        }

        let label = record.get(label_idx).unwrap_or("").to_string();
        if label.is_empty() {
            return Err(CropcastError::DataFormat(format!(
                "Empty label at row {}",
                row_idx + 1
            )));
        }
        raw_labels.push(label);
    }

    let mut labels: Vec<String> = raw_labels.clone();
    labels.sort_unstable();
    labels.dedup();
    if labels.len() < 2 {
        return Err(CropcastError::DataFormat(format!(
            "At least 2 distinct labels are required, found {}",
            labels.len()
        )));
    }

    let label_index: HashMap<&str, usize> = labels
        .iter()
        .enumerate()
        .map(|(idx, label)| (label.as_str(), idx))
        .collect();
    let y: Vec<usize> = raw_labels
        .iter()
        .map(|label| label_index[label.as_str()])
        .collect();

    let n_rows = y.len();
    let x = Array2::from_shape_vec((n_rows, FEATURE_NAMES.len()), features)
        .map_err(|e| CropcastError::DataFormat(format!("Malformed feature matrix: {}", e)))?;

    Ok(Dataset { x, y, labels })
}

/// Split row indices into (train, test) with a seeded deterministic shuffle,
/// stratified so each label keeps its proportion across the split.
///
/// Every class contributes at least one test row and keeps at least one
/// training row. Fails with `CropcastError::InsufficientData` when a class
/// has fewer than 2 samples.
pub fn stratified_split(
    dataset: &Dataset,
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>), CropcastError> {
    assert!(
        test_fraction > 0.0 && test_fraction < 1.0,
        "test fraction must be in (0, 1)"
    );

    let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); dataset.n_classes()];
    for (row, &class_idx) in dataset.y.iter().enumerate() {
        by_class[class_idx].push(row);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for (class_idx, mut indices) in by_class.into_iter().enumerate() {
        if indices.len() < 2 {
            return Err(CropcastError::InsufficientData(format!(
                "Class '{}' has {} sample(s); at least 2 are required for a stratified split",
                dataset.labels[class_idx],
                indices.len()
            )));
        }
        indices.shuffle(&mut rng);
        let n_test = ((indices.len() as f64 * test_fraction).round() as usize)
            .clamp(1, indices.len() - 1);
        test.extend_from_slice(&indices[..n_test]);
        train.extend_from_slice(&indices[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    Ok((train, test))
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|header| header.eq_ignore_ascii_case(name))
}
