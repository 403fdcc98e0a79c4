//! Top-3 crop recommendation over a loaded classifier.
use std::cmp::Ordering;
use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::dataset::FEATURE_NAMES;
use crate::error::CropcastError;
use crate::models::CropClassifier;
use crate::store::{self, CropModel};

/// Number of recommendations returned per request.
pub const TOP_K: usize = 3;

/// Validated prediction request: exactly 7 finite values in the fixed order
/// `[N, P, K, temperature, humidity, ph, rainfall]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector([f32; 7]);

impl FeatureVector {
    /// Validate a raw slice into a feature vector. Wrong length or a
    /// non-finite value is `CropcastError::InvalidInput`; input is never
    /// truncated or padded.
    pub fn from_slice(values: &[f64]) -> Result<Self, CropcastError> {
        if values.len() != FEATURE_NAMES.len() {
            return Err(CropcastError::InvalidInput(format!(
                "Expected {} features: {} (got {})",
                FEATURE_NAMES.len(),
                FEATURE_NAMES.join(", "),
                values.len()
            )));
        }
        let mut out = [0.0f32; 7];
        for (idx, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(CropcastError::InvalidInput(format!(
                    "Feature '{}' must be a finite number, got {}",
                    FEATURE_NAMES[idx], value
                )));
            }
            out[idx] = value as f32;
        }
        Ok(FeatureVector(out))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

/// One ranked crop recommendation. `probability` is a percentage in
/// [0, 100] rounded to 2 decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub crop: String,
    pub probability: f64,
}

/// Rank per-class probabilities into a descending top-k list.
///
/// Ties are broken lexicographically by label, so the ordering never
/// depends on the classifier's internal class order. Returns fewer than `k`
/// entries only when fewer classes exist.
pub fn rank_recommendations(labels: &[String], proba: &[f32], k: usize) -> Vec<Recommendation> {
    let mut ranked: Vec<(usize, f32)> = proba.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| labels[a.0].cmp(&labels[b.0]))
    });

    ranked
        .into_iter()
        .take(k)
        .map(|(idx, p)| Recommendation {
            crop: labels[idx].clone(),
            probability: round2(f64::from(p) * 100.0),
        })
        .collect()
}

/// Serving-side recommendation service over a loaded, read-only model.
///
/// Construct once at process startup and share by read-only reference;
/// prediction holds no mutable state.
pub struct Recommender {
    model: CropModel,
}

impl Recommender {
    pub fn new(model: CropModel) -> Self {
        Recommender { model }
    }

    /// Load the persisted model. Failure here is fatal for the caller.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CropcastError> {
        Ok(Recommender::new(store::load_model(path)?))
    }

    pub fn labels(&self) -> &[String] {
        self.model.classifier.labels()
    }

    /// Top-3 recommendations for one request, sorted by descending
    /// percentage. Deterministic for a given loaded model.
    pub fn predict_top3(&self, features: &FeatureVector) -> Vec<Recommendation> {
        let x = Array2::from_shape_vec((1, FEATURE_NAMES.len()), features.as_slice().to_vec())
            .expect("feature vector length is fixed at construction");
        let proba = self.model.classifier.predict_proba(&x);
        let row = proba.row(0).to_vec();
        rank_recommendations(self.labels(), &row, TOP_K)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
