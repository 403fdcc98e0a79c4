//! Persistence boundary for trained models.
//!
//! The artifact is a single JSON file holding the label vocabulary, the
//! feature order the model was trained on, and the serialized learners. The
//! format is tied to the `gbdt` crate's serde representation and is not a
//! portable interchange format; train-time and serve-time builds must use
//! the same crate version.
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::dataset::FEATURE_NAMES;
use crate::error::CropcastError;
use crate::models::OneVsRestGbdt;

/// Conventional artifact name written by the training pipeline.
pub const DEFAULT_MODEL_FILE: &str = "crop_model.json";

/// Serialized model artifact: classifier plus the metadata needed to guard
/// against train/serve skew.
#[derive(Serialize, Deserialize)]
pub struct CropModel {
    pub feature_names: Vec<String>,
    pub classifier: OneVsRestGbdt,
}

impl std::fmt::Debug for CropModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CropModel")
            .field("feature_names", &self.feature_names)
            .finish_non_exhaustive()
    }
}

impl CropModel {
    pub fn new(classifier: OneVsRestGbdt) -> Self {
        CropModel {
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            classifier,
        }
    }
}

/// Write the model artifact to disk.
pub fn save_model<P: AsRef<Path>>(model: &CropModel, path: P) -> Result<()> {
    let serialized = serde_json::to_string(model).context("Failed to serialize model")?;
    fs::write(&path, serialized).with_context(|| {
        format!("Failed to write model file: {}", path.as_ref().display())
    })?;
    log::info!("Model saved to {}", path.as_ref().display());
    Ok(())
}

/// Load a model artifact from disk.
///
/// Any read or deserialization failure, and any feature-order mismatch with
/// the serving build, is `CropcastError::ModelLoad` -- fatal for a serving
/// process.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<CropModel, CropcastError> {
    let content = fs::read_to_string(&path).map_err(|e| {
        CropcastError::ModelLoad(format!("{}: {}", path.as_ref().display(), e))
    })?;
    let model: CropModel = serde_json::from_str(&content).map_err(|e| {
        CropcastError::ModelLoad(format!("{}: {}", path.as_ref().display(), e))
    })?;

    if model.feature_names != FEATURE_NAMES {
        return Err(CropcastError::ModelLoad(format!(
            "Model was trained on features [{}] but this build serves [{}]",
            model.feature_names.join(", "),
            FEATURE_NAMES.join(", ")
        )));
    }

    Ok(model)
}
