use crate::config::{ModelConfig, ModelType};
use crate::models::gbdt::OneVsRestGbdt;

/// Build a classifier from a `ModelConfig`.
///
/// The return type is concrete because the model store serializes the
/// classifier; the serving side still goes through the `CropClassifier`
/// trait.
pub fn build_classifier(config: &ModelConfig) -> OneVsRestGbdt {
    match config.model_type {
        ModelType::Gbdt { .. } => OneVsRestGbdt::new(config.clone()),
    }
}
