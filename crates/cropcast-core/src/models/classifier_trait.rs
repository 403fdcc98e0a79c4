use ndarray::Array2;

use crate::error::CropcastError;

/// Contract every crop classifier in this crate satisfies. The
/// recommendation service only depends on this trait plus the persisted
/// artifact, so the tree learner behind it stays replaceable.
pub trait CropClassifier {
    /// Fit the model. `y` holds label-encoded targets indexing into
    /// `labels`, the sorted crop vocabulary for this training run.
    fn fit(&mut self, x: &Array2<f32>, y: &[usize], labels: &[String])
        -> Result<(), CropcastError>;

    /// Per-class probabilities, one row per input row, columns aligned with
    /// `labels()`. Each row is non-negative and sums to 1.
    fn predict_proba(&self, x: &Array2<f32>) -> Array2<f32>;

    /// The label vocabulary the model was fitted on, in column order.
    fn labels(&self) -> &[String];

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
