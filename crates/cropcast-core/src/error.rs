use std::error::Error;
use std::fmt;

/// Error taxonomy for the recommendation system.
///
/// `ModelLoad` is fatal for a serving process; `InvalidInput` is per-request
/// and must leave the service available; the remaining variants abort an
/// offline training run.
#[derive(Debug)]
pub enum CropcastError {
    /// The persisted model could not be read or deserialized.
    ModelLoad(String),
    /// A prediction request carried a malformed feature vector.
    InvalidInput(String),
    /// The training table is malformed (missing columns, non-numeric values).
    DataFormat(String),
    /// A stratified split is impossible (a class has too few samples).
    InsufficientData(String),
}

impl fmt::Display for CropcastError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CropcastError::ModelLoad(msg) => write!(f, "Failed to load model: {}", msg),
            CropcastError::InvalidInput(msg) => write!(f, "{}", msg),
            CropcastError::DataFormat(msg) => write!(f, "Invalid training data: {}", msg),
            CropcastError::InsufficientData(msg) => write!(f, "Insufficient training data: {}", msg),
        }
    }
}

impl Error for CropcastError {}
