pub mod gbdt;

pub mod classifier_trait;
pub mod factory;

pub use classifier_trait::CropClassifier;
pub use gbdt::OneVsRestGbdt;
