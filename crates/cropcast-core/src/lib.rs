//! cropcast-core: training and serving for crop recommendations.
//!
//! This crate covers the full lifecycle of the recommendation system: loading
//! a labeled soil/climate table, fitting a one-vs-rest gradient-boosted tree
//! classifier, persisting it as a JSON artifact, and answering per-request
//! top-3 crop predictions from a loaded model.
//!
//! The tree learner itself comes from the `gbdt` crate; this crate only
//! composes binary learners into a multi-class probability mapping and
//! defines the contracts around it.
pub mod config;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod models;
pub mod recommend;
pub mod store;
pub mod training;
