use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{ModelConfig, ModelType};
use crate::error::CropcastError;
use crate::models::classifier_trait::CropClassifier;

/// One-vs-rest ensemble of binary gradient-boosted decision trees.
///
/// The `gbdt` crate trains binary models, so the multi-class probability
/// mapping is composed from one learner per crop label. Each learner is
/// trained with +1 for its own class and -1 for the rest ("LogLikelyhood"
/// loss), and the per-class probabilities are renormalized to sum to 1.
#[derive(Serialize, Deserialize)]
pub struct OneVsRestGbdt {
    config: ModelConfig,
    labels: Vec<String>,
    learners: Vec<GBDT>,
}

impl OneVsRestGbdt {
    pub fn new(config: ModelConfig) -> Self {
        OneVsRestGbdt {
            config,
            labels: Vec::new(),
            learners: Vec::new(),
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn fit_binary(config: &ModelConfig, x: &Array2<f32>, y: &[usize], class_idx: usize) -> GBDT {
        let ModelType::Gbdt {
            max_depth,
            num_boost_round,
            debug,
            training_optimization_level,
            loss_type,
        } = &config.model_type;

        let mut gbdt_config = Config::new();
        gbdt_config.set_feature_size(x.ncols());
        gbdt_config.set_shrinkage(config.learning_rate);
        gbdt_config.set_max_depth(*max_depth);
        gbdt_config.set_iterations(*num_boost_round as usize);
        gbdt_config.set_debug(*debug);
        gbdt_config.set_training_optimization_level(*training_optimization_level);
        gbdt_config.set_loss(loss_type);

        let mut train_x = DataVec::new();
        for row in 0..x.nrows() {
            // +1 for this learner's class, -1 for the rest
            let target = if y[row] == class_idx { 1.0 } else { -1.0 };
            train_x.push(Data::new_training_data(x.row(row).to_vec(), 1.0, target, None));
        }

        let mut learner = GBDT::new(&gbdt_config);
        learner.fit(&mut train_x);
        learner
    }
}

impl CropClassifier for OneVsRestGbdt {
    fn fit(
        &mut self,
        x: &Array2<f32>,
        y: &[usize],
        labels: &[String],
    ) -> Result<(), CropcastError> {
        if y.len() != x.nrows() {
            return Err(CropcastError::InvalidInput(format!(
                "Feature matrix has {} rows but {} targets were given",
                x.nrows(),
                y.len()
            )));
        }
        if labels.len() < 2 {
            return Err(CropcastError::InsufficientData(format!(
                "At least 2 classes are required to fit, got {}",
                labels.len()
            )));
        }

        log::debug!(
            "Fitting {} one-vs-rest learners on {} samples",
            labels.len(),
            x.nrows()
        );

        let config = self.config.clone();
        let learners: Vec<GBDT> = (0..labels.len())
            .into_par_iter()
            .map(|class_idx| Self::fit_binary(&config, x, y, class_idx))
            .collect();

        self.labels = labels.to_vec();
        self.learners = learners;
        Ok(())
    }

    fn predict_proba(&self, x: &Array2<f32>) -> Array2<f32> {
        let mut batch = DataVec::new();
        for row in 0..x.nrows() {
            batch.push(Data::new_training_data(x.row(row).to_vec(), 1.0, 0.0, None));
        }

        let mut proba = Array2::<f32>::zeros((x.nrows(), self.learners.len()));
        for (class_idx, learner) in self.learners.iter().enumerate() {
            let scores = learner.predict(&batch);
            for (row, &score) in scores.iter().enumerate() {
                proba[(row, class_idx)] = score.clamp(0.0, 1.0);
            }
        }

        // Renormalize rows so the per-class outputs form a distribution; a
        // degenerate all-zero row falls back to uniform.
        for mut row in proba.rows_mut() {
            let sum: f32 = row.sum();
            if sum > 0.0 {
                row.mapv_inplace(|v| v / sum);
            } else {
                let uniform = 1.0 / row.len() as f32;
                row.fill(uniform);
            }
        }

        proba
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn name(&self) -> &str {
        "one-vs-rest gbdt"
    }
}
