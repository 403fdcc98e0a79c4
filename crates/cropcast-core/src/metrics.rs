//! Held-out evaluation metrics reported by the training pipeline.
//!
//! These are logged to the console after a training run and never
//! persisted.
use std::fmt;

use ndarray::Array2;

/// Fraction of predictions matching the true labels.
pub fn accuracy(y_true: &[usize], y_pred: &[usize]) -> f64 {
    assert_eq!(
        y_true.len(),
        y_pred.len(),
        "accuracy requires arrays of equal length"
    );
    if y_true.is_empty() {
        return 0.0;
    }
    let hits = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    hits as f64 / y_true.len() as f64
}

/// Confusion matrix with true classes on rows and predicted classes on
/// columns.
pub fn confusion_matrix(y_true: &[usize], y_pred: &[usize], n_classes: usize) -> Array2<u64> {
    assert_eq!(
        y_true.len(),
        y_pred.len(),
        "confusion matrix requires arrays of equal length"
    );
    let mut matrix = Array2::<u64>::zeros((n_classes, n_classes));
    for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
        matrix[(t, p)] += 1;
    }
    matrix
}

/// Per-class precision/recall/F1 plus support.
#[derive(Debug, Clone)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: u64,
}

/// Per-class metrics for a held-out evaluation, printable as a console
/// table.
#[derive(Debug, Clone)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
}

impl ClassificationReport {
    pub fn macro_precision(&self) -> f64 {
        mean(self.classes.iter().map(|c| c.precision))
    }

    pub fn macro_recall(&self) -> f64 {
        mean(self.classes.iter().map(|c| c.recall))
    }

    pub fn macro_f1(&self) -> f64 {
        mean(self.classes.iter().map(|c| c.f1))
    }
}

/// Compute per-class precision, recall and F1 from predictions.
pub fn classification_report(
    y_true: &[usize],
    y_pred: &[usize],
    labels: &[String],
) -> ClassificationReport {
    let matrix = confusion_matrix(y_true, y_pred, labels.len());

    let classes = labels
        .iter()
        .enumerate()
        .map(|(idx, label)| {
            let tp = matrix[(idx, idx)];
            let support: u64 = matrix.row(idx).sum();
            let predicted: u64 = matrix.column(idx).sum();

            let precision = ratio(tp, predicted);
            let recall = ratio(tp, support);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };

            ClassMetrics {
                label: label.clone(),
                precision,
                recall,
                f1,
                support,
            }
        })
        .collect();

    ClassificationReport { classes }
}

/// Render a confusion matrix with class labels on both axes.
pub fn format_confusion(matrix: &Array2<u64>, labels: &[String]) -> String {
    let width = labels
        .iter()
        .map(|l| l.len())
        .max()
        .unwrap_or(0)
        .max(6);

    let mut out = String::new();
    out.push_str(&format!("{:>width$}", "", width = width + 1));
    for label in labels {
        out.push_str(&format!(" {:>width$}", label, width = width));
    }
    out.push('\n');
    for (idx, label) in labels.iter().enumerate() {
        out.push_str(&format!("{:>width$} ", label, width = width + 1));
        for col in 0..labels.len() {
            out.push_str(&format!(" {:>width$}", matrix[(idx, col)], width = width));
        }
        out.push('\n');
    }
    out
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|c| c.label.len())
            .max()
            .unwrap_or(0)
            .max(9);

        writeln!(
            f,
            "{:>width$}  precision  recall  f1-score  support",
            "",
            width = width
        )?;
        for class in &self.classes {
            writeln!(
                f,
                "{:>width$}  {:>9.2}  {:>6.2}  {:>8.2}  {:>7}",
                class.label,
                class.precision,
                class.recall,
                class.f1,
                class.support,
                width = width
            )?;
        }
        writeln!(
            f,
            "{:>width$}  {:>9.2}  {:>6.2}  {:>8.2}  {:>7}",
            "macro avg",
            self.macro_precision(),
            self.macro_recall(),
            self.macro_f1(),
            self.classes.iter().map(|c| c.support).sum::<u64>(),
            width = width
        )
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let collected: Vec<f64> = values.collect();
    if collected.is_empty() {
        return 0.0;
    }
    collected.iter().sum::<f64>() / collected.len() as f64
}
