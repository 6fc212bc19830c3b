//! Evaluation metrics for classification models.

use super::{Classifier, TrainDataset};

#[derive(Debug, Clone, PartialEq)]
/// Confusion matrix for a `K`-class classifier.
pub struct ConfusionMatrix {
    /// Number of classes.
    pub n_classes: usize,
    /// Row-major `KxK` counts (`truth * K + predicted`).
    pub counts: Vec<u32>,
}

impl ConfusionMatrix {
    /// Create an empty `KxK` confusion matrix.
    pub fn new(n_classes: usize) -> Self {
        Self {
            n_classes,
            counts: vec![0; n_classes * n_classes],
        }
    }

    pub fn add(&mut self, truth: usize, predicted: usize) {
        if truth >= self.n_classes || predicted >= self.n_classes {
            return;
        }
        let idx = truth * self.n_classes + predicted;
        self.counts[idx] = self.counts[idx].saturating_add(1);
    }

    pub fn get(&self, truth: usize, predicted: usize) -> u32 {
        self.counts[truth * self.n_classes + predicted]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Precision/recall statistics for a single class.
pub struct PerClassStats {
    /// `TP / (TP + FP)`.
    pub precision: f32,
    /// `TP / (TP + FN)`.
    pub recall: f32,
    /// Harmonic mean of precision and recall.
    pub f1: f32,
    /// Total number of true examples for the class.
    pub support: u32,
}

/// Holdout evaluation of a fitted model.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub accuracy: f32,
    pub confusion: ConfusionMatrix,
    pub per_class: Vec<PerClassStats>,
}

/// Predict every row of `dataset` and tally the results.
pub fn evaluate(model: &dyn Classifier, dataset: &TrainDataset) -> Evaluation {
    let mut confusion = ConfusionMatrix::new(model.classes().len());
    for (row, &truth) in dataset.x.iter().zip(dataset.y.iter()) {
        confusion.add(truth, model.predict_class_index(row));
    }
    Evaluation {
        accuracy: accuracy(&confusion),
        per_class: precision_recall_by_class(&confusion),
        confusion,
    }
}

/// Compute per-class precision and recall from a confusion matrix.
pub fn precision_recall_by_class(cm: &ConfusionMatrix) -> Vec<PerClassStats> {
    let k = cm.n_classes;
    (0..k)
        .map(|class_idx| {
            let tp = cm.get(class_idx, class_idx) as f32;
            let support: u32 = (0..k).map(|j| cm.get(class_idx, j)).sum();
            let predicted: u32 = (0..k).map(|i| cm.get(i, class_idx)).sum();
            let precision = if predicted == 0 { 0.0 } else { tp / predicted as f32 };
            let recall = if support == 0 { 0.0 } else { tp / support as f32 };
            let f1 = if precision + recall == 0.0 {
                0.0
            } else {
                2.0 * precision * recall / (precision + recall)
            };
            PerClassStats {
                precision,
                recall,
                f1,
                support,
            }
        })
        .collect()
}

/// Compute overall accuracy from a confusion matrix.
pub fn accuracy(cm: &ConfusionMatrix) -> f32 {
    let total = cm.total();
    if total == 0 {
        return 0.0;
    }
    let correct: u64 = (0..cm.n_classes).map(|i| cm.get(i, i) as u64).sum();
    correct as f32 / total as f32
}
