//! Nearest-centroid baseline.
//!
//! Predicts the class whose mean feature vector is closest after scaling each
//! feature by its standard deviation. It has no probability output, so the
//! predictor rejects it.

use serde::{Deserialize, Serialize};

use super::{Classifier, FitError, ModelKind, TrainDataset};

pub(crate) const CENTROID_MODEL_VERSION: i64 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestCentroidModel {
    pub model_version: i64,
    pub feature_names: Vec<String>,
    pub classes: Vec<String>,
    /// Shape: `[n_classes][n_features]`.
    pub centroids: Vec<Vec<f32>>,
    /// Training rows per class; classes with zero rows are never predicted.
    pub counts: Vec<usize>,
    /// Per-feature divisor applied before measuring distance.
    pub scale: Vec<f32>,
}

impl NearestCentroidModel {
    pub fn validate(&self) -> Result<(), String> {
        let k = self.classes.len();
        let d = self.feature_names.len();
        if k < 2 {
            return Err("Model must contain at least 2 classes".to_string());
        }
        if d == 0 {
            return Err("Model has no features".to_string());
        }
        if self.centroids.len() != k || self.counts.len() != k {
            return Err("centroids and counts must match classes length".to_string());
        }
        if self.centroids.iter().any(|centroid| centroid.len() != d) || self.scale.len() != d {
            return Err(format!("centroids and scale must have {d} features"));
        }
        if let Some(j) = self.scale.iter().position(|s| !s.is_finite() || *s <= 0.0) {
            return Err(format!("Feature {j} has a non-positive or non-finite scale"));
        }
        if let Some(k) = self
            .centroids
            .iter()
            .position(|centroid| centroid.iter().any(|v| !v.is_finite()))
        {
            return Err(format!("Centroid {k} has non-finite values"));
        }
        if self.counts.iter().all(|&count| count == 0) {
            return Err("Model has no populated classes".to_string());
        }
        Ok(())
    }

    fn scaled_distance(&self, centroid: &[f32], features: &[f32]) -> f32 {
        centroid
            .iter()
            .zip(self.scale.iter())
            .enumerate()
            .map(|(j, (&c, &s))| {
                let v = features.get(j).copied().unwrap_or(0.0);
                let diff = (v - c) / s;
                diff * diff
            })
            .sum()
    }
}

/// Fit per-class means and per-feature scales.
pub fn train_nearest_centroid(dataset: &TrainDataset) -> Result<NearestCentroidModel, FitError> {
    dataset.validate()?;
    let k = dataset.classes.len();
    let d = dataset.feature_len();

    let mut sums = vec![vec![0f64; d]; k];
    let mut counts = vec![0usize; k];
    for (row, &label) in dataset.x.iter().zip(dataset.y.iter()) {
        counts[label] += 1;
        for (sum, &v) in sums[label].iter_mut().zip(row.iter()) {
            *sum += v as f64;
        }
    }
    let centroids = sums
        .into_iter()
        .zip(counts.iter())
        .map(|(sum, &count)| {
            sum.into_iter()
                .map(|s| if count == 0 { 0.0 } else { (s / count as f64) as f32 })
                .collect()
        })
        .collect();

    let n = dataset.len() as f64;
    let scale = (0..d)
        .map(|j| {
            let mean = dataset.x.iter().map(|row| row[j] as f64).sum::<f64>() / n;
            let var = dataset
                .x
                .iter()
                .map(|row| (row[j] as f64 - mean).powi(2))
                .sum::<f64>()
                / n;
            let std = var.sqrt() as f32;
            if std > f32::EPSILON { std } else { 1.0 }
        })
        .collect();

    Ok(NearestCentroidModel {
        model_version: CENTROID_MODEL_VERSION,
        feature_names: dataset.feature_names.clone(),
        classes: dataset.classes.clone(),
        centroids,
        counts,
        scale,
    })
}

impl Classifier for NearestCentroidModel {
    fn kind(&self) -> ModelKind {
        ModelKind::NearestCentroid
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn feature_len(&self) -> usize {
        self.feature_names.len()
    }

    fn predict_class_index(&self, features: &[f32]) -> usize {
        let mut best_idx = 0usize;
        let mut best_dist = f32::INFINITY;
        for (idx, centroid) in self.centroids.iter().enumerate() {
            if self.counts[idx] == 0 {
                continue;
            }
            let dist = self.scaled_distance(centroid, features);
            if dist < best_dist {
                best_dist = dist;
                best_idx = idx;
            }
        }
        best_idx
    }
}
