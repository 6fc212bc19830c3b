//! Soil measurement tables: loading, validation, and splitting.

pub mod loader;
pub mod split;

use std::collections::{BTreeSet, HashMap};

use crate::ml::TrainDataset;

pub use loader::{
    DatasetError, FEATURE_COLUMNS, TARGET_COLUMN, TablePreview, load_table, parse_table,
    preprocess, preprocess_with, preview,
};
pub use split::train_test_split;

/// Preprocessed rows: numeric features and their crop labels.
#[derive(Debug, Clone, PartialEq)]
pub struct SoilDataset {
    /// Feature column names in model input order.
    pub feature_names: Vec<String>,
    /// Feature matrix, row-major; every value is finite.
    pub x: Vec<Vec<f32>>,
    /// Crop label per row, aligned with `x`.
    pub labels: Vec<String>,
    /// Rows removed because a required value was missing.
    pub dropped_rows: usize,
}

impl SoilDataset {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Unique labels in lexicographic order; this order defines class indices.
    pub fn classes(&self) -> Vec<String> {
        self.labels
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Encode labels as class indices for training.
    pub fn to_train_dataset(&self) -> TrainDataset {
        let classes = self.classes();
        let index: HashMap<&str, usize> = classes
            .iter()
            .enumerate()
            .map(|(idx, class)| (class.as_str(), idx))
            .collect();
        let y = self
            .labels
            .iter()
            .map(|label| index[label.as_str()])
            .collect();
        TrainDataset {
            feature_names: self.feature_names.clone(),
            classes,
            x: self.x.clone(),
            y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_indices_follow_sorted_labels() {
        let dataset = SoilDataset {
            feature_names: vec!["N".into()],
            x: vec![vec![1.0], vec![2.0], vec![3.0]],
            labels: vec!["rice".into(), "apple".into(), "rice".into()],
            dropped_rows: 0,
        };
        let train = dataset.to_train_dataset();
        assert_eq!(train.classes, vec!["apple", "rice"]);
        assert_eq!(train.y, vec![1, 0, 1]);
        assert_eq!(train.x, dataset.x);
    }
}
