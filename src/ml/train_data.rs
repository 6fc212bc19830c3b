use thiserror::Error;

/// Errors raised before or during a fit.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("Mismatched X/Y lengths ({x} rows, {y} labels)")]
    MismatchedLengths { x: usize, y: usize },
    #[error("Empty dataset")]
    Empty,
    #[error("Need at least 2 classes, found {found}")]
    TooFewClasses { found: usize },
    #[error("Feature rows are empty")]
    NoFeatures,
    #[error("Row {row} has {found} features but expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Row {row} has label index {label} outside the class list")]
    LabelOutOfRange { row: usize, label: usize },
}

/// In-memory dataset used for fitting and evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainDataset {
    /// Feature names in column order.
    pub feature_names: Vec<String>,
    /// Ordered list of class names; `y` indexes into it.
    pub classes: Vec<String>,
    /// Feature matrix, row-major.
    pub x: Vec<Vec<f32>>,
    /// Class indices aligned with `x`.
    pub y: Vec<usize>,
}

impl TrainDataset {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Number of features per row.
    pub fn feature_len(&self) -> usize {
        self.feature_names.len()
    }

    /// Copy the listed rows into a new dataset sharing the class list.
    pub fn subset(&self, rows: &[usize]) -> Self {
        Self {
            feature_names: self.feature_names.clone(),
            classes: self.classes.clone(),
            x: rows.iter().map(|&row| self.x[row].clone()).collect(),
            y: rows.iter().map(|&row| self.y[row]).collect(),
        }
    }

    /// Check the shape invariants every trainer relies on.
    pub fn validate(&self) -> Result<(), FitError> {
        if self.x.len() != self.y.len() {
            return Err(FitError::MismatchedLengths {
                x: self.x.len(),
                y: self.y.len(),
            });
        }
        if self.x.is_empty() {
            return Err(FitError::Empty);
        }
        if self.classes.len() < 2 {
            return Err(FitError::TooFewClasses {
                found: self.classes.len(),
            });
        }
        let expected = self.feature_len();
        if expected == 0 {
            return Err(FitError::NoFeatures);
        }
        for (row, (features, &label)) in self.x.iter().zip(self.y.iter()).enumerate() {
            if features.len() != expected {
                return Err(FitError::RaggedRow {
                    row,
                    expected,
                    found: features.len(),
                });
            }
            if label >= self.classes.len() {
                return Err(FitError::LabelOutOfRange { row, label });
            }
        }
        Ok(())
    }

    /// Fraction of rows per class, indexed like `classes`.
    pub fn class_priors(&self) -> Vec<f32> {
        let mut counts = vec![0usize; self.classes.len()];
        for &label in &self.y {
            if let Some(count) = counts.get_mut(label) {
                *count += 1;
            }
        }
        let total = self.y.len().max(1) as f32;
        counts.into_iter().map(|c| c as f32 / total).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_class() -> TrainDataset {
        TrainDataset {
            feature_names: vec!["a".into(), "b".into()],
            classes: vec!["x".into(), "y".into()],
            x: vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![2.0, 2.0]],
            y: vec![0, 1, 1],
        }
    }

    #[test]
    fn validate_reports_shape_problems() {
        assert_eq!(two_class().validate(), Ok(()));

        let mut ragged = two_class();
        ragged.x[1].pop();
        assert_eq!(
            ragged.validate(),
            Err(FitError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            })
        );

        let mut single = two_class();
        single.classes.truncate(1);
        assert_eq!(single.validate(), Err(FitError::TooFewClasses { found: 1 }));

        let mut mismatched = two_class();
        mismatched.y.pop();
        assert_eq!(
            mismatched.validate(),
            Err(FitError::MismatchedLengths { x: 3, y: 2 })
        );

        let mut out_of_range = two_class();
        out_of_range.y[0] = 5;
        assert_eq!(
            out_of_range.validate(),
            Err(FitError::LabelOutOfRange { row: 0, label: 5 })
        );
    }

    #[test]
    fn priors_and_subset() {
        let data = two_class();
        let priors = data.class_priors();
        assert!((priors[0] - 1.0 / 3.0).abs() < 1e-6);
        assert!((priors[1] - 2.0 / 3.0).abs() < 1e-6);

        let sub = data.subset(&[2, 0]);
        assert_eq!(sub.x, vec![vec![2.0, 2.0], vec![0.0, 1.0]]);
        assert_eq!(sub.y, vec![1, 0]);
        assert_eq!(sub.classes, data.classes);
    }
}
