//! Single-row crop prediction.

use std::ops::RangeInclusive;

use thiserror::Error;

use crate::ml::{Classifier, ModelKind};

/// Accepted range for N, P and K readings (mg/kg).
pub const NUTRIENT_RANGE: RangeInclusive<f32> = 0.0..=150.0;
/// Accepted range for soil pH.
pub const PH_RANGE: RangeInclusive<f32> = 0.0..=14.0;

/// One set of soil measurements in model feature order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoilReading {
    pub nitrogen: f32,
    pub phosphorus: f32,
    pub potassium: f32,
    pub ph: f32,
}

impl Default for SoilReading {
    fn default() -> Self {
        Self {
            nitrogen: 70.0,
            phosphorus: 50.0,
            potassium: 20.0,
            ph: 6.5,
        }
    }
}

impl SoilReading {
    /// Single-row feature vector `[N, P, K, ph]`.
    pub fn features(&self) -> [f32; 4] {
        [self.nitrogen, self.phosphorus, self.potassium, self.ph]
    }
}

/// Highest-probability crop for a reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub probability: f32,
}

#[derive(Debug, Error, PartialEq)]
pub enum PredictError {
    #[error("Model expects {expected} features but {found} were supplied")]
    FeatureCount { expected: usize, found: usize },
    #[error("The {kind} model cannot produce class probabilities; retrain with gradient boosting")]
    ProbabilityUnsupported { kind: ModelKind },
    #[error("Model returned {found} probabilities for {expected} classes")]
    MalformedDistribution { expected: usize, found: usize },
}

/// Predict the crop for a soil reading.
pub fn predict_crop(
    model: &dyn Classifier,
    reading: &SoilReading,
) -> Result<Prediction, PredictError> {
    predict_features(model, &reading.features())
}

/// Predict from a raw feature row: request probabilities and keep the argmax.
pub fn predict_features(
    model: &dyn Classifier,
    features: &[f32],
) -> Result<Prediction, PredictError> {
    if features.len() != model.feature_len() {
        return Err(PredictError::FeatureCount {
            expected: model.feature_len(),
            found: features.len(),
        });
    }
    let proba = model
        .predict_proba(features)
        .ok_or(PredictError::ProbabilityUnsupported { kind: model.kind() })?;
    let classes = model.classes();
    if proba.len() != classes.len() || proba.is_empty() {
        return Err(PredictError::MalformedDistribution {
            expected: classes.len(),
            found: proba.len(),
        });
    }
    let best = crate::ml::gbdt::argmax(&proba);
    Ok(Prediction {
        label: classes[best].clone(),
        probability: proba[best],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::{ModelArtifact, TrainDataset, gbdt::TrainOptions};

    fn dataset() -> TrainDataset {
        TrainDataset {
            feature_names: ["N", "P", "K", "ph"].map(String::from).to_vec(),
            classes: vec!["chickpea".into(), "rice".into()],
            x: vec![
                vec![40.0, 68.0, 80.0, 7.3],
                vec![42.0, 70.0, 78.0, 7.1],
                vec![80.0, 45.0, 40.0, 6.4],
                vec![82.0, 44.0, 41.0, 6.6],
            ],
            y: vec![0, 0, 1, 1],
        }
    }

    fn fit(kind: ModelKind) -> ModelArtifact {
        let options = TrainOptions {
            rounds: 20,
            ..TrainOptions::default()
        };
        ModelArtifact::fit(kind, &dataset(), &options).unwrap()
    }

    #[test]
    fn returns_argmax_label_and_probability() {
        let model = fit(ModelKind::GradientBoosting);
        let reading = SoilReading {
            nitrogen: 81.0,
            phosphorus: 44.0,
            potassium: 40.0,
            ph: 6.5,
        };
        let prediction = predict_crop(&model, &reading).unwrap();
        assert_eq!(prediction.label, "rice");
        assert!(prediction.probability > 0.5 && prediction.probability <= 1.0);
    }

    #[test]
    fn model_without_probabilities_is_rejected() {
        let model = fit(ModelKind::NearestCentroid);
        let err = predict_crop(&model, &SoilReading::default()).unwrap_err();
        assert_eq!(
            err,
            PredictError::ProbabilityUnsupported {
                kind: ModelKind::NearestCentroid
            }
        );
        assert!(err.to_string().contains("cannot produce class probabilities"));
    }

    #[test]
    fn feature_count_must_match() {
        let model = fit(ModelKind::GradientBoosting);
        assert_eq!(
            predict_features(&model, &[1.0, 2.0]),
            Err(PredictError::FeatureCount {
                expected: 4,
                found: 2
            })
        );
    }

    #[test]
    fn default_reading_matches_form_defaults() {
        assert_eq!(SoilReading::default().features(), [70.0, 50.0, 20.0, 6.5]);
        assert!(NUTRIENT_RANGE.contains(&150.0));
        assert!(!PH_RANGE.contains(&14.5));
    }
}
