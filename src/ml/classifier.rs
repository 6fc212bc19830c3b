use super::ModelKind;

/// Common prediction surface of every fitted model.
pub trait Classifier {
    /// Model family, used in logs and error messages.
    fn kind(&self) -> ModelKind;

    /// Class names, indexed like the model outputs.
    fn classes(&self) -> &[String];

    /// Number of features expected per input row.
    fn feature_len(&self) -> usize;

    /// Index of the predicted class for one feature row.
    fn predict_class_index(&self, features: &[f32]) -> usize;

    /// Class probabilities for one feature row, or `None` for models without
    /// probability output.
    fn predict_proba(&self, _features: &[f32]) -> Option<Vec<f32>> {
        None
    }
}
