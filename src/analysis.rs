//! Per-crop summaries of a reference dataset.

use crate::dataset::SoilDataset;

/// Equal-width histogram of one feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub feature: String,
    pub min: f32,
    pub max: f32,
    pub counts: Vec<u32>,
}

impl Histogram {
    /// Bucket `values` into `bins` equal-width bins spanning their range.
    ///
    /// A constant column lands entirely in the first bin.
    pub fn from_values(feature: impl Into<String>, values: &[f32], bins: usize) -> Self {
        let bins = bins.max(1);
        let mut counts = vec![0u32; bins];
        let (min, max) = values
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if values.is_empty() {
            return Self {
                feature: feature.into(),
                min: 0.0,
                max: 0.0,
                counts,
            };
        }
        let span = max - min;
        for &value in values {
            let idx = if span > 0.0 {
                (((value - min) / span) * bins as f32) as usize
            } else {
                0
            };
            counts[idx.min(bins - 1)] += 1;
        }
        Self {
            feature: feature.into(),
            min,
            max,
            counts,
        }
    }

    /// Width of a single bin.
    pub fn bin_width(&self) -> f32 {
        (self.max - self.min) / self.counts.len().max(1) as f32
    }

    pub fn peak(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Averages and distributions for the rows of a single crop.
#[derive(Debug, Clone, PartialEq)]
pub struct CropSummary {
    pub crop: String,
    pub rows: usize,
    /// `(feature, mean)` in dataset column order.
    pub averages: Vec<(String, f32)>,
    pub histograms: Vec<Histogram>,
}

/// Crop labels in order of first appearance.
pub fn unique_crops(dataset: &SoilDataset) -> Vec<String> {
    let mut seen = Vec::new();
    for label in &dataset.labels {
        if !seen.contains(label) {
            seen.push(label.clone());
        }
    }
    seen
}

/// Summarize the rows labelled `crop`; `None` when the crop never appears.
pub fn summarize_crop(dataset: &SoilDataset, crop: &str, bins: usize) -> Option<CropSummary> {
    let rows: Vec<&Vec<f32>> = dataset
        .x
        .iter()
        .zip(&dataset.labels)
        .filter(|(_, label)| label.as_str() == crop)
        .map(|(row, _)| row)
        .collect();
    if rows.is_empty() {
        return None;
    }
    let mut averages = Vec::with_capacity(dataset.feature_names.len());
    let mut histograms = Vec::with_capacity(dataset.feature_names.len());
    for (col, name) in dataset.feature_names.iter().enumerate() {
        let values: Vec<f32> = rows.iter().map(|row| row[col]).collect();
        let mean = values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64;
        averages.push((name.clone(), mean as f32));
        histograms.push(Histogram::from_values(name.as_str(), &values, bins));
    }
    Some(CropSummary {
        crop: crop.to_string(),
        rows: rows.len(),
        averages,
        histograms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> SoilDataset {
        SoilDataset {
            feature_names: vec!["N".into(), "ph".into()],
            x: vec![
                vec![10.0, 6.0],
                vec![90.0, 7.0],
                vec![20.0, 6.0],
                vec![30.0, 6.0],
            ],
            labels: vec!["rice".into(), "maize".into(), "rice".into(), "rice".into()],
            dropped_rows: 0,
        }
    }

    #[test]
    fn crops_keep_first_appearance_order() {
        assert_eq!(unique_crops(&dataset()), vec!["rice", "maize"]);
    }

    #[test]
    fn summary_averages_selected_rows() {
        let summary = summarize_crop(&dataset(), "rice", 2).unwrap();
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.averages[0], ("N".to_string(), 20.0));
        assert_eq!(summary.averages[1], ("ph".to_string(), 6.0));
        assert_eq!(summary.histograms[0].counts, vec![1, 2]);
        assert_eq!(summary.histograms[0].min, 10.0);
        assert_eq!(summary.histograms[0].max, 30.0);
    }

    #[test]
    fn constant_column_fills_one_bin() {
        let summary = summarize_crop(&dataset(), "rice", 4).unwrap();
        assert_eq!(summary.histograms[1].counts, vec![3, 0, 0, 0]);
        assert_eq!(summary.histograms[1].bin_width(), 0.0);
    }

    #[test]
    fn unknown_crop_has_no_summary() {
        assert!(summarize_crop(&dataset(), "coffee", 10).is_none());
    }

    #[test]
    fn maximum_lands_in_last_bin() {
        let hist = Histogram::from_values("K", &[0.0, 5.0, 10.0], 5);
        assert_eq!(hist.counts, vec![1, 0, 1, 0, 1]);
        assert_eq!(hist.peak(), 1);
    }
}
