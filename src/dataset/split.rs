//! Seeded holdout split.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::ml::TrainDataset;

/// Shuffle rows with a seeded generator and withhold `ceil(n * test_fraction)` of them.
///
/// At least one row always stays in the training half. The class list is shared
/// by both halves so class indices keep their meaning.
pub fn train_test_split(
    dataset: &TrainDataset,
    test_fraction: f32,
    seed: u64,
) -> (TrainDataset, TrainDataset) {
    let n = dataset.len();
    let fraction = if test_fraction.is_finite() {
        test_fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    // Tolerance absorbs f32 representation error (0.2f32 is slightly above 0.2).
    let n_test = ((n as f64) * f64::from(fraction) - 1e-6).ceil().max(0.0) as usize;
    let n_test = n_test.min(n.saturating_sub(1));

    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);
    let (test_idx, train_idx) = order.split_at(n_test);
    (dataset.subset(train_idx), dataset.subset(test_idx))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(n: usize) -> TrainDataset {
        TrainDataset {
            feature_names: vec!["v".into()],
            classes: vec!["a".into(), "b".into()],
            x: (0..n).map(|i| vec![i as f32]).collect(),
            y: (0..n).map(|i| i % 2).collect(),
        }
    }

    #[test]
    fn split_sizes_follow_fraction() {
        let (train, test) = train_test_split(&dataset(10), 0.2, 42);
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);

        let (train, test) = train_test_split(&dataset(11), 0.2, 42);
        assert_eq!(test.len(), 3);
        assert_eq!(train.len(), 8);
    }

    #[test]
    fn split_is_reproducible_and_disjoint() {
        let data = dataset(50);
        let (train_a, test_a) = train_test_split(&data, 0.3, 7);
        let (train_b, test_b) = train_test_split(&data, 0.3, 7);
        assert_eq!(train_a.x, train_b.x);
        assert_eq!(test_a.x, test_b.x);

        let mut seen: Vec<f32> = train_a.x.iter().chain(test_a.x.iter()).map(|r| r[0]).collect();
        seen.sort_by(f32::total_cmp);
        let expected: Vec<f32> = (0..50).map(|i| i as f32).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn rows_keep_their_labels() {
        let (train, test) = train_test_split(&dataset(20), 0.25, 3);
        for part in [&train, &test] {
            for (row, &label) in part.x.iter().zip(part.y.iter()) {
                assert_eq!(row[0] as usize % 2, label);
            }
        }
    }

    #[test]
    fn zero_fraction_and_tiny_sets_keep_training_rows() {
        let (train, test) = train_test_split(&dataset(5), 0.0, 1);
        assert_eq!((train.len(), test.len()), (5, 0));

        let (train, test) = train_test_split(&dataset(1), 0.5, 1);
        assert_eq!((train.len(), test.len()), (1, 0));

        let (train, test) = train_test_split(&dataset(4), 1.0, 1);
        assert_eq!((train.len(), test.len()), (1, 3));
    }
}
