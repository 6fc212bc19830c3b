use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::model::{GbdtModel, RegressionTree, TreeNode, softmax};
use crate::ml::{FitError, TrainDataset};

/// Format version written into fitted models.
pub(crate) const GBDT_MODEL_VERSION: i64 = 2;

/// Bounded Newton step keeps logits finite on pure leaves.
const MAX_LEAF_VALUE: f32 = 8.0;
const MIN_GAIN: f64 = 1e-12;

/// Training hyperparameters for tree boosting.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainOptions {
    /// Number of boosting rounds.
    pub rounds: usize,
    /// Learning rate applied per round.
    pub learning_rate: f32,
    /// Maximum number of splits on any root-to-leaf path.
    pub max_depth: usize,
    /// Number of bins used for split search.
    pub bins: usize,
    /// Minimum rows on each side of a split.
    pub min_samples_leaf: usize,
    /// Fraction of rows used to grow each round's trees.
    pub subsample: f32,
    /// Seed for row subsampling.
    pub seed: u64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            rounds: 100,
            learning_rate: 0.1,
            max_depth: 3,
            bins: 64,
            min_samples_leaf: 1,
            subsample: 1.0,
            seed: 42,
        }
    }
}

/// Train a multi-class tree-GBDT model using softmax gradient boosting.
pub fn train_gbdt(dataset: &TrainDataset, options: &TrainOptions) -> Result<GbdtModel, FitError> {
    dataset.validate()?;

    let n = dataset.len();
    let n_classes = dataset.classes.len();
    let bins = FeatureBins::fit(&dataset.x, dataset.feature_len(), options.bins);
    let binned = bins.bin_matrix(&dataset.x);

    let init_raw: Vec<f32> = dataset
        .class_priors()
        .iter()
        .map(|&p| p.max(1e-6).ln())
        .collect();
    let mut raw = vec![init_raw.clone(); n];

    let grower = TreeGrower {
        binned: &binned,
        x: &dataset.x,
        bins: &bins,
        n_classes,
        max_depth: options.max_depth.max(1),
        min_samples_leaf: options.min_samples_leaf.max(1),
    };
    let sample_size = subsample_size(n, options.subsample);
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut order: Vec<usize> = (0..n).collect();

    let mut rounds_out: Vec<Vec<RegressionTree>> = Vec::with_capacity(options.rounds);
    for _round in 0..options.rounds {
        let rows: Vec<usize> = if sample_size < n {
            order.shuffle(&mut rng);
            let mut rows = order[..sample_size].to_vec();
            rows.sort_unstable();
            rows
        } else {
            (0..n).collect()
        };
        let probs: Vec<Vec<f32>> = raw.iter().map(|r| softmax(r)).collect();

        let mut trees_for_round = Vec::with_capacity(n_classes);
        for class_idx in 0..n_classes {
            let residuals: Vec<f32> = dataset
                .y
                .iter()
                .zip(probs.iter())
                .map(|(&label, p)| {
                    let target = if label == class_idx { 1.0 } else { 0.0 };
                    target - p[class_idx]
                })
                .collect();
            let tree = grower.grow(&rows, &residuals);
            for (row_raw, features) in raw.iter_mut().zip(dataset.x.iter()) {
                row_raw[class_idx] += options.learning_rate * tree.predict(features);
            }
            trees_for_round.push(tree);
        }
        rounds_out.push(trees_for_round);
    }

    Ok(GbdtModel {
        model_version: GBDT_MODEL_VERSION,
        feature_names: dataset.feature_names.clone(),
        classes: dataset.classes.clone(),
        learning_rate: options.learning_rate,
        init_raw,
        trees: rounds_out,
    })
}

fn subsample_size(n: usize, fraction: f32) -> usize {
    if !fraction.is_finite() || fraction >= 1.0 {
        return n;
    }
    ((n as f32 * fraction).round() as usize).clamp(1, n)
}

/// Equal-width bin edges per feature.
struct FeatureBins {
    mins: Vec<f32>,
    maxs: Vec<f32>,
    bins: usize,
}

impl FeatureBins {
    fn fit(x: &[Vec<f32>], feature_len: usize, bins: usize) -> Self {
        let mut mins = vec![f32::INFINITY; feature_len];
        let mut maxs = vec![f32::NEG_INFINITY; feature_len];
        for row in x {
            for (j, &v) in row.iter().take(feature_len).enumerate() {
                if v.is_finite() {
                    mins[j] = mins[j].min(v);
                    maxs[j] = maxs[j].max(v);
                }
            }
        }
        for j in 0..feature_len {
            if !mins[j].is_finite() || !maxs[j].is_finite() {
                mins[j] = 0.0;
                maxs[j] = 0.0;
            }
            if mins[j] == maxs[j] {
                maxs[j] = mins[j] + 1.0;
            }
        }
        Self {
            mins,
            maxs,
            bins: bins.clamp(2, 256),
        }
    }

    fn bin(&self, feature: usize, value: f32) -> u8 {
        let (min, max) = (self.mins[feature], self.maxs[feature]);
        let t = ((value - min) / (max - min)).clamp(0.0, 1.0);
        (t * (self.bins - 1) as f32 + 0.5).floor() as u8
    }

    fn bin_matrix(&self, x: &[Vec<f32>]) -> Vec<Vec<u8>> {
        x.iter()
            .map(|row| {
                (0..self.mins.len())
                    .map(|j| self.bin(j, row.get(j).copied().unwrap_or(0.0)))
                    .collect()
            })
            .collect()
    }

    /// Upper edge of `split_bin`, in feature units; values strictly below it bin at or under `split_bin`.
    fn threshold(&self, feature: usize, split_bin: usize) -> f32 {
        let (min, max) = (self.mins[feature], self.maxs[feature]);
        let t = (split_bin as f32 + 0.5) / (self.bins - 1) as f32;
        min + t * (max - min)
    }
}

#[derive(Debug, Clone, Copy)]
struct BestSplit {
    score: f64,
    feature_index: usize,
    split_bin: usize,
}

struct TreeGrower<'a> {
    binned: &'a [Vec<u8>],
    x: &'a [Vec<f32>],
    bins: &'a FeatureBins,
    n_classes: usize,
    max_depth: usize,
    min_samples_leaf: usize,
}

impl TreeGrower<'_> {
    fn grow(&self, rows: &[usize], residuals: &[f32]) -> RegressionTree {
        let mut nodes = Vec::new();
        self.grow_node(&mut nodes, rows, residuals, 0);
        RegressionTree { nodes }
    }

    /// Append the subtree for `rows` and return its root index.
    fn grow_node(
        &self,
        nodes: &mut Vec<TreeNode>,
        rows: &[usize],
        residuals: &[f32],
        depth: usize,
    ) -> u32 {
        let idx = nodes.len();
        nodes.push(TreeNode::Leaf {
            value: self.leaf_value(rows, residuals),
        });
        if depth >= self.max_depth || rows.len() < 2 * self.min_samples_leaf {
            return idx as u32;
        }
        let Some(best) = self.best_split(rows, residuals) else {
            return idx as u32;
        };

        let threshold = self.bins.threshold(best.feature_index, best.split_bin);
        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .iter()
            .copied()
            .partition(|&row| self.binned[row][best.feature_index] as usize <= best.split_bin);
        if left_rows.len() < self.min_samples_leaf || right_rows.len() < self.min_samples_leaf {
            return idx as u32;
        }

        let left = self.grow_node(nodes, &left_rows, residuals, depth + 1);
        let right = self.grow_node(nodes, &right_rows, residuals, depth + 1);
        nodes[idx] = TreeNode::Split {
            feature_index: best.feature_index as u16,
            threshold,
            left,
            right,
        };
        idx as u32
    }

    /// Lowest within-child squared error over all features, if it beats no split.
    fn best_split(&self, rows: &[usize], residuals: &[f32]) -> Option<BestSplit> {
        let (sum, sum_sq) = rows.iter().fold((0f64, 0f64), |(s, sq), &row| {
            let r = residuals[row] as f64;
            (s + r, sq + r * r)
        });
        let parent_sse = sum_sq - sum * sum / rows.len() as f64;

        let mut best: Option<BestSplit> = None;
        for feature_idx in 0..self.bins.mins.len() {
            let Some(split) = self.best_split_for_feature(rows, residuals, feature_idx) else {
                continue;
            };
            if best.is_none_or(|current| split.score < current.score) {
                best = Some(split);
            }
        }
        best.filter(|split| parent_sse - split.score > MIN_GAIN)
    }

    fn best_split_for_feature(
        &self,
        rows: &[usize],
        residuals: &[f32],
        feature_idx: usize,
    ) -> Option<BestSplit> {
        let bins = self.bins.bins;
        let mut counts = vec![0usize; bins];
        let mut sums = vec![0f64; bins];
        let mut sums_sq = vec![0f64; bins];
        for &row in rows {
            let b = self.binned[row][feature_idx] as usize;
            let r = residuals[row] as f64;
            counts[b] += 1;
            sums[b] += r;
            sums_sq[b] += r * r;
        }
        let total_count = rows.len();
        let total_sum: f64 = sums.iter().sum();
        let total_sum_sq: f64 = sums_sq.iter().sum();

        let mut best: Option<BestSplit> = None;
        let (mut left_count, mut left_sum, mut left_sum_sq) = (0usize, 0f64, 0f64);
        for split_bin in 0..(bins - 1) {
            left_count += counts[split_bin];
            left_sum += sums[split_bin];
            left_sum_sq += sums_sq[split_bin];
            let right_count = total_count - left_count;
            if left_count < self.min_samples_leaf || right_count < self.min_samples_leaf {
                continue;
            }
            let right_sum = total_sum - left_sum;
            let right_sum_sq = total_sum_sq - left_sum_sq;
            let left_sse = left_sum_sq - (left_sum * left_sum) / left_count as f64;
            let right_sse = right_sum_sq - (right_sum * right_sum) / right_count as f64;
            let score = left_sse + right_sse;
            if best.is_none_or(|current| score < current.score) {
                best = Some(BestSplit {
                    score,
                    feature_index: feature_idx,
                    split_bin,
                });
            }
        }
        best
    }

    /// Newton step for the softmax loss: `(K-1)/K * sum(r) / sum(|r|(1-|r|))`.
    fn leaf_value(&self, rows: &[usize], residuals: &[f32]) -> f32 {
        let (num, den) = rows.iter().fold((0f64, 0f64), |(num, den), &row| {
            let r = residuals[row] as f64;
            (num + r, den + r.abs() * (1.0 - r.abs()))
        });
        if den.abs() < 1e-12 {
            return 0.0;
        }
        let k = self.n_classes as f64;
        let value = ((k - 1.0) / k) * num / den;
        (value as f32).clamp(-MAX_LEAF_VALUE, MAX_LEAF_VALUE)
    }
}
