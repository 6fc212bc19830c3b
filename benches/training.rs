use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use cropmate::ml::gbdt::{TrainOptions, train_gbdt};
use cropmate::ml::{Classifier, TrainDataset};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CLASS_COUNT: usize = 8;
const ROWS_PER_CLASS: usize = 100;

/// Synthetic soil-like clusters: one centre per class plus uniform noise.
fn synthetic_dataset() -> TrainDataset {
    let mut rng = StdRng::seed_from_u64(7);
    let mut x = Vec::with_capacity(CLASS_COUNT * ROWS_PER_CLASS);
    let mut y = Vec::with_capacity(CLASS_COUNT * ROWS_PER_CLASS);
    for class in 0..CLASS_COUNT {
        let centre = [
            10.0 + class as f32 * 15.0,
            140.0 - class as f32 * 12.0,
            20.0 + (class % 3) as f32 * 40.0,
            5.0 + (class % 4) as f32 * 0.6,
        ];
        for _ in 0..ROWS_PER_CLASS {
            x.push(
                centre
                    .iter()
                    .map(|&c| c + rng.random_range(-6.0..6.0))
                    .collect(),
            );
            y.push(class);
        }
    }
    TrainDataset {
        feature_names: ["N", "P", "K", "ph"].map(String::from).to_vec(),
        classes: (0..CLASS_COUNT).map(|c| format!("crop_{c}")).collect(),
        x,
        y,
    }
}

fn bench_fit(c: &mut Criterion) {
    let dataset = synthetic_dataset();
    let mut group = c.benchmark_group("gbdt_fit");
    group.sample_size(10);
    for depth in [2usize, 4] {
        let options = TrainOptions {
            rounds: 30,
            max_depth: depth,
            ..TrainOptions::default()
        };
        group.bench_with_input(BenchmarkId::new("max_depth", depth), &options, |b, options| {
            b.iter(|| train_gbdt(black_box(&dataset), options).expect("fit"));
        });
    }
    group.finish();
}

fn bench_predict(c: &mut Criterion) {
    let dataset = synthetic_dataset();
    let model = train_gbdt(&dataset, &TrainOptions::default()).expect("fit");
    c.bench_function("gbdt_predict_proba", |b| {
        b.iter(|| {
            for row in &dataset.x {
                black_box(model.predict_proba(black_box(row)));
            }
        });
    });
}

criterion_group!(benches, bench_fit, bench_predict);
criterion_main!(benches);
