//! Developer utility to train a crop classifier from a CSV and report holdout metrics.

use std::path::PathBuf;

use cropmate::config::{self, TrainingSettings};
use cropmate::dataset;
use cropmate::ml::ModelKind;
use cropmate::training::{TrainingOptions, TrainingReport, run_training_pipeline};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let settings = config::load_or_default().map_err(|err| err.to_string())?;
    let options = parse_args(std::env::args().skip(1).collect(), &settings.training)?;
    let model_out = match options.model_out {
        Some(path) => path,
        None => settings
            .model
            .resolved_model_path()
            .map_err(|err| err.to_string())?,
    };
    let kind = options.kind.unwrap_or(settings.model.kind);

    let table = dataset::load_table(&options.data).map_err(|err| err.to_string())?;
    let training = TrainingOptions::from_settings(kind, &options.training);
    let (_, report) = run_training_pipeline(&table, &training, &model_out, |stage| {
        eprintln!("{stage}");
    })
    .map_err(|err| err.to_string())?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &TrainingReport) {
    println!(
        "{} model: {} rows ({} dropped), {} train / {} test",
        report.kind, report.samples, report.dropped_rows, report.train_rows, report.test_rows
    );
    println!("saved to {}", report.model_path.display());
    let Some(acc) = report.accuracy else {
        println!("no holdout rows; skipped evaluation");
        return;
    };
    println!("test accuracy: {:.4}", acc);
    for (idx, stats) in report.per_class.iter().enumerate() {
        println!(
            "class {:>2} {:<16}  precision={:.3}  recall={:.3}  f1={:.3}  support={}",
            idx, report.classes[idx], stats.precision, stats.recall, stats.f1, stats.support
        );
    }
    if let Some(cm) = &report.confusion {
        println!("confusion matrix (rows=true, cols=pred):");
        for truth in 0..cm.n_classes {
            let mut row = String::new();
            for pred in 0..cm.n_classes {
                row.push_str(&format!("{:6}", cm.get(truth, pred)));
            }
            println!("{row}");
        }
    }
}

#[derive(Debug, Clone)]
struct CliOptions {
    data: PathBuf,
    model_out: Option<PathBuf>,
    kind: Option<ModelKind>,
    training: TrainingSettings,
}

fn parse_args(args: Vec<String>, defaults: &TrainingSettings) -> Result<CliOptions, String> {
    let mut data: Option<PathBuf> = None;
    let mut model_out = None;
    let mut kind = None;
    let mut training = defaults.clone();

    let mut idx = 0usize;
    while idx < args.len() {
        let flag = args[idx].as_str();
        if matches!(flag, "-h" | "--help") {
            return Err(help_text());
        }
        idx += 1;
        let value = args
            .get(idx)
            .ok_or_else(|| format!("{flag} requires a value"))
            .map(String::as_str);
        match flag {
            "--data" => data = Some(PathBuf::from(value?)),
            "--out" => model_out = Some(PathBuf::from(value?)),
            "--rounds" => training.rounds = parse_value(flag, value?)?,
            "--learning-rate" => training.learning_rate = parse_value(flag, value?)?,
            "--max-depth" => training.max_depth = parse_value(flag, value?)?,
            "--bins" => training.bins = parse_value(flag, value?)?,
            "--test-fraction" => training.test_fraction = parse_value(flag, value?)?,
            "--seed" => training.seed = parse_value(flag, value?)?,
            "--kind" => kind = Some(parse_value(flag, value?)?),
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }

    let data = data.ok_or_else(help_text)?;
    if !(0.0..1.0).contains(&training.test_fraction) {
        return Err(format!(
            "--test-fraction must be in [0, 1), got {}",
            training.test_fraction
        ));
    }
    Ok(CliOptions {
        data,
        model_out,
        kind,
        training,
    })
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, String> {
    value
        .parse::<T>()
        .map_err(|_| format!("Invalid {flag} value: {value}"))
}

fn help_text() -> String {
    [
        "cropmate-train",
        "",
        "Trains a crop classifier from a soil measurement CSV (N, P, K, ph, crop).",
        "",
        "Usage:",
        "  cropmate-train --data <csv> [--out model.json] [options]",
        "",
        "Options:",
        "  --data <csv>           Training table (required).",
        "  --out <file>           Output model path (default: the app's model path).",
        "  --kind <kind>          gradient_boosting | nearest_centroid.",
        "  --rounds <n>           Boosting rounds (default: 100).",
        "  --learning-rate <f32>  Learning rate (default: 0.1).",
        "  --max-depth <n>        Maximum tree depth (default: 3).",
        "  --bins <n>             Feature bin count for split search (default: 64).",
        "  --test-fraction <f32>  Holdout fraction; 0 trains on every row (default: 0.2).",
        "  --seed <n>             Seed for the split and row sampling (default: 42).",
        "",
        "Defaults come from config.toml when present.",
    ]
    .join("\n")
}
