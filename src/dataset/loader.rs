//! CSV loading and preprocessing for soil measurement tables.

use std::collections::HashSet;
use std::fs::File;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use polars::io::mmap::MmapBytesReader;
use polars::prelude::*;
use thiserror::Error;

use super::SoilDataset;

/// Feature columns read from soil measurement tables, in model input order.
pub const FEATURE_COLUMNS: [&str; 4] = ["N", "P", "K", "ph"];
/// Column holding the crop label.
pub const TARGET_COLUMN: &str = "crop";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("File not found: {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("Failed to open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse CSV from {origin}: {source}")]
    Csv { origin: String, source: PolarsError },
    #[error("Missing required columns: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },
    #[error("Unreadable column {column}: {source}")]
    Column { column: String, source: PolarsError },
}

/// Leading rows of a table rendered as text.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePreview {
    pub columns: Vec<String>,
    /// Row-major cells; missing values render as empty strings.
    pub rows: Vec<Vec<String>>,
    /// Row count of the full table.
    pub total_rows: usize,
}

/// Load a CSV file with a header row into a table.
pub fn load_table(path: &Path) -> Result<DataFrame, DatasetError> {
    if !path.exists() {
        tracing::error!("File not found: {}", path.display());
        return Err(DatasetError::NotFound {
            path: path.to_path_buf(),
        });
    }
    tracing::info!("Loading data from {}...", path.display());
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_csv(file, path.display().to_string()).inspect_err(|err| {
        tracing::error!("Error loading data: {err}");
    })?;
    tracing::info!(
        "Data loaded successfully ({} rows, {} columns).",
        table.height(),
        table.width()
    );
    Ok(table)
}

/// Parse CSV content already held in memory.
pub fn parse_table(bytes: &[u8]) -> Result<DataFrame, DatasetError> {
    read_csv(Cursor::new(bytes.to_vec()), "<memory>".to_string())
}

fn read_csv<R: MmapBytesReader>(reader: R, origin: String) -> Result<DataFrame, DatasetError> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .into_reader_with_file_handle(reader)
        .finish()
        .map_err(|source| DatasetError::Csv { origin, source })
}

/// Validate and extract the default `N, P, K, ph` features and `crop` labels.
pub fn preprocess(table: &DataFrame) -> Result<SoilDataset, DatasetError> {
    preprocess_with(table, &FEATURE_COLUMNS, TARGET_COLUMN)
}

/// Validate required columns, drop incomplete rows, and split features from labels.
///
/// A row is incomplete when any feature is null, non-numeric or non-finite, or
/// when the label is null or blank.
pub fn preprocess_with(
    table: &DataFrame,
    features: &[&str],
    target: &str,
) -> Result<SoilDataset, DatasetError> {
    tracing::info!("Preprocessing data...");
    let present: HashSet<String> = table
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let missing: Vec<String> = features
        .iter()
        .copied()
        .chain(std::iter::once(target))
        .filter(|column| !present.contains(*column))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        tracing::error!("Missing required columns: {missing:?}");
        return Err(DatasetError::MissingColumns { columns: missing });
    }

    let feature_values = features
        .iter()
        .map(|name| numeric_column(table, name))
        .collect::<Result<Vec<_>, _>>()?;
    let labels = text_column(table, target)?;

    let mut dataset = SoilDataset {
        feature_names: features.iter().map(|name| name.to_string()).collect(),
        x: Vec::with_capacity(table.height()),
        labels: Vec::with_capacity(table.height()),
        dropped_rows: 0,
    };
    for (row, label) in labels.into_iter().enumerate() {
        let label = label.map(|text| text.trim().to_string()).unwrap_or_default();
        let values: Vec<f32> = feature_values
            .iter()
            .map_while(|column| column[row].map(|v| v as f32).filter(|v| v.is_finite()))
            .collect();
        if label.is_empty() || values.len() != features.len() {
            dataset.dropped_rows += 1;
            continue;
        }
        dataset.x.push(values);
        dataset.labels.push(label);
    }

    if dataset.dropped_rows > 0 {
        tracing::warn!("Dropped {} incomplete rows", dataset.dropped_rows);
    }
    tracing::info!(
        "Data preprocessing completed successfully ({} rows).",
        dataset.len()
    );
    Ok(dataset)
}

/// Render the first `rows` rows of a table as strings.
pub fn preview(table: &DataFrame, rows: usize) -> Result<TablePreview, DatasetError> {
    let head = table.head(Some(rows));
    let columns: Vec<String> = head
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let mut cells = vec![Vec::with_capacity(columns.len()); head.height()];
    for name in &columns {
        for (row, value) in text_column(&head, name)?.into_iter().enumerate() {
            cells[row].push(value.unwrap_or_default());
        }
    }
    Ok(TablePreview {
        columns,
        rows: cells,
        total_rows: table.height(),
    })
}

fn numeric_column(table: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, DatasetError> {
    let column_error = |source| DatasetError::Column {
        column: name.to_string(),
        source,
    };
    let column = table.column(name).map_err(column_error)?;
    let cast = column.cast(&DataType::Float64).map_err(column_error)?;
    let values = cast.f64().map_err(column_error)?;
    Ok(values.into_iter().collect())
}

fn text_column(table: &DataFrame, name: &str) -> Result<Vec<Option<String>>, DatasetError> {
    let column_error = |source| DatasetError::Column {
        column: name.to_string(),
        source,
    };
    let column = table.column(name).map_err(column_error)?;
    let cast = column.cast(&DataType::String).map_err(column_error)?;
    let values = cast.str().map_err(column_error)?;
    Ok(values
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = "N,P,K,ph,crop\n\
        90,42,43,6.5,rice\n\
        85,58,41,7.0,rice\n\
        ,55,44,6.8,maize\n\
        20,67,20,abc,chickpea\n\
        40,72,77,7.2,\n\
        31,70,80,7.1,chickpea\n";

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        match load_table(&path) {
            Err(DatasetError::NotFound { path: reported }) => assert_eq!(reported, path),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn loads_table_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("soil.csv");
        std::fs::write(&path, SAMPLE).unwrap();
        let table = load_table(&path).unwrap();
        assert_eq!(table.height(), 6);
        assert_eq!(table.width(), 5);
    }

    #[test]
    fn drops_incomplete_rows() {
        let table = parse_table(SAMPLE.as_bytes()).unwrap();
        let dataset = preprocess(&table).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.dropped_rows, 3);
        assert_eq!(dataset.labels, vec!["rice", "rice", "chickpea"]);
        assert_eq!(dataset.x[0], vec![90.0, 42.0, 43.0, 6.5]);
        assert!(dataset.x.iter().flatten().all(|v| v.is_finite()));
        assert_eq!(dataset.feature_names, vec!["N", "P", "K", "ph"]);
    }

    #[test]
    fn values_beyond_f32_range_count_as_missing() {
        let table = parse_table(
            b"N,P,K,ph,crop\n1e39,1,1,6,rice\n2,2,2,6,rice\n80,40,40,6.5,maize\n82,41,39,6.4,maize\n",
        )
        .unwrap();
        let dataset = preprocess(&table).unwrap();
        assert_eq!(dataset.dropped_rows, 1);
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.x[0], vec![2.0, 2.0, 2.0, 6.0]);
        assert!(dataset.x.iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn lists_every_missing_column() {
        let table = parse_table(b"N,K,label\n1,2,rice\n").unwrap();
        match preprocess(&table) {
            Err(DatasetError::MissingColumns { columns }) => {
                assert_eq!(columns, vec!["P", "ph", "crop"]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn missing_column_message_names_columns() {
        let err = DatasetError::MissingColumns {
            columns: vec!["ph".into(), "crop".into()],
        };
        assert_eq!(err.to_string(), "Missing required columns: ph, crop");
    }

    #[test]
    fn custom_columns_are_supported() {
        let table = parse_table(b"a,b,target\n1,2,x\n3,4,y\n").unwrap();
        let dataset = preprocess_with(&table, &["b", "a"], "target").unwrap();
        assert_eq!(dataset.x, vec![vec![2.0, 1.0], vec![4.0, 3.0]]);
        assert_eq!(dataset.labels, vec!["x", "y"]);
    }

    #[test]
    fn preview_renders_leading_rows() {
        let table = parse_table(SAMPLE.as_bytes()).unwrap();
        let preview = preview(&table, 3).unwrap();
        assert_eq!(preview.columns, vec!["N", "P", "K", "ph", "crop"]);
        assert_eq!(preview.rows.len(), 3);
        assert_eq!(preview.total_rows, 6);
        assert_eq!(preview.rows[0][4], "rice");
        assert_eq!(preview.rows[2][0], "");
    }
}
