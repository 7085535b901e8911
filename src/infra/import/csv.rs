use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::infra::import::dataset_name;
use crate::usecase::ports::repo::{NewDatasetMeta, TabularData};

/// Reads a CSV file with a header row into a dataset named after the file
/// stem. Short records are padded with empty cells.
pub fn read_csv(csv_path: &Path) -> Result<(NewDatasetMeta, TabularData)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(csv_path)
        .with_context(|| format!("failed to open csv: {}", csv_path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("failed to read headers from csv: {}", csv_path.display()))?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    if headers.is_empty() {
        anyhow::bail!("csv header is required")
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("failed to parse csv record")?;
        let row = (0..headers.len())
            .map(|col_idx| record.get(col_idx).unwrap_or("").to_string())
            .collect::<Vec<_>>();
        rows.push(row);
    }
    debug!(rows = rows.len(), path = %csv_path.display(), "csv read");

    let meta = NewDatasetMeta {
        name: dataset_name(csv_path, "dataset"),
        source_path: csv_path.to_string_lossy().into_owned(),
    };
    Ok((
        meta,
        TabularData {
            columns: headers,
            rows,
        },
    ))
}
