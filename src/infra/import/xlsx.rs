use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use tracing::debug;

use crate::infra::import::dataset_name;
use crate::usecase::ports::repo::{NewDatasetMeta, TabularData};

pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.to_string(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v.to_string(),
        Data::DateTimeIso(v) => v.to_string(),
        Data::DurationIso(v) => v.to_string(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}

/// Reads one worksheet as a dataset. The first row is the header and blank
/// rows are skipped; when no sheet is named the first sheet is used.
pub fn read_xlsx(xlsx_path: &Path, sheet: Option<&str>) -> Result<(NewDatasetMeta, TabularData)> {
    let mut workbook = open_workbook_auto(xlsx_path)
        .with_context(|| format!("failed to open workbook: {}", xlsx_path.display()))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .with_context(|| format!("workbook has no sheets: {}", xlsx_path.display()))?,
    };
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("failed to read sheet: {sheet_name}"))?;

    let mut sheet_rows = range
        .rows()
        .map(|r| r.iter().map(cell_to_string).collect::<Vec<_>>());
    let headers = sheet_rows
        .next()
        .filter(|headers| headers.iter().any(|name| !name.is_empty()))
        .with_context(|| format!("sheet {sheet_name} has no header row"))?;
    let rows = sheet_rows
        .filter(|row| row.iter().any(|value| !value.is_empty()))
        .collect::<Vec<_>>();

    debug!(rows = rows.len(), sheet = %sheet_name, "worksheet read");

    let meta = NewDatasetMeta {
        name: format!("{}/{sheet_name}", dataset_name(xlsx_path, "workbook")),
        source_path: format!("{}#{sheet_name}", xlsx_path.to_string_lossy()),
    };
    Ok((
        meta,
        TabularData {
            columns: headers,
            rows,
        },
    ))
}
