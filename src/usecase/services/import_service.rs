use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::info;

use crate::domain::entities::dataset::DatasetId;
use crate::infra::import::csv::read_csv;
use crate::infra::import::xlsx::read_xlsx;
use crate::usecase::ports::repo::{DatasetRepository, NewDatasetMeta, TabularData};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportResult {
    pub dataset_id: DatasetId,
    pub row_count: usize,
}

pub struct ImportService {
    repo: Arc<dyn DatasetRepository>,
}

impl ImportService {
    pub fn new(repo: Arc<dyn DatasetRepository>) -> Self {
        Self { repo }
    }

    pub fn import_csv(&self, path: &Path) -> Result<ImportResult> {
        let (meta, data) = read_csv(path)?;
        self.store(meta, data)
    }

    pub fn import_xlsx(&self, path: &Path, sheet: Option<&str>) -> Result<ImportResult> {
        let (meta, data) = read_xlsx(path, sheet)?;
        self.store(meta, data)
    }

    /// Picks the reader from the file extension.
    pub fn import(&self, path: &Path, sheet: Option<&str>) -> Result<ImportResult> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => self.import_csv(path),
            "xlsx" | "xlsm" | "xls" | "ods" => self.import_xlsx(path, sheet),
            _ => bail!("unsupported file type: {}", path.display()),
        }
    }

    fn store(&self, meta: NewDatasetMeta, data: TabularData) -> Result<ImportResult> {
        let row_count = data.rows.len();
        let source = meta.source_path.clone();
        let dataset_id = self.repo.create_dataset(meta, data)?;
        info!(%dataset_id, row_count, %source, "dataset imported");

        Ok(ImportResult {
            dataset_id,
            row_count,
        })
    }
}
