use std::sync::Arc;

use crate::domain::entities::column::Column;
use crate::domain::entities::dataset::DatasetId;
use crate::usecase::ports::repo::{DatasetMeta, DatasetRepository, RepoError};

pub struct QueryService {
    repo: Arc<dyn DatasetRepository>,
}

impl QueryService {
    pub fn new(repo: Arc<dyn DatasetRepository>) -> Self {
        Self { repo }
    }

    pub fn list_datasets(&self) -> Result<Vec<DatasetMeta>, RepoError> {
        self.repo.list_datasets()
    }

    /// One property column per stored column name, titled with the name.
    pub fn grid_columns(&self, dataset_id: DatasetId) -> Result<Vec<Column>, RepoError> {
        let names = self.repo.load_columns(dataset_id)?;
        if names.is_empty() {
            return Err(RepoError::Message(format!(
                "dataset {dataset_id} has no columns"
            )));
        }
        Ok(names
            .into_iter()
            .map(|name| Column::property(name.clone(), name))
            .collect())
    }

    pub fn purge_dataset(&self, dataset_id: DatasetId) -> Result<(), RepoError> {
        self.repo.purge_dataset(dataset_id)
    }
}
