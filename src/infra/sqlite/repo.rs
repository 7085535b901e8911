use std::path::PathBuf;

use crate::domain::entities::dataset::DatasetId;
use crate::infra::sqlite::queries::{
    create_dataset_from_rows, list_datasets, load_columns, purge_dataset,
};
use crate::infra::sqlite::schema::{init_db, open_connection};
use crate::usecase::ports::repo::{
    DatasetMeta, DatasetRepository, NewDatasetMeta, RepoError, TabularData,
};

pub struct SqliteRepo {
    pub db_path: PathBuf,
}

impl SqliteRepo {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }
}

impl DatasetRepository for SqliteRepo {
    fn init(&self) -> Result<(), RepoError> {
        init_db(&self.db_path).map_err(|err| RepoError::Message(format!("{err:#}")))
    }

    fn list_datasets(&self) -> Result<Vec<DatasetMeta>, RepoError> {
        list_datasets(&self.db_path).map_err(|err| RepoError::Message(format!("{err:#}")))
    }

    fn load_columns(&self, id: DatasetId) -> Result<Vec<String>, RepoError> {
        init_db(&self.db_path)
            .and_then(|_| open_connection(&self.db_path))
            .and_then(|conn| load_columns(&conn, id.0))
            .map_err(|err| RepoError::Message(format!("{err:#}")))
    }

    fn create_dataset(
        &self,
        meta: NewDatasetMeta,
        data: TabularData,
    ) -> Result<DatasetId, RepoError> {
        let dataset_id = create_dataset_from_rows(
            &self.db_path,
            &meta.name,
            &meta.source_path,
            &data.columns,
            &data.rows,
        )
        .map_err(|err| RepoError::Message(format!("{err:#}")))?;

        Ok(DatasetId(dataset_id))
    }

    fn purge_dataset(&self, id: DatasetId) -> Result<(), RepoError> {
        purge_dataset(&self.db_path, id.0).map_err(|err| RepoError::Message(format!("{err:#}")))
    }
}
