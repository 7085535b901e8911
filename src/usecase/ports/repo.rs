use crate::domain::entities::dataset::DatasetId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    Message(String),
}

impl std::fmt::Display for RepoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoError::Message(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for RepoError {}

pub trait DatasetRepository: Send + Sync {
    fn init(&self) -> Result<(), RepoError>;

    fn list_datasets(&self) -> Result<Vec<DatasetMeta>, RepoError>;
    fn load_columns(&self, id: DatasetId) -> Result<Vec<String>, RepoError>;

    fn create_dataset(
        &self,
        meta: NewDatasetMeta,
        data: TabularData,
    ) -> Result<DatasetId, RepoError>;
    fn purge_dataset(&self, id: DatasetId) -> Result<(), RepoError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetMeta {
    pub id: DatasetId,
    pub name: String,
    pub row_count: i64,
    pub source_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDatasetMeta {
    pub name: String,
    pub source_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularData {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}
