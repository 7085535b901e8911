use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::debug;

use crate::domain::entities::dataset::{
    ColumnFilter, DatasetId, RowQuery, SortDirection, SortSpec,
};
use crate::domain::entities::page::SortState;
use crate::domain::entities::property::Properties;
use crate::domain::entities::record::Record;
use crate::domain::entities::value::FieldType;
use crate::infra::sqlite::queries::{count_rows, load_columns, query_rows};
use crate::infra::sqlite::schema::{init_db, open_connection};
use crate::usecase::ports::provider::{DataProvider, ProviderError, RowIter};

/// Grid provider over one stored dataset.
///
/// Rows and the filter state are [`Record`]s with one text field per
/// stored column. A non-null filter field keeps rows whose cell contains
/// the filter text. The connection is opened on demand and dropped on
/// detach.
pub struct SqliteProvider {
    db_path: PathBuf,
    dataset_id: DatasetId,
    columns: Vec<String>,
    sort: SortState,
    filter: Record,
    conn: Option<Connection>,
}

impl SqliteProvider {
    pub fn open(db_path: &Path, dataset_id: DatasetId) -> Result<Self> {
        init_db(db_path)?;
        let conn = open_connection(db_path)?;
        let columns = load_columns(&conn, dataset_id.0)?;
        if columns.is_empty() {
            anyhow::bail!("dataset {dataset_id} does not exist or has no columns")
        }

        let filter = columns
            .iter()
            .fold(Record::new(), |record, name| record.declare(name, FieldType::Text));

        Ok(Self {
            db_path: db_path.to_path_buf(),
            dataset_id,
            columns,
            sort: SortState::new(),
            filter,
            conn: Some(conn),
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn filter(&self) -> &Record {
        &self.filter
    }

    pub fn is_attached(&self) -> bool {
        self.conn.is_some()
    }

    fn connection(&mut self) -> Result<&Connection> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => {
                debug!(dataset = self.dataset_id.0, "reopening dataset connection");
                open_connection(&self.db_path)?
            }
        };
        Ok(self.conn.insert(conn))
    }

    fn row_query(&self) -> Result<RowQuery> {
        let filters = self
            .columns
            .iter()
            .enumerate()
            .filter_map(|(col_idx, name)| {
                self.filter
                    .get(name)
                    .filter(|value| !value.is_null())
                    .map(|value| ColumnFilter {
                        column_idx: col_idx as i64,
                        term: value.to_string(),
                    })
            })
            .collect();

        let sort = match self.sort.sort() {
            None => None,
            Some(param) => {
                let col_idx = self
                    .columns
                    .iter()
                    .position(|name| *name == param.property)
                    .with_context(|| format!("unknown sort column: {}", param.property))?;
                Some(SortSpec {
                    column_idx: col_idx as i64,
                    direction: if param.ascending {
                        SortDirection::Asc
                    } else {
                        SortDirection::Desc
                    },
                })
            }
        };

        Ok(RowQuery { filters, sort })
    }

    fn count(&mut self) -> Result<u64> {
        let query = self.row_query()?;
        let dataset_id = self.dataset_id.0;
        let conn = self.connection()?;
        let total = count_rows(conn, dataset_id, &query)?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    fn rows(&mut self, offset: u64, count: u64) -> Result<Vec<Record>> {
        let query = self.row_query()?;
        let dataset_id = self.dataset_id.0;
        let column_count = self.columns.len();
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        let limit = i64::try_from(count).unwrap_or(i64::MAX);

        let conn = self.connection()?;
        let rows = query_rows(conn, dataset_id, column_count, &query, offset, limit)
            .with_context(|| format!("failed to read rows of dataset #{dataset_id}"))?;
        debug!(dataset = dataset_id, offset, limit, returned = rows.len(), "rows fetched");

        Ok(rows
            .into_iter()
            .map(|cells| {
                self.columns
                    .iter()
                    .zip(cells)
                    .fold(Record::new(), |record, (name, value)| record.with(name, value))
            })
            .collect())
    }
}

impl DataProvider for SqliteProvider {
    type Row = Record;

    fn size(&mut self) -> Result<u64, ProviderError> {
        self.count()
            .map_err(|err| ProviderError::Message(format!("{err:#}")))
    }

    fn fetch(&mut self, offset: u64, count: u64) -> Result<RowIter<'_, Record>, ProviderError> {
        let rows = self
            .rows(offset, count)
            .map_err(|err| ProviderError::Message(format!("{err:#}")))?;
        Ok(Box::new(rows.into_iter()))
    }

    fn detach(&mut self) {
        if self.conn.take().is_some() {
            debug!(dataset = self.dataset_id.0, "dataset connection released");
        }
    }

    fn sort_state(&mut self) -> Option<&mut SortState> {
        Some(&mut self.sort)
    }

    fn filter_state(&mut self) -> Option<&mut dyn Properties> {
        Some(&mut self.filter)
    }
}
