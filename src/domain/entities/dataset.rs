#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DatasetId(pub i64);

impl From<i64> for DatasetId {
    fn from(value: i64) -> Self {
        DatasetId(value)
    }
}

impl From<DatasetId> for i64 {
    fn from(value: DatasetId) -> Self {
        value.0
    }
}

impl std::fmt::Display for DatasetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column_idx: i64,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFilter {
    pub column_idx: i64,
    pub term: String,
}

/// Sort and filter options for one stored-dataset row query. Filters are
/// combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowQuery {
    pub filters: Vec<ColumnFilter>,
    pub sort: Option<SortSpec>,
}
