use std::cmp::Ordering;

use crate::domain::entities::page::SortState;
use crate::domain::entities::property::{Properties, PropertyPath};
use crate::domain::entities::record::Record;
use crate::domain::entities::value::FieldValue;
use crate::usecase::ports::provider::{DataProvider, ProviderError, RowIter};

/// In-memory grid provider over a list of [`Record`]s.
///
/// A row passes the filter when every non-null filter field equals the
/// row's value at the same path. Sorting is stable; rows without the sort
/// field order as nulls.
#[derive(Debug, Clone)]
pub struct ListProvider {
    rows: Vec<Record>,
    sort: SortState,
    filter: Record,
    detach_count: usize,
}

impl ListProvider {
    pub fn new(rows: Vec<Record>, filter: Record) -> Self {
        Self {
            rows,
            sort: SortState::new(),
            filter,
            detach_count: 0,
        }
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn filter(&self) -> &Record {
        &self.filter
    }

    pub fn detach_count(&self) -> usize {
        self.detach_count
    }

    fn matching(&self) -> Vec<&Record> {
        let clauses = self.filter.assigned();
        self.rows
            .iter()
            .filter(|row| {
                clauses.iter().all(|(path, expected)| {
                    row.read(path)
                        .is_ok_and(|actual| actual.compare(expected) == Ordering::Equal)
                })
            })
            .collect()
    }

    fn sorted(&self) -> Vec<&Record> {
        let mut rows = self.matching();
        let Some(param) = self.sort.sort() else {
            return rows;
        };
        let Ok(path) = PropertyPath::parse(&param.property) else {
            return rows;
        };

        let key = |row: &Record| row.read(&path).unwrap_or(FieldValue::Null);
        rows.sort_by(|a, b| {
            let ordering = key(*a).compare(&key(*b));
            if param.ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });
        rows
    }
}

impl DataProvider for ListProvider {
    type Row = Record;

    fn size(&mut self) -> Result<u64, ProviderError> {
        Ok(self.matching().len() as u64)
    }

    fn fetch(&mut self, offset: u64, count: u64) -> Result<RowIter<'_, Record>, ProviderError> {
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let count = usize::try_from(count).unwrap_or(usize::MAX);
        let page = self
            .sorted()
            .into_iter()
            .skip(offset)
            .take(count)
            .cloned()
            .collect::<Vec<_>>();
        Ok(Box::new(page.into_iter()))
    }

    fn detach(&mut self) {
        self.detach_count += 1;
    }

    fn sort_state(&mut self) -> Option<&mut SortState> {
        Some(&mut self.sort)
    }

    fn filter_state(&mut self) -> Option<&mut dyn Properties> {
        Some(&mut self.filter)
    }
}
