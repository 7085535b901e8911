use crate::domain::entities::page::SortState;
use crate::domain::entities::property::Properties;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    Message(String),
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderError::Message(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ProviderError {}

pub type RowIter<'a, T> = Box<dyn Iterator<Item = T> + 'a>;

/// The row collection behind a grid.
///
/// Sorting and filtering are optional capabilities: a provider that supports
/// them hands out its state through [`DataProvider::sort_state`] and
/// [`DataProvider::filter_state`]. The state lives on the provider and is
/// kept between requests.
pub trait DataProvider {
    type Row: Properties;

    /// Number of rows in the whole (filtered) collection.
    fn size(&mut self) -> Result<u64, ProviderError>;

    /// Rows in `[offset, offset + count)` of the current ordering.
    fn fetch(&mut self, offset: u64, count: u64) -> Result<RowIter<'_, Self::Row>, ProviderError>;

    /// Releases per-request resources. Called once after every request.
    fn detach(&mut self) {}

    fn sort_state(&mut self) -> Option<&mut SortState> {
        None
    }

    fn filter_state(&mut self) -> Option<&mut dyn Properties> {
        None
    }
}
