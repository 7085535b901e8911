use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::{DataSourceSettings, NO_CACHE};
use crate::domain::entities::column::Column;
use crate::domain::entities::page::{PageRequest, PageResponse, SortOrder};
use crate::domain::entities::property::{Properties, PropertyError, PropertyPath};
use crate::usecase::ports::provider::{DataProvider, ProviderError};
use crate::usecase::request::RequestParameters;

/// The max number of filtered columns read from one request.
pub const MAX_FILTERS: usize = 20;

const SKIP: &str = "skip";
const TAKE: &str = "take";
const SORT_FIELD: &str = "sort[0][field]";
const SORT_DIR: &str = "sort[0][dir]";

// `filter[logic]` and `filter[filters][i][operator]` are sent by the grid
// but not read: every clause is handed to the filter state as a plain
// assignment and the provider decides how to match it.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSourceError {
    Conversion(PropertyError),
    Provider(ProviderError),
    Encoding(String),
}

impl std::fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSourceError::Conversion(err) => write!(f, "conversion failed: {err}"),
            DataSourceError::Provider(err) => write!(f, "data provider failed: {err}"),
            DataSourceError::Encoding(message) => {
                write!(f, "failed to encode response: {message}")
            }
        }
    }
}

impl std::error::Error for DataSourceError {}

impl From<PropertyError> for DataSourceError {
    fn from(value: PropertyError) -> Self {
        DataSourceError::Conversion(value)
    }
}

impl From<ProviderError> for DataSourceError {
    fn from(value: ProviderError) -> Self {
        DataSourceError::Provider(value)
    }
}

/// A fully built response, ready to be written by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceResponse {
    pub content_type: String,
    pub cache_control: &'static str,
    pub body: String,
}

/// Answers grid page requests from a [`DataProvider`].
///
/// Each request updates the provider's sort and filter state, reads the
/// requested window and serializes it as
/// `{"__count": <size>, "results": [...]}`. The provider is detached after
/// every request, whether it succeeded or not.
pub struct DataSource<P: DataProvider> {
    columns: Vec<Column>,
    provider: P,
    settings: DataSourceSettings,
}

impl<P: DataProvider> DataSource<P> {
    pub fn new(columns: Vec<Column>, provider: P) -> Self {
        Self {
            columns,
            provider,
            settings: DataSourceSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: DataSourceSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn into_provider(self) -> P {
        self.provider
    }

    pub fn handle_request(
        &mut self,
        params: &RequestParameters,
    ) -> Result<DataSourceResponse, DataSourceError> {
        let result = self.respond(params);
        self.provider.detach();
        if let Err(err) = &result {
            warn!(error = %err, "data source request failed");
        }
        result
    }

    fn respond(
        &mut self,
        params: &RequestParameters,
    ) -> Result<DataSourceResponse, DataSourceError> {
        let request = page_request(params);
        debug!(skip = request.skip, take = request.take, "grid page requested");

        self.apply_sort(params);
        self.apply_filters(params)?;

        let page = self.fetch_page(request)?;
        let body = serde_json::to_string(&page)
            .map_err(|err| DataSourceError::Encoding(err.to_string()))?;

        Ok(DataSourceResponse {
            content_type: self.settings.content_type(),
            cache_control: NO_CACHE,
            body,
        })
    }

    fn apply_sort(&mut self, params: &RequestParameters) {
        let Some(state) = self.provider.sort_state() else {
            return;
        };
        let Some(property) = params.optional_string(SORT_FIELD) else {
            return;
        };

        let order = SortOrder::from_direction(params.optional_string(SORT_DIR));
        debug!(property, ?order, "applying sort");
        state.set_property_sort_order(property, order);
    }

    fn apply_filters(&mut self, params: &RequestParameters) -> Result<(), DataSourceError> {
        let Some(state) = self.provider.filter_state() else {
            return Ok(());
        };

        for index in 0..MAX_FILTERS {
            let Some(field) = params.optional_string(&format!("filter[filters][{index}][field]"))
            else {
                break;
            };
            let value = params.optional_string(&format!("filter[filters][{index}][value]"));

            let path = PropertyPath::parse(field)?;
            debug!(index, field, value = ?value, "applying filter");
            state.write(&path, value)?;
        }

        Ok(())
    }

    fn fetch_page(&mut self, request: PageRequest) -> Result<PageResponse, DataSourceError> {
        let size = self.provider.size()?;
        let rows = self.provider.fetch(request.skip, request.take)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(json_row(&self.columns, &row)?);
        }
        debug!(size, returned = results.len(), "grid page fetched");

        Ok(PageResponse { size, results })
    }
}

fn page_request(params: &RequestParameters) -> PageRequest {
    PageRequest {
        skip: params.to_u64(SKIP, 0),
        take: params.to_u64(TAKE, 0),
    }
}

/// Projects one row onto the property columns, keyed by field path in
/// column order. Commands columns have no field and are skipped.
pub fn json_row<R: Properties + ?Sized>(
    columns: &[Column],
    row: &R,
) -> Result<Map<String, Value>, PropertyError> {
    let mut object = Map::new();
    for field in columns.iter().filter_map(Column::field_path) {
        let path = PropertyPath::parse(field)?;
        let value = row.read(&path)?;
        let json = value
            .to_json()
            .ok_or_else(|| PropertyError::Unserializable {
                path: field.to_string(),
                reason: format!("{value} is not a finite number"),
            })?;
        object.insert(field.to_string(), json);
    }
    Ok(object)
}
