use serde::Serialize;
use serde_json::{Map, Value};

const ASC: &str = "asc";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    Descending,
    #[default]
    None,
}

impl SortOrder {
    /// Reads a grid direction literal: `"asc"` sorts ascending, any other
    /// literal descending, and no literal at all means no order.
    pub fn from_direction(direction: Option<&str>) -> Self {
        match direction {
            None => SortOrder::None,
            Some(ASC) => SortOrder::Ascending,
            Some(_) => SortOrder::Descending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortParam {
    pub property: String,
    pub ascending: bool,
}

/// Single-column sort state: at most one property is sorted at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    param: Option<SortParam>,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ascending or descending replaces whatever was sorted before. `None`
    /// only clears the sort when `property` is the one currently sorted.
    pub fn set_property_sort_order(&mut self, property: &str, order: SortOrder) {
        match order {
            SortOrder::None => {
                if self
                    .param
                    .as_ref()
                    .is_some_and(|param| param.property == property)
                {
                    self.param = None;
                }
            }
            SortOrder::Ascending | SortOrder::Descending => {
                self.param = Some(SortParam {
                    property: property.to_string(),
                    ascending: order == SortOrder::Ascending,
                });
            }
        }
    }

    pub fn property_sort_order(&self, property: &str) -> SortOrder {
        match &self.param {
            Some(param) if param.property == property && param.ascending => SortOrder::Ascending,
            Some(param) if param.property == property => SortOrder::Descending,
            _ => SortOrder::None,
        }
    }

    pub fn sort(&self) -> Option<&SortParam> {
        self.param.as_ref()
    }
}

/// The `[skip, skip + take)` window a grid asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub skip: u64,
    pub take: u64,
}

/// One page as sent back to the grid. `size` counts the whole filtered
/// collection, not just `results`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageResponse {
    #[serde(rename = "__count")]
    pub size: u64,
    pub results: Vec<Map<String, Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_literals_map_to_orders() {
        assert_eq!(SortOrder::from_direction(Some("asc")), SortOrder::Ascending);
        assert_eq!(SortOrder::from_direction(Some("desc")), SortOrder::Descending);
        assert_eq!(SortOrder::from_direction(Some("ASC")), SortOrder::Descending);
        assert_eq!(SortOrder::from_direction(None), SortOrder::None);
    }

    #[test]
    fn new_sort_replaces_previous_property() {
        let mut state = SortState::new();
        state.set_property_sort_order("name", SortOrder::Ascending);
        state.set_property_sort_order("age", SortOrder::Descending);

        assert_eq!(state.property_sort_order("name"), SortOrder::None);
        assert_eq!(state.property_sort_order("age"), SortOrder::Descending);
    }

    #[test]
    fn none_only_clears_the_current_property() {
        let mut state = SortState::new();
        state.set_property_sort_order("name", SortOrder::Ascending);

        state.set_property_sort_order("age", SortOrder::None);
        assert_eq!(state.property_sort_order("name"), SortOrder::Ascending);

        state.set_property_sort_order("name", SortOrder::None);
        assert_eq!(state.sort(), None);
    }

    #[test]
    fn response_serializes_with_count_key_first() {
        let mut row = Map::new();
        row.insert("name".to_string(), Value::from("Alice"));
        let page = PageResponse {
            size: 5,
            results: vec![row],
        };

        let body = serde_json::to_string(&page).expect("page should serialize");

        assert_eq!(body, r#"{"__count":5,"results":[{"name":"Alice"}]}"#);
    }
}
