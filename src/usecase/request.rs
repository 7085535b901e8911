use std::collections::BTreeMap;

use url::form_urlencoded;

/// Query parameters of one grid request, name to first value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParameters {
    values: BTreeMap<String, String>,
}

impl RequestParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes an `application/x-www-form-urlencoded` query string. A
    /// leading `?` is skipped; when a name repeats, its first value wins.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut values = BTreeMap::new();
        for (name, value) in form_urlencoded::parse(query.as_bytes()) {
            values
                .entry(name.into_owned())
                .or_insert_with(|| value.into_owned());
        }
        Self { values }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// The value of `name`, with empty values treated as absent.
    pub fn optional_string(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// The value of `name` as an unsigned integer, or `default` when it is
    /// missing or not a number.
    pub fn to_u64(&self, name: &str, default: u64) -> u64 {
        self.optional_string(name)
            .and_then(|value| value.trim().parse::<u64>().ok())
            .unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RequestParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = RequestParameters::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_decodes_bracketed_grid_parameters() {
        let params = RequestParameters::parse(
            "?take=10&skip=20&sort%5B0%5D%5Bfield%5D=name&sort[0][dir]=desc\
             &filter[filters][0][value]=New+York",
        );

        assert_eq!(params.to_u64("take", 0), 10);
        assert_eq!(params.to_u64("skip", 0), 20);
        assert_eq!(params.optional_string("sort[0][field]"), Some("name"));
        assert_eq!(params.optional_string("sort[0][dir]"), Some("desc"));
        assert_eq!(
            params.optional_string("filter[filters][0][value]"),
            Some("New York")
        );
    }

    #[test]
    fn first_value_wins_for_repeated_names() {
        let params = RequestParameters::parse("skip=1&skip=2");

        assert_eq!(params.to_u64("skip", 0), 1);
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn numbers_fall_back_to_default() {
        let params = RequestParameters::parse("skip=abc&take=-5&page=");

        assert_eq!(params.to_u64("skip", 0), 0);
        assert_eq!(params.to_u64("take", 0), 0);
        assert_eq!(params.to_u64("page", 3), 3);
        assert_eq!(params.to_u64("missing", 7), 7);
    }

    #[test]
    fn empty_values_read_as_absent() {
        let params: RequestParameters = [("sort[0][field]", ""), ("sort[0][dir]", "asc")]
            .into_iter()
            .collect();

        assert_eq!(params.optional_string("sort[0][field]"), None);
        assert_eq!(params.optional_string("sort[0][dir]"), Some("asc"));
    }
}
