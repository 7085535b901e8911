use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Number, Value};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Declared type of a property slot. Raw request strings are converted
/// through it before they are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Text,
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
}

impl FieldType {
    /// Converts a raw string into a value of this type, or `None` when the
    /// text cannot be read as one.
    pub fn parse(self, raw: &str) -> Option<FieldValue> {
        let trimmed = raw.trim();
        match self {
            FieldType::Text => Some(FieldValue::Text(raw.to_string())),
            FieldType::Integer => trimmed.parse::<i64>().ok().map(FieldValue::Integer),
            FieldType::Float => trimmed
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(FieldValue::Float),
            FieldType::Boolean => parse_bool(trimmed).map(FieldValue::Boolean),
            FieldType::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .ok()
                .map(FieldValue::Date),
            FieldType::DateTime => parse_date_time(trimmed).map(FieldValue::DateTime),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Text => "text",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
        };
        f.write_str(name)
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "y" | "1" => Some(true),
        "false" | "off" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    if let Ok(value) = DateTime::parse_from_rfc3339(text) {
        return Some(value.naive_utc());
    }
    NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            FieldValue::Null => None,
            FieldValue::Text(_) => Some(FieldType::Text),
            FieldValue::Integer(_) => Some(FieldType::Integer),
            FieldValue::Float(_) => Some(FieldType::Float),
            FieldValue::Boolean(_) => Some(FieldType::Boolean),
            FieldValue::Date(_) => Some(FieldType::Date),
            FieldValue::DateTime(_) => Some(FieldType::DateTime),
        }
    }

    /// Renders the value as a JSON scalar. Dates become ISO-8601 strings.
    /// Returns `None` for non-finite floats, which JSON cannot carry.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            FieldValue::Null => Some(Value::Null),
            FieldValue::Text(text) => Some(Value::String(text.clone())),
            FieldValue::Integer(value) => Some(Value::Number((*value).into())),
            FieldValue::Float(value) => Number::from_f64(*value).map(Value::Number),
            FieldValue::Boolean(value) => Some(Value::Bool(*value)),
            FieldValue::Date(value) => Some(Value::String(value.format(DATE_FORMAT).to_string())),
            FieldValue::DateTime(value) => Some(Value::String(
                value.format(DATE_TIME_FORMAT).to_string(),
            )),
        }
    }

    /// Total order used for sorting rows. Nulls come first, integers and
    /// floats compare numerically, other mixed kinds fall back to a fixed
    /// rank per kind.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
            (FieldValue::Float(a), FieldValue::Float(b)) => a.total_cmp(b),
            (FieldValue::Integer(a), FieldValue::Float(b)) => (*a as f64).total_cmp(b),
            (FieldValue::Float(a), FieldValue::Integer(b)) => a.total_cmp(&(*b as f64)),
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => a.cmp(b),
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Boolean(_) => 1,
            FieldValue::Integer(_) | FieldValue::Float(_) => 2,
            FieldValue::Date(_) => 3,
            FieldValue::DateTime(_) => 4,
            FieldValue::Text(_) => 5,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Integer(value) => write!(f, "{value}"),
            FieldValue::Float(value) => write!(f, "{value}"),
            FieldValue::Boolean(value) => write!(f, "{value}"),
            FieldValue::Date(value) => write!(f, "{}", value.format(DATE_FORMAT)),
            FieldValue::DateTime(value) => write!(f, "{}", value.format(DATE_TIME_FORMAT)),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_converts_raw_text_per_declared_type() {
        assert_eq!(
            FieldType::Integer.parse(" 30 "),
            Some(FieldValue::Integer(30))
        );
        assert_eq!(FieldType::Boolean.parse("Yes"), Some(FieldValue::Boolean(true)));
        assert_eq!(
            FieldType::Date.parse("2024-02-29"),
            NaiveDate::from_ymd_opt(2024, 2, 29).map(FieldValue::Date)
        );
        assert_eq!(
            FieldType::Text.parse(" keep spaces "),
            Some(FieldValue::Text(" keep spaces ".to_string()))
        );
    }

    #[test]
    fn parse_rejects_unreadable_text() {
        assert_eq!(FieldType::Integer.parse("thirty"), None);
        assert_eq!(FieldType::Float.parse("NaN"), None);
        assert_eq!(FieldType::Date.parse("2024-13-01"), None);
        assert_eq!(FieldType::Boolean.parse("maybe"), None);
    }

    #[test]
    fn datetime_accepts_rfc3339_and_local_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|date| date.and_hms_opt(8, 30, 0))
            .map(FieldValue::DateTime);

        assert_eq!(FieldType::DateTime.parse("2024-05-01T08:30:00"), expected);
        assert_eq!(FieldType::DateTime.parse("2024-05-01 08:30:00"), expected);
        assert_eq!(FieldType::DateTime.parse("2024-05-01T10:30:00+02:00"), expected);
    }

    #[test]
    fn to_json_refuses_non_finite_floats() {
        assert_eq!(FieldValue::Float(f64::NAN).to_json(), None);
        assert_eq!(
            FieldValue::Float(1.5).to_json(),
            Some(serde_json::json!(1.5))
        );
    }

    #[test]
    fn compare_orders_nulls_first_and_mixes_numbers() {
        assert_eq!(
            FieldValue::Null.compare(&FieldValue::Integer(0)),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::Integer(2).compare(&FieldValue::Float(1.5)),
            Ordering::Greater
        );
        assert_eq!(
            FieldValue::from("b").compare(&FieldValue::from("a")),
            Ordering::Greater
        );
    }
}
