use std::collections::BTreeMap;

use crate::domain::entities::property::{Properties, PropertyError, PropertyPath};
use crate::domain::entities::value::{FieldType, FieldValue};

#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Value {
        field_type: FieldType,
        value: FieldValue,
    },
    Nested(Record),
}

/// A nested bag of typed fields, usable both as a grid row and as a filter
/// state. Every scalar slot keeps the type it was declared with; writes
/// through [`Properties::write`] are converted to that type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: BTreeMap<String, Slot>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an empty (null) field of the given type.
    pub fn declare(mut self, name: &str, field_type: FieldType) -> Self {
        self.fields.insert(
            name.to_string(),
            Slot::Value {
                field_type,
                value: FieldValue::Null,
            },
        );
        self
    }

    /// Adds a field whose declared type follows the value; nulls are text.
    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn with_nested(mut self, name: &str, record: Record) -> Self {
        self.fields.insert(name.to_string(), Slot::Nested(record));
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) {
        let value = value.into();
        let field_type = value.field_type().unwrap_or(FieldType::Text);
        self.fields
            .insert(name.to_string(), Slot::Value { field_type, value });
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        match self.fields.get(name) {
            Some(Slot::Value { value, .. }) => Some(value),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Every non-null scalar, keyed by its full dot path, depth first.
    pub fn assigned(&self) -> Vec<(PropertyPath, FieldValue)> {
        let mut out = Vec::new();
        self.collect_assigned("", &mut out);
        out
    }

    fn collect_assigned(&self, prefix: &str, out: &mut Vec<(PropertyPath, FieldValue)>) {
        for (name, slot) in &self.fields {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}.{name}")
            };
            match slot {
                Slot::Value { value, .. } if !value.is_null() => {
                    if let Ok(path) = PropertyPath::parse(&path) {
                        out.push((path, value.clone()));
                    }
                }
                Slot::Value { .. } => {}
                Slot::Nested(record) => record.collect_assigned(&path, out),
            }
        }
    }

    fn slot(&self, path: &PropertyPath) -> Result<&Slot, PropertyError> {
        let mut current = self;
        let mut segments = path.segments().peekable();
        while let Some(segment) = segments.next() {
            let slot = current
                .fields
                .get(segment)
                .ok_or_else(|| PropertyError::UnknownProperty(path.to_string()))?;
            if segments.peek().is_none() {
                return Ok(slot);
            }
            match slot {
                Slot::Nested(record) => current = record,
                Slot::Value { .. } => {
                    return Err(PropertyError::UnknownProperty(path.to_string()))
                }
            }
        }
        Err(PropertyError::InvalidPath(path.to_string()))
    }

    fn slot_mut(&mut self, path: &PropertyPath) -> Result<&mut Slot, PropertyError> {
        let mut current = self;
        let mut segments = path.segments().peekable();
        while let Some(segment) = segments.next() {
            let slot = current
                .fields
                .get_mut(segment)
                .ok_or_else(|| PropertyError::UnknownProperty(path.to_string()))?;
            if segments.peek().is_none() {
                return Ok(slot);
            }
            match slot {
                Slot::Nested(record) => current = record,
                Slot::Value { .. } => {
                    return Err(PropertyError::UnknownProperty(path.to_string()))
                }
            }
        }
        Err(PropertyError::InvalidPath(path.to_string()))
    }
}

impl Properties for Record {
    fn read(&self, path: &PropertyPath) -> Result<FieldValue, PropertyError> {
        match self.slot(path)? {
            Slot::Value { value, .. } => Ok(value.clone()),
            Slot::Nested(_) => Err(PropertyError::NotAScalar(path.to_string())),
        }
    }

    fn write(&mut self, path: &PropertyPath, raw: Option<&str>) -> Result<(), PropertyError> {
        match self.slot_mut(path)? {
            Slot::Value { field_type, value } => {
                *value = match raw {
                    None => FieldValue::Null,
                    Some(raw) => field_type.parse(raw).ok_or_else(|| PropertyError::Conversion {
                        path: path.to_string(),
                        value: raw.to_string(),
                        target: *field_type,
                    })?,
                };
                Ok(())
            }
            Slot::Nested(_) => Err(PropertyError::NotAScalar(path.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(raw: &str) -> PropertyPath {
        PropertyPath::parse(raw).expect("test path should parse")
    }

    fn person() -> Record {
        Record::new()
            .with("name", "Alice")
            .with("age", 30_i64)
            .with_nested("address", Record::new().with("city", "Paris"))
    }

    #[test]
    fn read_walks_nested_records() {
        let record = person();

        assert_eq!(
            record.read(&path("address.city")),
            Ok(FieldValue::from("Paris"))
        );
        assert_eq!(record.read(&path("age")), Ok(FieldValue::Integer(30)));
    }

    #[test]
    fn read_reports_unknown_and_non_scalar_paths() {
        let record = person();

        assert_eq!(
            record.read(&path("address.zip")),
            Err(PropertyError::UnknownProperty("address.zip".to_string()))
        );
        assert_eq!(
            record.read(&path("name.first")),
            Err(PropertyError::UnknownProperty("name.first".to_string()))
        );
        assert_eq!(
            record.read(&path("address")),
            Err(PropertyError::NotAScalar("address".to_string()))
        );
    }

    #[test]
    fn write_converts_to_declared_type() {
        let mut filter = Record::new()
            .declare("age", FieldType::Integer)
            .declare("name", FieldType::Text);

        filter
            .write(&path("age"), Some("42"))
            .expect("integer write should succeed");

        assert_eq!(filter.get("age"), Some(&FieldValue::Integer(42)));
        assert_eq!(filter.get("name"), Some(&FieldValue::Null));
    }

    #[test]
    fn write_rejects_unconvertible_text_and_keeps_prior_value() {
        let mut filter = Record::new().with("age", 7_i64);

        let result = filter.write(&path("age"), Some("seven"));

        assert_eq!(
            result,
            Err(PropertyError::Conversion {
                path: "age".to_string(),
                value: "seven".to_string(),
                target: FieldType::Integer,
            })
        );
        assert_eq!(filter.get("age"), Some(&FieldValue::Integer(7)));
    }

    #[test]
    fn write_none_clears_the_field() {
        let mut filter = Record::new().with("name", "Bob");

        filter
            .write(&path("name"), None)
            .expect("clearing should succeed");

        assert_eq!(filter.get("name"), Some(&FieldValue::Null));
    }

    #[test]
    fn assigned_lists_non_null_leaves_with_full_paths() {
        let record = Record::new()
            .declare("empty", FieldType::Text)
            .with("age", 30_i64)
            .with_nested("address", Record::new().with("city", "Paris"));

        let assigned = record
            .assigned()
            .into_iter()
            .map(|(path, value)| (path.to_string(), value))
            .collect::<Vec<_>>();

        assert_eq!(
            assigned,
            vec![
                ("address.city".to_string(), FieldValue::from("Paris")),
                ("age".to_string(), FieldValue::Integer(30)),
            ]
        );
    }
}
