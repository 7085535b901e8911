use std::fmt;

use crate::domain::entities::value::{FieldType, FieldValue};

/// A dot-addressable path into a property bag, e.g. `address.city`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    raw: String,
}

impl PropertyPath {
    pub fn parse(raw: &str) -> Result<Self, PropertyError> {
        if raw.is_empty() || raw.split('.').any(|segment| segment.trim().is_empty()) {
            return Err(PropertyError::InvalidPath(raw.to_string()));
        }
        Ok(Self {
            raw: raw.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.raw.split('.')
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    InvalidPath(String),
    UnknownProperty(String),
    NotAScalar(String),
    Conversion {
        path: String,
        value: String,
        target: FieldType,
    },
    Unserializable {
        path: String,
        reason: String,
    },
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyError::InvalidPath(path) => write!(f, "malformed property path: '{path}'"),
            PropertyError::UnknownProperty(path) => write!(f, "no such property: '{path}'"),
            PropertyError::NotAScalar(path) => {
                write!(f, "property '{path}' does not address a single value")
            }
            PropertyError::Conversion {
                path,
                value,
                target,
            } => write!(
                f,
                "cannot convert '{value}' to {target} for property '{path}'"
            ),
            PropertyError::Unserializable { path, reason } => {
                write!(f, "cannot serialize property '{path}': {reason}")
            }
        }
    }
}

impl std::error::Error for PropertyError {}

/// Read/write access to named, typed properties.
///
/// Rows are read through it during serialization and filter states are
/// written through it while a request is applied. Writes receive the raw
/// request text and convert it per the target property's declared type;
/// `None` clears the property.
pub trait Properties {
    fn read(&self, path: &PropertyPath) -> Result<FieldValue, PropertyError>;

    fn write(&mut self, path: &PropertyPath, raw: Option<&str>) -> Result<(), PropertyError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_nested_paths() {
        let path = PropertyPath::parse("address.city").expect("path should parse");

        assert_eq!(path.segments().collect::<Vec<_>>(), vec!["address", "city"]);
        assert_eq!(path.to_string(), "address.city");
    }

    #[test]
    fn parse_rejects_empty_segments() {
        for raw in ["", ".name", "name.", "a..b", " "] {
            assert_eq!(
                PropertyPath::parse(raw),
                Err(PropertyError::InvalidPath(raw.to_string())),
                "'{raw}' should be rejected"
            );
        }
    }
}
