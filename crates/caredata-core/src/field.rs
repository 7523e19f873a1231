use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::error::CoreError;

/// Semantic field types supported by the enhancement producer.
///
/// Anything outside this set is rejected at enhancement time, not at query
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Integer,
    Long,
    Double,
    Bool,
    Date,
    DateTime,
    Uuid,
    Blob,
}

impl FieldType {
    /// Stable discriminant used by the binary class encoding.
    ///
    /// These values are part of the enhanced-class format and must never be
    /// reordered.
    pub const fn discriminant(self) -> u8 {
        match self {
            Self::Text => 0,
            Self::Integer => 1,
            Self::Long => 2,
            Self::Double => 3,
            Self::Bool => 4,
            Self::Date => 5,
            Self::DateTime => 6,
            Self::Uuid => 7,
            Self::Blob => 8,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Double => "double",
            Self::Bool => "bool",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Uuid => "uuid",
            Self::Blob => "blob",
        };
        write!(f, "{s}")
    }
}

impl FromStr for FieldType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" | "string" => Ok(Self::Text),
            "integer" | "int" => Ok(Self::Integer),
            "long" => Ok(Self::Long),
            "double" => Ok(Self::Double),
            "bool" | "boolean" => Ok(Self::Bool),
            "date" => Ok(Self::Date),
            "datetime" => Ok(Self::DateTime),
            "uuid" => Ok(Self::Uuid),
            "blob" | "bytes" => Ok(Self::Blob),
            _ => Err(CoreError::unknown_field_type(s)),
        }
    }
}

/// A single field declaration on an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub nullable: bool,
}

impl FieldDefinition {
    /// Creates a new non-nullable field definition.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            nullable: false,
        }
    }

    /// Marks the field as nullable.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// A typed runtime value for one entity field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum FieldValue {
    Text(String),
    Integer(i32),
    Long(i64),
    Double(f64),
    Bool(bool),
    Date(Date),
    DateTime(#[serde(with = "time::serde::rfc3339")] OffsetDateTime),
    Uuid(Uuid),
    Blob(Vec<u8>),
    Null,
}

impl FieldValue {
    /// Returns the declared type this value satisfies, or `None` for `Null`
    /// (a null satisfies any nullable field).
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            Self::Text(_) => Some(FieldType::Text),
            Self::Integer(_) => Some(FieldType::Integer),
            Self::Long(_) => Some(FieldType::Long),
            Self::Double(_) => Some(FieldType::Double),
            Self::Bool(_) => Some(FieldType::Bool),
            Self::Date(_) => Some(FieldType::Date),
            Self::DateTime(_) => Some(FieldType::DateTime),
            Self::Uuid(_) => Some(FieldType::Uuid),
            Self::Blob(_) => Some(FieldType::Blob),
            Self::Null => None,
        }
    }

    /// Whether this value can be stored in a field of the given type.
    pub fn matches(&self, field_type: FieldType, nullable: bool) -> bool {
        match self.field_type() {
            Some(t) => t == field_type,
            None => nullable,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Integer(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Uuid> for FieldValue {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_type_round_trips_through_str() {
        for ft in [
            FieldType::Text,
            FieldType::Integer,
            FieldType::Long,
            FieldType::Double,
            FieldType::Bool,
            FieldType::Date,
            FieldType::DateTime,
            FieldType::Uuid,
            FieldType::Blob,
        ] {
            let parsed: FieldType = ft.to_string().parse().unwrap();
            assert_eq!(parsed, ft);
        }
    }

    #[test]
    fn null_matches_only_nullable_fields() {
        assert!(FieldValue::Null.matches(FieldType::Text, true));
        assert!(!FieldValue::Null.matches(FieldType::Text, false));
        assert!(FieldValue::Text("a".into()).matches(FieldType::Text, false));
        assert!(!FieldValue::Integer(1).matches(FieldType::Text, false));
    }
}
