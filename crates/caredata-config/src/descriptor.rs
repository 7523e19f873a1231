//! TOML module descriptor format.
//!
//! ```toml
//! [module]
//! name = "appointments"
//!
//! [[entity]]
//! name = "Appointment"
//!
//! [[entity.field]]
//! name = "id"
//! type = "uuid"
//!
//! [[entity.field]]
//! name = "subject"
//! type = "text"
//! nullable = true
//!
//! [[entity.lookup]]
//! name = "bySubject"
//! fields = ["subject"]
//! returns = "single"
//! ```

use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use caredata_core::{
    ComparisonMode, EntityDefinition, FieldDefinition, FieldType, LookupDefinition,
    ReturnCardinality,
};

use crate::error::ConfigError;

/// The `[module]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleSection {
    /// Module name; pool entries are purged under this name on
    /// deactivation.
    pub name: String,
}

/// One `[[entity.field]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub nullable: bool,
}

/// One `[[entity.lookup]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupDescriptor {
    pub name: String,
    /// Ordered field names; all combined conjunctively with equality.
    pub fields: Vec<String>,
    /// `"single"`, `"list"` (default), or `"count"`.
    #[serde(default = "default_returns")]
    pub returns: String,
}

fn default_returns() -> String {
    "list".to_string()
}

/// One `[[entity]]` block.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityDescriptor {
    pub name: String,
    #[serde(rename = "field", default)]
    pub fields: Vec<FieldDescriptor>,
    #[serde(rename = "lookup", default)]
    pub lookups: Vec<LookupDescriptor>,
}

/// A full module descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleDescriptor {
    pub module: ModuleSection,
    #[serde(rename = "entity", default)]
    pub entities: Vec<EntityDescriptor>,
}

impl ModuleDescriptor {
    /// Parses a descriptor from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Reads and parses a descriptor file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` / `ConfigError::Parse`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading module descriptor");
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Converts the descriptor into entity definitions.
    ///
    /// Conversion validates names and types but not lookup field
    /// references; those are the enhancement producer's job, so a bad
    /// lookup fails the entity's registration rather than the whole
    /// descriptor.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for unknown field types, unknown
    /// cardinalities, or invalid model values.
    pub fn to_definitions(&self) -> Result<Vec<EntityDefinition>, ConfigError> {
        let mut definitions = Vec::with_capacity(self.entities.len());
        for entity in &self.entities {
            let mut builder = EntityDefinition::builder(&self.module.name, &entity.name);
            for field in &entity.fields {
                let field_type: FieldType = field.field_type.parse()?;
                let mut def = FieldDefinition::new(&field.name, field_type);
                if field.nullable {
                    def = def.nullable();
                }
                builder = builder.field_def(def);
            }
            for lookup in &entity.lookups {
                let cardinality = parse_cardinality(&lookup.name, &lookup.returns)?;
                let mut lookup_builder = LookupDefinition::builder(&lookup.name);
                for field in &lookup.fields {
                    lookup_builder = lookup_builder.field(field, ComparisonMode::Eq);
                }
                builder = builder.lookup(lookup_builder.returns(cardinality).build()?);
            }
            definitions.push(builder.build()?);
        }
        Ok(definitions)
    }
}

fn parse_cardinality(lookup: &str, value: &str) -> Result<ReturnCardinality, ConfigError> {
    match value {
        "single" => Ok(ReturnCardinality::Single),
        "list" => Ok(ReturnCardinality::List),
        "count" => Ok(ReturnCardinality::Count),
        _ => Err(ConfigError::unknown_cardinality(lookup, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTOR: &str = r#"
[module]
name = "appointments"

[[entity]]
name = "Appointment"

[[entity.field]]
name = "id"
type = "uuid"

[[entity.field]]
name = "subject"
type = "text"
nullable = true

[[entity.lookup]]
name = "bySubject"
fields = ["subject"]
returns = "single"

[[entity.lookup]]
name = "countBySubject"
fields = ["subject"]
returns = "count"
"#;

    #[test]
    fn descriptor_round_trips_into_definitions() {
        let descriptor = ModuleDescriptor::from_toml(DESCRIPTOR).unwrap();
        let definitions = descriptor.to_definitions().unwrap();
        assert_eq!(definitions.len(), 1);

        let appointment = &definitions[0];
        assert_eq!(appointment.module, "appointments");
        assert_eq!(appointment.name, "Appointment");
        assert_eq!(appointment.fields.len(), 2);
        assert!(appointment.field("subject").unwrap().nullable);
        assert_eq!(
            appointment.lookup("bySubject").unwrap().cardinality,
            ReturnCardinality::Single
        );
        assert_eq!(
            appointment.lookup("countBySubject").unwrap().cardinality,
            ReturnCardinality::Count
        );
    }

    #[test]
    fn unknown_field_type_is_a_config_error() {
        let bad = DESCRIPTOR.replace("type = \"uuid\"", "type = \"money\"");
        let descriptor = ModuleDescriptor::from_toml(&bad).unwrap();
        assert!(matches!(
            descriptor.to_definitions().unwrap_err(),
            ConfigError::Model(_)
        ));
    }

    #[test]
    fn unknown_cardinality_is_a_config_error() {
        let bad = DESCRIPTOR.replace("returns = \"count\"", "returns = \"sum\"");
        let descriptor = ModuleDescriptor::from_toml(&bad).unwrap();
        assert!(matches!(
            descriptor.to_definitions().unwrap_err(),
            ConfigError::UnknownCardinality { .. }
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            ModuleDescriptor::from_toml("[module").unwrap_err(),
            ConfigError::Parse(_)
        ));
    }
}
