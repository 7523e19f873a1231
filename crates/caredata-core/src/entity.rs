use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::field::{FieldDefinition, FieldType};
use crate::lookup::LookupDefinition;

/// A declarative entity definition: the logical record type a module
/// contributes to the platform.
///
/// Created from configuration, immutable once registered. Redefinition
/// produces a new value that supersedes the old at registration time; the
/// old value is never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDefinition {
    /// Owning module; pool entries are purged per module on deactivation.
    pub module: String,
    /// Logical entity name, unique within the process.
    pub name: String,
    /// Ordered field list (order is significant for the class encoding).
    pub fields: Vec<FieldDefinition>,
    /// Declared lookups, validated against `fields` at enhancement time.
    pub lookups: Vec<LookupDefinition>,
}

impl EntityDefinition {
    /// Starts building an entity definition for the given module.
    #[must_use]
    pub fn builder(module: impl Into<String>, name: impl Into<String>) -> EntityDefinitionBuilder {
        EntityDefinitionBuilder {
            module: module.into(),
            name: name.into(),
            fields: Vec::new(),
            lookups: Vec::new(),
        }
    }

    /// Finds a declared field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether the entity declares a field with the given name.
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Finds a declared lookup by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&LookupDefinition> {
        self.lookups.iter().find(|l| l.name == name)
    }
}

/// Builder for `EntityDefinition`.
#[derive(Debug, Clone)]
pub struct EntityDefinitionBuilder {
    module: String,
    name: String,
    fields: Vec<FieldDefinition>,
    lookups: Vec<LookupDefinition>,
}

impl EntityDefinitionBuilder {
    /// Adds a non-nullable field.
    #[must_use]
    pub fn field(self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.field_def(FieldDefinition::new(name, field_type))
    }

    /// Adds a nullable field.
    #[must_use]
    pub fn nullable_field(self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.field_def(FieldDefinition::new(name, field_type).nullable())
    }

    /// Adds a fully specified field definition.
    #[must_use]
    pub fn field_def(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a lookup declaration.
    #[must_use]
    pub fn lookup(mut self, lookup: LookupDefinition) -> Self {
        self.lookups.push(lookup);
        self
    }

    /// Validates local invariants and builds the definition.
    ///
    /// Lookup field references are deliberately NOT validated here; that is
    /// the enhancement producer's job, so a bad lookup fails the entity's
    /// registration rather than its construction.
    ///
    /// # Errors
    ///
    /// Returns `CoreError` for empty names, duplicate fields, or duplicate
    /// lookup names.
    pub fn build(self) -> Result<EntityDefinition, CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::invalid_entity_name(self.name));
        }
        for (i, field) in self.fields.iter().enumerate() {
            if field.name.trim().is_empty() {
                return Err(CoreError::invalid_field_name(field.name.clone()));
            }
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(CoreError::duplicate_field(self.name, field.name.clone()));
            }
        }
        for (i, lookup) in self.lookups.iter().enumerate() {
            if self.lookups[..i].iter().any(|l| l.name == lookup.name) {
                return Err(CoreError::duplicate_lookup(self.name, lookup.name.clone()));
            }
        }
        Ok(EntityDefinition {
            module: self.module,
            name: self.name,
            fields: self.fields,
            lookups: self.lookups,
        })
    }
}
