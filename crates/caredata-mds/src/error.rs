use caredata_core::FieldType;

/// Errors raised while enhancing an entity definition.
///
/// A `DefinitionError` is fatal to that entity's registration only; other
/// entities already in the pool remain usable, and a failed enhancement
/// never touches an existing pool entry.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    /// The entity declares no fields, so there is nothing to enhance.
    #[error("Entity {entity} declares no fields")]
    EmptyEntity {
        /// The entity that failed enhancement.
        entity: String,
    },

    /// A lookup references a field type the store contract cannot compare.
    #[error("Unsupported field type in lookup {lookup} on {entity}: {field} is {field_type}")]
    UnsupportedFieldType {
        /// The entity that failed enhancement.
        entity: String,
        /// The lookup declaring the field.
        lookup: String,
        /// The offending field.
        field: String,
        /// The field's declared type.
        field_type: FieldType,
    },

    /// A lookup references a field the entity does not declare.
    #[error("Lookup {lookup} on {entity} references undeclared field: {field}")]
    UndeclaredLookupField {
        /// The entity that failed enhancement.
        entity: String,
        /// The lookup declaring the field.
        lookup: String,
        /// The undeclared field name.
        field: String,
    },
}

impl DefinitionError {
    /// Creates a new `EmptyEntity` error.
    #[must_use]
    pub fn empty_entity(entity: impl Into<String>) -> Self {
        Self::EmptyEntity {
            entity: entity.into(),
        }
    }

    /// Creates a new `UndeclaredLookupField` error.
    #[must_use]
    pub fn undeclared_lookup_field(
        entity: impl Into<String>,
        lookup: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self::UndeclaredLookupField {
            entity: entity.into(),
            lookup: lookup.into(),
            field: field.into(),
        }
    }

    /// Creates a new `UnsupportedFieldType` error.
    #[must_use]
    pub fn unsupported_field_type(
        entity: impl Into<String>,
        lookup: impl Into<String>,
        field: impl Into<String>,
        field_type: FieldType,
    ) -> Self {
        Self::UnsupportedFieldType {
            entity: entity.into(),
            lookup: lookup.into(),
            field: field.into(),
            field_type,
        }
    }
}
