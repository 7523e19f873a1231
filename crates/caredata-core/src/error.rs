use thiserror::Error;

/// Core error types for CareData model construction
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid entity name: {0}")]
    InvalidEntityName(String),

    #[error("Invalid field name: {0}")]
    InvalidFieldName(String),

    #[error("Invalid lookup name: {0}")]
    InvalidLookupName(String),

    #[error("Unknown field type: {0}")]
    UnknownFieldType(String),

    #[error("Duplicate field on entity {entity}: {field}")]
    DuplicateField { entity: String, field: String },

    #[error("Duplicate lookup on entity {entity}: {lookup}")]
    DuplicateLookup { entity: String, lookup: String },

    #[error("Lookup {lookup} declares no fields")]
    EmptyLookup { lookup: String },
}

impl CoreError {
    /// Create a new InvalidEntityName error
    pub fn invalid_entity_name(name: impl Into<String>) -> Self {
        Self::InvalidEntityName(name.into())
    }

    /// Create a new InvalidFieldName error
    pub fn invalid_field_name(name: impl Into<String>) -> Self {
        Self::InvalidFieldName(name.into())
    }

    /// Create a new InvalidLookupName error
    pub fn invalid_lookup_name(name: impl Into<String>) -> Self {
        Self::InvalidLookupName(name.into())
    }

    /// Create a new UnknownFieldType error
    pub fn unknown_field_type(name: impl Into<String>) -> Self {
        Self::UnknownFieldType(name.into())
    }

    /// Create a new DuplicateField error
    pub fn duplicate_field(entity: impl Into<String>, field: impl Into<String>) -> Self {
        Self::DuplicateField {
            entity: entity.into(),
            field: field.into(),
        }
    }

    /// Create a new DuplicateLookup error
    pub fn duplicate_lookup(entity: impl Into<String>, lookup: impl Into<String>) -> Self {
        Self::DuplicateLookup {
            entity: entity.into(),
            lookup: lookup.into(),
        }
    }
}

/// Result type alias using CoreError
pub type Result<T> = std::result::Result<T, CoreError>;
