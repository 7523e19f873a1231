//! Store error types for the backing-store abstraction layer.

/// Errors that can occur during store operations.
///
/// Store errors are propagated to callers unchanged by the layers above;
/// the query service never swallows or rewraps them.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The entity has not been registered with this store.
    #[error("Unknown entity: {entity}")]
    UnknownEntity {
        /// The entity name the caller used.
        entity: String,
    },

    /// A predicate or sort referenced a field the entity does not declare.
    #[error("Unknown field on {entity}: {field}")]
    UnknownField {
        /// The entity being queried.
        entity: String,
        /// The unknown field name.
        field: String,
    },

    /// A record value did not match the entity's declared field type.
    #[error("Invalid record for {entity}: {message}")]
    InvalidRecord {
        /// The entity being written.
        entity: String,
        /// Description of the mismatch.
        message: String,
    },

    /// A backend infrastructure error.
    #[error("Backend error: {message}")]
    Backend {
        /// Description of the backend failure.
        message: String,
    },
}

impl StoreError {
    /// Creates a new `UnknownEntity` error.
    #[must_use]
    pub fn unknown_entity(entity: impl Into<String>) -> Self {
        Self::UnknownEntity {
            entity: entity.into(),
        }
    }

    /// Creates a new `UnknownField` error.
    #[must_use]
    pub fn unknown_field(entity: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            entity: entity.into(),
            field: field.into(),
        }
    }

    /// Creates a new `InvalidRecord` error.
    #[must_use]
    pub fn invalid_record(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// Creates a new `Backend` error.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}
