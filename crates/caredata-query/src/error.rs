//! Error types for lookup compilation and query execution.

use caredata_core::{FieldType, ReturnCardinality};
use caredata_storage::StoreError;

/// Errors raised while compiling a lookup or validating its arguments.
///
/// All of these are rejected before any store access.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// No lookup with this name is registered for the entity.
    #[error("Unknown lookup on {entity}: {lookup}")]
    UnknownLookup {
        /// The entity the caller queried.
        entity: String,
        /// The lookup name the caller used.
        lookup: String,
    },

    /// The lookup references a field the entity does not declare.
    #[error("Lookup {lookup} on {entity} references undeclared field: {field}")]
    UnknownField {
        /// The entity the lookup belongs to.
        entity: String,
        /// The lookup being compiled.
        lookup: String,
        /// The undeclared field name.
        field: String,
    },

    /// The caller passed the wrong number of arguments.
    #[error("Lookup {lookup} expects {expected} arguments, got {actual}")]
    Arity {
        /// The lookup being executed.
        lookup: String,
        /// Number of declared lookup fields.
        expected: usize,
        /// Number of arguments supplied.
        actual: usize,
    },

    /// An argument value does not match the lookup field's declared type.
    #[error("Lookup {lookup} argument for {field} must be {expected}")]
    Type {
        /// The lookup being executed.
        lookup: String,
        /// The field the argument binds to.
        field: String,
        /// The field's declared type.
        expected: FieldType,
    },

    /// A typed convenience was called on a lookup of another cardinality.
    #[error("Lookup {lookup} returns {actual:?}, not {expected:?}")]
    Cardinality {
        /// The lookup being executed.
        lookup: String,
        /// The cardinality the caller asked for.
        expected: ReturnCardinality,
        /// The lookup's declared cardinality.
        actual: ReturnCardinality,
    },
}

impl LookupError {
    /// Creates a new `UnknownLookup` error.
    #[must_use]
    pub fn unknown_lookup(entity: impl Into<String>, lookup: impl Into<String>) -> Self {
        Self::UnknownLookup {
            entity: entity.into(),
            lookup: lookup.into(),
        }
    }

    /// Creates a new `UnknownField` error.
    #[must_use]
    pub fn unknown_field(
        entity: impl Into<String>,
        lookup: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self::UnknownField {
            entity: entity.into(),
            lookup: lookup.into(),
            field: field.into(),
        }
    }
}

/// Errors surfaced by query execution.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// A single-result lookup matched more than one record.
    ///
    /// Surfaced to the caller rather than silently truncated.
    #[error("Ambiguous result for lookup {lookup} on {entity}: more than one record matched")]
    Ambiguous {
        /// The entity that was queried.
        entity: String,
        /// The single-result lookup that matched multiple records.
        lookup: String,
    },

    /// Compile-time or argument validation failure.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// A store-layer error, propagated unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl QueryError {
    /// Creates a new `Ambiguous` error.
    #[must_use]
    pub fn ambiguous(entity: impl Into<String>, lookup: impl Into<String>) -> Self {
        Self::Ambiguous {
            entity: entity.into(),
            lookup: lookup.into(),
        }
    }
}
