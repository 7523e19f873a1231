//! Core entity and lookup model for the CareData platform.
//!
//! This crate defines the declarative data model shared by the rest of the
//! workspace: entity definitions with typed fields, named lookup
//! declarations, runtime field values, and the per-call query parameters.
//! Definitions are immutable once built; a redefinition is a new value that
//! supersedes the old one at registration time.

pub mod entity;
pub mod error;
pub mod field;
pub mod lookup;
pub mod query_params;

pub use entity::{EntityDefinition, EntityDefinitionBuilder};
pub use error::{CoreError, Result};
pub use field::{FieldDefinition, FieldType, FieldValue};
pub use lookup::{ComparisonMode, LookupDefinition, LookupDefinitionBuilder, ReturnCardinality};
pub use query_params::{QueryParams, SortDirection};
