//! Backing-store abstraction layer for the CareData platform.
//!
//! This crate defines the boundary the query service issues operations
//! against: point lookup by conjunctive field-equality predicates, a
//! paginated scan, and a count-only path. The store's transport and wire
//! protocol are an external collaborator and deliberately out of scope;
//! backends implement [`EntityStore`] and are passed in by reference.

pub mod error;
pub mod traits;
pub mod types;

pub use error::StoreError;
pub use traits::{DynEntityStore, EntityStore};
pub use types::{FieldPredicate, StoredRecord};
