//! In-memory backing-store backend for the CareData platform.
//!
//! This crate provides an in-memory implementation of the `EntityStore`
//! trait from `caredata-storage`, suitable for tests and embedded
//! deployments. Natural store order is insertion order and stays stable
//! across deletes.
//!
//! # Example
//!
//! ```ignore
//! use caredata_db_memory::InMemoryStore;
//! use caredata_storage::{EntityStore, FieldPredicate, StoredRecord};
//!
//! let store = InMemoryStore::new();
//! store.register_entity(definition).await?;
//! store.insert("Patient", record).await?;
//! let hits = store
//!     .find_by("Patient", &[FieldPredicate::eq("email", "a@x.com")], None)
//!     .await?;
//! ```

pub mod query;
pub mod store;

// Re-export the store trait and types for convenience
pub use caredata_storage::{DynEntityStore, EntityStore, FieldPredicate, StoreError, StoredRecord};
pub use store::InMemoryStore;

/// Creates a new shareable in-memory store instance.
#[must_use]
pub fn create_memory_store() -> DynEntityStore {
    std::sync::Arc::new(InMemoryStore::new())
}
