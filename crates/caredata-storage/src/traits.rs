//! Store traits for the backing-store abstraction layer.

use async_trait::async_trait;
use std::sync::Arc;

use caredata_core::{EntityDefinition, QueryParams};

use crate::error::StoreError;
use crate::types::{FieldPredicate, StoredRecord};

/// The backing-store contract the query service executes against.
///
/// Implementations must be thread-safe (`Send + Sync`). Calls may block on
/// the backend and are bounded by the backend's own timeout policy; this
/// trait defines only the call contract above it.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Registers an entity so the store can validate and hold its records.
    ///
    /// # Errors
    ///
    /// Returns an error for infrastructure issues only; re-registration of
    /// the same entity replaces its schema reference without dropping data.
    async fn register_entity(&self, definition: Arc<EntityDefinition>) -> Result<(), StoreError>;

    /// Inserts one record for the given entity.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownEntity` for an unregistered entity and
    /// `StoreError::InvalidRecord` for a value/type mismatch.
    async fn insert(&self, entity: &str, record: StoredRecord) -> Result<(), StoreError>;

    /// Finds records matching all predicates (conjunctive), applying
    /// pagination and ordering when `params` is given.
    ///
    /// Absent params means natural store order, unbounded.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownEntity` / `StoreError::UnknownField` for
    /// bad references; infrastructure failures as `StoreError::Backend`.
    async fn find_by(
        &self,
        entity: &str,
        predicates: &[FieldPredicate],
        params: Option<&QueryParams>,
    ) -> Result<Vec<StoredRecord>, StoreError>;

    /// Counts records matching all predicates.
    ///
    /// Must be satisfiable by a count-only path: implementations never
    /// materialize row payloads to answer this call.
    ///
    /// # Errors
    ///
    /// Same error contract as `find_by`.
    async fn count_by(&self, entity: &str, predicates: &[FieldPredicate])
    -> Result<u64, StoreError>;

    /// Deletes records matching all predicates, returning how many were
    /// removed.
    ///
    /// # Errors
    ///
    /// Same error contract as `find_by`.
    async fn delete_by(
        &self,
        entity: &str,
        predicates: &[FieldPredicate],
    ) -> Result<u64, StoreError>;

    /// Name of this backend for logging and diagnostics.
    fn backend_name(&self) -> &'static str;
}

/// Type alias for a shareable store instance.
pub type DynEntityStore = Arc<dyn EntityStore>;
