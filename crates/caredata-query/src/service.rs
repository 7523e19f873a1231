//! Per-entity data service: an entity's compiled lookup set plus the store
//! it executes against.
//!
//! The compiled set lives behind an `ArcSwap`, so redefinition swaps the
//! whole schema atomically: an in-flight query runs entirely against the
//! version it loaded, never a mix of old and new.

use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use caredata_core::{EntityDefinition, FieldValue, QueryParams, ReturnCardinality};
use caredata_storage::{DynEntityStore, StoredRecord};

use crate::error::{LookupError, QueryError};
use crate::operation::{QueryOperation, QueryOutcome, compile};

/// One compiled schema version: the definition and its operations.
#[derive(Debug)]
struct CompiledEntity {
    definition: Arc<EntityDefinition>,
    operations: HashMap<String, Arc<QueryOperation>>,
}

impl CompiledEntity {
    fn compile_all(definition: &Arc<EntityDefinition>) -> Result<Self, LookupError> {
        let mut operations = HashMap::with_capacity(definition.lookups.len());
        for lookup in &definition.lookups {
            let op = compile(definition, lookup)?;
            operations.insert(lookup.name.clone(), Arc::new(op));
        }
        Ok(Self {
            definition: definition.clone(),
            operations,
        })
    }
}

/// Query facade over one entity's declared lookups.
pub struct EntityDataService {
    store: DynEntityStore,
    compiled: ArcSwap<CompiledEntity>,
}

impl EntityDataService {
    /// Compiles all declared lookups and builds the service.
    ///
    /// The store is taken by shared handle; registering the entity's schema
    /// with the store is the module registrar's job, not the service's.
    ///
    /// # Errors
    ///
    /// Returns `LookupError` if any declared lookup fails compilation.
    pub fn from_definition(
        definition: Arc<EntityDefinition>,
        store: DynEntityStore,
    ) -> Result<Self, LookupError> {
        let compiled = CompiledEntity::compile_all(&definition)?;
        Ok(Self {
            store,
            compiled: ArcSwap::from_pointee(compiled),
        })
    }

    /// The entity definition this service currently queries.
    #[must_use]
    pub fn definition(&self) -> Arc<EntityDefinition> {
        self.compiled.load().definition.clone()
    }

    /// Names of the currently registered lookups.
    #[must_use]
    pub fn lookup_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.compiled.load().operations.keys().cloned().collect();
        names.sort();
        names
    }

    /// Replaces the entity's schema with a new definition.
    ///
    /// All lookups are compiled first; only on full success is the compiled
    /// set swapped in (atomic pointer swap, last write wins). A compilation
    /// failure leaves the previous schema untouched.
    ///
    /// # Errors
    ///
    /// Returns `LookupError` if any lookup in the new definition fails
    /// compilation.
    pub fn redefine(&self, definition: Arc<EntityDefinition>) -> Result<(), LookupError> {
        let compiled = CompiledEntity::compile_all(&definition)?;
        info!(entity = %definition.name, "Redefining entity schema");
        self.compiled.store(Arc::new(compiled));
        Ok(())
    }

    /// Executes a registered lookup by name.
    ///
    /// # Errors
    ///
    /// `LookupError::UnknownLookup` for an unregistered name; otherwise the
    /// operation's own execution errors.
    pub async fn execute(
        &self,
        lookup: &str,
        args: Vec<FieldValue>,
        params: Option<&QueryParams>,
    ) -> Result<QueryOutcome, QueryError> {
        let op = self.operation(lookup)?;
        op.execute(self.store.as_ref(), args, params).await
    }

    /// Executes a single-result lookup.
    ///
    /// # Errors
    ///
    /// `LookupError::Cardinality` if the lookup is not single-result;
    /// otherwise the operation's own execution errors.
    pub async fn first(
        &self,
        lookup: &str,
        args: Vec<FieldValue>,
    ) -> Result<Option<StoredRecord>, QueryError> {
        let op = self.expect_cardinality(lookup, ReturnCardinality::Single)?;
        match op.execute(self.store.as_ref(), args, None).await? {
            QueryOutcome::Single(record) => Ok(record),
            _ => unreachable!("single lookup produced non-single outcome"),
        }
    }

    /// Executes a list lookup.
    ///
    /// # Errors
    ///
    /// `LookupError::Cardinality` if the lookup is not list-valued;
    /// otherwise the operation's own execution errors.
    pub async fn list(
        &self,
        lookup: &str,
        args: Vec<FieldValue>,
        params: Option<&QueryParams>,
    ) -> Result<Vec<StoredRecord>, QueryError> {
        let op = self.expect_cardinality(lookup, ReturnCardinality::List)?;
        match op.execute(self.store.as_ref(), args, params).await? {
            QueryOutcome::List(records) => Ok(records),
            _ => unreachable!("list lookup produced non-list outcome"),
        }
    }

    /// Executes a count lookup.
    ///
    /// # Errors
    ///
    /// `LookupError::Cardinality` if the lookup is not a count; otherwise
    /// the operation's own execution errors.
    pub async fn count(&self, lookup: &str, args: Vec<FieldValue>) -> Result<u64, QueryError> {
        let op = self.expect_cardinality(lookup, ReturnCardinality::Count)?;
        match op.execute(self.store.as_ref(), args, None).await? {
            QueryOutcome::Count(count) => Ok(count),
            _ => unreachable!("count lookup produced non-count outcome"),
        }
    }

    fn operation(&self, lookup: &str) -> Result<Arc<QueryOperation>, LookupError> {
        let compiled = self.compiled.load();
        compiled.operations.get(lookup).cloned().ok_or_else(|| {
            LookupError::unknown_lookup(&compiled.definition.name, lookup)
        })
    }

    fn expect_cardinality(
        &self,
        lookup: &str,
        expected: ReturnCardinality,
    ) -> Result<Arc<QueryOperation>, LookupError> {
        let op = self.operation(lookup)?;
        if op.cardinality() != expected {
            return Err(LookupError::Cardinality {
                lookup: lookup.to_string(),
                expected,
                actual: op.cardinality(),
            });
        }
        Ok(op)
    }
}
