use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use async_trait::async_trait;
use caredata_core::{EntityDefinition, QueryParams};
use caredata_storage::{EntityStore, FieldPredicate, StoreError, StoredRecord};

use crate::query::{apply_params, matches_all};

/// Per-entity record table: schema reference plus records in insertion
/// order.
#[derive(Debug)]
struct EntityTable {
    definition: Arc<EntityDefinition>,
    /// Vec order is natural store order; `retain` on delete preserves it.
    records: Vec<StoredRecord>,
}

/// In-memory backing store.
///
/// Entity tables live in an `RwLock`-guarded map; writes are rare (inserts
/// and deletes outside the classloading hot path) and queries take the
/// read half only. Natural order is insertion order.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<HashMap<String, EntityTable>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
        }
    }

    fn validate_predicates(
        definition: &EntityDefinition,
        entity: &str,
        predicates: &[FieldPredicate],
    ) -> Result<(), StoreError> {
        for predicate in predicates {
            if !definition.has_field(&predicate.field) {
                return Err(StoreError::unknown_field(entity, &predicate.field));
            }
        }
        Ok(())
    }

    fn validate_record(
        definition: &EntityDefinition,
        entity: &str,
        record: &StoredRecord,
    ) -> Result<(), StoreError> {
        for (name, value) in &record.fields {
            let Some(field) = definition.field(name) else {
                return Err(StoreError::unknown_field(entity, name));
            };
            if !value.matches(field.field_type, field.nullable) {
                return Err(StoreError::invalid_record(
                    entity,
                    format!("field {name} does not match declared type {}", field.field_type),
                ));
            }
        }
        for field in &definition.fields {
            if !field.nullable && record.get(&field.name).is_none() {
                return Err(StoreError::invalid_record(
                    entity,
                    format!("missing non-nullable field {}", field.name),
                ));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn register_entity(&self, definition: Arc<EntityDefinition>) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let name = definition.name.clone();
        tables
            .entry(name.clone())
            .and_modify(|table| table.definition = definition.clone())
            .or_insert_with(|| EntityTable {
                definition,
                records: Vec::new(),
            });
        debug!(entity = %name, "Registered entity table");
        Ok(())
    }

    async fn insert(&self, entity: &str, record: StoredRecord) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(entity)
            .ok_or_else(|| StoreError::unknown_entity(entity))?;
        Self::validate_record(&table.definition, entity, &record)?;
        table.records.push(record);
        Ok(())
    }

    async fn find_by(
        &self,
        entity: &str,
        predicates: &[FieldPredicate],
        params: Option<&QueryParams>,
    ) -> Result<Vec<StoredRecord>, StoreError> {
        let tables = self.tables.read().await;
        let table = tables
            .get(entity)
            .ok_or_else(|| StoreError::unknown_entity(entity))?;
        Self::validate_predicates(&table.definition, entity, predicates)?;
        if let Some(params) = params
            && let Some(sort_field) = &params.sort_field
            && !table.definition.has_field(sort_field)
        {
            return Err(StoreError::unknown_field(entity, sort_field));
        }

        let matched: Vec<StoredRecord> = table
            .records
            .iter()
            .filter(|r| matches_all(r, predicates))
            .cloned()
            .collect();
        Ok(apply_params(matched, params))
    }

    async fn count_by(
        &self,
        entity: &str,
        predicates: &[FieldPredicate],
    ) -> Result<u64, StoreError> {
        let tables = self.tables.read().await;
        let table = tables
            .get(entity)
            .ok_or_else(|| StoreError::unknown_entity(entity))?;
        Self::validate_predicates(&table.definition, entity, predicates)?;

        // Count in place; the count path never clones row payloads.
        let count = table
            .records
            .iter()
            .filter(|r| matches_all(r, predicates))
            .count();
        Ok(count as u64)
    }

    async fn delete_by(
        &self,
        entity: &str,
        predicates: &[FieldPredicate],
    ) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(entity)
            .ok_or_else(|| StoreError::unknown_entity(entity))?;
        Self::validate_predicates(&table.definition, entity, predicates)?;

        let before = table.records.len();
        table.records.retain(|r| !matches_all(r, predicates));
        Ok((before - table.records.len()) as u64)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
