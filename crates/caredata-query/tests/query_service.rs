//! Integration tests for the lookup query service against the in-memory
//! backend.

use std::sync::Arc;

use async_trait::async_trait;
use caredata_core::{
    ComparisonMode, EntityDefinition, FieldType, FieldValue, LookupDefinition, QueryParams,
    ReturnCardinality, SortDirection,
};
use caredata_db_memory::InMemoryStore;
use caredata_query::{EntityDataService, LookupError, QueryError, QueryOutcome};
use caredata_storage::types::record_fields;
use caredata_storage::{DynEntityStore, EntityStore, FieldPredicate, StoreError, StoredRecord};
use uuid::Uuid;

fn patient_definition() -> Arc<EntityDefinition> {
    Arc::new(
        EntityDefinition::builder("demo-module", "Patient")
            .field("id", FieldType::Uuid)
            .field("name", FieldType::Text)
            .nullable_field("email", FieldType::Text)
            .lookup(
                LookupDefinition::builder("byEmail")
                    .field("email", ComparisonMode::Eq)
                    .returns(ReturnCardinality::Single)
                    .build()
                    .unwrap(),
            )
            .lookup(
                LookupDefinition::builder("listByEmail")
                    .field("email", ComparisonMode::Eq)
                    .returns(ReturnCardinality::List)
                    .build()
                    .unwrap(),
            )
            .lookup(
                LookupDefinition::builder("countByEmail")
                    .field("email", ComparisonMode::Eq)
                    .returns(ReturnCardinality::Count)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap(),
    )
}

fn patient(name: &str, email: &str) -> StoredRecord {
    StoredRecord::new(record_fields([
        ("id", FieldValue::Uuid(Uuid::new_v4())),
        ("name", FieldValue::Text(name.into())),
        ("email", FieldValue::Text(email.into())),
    ]))
}

async fn seeded_service() -> (EntityDataService, DynEntityStore) {
    let definition = patient_definition();
    let store: DynEntityStore = Arc::new(InMemoryStore::new());
    store.register_entity(definition.clone()).await.unwrap();
    store
        .insert("Patient", patient("Ann", "a@x.com"))
        .await
        .unwrap();
    store
        .insert("Patient", patient("Abe", "a@x.com"))
        .await
        .unwrap();
    store
        .insert("Patient", patient("Bob", "b@x.com"))
        .await
        .unwrap();

    let service = EntityDataService::from_definition(definition, store.clone()).unwrap();
    (service, store)
}

#[tokio::test]
async fn single_lookup_returns_the_unique_match() {
    let (service, _) = seeded_service().await;
    let record = service
        .first("byEmail", vec![FieldValue::Text("b@x.com".into())])
        .await
        .unwrap()
        .expect("one record matches b@x.com");
    assert_eq!(record.get("name"), Some(&FieldValue::Text("Bob".into())));
}

#[tokio::test]
async fn single_lookup_with_two_matches_is_ambiguous() {
    let (service, _) = seeded_service().await;
    let err = service
        .first("byEmail", vec![FieldValue::Text("a@x.com".into())])
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::Ambiguous { ref lookup, .. } if lookup == "byEmail"));
}

#[tokio::test]
async fn single_lookup_with_no_match_is_none() {
    let (service, _) = seeded_service().await;
    let record = service
        .first("byEmail", vec![FieldValue::Text("nobody@x.com".into())])
        .await
        .unwrap();
    assert!(record.is_none());
}

#[tokio::test]
async fn list_lookup_applies_pagination_deterministically() {
    let (service, _) = seeded_service().await;

    // Absent params: natural store order, unbounded.
    let all = service
        .list("listByEmail", vec![FieldValue::Text("a@x.com".into())], None)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].get("name"), Some(&FieldValue::Text("Ann".into())));

    let params = QueryParams::paged(1, 1).sorted_by("name", SortDirection::Asc);
    let page = service
        .list(
            "listByEmail",
            vec![FieldValue::Text("a@x.com".into())],
            Some(&params),
        )
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].get("name"), Some(&FieldValue::Text("Abe".into())));
}

#[tokio::test]
async fn unknown_lookup_and_bad_arity_are_rejected_before_the_store() {
    let (service, _) = seeded_service().await;

    let err = service.execute("byName", vec![], None).await.unwrap_err();
    assert!(matches!(
        err,
        QueryError::Lookup(LookupError::UnknownLookup { .. })
    ));

    let err = service.execute("byEmail", vec![], None).await.unwrap_err();
    assert!(matches!(
        err,
        QueryError::Lookup(LookupError::Arity {
            expected: 1,
            actual: 0,
            ..
        })
    ));
}

#[tokio::test]
async fn cardinality_helpers_reject_mismatched_lookups() {
    let (service, _) = seeded_service().await;
    let err = service
        .count("byEmail", vec![FieldValue::Text("a@x.com".into())])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        QueryError::Lookup(LookupError::Cardinality { .. })
    ));
}

#[tokio::test]
async fn redefinition_swaps_the_lookup_set_atomically() {
    let (service, _) = seeded_service().await;
    assert_eq!(
        service.lookup_names(),
        vec!["byEmail", "countByEmail", "listByEmail"]
    );

    let replacement = Arc::new(
        EntityDefinition::builder("demo-module", "Patient")
            .field("id", FieldType::Uuid)
            .field("name", FieldType::Text)
            .nullable_field("email", FieldType::Text)
            .lookup(
                LookupDefinition::builder("byName")
                    .field("name", ComparisonMode::Eq)
                    .returns(ReturnCardinality::Single)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap(),
    );
    service.redefine(replacement).unwrap();

    assert_eq!(service.lookup_names(), vec!["byName"]);
    let err = service
        .first("byEmail", vec![FieldValue::Text("b@x.com".into())])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        QueryError::Lookup(LookupError::UnknownLookup { .. })
    ));

    let record = service
        .first("byName", vec![FieldValue::Text("Bob".into())])
        .await
        .unwrap();
    assert!(record.is_some());
}

#[tokio::test]
async fn failed_redefinition_keeps_the_old_schema() {
    let (service, _) = seeded_service().await;
    let bad = Arc::new(
        EntityDefinition::builder("demo-module", "Patient")
            .field("id", FieldType::Uuid)
            .lookup(
                LookupDefinition::builder("bySsn")
                    .field("ssn", ComparisonMode::Eq)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap(),
    );
    let err = service.redefine(bad).unwrap_err();
    assert!(matches!(err, LookupError::UnknownField { ref field, .. } if field == "ssn"));

    // Old lookups still resolve.
    assert!(
        service
            .first("byEmail", vec![FieldValue::Text("b@x.com".into())])
            .await
            .unwrap()
            .is_some()
    );
}

/// Store double that fails the test if the count path ever asks for rows.
struct CountOnlyStore {
    inner: InMemoryStore,
}

#[async_trait]
impl EntityStore for CountOnlyStore {
    async fn register_entity(&self, definition: Arc<EntityDefinition>) -> Result<(), StoreError> {
        self.inner.register_entity(definition).await
    }

    async fn insert(&self, entity: &str, record: StoredRecord) -> Result<(), StoreError> {
        self.inner.insert(entity, record).await
    }

    async fn find_by(
        &self,
        _entity: &str,
        _predicates: &[FieldPredicate],
        _params: Option<&QueryParams>,
    ) -> Result<Vec<StoredRecord>, StoreError> {
        Err(StoreError::backend(
            "row fetch invoked from the count path",
        ))
    }

    async fn count_by(
        &self,
        entity: &str,
        predicates: &[FieldPredicate],
    ) -> Result<u64, StoreError> {
        self.inner.count_by(entity, predicates).await
    }

    async fn delete_by(
        &self,
        entity: &str,
        predicates: &[FieldPredicate],
    ) -> Result<u64, StoreError> {
        self.inner.delete_by(entity, predicates).await
    }

    fn backend_name(&self) -> &'static str {
        "count-only"
    }
}

#[tokio::test]
async fn count_path_never_materializes_rows() {
    let definition = patient_definition();

    // Seed a plain store to establish the expected list length.
    let plain: DynEntityStore = Arc::new(InMemoryStore::new());
    plain.register_entity(definition.clone()).await.unwrap();
    let counting = CountOnlyStore {
        inner: InMemoryStore::new(),
    };
    counting.register_entity(definition.clone()).await.unwrap();

    for i in 0..1_000 {
        let email = if i % 4 == 0 {
            "intake@x.com".to_string()
        } else {
            format!("p{i}@y.org")
        };
        let record = patient(&format!("p{i}"), &email);
        plain.insert("Patient", record.clone()).await.unwrap();
        counting.insert("Patient", record).await.unwrap();
    }

    let list_service = EntityDataService::from_definition(definition.clone(), plain).unwrap();
    let full = list_service
        .execute(
            "listByEmail",
            vec![FieldValue::Text("intake@x.com".into())],
            None,
        )
        .await
        .unwrap();
    let QueryOutcome::List(records) = full else {
        panic!("expected list outcome");
    };
    assert_eq!(records.len(), 250);

    let count_service =
        EntityDataService::from_definition(definition, Arc::new(counting)).unwrap();
    let count = count_service
        .count("countByEmail", vec![FieldValue::Text("intake@x.com".into())])
        .await
        .unwrap();
    assert_eq!(count, records.len() as u64);
}

#[tokio::test]
async fn store_errors_propagate_unchanged() {
    let definition = patient_definition();
    let store: DynEntityStore = Arc::new(InMemoryStore::new());
    // Entity never registered with the store.
    let service = EntityDataService::from_definition(definition, store).unwrap();
    let err = service
        .first("byEmail", vec![FieldValue::Text("a@x.com".into())])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        QueryError::Store(StoreError::UnknownEntity { .. })
    ));
}
