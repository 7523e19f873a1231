//! Compiled query operations.
//!
//! [`compile`] turns a declarative lookup into an executable operation
//! against the backing store. Compilation happens once at registration;
//! execution is per call and validates arguments before touching the store.

use tracing::debug;

use caredata_core::{
    EntityDefinition, FieldType, FieldValue, LookupDefinition, QueryParams, ReturnCardinality,
};
use caredata_storage::{EntityStore, FieldPredicate, StoredRecord};

use crate::error::{LookupError, QueryError};

/// Result of executing a compiled query operation, tagged by the lookup's
/// return cardinality.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// Zero or one matching record; more than one is a `QueryError`.
    Single(Option<StoredRecord>),
    /// Matching records in the requested order.
    List(Vec<StoredRecord>),
    /// Number of matching records, counted without materializing rows.
    Count(u64),
}

/// One field slot of a compiled operation: the lookup pair plus the
/// resolved entity field type used for argument checking.
#[derive(Debug, Clone)]
struct BoundField {
    name: String,
    field_type: FieldType,
    nullable: bool,
}

/// An executable, pre-validated query operation.
#[derive(Debug, Clone)]
pub struct QueryOperation {
    entity: String,
    lookup: LookupDefinition,
    bound: Vec<BoundField>,
}

/// Compiles a lookup definition against its entity.
///
/// Revalidates every field reference (the same invariant the enhancement
/// producer enforces at registration) and resolves the expected argument
/// types so execution can reject bad calls before any store access.
///
/// # Errors
///
/// Returns `LookupError::UnknownField` for a field the entity does not
/// declare.
pub fn compile(
    entity: &EntityDefinition,
    lookup: &LookupDefinition,
) -> Result<QueryOperation, LookupError> {
    let mut bound = Vec::with_capacity(lookup.fields.len());
    for (field_name, _mode) in &lookup.fields {
        let field = entity
            .field(field_name)
            .ok_or_else(|| LookupError::unknown_field(&entity.name, &lookup.name, field_name))?;
        bound.push(BoundField {
            name: field.name.clone(),
            field_type: field.field_type,
            nullable: field.nullable,
        });
    }
    Ok(QueryOperation {
        entity: entity.name.clone(),
        lookup: lookup.clone(),
        bound,
    })
}

impl QueryOperation {
    /// The entity this operation queries.
    #[must_use]
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// The lookup this operation was compiled from.
    #[must_use]
    pub fn lookup(&self) -> &LookupDefinition {
        &self.lookup
    }

    /// The lookup's return cardinality.
    #[must_use]
    pub fn cardinality(&self) -> ReturnCardinality {
        self.lookup.cardinality
    }

    /// Executes the operation against a store.
    ///
    /// Arguments bind positionally to the lookup's declared fields and are
    /// combined conjunctively. `params` applies to list lookups only;
    /// absent params fall back to the lookup's declared defaults, then to
    /// natural store order, unbounded.
    ///
    /// # Errors
    ///
    /// `LookupError::Arity` / `LookupError::Type` before any store access;
    /// `QueryError::Ambiguous` when a single-result lookup matches more
    /// than one record; store errors propagated unchanged.
    pub async fn execute(
        &self,
        store: &dyn EntityStore,
        args: Vec<FieldValue>,
        params: Option<&QueryParams>,
    ) -> Result<QueryOutcome, QueryError> {
        let predicates = self.bind(args)?;
        debug!(
            entity = %self.entity,
            lookup = %self.lookup.name,
            cardinality = ?self.lookup.cardinality,
            "Executing lookup"
        );

        match self.lookup.cardinality {
            ReturnCardinality::Single => {
                // Two rows are enough to decide between found and ambiguous
                // without materializing the full match set.
                let probe = QueryParams::paged(1, 2);
                let mut records = store
                    .find_by(&self.entity, &predicates, Some(&probe))
                    .await?;
                match records.len() {
                    0 => Ok(QueryOutcome::Single(None)),
                    1 => Ok(QueryOutcome::Single(records.pop())),
                    _ => Err(QueryError::ambiguous(&self.entity, &self.lookup.name)),
                }
            }
            ReturnCardinality::List => {
                let effective = params.or(self.lookup.default_params.as_ref());
                let records = store.find_by(&self.entity, &predicates, effective).await?;
                Ok(QueryOutcome::List(records))
            }
            ReturnCardinality::Count => {
                let count = store.count_by(&self.entity, &predicates).await?;
                Ok(QueryOutcome::Count(count))
            }
        }
    }

    /// Binds positional arguments to predicates, checking arity and types.
    fn bind(&self, args: Vec<FieldValue>) -> Result<Vec<FieldPredicate>, LookupError> {
        if args.len() != self.bound.len() {
            return Err(LookupError::Arity {
                lookup: self.lookup.name.clone(),
                expected: self.bound.len(),
                actual: args.len(),
            });
        }
        let mut predicates = Vec::with_capacity(args.len());
        for (slot, value) in self.bound.iter().zip(args) {
            if !value.matches(slot.field_type, slot.nullable) {
                return Err(LookupError::Type {
                    lookup: self.lookup.name.clone(),
                    field: slot.name.clone(),
                    expected: slot.field_type,
                });
            }
            let (_, mode) = &self.lookup.fields[predicates.len()];
            predicates.push(FieldPredicate {
                field: slot.name.clone(),
                mode: *mode,
                value,
            });
        }
        Ok(predicates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caredata_core::ComparisonMode;

    fn patient() -> EntityDefinition {
        EntityDefinition::builder("demo-module", "Patient")
            .field("name", FieldType::Text)
            .nullable_field("email", FieldType::Text)
            .build()
            .unwrap()
    }

    fn by_email() -> LookupDefinition {
        LookupDefinition::builder("byEmail")
            .field("email", ComparisonMode::Eq)
            .returns(ReturnCardinality::Single)
            .build()
            .unwrap()
    }

    #[test]
    fn compile_rejects_undeclared_field() {
        let lookup = LookupDefinition::builder("bySsn")
            .field("ssn", ComparisonMode::Eq)
            .build()
            .unwrap();
        let err = compile(&patient(), &lookup).unwrap_err();
        assert!(matches!(err, LookupError::UnknownField { ref field, .. } if field == "ssn"));
    }

    #[test]
    fn bind_checks_arity_and_types() {
        let op = compile(&patient(), &by_email()).unwrap();

        let err = op.bind(vec![]).unwrap_err();
        assert!(matches!(err, LookupError::Arity { expected: 1, actual: 0, .. }));

        let err = op.bind(vec![FieldValue::Integer(7)]).unwrap_err();
        assert!(matches!(err, LookupError::Type { expected: FieldType::Text, .. }));

        let predicates = op.bind(vec![FieldValue::Text("a@x.com".into())]).unwrap();
        assert_eq!(predicates.len(), 1);
        assert_eq!(predicates[0].field, "email");
    }

    #[test]
    fn null_argument_binds_only_to_nullable_fields() {
        let op = compile(&patient(), &by_email()).unwrap();
        assert!(op.bind(vec![FieldValue::Null]).is_ok());

        let by_name = LookupDefinition::builder("byName")
            .field("name", ComparisonMode::Eq)
            .build()
            .unwrap();
        let op = compile(&patient(), &by_name).unwrap();
        assert!(op.bind(vec![FieldValue::Null]).is_err());
    }
}
