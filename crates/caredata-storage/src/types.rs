//! Data types used by the backing-store traits.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use caredata_core::{ComparisonMode, FieldValue};

/// One stored entity record: an identity plus its field values in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Store-assigned record identity.
    pub id: Uuid,
    /// Field values keyed by field name, in entity declaration order.
    pub fields: IndexMap<String, FieldValue>,
}

impl StoredRecord {
    /// Creates a record with a fresh identity.
    #[must_use]
    pub fn new(fields: IndexMap<String, FieldValue>) -> Self {
        Self {
            id: Uuid::new_v4(),
            fields,
        }
    }

    /// Creates a record with an explicit identity.
    #[must_use]
    pub fn with_id(id: Uuid, fields: IndexMap<String, FieldValue>) -> Self {
        Self { id, fields }
    }

    /// Gets a field value by name.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }
}

/// A single field-equality predicate.
///
/// Multi-predicate queries are always conjunctive (AND).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPredicate {
    /// The field to match.
    pub field: String,
    /// How to compare (equality only in the current contract).
    pub mode: ComparisonMode,
    /// The value to compare against.
    pub value: FieldValue,
}

impl FieldPredicate {
    /// Creates an equality predicate.
    #[must_use]
    pub fn eq(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.into(),
            mode: ComparisonMode::Eq,
            value: value.into(),
        }
    }

    /// Whether the record satisfies this predicate.
    #[must_use]
    pub fn matches(&self, record: &StoredRecord) -> bool {
        match self.mode {
            ComparisonMode::Eq => record.get(&self.field) == Some(&self.value),
        }
    }
}

/// Builds a record's field map in declaration order.
///
/// Convenience for tests and embedded callers.
#[must_use]
pub fn record_fields<I, K>(pairs: I) -> IndexMap<String, FieldValue>
where
    I: IntoIterator<Item = (K, FieldValue)>,
    K: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
