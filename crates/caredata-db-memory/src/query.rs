//! Filtering, ordering, and pagination over in-memory record sets.

use std::cmp::Ordering;

use caredata_core::{FieldValue, QueryParams, SortDirection};
use caredata_storage::{FieldPredicate, StoredRecord};

/// Whether a record satisfies every predicate (conjunctive matching).
#[must_use]
pub fn matches_all(record: &StoredRecord, predicates: &[FieldPredicate]) -> bool {
    predicates.iter().all(|p| p.matches(record))
}

/// Total order over field values of the same type, for sorting.
///
/// Values of different types (possible only on nullable columns holding
/// nulls) sort with `Null` first; `Double` uses IEEE total ordering so the
/// sort is deterministic even with NaN in the data.
#[must_use]
pub fn compare_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    use FieldValue::{Blob, Bool, Date, DateTime, Double, Integer, Long, Null, Text, Uuid};
    match (a, b) {
        (Null, Null) => Ordering::Equal,
        (Null, _) => Ordering::Less,
        (_, Null) => Ordering::Greater,
        (Text(x), Text(y)) => x.cmp(y),
        (Integer(x), Integer(y)) => x.cmp(y),
        (Long(x), Long(y)) => x.cmp(y),
        (Double(x), Double(y)) => x.total_cmp(y),
        (Bool(x), Bool(y)) => x.cmp(y),
        (Date(x), Date(y)) => x.cmp(y),
        (DateTime(x), DateTime(y)) => x.cmp(y),
        (Uuid(x), Uuid(y)) => x.cmp(y),
        (Blob(x), Blob(y)) => x.cmp(y),
        // Mixed types cannot come from a validated record set; fall back to
        // the type discriminant so the order is still total.
        _ => discriminant_rank(a).cmp(&discriminant_rank(b)),
    }
}

fn discriminant_rank(value: &FieldValue) -> u8 {
    value.field_type().map_or(0, |t| t.discriminant() + 1)
}

/// Applies ordering and pagination to an already-filtered record set.
///
/// Records arrive in natural (insertion) order; absent params returns them
/// unchanged and unbounded.
#[must_use]
pub fn apply_params(mut records: Vec<StoredRecord>, params: Option<&QueryParams>) -> Vec<StoredRecord> {
    let Some(params) = params else {
        return records;
    };

    if let Some(sort_field) = &params.sort_field {
        records.sort_by(|a, b| {
            let ord = compare_values(
                a.get(sort_field).unwrap_or(&FieldValue::Null),
                b.get(sort_field).unwrap_or(&FieldValue::Null),
            );
            match params.sort_direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
    }

    let offset = params.offset();
    if offset >= records.len() {
        return Vec::new();
    }
    let records = records.split_off(offset);
    match params.limit() {
        Some(limit) => records.into_iter().take(limit).collect(),
        None => records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caredata_storage::types::record_fields;

    fn record(name: &str, age: i32) -> StoredRecord {
        StoredRecord::new(record_fields([
            ("name", FieldValue::Text(name.into())),
            ("age", FieldValue::Integer(age)),
        ]))
    }

    #[test]
    fn absent_params_keep_natural_order_unbounded() {
        let records = vec![record("c", 3), record("a", 1), record("b", 2)];
        let out = apply_params(records.clone(), None);
        assert_eq!(out, records);
    }

    #[test]
    fn sort_and_paginate_are_deterministic() {
        let records = vec![record("c", 3), record("a", 1), record("b", 2)];
        let params = QueryParams::paged(1, 2).sorted_by("name", SortDirection::Asc);
        let out = apply_params(records.clone(), Some(&params));
        let names: Vec<_> = out
            .iter()
            .map(|r| match r.get("name").unwrap() {
                FieldValue::Text(s) => s.clone(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(names, vec!["a", "b"]);

        let params = QueryParams::paged(2, 2).sorted_by("name", SortDirection::Asc);
        let out = apply_params(records, Some(&params));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn offset_past_end_is_empty() {
        let records = vec![record("a", 1)];
        let out = apply_params(records, Some(&QueryParams::paged(5, 10)));
        assert!(out.is_empty());
    }

    #[test]
    fn nulls_sort_first() {
        assert_eq!(
            compare_values(&FieldValue::Null, &FieldValue::Integer(1)),
            Ordering::Less
        );
    }
}
