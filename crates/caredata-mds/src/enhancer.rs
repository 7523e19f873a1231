//! Enhancement producer: turns a declarative entity definition into its
//! enhanced binary class representation.
//!
//! The output encoding is versioned, length-prefixed, and little-endian,
//! derived exclusively from the ordered definition value. The same
//! definition always enhances to bit-identical bytes: no timestamps, no
//! randomness, no map iteration order anywhere in the format. That makes
//! repeated enhancement of an unchanged definition a safe no-op from the
//! pool's perspective.
//!
//! Layout (all integers little-endian):
//!
//! ```text
//! magic "CMDS" | format version u16
//! module (str) | entity name (str)
//! identity section: strategy u8 | identity accessor (str)
//! field table: count u32, then per field:
//!     name (str) | type u8 | nullable u8 | getter (str) | setter (str)
//! lookup table: count u32, then per lookup:
//!     name (str) | cardinality u8 | field count u32,
//!     then per field: name (str) | mode u8
//! ```
//!
//! where `str` is a u32 byte length followed by UTF-8 bytes.

use std::sync::Arc;
use tracing::debug;

use caredata_core::{EntityDefinition, FieldType};

use crate::error::DefinitionError;
use crate::pool::{EnhancedClassData, EntityClassPool};

/// Magic bytes at the start of every enhanced class payload.
pub const CLASS_MAGIC: [u8; 4] = *b"CMDS";

/// Current enhanced-class format version.
pub const CLASS_FORMAT_VERSION: u16 = 1;

/// Identity strategy: store-generated UUID (the only strategy in format v1).
const IDENTITY_GENERATED_UUID: u8 = 0;

/// Produces the enhanced class representation for a definition.
///
/// Validates the definition before producing any bytes: the entity must
/// declare at least one field, every lookup field must be declared on the
/// entity, and lookup predicate fields must have a comparable type.
///
/// # Errors
///
/// Returns [`DefinitionError`] on validation failure. The pool is never
/// consulted or modified here, so a failed enhancement cannot corrupt an
/// existing registration.
pub fn enhance(definition: &EntityDefinition) -> Result<EnhancedClassData, DefinitionError> {
    validate(definition)?;

    let mut bytes = Vec::with_capacity(256);
    bytes.extend_from_slice(&CLASS_MAGIC);
    put_u16(&mut bytes, CLASS_FORMAT_VERSION);
    put_str(&mut bytes, &definition.module);
    put_str(&mut bytes, &definition.name);

    // Identity plumbing.
    bytes.push(IDENTITY_GENERATED_UUID);
    put_str(&mut bytes, "get_id");

    // Generated field accessors.
    put_u32(&mut bytes, definition.fields.len() as u32);
    for field in &definition.fields {
        put_str(&mut bytes, &field.name);
        bytes.push(field.field_type.discriminant());
        bytes.push(u8::from(field.nullable));
        put_str(&mut bytes, &format!("get_{}", field.name));
        put_str(&mut bytes, &format!("set_{}", field.name));
    }

    // Declared lookups.
    put_u32(&mut bytes, definition.lookups.len() as u32);
    for lookup in &definition.lookups {
        put_str(&mut bytes, &lookup.name);
        bytes.push(lookup.cardinality.discriminant());
        put_u32(&mut bytes, lookup.fields.len() as u32);
        for (field_name, mode) in &lookup.fields {
            put_str(&mut bytes, field_name);
            bytes.push(*mode as u8);
        }
    }

    debug!(entity = %definition.name, size = bytes.len(), "Enhanced entity definition");
    Ok(EnhancedClassData::new(
        bytes,
        Arc::new(definition.clone()),
    ))
}

/// Enhances a definition and registers the result in the pool.
///
/// # Errors
///
/// Returns [`DefinitionError`] on validation failure; the pool's existing
/// entry for the entity, if any, is left untouched.
pub fn enhance_into_pool(
    definition: &EntityDefinition,
    pool: &EntityClassPool,
) -> Result<(), DefinitionError> {
    let data = enhance(definition)?;
    pool.register(data);
    Ok(())
}

fn validate(definition: &EntityDefinition) -> Result<(), DefinitionError> {
    if definition.fields.is_empty() {
        return Err(DefinitionError::empty_entity(&definition.name));
    }
    for lookup in &definition.lookups {
        for field_name in lookup.field_names() {
            let Some(field) = definition.field(field_name) else {
                return Err(DefinitionError::undeclared_lookup_field(
                    &definition.name,
                    &lookup.name,
                    field_name,
                ));
            };
            // The store contract only supports equality predicates over
            // comparable scalars; blobs and doubles are not comparable.
            if matches!(field.field_type, FieldType::Blob | FieldType::Double) {
                return Err(DefinitionError::unsupported_field_type(
                    &definition.name,
                    &lookup.name,
                    field_name,
                    field.field_type,
                ));
            }
        }
    }
    Ok(())
}

fn put_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_str(out: &mut Vec<u8>, s: &str) {
    put_u32(out, s.len() as u32);
    out.extend_from_slice(s.as_bytes());
}
