//! Module descriptor parsing and activation lifecycle for the CareData
//! platform.
//!
//! A module ships a TOML descriptor declaring its entities, fields, and
//! lookups. This crate parses descriptors into `EntityDefinition` values
//! and drives the activation lifecycle: activation enhances each entity and
//! registers it in the entity class pool, deactivation purges the module's
//! entries. An entity that fails enhancement is skipped and reported; the
//! rest of the module still activates.

pub mod descriptor;
pub mod error;
pub mod registrar;

pub use descriptor::{
    EntityDescriptor, FieldDescriptor, LookupDescriptor, ModuleDescriptor, ModuleSection,
};
pub use error::ConfigError;
pub use registrar::{ActivationReport, ModuleRegistrar};
