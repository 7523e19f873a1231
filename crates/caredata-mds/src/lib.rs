//! Entity enhancement, class pool, and weaving hook for the CareData
//! platform.
//!
//! This crate is the portable core of the data-services (MDS) layer:
//!
//! - [`enhance`] turns a declarative [`EntityDefinition`] into a
//!   deterministic enhanced class representation, validating field types and
//!   lookup references up front.
//! - [`EntityClassPool`] is the process-wide registry mapping logical class
//!   names to their enhanced representation, shared by explicit reference
//!   (no framework-located singletons).
//! - [`WeavingHook`] substitutes enhanced bytes into the host's classloading
//!   path and signals the fixed set of extra imports the persistence
//!   machinery needs; a pool miss is a transparent passthrough.
//!
//! [`EntityDefinition`]: caredata_core::EntityDefinition

pub mod enhancer;
pub mod error;
pub mod pool;
pub mod weaving;

pub use enhancer::{CLASS_FORMAT_VERSION, CLASS_MAGIC, enhance, enhance_into_pool};
pub use error::DefinitionError;
pub use pool::{EnhancedClassData, EntityClassPool};
pub use weaving::{COMMON_IMPORTS, ClassLoadHook, WeavingHook, WovenClass};
