//! Classload interception: substitutes enhanced bytecode at the moment the
//! host requests a class.
//!
//! The hook sits on the host's classloading critical path, so it performs a
//! single lock-free pool read and no I/O. A pool miss hands the original
//! bytes straight back; only a hit pays for the substitution and the fixed
//! dynamic-import set the persistence provider needs.

use std::sync::Arc;
use tracing::{info, trace};

use crate::pool::EntityClassPool;

/// Extra symbol-visibility declarations the loader must honor for the
/// persistence machinery to resolve at runtime. A fixed, enumerable set,
/// not computed per class.
pub const COMMON_IMPORTS: [&str; 5] = [
    "caredata.persist",
    "caredata.persist.identity",
    "caredata.persist.spi",
    "caredata.mds.filter",
    "caredata.mds.util",
];

/// Result of one classload interception.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WovenClass {
    /// The class name the host asked for.
    pub class_name: String,
    /// Bytes the loader should use: the enhanced representation on a pool
    /// hit, the original bytes unchanged on a miss.
    pub bytes: Vec<u8>,
    /// Additional import declarations; empty on a miss.
    pub dynamic_imports: Vec<&'static str>,
}

impl WovenClass {
    /// Whether this class was substituted with an enhanced representation.
    #[must_use]
    pub fn is_enhanced(&self) -> bool {
        !self.dynamic_imports.is_empty()
    }
}

/// Interface the host registers a classload handler against.
///
/// Implementations must be safe to invoke from the host's classloading path
/// under concurrent, unordered requests for many distinct classes.
pub trait ClassLoadHook: Send + Sync {
    /// Intercepts one class-load request.
    fn weave(&self, class_name: &str, original_bytes: Vec<u8>) -> WovenClass;
}

/// The platform weaving hook: replaces registered entity classes with their
/// enhanced bytecode and injects the common persistence imports.
#[derive(Debug, Clone)]
pub struct WeavingHook {
    pool: Arc<EntityClassPool>,
}

impl WeavingHook {
    /// Creates a hook reading from the given pool.
    #[must_use]
    pub fn new(pool: Arc<EntityClassPool>) -> Self {
        Self { pool }
    }

    /// The pool this hook consults.
    #[must_use]
    pub fn pool(&self) -> &Arc<EntityClassPool> {
        &self.pool
    }
}

impl ClassLoadHook for WeavingHook {
    fn weave(&self, class_name: &str, original_bytes: Vec<u8>) -> WovenClass {
        trace!(class = %class_name, "Weaving called");

        match self.pool.get(class_name) {
            None => {
                trace!(class = %class_name, "No enhanced class data registered");
                WovenClass {
                    class_name: class_name.to_string(),
                    bytes: original_bytes,
                    dynamic_imports: Vec::new(),
                }
            }
            Some(data) => {
                info!(class = %class_name, "Weaving");
                WovenClass {
                    class_name: class_name.to_string(),
                    bytes: data.bytecode.clone(),
                    dynamic_imports: COMMON_IMPORTS.to_vec(),
                }
            }
        }
    }
}
