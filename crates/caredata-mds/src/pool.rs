//! Process-wide entity class pool.
//!
//! Maps a logical class name to its enhanced binary representation.
//! Registration is a last-write-wins atomic per-key replace; lookups are
//! lock-free reads and a miss is a normal outcome (most classes loaded by
//! the host have no enhancement).
//!
//! Uses DashMap for lock-free concurrent access: many readers on the
//! classloading hot path, rare writers at module activation/deactivation.

use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info};

use caredata_core::EntityDefinition;

/// An enhanced class representation together with its originating
/// definition.
///
/// Exclusively owned by the pool once registered; consumers get shared
/// `Arc` handles so a concurrent re-registration can never tear an in-use
/// value.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedClassData {
    /// Logical class name this representation is registered under.
    pub class_name: String,
    /// Owning module, used for deactivation purges.
    pub module: String,
    /// The enhanced binary payload.
    pub bytecode: Vec<u8>,
    /// The definition the payload was derived from.
    pub definition: Arc<EntityDefinition>,
}

impl EnhancedClassData {
    /// Creates a new enhanced class data value.
    #[must_use]
    pub fn new(bytecode: Vec<u8>, definition: Arc<EntityDefinition>) -> Self {
        Self {
            class_name: definition.name.clone(),
            module: definition.module.clone(),
            bytecode,
            definition,
        }
    }
}

/// Process-wide registry of enhanced class representations.
///
/// Constructed explicitly and shared by reference between the enhancement
/// producer and the weaving hook.
#[derive(Debug, Default)]
pub struct EntityClassPool {
    entries: DashMap<String, Arc<EnhancedClassData>>,
}

impl EntityClassPool {
    /// Creates a new empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Registers enhanced class data under its logical class name.
    ///
    /// Idempotent overwrite: an existing entry for the same name is
    /// atomically replaced (last write wins). Concurrent lookups observe
    /// either the old or the new value, never a partial one.
    pub fn register(&self, data: EnhancedClassData) {
        let name = data.class_name.clone();
        info!(class = %name, module = %data.module, "Registering enhanced class data");
        self.entries.insert(name, Arc::new(data));
    }

    /// Looks up enhanced class data by exact class name.
    ///
    /// A pure read; a miss is an expected outcome and not an error.
    #[must_use]
    pub fn get(&self, class_name: &str) -> Option<Arc<EnhancedClassData>> {
        self.entries.get(class_name).map(|e| e.value().clone())
    }

    /// Removes the entry for the given class name.
    ///
    /// Returns true if an entry was present.
    pub fn unregister(&self, class_name: &str) -> bool {
        let removed = self.entries.remove(class_name).is_some();
        if removed {
            debug!(class = %class_name, "Unregistered enhanced class data");
        }
        removed
    }

    /// Purges all entries registered by the given module.
    ///
    /// Returns the number of entries removed. Used on module deactivation.
    pub fn unregister_module(&self, module: &str) -> usize {
        let names: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.value().module == module)
            .map(|e| e.key().clone())
            .collect();
        for name in &names {
            self.entries.remove(name);
        }
        if !names.is_empty() {
            info!(module = %module, count = names.len(), "Purged enhanced classes for module");
        }
        names.len()
    }

    /// Names of all registered classes.
    #[must_use]
    pub fn class_names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }

    /// Number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pool has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
