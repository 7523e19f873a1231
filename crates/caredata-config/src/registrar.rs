//! Module activation lifecycle.
//!
//! Activation enhances every entity a descriptor declares and registers the
//! results in the entity class pool. A `DefinitionError` is fatal to that
//! entity's registration only: the offending entity is reported and the
//! rest of the module still activates. Deactivation purges all of the
//! module's pool entries.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use caredata_mds::{DefinitionError, EntityClassPool, enhance_into_pool};

use crate::descriptor::ModuleDescriptor;
use crate::error::ConfigError;

/// Outcome of one module activation.
#[derive(Debug)]
pub struct ActivationReport {
    /// The activated module.
    pub module: String,
    /// Entities enhanced and registered in the pool.
    pub registered: Vec<String>,
    /// Entities whose enhancement failed, with the reason.
    pub failures: Vec<(String, DefinitionError)>,
}

impl ActivationReport {
    /// Whether every declared entity registered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drives module activation and deactivation against a shared class pool.
#[derive(Debug)]
pub struct ModuleRegistrar {
    pool: Arc<EntityClassPool>,
    /// Active module -> entity names it registered.
    active: Mutex<HashMap<String, Vec<String>>>,
}

impl ModuleRegistrar {
    /// Creates a registrar over the given pool.
    #[must_use]
    pub fn new(pool: Arc<EntityClassPool>) -> Self {
        Self {
            pool,
            active: Mutex::new(HashMap::new()),
        }
    }

    /// The pool this registrar manages.
    #[must_use]
    pub fn pool(&self) -> &Arc<EntityClassPool> {
        &self.pool
    }

    /// Activates a module: converts its descriptor and enhances each entity
    /// into the pool.
    ///
    /// A malformed descriptor rejects the whole module; a per-entity
    /// `DefinitionError` skips only that entity and is reported in the
    /// returned [`ActivationReport`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the descriptor itself cannot be converted
    /// into entity definitions.
    pub fn activate(&self, descriptor: &ModuleDescriptor) -> Result<ActivationReport, ConfigError> {
        let module = descriptor.module.name.clone();
        let definitions = descriptor.to_definitions()?;

        let mut registered = Vec::new();
        let mut failures = Vec::new();
        for definition in &definitions {
            match enhance_into_pool(definition, &self.pool) {
                Ok(()) => registered.push(definition.name.clone()),
                Err(err) => {
                    warn!(module = %module, entity = %definition.name, error = %err,
                        "Entity failed enhancement; skipping its registration");
                    failures.push((definition.name.clone(), err));
                }
            }
        }

        info!(module = %module, registered = registered.len(), failed = failures.len(),
            "Activated module");
        let mut active = self.active.lock().expect("registrar lock poisoned");
        active.insert(module.clone(), registered.clone());

        Ok(ActivationReport {
            module,
            registered,
            failures,
        })
    }

    /// Deactivates a module, purging all of its pool entries.
    ///
    /// Returns the number of entries removed. Deactivating an inactive
    /// module is a no-op.
    pub fn deactivate(&self, module: &str) -> usize {
        let mut active = self.active.lock().expect("registrar lock poisoned");
        active.remove(module);
        drop(active);
        let purged = self.pool.unregister_module(module);
        info!(module = %module, purged = purged, "Deactivated module");
        purged
    }

    /// Names of currently active modules.
    #[must_use]
    pub fn active_modules(&self) -> Vec<String> {
        let active = self.active.lock().expect("registrar lock poisoned");
        let mut names: Vec<String> = active.keys().cloned().collect();
        names.sort();
        names
    }
}
