use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::foundation::error::{PipeError, PipeResult};
use crate::ops::descriptor::{register, ModuleDescriptor};
use crate::ops::provider::OperationProvider;

/// Process-wide catalog of registered operation descriptors, keyed by
/// operation key.
///
/// The catalog is an explicit handle: it is populated once at startup and
/// passed to session construction, rather than living as an ambient
/// singleton. Registration failures are local to one unit; the catalog keeps
/// loading the rest. Dropping the catalog tears every unit down, invoking
/// its global-cleanup hook first.
pub struct OperationCatalog {
    by_key: BTreeMap<String, Arc<ModuleDescriptor>>,
}

impl OperationCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self {
            by_key: BTreeMap::new(),
        }
    }

    /// Register every provider, skipping units that fail with a warning.
    ///
    /// This is the startup path: a unit that cannot be registered reduces
    /// the operation catalog but never aborts loading.
    pub fn load(providers: Vec<Box<dyn OperationProvider>>) -> Self {
        let mut catalog = Self::new();
        for provider in providers {
            let op = provider.op_key().to_string();
            match catalog.register(provider) {
                Ok(()) => debug!(%op, "registered operation"),
                Err(err) => warn!(%op, %err, "skipping operation"),
            }
        }
        catalog
    }

    /// Register one provider, running its global-init and preset hooks on
    /// success.
    pub fn register(&mut self, provider: Box<dyn OperationProvider>) -> PipeResult<()> {
        let descriptor = register(provider)?;
        if self.by_key.contains_key(descriptor.op()) {
            return Err(PipeError::invalid_descriptor(
                descriptor.op(),
                "operation key already registered",
            ));
        }
        descriptor.provider.init_global();
        descriptor.provider.init_presets();
        self.by_key.insert(descriptor.op().to_string(), descriptor);
        Ok(())
    }

    /// Look up a descriptor by operation key.
    pub fn get(&self, op: &str) -> Option<&Arc<ModuleDescriptor>> {
        self.by_key.get(op)
    }

    /// Human-readable name of a registered operation.
    pub fn display_name(&self, op: &str) -> Option<&str> {
        self.by_key.get(op).map(|d| d.name())
    }

    /// Descriptors in pipeline order (priority ascending, key as a stable
    /// tie-break for unrelated operations).
    pub fn iter_by_priority(&self) -> impl Iterator<Item = &Arc<ModuleDescriptor>> {
        let mut all: Vec<&Arc<ModuleDescriptor>> = self.by_key.values().collect();
        all.sort_by_key(|d| d.priority());
        all.into_iter()
    }

    /// Number of registered operations.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Return `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Tear the catalog down, releasing every unit.
    ///
    /// Equivalent to dropping, spelled out for callers that want an explicit
    /// shutdown point.
    pub fn teardown(self) {}
}

impl Default for OperationCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for OperationCatalog {
    fn drop(&mut self) {
        for descriptor in self.by_key.values() {
            descriptor.provider.cleanup_global();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ops/catalog.rs"]
mod tests;
