//! Engine registry: catalog lookups plus the current selection

use super::catalog::{EngineCatalog, EngineDescriptor};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

/// Selection errors. The UI ignores these; they exist so callers can tell a
/// typo from a real change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown engine id: {0}")]
    UnknownEngine(String),
}

/// Catalog access and the currently selected engine
pub struct EngineRegistry {
    catalog: Arc<EngineCatalog>,
    current: String,
    changes: watch::Sender<String>,
}

impl EngineRegistry {
    /// Create a registry selecting the catalog's default engine
    pub fn new(catalog: Arc<EngineCatalog>) -> Self {
        let current = catalog.default_engine().id.clone();
        let (changes, _) = watch::channel(current.clone());
        Self {
            catalog,
            current,
            changes,
        }
    }

    /// Create a registry and restore a previous selection.
    /// Unknown ids leave the default selected.
    pub fn with_current(catalog: Arc<EngineCatalog>, id: &str) -> Self {
        let mut registry = Self::new(catalog);
        if registry.set_current(id).is_err() {
            tracing::debug!("Discarding stored engine selection: {}", id);
        }
        registry
    }

    /// Get an engine by id, falling back to the default engine
    pub fn get(&self, id: &str) -> &EngineDescriptor {
        self.catalog.get(id)
    }

    /// All engines in catalog order
    pub fn list(&self) -> Vec<&EngineDescriptor> {
        self.catalog.iter().collect()
    }

    /// Select an engine. Unknown ids keep the previous selection.
    pub fn set_current(&mut self, id: &str) -> Result<(), RegistryError> {
        if !self.catalog.contains(id) {
            return Err(RegistryError::UnknownEngine(id.to_string()));
        }
        if self.current != id {
            self.current = id.to_string();
            self.changes.send_replace(self.current.clone());
        }
        Ok(())
    }

    /// The selected engine
    pub fn current(&self) -> &EngineDescriptor {
        self.get(&self.current)
    }

    /// Id of the selected engine
    pub fn current_id(&self) -> &str {
        &self.current
    }

    /// Check if an engine exists
    pub fn contains(&self, id: &str) -> bool {
        self.catalog.contains(id)
    }

    /// Observe selection changes
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.changes.subscribe()
    }

    /// Shared catalog
    pub fn catalog(&self) -> &Arc<EngineCatalog> {
        &self.catalog
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::new(Arc::new(EngineCatalog::builtin()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selection() {
        let registry = EngineRegistry::default();
        assert_eq!(registry.current_id(), "rammerhead");
        assert_eq!(registry.current().name, "Rammerhead");
    }

    #[test]
    fn test_get_known_and_unknown() {
        let registry = EngineRegistry::default();
        for id in ["rammerhead", "scramjet", "wisp", "croxyproxy"] {
            assert_eq!(registry.get(id).id, id);
        }
        assert_eq!(registry.get("typo").id, "rammerhead");
    }

    #[test]
    fn test_set_current() {
        let mut registry = EngineRegistry::default();
        assert!(registry.set_current("wisp").is_ok());
        assert_eq!(registry.current().id, "wisp");

        let err = registry.set_current("foo").unwrap_err();
        assert_eq!(err, RegistryError::UnknownEngine("foo".to_string()));
        assert_eq!(registry.current().id, "wisp");
    }

    #[test]
    fn test_list_preserves_order() {
        let registry = EngineRegistry::default();
        let ids: Vec<_> = registry.list().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["rammerhead", "scramjet", "wisp", "croxyproxy"]);
    }

    #[test]
    fn test_subscribers_see_changes() {
        let mut registry = EngineRegistry::default();
        let mut rx = registry.subscribe();
        assert!(!rx.has_changed().unwrap());

        registry.set_current("scramjet").unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), "scramjet");

        // Re-selecting and unknown ids do not notify
        registry.set_current("scramjet").unwrap();
        let _ = registry.set_current("nope");
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_with_current_restores_or_defaults() {
        let catalog = Arc::new(EngineCatalog::builtin());
        let restored = EngineRegistry::with_current(catalog.clone(), "wisp");
        assert_eq!(restored.current_id(), "wisp");

        let fallback = EngineRegistry::with_current(catalog, "gone");
        assert_eq!(fallback.current_id(), "rammerhead");
    }
}
