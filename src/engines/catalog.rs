//! Proxy engine descriptors and the catalog that holds them

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Id of the engine used whenever a lookup misses
pub const DEFAULT_ENGINE: &str = "rammerhead";

/// Metadata for one external proxy service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineDescriptor {
    /// Unique key
    pub id: String,
    /// Display name
    pub name: String,
    /// One-line description
    pub description: String,
    /// Emoji shown next to the name
    pub icon: String,
    /// Ordered feature tags
    pub features: Vec<String>,
    /// Theme class name
    pub color: String,
    /// Landing page used by the connectivity probe
    pub website: String,
}

impl EngineDescriptor {
    fn builtin(
        id: &str,
        name: &str,
        description: &str,
        icon: &str,
        features: &[&str],
        color: &str,
        website: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            features: features.iter().map(|f| f.to_string()).collect(),
            color: color.to_string(),
            website: website.to_string(),
        }
    }

    /// Text shown under the engine selector
    pub fn summary(&self) -> String {
        format!("Using {} - {}", self.name, self.description)
    }
}

static BUILTIN: Lazy<Vec<EngineDescriptor>> = Lazy::new(|| {
    vec![
        EngineDescriptor::builtin(
            "rammerhead",
            "Rammerhead",
            "Stable, full browser proxy with advanced features",
            "🛡️",
            &["Full browser support", "Advanced tab cloaking", "Stable connections"],
            "neon-blue",
            "https://browser.rammerhead.org",
        ),
        EngineDescriptor::builtin(
            "scramjet",
            "Scramjet",
            "Fast, lightweight proxy for quick browsing",
            "⚡",
            &["Lightning fast", "Low resource usage", "Quick setup"],
            "neon-light-blue",
            "https://scramjet.org",
        ),
        EngineDescriptor::builtin(
            "wisp",
            "Wisp",
            "Experimental, WebSocket-based proxy for cutting-edge performance",
            "🌐",
            &["WebSocket technology", "Experimental features", "High performance"],
            "neon-cyan",
            "https://wisp.org",
        ),
        EngineDescriptor::builtin(
            "croxyproxy",
            "CroxyProxy",
            "Reliable fallback for sites the other engines cannot reach",
            "🔁",
            &["Reliable fallback", "No setup required", "Works with most sites"],
            "neon-purple",
            "https://www.croxyproxy.com",
        ),
    ]
});

/// Ordered, immutable set of engines keyed by id
#[derive(Debug, Clone)]
pub struct EngineCatalog {
    engines: Vec<EngineDescriptor>,
    index: HashMap<String, usize>,
    default_index: usize,
}

impl EngineCatalog {
    /// Catalog of the built-in engines
    pub fn builtin() -> Self {
        Self::from_descriptors(BUILTIN.clone())
            .expect("built-in catalog contains the default engine")
    }

    /// Build a catalog; `None` if the default engine is missing.
    /// Later duplicates of an id are dropped.
    pub fn from_descriptors(descriptors: Vec<EngineDescriptor>) -> Option<Self> {
        let mut engines = Vec::with_capacity(descriptors.len());
        let mut index = HashMap::new();

        for descriptor in descriptors {
            if index.contains_key(&descriptor.id) {
                continue;
            }
            index.insert(descriptor.id.clone(), engines.len());
            engines.push(descriptor);
        }

        let default_index = *index.get(DEFAULT_ENGINE)?;
        Some(Self {
            engines,
            index,
            default_index,
        })
    }

    /// Descriptor for `id`, or the default engine's descriptor
    pub fn get(&self, id: &str) -> &EngineDescriptor {
        let position = self.index.get(id).copied().unwrap_or(self.default_index);
        &self.engines[position]
    }

    /// Descriptor for `id` without fallback
    pub fn find(&self, id: &str) -> Option<&EngineDescriptor> {
        self.index.get(id).map(|&i| &self.engines[i])
    }

    /// The default engine
    pub fn default_engine(&self) -> &EngineDescriptor {
        &self.engines[self.default_index]
    }

    /// Check if an engine exists
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All descriptors in definition order
    pub fn iter(&self) -> impl Iterator<Item = &EngineDescriptor> {
        self.engines.iter()
    }

    /// Engine ids in definition order
    pub fn ids(&self) -> Vec<&str> {
        self.engines.iter().map(|e| e.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

impl Default for EngineCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let catalog = EngineCatalog::builtin();
        assert_eq!(
            catalog.ids(),
            vec!["rammerhead", "scramjet", "wisp", "croxyproxy"]
        );
    }

    #[test]
    fn test_get_falls_back_to_default() {
        let catalog = EngineCatalog::builtin();
        assert_eq!(catalog.get("scramjet").id, "scramjet");
        assert_eq!(catalog.get("nope").id, DEFAULT_ENGINE);
        assert_eq!(catalog.get("").id, DEFAULT_ENGINE);
        assert!(catalog.find("nope").is_none());
    }

    #[test]
    fn test_missing_default_rejected() {
        let without_default: Vec<_> = BUILTIN
            .iter()
            .filter(|e| e.id != DEFAULT_ENGINE)
            .cloned()
            .collect();
        assert!(EngineCatalog::from_descriptors(without_default).is_none());
    }

    #[test]
    fn test_duplicates_keep_first() {
        let mut descriptors = BUILTIN.clone();
        let mut copy = descriptors[1].clone();
        copy.name = "Impostor".to_string();
        descriptors.push(copy);

        let catalog = EngineCatalog::from_descriptors(descriptors).unwrap();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.get("scramjet").name, "Scramjet");
    }

    #[test]
    fn test_summary() {
        let catalog = EngineCatalog::builtin();
        assert_eq!(
            catalog.get("wisp").summary(),
            "Using Wisp - Experimental, WebSocket-based proxy for cutting-edge performance"
        );
    }
}
