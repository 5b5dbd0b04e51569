//! Engine loader for building the catalog from configuration

use super::catalog::{EngineCatalog, EngineDescriptor, DEFAULT_ENGINE};
use crate::config::Settings;
use anyhow::Result;
use tracing::{info, warn};

/// Loader applying settings overrides to the built-in catalog
pub struct EngineLoader;

impl EngineLoader {
    /// Load the catalog from settings
    pub fn load(settings: &Settings) -> Result<EngineCatalog> {
        let builtin = EngineCatalog::builtin();

        for config in &settings.engines {
            if !builtin.contains(&config.name) {
                warn!("Ignoring override for unknown engine: {}", config.name);
            }
        }

        let mut descriptors: Vec<EngineDescriptor> = Vec::with_capacity(builtin.len());
        for engine in builtin.iter() {
            let mut descriptor = engine.clone();

            if let Some(config) = settings.get_engine(&engine.id) {
                if config.disabled {
                    if engine.id == DEFAULT_ENGINE {
                        warn!("The default engine {} cannot be disabled", engine.id);
                    } else {
                        info!("Skipping disabled engine: {}", engine.id);
                        continue;
                    }
                }
                if let Some(ref name) = config.display_name {
                    descriptor.name = name.clone();
                }
                if let Some(ref description) = config.description {
                    descriptor.description = description.clone();
                }
            }

            descriptors.push(descriptor);
        }

        let catalog = EngineCatalog::from_descriptors(descriptors)
            .ok_or_else(|| anyhow::anyhow!("Catalog lost the default engine"))?;
        info!("Loaded {} proxy engines", catalog.len());
        Ok(catalog)
    }
}
