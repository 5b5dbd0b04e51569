//! Proxy engine module
//!
//! Holds the catalog of external proxy services, the registry tracking the
//! selected one, and the URL templates used to reach them.

mod catalog;
mod loader;
mod registry;
mod template;

pub use catalog::{EngineCatalog, EngineDescriptor, DEFAULT_ENGINE};
pub use loader::EngineLoader;
pub use registry::{EngineRegistry, RegistryError};
pub use template::{build_proxy_url, ProxyTemplate};
