//! VizualNetwork: a launcher for third-party web proxy services
//!
//! Picks a proxy engine, turns a URL or search term into that engine's
//! proxy URL and opens it, either from the web front end or the CLI.

pub mod config;
pub mod engines;
pub mod launch;
pub mod metrics;
pub mod network;
pub mod probe;
pub mod query;
pub mod session;
pub mod theme;
pub mod ui;
pub mod web;

pub use config::Settings;
pub use engines::{EngineCatalog, EngineDescriptor, EngineRegistry};
pub use ui::AppController;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
