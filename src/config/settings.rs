//! Settings structures for VizualNetwork configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Longest accepted duration setting: one year
const MAX_DURATION_SECS: u64 = 365 * 24 * 60 * 60;

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub search: SearchSettings,
    pub launch: LaunchSettings,
    pub ui: UiSettings,
    pub engines: Vec<EngineConfig>,
    pub outgoing: OutgoingSettings,
    pub probe: ProbeSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            server: ServerSettings::default(),
            search: SearchSettings::default(),
            launch: LaunchSettings::default(),
            ui: UiSettings::default(),
            engines: Vec::new(),
            outgoing: OutgoingSettings::default(),
            probe: ProbeSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (VIZUAL_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    fn merge_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("VIZUAL_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Some(val) = var("VIZUAL_SECRET_KEY") {
            if val.trim().is_empty() {
                tracing::warn!("Ignoring empty VIZUAL_SECRET_KEY");
            } else {
                self.server.secret_key = val;
            }
        }
        if let Some(val) = var("VIZUAL_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("VIZUAL_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = var("VIZUAL_BASE_URL") {
            self.server.base_url = Some(val);
        }
    }

    /// Reject values that would panic or weaken the instance once used
    pub fn validate(&self) -> Result<()> {
        if self.server.secret_key.trim().is_empty() {
            bail!("server.secret_key must not be empty");
        }
        check_seconds("outgoing.request_timeout", self.outgoing.request_timeout)?;
        check_seconds("probe.timeout_secs", self.probe.timeout_secs)?;
        if self.probe.interval_secs == 0 {
            bail!("probe.interval_secs must be positive");
        }
        for (name, secs) in [
            ("probe.interval_secs", self.probe.interval_secs),
            ("probe.cache_ttl_secs", self.probe.cache_ttl_secs),
            ("launch.fallback_ttl_secs", self.launch.fallback_ttl_secs),
            ("ui.notification_ttl_secs", self.ui.notification_ttl_secs),
        ] {
            if secs > MAX_DURATION_SECS {
                bail!("{} must be at most {} seconds", name, MAX_DURATION_SECS);
            }
        }
        Ok(())
    }

    /// Get engine override by id
    pub fn get_engine(&self, name: &str) -> Option<&EngineConfig> {
        self.engines.iter().find(|e| e.name == name)
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug mode
    pub debug: bool,
    /// Instance name displayed in UI
    pub instance_name: String,
    /// Enable metrics collection
    pub enable_metrics: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "VizualNetwork".to_string(),
            enable_metrics: true,
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
    /// Base URL for the instance
    pub base_url: Option<String>,
    /// Public instance mode
    pub public_instance: bool,
    /// Secret key used to sign session cookies
    pub secret_key: String,
    /// Enable the launch rate limiter
    pub limiter: bool,
    /// Launches allowed per minute when the limiter is on
    pub launches_per_minute: u32,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8888,
            bind_address: "127.0.0.1".to_string(),
            base_url: None,
            public_instance: false,
            secret_key: generate_secret_key(),
            limiter: false,
            launches_per_minute: 60,
        }
    }
}

/// Search engine used to wrap plain search terms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchProvider {
    #[default]
    Google,
    Bing,
    DuckDuckGo,
    Yahoo,
}

impl SearchProvider {
    /// Query URL prefix; the encoded search term is appended verbatim
    pub fn query_prefix(&self) -> &'static str {
        match self {
            Self::Google => "https://www.google.com/search?q=",
            Self::Bing => "https://www.bing.com/search?q=",
            Self::DuckDuckGo => "https://duckduckgo.com/?q=",
            Self::Yahoo => "https://search.yahoo.com/search?p=",
        }
    }
}

/// Search input settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Provider for inputs that are neither URLs nor domains
    pub provider: SearchProvider,
}

/// Launch behaviour settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchSettings {
    /// Redirect straight to the proxy; when off the fallback page is shown
    pub auto_redirect: bool,
    /// How long the fallback offer stays visible (seconds)
    pub fallback_ttl_secs: u64,
}

impl Default for LaunchSettings {
    fn default() -> Self {
        Self {
            auto_redirect: true,
            fallback_ttl_secs: 30,
        }
    }
}

/// Quick link shown on the home view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickLink {
    pub name: String,
    pub icon: String,
    pub url: String,
}

impl QuickLink {
    fn new(name: &str, icon: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            icon: icon.to_string(),
            url: url.to_string(),
        }
    }
}

/// UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Default theme
    pub default_theme: String,
    /// Available themes
    pub themes: Vec<String>,
    /// Seconds before a notification is dismissed
    pub notification_ttl_secs: u64,
    /// Quick links on the home view
    pub quick_links: Vec<QuickLink>,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            default_theme: "default-dark".to_string(),
            themes: vec![
                "default-dark".to_string(),
                "neon-grid".to_string(),
                "cosmic-purple".to_string(),
                "retro-terminal".to_string(),
            ],
            notification_ttl_secs: 5,
            quick_links: vec![
                QuickLink::new("Google", "🔍", "https://google.com"),
                QuickLink::new("Discord", "💬", "https://discord.com"),
                QuickLink::new("YouTube", "📺", "https://youtube.com"),
                QuickLink::new("Wikipedia", "📚", "https://wikipedia.org"),
            ],
        }
    }
}

/// Per-engine override applied on top of the built-in catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine id (must match a built-in engine)
    pub name: String,
    /// Whether engine is hidden from the selector
    pub disabled: bool,
    /// Display name
    pub display_name: Option<String>,
    /// Description shown in the selector
    pub description: Option<String>,
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
    /// Extra headers to send
    pub extra_headers: HashMap<String, String>,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 5.0,
            verify_ssl: true,
            proxies: ProxySettings::default(),
            extra_headers: HashMap::new(),
        }
    }
}

/// Proxy settings for outgoing requests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Connectivity probe settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    /// Refresh engine reachability in the background
    pub enabled: bool,
    /// Seconds between background refreshes
    pub interval_secs: u64,
    /// Per-check timeout in seconds
    pub timeout_secs: f64,
    /// How long a report stays cached (seconds)
    pub cache_ttl_secs: u64,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: 300,
            timeout_secs: 5.0,
            cache_ttl_secs: 120,
        }
    }
}

fn check_seconds(name: &str, secs: f64) -> Result<()> {
    if !secs.is_finite() || secs <= 0.0 || secs > MAX_DURATION_SECS as f64 {
        bail!("{} must be a positive number of seconds, got {}", name, secs);
    }
    Ok(())
}

/// Generate a random secret key
fn generate_secret_key() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..32)
        .map(|_| rng.sample(rand::distributions::Alphanumeric) as char)
        .collect()
}
