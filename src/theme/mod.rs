//! Theme preference persistence
//!
//! The theme is the only preference that survives a reload. It lives under a
//! single namespaced key, independent of the rest of the UI state.

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

/// Storage key (cookie name, file name)
pub const THEME_KEY: &str = "vizualnetwork-theme";

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("unknown theme: {0}")]
    Unknown(String),
    #[error("no configuration directory available")]
    NoConfigDir,
    #[error("failed to access theme file: {0}")]
    Io(#[from] std::io::Error),
}

/// Display data for a theme in the picker
#[derive(Debug, Clone, Serialize)]
pub struct ThemeOption {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Themes offered by the settings panel
pub const THEME_OPTIONS: &[ThemeOption] = &[
    ThemeOption {
        id: "default-dark",
        name: "Default Dark",
        description: "Classic cyberpunk with neon blue accents",
    },
    ThemeOption {
        id: "neon-grid",
        name: "Neon Grid",
        description: "Grid-based design with glowing lines",
    },
    ThemeOption {
        id: "cosmic-purple",
        name: "Cosmic Purple",
        description: "Purple and pink cosmic theme",
    },
    ThemeOption {
        id: "retro-terminal",
        name: "Retro Terminal",
        description: "Classic terminal green on black",
    },
];

/// Human-readable form used in notifications ("neon-grid" -> "neon grid")
pub fn display_name(theme: &str) -> String {
    theme.replacen('-', " ", 1)
}

/// Persistent storage for the theme preference
pub trait ThemeStore {
    fn load(&self) -> Result<Option<String>, ThemeError>;
    fn save(&self, theme: &str) -> Result<(), ThemeError>;
}

/// Stores the theme in a file under the user's configuration directory
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    /// Store at `<config dir>/vizualnetwork/vizualnetwork-theme`
    pub fn user_default() -> Result<Self, ThemeError> {
        let dir = dirs::config_dir().ok_or(ThemeError::NoConfigDir)?;
        Ok(Self::at(dir.join("vizualnetwork").join(THEME_KEY)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Result<Option<String>, ThemeError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let theme = content.trim();
                Ok((!theme.is_empty()).then(|| theme.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, theme: &str) -> Result<(), ThemeError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, theme)?;
        Ok(())
    }
}

/// In-memory store. The web front end seeds it from the request cookie and
/// writes `saved()` back into the response.
#[derive(Debug, Default)]
pub struct MemoryThemeStore {
    inner: Mutex<StoredTheme>,
}

#[derive(Debug, Default)]
struct StoredTheme {
    value: Option<String>,
    dirty: bool,
}

impl MemoryThemeStore {
    pub fn new(initial: Option<String>) -> Self {
        Self {
            inner: Mutex::new(StoredTheme {
                value: initial,
                dirty: false,
            }),
        }
    }

    /// The stored value if `save` was called since construction
    pub fn saved(&self) -> Option<String> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.value.clone().filter(|_| inner.dirty)
    }
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> Result<Option<String>, ThemeError> {
        Ok(self.inner.lock().unwrap_or_else(|e| e.into_inner()).value.clone())
    }

    fn save(&self, theme: &str) -> Result<(), ThemeError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.value = Some(theme.to_string());
        inner.dirty = true;
        Ok(())
    }
}

/// Resolve the active theme: the stored one if still offered, else the default
pub fn active_theme(stored: Option<&str>, available: &[String], default: &str) -> String {
    stored
        .filter(|t| available.iter().any(|a| a == t))
        .unwrap_or(default)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("neon-grid"), "neon grid");
        assert_eq!(display_name("default-dark"), "default dark");
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("vizual-theme-{}", uuid::Uuid::new_v4()));
        let store = FileThemeStore::at(dir.join(THEME_KEY));

        assert_eq!(store.load().unwrap(), None);
        store.save("retro-terminal").unwrap();
        assert_eq!(store.load().unwrap(), Some("retro-terminal".to_string()));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_memory_store_tracks_saves() {
        let store = MemoryThemeStore::new(Some("neon-grid".to_string()));
        assert_eq!(store.load().unwrap(), Some("neon-grid".to_string()));
        assert_eq!(store.saved(), None);

        store.save("cosmic-purple").unwrap();
        assert_eq!(store.saved(), Some("cosmic-purple".to_string()));
    }

    #[test]
    fn test_active_theme() {
        let available = vec!["default-dark".to_string(), "neon-grid".to_string()];
        assert_eq!(active_theme(Some("neon-grid"), &available, "default-dark"), "neon-grid");
        assert_eq!(active_theme(Some("gone"), &available, "default-dark"), "default-dark");
        assert_eq!(active_theme(None, &available, "default-dark"), "default-dark");
    }
}
