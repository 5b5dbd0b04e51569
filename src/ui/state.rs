//! Serializable UI state and its transitions
//!
//! Transitions are pure: `reduce` takes the current state and an event and
//! returns the next state plus the effects the caller should carry out.

use crate::engines::{EngineRegistry, DEFAULT_ENGINE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level page section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum View {
    Home,
    Proxy,
    About,
    News,
    /// Accepted as-is; renders as home
    Other(String),
}

impl View {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Home => "home",
            Self::Proxy => "proxy",
            Self::About => "about",
            Self::News => "news",
            Self::Other(name) => name,
        }
    }

    /// Template rendering this view
    pub fn template(&self) -> &'static str {
        match self {
            Self::Proxy => "views/proxy.html",
            Self::About => "views/about.html",
            Self::News => "views/news.html",
            Self::Home | Self::Other(_) => "views/home.html",
        }
    }
}

impl From<String> for View {
    fn from(name: String) -> Self {
        match name.as_str() {
            "home" => Self::Home,
            "proxy" => Self::Proxy,
            "about" => Self::About,
            "news" => Self::News,
            _ => Self::Other(name),
        }
    }
}

impl From<&str> for View {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<View> for String {
    fn from(view: View) -> Self {
        view.as_str().to_string()
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Section of the settings panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsSection {
    #[default]
    Cloaking,
    Plugins,
    Performance,
    Themes,
    Proxy,
    Advertising,
    Account,
    Statistics,
    News,
    Faq,
}

impl SettingsSection {
    pub const ALL: [SettingsSection; 10] = [
        Self::Cloaking,
        Self::Plugins,
        Self::Performance,
        Self::Themes,
        Self::Proxy,
        Self::Advertising,
        Self::Account,
        Self::Statistics,
        Self::News,
        Self::Faq,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Cloaking => "cloaking",
            Self::Plugins => "plugins",
            Self::Performance => "performance",
            Self::Themes => "themes",
            Self::Proxy => "proxy",
            Self::Advertising => "advertising",
            Self::Account => "account",
            Self::Statistics => "statistics",
            Self::News => "news",
            Self::Faq => "faq",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Cloaking => "Cloaking",
            Self::Plugins => "Plugins",
            Self::Performance => "Performance",
            Self::Themes => "Themes",
            Self::Proxy => "Proxy & Browser",
            Self::Advertising => "Advertising",
            Self::Account => "Account",
            Self::Statistics => "About & Statistics",
            Self::News => "News & Updates",
            Self::Faq => "FAQ",
        }
    }

    /// Material symbol shown in the sidebar
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Cloaking => "ad_group_off",
            Self::Plugins => "crossword",
            Self::Performance => "speed",
            Self::Themes => "palette",
            Self::Proxy => "public",
            Self::Advertising => "ads_click",
            Self::Account => "account_circle",
            Self::Statistics => "help",
            Self::News => "rocket_launch",
            Self::Faq => "contact_support",
        }
    }

    /// Sections with content of their own; the rest show a placeholder
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Cloaking | Self::Themes | Self::Faq)
    }

    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }
}

/// Navigation and selection state of one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiState {
    pub view: View,
    pub settings_open: bool,
    pub settings_section: SettingsSection,
    pub engine: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            view: View::Home,
            settings_open: false,
            settings_section: SettingsSection::default(),
            engine: DEFAULT_ENGINE.to_string(),
        }
    }
}

/// Discrete user interactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Navigate(View),
    ToggleSettings,
    CloseSettings,
    OpenSettingsSection(SettingsSection),
    SelectEngine(String),
}

/// Something the caller should do after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// The page must be re-rendered
    Render,
    /// The selected engine changed
    EngineChanged(String),
    /// The event was ignored
    Ignored(Ignored),
}

/// Why an event was ignored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ignored {
    UnknownEngine(String),
}

/// Next state plus the effects of getting there
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: UiState,
    pub effects: Vec<Effect>,
}

/// Apply an event. Engine ids are checked against the registry's catalog.
pub fn reduce(state: &UiState, event: UiEvent, registry: &EngineRegistry) -> Transition {
    let mut next = state.clone();
    let effects = match event {
        UiEvent::Navigate(view) => {
            next.view = view;
            vec![Effect::Render]
        }
        UiEvent::ToggleSettings => {
            next.settings_open = !next.settings_open;
            vec![Effect::Render]
        }
        UiEvent::CloseSettings => {
            next.settings_open = false;
            vec![Effect::Render]
        }
        UiEvent::OpenSettingsSection(section) => {
            next.settings_section = section;
            vec![Effect::Render]
        }
        UiEvent::SelectEngine(id) => {
            if registry.contains(&id) {
                next.engine = id.clone();
                vec![Effect::EngineChanged(id), Effect::Render]
            } else {
                vec![Effect::Ignored(Ignored::UnknownEngine(id))]
            }
        }
    };

    Transition {
        state: next,
        effects,
    }
}
