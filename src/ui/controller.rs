//! Application controller
//!
//! Owns one user's UI state and engine selection, turns submitted input into
//! a proxy URL and hands it to a [`Navigator`].

use super::notification::{FallbackOffer, Notification};
use super::state::{reduce, Effect, Ignored, SettingsSection, Transition, UiEvent, UiState, View};
use crate::config::SearchProvider;
use crate::engines::{build_proxy_url, EngineCatalog, EngineRegistry, RegistryError};
use crate::launch::{Navigator, NavigatorError, OpenOutcome};
use crate::query::{InputError, Target};
use crate::theme::{self, ThemeError, ThemeStore, THEME_OPTIONS};
use chrono::Duration;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

const EMPTY_INPUT: &str = "Please enter a URL or search term";
const POPUP_BLOCKED: &str = "Popup blocked! Please allow popups or try clicking the link below.";
const OPEN_FAILED: &str = "Error opening proxy. Please try again.";

/// A successful launch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Launch {
    pub target: Target,
    /// Engine id the URL was built for
    pub engine: String,
    pub proxy_url: String,
}

/// Why a launch did not open anything
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("nothing to open")]
    EmptyInput,
    #[error("opening {} was blocked", .offer.proxy_url)]
    PopupBlocked { offer: FallbackOffer },
    #[error("failed to open {proxy_url}")]
    OpenFailed {
        proxy_url: String,
        #[source]
        source: NavigatorError,
    },
}

/// Per-user controller
pub struct AppController {
    state: UiState,
    registry: EngineRegistry,
    provider: SearchProvider,
    fallback_ttl: Duration,
    themes: Vec<String>,
    engine_description: String,
    notifications: Vec<Notification>,
    fallback: Option<FallbackOffer>,
}

impl AppController {
    /// Fresh controller on the catalog's default engine
    pub fn new(catalog: Arc<EngineCatalog>) -> Self {
        Self::restore(catalog, UiState::default())
    }

    /// Rebuild a controller from saved state. A stored engine that is no
    /// longer in the catalog is replaced by the default.
    pub fn restore(catalog: Arc<EngineCatalog>, mut state: UiState) -> Self {
        let registry = EngineRegistry::with_current(catalog, &state.engine);
        state.engine = registry.current_id().to_string();
        let engine_description = registry.current().summary();

        Self {
            state,
            registry,
            provider: SearchProvider::default(),
            fallback_ttl: Duration::seconds(30),
            themes: THEME_OPTIONS.iter().map(|t| t.id.to_string()).collect(),
            engine_description,
            notifications: Vec::new(),
            fallback: None,
        }
    }

    pub fn with_search_provider(mut self, provider: SearchProvider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_fallback_ttl(mut self, ttl: Duration) -> Self {
        self.fallback_ttl = ttl;
        self
    }

    pub fn with_themes(mut self, themes: Vec<String>) -> Self {
        self.themes = themes;
        self
    }

    /// Apply an event and carry out its effects
    pub fn dispatch(&mut self, event: UiEvent) -> Vec<Effect> {
        let Transition { state, effects } = reduce(&self.state, event, &self.registry);

        for effect in &effects {
            match effect {
                Effect::EngineChanged(id) => {
                    if self.registry.set_current(id).is_ok() {
                        self.engine_description = self.registry.current().summary();
                    }
                }
                Effect::Ignored(Ignored::UnknownEngine(id)) => {
                    debug!("Ignoring selection of unknown engine: {}", id);
                }
                Effect::Render => {}
            }
        }

        self.state = state;
        effects
    }

    pub fn set_view(&mut self, view: impl Into<View>) {
        self.dispatch(UiEvent::Navigate(view.into()));
    }

    pub fn toggle_settings_panel(&mut self) {
        self.dispatch(UiEvent::ToggleSettings);
    }

    pub fn close_settings_panel(&mut self) {
        self.dispatch(UiEvent::CloseSettings);
    }

    pub fn open_settings_section(&mut self, section: SettingsSection) {
        self.dispatch(UiEvent::OpenSettingsSection(section));
    }

    /// Select an engine. Unknown ids leave the selection alone; the error
    /// only tells the caller the request was ignored.
    pub fn set_engine(&mut self, id: &str) -> Result<(), RegistryError> {
        let effects = self.dispatch(UiEvent::SelectEngine(id.to_string()));
        if effects.iter().any(|e| matches!(e, Effect::Ignored(_))) {
            return Err(RegistryError::UnknownEngine(id.to_string()));
        }
        Ok(())
    }

    /// Classify the input, build the proxy URL for the current engine and open it
    pub fn submit_search(
        &mut self,
        raw: &str,
        navigator: &dyn Navigator,
    ) -> Result<Launch, LaunchError> {
        match Target::resolve(raw, self.provider) {
            Ok(target) => self.launch(target, navigator),
            Err(InputError::Empty) => {
                self.fallback = None;
                self.notify(Notification::warning(EMPTY_INPUT));
                Err(LaunchError::EmptyInput)
            }
        }
    }

    /// Open a fixed URL without classifying it
    pub fn launch_quick_link(
        &mut self,
        url: &str,
        navigator: &dyn Navigator,
    ) -> Result<Launch, LaunchError> {
        let url = url.trim();
        if url.is_empty() {
            self.notify(Notification::warning(EMPTY_INPUT));
            return Err(LaunchError::EmptyInput);
        }
        self.launch(Target::literal(url), navigator)
    }

    fn launch(&mut self, target: Target, navigator: &dyn Navigator) -> Result<Launch, LaunchError> {
        self.fallback = None;

        let engine = self.registry.current();
        let engine_id = engine.id.clone();
        let engine_name = engine.name.clone();
        let proxy_url = build_proxy_url(&engine_id, &target.url);

        self.notify(Notification::info(format!(
            "Connecting through {} proxy...",
            engine_name
        )));

        match navigator.open(&proxy_url) {
            Ok(OpenOutcome::Opened) => {
                info!("Launched {} through {}", target.url, engine_id);
                self.notify(Notification::success(format!(
                    "Opening {} through {} proxy...",
                    target.url, engine_name
                )));
                Ok(Launch {
                    target,
                    engine: engine_id,
                    proxy_url,
                })
            }
            Ok(OpenOutcome::Blocked) => {
                info!("Launch of {} through {} was blocked", target.url, engine_id);
                self.notify(Notification::warning(POPUP_BLOCKED));
                let offer = FallbackOffer::new(target.url, proxy_url, engine_id, self.fallback_ttl);
                self.fallback = Some(offer.clone());
                Err(LaunchError::PopupBlocked { offer })
            }
            Err(source) => {
                error!("Error opening proxy: {}", source);
                self.notify(Notification::error(OPEN_FAILED));
                Err(LaunchError::OpenFailed { proxy_url, source })
            }
        }
    }

    /// Persist a theme choice
    pub fn select_theme(&mut self, theme: &str, store: &dyn ThemeStore) -> Result<(), ThemeError> {
        if !self.themes.iter().any(|t| t == theme) {
            return Err(ThemeError::Unknown(theme.to_string()));
        }
        store.save(theme)?;
        self.notify(Notification::success(format!(
            "Theme changed to {}",
            theme::display_name(theme)
        )));
        Ok(())
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Queue a notification produced outside the controller
    pub fn push_notification(&mut self, notification: Notification) {
        self.notify(notification);
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    /// "Using {name} - {description}" for the selected engine
    pub fn engine_description(&self) -> &str {
        &self.engine_description
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Offer left by the last blocked launch
    pub fn fallback(&self) -> Option<&FallbackOffer> {
        self.fallback.as_ref()
    }

    /// Hand back the state and pending notifications
    pub fn into_parts(self) -> (UiState, Vec<Notification>) {
        (self.state, self.notifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launch::testing::ScriptedNavigator;
    use crate::theme::MemoryThemeStore;
    use crate::ui::notification::Level;

    fn controller() -> AppController {
        AppController::new(Arc::new(EngineCatalog::builtin()))
    }

    #[test]
    fn test_empty_input_warns_without_navigation() {
        let mut app = controller();
        let nav = ScriptedNavigator::opens();

        for raw in ["", "   "] {
            let err = app.submit_search(raw, &nav).unwrap_err();
            assert!(matches!(err, LaunchError::EmptyInput));
        }

        assert!(nav.opened.borrow().is_empty());
        let levels: Vec<_> = app.notifications().iter().map(|n| n.level).collect();
        assert_eq!(levels, vec![Level::Warning, Level::Warning]);
        assert_eq!(app.notifications()[0].message, EMPTY_INPUT);
    }

    #[test]
    fn test_successful_launch() {
        let mut app = controller();
        let nav = ScriptedNavigator::opens();

        let launch = app.submit_search("example.com", &nav).unwrap();
        assert_eq!(
            launch.proxy_url,
            "https://browser.rammerhead.org/#https%3A%2F%2Fexample.com"
        );
        assert_eq!(launch.engine, "rammerhead");
        assert_eq!(*nav.opened.borrow(), vec![launch.proxy_url.clone()]);

        let notes = app.take_notifications();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].level, Level::Info);
        assert_eq!(notes[0].message, "Connecting through Rammerhead proxy...");
        assert_eq!(notes[1].level, Level::Success);
        assert_eq!(
            notes[1].message,
            "Opening https://example.com through Rammerhead proxy..."
        );
        assert!(app.notifications().is_empty());
    }

    #[test]
    fn test_search_term_double_encoded() {
        let mut app = controller();
        app.set_engine("scramjet").unwrap();
        let launch = app
            .submit_search("hello world", &ScriptedNavigator::opens())
            .unwrap();
        assert_eq!(
            launch.proxy_url,
            "https://scramjet.org/browse.php?u=https%3A%2F%2Fwww.google.com%2Fsearch%3Fq%3Dhello%2520world"
        );
    }

    #[test]
    fn test_blocked_launch_offers_fallback() {
        let mut app = controller();
        app.set_engine("wisp").unwrap();

        let err = app
            .submit_search("https://example.com", &ScriptedNavigator::blocks())
            .unwrap_err();
        let offer = match err {
            LaunchError::PopupBlocked { offer } => offer,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(offer.original_url, "https://example.com");
        assert_eq!(
            offer.proxy_url,
            "https://wisp.org/browse.php?u=https%3A%2F%2Fexample.com"
        );
        assert_eq!(offer.engine, "wisp");
        assert_eq!(app.fallback(), Some(&offer));
        assert_eq!(app.notifications().last().unwrap().message, POPUP_BLOCKED);
    }

    #[test]
    fn test_open_failure_reports_error() {
        let mut app = controller();
        let err = app
            .submit_search("example.com", &ScriptedNavigator::fails())
            .unwrap_err();
        assert!(matches!(err, LaunchError::OpenFailed { .. }));
        let last = app.notifications().last().unwrap();
        assert_eq!(last.level, Level::Error);
        assert_eq!(last.message, OPEN_FAILED);
        assert!(app.fallback().is_none());
    }

    #[test]
    fn test_fallback_cleared_by_next_launch() {
        let mut app = controller();
        let _ = app.submit_search("example.com", &ScriptedNavigator::blocks());
        assert!(app.fallback().is_some());
        app.submit_search("example.com", &ScriptedNavigator::opens()).unwrap();
        assert!(app.fallback().is_none());
    }

    #[test]
    fn test_set_engine_updates_description() {
        let mut app = controller();
        assert_eq!(
            app.engine_description(),
            "Using Rammerhead - Stable, full browser proxy with advanced features"
        );

        app.set_engine("scramjet").unwrap();
        assert_eq!(app.state().engine, "scramjet");
        assert_eq!(app.registry().current_id(), "scramjet");
        assert_eq!(
            app.engine_description(),
            "Using Scramjet - Fast, lightweight proxy for quick browsing"
        );

        assert!(app.set_engine("foo").is_err());
        assert_eq!(app.state().engine, "scramjet");
        assert_eq!(app.registry().current_id(), "scramjet");
    }

    #[test]
    fn test_quick_link_skips_classification() {
        let mut app = controller();
        let launch = app
            .launch_quick_link("https://discord.com", &ScriptedNavigator::opens())
            .unwrap();
        assert_eq!(launch.target.url, "https://discord.com");
        assert_eq!(
            launch.proxy_url,
            "https://browser.rammerhead.org/#https%3A%2F%2Fdiscord.com"
        );
    }

    #[test]
    fn test_navigation_transitions() {
        let mut app = controller();
        app.set_view("about");
        assert_eq!(app.state().view, View::About);

        app.toggle_settings_panel();
        assert!(app.state().settings_open);
        app.open_settings_section(SettingsSection::Themes);
        app.close_settings_panel();
        assert!(!app.state().settings_open);
        assert_eq!(app.state().settings_section, SettingsSection::Themes);
    }

    #[test]
    fn test_restore_drops_unknown_engine() {
        let state = UiState {
            engine: "retired".to_string(),
            view: View::News,
            ..Default::default()
        };
        let app = AppController::restore(Arc::new(EngineCatalog::builtin()), state);
        assert_eq!(app.state().engine, "rammerhead");
        assert_eq!(app.state().view, View::News);
    }

    #[test]
    fn test_select_theme() {
        let mut app = controller();
        let store = MemoryThemeStore::default();

        app.select_theme("neon-grid", &store).unwrap();
        assert_eq!(store.saved(), Some("neon-grid".to_string()));
        assert_eq!(
            app.notifications().last().unwrap().message,
            "Theme changed to neon grid"
        );

        let err = app.select_theme("vaporwave", &store).unwrap_err();
        assert!(matches!(err, ThemeError::Unknown(_)));
        assert_eq!(store.saved(), Some("neon-grid".to_string()));
    }

    #[test]
    fn test_search_provider_option() {
        let mut app = controller().with_search_provider(SearchProvider::Bing);
        let launch = app.submit_search("rust", &ScriptedNavigator::opens()).unwrap();
        assert_eq!(launch.target.url, "https://www.bing.com/search?q=rust");
    }
}
