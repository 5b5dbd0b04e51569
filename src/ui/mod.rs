//! UI state, transitions and the per-user controller
//!
//! Nothing in here knows about HTML; the web module renders what these
//! types describe.

pub mod content;
mod controller;
mod notification;
mod state;

pub use controller::{AppController, Launch, LaunchError};
pub use notification::{FallbackAction, FallbackOffer, Level, Notification};
pub use state::{reduce, Effect, Ignored, SettingsSection, Transition, UiEvent, UiState, View};
