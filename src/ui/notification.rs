//! User-facing notifications and the popup-blocked fallback offer

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity, also used as the CSS class suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient banner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Level::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Level::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }
}

/// Manual ways to reach a proxy URL when opening a new tab was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackAction {
    OpenInNewTab,
    CopyUrl,
    NavigateDirectly,
}

impl FallbackAction {
    pub const ALL: [FallbackAction; 3] = [
        Self::OpenInNewTab,
        Self::CopyUrl,
        Self::NavigateDirectly,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::OpenInNewTab => "Open in New Tab",
            Self::CopyUrl => "Copy Proxy URL",
            Self::NavigateDirectly => "Navigate Directly",
        }
    }
}

/// Offer shown after a blocked launch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FallbackOffer {
    pub id: Uuid,
    /// What the user asked for
    pub original_url: String,
    /// Where the proxy would have taken them
    pub proxy_url: String,
    /// Engine id
    pub engine: String,
    pub actions: Vec<FallbackAction>,
    pub expires_at: DateTime<Utc>,
}

impl FallbackOffer {
    pub fn new(
        original_url: impl Into<String>,
        proxy_url: impl Into<String>,
        engine: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_url: original_url.into(),
            proxy_url: proxy_url.into(),
            engine: engine.into(),
            actions: FallbackAction::ALL.to_vec(),
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Seconds left before the offer disappears
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offer_expiry() {
        let offer = FallbackOffer::new(
            "https://example.com",
            "https://wisp.org/browse.php?u=https%3A%2F%2Fexample.com",
            "wisp",
            Duration::seconds(30),
        );
        let now = Utc::now();
        assert!(!offer.is_expired(now));
        assert!(offer.remaining_secs(now) <= 30);
        assert!(offer.is_expired(now + Duration::seconds(31)));
        assert_eq!(offer.remaining_secs(now + Duration::seconds(60)), 0);
        assert_eq!(offer.actions.len(), 3);
    }

    #[test]
    fn test_level_serializes_lowercase() {
        let n = Notification::warning("careful");
        let json = serde_json::to_string(&n).unwrap();
        assert_eq!(json, r#"{"level":"warning","message":"careful"}"#);
    }
}
