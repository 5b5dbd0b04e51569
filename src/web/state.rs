//! Application state shared across handlers

use crate::config::Settings;
use crate::engines::EngineCatalog;
use crate::metrics::Metrics;
use crate::network::HttpClient;
use crate::probe::ConnectivityProbe;
use crate::session::SessionCodec;
use chrono::Duration;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Engine catalog, read-only after start-up
    pub catalog: Arc<EngineCatalog>,
    /// Template renderer
    pub templates: Arc<super::Templates>,
    pub probe: Arc<ConnectivityProbe>,
    pub metrics: Arc<Metrics>,
    /// Cookie signer
    pub sessions: SessionCodec,
    /// Launch limiter, present when `server.limiter` is on
    pub limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        settings: Settings,
        catalog: EngineCatalog,
        client: HttpClient,
    ) -> anyhow::Result<Self> {
        settings.validate()?;
        let metrics = Arc::new(Metrics::new());
        let probe = Arc::new(
            ConnectivityProbe::new(client, &settings.probe).with_metrics(metrics.clone()),
        );
        let templates = Arc::new(super::Templates::new()?);
        let sessions = SessionCodec::new(&settings.server.secret_key);

        let limiter = if settings.server.limiter {
            let per_minute = NonZeroU32::new(settings.server.launches_per_minute)
                .ok_or_else(|| anyhow::anyhow!("server.launches_per_minute must be positive"))?;
            Some(Arc::new(RateLimiter::direct(Quota::per_minute(per_minute))))
        } else {
            None
        };

        Ok(Self {
            settings: Arc::new(settings),
            catalog: Arc::new(catalog),
            templates,
            probe,
            metrics,
            sessions,
            limiter,
        })
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }

    /// Check if instance is public
    pub fn is_public(&self) -> bool {
        self.settings.server.public_instance
    }

    /// How long a blocked launch keeps its fallback offer
    pub fn fallback_ttl(&self) -> Duration {
        Duration::seconds(self.settings.launch.fallback_ttl_secs as i64)
    }

    /// False when the launch limiter is exhausted
    pub fn allow_launch(&self) -> bool {
        self.limiter
            .as_ref()
            .map_or(true, |limiter| limiter.check().is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limiter_exhausts() {
        let mut settings = Settings::default();
        settings.server.limiter = true;
        settings.server.launches_per_minute = 2;
        let state = AppState::new(
            settings,
            EngineCatalog::builtin(),
            HttpClient::new().unwrap(),
        )
        .unwrap();

        assert!(state.allow_launch());
        assert!(state.allow_launch());
        assert!(!state.allow_launch());
    }

    #[test]
    fn test_zero_rate_rejected() {
        let mut settings = Settings::default();
        settings.server.limiter = true;
        settings.server.launches_per_minute = 0;
        assert!(AppState::new(settings, EngineCatalog::builtin(), HttpClient::new().unwrap()).is_err());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut settings = Settings::default();
        settings.server.secret_key = String::new();
        assert!(AppState::new(settings, EngineCatalog::builtin(), HttpClient::new().unwrap()).is_err());

        let mut settings = Settings::default();
        settings.probe.interval_secs = 0;
        assert!(AppState::new(settings, EngineCatalog::builtin(), HttpClient::new().unwrap()).is_err());
    }
}
