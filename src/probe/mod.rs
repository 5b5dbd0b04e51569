//! Engine connectivity probe
//!
//! Purely informational: a HEAD request against each engine's landing page.
//! Any HTTP answer counts as reachable. Results are cached and never gate a
//! launch.

use crate::config::ProbeSettings;
use crate::engines::{EngineCatalog, EngineDescriptor};
use crate::metrics::Metrics;
use crate::network::HttpClient;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Tri-state reachability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reachability {
    #[default]
    Unknown,
    Reachable,
    Unreachable,
}

/// Outcome of one check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    pub engine: String,
    pub status: Reachability,
    pub latency_ms: Option<u64>,
    pub checked_at: Option<DateTime<Utc>>,
}

impl ProbeReport {
    /// Report for an engine that has not been checked
    pub fn unknown(engine: &str) -> Self {
        Self {
            engine: engine.to_string(),
            status: Reachability::Unknown,
            latency_ms: None,
            checked_at: None,
        }
    }
}

/// Reachability checker with a short-lived report cache
pub struct ConnectivityProbe {
    client: HttpClient,
    timeout: Duration,
    cache: Cache<String, ProbeReport>,
    metrics: Option<Arc<Metrics>>,
}

impl ConnectivityProbe {
    pub fn new(client: HttpClient, settings: &ProbeSettings) -> Self {
        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(settings.cache_ttl_secs))
            .max_capacity(64)
            .build();

        Self {
            client,
            timeout: Duration::from_secs_f64(settings.timeout_secs),
            cache,
            metrics: None,
        }
    }

    /// Record probe outcomes in `metrics`
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Check one engine now and cache the report
    pub async fn check(&self, engine: &EngineDescriptor) -> ProbeReport {
        let started = Instant::now();
        let result = self
            .client
            .head_with_timeout(&engine.website, self.timeout)
            .await;
        let elapsed = started.elapsed().as_millis() as u64;

        let report = match result {
            Ok(status) => {
                debug!("{} answered {} in {}ms", engine.id, status, elapsed);
                if let Some(ref metrics) = self.metrics {
                    metrics.record_probe_success(&engine.id, elapsed);
                }
                ProbeReport {
                    engine: engine.id.clone(),
                    status: Reachability::Reachable,
                    latency_ms: Some(elapsed),
                    checked_at: Some(Utc::now()),
                }
            }
            Err(e) => {
                warn!("Connection test for {} failed: {}", engine.id, e);
                if let Some(ref metrics) = self.metrics {
                    metrics.record_probe_failure(&engine.id);
                }
                ProbeReport {
                    engine: engine.id.clone(),
                    status: Reachability::Unreachable,
                    latency_ms: None,
                    checked_at: Some(Utc::now()),
                }
            }
        };

        self.cache.insert(engine.id.clone(), report.clone()).await;
        report
    }

    /// Check every engine concurrently
    pub async fn check_all(&self, catalog: &EngineCatalog) -> Vec<ProbeReport> {
        join_all(catalog.iter().map(|engine| self.check(engine))).await
    }

    /// Last cached report, or `Unknown`
    pub async fn cached(&self, engine_id: &str) -> ProbeReport {
        self.cache
            .get(engine_id)
            .await
            .unwrap_or_else(|| ProbeReport::unknown(engine_id))
    }

    /// Check an engine in the background
    pub fn spawn(self: &Arc<Self>, engine: EngineDescriptor) -> ProbeHandle {
        let probe = Arc::clone(self);
        ProbeHandle {
            handle: tokio::spawn(async move { probe.check(&engine).await }),
        }
    }

    /// Refresh all engines every `interval` until the handle is dropped or
    /// aborted
    pub fn spawn_refresh(
        self: &Arc<Self>,
        catalog: Arc<EngineCatalog>,
        interval: Duration,
    ) -> JoinHandle<()> {
        let probe = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let reports = probe.check_all(&catalog).await;
                let reachable = reports
                    .iter()
                    .filter(|r| r.status == Reachability::Reachable)
                    .count();
                debug!("Probe refresh: {}/{} engines reachable", reachable, reports.len());
            }
        })
    }
}

/// Handle to a background check
pub struct ProbeHandle {
    handle: JoinHandle<ProbeReport>,
}

impl ProbeHandle {
    /// Stop the check; its result is discarded
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the report. A cancelled check yields `None`.
    pub async fn report(self) -> Option<ProbeReport> {
        self.handle.await.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn engine(id: &str, website: &str) -> EngineDescriptor {
        let mut descriptor = EngineCatalog::builtin().get(id).clone();
        descriptor.website = website.to_string();
        descriptor
    }

    fn probe() -> ConnectivityProbe {
        let settings = ProbeSettings {
            timeout_secs: 2.0,
            ..Default::default()
        };
        ConnectivityProbe::new(HttpClient::new().unwrap(), &settings)
    }

    #[tokio::test]
    async fn test_any_status_is_reachable() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let report = probe().check(&engine("wisp", &server.uri())).await;
        assert_eq!(report.status, Reachability::Reachable);
        assert_eq!(report.engine, "wisp");
        assert!(report.latency_ms.is_some());
    }

    #[tokio::test]
    async fn test_connection_error_is_unreachable() {
        let report = probe().check(&engine("scramjet", "http://127.0.0.1:1")).await;
        assert_eq!(report.status, Reachability::Unreachable);
        assert!(report.latency_ms.is_none());
    }

    #[tokio::test]
    async fn test_cache_starts_unknown() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let probe = probe();
        assert_eq!(probe.cached("wisp").await.status, Reachability::Unknown);
        probe.check(&engine("wisp", &server.uri())).await;
        assert_eq!(probe.cached("wisp").await.status, Reachability::Reachable);
    }

    #[tokio::test]
    async fn test_metrics_recorded() {
        let metrics = Arc::new(Metrics::new());
        let probe = probe().with_metrics(metrics.clone());
        probe.check(&engine("wisp", "http://127.0.0.1:1")).await;
        assert_eq!(metrics.get_probe_reliability("wisp"), 0.0);
    }

    #[tokio::test]
    async fn test_spawned_check_can_be_cancelled() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let probe = Arc::new(probe());
        let handle = probe.spawn(engine("rammerhead", &server.uri()));
        handle.cancel();
        assert!(handle.report().await.is_none());
        assert_eq!(probe.cached("rammerhead").await.status, Reachability::Unknown);
    }

    #[tokio::test]
    async fn test_spawned_check_reports() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let probe = Arc::new(probe());
        let report = probe
            .spawn(engine("rammerhead", &server.uri()))
            .report()
            .await
            .unwrap();
        assert_eq!(report.status, Reachability::Reachable);
    }
}
