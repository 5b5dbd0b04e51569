//! Metrics collection module
//!
//! Tracks launches per engine and connectivity probe results.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// How a launch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    Opened,
    Blocked,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LaunchCounts {
    pub opened: u64,
    pub blocked: u64,
    pub failed: u64,
}

impl LaunchCounts {
    pub fn total(&self) -> u64 {
        self.opened + self.blocked + self.failed
    }
}

/// Global metrics collector
pub struct Metrics {
    /// Total launch attempts that reached an engine
    pub total_launches: AtomicU64,
    /// Submissions rejected for being blank
    pub empty_inputs: AtomicU64,
    launches: RwLock<HashMap<String, LaunchCounts>>,
    /// Probe latencies in ms, last 100 per engine
    probe_latencies: RwLock<HashMap<String, Vec<u64>>>,
    probe_failures: RwLock<HashMap<String, u64>>,
    probe_successes: RwLock<HashMap<String, u64>>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            total_launches: AtomicU64::new(0),
            empty_inputs: AtomicU64::new(0),
            launches: RwLock::new(HashMap::new()),
            probe_latencies: RwLock::new(HashMap::new()),
            probe_failures: RwLock::new(HashMap::new()),
            probe_successes: RwLock::new(HashMap::new()),
        }
    }

    /// Record a launch through `engine`
    pub fn record_launch(&self, engine: &str, outcome: LaunchOutcome) {
        self.total_launches.fetch_add(1, Ordering::Relaxed);
        let mut launches = self
            .launches
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let counts = launches.entry(engine.to_string()).or_default();
        match outcome {
            LaunchOutcome::Opened => counts.opened += 1,
            LaunchOutcome::Blocked => counts.blocked += 1,
            LaunchOutcome::Failed => counts.failed += 1,
        }
    }

    pub fn record_empty_input(&self) {
        self.empty_inputs.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful probe and its latency
    pub fn record_probe_success(&self, engine: &str, latency_ms: u64) {
        {
            let mut times = self
                .probe_latencies
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let entry = times.entry(engine.to_string()).or_insert_with(Vec::new);

            // Keep last 100 latencies
            if entry.len() >= 100 {
                entry.remove(0);
            }
            entry.push(latency_ms);
        }

        let mut successes = self
            .probe_successes
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *successes.entry(engine.to_string()).or_insert(0) += 1;
    }

    pub fn record_probe_failure(&self, engine: &str) {
        let mut failures = self
            .probe_failures
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *failures.entry(engine.to_string()).or_insert(0) += 1;
    }

    pub fn get_total_launches(&self) -> u64 {
        self.total_launches.load(Ordering::Relaxed)
    }

    pub fn get_empty_inputs(&self) -> u64 {
        self.empty_inputs.load(Ordering::Relaxed)
    }

    pub fn get_launches(&self, engine: &str) -> LaunchCounts {
        self.launches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(engine)
            .copied()
            .unwrap_or_default()
    }

    /// Average probe latency for an engine
    pub fn get_avg_probe_latency(&self, engine: &str) -> Option<u64> {
        let times = self
            .probe_latencies
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        times.get(engine).and_then(|t| {
            if t.is_empty() {
                None
            } else {
                Some(t.iter().sum::<u64>() / t.len() as u64)
            }
        })
    }

    /// Percentage of probes that got an answer. 100 when never probed.
    pub fn get_probe_reliability(&self, engine: &str) -> f64 {
        let failures = self
            .probe_failures
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let successes = self
            .probe_successes
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let failure_count = *failures.get(engine).unwrap_or(&0);
        let success_count = *successes.get(engine).unwrap_or(&0);

        let total = failure_count + success_count;
        if total == 0 {
            100.0
        } else {
            (success_count as f64 / total as f64) * 100.0
        }
    }

    /// Statistics for every engine that was launched or probed
    pub fn get_engine_stats(&self) -> BTreeMap<String, EngineStats> {
        let mut engines: Vec<String> = self
            .launches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        for map in [&self.probe_successes, &self.probe_failures] {
            engines.extend(
                map.read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .keys()
                    .cloned(),
            );
        }

        engines
            .into_iter()
            .map(|engine| {
                let stats = EngineStats {
                    launches: self.get_launches(&engine),
                    avg_probe_latency: self.get_avg_probe_latency(&engine),
                    probe_reliability: self.get_probe_reliability(&engine),
                };
                (engine, stats)
            })
            .collect()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics for a single engine
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub launches: LaunchCounts,
    pub avg_probe_latency: Option<u64>,
    pub probe_reliability: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_counts() {
        let metrics = Metrics::new();

        metrics.record_launch("rammerhead", LaunchOutcome::Opened);
        metrics.record_launch("rammerhead", LaunchOutcome::Blocked);
        metrics.record_launch("wisp", LaunchOutcome::Failed);
        metrics.record_empty_input();

        assert_eq!(metrics.get_total_launches(), 3);
        assert_eq!(metrics.get_empty_inputs(), 1);

        let rammerhead = metrics.get_launches("rammerhead");
        assert_eq!(rammerhead.opened, 1);
        assert_eq!(rammerhead.blocked, 1);
        assert_eq!(rammerhead.total(), 2);
        assert_eq!(metrics.get_launches("scramjet"), LaunchCounts::default());
    }

    #[test]
    fn test_probe_stats() {
        let metrics = Metrics::new();
        assert_eq!(metrics.get_probe_reliability("wisp"), 100.0);

        metrics.record_probe_success("wisp", 100);
        metrics.record_probe_success("wisp", 300);
        metrics.record_probe_failure("wisp");
        metrics.record_probe_failure("wisp");

        assert_eq!(metrics.get_avg_probe_latency("wisp"), Some(200));
        assert_eq!(metrics.get_probe_reliability("wisp"), 50.0);
    }

    #[test]
    fn test_latency_window() {
        let metrics = Metrics::new();
        metrics.record_probe_success("scramjet", 10_000);
        for _ in 0..100 {
            metrics.record_probe_success("scramjet", 10);
        }
        assert_eq!(metrics.get_avg_probe_latency("scramjet"), Some(10));
    }

    #[test]
    fn test_engine_stats_cover_probed_and_launched() {
        let metrics = Metrics::new();
        metrics.record_launch("rammerhead", LaunchOutcome::Opened);
        metrics.record_probe_failure("croxyproxy");

        let stats = metrics.get_engine_stats();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats["rammerhead"].launches.opened, 1);
        assert_eq!(stats["croxyproxy"].probe_reliability, 0.0);
    }
}
