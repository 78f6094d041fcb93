//! Concurrent latency probing of candidate base URLs
//!
//! Every candidate gets one HEAD request, all of them in flight at once on the
//! current task. Each probe is a single future raced against its own deadline,
//! so it settles exactly once: either the response headers arrive, the
//! transport fails, or the deadline passes.

pub mod selector;

pub use selector::{apply_winner, Selector};

use crate::{
    client::{probe_target, NetworkClient, ProbeClient, TransportError},
    error::{AppError, Result},
    models::Config,
};
use futures::future::join_all;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Status codes below this count as a reachable endpoint
pub const SUCCESS_STATUS_LIMIT: u16 = 400;

/// Measured latency of one candidate
///
/// Variant order matters: every `Reachable` value sorts before `Unreachable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Latency {
    Reachable(Duration),
    Unreachable,
}

impl Latency {
    pub fn is_reachable(&self) -> bool {
        matches!(self, Latency::Reachable(_))
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Latency::Reachable(duration) => Some(*duration),
            Latency::Unreachable => None,
        }
    }

    pub fn as_millis(&self) -> Option<u128> {
        self.as_duration().map(|d| d.as_millis())
    }
}

impl fmt::Display for Latency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Latency::Reachable(duration) => write!(f, "{}ms", duration.as_millis()),
            Latency::Unreachable => write!(f, "unreachable"),
        }
    }
}

/// Outcome of probing one candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    /// Candidate exactly as stored in the list
    pub url: String,
    pub latency: Latency,
    /// HTTP status when one was received
    pub status: Option<u16>,
    /// Failure cause, kept for diagnostics only
    pub cause: Option<String>,
}

impl ProbeResult {
    pub fn reachable(url: impl Into<String>, elapsed: Duration, status: u16) -> Self {
        Self {
            url: url.into(),
            latency: Latency::Reachable(elapsed),
            status: Some(status),
            cause: None,
        }
    }

    pub fn unreachable(url: impl Into<String>, status: Option<u16>, cause: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            latency: Latency::Unreachable,
            status,
            cause: Some(cause.into()),
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.latency.is_reachable()
    }
}

/// Ranked outcome of one probing round
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    results: Vec<ProbeResult>,
    pub elapsed: Duration,
}

impl ProbeReport {
    /// Build a report, ranking the results
    pub fn new(results: Vec<ProbeResult>, elapsed: Duration) -> Self {
        Self {
            results: rank(results),
            elapsed,
        }
    }

    /// Results ordered fastest first, unreachable last
    pub fn results(&self) -> &[ProbeResult] {
        &self.results
    }

    /// The fastest reachable candidate, if any
    pub fn winner(&self) -> Option<&ProbeResult> {
        self.results.first().filter(|r| r.is_reachable())
    }

    pub fn reachable_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_reachable()).count()
    }

    pub fn unreachable_count(&self) -> usize {
        self.results.len() - self.reachable_count()
    }
}

/// Sort results by latency ascending with unreachable last.
///
/// The sort is stable, so ties keep their input order.
pub fn rank(mut results: Vec<ProbeResult>) -> Vec<ProbeResult> {
    results.sort_by(|a, b| a.latency.cmp(&b.latency));
    results
}

/// Progress callbacks during a probing round.
///
/// Each method is called exactly once per candidate.
pub trait ProbeObserver {
    fn on_probe_start(&self, _url: &str) {}

    fn on_probe_complete(&self, _url: &str, _latency: &Latency) {}
}

/// Probes candidates through a [`ProbeClient`]
pub struct Prober {
    client: Arc<dyn ProbeClient>,
    timeout: Duration,
}

impl Prober {
    pub fn new(client: Arc<dyn ProbeClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Create a prober backed by the network client
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = NetworkClient::new(config.timeout())?;
        Ok(Self::new(Arc::new(client), config.timeout()))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probe a single candidate
    pub async fn probe_one(&self, url: &str) -> ProbeResult {
        let target = match probe_target(url) {
            Ok(target) => target,
            Err(e) => return ProbeResult::unreachable(url, None, e.to_string()),
        };

        let started = Instant::now();
        match tokio::time::timeout(self.timeout, self.client.head(&target)).await {
            Ok(Ok(status)) if status < SUCCESS_STATUS_LIMIT => {
                ProbeResult::reachable(url, started.elapsed(), status)
            }
            Ok(Ok(status)) => ProbeResult::unreachable(url, Some(status), format!("HTTP {}", status)),
            Ok(Err(e)) => ProbeResult::unreachable(url, None, e.to_string()),
            Err(_) => ProbeResult::unreachable(url, None, TransportError::Timeout.to_string()),
        }
    }

    /// Probe every candidate concurrently and rank the outcomes
    pub async fn probe_all(
        &self,
        urls: &[String],
        observer: Option<&dyn ProbeObserver>,
    ) -> Result<ProbeReport> {
        if urls.is_empty() {
            return Err(AppError::validation("No candidate URLs to probe"));
        }

        let started = Instant::now();
        let probes = urls.iter().map(|url| async move {
            if let Some(observer) = observer {
                observer.on_probe_start(url);
            }
            let result = self.probe_one(url).await;
            if let Some(observer) = observer {
                observer.on_probe_complete(url, &result.latency);
            }
            result
        });

        let results = join_all(probes).await;
        Ok(ProbeReport::new(results, started.elapsed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reqwest::Url;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Clone, Copy)]
    enum Script {
        Status(u16, u64),
        Fail(u64),
        Hang,
    }

    /// Answers by host name after a scripted delay
    struct ScriptedClient {
        scripts: HashMap<String, Script>,
    }

    impl ScriptedClient {
        fn new(scripts: &[(&str, Script)]) -> Self {
            Self {
                scripts: scripts.iter().map(|(h, s)| (h.to_string(), *s)).collect(),
            }
        }
    }

    #[async_trait]
    impl ProbeClient for ScriptedClient {
        async fn head(&self, url: &Url) -> std::result::Result<u16, TransportError> {
            let host = url.host_str().unwrap_or_default().to_string();
            match self.scripts.get(&host).copied().unwrap_or(Script::Fail(0)) {
                Script::Status(status, delay) => {
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    Ok(status)
                }
                Script::Fail(delay) => {
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    Err(TransportError::Connect("refused".to_string()))
                }
                Script::Hang => {
                    std::future::pending::<()>().await;
                    Ok(200)
                }
            }
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        started: Mutex<Vec<String>>,
        completed: Mutex<Vec<(String, Latency)>>,
    }

    impl ProbeObserver for RecordingObserver {
        fn on_probe_start(&self, url: &str) {
            self.started.lock().unwrap().push(url.to_string());
        }

        fn on_probe_complete(&self, url: &str, latency: &Latency) {
            self.completed.lock().unwrap().push((url.to_string(), *latency));
        }
    }

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn prober(scripts: &[(&str, Script)], timeout_ms: u64) -> Prober {
        Prober::new(
            Arc::new(ScriptedClient::new(scripts)),
            Duration::from_millis(timeout_ms),
        )
    }

    #[test]
    fn test_latency_ordering() {
        let fast = Latency::Reachable(Duration::from_millis(5));
        let slow = Latency::Reachable(Duration::from_secs(9));
        assert!(fast < slow);
        assert!(slow < Latency::Unreachable);
        assert_eq!(Latency::Unreachable.cmp(&Latency::Unreachable), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_latency_display() {
        assert_eq!(Latency::Reachable(Duration::from_millis(120)).to_string(), "120ms");
        assert_eq!(Latency::Unreachable.to_string(), "unreachable");
    }

    #[test]
    fn test_rank_is_stable() {
        let ms = Duration::from_millis;
        let ranked = rank(vec![
            ProbeResult::unreachable("dead-1", None, "x"),
            ProbeResult::reachable("b", ms(30), 200),
            ProbeResult::reachable("a", ms(10), 200),
            ProbeResult::unreachable("dead-2", Some(500), "HTTP 500"),
            ProbeResult::reachable("c", ms(30), 204),
        ]);

        let order: Vec<&str> = ranked.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c", "dead-1", "dead-2"]);
    }

    #[test]
    fn test_winner_none_when_all_unreachable() {
        let report = ProbeReport::new(
            vec![
                ProbeResult::unreachable("a", None, "x"),
                ProbeResult::unreachable("b", None, "y"),
            ],
            Duration::ZERO,
        );
        assert!(report.winner().is_none());
        assert_eq!(report.unreachable_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_list_is_rejected() {
        let prober = prober(&[], 100);
        let result = prober.probe_all(&[], None).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_fastest_reachable_wins() {
        let prober = prober(
            &[
                ("a.com", Script::Status(200, 120)),
                ("b.com", Script::Status(200, 40)),
                ("c.com", Script::Fail(5)),
            ],
            2_000,
        );

        let report = prober
            .probe_all(&urls(&["a.com", "b.com", "c.com"]), None)
            .await
            .unwrap();

        let order: Vec<&str> = report.results().iter().map(|r| r.url.as_str()).collect();
        assert_eq!(order, vec!["b.com", "a.com", "c.com"]);
        assert_eq!(report.winner().unwrap().url, "b.com");
        assert_eq!(report.results()[2].latency, Latency::Unreachable);
    }

    #[tokio::test]
    async fn test_error_status_is_unreachable() {
        let prober = prober(
            &[("a.com", Script::Status(500, 0)), ("b.com", Script::Status(301, 0))],
            1_000,
        );

        let report = prober.probe_all(&urls(&["a.com", "b.com"]), None).await.unwrap();
        assert_eq!(report.winner().unwrap().url, "b.com");

        let failed = &report.results()[1];
        assert_eq!(failed.url, "a.com");
        assert_eq!(failed.status, Some(500));
        assert_eq!(failed.cause.as_deref(), Some("HTTP 500"));
    }

    #[tokio::test]
    async fn test_hanging_candidate_times_out() {
        let prober = prober(&[("slow.com", Script::Hang), ("ok.com", Script::Status(200, 0))], 100);

        let started = Instant::now();
        let report = prober.probe_all(&urls(&["slow.com", "ok.com"]), None).await.unwrap();

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(report.winner().unwrap().url, "ok.com");
        assert_eq!(report.results()[1].cause.as_deref(), Some("timed out"));
    }

    #[tokio::test]
    async fn test_probes_run_concurrently() {
        let scripts: Vec<(String, Script)> = (0..5)
            .map(|i| (format!("h{}.com", i), Script::Status(200, 200)))
            .collect();
        let borrowed: Vec<(&str, Script)> = scripts.iter().map(|(h, s)| (h.as_str(), *s)).collect();
        let prober = prober(&borrowed, 5_000);
        let list: Vec<String> = scripts.iter().map(|(h, _)| h.clone()).collect();

        let started = Instant::now();
        let report = prober.probe_all(&list, None).await.unwrap();

        assert_eq!(report.reachable_count(), 5);
        // Five sequential probes would take at least a second
        assert!(started.elapsed() < Duration::from_millis(900));
    }

    #[tokio::test]
    async fn test_observer_called_once_per_candidate() {
        let prober = prober(
            &[
                ("a.com", Script::Status(200, 10)),
                ("b.com", Script::Fail(10)),
                ("c.com", Script::Hang),
            ],
            100,
        );
        let observer = RecordingObserver::default();

        prober
            .probe_all(&urls(&["a.com", "b.com", "c.com"]), Some(&observer))
            .await
            .unwrap();

        let mut started = observer.started.lock().unwrap().clone();
        started.sort();
        assert_eq!(started, urls(&["a.com", "b.com", "c.com"]));

        let mut completed: Vec<String> =
            observer.completed.lock().unwrap().iter().map(|(url, _)| url.clone()).collect();
        completed.sort();
        assert_eq!(completed, urls(&["a.com", "b.com", "c.com"]));
    }

    #[tokio::test]
    async fn test_failure_at_deadline_settles_once() {
        // Transport failure and deadline land at the same instant
        let prober = prober(&[("edge.com", Script::Fail(50))], 50);
        let observer = RecordingObserver::default();

        let report = prober
            .probe_all(&urls(&["edge.com"]), Some(&observer))
            .await
            .unwrap();

        assert_eq!(report.results().len(), 1);
        assert_eq!(report.results()[0].latency, Latency::Unreachable);
        let completed = observer.completed.lock().unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].1, Latency::Unreachable);
    }

    #[tokio::test]
    async fn test_invalid_candidate_is_unreachable() {
        let prober = prober(&[("ok.com", Script::Status(200, 0))], 1_000);

        let report = prober
            .probe_all(&urls(&["exa mple.com", "ok.com"]), None)
            .await
            .unwrap();

        assert_eq!(report.winner().unwrap().url, "ok.com");
        assert_eq!(report.results()[1].url, "exa mple.com");
        assert!(!report.results()[1].is_reachable());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn latency() -> impl Strategy<Value = Latency> {
            prop_oneof![
                (0u64..500).prop_map(|ms| Latency::Reachable(Duration::from_millis(ms))),
                Just(Latency::Unreachable),
            ]
        }

        proptest! {
            #[test]
            fn ranked_results_are_sorted_and_complete(latencies in prop::collection::vec(latency(), 0..30)) {
                let results: Vec<ProbeResult> = latencies
                    .iter()
                    .enumerate()
                    .map(|(i, latency)| ProbeResult {
                        url: format!("u{}", i),
                        latency: *latency,
                        status: None,
                        cause: None,
                    })
                    .collect();

                let ranked = rank(results.clone());
                prop_assert_eq!(ranked.len(), results.len());

                for pair in ranked.windows(2) {
                    prop_assert!(pair[0].latency <= pair[1].latency);
                    // Stable: equal latencies keep input order
                    if pair[0].latency == pair[1].latency {
                        let a: usize = pair[0].url[1..].parse().unwrap();
                        let b: usize = pair[1].url[1..].parse().unwrap();
                        prop_assert!(a < b);
                    }
                }

                let report = ProbeReport::new(results, Duration::ZERO);
                let any_reachable = latencies.iter().any(Latency::is_reachable);
                prop_assert_eq!(report.winner().is_some(), any_reachable);
            }
        }
    }

    mod network {
        use super::*;
        use wiremock::{
            matchers::{method, path},
            Mock, MockServer, ResponseTemplate,
        };

        async fn server_with(status: u16, delay: Duration) -> MockServer {
            let server = MockServer::start().await;
            Mock::given(method("HEAD"))
                .and(path("/"))
                .respond_with(ResponseTemplate::new(status).set_delay(delay))
                .mount(&server)
                .await;
            server
        }

        #[tokio::test]
        async fn test_real_servers_are_ranked() {
            let fast = server_with(200, Duration::from_millis(10)).await;
            let slow = server_with(204, Duration::from_millis(300)).await;
            let broken = server_with(503, Duration::ZERO).await;

            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            let refused = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());
            drop(listener);

            let client = NetworkClient::new(Duration::from_secs(5)).unwrap();
            let prober = Prober::new(Arc::new(client), Duration::from_secs(5));
            let list = vec![slow.uri(), refused.clone(), fast.uri(), broken.uri()];

            let report = prober.probe_all(&list, None).await.unwrap();
            let order: Vec<&str> = report.results().iter().map(|r| r.url.as_str()).collect();

            assert_eq!(order[0], fast.uri());
            assert_eq!(order[1], slow.uri());
            assert_eq!(report.reachable_count(), 2);
            // Unreachable entries keep their input order
            assert_eq!(order[2], refused);
            assert_eq!(order[3], broken.uri());
        }

        #[tokio::test]
        async fn test_slow_server_beyond_timeout() {
            let slow = server_with(200, Duration::from_secs(3)).await;

            let client = NetworkClient::new(Duration::from_millis(200)).unwrap();
            let prober = Prober::new(Arc::new(client), Duration::from_millis(200));

            let started = Instant::now();
            let report = prober.probe_all(&[slow.uri()], None).await.unwrap();

            assert!(report.winner().is_none());
            assert!(started.elapsed() < Duration::from_secs(2));
        }
    }
}
