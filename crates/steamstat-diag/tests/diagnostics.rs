use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use steamstat_core::ErrorKind;
use steamstat_diag::{
    CandidateEndpoint, Connector, DiagError, LatencyProber, ProbeConfig, ThroughputConfig, ThroughputTester,
};
use steamstat_fetch::mock::MemoryClient;

const DIRECTORY: &str = "https://directory.example.test/servers";
const SAMPLE: &str = "https://speed.example.test/sample";

enum Behaviour {
    Answer(Duration),
    Refuse,
    Hang,
}

/// Simulated network keyed by host.
#[derive(Clone, Default)]
struct SimulatedNetwork {
    hosts: Arc<HashMap<String, Duration>>,
    refused: Arc<Vec<String>>,
    attempts: Arc<AtomicUsize>,
}

impl SimulatedNetwork {
    fn new(hosts: &[(&str, Behaviour)]) -> Self {
        let mut answering = HashMap::new();
        let mut refused = Vec::new();
        for (host, behaviour) in hosts {
            match behaviour {
                Behaviour::Answer(d) => {
                    answering.insert(host.to_string(), *d);
                }
                Behaviour::Refuse => refused.push(host.to_string()),
                Behaviour::Hang => {
                    answering.insert(host.to_string(), Duration::from_secs(3600));
                }
            }
        }
        Self {
            hosts: Arc::new(answering),
            refused: Arc::new(refused),
            attempts: Arc::default(),
        }
    }
}

impl Connector for SimulatedNetwork {
    async fn connect(&self, endpoint: &CandidateEndpoint) -> io::Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.refused.contains(&endpoint.host) {
            return Err(io::Error::from(io::ErrorKind::ConnectionRefused));
        }
        match self.hosts.get(&endpoint.host) {
            Some(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(())
            }
            None => Err(io::Error::from(io::ErrorKind::HostUnreachable)),
        }
    }
}

fn directory(entries: &[&str]) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({ "response": { "serverlist": entries, "result": 1 } })).unwrap()
}

fn config() -> ProbeConfig {
    ProbeConfig {
        directory_url: DIRECTORY.to_string(),
        ..ProbeConfig::default()
    }
}

#[tokio::test(start_paused = true)]
async fn fastest_reachable_server_wins() {
    let network = SimulatedNetwork::new(&[
        ("a.cm.test", Behaviour::Answer(Duration::from_millis(50))),
        ("b.cm.test", Behaviour::Answer(Duration::from_millis(10))),
        ("c.cm.test", Behaviour::Refuse),
    ]);
    let client = MemoryClient::new().with_body(
        DIRECTORY,
        directory(&["a.cm.test:27017", "b.cm.test:27018", "c.cm.test:27017"]),
    );
    let prober = LatencyProber::with_connector(client, network, config());

    let report = prober.probe_best().await.unwrap();

    assert_eq!(report.best_host, "b.cm.test:27018");
    assert_eq!(report.best_latency_ms, 10);
}

#[tokio::test(start_paused = true)]
async fn hung_server_times_out_without_failing_the_batch() {
    let network = SimulatedNetwork::new(&[
        ("slow.cm.test", Behaviour::Hang),
        ("ok.cm.test", Behaviour::Answer(Duration::from_millis(1500))),
    ]);
    let client = MemoryClient::new().with_body(DIRECTORY, directory(&["slow.cm.test", "ok.cm.test"]));
    let prober = LatencyProber::with_connector(client, network, config());

    let started = tokio::time::Instant::now();
    let report = prober.probe_best().await.unwrap();

    assert_eq!(report.best_host, "ok.cm.test:27017");
    assert_eq!(report.best_latency_ms, 1500);
    assert_eq!(started.elapsed(), Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn nothing_reachable_is_an_error() {
    let network = SimulatedNetwork::new(&[("a.cm.test", Behaviour::Refuse), ("b.cm.test", Behaviour::Hang)]);
    let client = MemoryClient::new().with_body(DIRECTORY, directory(&["a.cm.test", "b.cm.test"]));
    let prober = LatencyProber::with_connector(client, network, config());

    let err = prober.probe_best().await.unwrap_err();

    assert!(matches!(err, DiagError::NoReachableEndpoint { attempted: 2 }));
    assert_eq!(err.kind(), ErrorKind::NoReachableEndpoint);
}

#[tokio::test(start_paused = true)]
async fn at_most_ten_servers_are_probed() {
    let hosts: Vec<String> = (0..30).map(|i| format!("cm{i}.test")).collect();
    let behaviours: Vec<(&str, Behaviour)> = hosts
        .iter()
        .map(|h| (h.as_str(), Behaviour::Answer(Duration::from_millis(20))))
        .collect();
    let network = SimulatedNetwork::new(&behaviours);
    let attempts = network.attempts.clone();
    let names: Vec<&str> = hosts.iter().map(String::as_str).collect();
    let client = MemoryClient::new().with_body(DIRECTORY, directory(&names));
    let prober = LatencyProber::with_connector(client, network, config());

    let report = prober.probe_best().await.unwrap();

    assert_eq!(report.best_latency_ms, 20);
    assert_eq!(attempts.load(Ordering::SeqCst), 10);
}

#[tokio::test]
async fn directory_failures_are_reported() {
    let prober = LatencyProber::with_connector(
        MemoryClient::new().with_status(DIRECTORY, 503),
        SimulatedNetwork::default(),
        config(),
    );
    let err = prober.probe_best().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DirectoryUnavailable);

    let prober = LatencyProber::with_connector(
        MemoryClient::new().with_body(DIRECTORY, directory(&[])),
        SimulatedNetwork::default(),
        config(),
    );
    let err = prober.probe_best().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DirectoryUnavailable);
}

fn throughput_config() -> ThroughputConfig {
    ThroughputConfig {
        url: SAMPLE.to_string(),
        ..ThroughputConfig::default()
    }
}

#[tokio::test(start_paused = true)]
async fn throughput_from_one_second_sample() {
    // 125,000,000 bits
    let client = MemoryClient::new().with_delayed_body(SAMPLE, Duration::from_secs(1), vec![0u8; 15_625_000]);
    let tester = ThroughputTester::new(client, throughput_config());

    let report = tester.measure().await.unwrap();

    assert!((report.download_mbps - 125.0).abs() < 1e-9);
    assert!((report.upload_mbps - 50.0).abs() < 1e-9);
}

#[tokio::test(start_paused = true)]
async fn slow_sample_times_out() {
    let client = MemoryClient::new().with_delayed_body(SAMPLE, Duration::from_secs(11), vec![0u8; 1024]);
    let tester = ThroughputTester::new(client, throughput_config());

    let err = tester.measure().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DownloadFailed);
}

#[tokio::test]
async fn empty_sample_is_a_failure() {
    let client = MemoryClient::new().with_body(SAMPLE, Vec::<u8>::new());
    let tester = ThroughputTester::new(client, throughput_config());

    let err = tester.measure().await.unwrap_err();

    assert!(matches!(err, DiagError::DownloadFailed(_)));
}
