use std::path::PathBuf;
use std::time::Duration;

use steamstat_diag::{DEFAULT_DIRECTORY_URL, DEFAULT_SAMPLE_URL, ProbeConfig, ThroughputConfig};
use steamstat_fetch::TrustPolicy;

pub const SETTINGS_FILE: &str = "settings.json";

/// Everything the backend needs to know about its environment.
///
/// Built once at startup and handed to [`Backend`](crate::Backend); nothing
/// reads configuration from process globals after that.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Live install directory that updates are copied into.
    pub plugin_dir: PathBuf,
    /// Holds `settings.json`.
    pub settings_dir: PathBuf,
    /// Parent of per-update staging directories. Must exist.
    pub staging_root: PathBuf,
    pub trust_policy: TrustPolicy,
    /// Cap on the update download. `None` waits as long as the server does.
    pub update_timeout: Option<Duration>,

    pub directory_url: String,
    pub directory_timeout: Duration,
    pub probe_timeout: Duration,
    pub probe_sample_size: usize,
    pub default_port: u16,

    pub throughput_url: String,
    pub throughput_timeout: Duration,
    pub throughput_max_bytes: u64,

    pub worker_threads: usize,
}

impl BackendConfig {
    pub fn new(plugin_dir: impl Into<PathBuf>, settings_dir: impl Into<PathBuf>) -> Self {
        Self {
            plugin_dir: plugin_dir.into(),
            settings_dir: settings_dir.into(),
            staging_root: std::env::temp_dir(),
            trust_policy: TrustPolicy::default(),
            update_timeout: Some(Duration::from_secs(300)),
            directory_url: DEFAULT_DIRECTORY_URL.to_string(),
            directory_timeout: Duration::from_secs(5),
            probe_timeout: Duration::from_secs(2),
            probe_sample_size: 10,
            default_port: 27017,
            throughput_url: DEFAULT_SAMPLE_URL.to_string(),
            throughput_timeout: Duration::from_secs(10),
            throughput_max_bytes: 25_000_000,
            worker_threads: 4,
        }
    }

    pub fn settings_file(&self) -> PathBuf { self.settings_dir.join(SETTINGS_FILE) }

    pub fn probe_config(&self) -> ProbeConfig {
        ProbeConfig {
            directory_url: self.directory_url.clone(),
            directory_timeout: self.directory_timeout,
            probe_timeout: self.probe_timeout,
            sample_size: self.probe_sample_size,
            default_port: self.default_port,
        }
    }

    pub fn throughput_config(&self) -> ThroughputConfig {
        ThroughputConfig {
            url: self.throughput_url.clone(),
            timeout: self.throughput_timeout,
            max_bytes: self.throughput_max_bytes,
        }
    }
}
