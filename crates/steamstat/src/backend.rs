//! The operations the plugin UI can call.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use steamstat_core::{LatencyReport, ThroughputReport, UpdateRequest, UpdateResult};
use steamstat_diag::{Connector, LatencyProber, TcpConnector, ThroughputTester};
use steamstat_fetch::{HttpClient, ReqwestClient};
use steamstat_install::UpdateInstaller;
use tracing::{info, warn};

use crate::config::BackendConfig;
use crate::error::{BackendError, Result};
use crate::pool::WorkerPool;
use crate::settings::{Settings, SettingsStore};

/// Slack on top of a diagnostic's own network budgets before the pool gives up
/// waiting for it.
const POOL_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendStatus {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyResponse {
    pub latency_ms: u64,
    pub cm_server: String,
}

impl From<LatencyReport> for LatencyResponse {
    fn from(report: LatencyReport) -> Self {
        Self {
            latency_ms: report.best_latency_ms,
            cm_server: report.best_host,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThroughputResponse {
    pub download_mbps: f64,
    pub upload_mbps: f64,
    /// Always true: upload is derived from the download rate, not measured.
    pub upload_estimated: bool,
}

impl From<ThroughputReport> for ThroughputResponse {
    fn from(report: ThroughputReport) -> Self {
        Self {
            download_mbps: report.download_mbps,
            upload_mbps: report.upload_mbps,
            upload_estimated: true,
        }
    }
}

pub struct Backend<C = ReqwestClient, K = TcpConnector>
where
    C: HttpClient + Clone + 'static,
    K: Connector + 'static,
{
    config: BackendConfig,
    pool: WorkerPool,
    installer: Arc<UpdateInstaller<C>>,
    prober: Arc<LatencyProber<C, K>>,
    tester: Arc<ThroughputTester<C>>,
    store: SettingsStore,
    settings: Mutex<Settings>,
}

impl Backend {
    /// Backend talking to the real network under `config.trust_policy`.
    pub fn new(config: BackendConfig) -> Result<Self> {
        let client = ReqwestClient::new(config.trust_policy).map_err(BackendError::Client)?;
        Self::with_parts(config, client, TcpConnector)
    }
}

impl<C, K> Backend<C, K>
where
    C: HttpClient + Clone + 'static,
    K: Connector + 'static,
{
    pub fn with_parts(config: BackendConfig, client: C, connector: K) -> Result<Self> {
        let pool = WorkerPool::new(config.worker_threads)?;
        let installer = UpdateInstaller::new(client.clone(), &config.staging_root, &config.plugin_dir)
            .download_timeout(config.update_timeout);
        let prober = LatencyProber::with_connector(client.clone(), connector, config.probe_config());
        let tester = ThroughputTester::new(client, config.throughput_config());
        let store = SettingsStore::new(config.settings_file());
        let settings = store.load();
        info!(
            plugin_dir = %config.plugin_dir.display(),
            settings = %store.path().display(),
            "backend initialized"
        );

        Ok(Self {
            config,
            pool,
            installer: Arc::new(installer),
            prober: Arc::new(prober),
            tester: Arc::new(tester),
            store,
            settings: Mutex::new(settings),
        })
    }

    pub fn config(&self) -> &BackendConfig { &self.config }

    pub fn ping(&self) -> BackendStatus {
        info!("ping");
        BackendStatus {
            success: true,
            message: "Backend is working!".to_string(),
        }
    }

    /// Download and apply the release at `url`. Always yields a result record.
    pub async fn install_update(&self, url: &str) -> UpdateResult {
        let installer = Arc::clone(&self.installer);
        let request = UpdateRequest::new(url);
        self.pool
            .submit(None, async move { installer.install(&request).await })
            .await
            .unwrap_or_else(|e| UpdateResult::failed(format!("Update failed: {e}")))
    }

    pub async fn probe_latency(&self) -> Result<LatencyResponse> {
        let prober = Arc::clone(&self.prober);
        let budget = self.config.directory_timeout + self.config.probe_timeout + POOL_GRACE;
        let report = self
            .pool
            .submit(Some(budget), async move { prober.probe_best().await })
            .await??;
        Ok(report.into())
    }

    pub async fn measure_throughput(&self) -> Result<ThroughputResponse> {
        let tester = Arc::clone(&self.tester);
        let budget = self.config.throughput_timeout + POOL_GRACE;
        let report = self
            .pool
            .submit(Some(budget), async move { tester.measure().await })
            .await??;
        Ok(report.into())
    }

    pub fn get_settings(&self) -> Settings { self.settings().clone() }

    pub fn get_setting(&self, key: &str) -> Option<Value> { self.settings().get(key) }

    /// Set one known key and persist.
    pub fn try_set_setting(&self, key: &str, value: Value) -> Result<()> {
        let mut settings = self.settings();
        *settings = settings.with_value(key, value)?;
        self.persist(&settings)
    }

    /// [`try_set_setting`](Self::try_set_setting) reduced to success or not.
    /// `false` if the key is unknown, the value has the wrong type, or the
    /// file could not be written.
    pub fn set_setting(&self, key: &str, value: Value) -> bool {
        self.try_set_setting(key, value)
            .inspect_err(|e| warn!(error = %e, "setting rejected"))
            .is_ok()
    }

    /// Apply every known key in `values` and persist once. Unknown keys are
    /// skipped.
    pub fn set_settings(&self, values: &Map<String, Value>) -> bool {
        let mut settings = self.settings();
        for (key, value) in values {
            match settings.with_value(key, value.clone()) {
                Ok(updated) => *settings = updated,
                Err(e) => warn!(error = %e, "setting skipped"),
            }
        }
        self.persist(&settings).is_ok()
    }

    pub fn reset_settings(&self) -> bool {
        let mut settings = self.settings();
        *settings = Settings::default();
        self.persist(&settings).is_ok()
    }

    fn persist(&self, settings: &Settings) -> Result<()> {
        if self.store.save(settings) {
            Ok(())
        } else {
            Err(BackendError::SettingsNotSaved)
        }
    }

    fn settings(&self) -> MutexGuard<'_, Settings> {
        self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
