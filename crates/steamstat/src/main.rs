use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::builder::FalseyValueParser;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{Map, Value};
use steamstat::{Backend, BackendConfig, BackendError, ErrorResponse, logging};
use steamstat_core::ErrorKind;
use steamstat_fetch::TrustPolicy;
use tracing::error;

#[derive(Debug, Parser)]
#[command(name = "steamstat", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
struct App {
    /// Live plugin install directory
    #[arg(long, env = "DECKY_PLUGIN_DIR", global = true)]
    plugin_dir: Option<PathBuf>,

    /// Directory holding settings.json
    #[arg(long, env = "DECKY_PLUGIN_SETTINGS_DIR", global = true)]
    settings_dir: Option<PathBuf>,

    /// Parent directory for update staging [default: system temp dir]
    #[arg(long, env = "STEAMSTAT_STAGING_DIR", global = true)]
    staging_dir: Option<PathBuf>,

    /// Accept invalid TLS certificates
    #[arg(long, env = "STEAMSTAT_INSECURE_TLS", global = true, value_parser = FalseyValueParser::new())]
    insecure_tls: bool,

    /// Update download limit in seconds, 0 for none
    #[arg(long, value_name = "SECS", global = true)]
    update_timeout: Option<u64>,

    /// Worker threads for network and disk work
    #[arg(long, global = true)]
    workers: Option<usize>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Download a release zip and install it over the plugin directory
    #[command(name = "install-update")]
    InstallUpdate { url: String },
    /// Find the lowest-latency game server
    #[command(alias = "latency", name = "probe-latency")]
    ProbeLatency,
    /// Measure download throughput and estimate upload
    #[command(alias = "speed", name = "measure-throughput")]
    MeasureThroughput,
    /// Read or change plugin settings
    #[command(subcommand, alias = "cfg")]
    Settings(SettingsCommand),
    /// Check that the backend runs
    Ping,
}

#[derive(Debug, Subcommand)]
enum SettingsCommand {
    /// Print all settings, or one value
    Get { key: Option<String> },
    /// Set one setting to a JSON value
    Set { key: String, value: String },
    /// Merge a JSON object of settings
    #[command(name = "set-many")]
    SetMany { values: String },
    /// Restore defaults
    Reset,
}

fn main() -> ExitCode {
    let app = App::parse();
    logging::init();

    match run(app) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %format!("{e:#}"), "command failed");
            let response = ErrorResponse {
                error: ErrorKind::IoFailure,
                message: format!("{e:#}"),
            };
            let _ = emit(&response);
            ExitCode::FAILURE
        }
    }
}

fn run(app: App) -> Result<ExitCode> {
    if let Command::Ping = app.cmd {
        emit(&serde_json::json!({ "success": true, "message": "Backend is working!" }))?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = config(&app)?;
    let backend = Backend::new(config).context("failed to start backend")?;
    // The caller's side is one thread; the backend's pool does the work.
    let caller = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    caller.block_on(dispatch(&backend, app.cmd))
}

fn config(app: &App) -> Result<BackendConfig> {
    let plugin_dir = app
        .plugin_dir
        .clone()
        .context("--plugin-dir or DECKY_PLUGIN_DIR is required")?;
    let settings_dir = app
        .settings_dir
        .clone()
        .context("--settings-dir or DECKY_PLUGIN_SETTINGS_DIR is required")?;

    let mut config = BackendConfig::new(plugin_dir, settings_dir);
    if let Some(staging) = &app.staging_dir {
        config.staging_root = staging.clone();
    }
    if app.insecure_tls {
        config.trust_policy = TrustPolicy::AcceptInvalidCerts;
    }
    if let Some(secs) = app.update_timeout {
        config.update_timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
    if let Some(workers) = app.workers {
        config.worker_threads = workers;
    }
    Ok(config)
}

async fn dispatch(backend: &Backend, cmd: Command) -> Result<ExitCode> {
    match cmd {
        Command::InstallUpdate { url } => emit(&backend.install_update(&url).await)?,
        Command::ProbeLatency => return emit_result(backend.probe_latency().await),
        Command::MeasureThroughput => return emit_result(backend.measure_throughput().await),
        Command::Settings(SettingsCommand::Get { key: None }) => emit(&backend.get_settings())?,
        Command::Settings(SettingsCommand::Get { key: Some(key) }) => {
            emit(&backend.get_setting(&key).unwrap_or(Value::Null))?
        }
        Command::Settings(SettingsCommand::Set { key, value }) => {
            let value: Value = serde_json::from_str(&value)
                .with_context(|| format!("value for '{key}' is not valid JSON"))?;
            return emit_result(backend.try_set_setting(&key, value).map(|()| true));
        }
        Command::Settings(SettingsCommand::SetMany { values }) => {
            let values: Map<String, Value> =
                serde_json::from_str(&values).context("settings must be a JSON object")?;
            emit(&backend.set_settings(&values))?
        }
        Command::Settings(SettingsCommand::Reset) => emit(&backend.reset_settings())?,
        Command::Ping => emit(&backend.ping())?,
    }
    Ok(ExitCode::SUCCESS)
}

fn emit_result<T: Serialize>(result: Result<T, BackendError>) -> Result<ExitCode> {
    match result {
        Ok(value) => {
            emit(&value)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(kind = %e.kind(), error = %e, "command failed");
            emit(&ErrorResponse::from(&e))?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn emit<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
