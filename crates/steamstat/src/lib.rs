//! SteamStat plugin backend.
//!
//! [`Backend`] is the surface the plugin UI talks to. It owns the worker pool
//! that keeps network and disk work off the caller, the settings store, and the
//! update and diagnostics engines.

pub mod backend;
pub mod config;
pub mod error;
pub mod logging;
pub mod pool;
pub mod settings;

pub use backend::{Backend, BackendStatus, LatencyResponse, ThroughputResponse};
pub use config::BackendConfig;
pub use error::{BackendError, ErrorResponse, Result};
pub use pool::{PoolError, WorkerPool};
pub use settings::{Settings, SettingsError, SettingsStore};
