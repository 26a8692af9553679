//! Network diagnostics: which game server answers fastest, and how fast a
//! bulk download runs.

mod directory;
mod endpoint;
mod error;
mod latency;
mod probe;
mod throughput;

pub use directory::parse_directory;
pub use endpoint::CandidateEndpoint;
pub use error::{DiagError, Result};
pub use latency::{DEFAULT_DIRECTORY_URL, LatencyProber, ProbeConfig};
pub use probe::{Connector, ProbeResult, TcpConnector, probe, select_best};
pub use throughput::{DEFAULT_SAMPLE_URL, ThroughputConfig, ThroughputTester};
