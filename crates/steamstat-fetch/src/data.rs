//! Immutable configuration for a single fetch.

use std::fmt;
use std::time::Duration;

use bytes::Bytes;

/// How server certificates are treated.
///
/// Full validation is the default. [`TrustPolicy::AcceptInvalidCerts`] exists
/// for networks whose intercepting proxies present certificates the device
/// cannot validate; building a client with it is always logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrustPolicy {
    #[default]
    Verify,
    AcceptInvalidCerts,
}

impl fmt::Display for TrustPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrustPolicy::Verify => write!(f, "verify"),
            TrustPolicy::AcceptInvalidCerts => write!(f, "accept-invalid-certs"),
        }
    }
}

/// Per-request limits.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use steamstat_fetch::FetchOptions;
///
/// let options = FetchOptions::default()
///     .timeout(Duration::from_secs(10))
///     .max_bytes(25_000_000);
/// assert_eq!(options.max_bytes, Some(25_000_000));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Budget for the whole request, connection through last body byte.
    ///
    /// Default: None (no cap beyond the client's own)
    pub timeout: Option<Duration>,

    /// Stop reading the body once this many bytes have arrived.
    ///
    /// Default: None
    pub max_bytes: Option<u64>,
}

impl FetchOptions {
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn timeout_opt(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }
}

/// Body bytes together with the wall-clock time the full read took.
#[derive(Debug, Clone)]
pub struct Sample {
    pub body: Bytes,
    pub elapsed: Duration,
}

impl Sample {
    pub fn len(&self) -> u64 { self.body.len() as u64 }

    pub fn is_empty(&self) -> bool { self.body.is_empty() }
}
