use std::fmt;
use std::str::FromStr;

use crate::error::DiagError;

/// A `host:port` pair eligible for probing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateEndpoint {
    pub host: String,
    pub port: u16,
}

impl CandidateEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parse `s`, using `default_port` when it carries no port.
    ///
    /// Accepts `host`, `host:port`, `[v6]` and `[v6]:port`.
    pub fn parse_with_default(s: &str, default_port: u16) -> Result<Self, DiagError> {
        let s = s.trim();
        let invalid = || DiagError::InvalidEndpoint(s.to_string());

        let (host, port) = if let Some(rest) = s.strip_prefix('[') {
            let (host, tail) = rest.split_once(']').ok_or_else(invalid)?;
            match tail {
                "" => (host, None),
                _ => (host, Some(tail.strip_prefix(':').ok_or_else(invalid)?)),
            }
        } else {
            match s.split_once(':') {
                Some((host, port)) => (host, Some(port)),
                None => (s, None),
            }
        };

        if host.is_empty() {
            return Err(invalid());
        }
        let port = match port {
            Some(p) => p.parse::<u16>().ok().filter(|p| *p != 0).ok_or_else(invalid)?,
            None => default_port,
        };
        Ok(Self::new(host, port))
    }
}

impl FromStr for CandidateEndpoint {
    type Err = DiagError;

    /// Requires an explicit port.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = Self::parse_with_default(s, 0)?;
        if parsed.port == 0 {
            return Err(DiagError::InvalidEndpoint(s.to_string()));
        }
        Ok(parsed)
    }
}

impl fmt::Display for CandidateEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
