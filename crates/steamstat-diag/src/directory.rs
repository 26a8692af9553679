//! Server directory documents.

use serde::Deserialize;
use tracing::debug;

use crate::endpoint::CandidateEndpoint;
use crate::error::{DiagError, Result};

#[derive(Deserialize)]
struct Document {
    response: Listing,
}

#[derive(Deserialize)]
struct Listing {
    #[serde(default)]
    serverlist: Vec<String>,
}

/// Parse a `{"response": {"serverlist": [...]}}` document into candidates.
///
/// Entries that do not parse are skipped. A document with no usable entry is
/// [`DiagError::DirectoryUnavailable`].
pub fn parse_directory(body: &[u8], default_port: u16) -> Result<Vec<CandidateEndpoint>> {
    let document: Document =
        serde_json::from_slice(body).map_err(|e| DiagError::DirectoryUnavailable(e.to_string()))?;

    let candidates: Vec<_> = document
        .response
        .serverlist
        .iter()
        .filter_map(|entry| match CandidateEndpoint::parse_with_default(entry, default_port) {
            Ok(endpoint) => Some(endpoint),
            Err(e) => {
                debug!(error = %e, "directory entry skipped");
                None
            }
        })
        .collect();

    if candidates.is_empty() {
        return Err(DiagError::DirectoryUnavailable("directory lists no servers".to_string()));
    }
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_server_list() {
        let body = br#"{"response":{"serverlist":["162.254.196.67:27017","cm1.example.net","bad:port"],"result":1}}"#;
        let candidates = parse_directory(body, 27017).unwrap();
        assert_eq!(
            candidates,
            vec![
                CandidateEndpoint::new("162.254.196.67", 27017),
                CandidateEndpoint::new("cm1.example.net", 27017),
            ]
        );
    }

    #[test]
    fn empty_list_is_unavailable() {
        let err = parse_directory(br#"{"response":{"serverlist":[]}}"#, 27017).unwrap_err();
        assert!(matches!(err, DiagError::DirectoryUnavailable(_)));
        let err = parse_directory(br#"{"response":{}}"#, 27017).unwrap_err();
        assert!(matches!(err, DiagError::DirectoryUnavailable(_)));
    }

    #[test]
    fn malformed_document_is_unavailable() {
        assert!(parse_directory(b"<html>", 27017).is_err());
    }
}
