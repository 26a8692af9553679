//! In-memory [`HttpClient`] for tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bytes::Bytes;
use futures_util::stream;

use crate::effects::{BoxStream, HttpClient};
use crate::error::{FetchError, Result};

const CHUNK_SIZE: usize = 16 * 1024;

#[derive(Clone, Debug)]
enum Reply {
    Body(Bytes),
    Status(u16),
    Failure(String),
}

#[derive(Clone, Debug)]
struct Route {
    delay: Duration,
    reply: Reply,
}

/// Serves canned responses keyed by exact URL.
///
/// Unknown URLs fail with [`FetchError::Network`]. Delays use
/// `tokio::time::sleep`, so paused-clock tests see exact durations.
#[derive(Clone, Debug, Default)]
pub struct MemoryClient {
    routes: HashMap<String, Route>,
    requests: Arc<AtomicUsize>,
}

impl MemoryClient {
    pub fn new() -> Self { Self::default() }

    pub fn with_body(self, url: &str, body: impl Into<Bytes>) -> Self {
        self.route(url, Duration::ZERO, Reply::Body(body.into()))
    }

    pub fn with_delayed_body(self, url: &str, delay: Duration, body: impl Into<Bytes>) -> Self {
        self.route(url, delay, Reply::Body(body.into()))
    }

    pub fn with_status(self, url: &str, status: u16) -> Self {
        self.route(url, Duration::ZERO, Reply::Status(status))
    }

    pub fn with_failure(self, url: &str, message: &str) -> Self {
        self.route(url, Duration::ZERO, Reply::Failure(message.to_string()))
    }

    /// Number of requests served so far, across clones.
    pub fn request_count(&self) -> usize { self.requests.load(Ordering::SeqCst) }

    fn route(mut self, url: &str, delay: Duration, reply: Reply) -> Self {
        self.routes.insert(url.to_string(), Route { delay, reply });
        self
    }
}

impl HttpClient for MemoryClient {
    async fn stream(&self, url: &str) -> Result<BoxStream<'static, Result<Bytes>>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let route = self
            .routes
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Network(format!("no route to {url}")))?;

        if !route.delay.is_zero() {
            tokio::time::sleep(route.delay).await;
        }

        match route.reply {
            Reply::Body(body) => {
                let chunks: Vec<Result<Bytes>> = (0..body.len())
                    .step_by(CHUNK_SIZE)
                    .map(|start| Ok(body.slice(start..(start + CHUNK_SIZE).min(body.len()))))
                    .collect();
                Ok(Box::pin(stream::iter(chunks)))
            }
            Reply::Status(status) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
            Reply::Failure(message) => Err(FetchError::Network(message)),
        }
    }
}
