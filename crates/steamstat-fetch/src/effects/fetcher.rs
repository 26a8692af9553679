use std::future::Future;
use std::path::Path;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio::time::Instant;
use tracing::debug;

use crate::data::{FetchOptions, Sample};
use crate::effects::http::HttpClient;
use crate::error::{FetchError, Result};

/// Runs GET requests through an [`HttpClient`] under per-request limits.
pub struct Fetcher<C: HttpClient> {
    client: C,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C) -> Self { Self { client } }

    /// Stream the body at `url` into a newly created file at `destination`.
    ///
    /// Returns the number of bytes written. The parent directory must exist.
    pub async fn fetch_to_file(
        &self,
        url: &str,
        destination: &Path,
        options: &FetchOptions,
    ) -> Result<u64> {
        debug!(url, path = %destination.display(), "fetch to file started");
        let written = bounded(options.timeout, async {
            let io_err = |source| FetchError::Io {
                path: destination.to_path_buf(),
                source,
            };

            let mut file = tokio::fs::File::create(destination).await.map_err(io_err)?;
            let mut stream = self.client.stream(url).await?;
            let mut written = 0u64;

            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                let chunk = clip(&chunk, written, options.max_bytes);
                file.write_all(chunk).await.map_err(io_err)?;
                written += chunk.len() as u64;
                if reached(written, options.max_bytes) {
                    break;
                }
            }

            file.flush().await.map_err(io_err)?;
            Ok(written)
        })
        .await?;
        debug!(url, bytes = written, "fetch to file finished");
        Ok(written)
    }

    /// Read the whole body at `url` into memory.
    pub async fn fetch_bytes(&self, url: &str, options: &FetchOptions) -> Result<Bytes> {
        Ok(self.fetch_timed(url, options).await?.body)
    }

    /// Read the body at `url` and measure how long the full read took.
    ///
    /// The clock starts before the request is sent and stops after the last
    /// byte (or the `max_bytes` cap) arrives.
    pub async fn fetch_timed(&self, url: &str, options: &FetchOptions) -> Result<Sample> {
        debug!(url, "fetch started");
        let started = Instant::now();
        let body = bounded(options.timeout, async {
            let mut stream = self.client.stream(url).await?;
            let mut body = BytesMut::new();

            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                body.extend_from_slice(clip(&chunk, body.len() as u64, options.max_bytes));
                if reached(body.len() as u64, options.max_bytes) {
                    break;
                }
            }
            Ok(body.freeze())
        })
        .await?;

        let elapsed = started.elapsed();
        debug!(url, bytes = body.len(), elapsed_ms = elapsed.as_millis() as u64, "fetch finished");
        Ok(Sample { body, elapsed })
    }
}

async fn bounded<T>(timeout: Option<Duration>, work: impl Future<Output = Result<T>>) -> Result<T> {
    match timeout {
        Some(budget) => tokio::time::timeout(budget, work)
            .await
            .map_err(|_| FetchError::Timeout(budget))?,
        None => work.await,
    }
}

fn clip(chunk: &[u8], so_far: u64, max_bytes: Option<u64>) -> &[u8] {
    match max_bytes {
        Some(max) => {
            let room = max.saturating_sub(so_far).min(chunk.len() as u64) as usize;
            &chunk[..room]
        }
        None => chunk,
    }
}

fn reached(so_far: u64, max_bytes: Option<u64>) -> bool {
    max_bytes.is_some_and(|max| so_far >= max)
}
