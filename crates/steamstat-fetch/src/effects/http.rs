use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

use crate::error::Result;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Asynchronous HTTP GET abstraction.
///
/// Implementations follow redirects, reject non-success statuses with
/// [`FetchError::Status`](crate::FetchError::Status) and map transport failures
/// onto [`FetchError`](crate::FetchError). Time budgets are applied by the
/// caller, not here.
///
/// # Implementations
///
/// - [`ReqwestClient`]: Production implementation using `reqwest`
/// - `mock::MemoryClient`: canned responses for tests
pub trait HttpClient: Send + Sync {
    /// Issue a GET for `url` and return the response body as a stream.
    fn stream(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<BoxStream<'static, Result<Bytes>>>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use std::time::Duration;

    use futures_util::StreamExt;
    use tracing::warn;

    use super::*;
    use crate::data::TrustPolicy;
    use crate::error::FetchError;

    const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

    /// Production HTTP client implementation using reqwest.
    #[derive(Clone)]
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        /// Build a client that treats certificates according to `policy`.
        pub fn new(policy: TrustPolicy) -> Result<Self> {
            let mut builder = reqwest::Client::builder()
                .user_agent(concat!("steamstat/", env!("CARGO_PKG_VERSION")))
                .connect_timeout(CONNECT_TIMEOUT);

            if policy == TrustPolicy::AcceptInvalidCerts {
                warn!(%policy, "TLS certificate validation is disabled for this client");
                builder = builder.danger_accept_invalid_certs(true);
            }

            let client = builder
                .build()
                .map_err(|e| FetchError::ClientBuild(e.to_string()))?;
            Ok(Self { client })
        }
    }

    fn map_error(url: &str, e: reqwest::Error) -> FetchError {
        if let Some(status) = e.status() {
            FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else if e.is_builder() {
            FetchError::InvalidUrl(url.to_string())
        } else {
            FetchError::Network(e.to_string())
        }
    }

    impl HttpClient for ReqwestClient {
        async fn stream(&self, url: &str) -> Result<BoxStream<'static, Result<Bytes>>> {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| map_error(url, e))?;

            let owned_url = url.to_string();
            let stream = response
                .bytes_stream()
                .map(move |chunk| chunk.map_err(|e| map_error(&owned_url, e)));

            Ok(Box::pin(stream))
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
