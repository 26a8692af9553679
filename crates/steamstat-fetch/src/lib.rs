//! HTTP transport shared by the update installer and the diagnostics engine.
//!
//! # Architecture
//!
//! - [`data`] - Per-request options, trust policy, timed samples
//! - [`effects`] - The [`HttpClient`] seam and the [`Fetcher`] built on it
//!
//! Timeouts are enforced by [`Fetcher`] around the whole request, so every
//! client implementation gets the same budget semantics.

pub mod data;
mod effects;
mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use data::{FetchOptions, Sample, TrustPolicy};
pub use effects::{BoxStream, Fetcher, HttpClient};

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;

pub use error::{FetchError, Result};
