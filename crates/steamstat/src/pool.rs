//! Worker pool that runs backend operations off the caller's thread.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::runtime::{Builder, Handle, Runtime};
use tracing::warn;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to start worker pool: {0}")]
    Build(#[source] std::io::Error),

    #[error("operation did not finish within {}s", .0.as_secs_f64())]
    TimedOut(Duration),

    #[error("operation stopped unexpectedly: {0}")]
    Join(#[source] tokio::task::JoinError),
}

/// A bounded multi-thread runtime.
///
/// Work submitted here never runs on the caller's executor, so a
/// single-threaded caller stays responsive while updates and probes run.
pub struct WorkerPool {
    runtime: Option<Runtime>,
}

impl WorkerPool {
    pub fn new(worker_threads: usize) -> Result<Self, PoolError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(worker_threads.max(1))
            .thread_name("steamstat-worker")
            .enable_all()
            .build()
            .map_err(PoolError::Build)?;
        Ok(Self {
            runtime: Some(runtime),
        })
    }

    fn handle(&self) -> Option<&Handle> { self.runtime.as_ref().map(Runtime::handle) }

    /// Run `work` on the pool and wait for it, at most `budget` if given.
    ///
    /// When the budget runs out the caller gets [`PoolError::TimedOut`] and
    /// the unit keeps running detached, so it can still finish its own cleanup.
    pub async fn submit<F, T>(&self, budget: Option<Duration>, work: F) -> Result<T, PoolError>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let task = match self.handle() {
            Some(handle) => handle.spawn(work),
            None => tokio::spawn(work),
        };

        match budget {
            Some(budget) => match tokio::time::timeout(budget, task).await {
                Ok(joined) => joined.map_err(PoolError::Join),
                Err(_) => {
                    warn!(budget_ms = budget.as_millis() as u64, "operation detached after timeout");
                    Err(PoolError::TimedOut(budget))
                }
            },
            None => task.await.map_err(PoolError::Join),
        }
    }

    /// Synchronous form of [`submit`](Self::submit) for callers without an
    /// executor of their own.
    pub fn block_on<F, T>(&self, budget: Option<Duration>, work: F) -> Result<T, PoolError>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        match &self.runtime {
            Some(runtime) => runtime.block_on(self.submit(budget, work)),
            None => Err(PoolError::Build(std::io::Error::other("worker pool has shut down"))),
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Safe from inside another runtime, unlike a plain drop.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
