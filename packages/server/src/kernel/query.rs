//! StoreQuery - fan-out store reads with a bounded join.
//!
//! Every store read in the login/verify path is dispatched as its own task
//! the moment it is created; the caller joins when it actually needs the
//! outcome. Independent reads can therefore be started together and awaited
//! together instead of serializing I/O.

use std::future::Future;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// An in-flight store read.
///
/// The read runs from the moment `spawn` is called. `join` waits for the
/// single result/error outcome, bounded by the deadline; a read that misses
/// the deadline is aborted so no task is left producing an outcome nobody
/// consumes.
pub struct StoreQuery<T> {
    handle: JoinHandle<Result<T>>,
    deadline: Duration,
}

impl<T: Send + 'static> StoreQuery<T> {
    /// Dispatch a read as an independent task.
    pub fn spawn<F>(deadline: Duration, fut: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(fut),
            deadline,
        }
    }

    /// Wait for the outcome, at most until the deadline.
    pub async fn join(mut self) -> Result<T> {
        match timeout(self.deadline, &mut self.handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(anyhow!("store query task failed: {join_err}")),
            Err(_) => {
                self.handle.abort();
                Err(anyhow!(
                    "store query timed out after {}ms",
                    self.deadline.as_millis()
                ))
            }
        }
    }
}

/// Join a batch of already-running queries, failing on the first error.
pub async fn join_all<T: Send + 'static>(queries: Vec<StoreQuery<T>>) -> Result<Vec<T>> {
    let results = futures::future::join_all(queries.into_iter().map(|q| q.join())).await;
    results.into_iter().collect()
}
