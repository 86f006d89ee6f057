//! Dispatch policies over concurrent replica attempts
//!
//! Every attempt is spawned onto its own task, so an attempt that outlives
//! the logical operation keeps running and can still harvest a piggybacked
//! config into the cache. The deadline covers the whole logical operation,
//! not each attempt.

use crate::common::{Error, Result};
use futures_util::future::join_all;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;

/// Race-to-first-success: resolve with the first `Ok`, or with
/// [`Error::AllFailed`] carrying every per-replica failure, or with
/// [`Error::Timeout`] when the deadline expires first.
///
/// Attempts are expected to arrive pre-wrapped as
/// [`Error::SubService`] failures and to have done their own cache
/// bookkeeping before returning.
pub(crate) async fn race<T, F>(attempts: Vec<F>, deadline: Duration) -> Result<T>
where
    T: Send + 'static,
    F: Future<Output = Result<T>> + Send + 'static,
{
    let total = attempts.len();
    let (tx, mut rx) = mpsc::unbounded_channel();
    for attempt in attempts {
        let tx = tx.clone();
        tokio::spawn(async move {
            // The send fails once the race has resolved and the receiver is
            // gone; the attempt still completed, so its config harvest stands.
            let _ = tx.send(attempt.await);
        });
    }
    drop(tx);

    let resolve = async {
        let mut failures = Vec::with_capacity(total);
        while let Some(result) = rx.recv().await {
            match result {
                Ok(value) => return Ok(value),
                Err(error) => {
                    tracing::debug!("sub-request failed: {}", error);
                    failures.push(error);
                }
            }
        }
        Err(Error::AllFailed(failures))
    };

    match tokio::time::timeout(deadline, resolve).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout),
    }
}

/// Wait-for-all: spawn every attempt and wait until each one has settled or
/// the deadline expires. Attempts communicate through the config cache, not
/// through return values.
pub(crate) async fn settle_all<F>(attempts: Vec<F>, deadline: Duration) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let handles: Vec<_> = attempts.into_iter().map(tokio::spawn).collect();
    let wait = async {
        for outcome in join_all(handles).await {
            if let Err(join_error) = outcome {
                tracing::warn!("config attempt task failed: {}", join_error);
            }
        }
    };
    tokio::time::timeout(deadline, wait)
        .await
        .map_err(|_| Error::Timeout)
}
