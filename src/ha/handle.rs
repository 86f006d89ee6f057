//! Typed request handles
//!
//! Every submit operation returns its own handle type, so awaiting a sign
//! handle for an extend result is a type error instead of a runtime check.
//! A handle can be awaited (it is a `Future`), polled without blocking via
//! [`RequestHandle::try_result`], or given a completion continuation via
//! [`RequestHandle::on_complete`]. None of these forms block the replica
//! attempts themselves.

use crate::common::{
    AggregatorConfig, CalendarHashChain, Error, ExtenderConfig, PublicationsFile, Result, Signature,
};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

/// Handle to one in-flight coordinator operation.
pub struct RequestHandle<T> {
    rx: oneshot::Receiver<Result<T>>,
}

pub type SignHandle = RequestHandle<Signature>;
pub type ExtendHandle = RequestHandle<CalendarHashChain>;
pub type PublicationsHandle = RequestHandle<PublicationsFile>;
pub type AggregatorConfigHandle = RequestHandle<AggregatorConfig>;
pub type ExtenderConfigHandle = RequestHandle<ExtenderConfig>;

impl<T> RequestHandle<T> {
    pub(crate) fn new(rx: oneshot::Receiver<Result<T>>) -> Self {
        Self { rx }
    }

    /// A handle that is already resolved, for precondition failures that
    /// never reach dispatch.
    pub(crate) fn immediate(result: Result<T>) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(result);
        Self { rx }
    }

    /// Non-blocking poll. Returns `None` while the operation is still in
    /// flight; the result can be taken at most once.
    pub fn try_result(&mut self) -> Option<Result<T>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(dropped_driver())),
        }
    }
}

impl<T: Send + 'static> RequestHandle<T> {
    /// Run `callback` with the result once the operation resolves, on a
    /// spawned task.
    pub fn on_complete(self, callback: impl FnOnce(Result<T>) + Send + 'static) {
        tokio::spawn(async move {
            callback(self.await);
        });
    }
}

impl<T> Future for RequestHandle<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|received| match received {
            Ok(result) => result,
            Err(_) => Err(dropped_driver()),
        })
    }
}

fn dropped_driver() -> Error {
    Error::Internal("request driver dropped before resolving".into())
}
