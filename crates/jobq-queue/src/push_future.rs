use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use jobq_types::JobId;
use tokio::sync::oneshot;

/// The future returned by `Queue::push`.
///
/// Resolves exactly once, with the job's id and successful result. If the
/// job fails, this future never resolves -- failure is surfaced only
/// through the `error` event (see this crate's DESIGN.md, "never-resolves
/// push future"). The underlying channel closing (the scheduler dropping
/// the sender on a failed job) is deliberately swallowed rather than
/// surfaced as an error.
#[derive(Debug)]
pub struct PushFuture<T> {
    pub(crate) inner: oneshot::Receiver<(JobId, T)>,
}

impl<T> Future for PushFuture<T> {
    type Output = (JobId, T);

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let inner = &mut self.get_mut().inner;
        match Pin::new(inner).poll(cx) {
            Poll::Ready(Ok(resolved)) => Poll::Ready(resolved),
            Poll::Ready(Err(_)) => Poll::Pending,
            Poll::Pending => Poll::Pending,
        }
    }
}
