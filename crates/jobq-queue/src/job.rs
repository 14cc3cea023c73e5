use std::future::Future;
use std::pin::Pin;

use jobq_types::{JobId, Priority};
use tokio::sync::oneshot;

/// A job body: a zero-argument deferred computation producing either a
/// value or an error. Boxed because each pushed job can be a distinct
/// concrete future type.
pub type JobBody<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send>>;

/// A pending job, owned by the queue until dispatched.
pub(crate) struct JobEntry<T, E> {
    pub(crate) id: JobId,
    pub(crate) body: JobBody<T, E>,
    pub(crate) completion: oneshot::Sender<(JobId, T)>,
}

/// Per-push options. `priority` defaults to `10` (lowest), matching the
/// spec's default.
#[derive(Clone, Copy, Debug)]
pub struct PushOptions {
    priority: u8,
}

impl Default for PushOptions {
    fn default() -> Self {
        Self {
            priority: Priority::LOWEST.get(),
        }
    }
}

impl PushOptions {
    pub fn priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub(crate) fn raw_priority(self) -> u8 {
        self.priority
    }
}
