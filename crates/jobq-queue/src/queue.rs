use std::fmt;
use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use jobq_ratelimit::{RateLimit, RateLimiter};
use jobq_types::{JobId, LogSink, NoopLog, Priority, PushError, StatsEvent};
use tokio::sync::{mpsc, oneshot};

use crate::actor::{Actor, Command};
use crate::error::QueueClosed;
use crate::job::{JobEntry, PushOptions};
use crate::push_future::PushFuture;

/// Construction-time knobs for a [`Queue`].
///
/// `rate_limit` defaults to serial mode (at most one job in flight);
/// `stats_interval` defaults to `500ms`; `log` defaults to a no-op sink.
/// Builder-style, mirroring this workspace's other construction-time
/// option types.
pub struct QueueOptions {
    rate_limit: RateLimit,
    stats_interval: Duration,
    log: Arc<dyn LogSink>,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            rate_limit: RateLimit::Serial,
            stats_interval: Duration::from_millis(500),
            log: Arc::new(NoopLog),
        }
    }
}

impl QueueOptions {
    /// Cap throughput at `n` jobs per rolling second instead of serial mode.
    pub fn rate_limit(mut self, n: NonZeroU32) -> Self {
        self.rate_limit = RateLimit::PerSecond(n);
        self
    }

    /// Cadence at which `stats` is emitted while the queue is running.
    pub fn stats_interval(mut self, interval: Duration) -> Self {
        self.stats_interval = interval;
        self
    }

    /// Supply a lifecycle trace sink, independent of `tracing`.
    pub fn log(mut self, log: impl LogSink + 'static) -> Self {
        self.log = Arc::new(log);
        self
    }
}

/// A handle to an in-process asynchronous job queue.
///
/// Cloning a `Queue` is cheap and shares the same underlying scheduler
/// task: all clones talk to the same actor, so pushing from one clone and
/// calling `start` from another behaves exactly as if both calls came from
/// the same handle. The scheduler task runs for as long as at least one
/// clone is alive.
///
/// `T` is the success type and `E` the error type shared by every job
/// pushed to this queue; see this crate's DESIGN.md for why the type pair
/// is fixed per instance rather than dynamically typed.
pub struct Queue<T, E> {
    cmd_tx: mpsc::UnboundedSender<Command<T, E>>,
}

impl<T, E> Clone for Queue<T, E> {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
        }
    }
}

impl<T, E> fmt::Debug for Queue<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue")
            .field("cmd_tx", &"mpsc::UnboundedSender")
            .finish()
    }
}

impl<T, E> Queue<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Construct a queue and spawn its scheduler task. The queue is not
    /// dispatching yet; call [`Queue::start`] to begin.
    pub fn new(options: QueueOptions) -> Self {
        let QueueOptions {
            rate_limit,
            stats_interval,
            log,
        } = options;
        let rate_limiter = RateLimiter::new(rate_limit, stats_interval);
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let actor = Actor::new(cmd_rx, rate_limiter, log);
        tokio::spawn(actor.run());
        Self { cmd_tx }
    }

    /// Push a job. Returns synchronously; the returned future resolves
    /// with `(id, result)` on success and never resolves if the job fails
    /// (see `error` events for failures).
    ///
    /// Rejects out-of-range priorities before anything reaches the
    /// scheduler task.
    pub fn push<F>(&self, body: F, options: PushOptions) -> Result<PushFuture<T>, PushError>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        let priority = Priority::new(options.raw_priority())?;
        let id = JobId::next();
        let (completion, rx) = oneshot::channel();
        let entry = JobEntry {
            id,
            body: Box::pin(body),
            completion,
        };
        let _ = self.cmd_tx.send(Command::Push { priority, entry });
        Ok(PushFuture { inner: rx })
    }

    /// Begin (or resume) dispatching. Idempotent: calling `start` while
    /// already started resolves immediately without side effects.
    #[tracing::instrument(skip(self))]
    pub async fn start(&self) -> Result<(), QueueClosed> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Start { reply })
            .map_err(|_| QueueClosed)?;
        rx.await.map_err(|_| QueueClosed)
    }

    /// Stop dispatching new jobs and wait for every currently in-flight job
    /// to finish. Already-pending jobs are retained and will run on the
    /// next `start`. Idempotent.
    #[tracing::instrument(skip(self))]
    pub async fn pause(&self) -> Result<(), QueueClosed> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Pause { reply })
            .map_err(|_| QueueClosed)?;
        rx.await.map_err(|_| QueueClosed)
    }

    /// Subscribe to `done` events: a job succeeded with `value`.
    ///
    /// Runs synchronously inside the scheduler task as part of event
    /// emission -- a slow or blocking handler delays dispatch.
    pub fn on_done(&self, handler: impl FnMut(JobId, &T) + Send + 'static) {
        let _ = self.cmd_tx.send(Command::OnDone(Box::new(handler)));
    }

    /// Subscribe to `error` events: a job failed with `error`.
    pub fn on_error(&self, handler: impl FnMut(JobId, &E) + Send + 'static) {
        let _ = self.cmd_tx.send(Command::OnError(Box::new(handler)));
    }

    /// Subscribe to `drain`: no pending jobs remain and none are in flight.
    pub fn on_drain(&self, handler: impl FnMut() + Send + 'static) {
        let _ = self.cmd_tx.send(Command::OnDrain(Box::new(handler)));
    }

    /// Subscribe to periodic `stats` events.
    pub fn on_stats(&self, handler: impl FnMut(StatsEvent) + Send + 'static) {
        let _ = self.cmd_tx.send(Command::OnStats(Box::new(handler)));
    }
}
