use std::sync::Arc;

use jobq_ratelimit::RateLimiter;
use jobq_types::{JobId, LogSink, Priority, StatsEvent};
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

use crate::job::JobEntry;
use crate::pending::PendingQueue;

type DoneHandler<T> = Box<dyn FnMut(JobId, &T) + Send>;
type ErrorHandler<E> = Box<dyn FnMut(JobId, &E) + Send>;
type DrainHandler = Box<dyn FnMut() + Send>;
type StatsHandler = Box<dyn FnMut(StatsEvent) + Send>;

/// Messages the `Queue` handle sends to its scheduler task. Everything
/// that mutates scheduler state arrives here; the actor is the only thing
/// that ever touches `pending`, `started`, or the rate limiter.
pub(crate) enum Command<T, E> {
    Push {
        priority: Priority,
        entry: JobEntry<T, E>,
    },
    Start {
        reply: oneshot::Sender<()>,
    },
    Pause {
        reply: oneshot::Sender<()>,
    },
    OnDone(DoneHandler<T>),
    OnError(ErrorHandler<E>),
    OnDrain(DrainHandler),
    OnStats(StatsHandler),
}

/// A job body's outcome, reported back to the actor by its spawned task.
pub(crate) struct Completion<T, E> {
    id: JobId,
    completion: oneshot::Sender<(JobId, T)>,
    outcome: Result<T, E>,
}

/// Owns every piece of scheduler state: the pending index, the dispatch
/// flag, and the rate limiter. Reached only through `cmd_rx` and
/// `completion_rx`, so every invariant that depends on serialized mutation
/// holds by construction.
pub(crate) struct Actor<T, E> {
    cmd_rx: mpsc::UnboundedReceiver<Command<T, E>>,
    completion_tx: mpsc::UnboundedSender<Completion<T, E>>,
    completion_rx: mpsc::UnboundedReceiver<Completion<T, E>>,
    pending: PendingQueue<T, E>,
    started: bool,
    /// True once `drain` has fired for the current quiescence episode, so a
    /// later no-op tick (e.g. a second `start()` on an already-idle queue)
    /// does not emit a duplicate `drain`. Cleared on the next `push`.
    drained: bool,
    rate_limiter: RateLimiter,
    log: Arc<dyn LogSink>,
    done_handlers: Vec<DoneHandler<T>>,
    error_handlers: Vec<ErrorHandler<E>>,
    drain_handlers: Vec<DrainHandler>,
    stats_handlers: Vec<StatsHandler>,
    pending_pause_replies: Vec<oneshot::Sender<()>>,
}

impl<T, E> Actor<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    pub(crate) fn new(
        cmd_rx: mpsc::UnboundedReceiver<Command<T, E>>,
        rate_limiter: RateLimiter,
        log: Arc<dyn LogSink>,
    ) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            cmd_rx,
            completion_tx,
            completion_rx,
            pending: PendingQueue::new(),
            started: false,
            drained: true,
            rate_limiter,
            log,
            done_handlers: Vec::new(),
            error_handlers: Vec::new(),
            drain_handlers: Vec::new(),
            stats_handlers: Vec::new(),
            pending_pause_replies: Vec::new(),
        }
    }

    /// The scheduler task's main loop: commands, job completions, and
    /// stats ticks all flow through this single `select!`.
    pub(crate) async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd),
                        None => {
                            self.log.debug("all queue handles dropped, stopping scheduler task");
                            break;
                        }
                    }
                }
                Some(completion) = self.completion_rx.recv() => {
                    self.handle_completion(completion);
                }
                stats = self.rate_limiter.stats_tick(), if self.rate_limiter.stats_armed() => {
                    self.emit_stats(stats);
                    // The stats tick doubles as the fourth dispatch trigger:
                    // it is the only thing that re-evaluates admission for
                    // a job stuck behind a sliding-window rate limit with
                    // no completion or push to wake it otherwise.
                    self.maybe_dispatch();
                }
            }
        }
    }

    fn handle_command(&mut self, cmd: Command<T, E>) {
        match cmd {
            Command::Push { priority, entry } => self.handle_push(priority, entry),
            Command::Start { reply } => self.handle_start(reply),
            Command::Pause { reply } => self.handle_pause(reply),
            Command::OnDone(handler) => self.done_handlers.push(handler),
            Command::OnError(handler) => self.error_handlers.push(handler),
            Command::OnDrain(handler) => self.drain_handlers.push(handler),
            Command::OnStats(handler) => self.stats_handlers.push(handler),
        }
    }

    fn handle_push(&mut self, priority: Priority, entry: JobEntry<T, E>) {
        self.log.trace(&format!("push id={} priority={priority}", entry.id));
        self.pending.insert(priority, entry);
        self.drained = false;
        if self.started {
            self.rate_limiter.toggle(true, Instant::now());
            self.maybe_dispatch();
        }
    }

    fn handle_start(&mut self, reply: oneshot::Sender<()>) {
        if !self.started {
            self.started = true;
            // Each start-to-quiescence span is its own drain episode, even
            // if the previous episode already drained.
            self.drained = false;
            self.rate_limiter.toggle(true, Instant::now());
            self.maybe_dispatch();
        }
        let _ = reply.send(());
    }

    fn handle_pause(&mut self, reply: oneshot::Sender<()>) {
        self.started = false;
        if self.rate_limiter.running() == 0 {
            self.rate_limiter.toggle(false, Instant::now());
            let _ = reply.send(());
        } else {
            self.pending_pause_replies.push(reply);
        }
    }

    fn handle_completion(&mut self, completion: Completion<T, E>) {
        self.rate_limiter.job_ended(Instant::now());
        match completion.outcome {
            Ok(value) => {
                self.emit_done(completion.id, &value);
                let _ = completion.completion.send((completion.id, value));
            }
            Err(error) => {
                self.emit_error(completion.id, &error);
                // Sender is dropped here without ever being resolved: the
                // push future this belongs to stays pending forever.
            }
        }
        if self.rate_limiter.running() == 0 {
            for reply in self.pending_pause_replies.drain(..) {
                let _ = reply.send(());
            }
            if !self.started {
                self.rate_limiter.toggle(false, Instant::now());
            }
        }
        self.maybe_dispatch();
    }

    /// The dispatch selection algorithm: run until nothing more can start
    /// right now.
    fn maybe_dispatch(&mut self) {
        loop {
            if !self.started {
                return;
            }
            if self.pending.is_empty() && self.rate_limiter.running() == 0 {
                if !self.drained {
                    self.emit_drain();
                    self.rate_limiter.toggle(false, Instant::now());
                    self.drained = true;
                }
                return;
            }
            if self.pending.is_empty() {
                // Nothing left to select even though jobs are still
                // in-flight; wait for a completion or stats tick.
                return;
            }
            if !self.rate_limiter.may_admit(Instant::now()) {
                return;
            }
            let Some(entry) = self.pending.pop() else {
                debug_assert!(false, "pending reported non-empty but pop() returned None");
                return;
            };
            self.rate_limiter.job_started();
            self.spawn_job(entry);
        }
    }

    fn spawn_job(&mut self, entry: JobEntry<T, E>) {
        let JobEntry {
            id,
            body,
            completion,
        } = entry;
        self.log.trace(&format!("dispatch id={id}"));
        let completion_tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let outcome = body.await;
            let _ = completion_tx.send(Completion {
                id,
                completion,
                outcome,
            });
        });
    }

    fn emit_done(&mut self, id: JobId, value: &T) {
        self.log.trace(&format!("done id={id}"));
        for handler in &mut self.done_handlers {
            handler(id, value);
        }
    }

    fn emit_error(&mut self, id: JobId, error: &E) {
        self.log.trace(&format!("error id={id}"));
        for handler in &mut self.error_handlers {
            handler(id, error);
        }
    }

    fn emit_drain(&mut self) {
        self.log.debug("drain");
        for handler in &mut self.drain_handlers {
            handler();
        }
    }

    fn emit_stats(&mut self, stats: StatsEvent) {
        self.log
            .trace(&format!("stats nb_jobs_per_second={}", stats.nb_jobs_per_second));
        for handler in &mut self.stats_handlers {
            handler(stats);
        }
    }
}
