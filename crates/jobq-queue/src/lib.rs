//! An in-process asynchronous job queue: priority scheduling, a sliding-
//! window rate limiter, pause/resume, and `done`/`error`/`drain`/`stats`
//! lifecycle events.
//!
//! The scheduler and rate limiter run as a single actor task per [`Queue`]
//! instance (see `src/actor.rs`); every public method is a thin handle
//! that sends a command across a channel rather than touching scheduler
//! state directly. See DESIGN.md for the grounding behind that choice and
//! for the open questions this crate resolves.

mod actor;
mod error;
mod job;
mod pending;
mod push_future;
mod queue;

pub use error::QueueClosed;
pub use job::{JobBody, PushOptions};
pub use push_future::PushFuture;
pub use queue::{Queue, QueueOptions};

pub use jobq_ratelimit::RateLimit;
pub use jobq_types::{JobId, LogSink, NoopLog, Priority, PushError, StatsEvent};
