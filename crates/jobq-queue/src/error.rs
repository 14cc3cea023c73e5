use thiserror::Error;

/// Returned when a method needs to talk to the scheduler task but it has
/// already shut down (every `Queue` handle, including the one that spawned
/// it, has been dropped).
///
/// This should not occur in normal use: the scheduler task runs for as
/// long as at least one `Queue` handle is alive, and the methods that can
/// return this error are themselves only reachable through a handle.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("queue's scheduler task is no longer running")]
pub struct QueueClosed;
