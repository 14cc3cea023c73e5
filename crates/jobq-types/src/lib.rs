//! Shared value types for the job queue: priority, job ids, error and event
//! payloads, and the pluggable log-sink capability. No scheduling logic
//! lives here; see `jobq-ratelimit` and `jobq-queue` for that.

mod error;
mod events;
mod job_id;
mod log;
mod priority;

pub use error::PushError;
pub use events::StatsEvent;
pub use job_id::JobId;
pub use log::{LogSink, NoopLog};
pub use priority::Priority;
