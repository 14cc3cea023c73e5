//! Admission control and throughput accounting for `jobq-queue`.
//!
//! [`RateLimiter`] decides whether another job may start, tracks in-flight
//! count and the trailing-second completion window, and drives the
//! periodic `stats` cadence. It holds no knowledge of jobs, priorities, or
//! events -- those live in `jobq-queue`, which owns a `RateLimiter` value
//! directly.

mod limiter;
mod rate_limit;

pub use limiter::RateLimiter;
pub use rate_limit::RateLimit;
