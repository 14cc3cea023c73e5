use std::num::NonZeroU32;

/// Admission budget for the rate limiter.
///
/// `Serial` is the sentinel for "at most one job in flight"; `PerSecond`
/// bounds steady-state throughput to at most `N` jobs per rolling second
/// while still permitting bursts of up to `N` concurrent jobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateLimit {
    Serial,
    PerSecond(NonZeroU32),
}

impl RateLimit {
    /// Convenience constructor for a numeric limit; panics on `0`.
    ///
    /// Callers validating untrusted input should go through
    /// `NonZeroU32::new` and `RateLimit::PerSecond` directly instead.
    pub fn per_second(n: u32) -> Self {
        Self::PerSecond(NonZeroU32::new(n).expect("rate limit must be positive"))
    }
}
