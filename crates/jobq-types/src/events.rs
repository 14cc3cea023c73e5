/// Payload of a `stats` event: the cumulative throughput average since the
/// stats interval was last armed.
///
/// This is a cumulative average, not a rolling window: a burst of jobs
/// completing early in a run can report a value well above the configured
/// rate limit. See the `jobq-ratelimit` crate for the exact formula.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatsEvent {
    pub nb_jobs_per_second: f64,
}
