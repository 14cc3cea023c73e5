use std::collections::VecDeque;

use jobq_types::StatsEvent;
use tokio::time::{Duration, Instant, Interval, interval_at};

use crate::rate_limit::RateLimit;

/// Trailing window over which completions count against the rate limit.
const WINDOW: Duration = Duration::from_secs(1);

/// Admission control, in-flight accounting, and periodic throughput stats
/// for a single `Queue`. Owned directly by the queue's scheduler task; see
/// that crate's DESIGN.md for why this is a plain struct rather than its
/// own actor.
///
/// All timestamps use `tokio::time::Instant` rather than `std::time::Instant`
/// so that tests can drive this deterministically with `tokio::time::pause`
/// and `tokio::time::advance`.
#[derive(Debug)]
pub struct RateLimiter {
    rate_limit: RateLimit,
    stats_interval: Duration,
    running: u32,
    recent_completions: VecDeque<Instant>,
    processed_since_start: u64,
    last_start_time: Option<Instant>,
    stats_timer: Option<Interval>,
}

impl RateLimiter {
    pub fn new(rate_limit: RateLimit, stats_interval: Duration) -> Self {
        Self {
            rate_limit,
            stats_interval,
            running: 0,
            recent_completions: VecDeque::new(),
            processed_since_start: 0,
            last_start_time: None,
            stats_timer: None,
        }
    }

    pub fn running(&self) -> u32 {
        self.running
    }

    /// Evict completions older than the trailing window. Lazy: only run
    /// when the window is actually consulted.
    fn prune(&mut self, now: Instant) {
        while let Some(&front) = self.recent_completions.front() {
            if now.saturating_duration_since(front) > WINDOW {
                self.recent_completions.pop_front();
            } else {
                break;
            }
        }
    }

    /// May a new job start right now?
    ///
    /// Serial mode: only if nothing is running. Rate-limited mode: the
    /// next second's budget is `rate_limit` minus jobs currently running
    /// plus jobs that finished within the trailing window.
    pub fn may_admit(&mut self, now: Instant) -> bool {
        self.prune(now);
        match self.rate_limit {
            RateLimit::Serial => self.running == 0,
            RateLimit::PerSecond(limit) => {
                let in_flight_and_recent = self.running as usize + self.recent_completions.len();
                in_flight_and_recent < limit.get() as usize
            }
        }
    }

    pub fn job_started(&mut self) {
        self.running += 1;
        self.processed_since_start += 1;
    }

    /// Record a job's completion.
    pub fn job_ended(&mut self, now: Instant) {
        self.running = self.running.saturating_sub(1);
        self.prune(now);
        self.recent_completions.push_back(now);
    }

    pub fn stats_armed(&self) -> bool {
        self.stats_timer.is_some()
    }

    /// Idempotent arm/disarm of the stats timer.
    ///
    /// Arming when already armed, or disarming when already disarmed, is a
    /// no-op -- in particular it does not reset `processed_since_start`.
    pub fn toggle(&mut self, enable: bool, now: Instant) {
        match (enable, self.stats_timer.is_some()) {
            (true, false) => {
                self.processed_since_start = 0;
                self.last_start_time = Some(now);
                // First tick fires one full interval out, not immediately --
                // `tokio::time::interval` ticks once eagerly otherwise.
                self.stats_timer = Some(interval_at(now + self.stats_interval, self.stats_interval));
            }
            (false, true) => {
                self.stats_timer = None;
            }
            _ => {}
        }
    }

    /// Await the next stats tick. Callers must only poll this while
    /// `stats_armed()` is true (e.g. behind a `select!` guard); panics
    /// otherwise.
    pub async fn stats_tick(&mut self) -> StatsEvent {
        let timer = self
            .stats_timer
            .as_mut()
            .expect("stats_tick polled while disarmed");
        let tick_at = timer.tick().await;
        self.stats_snapshot(tick_at)
    }

    fn stats_snapshot(&self, now: Instant) -> StatsEvent {
        let elapsed_ms = self
            .last_start_time
            .map(|start| now.saturating_duration_since(start).as_millis().max(1))
            .unwrap_or(1);
        let nb_jobs_per_second = 1000.0 * self.processed_since_start as f64 / elapsed_ms as f64;
        StatsEvent { nb_jobs_per_second }
    }
}
