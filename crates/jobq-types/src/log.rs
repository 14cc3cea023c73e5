/// Caller-supplied lifecycle trace sink, independent of the `tracing`
/// instrumentation the crate emits on its own behalf.
///
/// This mirrors the constructor-level `log` capability from the spec this
/// queue is built against: a minimal `trace`/`debug` pair a caller can wire
/// up without standing up a `tracing` subscriber. Defaults to [`NoopLog`].
pub trait LogSink: Send + Sync {
    fn trace(&self, message: &str) {
        let _ = message;
    }

    fn debug(&self, message: &str) {
        let _ = message;
    }
}

/// Default log sink: discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLog;

impl LogSink for NoopLog {}
