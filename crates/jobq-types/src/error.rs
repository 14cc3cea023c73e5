use thiserror::Error;

/// Errors returned synchronously from `Queue::push`.
///
/// These never reach the scheduler task: validation is cheap enough to do
/// on the caller's side before a command is ever sent.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum PushError {
    /// Priority must be in `[1, 10]`; `1` highest, `10` lowest.
    #[error("priority {0} is out of range [1, 10]")]
    InvalidPriority(u8),
}
