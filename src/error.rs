use thiserror::Error;

/// Errors surfaced by [`try_hold`](crate::try_hold).
///
/// The JNI entry point swallows every variant, so from the JVM side a failed
/// hold is indistinguishable from a zero-length one.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldError {
    /// The host refused to hand out a critical pointer (null result).
    #[error("critical pointer acquisition failed")]
    Unavailable,
    /// A negative duration was passed while [`NegativeDuration::Reject`](crate::NegativeDuration::Reject) is configured.
    #[error("negative hold duration: {0} ms")]
    NegativeDuration(i64),
}
