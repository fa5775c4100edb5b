use std::time::Duration;

use crate::error::HoldError;
use crate::host::ReleaseMode;

/// What to do with a negative millisecond duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegativeDuration {
    /// Treat it as zero: pin, release immediately (matches POSIX `nanosleep`
    /// refusing a negative timespec and returning at once)
    #[default]
    Clamp,
    /// Refuse the hold before acquiring anything
    Reject,
}

/// Builder for configuring a hold
///
/// Use `HoldConfig::builder()` to create.
///
/// # Example
/// ```
/// use g1pinning::{HoldConfig, NegativeDuration, ReleaseMode};
///
/// let config = HoldConfig::builder()
///     .release_mode(ReleaseMode::CopyBack)
///     .negative_duration(NegativeDuration::Reject)
///     .build();
/// assert_eq!(config.release_mode, ReleaseMode::CopyBack);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    release_mode: Option<ReleaseMode>,
    negative_duration: Option<NegativeDuration>,
}

impl Builder {
    /// Set the mode the pin is released with
    ///
    /// Default: `ReleaseMode::Abort` (the hold never writes, so any copy is
    /// discarded)
    pub fn release_mode(mut self, mode: ReleaseMode) -> Self {
        self.release_mode = Some(mode);
        self
    }

    /// Set the policy for negative durations
    ///
    /// Default: `NegativeDuration::Clamp`
    pub fn negative_duration(mut self, policy: NegativeDuration) -> Self {
        self.negative_duration = Some(policy);
        self
    }

    /// Build the `HoldConfig`, filling unset fields with defaults
    pub fn build(self) -> HoldConfig {
        HoldConfig {
            release_mode: self.release_mode.unwrap_or_default(),
            negative_duration: self.negative_duration.unwrap_or_default(),
        }
    }
}

/// Settings for [`try_hold`](crate::try_hold)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoldConfig {
    pub release_mode: ReleaseMode,
    pub negative_duration: NegativeDuration,
}

impl HoldConfig {
    /// Create a builder for a custom configuration
    #[must_use]
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Turn a signed millisecond count into a sleep duration under this config
    pub fn duration_for(&self, duration_ms: i64) -> Result<Duration, HoldError> {
        match u64::try_from(duration_ms) {
            Ok(ms) => Ok(Duration::from_millis(ms)),
            Err(_) => match self.negative_duration {
                NegativeDuration::Clamp => Ok(Duration::ZERO),
                NegativeDuration::Reject => Err(HoldError::NegativeDuration(duration_ms)),
            },
        }
    }
}
