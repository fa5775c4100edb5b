//! The hold itself: pin, sleep, release.

use std::thread;
use std::time::{Duration, Instant};

use crate::config::HoldConfig;
use crate::error::HoldError;
use crate::host::CriticalHost;
use crate::pin::CriticalPin;

/// What a completed hold observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldOutcome {
    /// Length of the pinned region in bytes.
    pub len: usize,
    /// The host pinned a copy rather than the storage itself.
    pub is_copy: bool,
    /// Sleep that was requested after applying the negative-duration policy.
    pub requested: Duration,
    /// Wall time between acquisition and release.
    pub pinned_for: Duration,
}

/// Pin the host's buffer, block the calling thread for `duration_ms`, release.
///
/// Negative durations are validated before anything is acquired. If the host
/// refuses the pin, no sleep happens and no release is issued.
///
/// # Examples
///
/// ```
/// use g1pinning::{try_hold, HoldConfig, NativeRegion};
///
/// let data = vec![0u8; 1024];
/// let host = NativeRegion::best_effort(&data);
/// let outcome = try_hold(&host, 5, &HoldConfig::default()).unwrap();
/// assert_eq!(outcome.len, 1024);
/// assert!(outcome.pinned_for.as_millis() >= 5);
/// ```
pub fn try_hold<H>(host: &H, duration_ms: i64, config: &HoldConfig) -> Result<HoldOutcome, HoldError>
where
    H: CriticalHost + ?Sized,
{
    let requested = config.duration_for(duration_ms)?;

    let pin = CriticalPin::acquire(host, config.release_mode).ok_or_else(|| {
        log::debug!("critical pin unavailable, skipping {duration_ms} ms hold");
        HoldError::Unavailable
    })?;

    let started = Instant::now();
    if !requested.is_zero() {
        thread::sleep(requested);
    }
    let (len, is_copy) = (pin.len(), pin.is_copy());
    drop(pin);

    Ok(HoldOutcome {
        len,
        is_copy,
        requested,
        pinned_for: started.elapsed(),
    })
}

/// [`try_hold`] with the default configuration and every failure swallowed.
///
/// From the caller's side a refused pin looks like a zero-length hold.
pub fn hold<H>(host: &H, duration_ms: i64)
where
    H: CriticalHost + ?Sized,
{
    let _ = try_hold(host, duration_ms, &HoldConfig::default());
}
