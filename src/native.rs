//! Critical pins over Rust-owned memory.
//!
//! Rust never relocates a borrowed slice, so "pinning" here means locking the
//! pages in physical RAM for the duration of the hold.

use std::cell::Cell;
use std::ptr::NonNull;

use crate::host::{CriticalHost, RawCritical, ReleaseMode};

/// A borrowed byte slice acting as a critical host.
///
/// Page locking may fail due to:
/// - Insufficient permissions (needs CAP_IPC_LOCK on Linux)
/// - Resource limits (RLIMIT_MEMLOCK)
/// - Platform limitations
///
/// A strict region refuses the pin when locking fails; a best-effort region
/// hands out the pointer anyway. Empty slices always pin.
///
/// Page locks don't nest across regions: if two regions share a page, the
/// last release of either one unlocks that page for both, while the other
/// region's `is_locked()` still reports `true`.
#[derive(Debug)]
pub struct NativeRegion<'a> {
    bytes: &'a [u8],
    strict: bool,
    /// Outstanding pins; pages are locked on the first and unlocked on the last
    pins: Cell<usize>,
    locked: Cell<bool>,
}

impl<'a> NativeRegion<'a> {
    /// Region that refuses to pin unless its pages can be locked.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::with_strictness(bytes, true)
    }

    /// Region that pins even when page locking is not permitted.
    pub fn best_effort(bytes: &'a [u8]) -> Self {
        Self::with_strictness(bytes, false)
    }

    fn with_strictness(bytes: &'a [u8], strict: bool) -> Self {
        Self {
            bytes,
            strict,
            pins: Cell::new(0),
            locked: Cell::new(false),
        }
    }

    /// Returns `true` while the region's pages are locked in RAM.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }

    /// Number of pins currently handed out.
    #[inline]
    pub fn outstanding(&self) -> usize {
        self.pins.get()
    }

    fn lock_pages(&self) -> bool {
        match region::lock(self.bytes.as_ptr(), self.bytes.len()) {
            Ok(guard) => {
                // Unlocked explicitly on the last release.
                std::mem::forget(guard);
                true
            }
            Err(err) => {
                if self.strict {
                    log::warn!("page lock failed for {} bytes: {err}", self.bytes.len());
                } else {
                    log::debug!("page lock failed for {} bytes, pinning anyway: {err}", self.bytes.len());
                }
                false
            }
        }
    }
}

// SAFETY: the pointer comes from the borrowed slice, which outlives `self`.
unsafe impl CriticalHost for NativeRegion<'_> {
    fn acquire_critical(&self) -> Option<RawCritical> {
        if self.bytes.is_empty() {
            self.pins.set(self.pins.get() + 1);
            return Some(RawCritical::empty());
        }

        if self.pins.get() == 0 {
            let locked = self.lock_pages();
            if !locked && self.strict {
                return None;
            }
            self.locked.set(locked);
        }

        self.pins.set(self.pins.get() + 1);
        Some(RawCritical {
            ptr: NonNull::from(self.bytes).cast::<u8>(),
            len: self.bytes.len(),
            is_copy: false,
            tag: 0,
        })
    }

    unsafe fn release_critical(&self, _raw: RawCritical, _mode: ReleaseMode) {
        // Nothing was copied, so every mode behaves the same.
        let remaining = self.pins.get().saturating_sub(1);
        self.pins.set(remaining);
        if remaining == 0 && self.locked.replace(false) {
            if let Err(err) = region::unlock(self.bytes.as_ptr(), self.bytes.len()) {
                log::debug!("page unlock failed for {} bytes: {err}", self.bytes.len());
            }
        }
    }
}
