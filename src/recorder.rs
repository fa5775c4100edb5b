//! Pin-window recording for timing harnesses.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::host::{CriticalHost, RawCritical, ReleaseMode};

/// One acquire/release interval observed by a [`Recorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinWindow {
    pub len: usize,
    pub acquired_at: Instant,
    /// `None` while the pin is still held.
    pub released_at: Option<Instant>,
    pub mode: Option<ReleaseMode>,
}

impl PinWindow {
    /// How long the region stayed pinned, if it has been released.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.released_at.map(|at| at.duration_since(self.acquired_at))
    }
}

/// Wraps a host and records every pin window it hands out.
///
/// Refused acquisitions are counted but produce no window. Closed windows
/// accumulate until [`drain_windows`](Recorder::drain_windows) is called.
#[derive(Debug)]
pub struct Recorder<H> {
    inner: H,
    windows: Mutex<Vec<Entry>>,
    next_id: AtomicUsize,
    active: AtomicUsize,
    refused: AtomicUsize,
}

/// A window plus what's needed to route its release back to it.
#[derive(Debug)]
struct Entry {
    id: usize,
    /// Tag the wrapped host put on the pin, restored before forwarding release
    inner_tag: usize,
    window: PinWindow,
}

impl<H: CriticalHost> Recorder<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            windows: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
            refused: AtomicUsize::new(0),
        }
    }

    #[inline]
    pub fn inner(&self) -> &H {
        &self.inner
    }

    /// Pins currently held through this recorder.
    #[inline]
    pub fn active(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Acquisitions the wrapped host refused.
    #[inline]
    pub fn refused(&self) -> usize {
        self.refused.load(Ordering::Relaxed)
    }

    /// Snapshot of all recorded windows, oldest first.
    pub fn windows(&self) -> Vec<PinWindow> {
        self.windows.lock().iter().map(|e| e.window).collect()
    }

    /// The most recently opened window.
    pub fn last_window(&self) -> Option<PinWindow> {
        self.windows.lock().last().map(|e| e.window)
    }

    /// Remove and return every closed window, oldest first.
    ///
    /// Windows still held stay recorded so their release can close them.
    pub fn drain_windows(&self) -> Vec<PinWindow> {
        let mut windows = self.windows.lock();
        let mut closed = Vec::new();
        windows.retain(|e| {
            if e.window.released_at.is_some() {
                closed.push(e.window);
                false
            } else {
                true
            }
        });
        closed
    }

    pub fn into_inner(self) -> H {
        self.inner
    }
}

// SAFETY: returns the inner host's pointer and length unchanged; only the
// tag is swapped, and it is restored before the inner release.
unsafe impl<H: CriticalHost> CriticalHost for Recorder<H> {
    fn acquire_critical(&self) -> Option<RawCritical> {
        let Some(raw) = self.inner.acquire_critical() else {
            self.refused.fetch_add(1, Ordering::Relaxed);
            return None;
        };
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.windows.lock().push(Entry {
            id,
            inner_tag: raw.tag,
            window: PinWindow {
                len: raw.len,
                acquired_at: Instant::now(),
                released_at: None,
                mode: None,
            },
        });
        self.active.fetch_add(1, Ordering::AcqRel);
        Some(RawCritical { tag: id, ..raw })
    }

    unsafe fn release_critical(&self, raw: RawCritical, mode: ReleaseMode) {
        let now = Instant::now();
        let inner_tag = {
            let mut windows = self.windows.lock();
            match windows.iter_mut().find(|e| e.id == raw.tag) {
                Some(entry) => {
                    entry.window.released_at = Some(now);
                    entry.window.mode = Some(mode);
                    entry.inner_tag
                }
                None => 0,
            }
        };
        // SAFETY: forwarded contract, with the inner host's own tag.
        unsafe { self.inner.release_critical(RawCritical { tag: inner_tag, ..raw }, mode) };
        self.active.fetch_sub(1, Ordering::AcqRel);
    }
}
