//! RAII guard for a critical pin with automatic release on drop

use std::fmt;
use std::marker::PhantomData;

use crate::host::{CriticalHost, RawCritical, ReleaseMode};
use crate::tls;

/// RAII guard over a critical pointer that releases it when dropped.
///
/// While the guard is alive the host keeps the buffer in place. The guard
/// borrows the host, so the pointer can't outlive the call that acquired it,
/// and it is `!Send`, so it never leaves the acquiring thread.
///
/// # Examples
///
/// ```
/// use g1pinning::{CriticalPin, NativeRegion, ReleaseMode};
///
/// let data = vec![0u8; 4096];
/// let host = NativeRegion::best_effort(&data);
/// {
///     let pin = CriticalPin::acquire(&host, ReleaseMode::Abort).unwrap();
///     assert_eq!(pin.len(), 4096);
///     // Released here
/// }
/// ```
///
/// # Explicit Early Release
///
/// ```
/// use g1pinning::{CriticalPin, NativeRegion, ReleaseMode};
///
/// let data = [1u8, 2, 3];
/// let host = NativeRegion::best_effort(&data);
/// let pin = CriticalPin::acquire(&host, ReleaseMode::Abort).unwrap();
/// drop(pin); // Release now
/// ```
pub struct CriticalPin<'h, H: CriticalHost + ?Sized> {
    host: &'h H,
    raw: RawCritical,
    mode: ReleaseMode,
    _not_send: PhantomData<*mut u8>,
}

impl<'h, H: CriticalHost + ?Sized> CriticalPin<'h, H> {
    /// Ask `host` for a critical pointer.
    ///
    /// Returns `None` without touching the host again if the request is
    /// refused. `mode` is what the guard will pass back on release.
    pub fn acquire(host: &'h H, mode: ReleaseMode) -> Option<Self> {
        let raw = host.acquire_critical()?;
        tls::enter_critical();
        log::trace!("critical pin acquired: {} bytes (copy: {})", raw.len, raw.is_copy);
        Some(Self {
            host,
            raw,
            mode,
            _not_send: PhantomData,
        })
    }

    /// Returns the length of the pinned region in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len
    }

    /// Returns `true` if the pinned region has a length of 0.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.len == 0
    }

    /// Returns `true` if the host handed out a copy instead of the storage itself.
    #[inline]
    pub fn is_copy(&self) -> bool {
        self.raw.is_copy
    }

    /// The mode the pin will be released with.
    #[inline]
    pub fn release_mode(&self) -> ReleaseMode {
        self.mode
    }

    /// Raw pointer to the first pinned byte. Dangling when empty.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.raw.ptr.as_ptr()
    }

    /// Read-only view of the pinned bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: `CriticalHost` is an unsafe trait whose implementors promise
        // `len` readable bytes at `ptr` until release; release only happens
        // in `drop`.
        unsafe { std::slice::from_raw_parts(self.raw.ptr.as_ptr(), self.raw.len) }
    }
}

impl<H: CriticalHost + ?Sized> Drop for CriticalPin<'_, H> {
    fn drop(&mut self) {
        // SAFETY: `raw` came from `acquire_critical` on this host and drop
        // runs exactly once.
        unsafe { self.host.release_critical(self.raw, self.mode) };
        tls::exit_critical();
        log::trace!("critical pin released: {} bytes ({:?})", self.raw.len, self.mode);
    }
}

impl<H: CriticalHost + ?Sized> fmt::Debug for CriticalPin<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CriticalPin")
            .field("len", &self.len())
            .field("is_copy", &self.is_copy())
            .field("mode", &self.mode)
            .finish()
    }
}

impl<H: CriticalHost + ?Sized> AsRef<[u8]> for CriticalPin<'_, H> {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}
