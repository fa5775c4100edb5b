//! The seam between the hold and whatever owns the buffer.
//!
//! A host hands out a raw pointer into its storage on request and takes it
//! back on release. The JVM does this through `GetPrimitiveArrayCritical`;
//! [`NativeRegion`](crate::NativeRegion) does it for Rust-owned memory.

use std::ptr::NonNull;

/// How the host should treat the buffer when a critical pointer is released.
///
/// Mirrors the `mode` argument of JNI's `Release<Type>ArrayElements` family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseMode {
    /// Copy back any temporary copy and free it (JNI mode `0`).
    CopyBack,
    /// Copy back but keep the pointer alive (JNI `JNI_COMMIT`).
    Commit,
    /// Discard any temporary copy without writing back (JNI `JNI_ABORT`).
    #[default]
    Abort,
}

impl ReleaseMode {
    /// The raw JNI mode value for this release.
    #[inline]
    #[must_use]
    pub const fn as_jni_mode(self) -> i32 {
        match self {
            ReleaseMode::CopyBack => 0,
            ReleaseMode::Commit => 1,
            ReleaseMode::Abort => 2,
        }
    }
}

/// A raw critical pointer handed out by a host.
///
/// Only meaningful between a successful [`CriticalHost::acquire_critical`]
/// and the matching [`CriticalHost::release_critical`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCritical {
    pub ptr: NonNull<u8>,
    pub len: usize,
    /// Host reported that `ptr` points at a copy rather than the real storage.
    pub is_copy: bool,
    /// Opaque value the host may set on acquire; handed back unchanged on release.
    pub tag: usize,
}

impl RawCritical {
    /// Critical view of an empty buffer.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            ptr: NonNull::dangling(),
            len: 0,
            is_copy: false,
            tag: 0,
        }
    }
}

/// Something that can pin a contiguous byte buffer in place on request.
///
/// Acquisition never blocks or retries: it either succeeds immediately or
/// returns `None`.
///
/// # Safety
///
/// A `RawCritical` returned by `acquire_critical` must have `ptr` valid for
/// `len` byte reads (dangling is allowed only when `len` is 0), and the bytes
/// must stay in place and unfreed until the matching `release_critical`.
/// [`CriticalPin::as_slice`](crate::CriticalPin::as_slice) relies on this.
///
/// Implementing it without `unsafe` is rejected:
///
/// ```compile_fail
/// use g1pinning::{CriticalHost, RawCritical, ReleaseMode};
///
/// struct Unchecked;
///
/// impl CriticalHost for Unchecked {
///     fn acquire_critical(&self) -> Option<RawCritical> {
///         Some(RawCritical { len: 1 << 40, ..RawCritical::empty() })
///     }
///
///     unsafe fn release_critical(&self, _raw: RawCritical, _mode: ReleaseMode) {}
/// }
/// ```
pub unsafe trait CriticalHost {
    /// Request a direct pointer to the buffer, or `None` if the host cannot
    /// pin it right now.
    fn acquire_critical(&self) -> Option<RawCritical>;

    /// Give the pointer back.
    ///
    /// # Safety
    ///
    /// `raw` must come from a successful `acquire_critical` on this same host
    /// and must not have been released already.
    unsafe fn release_critical(&self, raw: RawCritical, mode: ReleaseMode);
}

// SAFETY: forwards to `H`, which upholds the contract.
unsafe impl<H: CriticalHost + ?Sized> CriticalHost for &H {
    #[inline]
    fn acquire_critical(&self) -> Option<RawCritical> {
        (**self).acquire_critical()
    }

    #[inline]
    unsafe fn release_critical(&self, raw: RawCritical, mode: ReleaseMode) {
        // SAFETY: forwarded contract.
        unsafe { (**self).release_critical(raw, mode) }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// In-memory host that counts calls and can be told to refuse pins.
    #[derive(Debug, Default)]
    pub(crate) struct FakeHost {
        pub data: RefCell<Vec<u8>>,
        pub deny: bool,
        pub acquires: Cell<usize>,
        pub releases: Cell<usize>,
        pub last_mode: Cell<Option<ReleaseMode>>,
    }

    impl FakeHost {
        pub(crate) fn with_len(len: usize) -> Self {
            Self {
                data: RefCell::new(vec![7; len]),
                ..Self::default()
            }
        }

        pub(crate) fn denying() -> Self {
            Self {
                deny: true,
                ..Self::with_len(16)
            }
        }
    }

    // SAFETY: hands out `data`, which is never resized while pins are live.
    unsafe impl CriticalHost for FakeHost {
        fn acquire_critical(&self) -> Option<RawCritical> {
            self.acquires.set(self.acquires.get() + 1);
            if self.deny {
                return None;
            }
            let mut data = self.data.borrow_mut();
            if data.is_empty() {
                return Some(RawCritical::empty());
            }
            Some(RawCritical {
                ptr: NonNull::new(data.as_mut_ptr())?,
                len: data.len(),
                is_copy: false,
                tag: 0,
            })
        }

        unsafe fn release_critical(&self, _raw: RawCritical, mode: ReleaseMode) {
            self.releases.set(self.releases.get() + 1);
            self.last_mode.set(Some(mode));
        }
    }
}
