//! # g1pinning - Hold a Java array in a critical pin
//!
//! `g1pinning` is a small JNI library that keeps a `byte[]` pinned through
//! `GetPrimitiveArrayCritical` for a caller-chosen number of milliseconds.
//! While the pin is held, a region-based collector such as G1 cannot evacuate
//! the region the array lives in, which makes the cost of critical sections
//! visible in GC logs and pause timings.
//!
//! - **One native method**: `G1RegionPinningDemo.holdArrayCritical(byte[], long)`
//! - **Scoped pins**: acquisition returns a guard, dropping it releases
//! - **Read-only**: released with `JNI_ABORT`, nothing is written back
//! - **Silent failure**: a refused pin returns at once without sleeping
//!
//! # Java Side
//!
//! ```java
//! static { System.loadLibrary("g1pinning"); }
//! private static native void holdArrayCritical(byte[] array, long millis);
//! ```
//!
//! # Rust Side
//!
//! The hold is written against [`CriticalHost`], so it runs the same way over
//! native memory:
//!
//! ```rust
//! use g1pinning::{hold, NativeRegion, Recorder};
//!
//! let data = vec![0u8; 64 * 1024];
//! let host = Recorder::new(NativeRegion::best_effort(&data));
//!
//! hold(&host, 10);
//!
//! let window = host.last_window().unwrap();
//! assert!(window.duration().unwrap().as_millis() >= 10);
//! ```
//!
//! Use [`try_hold`] to see why a hold did nothing:
//!
//! ```rust
//! use g1pinning::{try_hold, HoldConfig, HoldError, NativeRegion, NegativeDuration};
//!
//! let data = [0u8; 16];
//! let host = NativeRegion::best_effort(&data);
//! let config = HoldConfig::builder()
//!     .negative_duration(NegativeDuration::Reject)
//!     .build();
//!
//! assert_eq!(try_hold(&host, -1, &config), Err(HoldError::NegativeDuration(-1)));
//! ```
//!
//! # Negative Durations
//!
//! By default a negative `millis` pins and releases without sleeping, which
//! is what POSIX `nanosleep` does with a negative timespec. Configure
//! [`NegativeDuration::Reject`] to refuse such holds before pinning.
//!
//! # Safety
//!
//! - A [`CriticalPin`] borrows its host and is `!Send`, so the raw pointer
//!   can't outlive the call or move to another thread.
//! - Release happens in `Drop`, so it also runs when a panic unwinds through
//!   the hold.
//! - Between acquire and release the JNI host issues no JNI calls other than
//!   the release itself.

#[cfg(feature = "jni")]
mod bridge;
mod config;
mod error;
mod hold;
mod host;
mod native;
mod pin;
mod recorder;
mod tls;

#[cfg(feature = "jni")]
pub use bridge::{JniByteArray, Java_com_example_training_g1_G1RegionPinningDemo_holdArrayCritical};
pub use config::{Builder, HoldConfig, NegativeDuration};
pub use error::HoldError;
pub use hold::{HoldOutcome, hold, try_hold};
pub use host::{CriticalHost, RawCritical, ReleaseMode};
pub use native::NativeRegion;
pub use pin::CriticalPin;
pub use recorder::{PinWindow, Recorder};
pub use tls::{critical_depth, in_critical_region};
