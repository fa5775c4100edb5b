use std::sync::Barrier;
use std::thread;
use std::time::{Duration, Instant};

use g1pinning::{
    CriticalHost, HoldConfig, HoldError, NativeRegion, RawCritical, Recorder, ReleaseMode, hold, in_critical_region,
    try_hold,
};

/// Host that never hands out a pin.
struct Refusing;

// SAFETY: never hands out a pointer.
unsafe impl CriticalHost for Refusing {
    fn acquire_critical(&self) -> Option<RawCritical> {
        None
    }

    unsafe fn release_critical(&self, _raw: RawCritical, _mode: ReleaseMode) {
        panic!("release without a pin");
    }
}

#[test]
fn test_native_hold_blocks_at_least_requested() {
    let data = vec![0u8; 8 * 1024];
    let host = Recorder::new(NativeRegion::best_effort(&data));

    let start = Instant::now();
    hold(&host, 60);
    let elapsed = start.elapsed();

    assert!(elapsed >= Duration::from_millis(60));
    let window = host.last_window().unwrap();
    assert_eq!(window.len, data.len());
    assert_eq!(window.mode, Some(ReleaseMode::Abort));
    assert!(window.duration().unwrap() >= Duration::from_millis(60));
    assert_eq!(host.active(), 0);
    assert_eq!(host.inner().outstanding(), 0);
}

#[test]
fn test_empty_buffer_behaves_like_non_empty() {
    let empty: Vec<u8> = Vec::new();
    let full = vec![1u8; 4096];
    let empty_host = NativeRegion::new(&empty);
    let full_host = NativeRegion::best_effort(&full);

    let empty_outcome = try_hold(&empty_host, 20, &HoldConfig::default()).unwrap();
    let full_outcome = try_hold(&full_host, 20, &HoldConfig::default()).unwrap();

    assert_eq!(empty_outcome.len, 0);
    assert_eq!(full_outcome.len, 4096);
    assert!(empty_outcome.pinned_for >= Duration::from_millis(20));
    assert!(full_outcome.pinned_for >= Duration::from_millis(20));
}

#[test]
fn test_refused_pin_returns_promptly() {
    let host = Recorder::new(Refusing);
    let start = Instant::now();
    hold(&host, 10_000);
    assert!(start.elapsed() < Duration::from_millis(1_000));
    assert_eq!(host.refused(), 1);
    assert!(host.windows().is_empty());
    assert_eq!(try_hold(&host, 10_000, &HoldConfig::default()), Err(HoldError::Unavailable));
    assert!(!in_critical_region());
}

#[test]
fn test_repeated_holds_time_the_same() {
    let data = vec![0u8; 4096];
    let host = Recorder::new(NativeRegion::best_effort(&data));
    for _ in 0..3 {
        hold(&host, 25);
    }
    let windows = host.windows();
    assert_eq!(windows.len(), 3);
    for window in windows {
        let pinned = window.duration().unwrap();
        assert!(pinned >= Duration::from_millis(25));
        assert!(pinned < Duration::from_millis(1_000));
    }
}

#[test]
fn test_concurrent_holds_on_distinct_buffers_overlap() {
    const HOLD_MS: i64 = 300;
    let barrier = Barrier::new(2);

    let start = Instant::now();
    thread::scope(|s| {
        for _ in 0..2 {
            s.spawn(|| {
                let data = vec![0u8; 4096];
                let host = NativeRegion::best_effort(&data);
                barrier.wait();
                let outcome = try_hold(&host, HOLD_MS, &HoldConfig::default()).unwrap();
                assert!(outcome.pinned_for >= Duration::from_millis(HOLD_MS as u64));
            });
        }
    });
    let elapsed = start.elapsed();

    assert!(elapsed >= Duration::from_millis(HOLD_MS as u64));
    // Serialized holds would take at least twice as long
    assert!(elapsed < Duration::from_millis(2 * HOLD_MS as u64 - 50));
}
