use std::cell::Cell;

thread_local! {
    /// Number of critical pins the current thread is holding.
    /// Using Cell since the counter never leaves its thread
    static CRITICAL_DEPTH: Cell<usize> = const { Cell::new(0) };
}

#[inline]
pub(crate) fn enter_critical() {
    CRITICAL_DEPTH.with(|depth| depth.set(depth.get() + 1));
}

#[inline]
pub(crate) fn exit_critical() {
    CRITICAL_DEPTH.with(|depth| {
        debug_assert!(depth.get() > 0, "critical depth underflow");
        depth.set(depth.get().saturating_sub(1));
    });
}

/// Number of critical pins held by the calling thread.
#[inline]
#[must_use]
pub fn critical_depth() -> usize {
    CRITICAL_DEPTH.with(Cell::get)
}

/// Returns `true` while the calling thread holds at least one critical pin.
///
/// A thread in this state must not block indefinitely or call back into the
/// managed runtime.
#[inline]
#[must_use]
pub fn in_critical_region() -> bool {
    critical_depth() > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_depth_nests() {
        assert_eq!(critical_depth(), 0);
        enter_critical();
        enter_critical();
        assert_eq!(critical_depth(), 2);
        exit_critical();
        assert!(in_critical_region());
        exit_critical();
        assert!(!in_critical_region());
    }

    #[test]
    fn test_depth_is_per_thread() {
        enter_critical();
        let other = thread::spawn(critical_depth).join().unwrap();
        assert_eq!(other, 0);
        exit_critical();
    }
}
