/*!
 * One-Way Latch
 *
 * A flag that goes from unset to set exactly once and never back.
 * Used as the out-of-band "producer done" signal of busy-wait queues.
 */

use std::sync::atomic::{AtomicBool, Ordering};

/// Set-once, read-many boolean
///
/// # Ordering Contract
///
/// `set` stores with `Release` and `is_set` loads with `Acquire`. A reader
/// that observes the latch as set also observes every write the setter made
/// before calling `set`. For a queue this means: once a consumer sees
/// "closed", every push that preceded the close is visible to it.
#[derive(Debug, Default)]
pub struct Latch {
    set: AtomicBool,
}

impl Latch {
    /// Create an unset latch
    pub const fn new() -> Self {
        Self {
            set: AtomicBool::new(false),
        }
    }

    /// Set the latch
    ///
    /// Returns `true` if this call performed the transition, `false` if the
    /// latch was already set (the call is then a no-op).
    #[inline]
    pub fn set(&self) -> bool {
        !self.set.swap(true, Ordering::AcqRel)
    }

    /// Whether the latch has been set
    #[inline(always)]
    pub fn is_set(&self) -> bool {
        self.set.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU64;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_set_once() {
        let latch = Latch::new();
        assert!(!latch.is_set());
        assert!(latch.set());
        assert!(latch.is_set());
        assert!(!latch.set());
        assert!(latch.is_set());
    }

    #[test]
    fn test_publishes_prior_writes() {
        let latch = Arc::new(Latch::new());
        let value = Arc::new(AtomicU64::new(0));

        let reader = {
            let latch = latch.clone();
            let value = value.clone();
            thread::spawn(move || {
                while !latch.is_set() {
                    std::hint::spin_loop();
                }
                value.load(Ordering::Relaxed)
            })
        };

        value.store(42, Ordering::Relaxed);
        latch.set();

        assert_eq!(reader.join().unwrap(), 42);
    }
}
