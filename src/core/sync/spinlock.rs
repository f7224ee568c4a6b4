/*!
 * Test-and-Set Spin Lock
 *
 * Mutual exclusion without parking: waiters burn cycles instead of sleeping.
 * Suited to critical sections that are a handful of instructions long, like
 * a push or pop on a `VecDeque`.
 */

use crate::core::limits::SPIN_YIELD_INTERVAL;
use std::cell::UnsafeCell;
use std::hint;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// Spin lock guarding a value of type `T`
///
/// # Performance
///
/// - Uncontended lock/unlock: one atomic swap plus one store
/// - Contended: test-and-test-and-set, spinning on a relaxed load so the
///   cache line stays shared until the holder releases it
/// - Yields the time slice every `SPIN_YIELD_INTERVAL` spins
pub struct SpinLock<T> {
    locked: AtomicBool,
    data: UnsafeCell<T>,
}

// SAFETY: access to `data` is serialized by `locked`; handing out `&mut T` to
// one thread at a time only requires `T: Send`.
unsafe impl<T: Send> Send for SpinLock<T> {}
unsafe impl<T: Send> Sync for SpinLock<T> {}

impl<T> SpinLock<T> {
    /// Create a new unlocked spin lock
    pub const fn new(value: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            data: UnsafeCell::new(value),
        }
    }

    /// Acquire the lock, spinning until it is free
    #[inline]
    pub fn lock(&self) -> SpinGuard<'_, T> {
        let mut spins: u32 = 0;
        while self.locked.swap(true, Ordering::Acquire) {
            while self.locked.load(Ordering::Relaxed) {
                spins = spins.wrapping_add(1);
                if spins % SPIN_YIELD_INTERVAL == 0 {
                    thread::yield_now();
                } else {
                    hint::spin_loop();
                }
            }
        }
        SpinGuard {
            lock: self,
            _marker: PhantomData,
        }
    }
}

impl<T: Default> Default for SpinLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// RAII guard; the lock is released when this is dropped
pub struct SpinGuard<'a, T> {
    lock: &'a SpinLock<T>,
    // Ties Send/Sync of the guard to T the same way `&mut T` does
    _marker: PhantomData<&'a mut T>,
}

impl<T> Deref for SpinGuard<'_, T> {
    type Target = T;

    #[inline(always)]
    fn deref(&self) -> &T {
        // SAFETY: the guard exists only while `locked` is held by this thread
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> DerefMut for SpinGuard<'_, T> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: see `deref`; `&mut self` rules out aliasing through the guard
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T> Drop for SpinGuard<'_, T> {
    #[inline(always)]
    fn drop(&mut self) {
        self.lock.locked.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_lock_and_mutate() {
        let lock = SpinLock::new(Vec::new());
        lock.lock().push(1);
        lock.lock().push(2);
        assert_eq!(*lock.lock(), vec![1, 2]);
        assert!(!lock.locked.load(Ordering::Relaxed));
    }

    #[test]
    fn test_guard_holds_until_dropped() {
        let lock = SpinLock::new(0u32);
        let guard = lock.lock();
        assert!(lock.locked.load(Ordering::Relaxed));
        drop(guard);
        assert!(!lock.locked.load(Ordering::Relaxed));
    }

    #[test]
    fn test_concurrent_increments() {
        let lock = Arc::new(SpinLock::new(0u64));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lock = lock.clone();
                thread::spawn(move || {
                    for _ in 0..10_000 {
                        *lock.lock() += 1;
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(*lock.lock(), 80_000);
    }
}
