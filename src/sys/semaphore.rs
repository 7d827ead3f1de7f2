use core::sync::atomic::AtomicU32;
use core::sync::atomic::Ordering::{Acquire, Relaxed, SeqCst};
use core::time::Duration;

use crate::sys::futex::{futex_wait, futex_wake_all, Futex};
use crate::sys::timespec::Timespec;

/// A futex-backed counting semaphore.
///
/// The permit count is the futex word itself: a thread that cannot take
/// its permits sleeps on the value it last observed, and any `signal`
/// changes that value, so a wakeup cannot be lost between the check and
/// the sleep.
pub struct Semaphore {
    permits: Futex,
    /// Threads currently in `wait_contended`. Lets `signal` skip the
    /// syscall when nobody sleeps.
    waiters: AtomicU32,
}

impl Semaphore {
    #[inline]
    pub const fn new(permits: u32) -> Semaphore {
        Semaphore { permits: Futex::new(permits), waiters: AtomicU32::new(0) }
    }

    #[inline]
    pub fn available(&self) -> u32 {
        self.permits.load(Relaxed)
    }

    #[inline]
    pub fn try_wait(&self, n: u32) -> bool {
        self.permits.fetch_update(Acquire, Relaxed, |p| p.checked_sub(n)).is_ok()
    }

    #[inline]
    pub fn wait(&self, n: u32) {
        if !self.try_wait(n) {
            self.wait_contended(n, None);
        }
    }

    /// Returns false if `timeout` elapsed before `n` permits could be taken.
    pub fn wait_timeout(&self, n: u32, timeout: Duration) -> bool {
        if self.try_wait(n) {
            return true;
        }
        // An unrepresentable deadline degrades to an untimed wait.
        match Timespec::deadline_after(timeout) {
            Some(deadline) => self.wait_contended(n, Some(&deadline)),
            None => {
                self.wait_contended(n, None);
                true
            }
        }
    }

    #[cold]
    fn wait_contended(&self, n: u32, deadline: Option<&Timespec>) -> bool {
        // Pairs with the SeqCst update in `signal`: either the signaller
        // sees us registered, or we see its permits.
        self.waiters.fetch_add(1, SeqCst);

        let acquired = loop {
            let permits = self.permits.load(SeqCst);
            if let Some(rest) = permits.checked_sub(n) {
                if self.permits.compare_exchange_weak(permits, rest, Acquire, Relaxed).is_ok() {
                    break true;
                }
                continue;
            }

            if !futex_wait(&self.permits, permits, deadline) {
                // Permits may have landed right at the deadline.
                break self.try_wait(n);
            }
        };

        self.waiters.fetch_sub(1, Relaxed);
        acquired
    }

    pub fn signal(&self, n: u32) {
        if n == 0 {
            return;
        }
        if self.permits.fetch_update(SeqCst, Relaxed, |p| p.checked_add(n)).is_err() {
            panic!("semaphore permit count overflow");
        }
        // Waiters may need different permit counts, so waking only `n` of
        // them could leave a satisfiable one asleep.
        if self.waiters.load(SeqCst) != 0 {
            futex_wake_all(&self.permits);
        }
    }
}
