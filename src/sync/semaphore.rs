use crate::sys;
use core::error::Error;
use core::fmt;
use core::time::Duration;

/// An error returned when a [`Semaphore`] is built from an out-of-range
/// signed permit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemaphoreError {
    /// The initial permit count was below zero.
    NegativePermits(i64),
    /// The initial permit count does not fit in the 32-bit permit counter.
    TooManyPermits(i64),
}

impl fmt::Display for SemaphoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SemaphoreError::NegativePermits(n) => {
                write!(f, "cannot create a semaphore with {n} permits")
            }
            SemaphoreError::TooManyPermits(n) => {
                write!(f, "cannot create a semaphore with {n} permits, at most {} are supported", u32::MAX)
            }
        }
    }
}

impl Error for SemaphoreError {}

/// A type indicating whether a timed wait on a semaphore returned
/// due to a time out or not.
///
/// It is returned by the [`wait_timeout`] method.
///
/// [`wait_timeout`]: Semaphore::wait_timeout
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct WaitTimeoutResult(bool);

impl WaitTimeoutResult {
    /// Returns `true` if the wait timed out without taking any permits.
    #[must_use]
    pub fn timed_out(&self) -> bool {
        self.0
    }
}

/// A counting semaphore.
///
/// A semaphore holds a number of permits. [`wait`] blocks the current
/// thread until the requested number of permits is available and takes
/// them all at once, and [`signal`] returns permits, waking any thread
/// whose request can now be satisfied. The count never goes below zero.
///
/// A semaphore has no notion of ownership: any thread may signal permits
/// that another thread took.
///
/// [`wait`]: Self::wait
/// [`signal`]: Self::signal
///
/// # Examples
///
/// ```
/// use turnstile_sync::sync::Semaphore;
/// use std::sync::Arc;
/// use std::thread;
///
/// let done = Arc::new(Semaphore::new(0));
///
/// for _ in 0..4 {
///     let done = Arc::clone(&done);
///     thread::spawn(move || {
///         // ... some work ...
///         done.signal(1);
///     });
/// }
///
/// // Returns once all four workers have signalled.
/// done.wait(4);
/// assert_eq!(done.available_permits(), 0);
/// ```
pub struct Semaphore {
    inner: sys::Semaphore,
}

impl Semaphore {
    /// Creates a new semaphore holding `permits` permits.
    ///
    /// # Examples
    ///
    /// ```
    /// use turnstile_sync::sync::Semaphore;
    ///
    /// let semaphore = Semaphore::new(3);
    /// assert_eq!(semaphore.available_permits(), 3);
    /// ```
    #[must_use]
    #[inline]
    pub const fn new(permits: u32) -> Semaphore {
        Semaphore { inner: sys::Semaphore::new(permits) }
    }

    /// Blocks the current thread until `n` permits are available, then
    /// takes them atomically.
    ///
    /// Permits are never taken piecemeal: a thread asking for 3 does not
    /// hold on to 2 while waiting for a third. Waiting for 0 permits returns
    /// immediately.
    ///
    /// There is no fairness between waiters, and a large request may be
    /// overtaken by smaller ones indefinitely.
    pub fn wait(&self, n: u32) {
        self.inner.wait(n)
    }

    /// Takes `n` permits if they are available right now.
    ///
    /// Returns `true` if the permits were taken. This function does not
    /// block.
    ///
    /// # Examples
    ///
    /// ```
    /// use turnstile_sync::sync::Semaphore;
    ///
    /// let semaphore = Semaphore::new(2);
    /// assert!(!semaphore.try_wait(3));
    /// assert!(semaphore.try_wait(2));
    /// assert!(!semaphore.try_wait(1));
    /// ```
    #[must_use]
    pub fn try_wait(&self, n: u32) -> bool {
        self.inner.try_wait(n)
    }

    /// Like [`wait`], but gives up once `dur` has elapsed.
    ///
    /// The timeout is measured against the monotonic clock. On timeout no
    /// permits are taken. A duration too large to be represented as a
    /// deadline waits forever.
    ///
    /// [`wait`]: Self::wait
    ///
    /// # Examples
    ///
    /// ```
    /// use turnstile_sync::sync::Semaphore;
    /// use std::time::Duration;
    ///
    /// let semaphore = Semaphore::new(0);
    /// let result = semaphore.wait_timeout(1, Duration::from_millis(10));
    /// assert!(result.timed_out());
    /// ```
    pub fn wait_timeout(&self, n: u32, dur: Duration) -> WaitTimeoutResult {
        WaitTimeoutResult(!self.inner.wait_timeout(n, dur))
    }

    /// Adds `n` permits and wakes the threads that can now proceed.
    ///
    /// # Panics
    ///
    /// Panics if the permit count would exceed `u32::MAX`.
    pub fn signal(&self, n: u32) {
        self.inner.signal(n)
    }

    /// Returns the number of permits available at the time of the call.
    ///
    /// The value may be stale as soon as it is returned.
    #[must_use]
    pub fn available_permits(&self) -> u32 {
        self.inner.available()
    }
}

impl TryFrom<i64> for Semaphore {
    type Error = SemaphoreError;

    /// Creates a semaphore from a signed permit count, rejecting counts
    /// below zero or above `u32::MAX`.
    ///
    /// # Examples
    ///
    /// ```
    /// use turnstile_sync::sync::{Semaphore, SemaphoreError};
    ///
    /// assert!(Semaphore::try_from(1i64).is_ok());
    /// assert_eq!(Semaphore::try_from(-1i64).err(), Some(SemaphoreError::NegativePermits(-1)));
    /// ```
    fn try_from(permits: i64) -> Result<Semaphore, SemaphoreError> {
        if permits < 0 {
            return Err(SemaphoreError::NegativePermits(permits));
        }
        u32::try_from(permits)
            .map(Semaphore::new)
            .map_err(|_| SemaphoreError::TooManyPermits(permits))
    }
}

impl fmt::Debug for Semaphore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Semaphore")
            .field("permits", &self.available_permits())
            .finish_non_exhaustive()
    }
}
