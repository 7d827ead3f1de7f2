use crate::sync::Mutex;
use crate::sys;
use core::error::Error;
use core::fmt;

/// An error returned by [`Barrier::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierError {
    /// A barrier needs at least one participant, and no more than its
    /// turnstiles can hold permits for.
    InvalidCapacity(usize),
}

impl fmt::Display for BarrierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            BarrierError::InvalidCapacity(n) => write!(f, "cannot create a barrier for {n} threads"),
        }
    }
}

impl Error for BarrierError {}

/// A barrier enables multiple threads to synchronize the beginning and the
/// end of some computation.
///
/// ```text
///     | | | | |
///     | | | | |
///     ---------  enter()
///         |
///         |      all N threads inside
///         |
///     ---------  exit()
///     | | | | |
///     | | | | |
/// ```
///
/// No thread returns from [`enter`] until all `N` have called it, and no
/// thread returns from [`exit`] until all `N` have called that. The same
/// barrier can be used for any number of rounds.
///
/// Internally the barrier counts arrivals under a [`Mutex`] and keeps two
/// turnstiles, semaphores that stay shut at zero permits. The `N`th thread
/// to enter loads the entry turnstile with `N` permits, and every thread
/// (itself included) takes one on its way through. Exiting mirrors this on
/// the exit turnstile as the count falls back to zero. A thread that races
/// ahead into the next round's `enter` finds the entry turnstile drained
/// and waits there, since the previous round's permits all went to the
/// exit turnstile.
///
/// A thread that never arrives stalls every other participant forever.
/// Calling `enter` from more than `N` threads in one round, or twice from
/// one thread without an `exit` in between, is a logic error; the barrier
/// does not detect it and its behavior is unspecified.
///
/// [`enter`]: Self::enter
/// [`exit`]: Self::exit
///
/// # Examples
///
/// ```
/// use turnstile_sync::sync::Barrier;
/// use std::sync::Arc;
/// use std::thread;
///
/// let n = 10;
/// let barrier = Arc::new(Barrier::new(n).unwrap());
///
/// let handles: Vec<_> = (0..n)
///     .map(|_| {
///         let barrier = Arc::clone(&barrier);
///         thread::spawn(move || {
///             // The same messages will be printed together.
///             // You will NOT see any interleaving.
///             println!("before wait");
///             barrier.wait();
///             println!("after wait");
///         })
///     })
///     .collect();
///
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// ```
pub struct Barrier {
    parties: u32,
    count: Mutex<u32>,
    entry_turnstile: sys::Semaphore,
    exit_turnstile: sys::Semaphore,
}

/// A `BarrierWaitResult` is returned by [`Barrier::enter`], [`Barrier::exit`]
/// and [`Barrier::wait`] when all threads in the phase have rendezvoused.
///
/// # Examples
///
/// ```
/// use turnstile_sync::sync::Barrier;
///
/// let barrier = Barrier::new(1).unwrap();
/// let barrier_wait_result = barrier.wait();
/// ```
pub struct BarrierWaitResult(bool);

impl fmt::Debug for BarrierWaitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BarrierWaitResult").field("is_leader", &self.is_leader()).finish()
    }
}

impl BarrierWaitResult {
    /// Returns `true` if this thread is the "leader thread" for the phase
    /// that returned this result.
    ///
    /// Only one thread per phase has `true` returned: the last one to
    /// arrive, whose arrival opened the turnstile.
    ///
    /// # Examples
    ///
    /// ```
    /// use turnstile_sync::sync::Barrier;
    ///
    /// let barrier = Barrier::new(1).unwrap();
    /// let barrier_wait_result = barrier.wait();
    /// println!("{:?}", barrier_wait_result.is_leader());
    /// ```
    #[must_use]
    pub fn is_leader(&self) -> bool {
        self.0
    }
}

impl Barrier {
    /// Creates a new barrier for exactly `n` threads.
    ///
    /// # Errors
    ///
    /// Returns [`BarrierError::InvalidCapacity`] if `n` is zero or larger
    /// than `u32::MAX`.
    ///
    /// # Examples
    ///
    /// ```
    /// use turnstile_sync::sync::{Barrier, BarrierError};
    ///
    /// let barrier = Barrier::new(10).unwrap();
    /// assert_eq!(Barrier::new(0).err(), Some(BarrierError::InvalidCapacity(0)));
    /// ```
    pub fn new(n: usize) -> Result<Barrier, BarrierError> {
        let parties = u32::try_from(n)
            .ok()
            .filter(|&parties| parties > 0)
            .ok_or(BarrierError::InvalidCapacity(n))?;

        Ok(Barrier {
            parties,
            count: Mutex::new(0),
            entry_turnstile: sys::Semaphore::new(0),
            exit_turnstile: sys::Semaphore::new(0),
        })
    }

    /// Returns the number of threads this barrier synchronizes.
    #[must_use]
    pub fn parties(&self) -> usize {
        self.parties as usize
    }

    /// Blocks the current thread until all threads have entered the barrier
    /// for this round.
    pub fn enter(&self) -> BarrierWaitResult {
        let is_leader = {
            let mut count = self.count.lock();
            *count += 1;
            let is_leader = *count == self.parties;
            if is_leader {
                self.entry_turnstile.signal(self.parties);
            }
            is_leader
        };
        self.entry_turnstile.wait(1);
        BarrierWaitResult(is_leader)
    }

    /// Blocks the current thread until all threads have exited the barrier
    /// for this round.
    pub fn exit(&self) -> BarrierWaitResult {
        let is_leader = {
            let mut count = self.count.lock();
            *count -= 1;
            let is_leader = *count == 0;
            if is_leader {
                self.exit_turnstile.signal(self.parties);
            }
            is_leader
        };
        self.exit_turnstile.wait(1);
        BarrierWaitResult(is_leader)
    }

    /// Enters and immediately exits the barrier.
    ///
    /// Returns the result of the exit phase.
    pub fn wait(&self) -> BarrierWaitResult {
        self.enter();
        self.exit()
    }
}

impl fmt::Debug for Barrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Barrier").field("parties", &self.parties).finish_non_exhaustive()
    }
}
