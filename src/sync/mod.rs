//! Futex-based synchronization primitives.
//!
//! - [`Semaphore`]: A counting semaphore. Threads block in [`wait`] until
//!   enough permits are available and take them atomically; [`signal`]
//!   hands permits back.
//!
//! - [`Mutex`]: Mutual Exclusion mechanism, a binary semaphore guarding
//!   some data so that at most one thread at a time can access it. Unlike
//!   the [std equivalent](https://doc.rust-lang.org/std/sync/struct.Mutex.html),
//!   it does not have a poison mechanism.
//!
//! - [`Barrier`]: Makes a fixed number of threads meet before a piece of
//!   work and again after it, reusable across any number of rounds.
//!
//! [`wait`]: Semaphore::wait
//! [`signal`]: Semaphore::signal

mod barrier;
mod mutex;
mod semaphore;

pub use barrier::Barrier;
pub use barrier::BarrierError;
pub use barrier::BarrierWaitResult;
pub use mutex::Mutex;
pub use mutex::MutexGuard;
pub use mutex::TryLockError;
pub use mutex::TryLockResult;
pub use semaphore::Semaphore;
pub use semaphore::SemaphoreError;
pub use semaphore::WaitTimeoutResult;
