use core::ptr::null;
use core::sync::atomic::AtomicU32;
use core::sync::atomic::Ordering::Relaxed;
use syscalls::{syscall, Errno, Sysno};

use crate::sys::timespec::Timespec;

/// An atomic for use as a futex. The kernel only ever looks at 32 bits.
pub type Futex = AtomicU32;

/// Waits for a `futex_wake_all` operation to wake us.
///
/// Returns directly if the futex doesn't hold the expected value.
///
/// `deadline` is an absolute `CLOCK_MONOTONIC` time; `None` waits forever.
/// Returns false on timeout, and true in all other cases.
pub fn futex_wait(futex: &Futex, expected: u32, deadline: Option<&Timespec>) -> bool {
    let timespec = deadline.and_then(Timespec::to_timespec);

    loop {
        // No need to wait if the value already changed.
        if futex.load(Relaxed) != expected {
            return true;
        }

        let r = unsafe {
            // FUTEX_WAIT_BITSET takes an absolute timeout, so a retry after
            // EINTR does not stretch the deadline.
            syscall!(
                Sysno::futex,
                futex as *const Futex,
                nc::FUTEX_WAIT_BITSET | nc::FUTEX_PRIVATE_FLAG,
                expected,
                timespec.as_ref().map_or(null(), |t| t as *const nc::timespec_t),
                null::<u32>(), // Unused for FUTEX_WAIT_BITSET.
                !0u32          // Match any waker, like a plain FUTEX_WAIT.
            )
        };

        match r {
            Err(Errno::ETIMEDOUT) => return false,
            Err(Errno::EINTR) => continue,
            _ => return true,
        }
    }
}

/// Wakes up all threads that are waiting on `futex_wait` on this futex.
pub fn futex_wake_all(futex: &Futex) {
    unsafe {
        syscall!(
            Sysno::futex,
            futex as *const Futex,
            nc::FUTEX_WAKE | nc::FUTEX_PRIVATE_FLAG,
            i32::MAX
        )
        .expect("futex_wake_all failed");
    }
}
