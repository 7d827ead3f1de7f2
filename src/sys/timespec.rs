use core::mem::MaybeUninit;
use core::time::Duration;
use nc::timespec_t;

const NSEC_PER_SEC: u32 = 1_000_000_000;

/// A point on a kernel clock, with nanoseconds kept below one second.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Timespec {
    tv_sec: i64,
    tv_nsec: u32,
}

impl Timespec {
    pub fn now(clock: nc::clockid_t) -> Timespec {
        let mut t: MaybeUninit<timespec_t> = MaybeUninit::uninit();
        unsafe { nc::clock_gettime(clock, &mut *t.as_mut_ptr()) }.expect("clock_gettime failed");
        let t = unsafe { t.assume_init() };
        debug_assert!((0..NSEC_PER_SEC as i64).contains(&(t.tv_nsec as i64)));
        Timespec { tv_sec: t.tv_sec as i64, tv_nsec: t.tv_nsec as u32 }
    }

    /// The monotonic time `timeout` from now, or `None` if that is not
    /// representable (which callers treat as "never").
    pub fn deadline_after(timeout: Duration) -> Option<Timespec> {
        Timespec::now(nc::CLOCK_MONOTONIC).checked_add_duration(&timeout)
    }

    pub fn checked_add_duration(&self, other: &Duration) -> Option<Timespec> {
        let mut secs = self.tv_sec.checked_add_unsigned(other.as_secs())?;

        // Both halves are below one second, so the sum fits in a u32.
        let mut nsec = other.subsec_nanos() + self.tv_nsec;
        if nsec >= NSEC_PER_SEC {
            nsec -= NSEC_PER_SEC;
            secs = secs.checked_add(1)?;
        }
        Some(Timespec { tv_sec: secs, tv_nsec: nsec })
    }

    pub fn to_timespec(&self) -> Option<timespec_t> {
        Some(timespec_t {
            tv_sec: self.tv_sec.try_into().ok()?,
            tv_nsec: self.tv_nsec.try_into().ok()?,
        })
    }
}
