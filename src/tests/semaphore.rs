extern crate std;
use core::sync::atomic::{AtomicU32, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::sync::{Semaphore, SemaphoreError};

#[test]
fn smoke() {
    let s = Semaphore::new(1);
    s.wait(1);
    s.signal(1);
    s.wait(1);
    s.signal(1);
    assert_eq!(s.available_permits(), 1);
}

#[test]
fn zero_permits_never_block() {
    let s = Semaphore::new(0);
    s.wait(0);
    assert!(s.try_wait(0));
    s.signal(0);
    assert_eq!(s.available_permits(), 0);
}

#[test]
fn try_wait_takes_all_or_nothing() {
    let s = Semaphore::new(3);
    assert!(!s.try_wait(4));
    assert_eq!(s.available_permits(), 3);
    assert!(s.try_wait(2));
    assert_eq!(s.available_permits(), 1);
    assert!(!s.try_wait(2));
    assert!(s.try_wait(1));
    assert_eq!(s.available_permits(), 0);
}

#[test]
fn wait_blocks_until_signalled() {
    let s = Arc::new(Semaphore::new(0));
    let s2 = s.clone();
    let (tx, rx) = channel();

    let t = thread::spawn(move || {
        s2.wait(2);
        tx.send(()).unwrap();
    });

    s.signal(1);
    assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    s.signal(1);
    rx.recv().unwrap();
    t.join().unwrap();
    assert_eq!(s.available_permits(), 0);
}

#[test]
fn one_signal_releases_many_waiters() {
    const N: u32 = 8;

    let s = Arc::new(Semaphore::new(0));
    let passed = Arc::new(AtomicU32::new(0));

    let handles: std::vec::Vec<_> = (0..N)
        .map(|_| {
            let s = s.clone();
            let passed = passed.clone();
            thread::spawn(move || {
                s.wait(1);
                passed.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(20));
    assert_eq!(passed.load(Ordering::SeqCst), 0);

    s.signal(N);
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(passed.load(Ordering::SeqCst), N);
    assert_eq!(s.available_permits(), 0);
}

#[test]
fn mixed_sized_requests_are_all_served() {
    // A waiter for 3 and a waiter for 1 must both get through once 4
    // permits exist, whichever of them the kernel wakes first.
    let s = Arc::new(Semaphore::new(0));
    let big = {
        let s = s.clone();
        thread::spawn(move || s.wait(3))
    };
    let small = {
        let s = s.clone();
        thread::spawn(move || s.wait(1))
    };

    thread::sleep(Duration::from_millis(20));
    s.signal(2);
    s.signal(2);
    big.join().unwrap();
    small.join().unwrap();
    assert_eq!(s.available_permits(), 0);
}

#[test]
fn producer_consumer() {
    const ITEMS: u32 = 10_000;

    let s = Arc::new(Semaphore::new(0));
    let s2 = s.clone();
    let producer = thread::spawn(move || {
        for _ in 0..ITEMS {
            s2.signal(1);
        }
    });
    for _ in 0..ITEMS {
        s.wait(1);
    }
    producer.join().unwrap();
    assert_eq!(s.available_permits(), 0);
}

#[test]
fn wait_timeout_times_out() {
    let s = Semaphore::new(1);
    let start = Instant::now();
    let r = s.wait_timeout(2, Duration::from_millis(20));
    assert!(r.timed_out());
    assert!(start.elapsed() >= Duration::from_millis(20));
    // Nothing is taken on timeout.
    assert_eq!(s.available_permits(), 1);
}

#[test]
fn wait_timeout_wake() {
    let s = Arc::new(Semaphore::new(0));
    let s2 = s.clone();

    let t = thread::spawn(move || {
        thread::sleep(Duration::from_millis(1));
        s2.signal(1);
    });
    let r = s.wait_timeout(1, Duration::from_secs(60));
    assert!(!r.timed_out());
    assert_eq!(s.available_permits(), 0);
    t.join().unwrap();
}

#[test]
fn wait_timeout_huge_duration() {
    let s = Semaphore::new(1);
    assert!(!s.wait_timeout(1, Duration::MAX).timed_out());
}

#[test]
#[should_panic(expected = "semaphore permit count overflow")]
fn signal_overflow_panics() {
    let s = Semaphore::new(u32::MAX);
    s.signal(1);
}

#[test]
fn try_from_signed() {
    assert_eq!(Semaphore::try_from(0i64).unwrap().available_permits(), 0);
    assert_eq!(Semaphore::try_from(5i64).unwrap().available_permits(), 5);
    assert_eq!(
        Semaphore::try_from(i64::from(u32::MAX)).unwrap().available_permits(),
        u32::MAX
    );
    assert_eq!(Semaphore::try_from(-1i64).err(), Some(SemaphoreError::NegativePermits(-1)));
    assert_eq!(
        Semaphore::try_from(i64::from(u32::MAX) + 1).err(),
        Some(SemaphoreError::TooManyPermits(i64::from(u32::MAX) + 1))
    );
}
