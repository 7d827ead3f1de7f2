/*!
Thread synchronization primitives for Linux built around a counting
semaphore: the semaphore itself, a mutex that is a binary semaphore, and a
reusable [`Barrier`](sync::Barrier) that rendezvouses a fixed number of
threads through two turnstiles, round after round.

Everything is implemented on top of the `futex(2)` system call, issued
directly, without the use of libc.
*/

#![cfg(target_os = "linux")]
#![no_std]

pub mod sync;
mod sys;

#[cfg(test)]
mod tests;
