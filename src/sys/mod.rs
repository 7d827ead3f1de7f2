mod futex;
mod semaphore;
mod timespec;

pub(crate) use semaphore::Semaphore;
