use crate::errors::SyncError;
use std::sync::{Condvar, Mutex, MutexGuard};

struct Shared<T> {
    value: T,
    published: bool,
    terminated: bool,
}

/// Single-writer, multi-reader shared value with explicit publish
/// semantics.
///
/// The writer mutates under the lock and decides per write whether it
/// constitutes a meaningful update — only published writes wake blocked
/// readers. `read_latest()` consumes one publication (edge); `try_read()`
/// samples the current value without blocking (level), for consumers that
/// want "most recent available" rather than "next update".
pub struct PublishLock<T> {
    shared: Mutex<Shared<T>>,
    cond: Condvar,
}

impl<T> PublishLock<T> {
    pub fn new(value: T) -> Self {
        Self {
            shared: Mutex::new(Shared {
                value,
                published: false,
                terminated: false,
            }),
            cond: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared<T>> {
        match self.shared.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Mutate the value under the lock; wake readers only when `publish`
    /// is true.
    pub fn write<F: FnOnce(&mut T)>(&self, publish: bool, f: F) {
        let mut shared = self.lock();
        f(&mut shared.value);
        if publish {
            shared.published = true;
            self.cond.notify_all();
        }
    }

    /// Block until a publication (or termination), consuming it.
    pub fn read_latest(&self) -> Result<T, SyncError>
    where
        T: Clone,
    {
        let mut shared = self.lock();
        while !shared.published && !shared.terminated {
            shared = match self.cond.wait(shared) {
                Ok(g) => g,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
        if !shared.published {
            return Err(SyncError::Terminated);
        }
        shared.published = false;
        Ok(shared.value.clone())
    }

    /// Snapshot the current value without waiting.
    pub fn try_read(&self) -> T
    where
        T: Clone,
    {
        self.lock().value.clone()
    }

    /// Wake all blocked readers with a shutdown indication.
    pub fn terminate(&self) {
        let mut shared = self.lock();
        shared.terminated = true;
        self.cond.notify_all();
    }
}
