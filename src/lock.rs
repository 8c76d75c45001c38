//! Bus locking hooks.
//!
//! The engine takes the lock before sending a command and releases it when
//! the command finishes, on every exit path. The default [`NoopLock`]
//! assumes single-task use; engines sharing a bus across threads can share
//! one [`MutexLock`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use ubxwire::lock::{BusLock, LockGuard, MutexLock};
//!
//! let lock: Arc<dyn BusLock> = Arc::new(MutexLock::new());
//! {
//!     let guard = LockGuard::acquire(lock.clone());
//!     assert!(guard.is_some());
//! } // released here
//! assert!(LockGuard::acquire(lock).is_some());
//! ```

use std::sync::{Arc, Condvar, Mutex};

/// Mutual-exclusion capability installed into the engine.
pub trait BusLock: Send + Sync {
    /// Take the lock. Returns false if it could not be taken.
    fn lock(&self) -> bool;

    /// Release the lock.
    fn unlock(&self);
}

/// Lock that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLock;

impl BusLock for NoopLock {
    #[inline]
    fn lock(&self) -> bool {
        true
    }

    #[inline]
    fn unlock(&self) {}
}

/// Blocking lock built on `Mutex` + `Condvar`.
#[derive(Debug, Default)]
pub struct MutexLock {
    held: Mutex<bool>,
    released: Condvar,
}

impl MutexLock {
    /// Create an unlocked lock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the lock is currently held.
    pub fn is_held(&self) -> bool {
        self.held.lock().map(|held| *held).unwrap_or(true)
    }
}

impl BusLock for MutexLock {
    fn lock(&self) -> bool {
        let Ok(mut held) = self.held.lock() else {
            return false;
        };
        while *held {
            held = match self.released.wait(held) {
                Ok(held) => held,
                Err(_) => return false,
            };
        }
        *held = true;
        true
    }

    fn unlock(&self) {
        if let Ok(mut held) = self.held.lock() {
            *held = false;
            self.released.notify_one();
        }
    }
}

/// Scoped hold on a [`BusLock`]; releases on drop.
pub struct LockGuard {
    lock: Arc<dyn BusLock>,
}

impl LockGuard {
    /// Take `lock`, returning `None` if it could not be taken.
    pub fn acquire(lock: Arc<dyn BusLock>) -> Option<Self> {
        if lock.lock() {
            Some(Self { lock })
        } else {
            None
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        self.lock.unlock();
    }
}
