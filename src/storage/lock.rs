//! Readers-writer lock around the document file
//!
//! Writers hold the exclusive guard for a full load-modify-save cycle; readers
//! hold the shared guard for their load. Guards release on drop, including
//! during unwinding.
//!
//! The lock guards the file, not in-memory data. Poisoning is ignored: the
//! file on disk is always a complete document.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
#[cfg(test)]
use std::sync::TryLockError;

/// Shared guard held by a reader
pub type ReadGuard<'a> = RwLockReadGuard<'a, ()>;

/// Exclusive guard held by a writer
pub type WriteGuard<'a> = RwLockWriteGuard<'a, ()>;

/// Single-process readers-writer coordinator.
#[derive(Debug, Default)]
pub struct LockCoordinator {
    lock: RwLock<()>,
}

impl LockCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until the shared lock is held.
    pub fn read(&self) -> ReadGuard<'_> {
        self.lock.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks until the exclusive lock is held.
    pub fn write(&self) -> WriteGuard<'_> {
        self.lock.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes the shared lock if no writer holds it.
    #[cfg(test)]
    fn try_read(&self) -> Option<ReadGuard<'_>> {
        match self.lock.try_read() {
            Ok(guard) => Some(guard),
            Err(TryLockError::Poisoned(p)) => Some(p.into_inner()),
            Err(TryLockError::WouldBlock) => None,
        }
    }

    /// Takes the exclusive lock if nobody holds it.
    #[cfg(test)]
    fn try_write(&self) -> Option<WriteGuard<'_>> {
        match self.lock.try_write() {
            Ok(guard) => Some(guard),
            Err(TryLockError::Poisoned(p)) => Some(p.into_inner()),
            Err(TryLockError::WouldBlock) => None,
        }
    }
}
