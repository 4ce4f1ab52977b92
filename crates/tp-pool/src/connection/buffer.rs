//! Bounded idle buffer
//!
//! A FIFO of idle connections guarded by a short-lived mutex, paired with a
//! semaphore whose permits count the entries available to poppers. Offers
//! never block; pops wait on the semaphore with a deadline. The mutex is held
//! only for a single push or pop, never across an await.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Semaphore;

/// The buffer was closed while (or before) waiting on it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("idle buffer closed")]
pub struct BufferClosed;

/// Bounded multi-producer multi-consumer queue of idle entries
#[derive(Debug)]
pub struct IdleBuffer<T> {
    entries: Mutex<VecDeque<T>>,
    /// One permit per entry that a popper may claim
    available: Semaphore,
    capacity: usize,
}

impl<T> IdleBuffer<T> {
    /// Create an empty buffer holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            available: Semaphore::new(0),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an entry without waiting.
    ///
    /// Hands the entry back when the buffer is full or closed.
    pub fn offer(&self, entry: T) -> Result<(), T> {
        {
            let mut entries = self.lock();
            if self.available.is_closed() || entries.len() >= self.capacity {
                return Err(entry);
            }
            entries.push_back(entry);
        }
        self.available.add_permits(1);
        Ok(())
    }

    /// Take the oldest entry, waiting up to `wait` for one to arrive.
    ///
    /// `Ok(None)` means the wait elapsed with nothing available.
    pub async fn pop(&self, wait: Duration) -> Result<Option<T>, BufferClosed> {
        match tokio::time::timeout(wait, self.available.acquire()).await {
            Err(_elapsed) => Ok(None),
            Ok(Err(_closed)) => Err(BufferClosed),
            Ok(Ok(permit)) => {
                // The entry now belongs to this caller; its permit is not returned.
                permit.forget();
                self.take_claimed()
            }
        }
    }

    /// Remove the entry a popper holds a permit for.
    ///
    /// A close that lands between the permit grant and this lock wins: the
    /// entry stays put for the closer to drain.
    fn take_claimed(&self) -> Result<Option<T>, BufferClosed> {
        let mut entries = self.lock();
        if self.available.is_closed() {
            return Err(BufferClosed);
        }
        Ok(entries.pop_front())
    }

    /// Number of entries currently buffered
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether [`close`](Self::close) has been called
    pub fn is_closed(&self) -> bool {
        self.available.is_closed()
    }

    /// Reject further offers and wake every waiting popper with [`BufferClosed`]
    pub fn close(&self) {
        self.available.close();
    }

    /// Remove and return every buffered entry
    pub fn drain(&self) -> Vec<T> {
        self.lock().drain(..).collect()
    }
}
