//! Process-wide admission control for crawls
//!
//! A fixed number of crawls may hold a slot at once; further callers suspend
//! (no polling) until a slot frees. Waiters are admitted in FIFO order.
//! Slots are released by dropping the [`CrawlPermit`], so every exit path of
//! an admitted crawl gives its slot back exactly once.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::trace;

use crate::error::{CrawlError, CrawlResult};

/// Bounded admission gate shared by all request handlers
#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// One admitted crawl; the slot is freed on drop
#[derive(Debug)]
pub struct CrawlPermit {
    _permit: OwnedSemaphorePermit,
}

impl ConcurrencyGate {
    /// Gate admitting at most `capacity` crawls (minimum 1)
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Wait, without a deadline, until a slot is free
    pub async fn acquire(&self) -> CrawlResult<CrawlPermit> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| CrawlError::Execution("concurrency gate is closed".to_string()))?;

        trace!(in_flight = self.in_flight(), capacity = self.capacity, "Crawl admitted");
        Ok(CrawlPermit { _permit: permit })
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Crawls currently holding a slot
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.capacity - self.semaphore.available_permits()
    }
}
