//! Bounded decode concurrency.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

/// Fallback CPU count when detection fails.
pub const FALLBACK_CPU_COUNT: usize = 4;

/// Default number of concurrently decoding tiles: one per CPU.
pub fn default_decode_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(FALLBACK_CPU_COUNT)
}

/// Semaphore limiting how many tiles read and decode at once.
#[derive(Debug, Clone)]
pub struct DecodePool {
    semaphore: Arc<Semaphore>,
    limit: usize,
}

impl DecodePool {
    /// A limit of zero is raised to one.
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(limit)),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Slots currently free.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Waits for a slot, giving up if `cancellation` fires first.
    pub async fn acquire(&self, cancellation: &CancellationToken) -> Option<OwnedSemaphorePermit> {
        tokio::select! {
            biased;
            _ = cancellation.cancelled() => None,
            permit = Arc::clone(&self.semaphore).acquire_owned() => permit.ok(),
        }
    }
}

impl Default for DecodePool {
    fn default() -> Self {
        Self::new(default_decode_concurrency())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_limit_is_raised() {
        assert_eq!(DecodePool::new(0).limit(), 1);
    }

    #[test]
    fn test_default_uses_cpu_count() {
        assert!(DecodePool::default().limit() >= 1);
    }

    #[tokio::test]
    async fn test_acquire_respects_limit() {
        let pool = DecodePool::new(2);
        let token = CancellationToken::new();
        let a = pool.acquire(&token).await.unwrap();
        let _b = pool.acquire(&token).await.unwrap();
        assert_eq!(pool.available(), 0);
        drop(a);
        assert_eq!(pool.available(), 1);
    }

    #[tokio::test]
    async fn test_acquire_is_cancellable() {
        let pool = DecodePool::new(1);
        let token = CancellationToken::new();
        let _held = pool.acquire(&token).await.unwrap();

        let waiter = {
            let pool = pool.clone();
            let token = token.clone();
            tokio::spawn(async move { pool.acquire(&token).await.is_none() })
        };
        token.cancel();
        assert!(waiter.await.unwrap(), "cancelled waiter should give up");
    }
}
