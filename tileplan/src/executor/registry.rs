//! Live decode task registry.
//!
//! Every submitted task is registered with its cancellation token before it
//! is spawned. A [`Registration`] guard travels with the task and removes the
//! entry when the task finishes, panics or is dropped unpolled. The registry
//! is what makes bulk cancellation possible.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::coord::Coordinate;

/// Identifier of a registered task, unique per registry.
pub type TaskId = u64;

/// A task currently in flight.
#[derive(Debug)]
struct RegisteredTask {
    level: usize,
    coordinate: Coordinate,
    cancellation: CancellationToken,
}

/// Concurrent map of live tasks.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: DashMap<TaskId, RegisteredTask>,
    next_id: AtomicU64,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        level: usize,
        coordinate: Coordinate,
        cancellation: CancellationToken,
    ) -> TaskId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.tasks.insert(
            id,
            RegisteredTask {
                level,
                coordinate,
                cancellation,
            },
        );
        id
    }

    /// Removes a task. Returns `false` if it was not registered.
    pub fn deregister(&self, id: TaskId) -> bool {
        self.tasks.remove(&id).is_some()
    }

    /// Signals every registered task. Tasks stay registered until they exit.
    pub fn cancel_all(&self) -> usize {
        let mut signalled = 0;
        for entry in self.tasks.iter() {
            let task = entry.value();
            trace!(
                level = task.level,
                coordinate = %task.coordinate,
                "Cancelling decode task"
            );
            task.cancellation.cancel();
            signalled += 1;
        }
        signalled
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Deregisters a task when dropped, including on unwind and when the task
/// future is dropped before its first poll.
pub(crate) struct Registration {
    registry: Arc<TaskRegistry>,
    id: TaskId,
}

impl Registration {
    /// Registers a task and returns the guard that owns its entry.
    pub(crate) fn register(
        registry: &Arc<TaskRegistry>,
        level: usize,
        coordinate: Coordinate,
        cancellation: CancellationToken,
    ) -> Self {
        let id = registry.register(level, coordinate, cancellation);
        Self {
            registry: Arc::clone(registry),
            id,
        }
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.deregister(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_deregister() {
        let registry = TaskRegistry::new();
        let a = registry.register(0, Coordinate::new(1, 1), CancellationToken::new());
        let b = registry.register(0, Coordinate::new(2, 1), CancellationToken::new());
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);

        assert!(registry.deregister(a));
        assert!(!registry.deregister(a));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_cancel_all_signals_tokens() {
        let registry = TaskRegistry::new();
        let tokens: Vec<_> = (0..3).map(|_| CancellationToken::new()).collect();
        for (i, token) in tokens.iter().enumerate() {
            registry.register(1, Coordinate::new(i as i32, 0), token.clone());
        }

        assert_eq!(registry.cancel_all(), 3);
        assert!(tokens.iter().all(|t| t.is_cancelled()));
        // Cancelling does not deregister
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_registration_guard_deregisters_on_drop() {
        let registry = Arc::new(TaskRegistry::new());
        {
            let token = CancellationToken::new();
            let _guard = Registration::register(&registry, 0, Coordinate::ZERO, token);
            assert_eq!(registry.len(), 1);
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registration_guard_outlives_borrow() {
        let registry = Arc::new(TaskRegistry::new());
        let token = CancellationToken::new();
        let guard = Registration::register(&registry, 2, Coordinate::new(3, 4), token);
        let task = std::thread::spawn(move || drop(guard));
        task.join().unwrap();
        assert!(registry.is_empty());
    }
}
