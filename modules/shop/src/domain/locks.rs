//! Per-resource async locks.
//!
//! Every operation that reads, mutates and writes back a user or a package
//! holds the lock of each resource it touches for its whole duration. Keys
//! are taken in sorted order so two operations sharing resources cannot
//! deadlock.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

pub fn user_key(id: &str) -> String {
    format!("user:{id}")
}

pub fn package_key(id: &str) -> String {
    format!("package:{id}")
}

#[derive(Clone, Default)]
pub struct KeyedLocks {
    table: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

/// Holds every lock acquired by one `lock_all` call until dropped.
#[must_use = "locks are released as soon as the guard is dropped"]
pub struct KeyedGuard {
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire all `keys`, deduplicated, in ascending order.
    pub async fn lock_all<I>(&self, keys: I) -> KeyedGuard
    where
        I: IntoIterator<Item = String>,
    {
        let mut keys: Vec<String> = keys.into_iter().collect();
        keys.sort();
        keys.dedup();

        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            // The map shard guard must be released before awaiting.
            let mutex = self.table.entry(key).or_default().clone();
            guards.push(mutex.lock_owned().await);
        }
        KeyedGuard { _guards: guards }
    }

    /// Number of distinct keys ever locked.
    #[cfg(test)]
    fn len(&self) -> usize {
        self.table.len()
    }
}
