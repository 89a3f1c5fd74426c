//! Per-key mutual exclusion
//!
//! Serializes the lookup → write sequence for one calendar key while
//! letting different keys proceed in parallel. An entry is removed once
//! no request holds or waits on it, including waiters that were cancelled,
//! so the table tracks in-flight keys only.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

struct Slot {
    mutex: Arc<Mutex<()>>,
    /// Requests holding or waiting on `mutex`.
    users: usize,
}

#[derive(Default)]
pub struct KeyLocks {
    locks: DashMap<String, Slot>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`.
    ///
    /// Dropping the returned future before it resolves withdraws the
    /// request and still releases the table entry.
    pub async fn lock(&self, key: &str) -> KeyGuard<'_> {
        let registration = Registration::new(self, key);
        let guard = Arc::clone(&registration.mutex).lock_owned().await;
        KeyGuard {
            _guard: guard,
            _registration: registration,
        }
    }

    /// Number of keys currently held or awaited.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    fn release(&self, key: &str) {
        if let Entry::Occupied(mut slot) = self.locks.entry(key.to_string()) {
            slot.get_mut().users -= 1;
            if slot.get().users == 0 {
                slot.remove();
            }
        }
    }
}

/// Counts one request against a key from before it waits until it is
/// done, acquired or not.
struct Registration<'a> {
    locks: &'a KeyLocks,
    key: String,
    mutex: Arc<Mutex<()>>,
}

impl<'a> Registration<'a> {
    fn new(locks: &'a KeyLocks, key: &str) -> Self {
        let mutex = {
            let mut slot = locks.locks.entry(key.to_string()).or_insert_with(|| Slot {
                mutex: Arc::new(Mutex::new(())),
                users: 0,
            });
            slot.users += 1;
            Arc::clone(&slot.mutex)
        };
        Self {
            locks,
            key: key.to_string(),
            mutex,
        }
    }
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        self.locks.release(&self.key);
    }
}

/// Exclusive access to one key; released on drop.
pub struct KeyGuard<'a> {
    // Field order matters: the mutex is unlocked before the entry is released.
    _guard: OwnedMutexGuard<()>,
    _registration: Registration<'a>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_entries_removed_after_release() {
        let locks = KeyLocks::new();
        {
            let _a = locks.lock("a").await;
            let _b = locks.lock("b").await;
            assert_eq!(locks.len(), 2);
        }
        assert!(locks.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_same_key_is_exclusive() {
        let locks = Arc::new(KeyLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let inside = Arc::clone(&inside);
                let max_inside = Arc::clone(&max_inside);
                tokio::spawn(async move {
                    let _guard = locks.lock("Warehouse1:TypeA:2024-01-01").await;
                    let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                    max_inside.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(2)).await;
                    inside.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_waiter_releases_entry() {
        let locks = KeyLocks::new();
        let holder = locks.lock("k").await;
        {
            let waiter = locks.lock("k");
            tokio::pin!(waiter);
            // Queue behind the holder, then give up.
            let polled = tokio::time::timeout(Duration::ZERO, &mut waiter).await;
            assert!(polled.is_err());
            drop(holder);
        }
        assert!(locks.is_empty(), "entry leaked: len={}", locks.len());
    }

    #[tokio::test]
    async fn test_cancelled_waiter_keeps_holder_entry() {
        let locks = KeyLocks::new();
        let holder = locks.lock("k").await;
        {
            let waiter = locks.lock("k");
            tokio::pin!(waiter);
            let _ = tokio::time::timeout(Duration::ZERO, &mut waiter).await;
        }
        assert_eq!(locks.len(), 1);
        drop(holder);
        assert!(locks.is_empty());

        // The key is usable again afterwards.
        let _again = locks.lock("k").await;
        assert_eq!(locks.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_distinct_keys_do_not_block() {
        let locks = KeyLocks::new();
        let _a = locks.lock("a").await;
        let b = tokio::time::timeout(Duration::from_millis(10), locks.lock("b")).await;
        assert!(b.is_ok());
    }
}
