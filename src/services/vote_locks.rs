use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::MovieId;

/// One async mutex per movie, serialising read-modify-write vote updates.
///
/// Entries are created lazily and dropped again once nobody holds or waits
/// for them.
#[derive(Default)]
pub struct VoteLocks {
    locks: Mutex<HashMap<MovieId, Arc<AsyncMutex<()>>>>,
}

impl VoteLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, movie: MovieId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self
                .locks
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            locks.retain(|id, lock| *id == movie || Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(movie).or_default())
        };

        lock.lock_owned().await
    }

    #[must_use]
    pub fn tracked(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_movie_is_serialised() {
        let locks = Arc::new(VoteLocks::new());
        let guard = locks.acquire(MovieId::new(1)).await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire(MovieId::new(1)).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_different_movies_do_not_block() {
        let locks = VoteLocks::new();
        let _first = locks.acquire(MovieId::new(1)).await;
        let second = tokio::time::timeout(Duration::from_secs(1), locks.acquire(MovieId::new(2)));
        assert!(second.await.is_ok());
    }

    #[tokio::test]
    async fn test_idle_entries_are_pruned() {
        let locks = VoteLocks::new();
        drop(locks.acquire(MovieId::new(1)).await);
        drop(locks.acquire(MovieId::new(2)).await);
        drop(locks.acquire(MovieId::new(3)).await);
        assert_eq!(locks.tracked(), 1);
    }
}
