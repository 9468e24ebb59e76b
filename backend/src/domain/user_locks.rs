//! Per-user async mutexes.
//!
//! Writes to one user's rotation state serialise on that user's lock; users
//! never contend with each other. Idle entries are pruned on the next
//! acquisition so the registry does not grow with the user base.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use super::UserId;

/// Guard held while mutating one user's state.
pub type UserLockGuard = OwnedMutexGuard<()>;

/// Registry of per-user locks.
#[derive(Debug, Default)]
pub struct UserLocks {
    locks: Mutex<HashMap<UserId, Arc<AsyncMutex<()>>>>,
}

impl UserLocks {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `user_id`'s state.
    pub async fn acquire(&self, user_id: &UserId) -> UserLockGuard {
        let lock = self.entry(user_id);
        lock.lock_owned().await
    }

    fn entry(&self, user_id: &UserId) -> Arc<AsyncMutex<()>> {
        let mut locks = match self.locks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Only the registry holds idle locks.
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        Arc::clone(locks.entry(*user_id).or_default())
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or_default()
    }
}
