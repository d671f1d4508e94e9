//! Per-gap serialization of stage calls

use caregap_types::GapId;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per gap. Calls on different gaps never contend.
#[derive(Debug, Default)]
pub struct GapLocks {
    locks: DashMap<GapId, Arc<Mutex<()>>>,
}

impl GapLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `gap_id`
    pub async fn acquire(&self, gap_id: &GapId) -> OwnedMutexGuard<()> {
        // Clone the Arc out so no map shard lock is held across the await
        let lock = self
            .locks
            .entry(gap_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
