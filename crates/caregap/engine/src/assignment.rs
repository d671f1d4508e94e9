//! Coordinator routing by priority tier

use caregap_types::{CoordinatorId, Priority};
use dashmap::DashMap;
use tracing::{debug, warn};

use crate::config::AssignmentConfig;

/// Tracks open-gap load per coordinator and picks assignees.
///
/// P1 goes to the senior pool, P2 to the mid pool, everything else to the
/// general pool. Within a pool the least-loaded coordinator under capacity
/// wins; ties go to the earlier pool entry.
#[derive(Debug)]
pub struct CoordinatorRoster {
    config: AssignmentConfig,
    load: DashMap<CoordinatorId, usize>,
}

impl CoordinatorRoster {
    pub fn new(config: AssignmentConfig) -> Self {
        Self {
            config,
            load: DashMap::new(),
        }
    }

    pub fn pool_for(&self, priority: Priority) -> &[CoordinatorId] {
        match priority {
            Priority::P1 => &self.config.senior_pool,
            Priority::P2 => &self.config.mid_pool,
            Priority::P3 | Priority::P4 => &self.config.general_pool,
        }
    }

    pub fn active_load(&self, coordinator: &CoordinatorId) -> usize {
        self.load.get(coordinator).map(|l| *l).unwrap_or(0)
    }

    /// Reserve a slot for a new gap. `None` when the whole pool is full.
    pub fn assign(&self, priority: Priority) -> Option<CoordinatorId> {
        let capacity = self.config.max_active_per_coordinator;

        for _ in 0..self.pool_for(priority).len().max(1) {
            let candidate = self
                .pool_for(priority)
                .iter()
                .map(|c| (c, self.active_load(c)))
                .filter(|(_, load)| *load < capacity)
                .min_by_key(|(_, load)| *load)
                .map(|(c, _)| c.clone());

            let Some(coordinator) = candidate else {
                debug!(priority = %priority, "No coordinator available with capacity");
                return None;
            };

            // Re-check under the entry lock; another caller may have taken the slot
            let mut load = self.load.entry(coordinator.clone()).or_insert(0);
            if *load < capacity {
                *load += 1;
                debug!(coordinator = %coordinator, load = *load, "Coordinator slot reserved");
                return Some(coordinator);
            }
        }

        warn!(priority = %priority, "Coordinator pool saturated during assignment");
        None
    }

    /// Return a slot when a gap leaves the open workload
    pub fn release(&self, coordinator: &CoordinatorId) {
        if let Some(mut load) = self.load.get_mut(coordinator) {
            *load = load.saturating_sub(1);
        }
    }
}
