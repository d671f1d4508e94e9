//! Rolling record of recent predictions

use caregap_types::ProbabilitySource;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const DEFAULT_MONITOR_CAPACITY: usize = 10_000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub probability: f64,
    pub source: ProbabilitySource,
    pub model_version: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorSummary {
    pub count: usize,
    pub mean_probability: f64,
    /// Share of predictions served by the heuristic fallback
    pub fallback_rate: f64,
}

/// Bounded ring of predictions; oldest entries are evicted first
#[derive(Debug)]
pub struct PredictionMonitor {
    capacity: usize,
    records: Mutex<VecDeque<PredictionRecord>>,
}

impl Default for PredictionMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_MONITOR_CAPACITY)
    }
}

impl PredictionMonitor {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            records: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
        }
    }

    pub fn record(&self, record: PredictionRecord) {
        let mut records = self.records.lock();
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(record);
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Most recent predictions, newest first
    pub fn recent(&self, limit: usize) -> Vec<PredictionRecord> {
        self.records.lock().iter().rev().take(limit).cloned().collect()
    }

    pub fn summary(&self) -> MonitorSummary {
        let records = self.records.lock();
        if records.is_empty() {
            return MonitorSummary::default();
        }
        let count = records.len();
        let total: f64 = records.iter().map(|r| r.probability).sum();
        let fallbacks = records
            .iter()
            .filter(|r| r.source == ProbabilitySource::Heuristic)
            .count();

        MonitorSummary {
            count,
            mean_probability: total / count as f64,
            fallback_rate: fallbacks as f64 / count as f64,
        }
    }
}
