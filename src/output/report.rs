//! Probe report types

use crate::detectors::Detection;
use crate::engine::Outcome;
use crate::ident::Identifier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One detector's entry in a report, in resolved order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeRecord {
    pub id: Identifier,
    #[serde(flatten)]
    pub outcome: Outcome<Detection>,
}

/// The full result of evaluating a capability registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeReport {
    pub probed_at: DateTime<Utc>,
    pub results: Vec<ProbeRecord>,
}

impl ProbeReport {
    pub fn new(results: Vec<ProbeRecord>) -> Self {
        Self {
            probed_at: Utc::now(),
            results,
        }
    }

    pub fn record(&self, name: &str) -> Option<&ProbeRecord> {
        self.results.iter().find(|r| r.id.as_str() == name)
    }

    pub fn failed_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| !r.outcome.is_succeeded())
            .count()
    }
}
