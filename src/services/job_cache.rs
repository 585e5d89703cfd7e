use std::sync::{Mutex, MutexGuard};

use serde::Serialize;

use crate::domain::EnrichedLead;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum JobSnapshot {
    Empty,
    Pending {
        role: String,
        industry: String,
    },
    Ready {
        role: String,
        industry: String,
        leads: Vec<EnrichedLead>,
    },
}

struct CacheState {
    generation: u64,
    snapshot: JobSnapshot,
}

/// Results of the most recent submission. A new submission invalidates
/// whatever was there, and a job that finishes after a newer one started
/// does not overwrite it.
pub struct JobResultCache {
    state: Mutex<CacheState>,
}

impl Default for JobResultCache {
    fn default() -> Self {
        JobResultCache {
            state: Mutex::new(CacheState {
                generation: 0,
                snapshot: JobSnapshot::Empty,
            }),
        }
    }
}

impl JobResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Marks a new submission as pending and returns its ticket.
    pub fn begin(&self, role: &str, industry: &str) -> u64 {
        let mut state = self.lock();
        state.generation += 1;
        state.snapshot = JobSnapshot::Pending {
            role: role.to_string(),
            industry: industry.to_string(),
        };
        state.generation
    }

    /// Stores results for `ticket`. Returns false if a newer submission
    /// already replaced it.
    pub fn finish(&self, ticket: u64, leads: Vec<EnrichedLead>) -> bool {
        let mut state = self.lock();
        if state.generation != ticket {
            return false;
        }
        let (role, industry) = match &state.snapshot {
            JobSnapshot::Pending { role, industry } | JobSnapshot::Ready { role, industry, .. } => {
                (role.clone(), industry.clone())
            }
            JobSnapshot::Empty => (String::new(), String::new()),
        };
        state.snapshot = JobSnapshot::Ready {
            role,
            industry,
            leads,
        };
        true
    }

    pub fn snapshot(&self) -> JobSnapshot {
        self.lock().snapshot.clone()
    }
}
