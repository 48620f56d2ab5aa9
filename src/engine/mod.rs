use crate::error::ValidationError;
use crate::ledger::{SubmissionLedger, SubmissionRecord, validate_answer};
use crate::models::{Answer, PollDefinition, PollKey, RawAnswer, SubmissionKey};
use crate::tally::{AggregateEntry, apply_diff};
use log::{info, warn};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Result of an accepted submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub previous: Option<Answer>,
    pub current: Answer,
    pub revisions: u32,
}

impl SubmitOutcome {
    pub fn is_revision(&self) -> bool {
        self.previous.is_some()
    }
}

#[derive(Debug, Default)]
struct EngineState {
    ledger: SubmissionLedger,
    aggregates: HashMap<PollKey, AggregateEntry>,
}

/// Read-only view of the aggregates, valid while the engine lock is held.
pub struct Aggregates<'a> {
    entries: &'a HashMap<PollKey, AggregateEntry>,
}

impl Aggregates<'_> {
    pub fn get(&self, key: &PollKey) -> Option<&AggregateEntry> {
        self.entries.get(key)
    }
}

/// Submission ledger and per-poll aggregates behind a single lock, so a
/// submission's read-previous / write-record / apply-diff sequence is
/// atomic with respect to other submissions and to report reads.
#[derive(Debug, Default)]
pub struct AggregationEngine {
    state: Mutex<EngineState>,
}

impl AggregationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and records a participant's answer, replacing any earlier
    /// one. Nothing is mutated when validation fails.
    pub fn submit(
        &self,
        poll: &PollDefinition,
        key: SubmissionKey,
        raw: &RawAnswer,
    ) -> Result<SubmitOutcome, ValidationError> {
        let current = validate_answer(poll, raw).inspect_err(|e| {
            warn!("Rejected submission for {}: {}", key.poll, e);
        })?;

        let poll_key = key.poll.clone();
        let (previous, revisions) = {
            let mut state = self.state.lock();
            let state = &mut *state;
            let (previous, revisions) = state.ledger.replace(key, current.clone());
            let entry = state.aggregates.entry(poll_key.clone()).or_default();
            apply_diff(entry, poll, previous.as_ref(), &current);
            (previous, revisions)
        };

        info!("Recorded submission for {} (revision {})", poll_key, revisions);
        Ok(SubmitOutcome {
            previous,
            current,
            revisions,
        })
    }

    pub fn record(&self, key: &SubmissionKey) -> Option<SubmissionRecord> {
        self.state.lock().ledger.get(key).cloned()
    }

    /// Snapshot of one poll's aggregate; an empty entry if nobody answered yet.
    pub fn entry(&self, key: &PollKey) -> AggregateEntry {
        self.state.lock().aggregates.get(key).cloned().unwrap_or_default()
    }

    /// Runs `f` against a consistent view of every aggregate.
    pub fn read<R>(&self, f: impl FnOnce(&Aggregates<'_>) -> R) -> R {
        let state = self.state.lock();
        f(&Aggregates {
            entries: &state.aggregates,
        })
    }
}
