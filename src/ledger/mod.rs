mod validate;

pub use validate::validate_answer;

use crate::models::{Answer, SubmissionKey};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A participant's current answer to one poll.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRecord {
    pub answer: Answer,
    pub first_submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub revisions: u32,
}

/// At most one live record per (run, poll, participant).
///
/// The ledger is not synchronized on its own; it lives next to the
/// aggregates inside the engine's lock.
#[derive(Debug, Default)]
pub struct SubmissionLedger {
    records: HashMap<SubmissionKey, SubmissionRecord>,
}

impl SubmissionLedger {
    pub fn get(&self, key: &SubmissionKey) -> Option<&SubmissionRecord> {
        self.records.get(key)
    }

    #[cfg(test)]
    pub fn has_submitted(&self, key: &SubmissionKey) -> bool {
        self.records.contains_key(key)
    }

    /// Stores `answer` as the participant's current answer and returns the
    /// answer it replaced.
    pub fn replace(&mut self, key: SubmissionKey, answer: Answer) -> (Option<Answer>, u32) {
        let now = Utc::now();
        match self.records.get_mut(&key) {
            Some(record) => {
                let previous = std::mem::replace(&mut record.answer, answer);
                record.updated_at = now;
                record.revisions += 1;
                (Some(previous), record.revisions)
            }
            None => {
                self.records.insert(
                    key,
                    SubmissionRecord {
                        answer,
                        first_submitted_at: now,
                        updated_at: now,
                        revisions: 1,
                    },
                );
                (None, 1)
            }
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PollKey, PollPath, RunId};

    fn key(participant: &str) -> SubmissionKey {
        let run = RunId::parse("9430e003-162c-4f85-aac0-408211a62f01").unwrap();
        SubmissionKey::new(PollKey::new(&run, &PollPath::new("s", "t", "p")), participant)
    }

    #[test]
    fn replaces_instead_of_appending() {
        let mut ledger = SubmissionLedger::default();
        assert!(!ledger.has_submitted(&key("ada")));

        let (previous, revisions) = ledger.replace(key("ada"), Answer::Choice("A".into()));
        assert_eq!(previous, None);
        assert_eq!(revisions, 1);

        let (previous, revisions) = ledger.replace(key("ada"), Answer::Choice("B".into()));
        assert_eq!(previous, Some(Answer::Choice("A".into())));
        assert_eq!(revisions, 2);

        assert_eq!(ledger.len(), 1);
        let record = ledger.get(&key("ada")).unwrap();
        assert_eq!(record.answer, Answer::Choice("B".into()));
        assert!(record.updated_at >= record.first_submitted_at);
    }

    #[test]
    fn participants_are_independent() {
        let mut ledger = SubmissionLedger::default();
        ledger.replace(key("ada"), Answer::Text("one".into()));
        ledger.replace(key("grace"), Answer::Text("two".into()));
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.get(&key("grace")).unwrap().revisions, 1);
    }
}
