use crate::catalog::PollCatalog;
use crate::models::{RunId, TopicKey};
use log::{debug, info};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Which poll of each topic is currently shown to participants, per run.
#[derive(Debug, Default)]
pub struct ActiveSelectionStore {
    active: Mutex<HashMap<TopicKey, String>>,
}

impl ActiveSelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, run: &RunId, subject: &str, topic: &str) -> Option<String> {
        self.active.lock().get(&TopicKey::new(run, subject, topic)).cloned()
    }

    /// Activates `poll_id` if it belongs to the topic. A foreign id leaves
    /// the current selection untouched and returns `false`.
    pub fn set(&self, catalog: &PollCatalog, run: &RunId, subject: &str, topic: &str, poll_id: &str) -> bool {
        if catalog.lookup(subject, topic, poll_id).is_none() {
            return false;
        }
        self.active
            .lock()
            .insert(TopicKey::new(run, subject, topic), poll_id.to_string());
        info!("Activated poll {subject}/{topic}/{poll_id} for run {run}");
        true
    }

    /// Returns the topic's active poll, initializing it to the first poll
    /// in catalog order when unset or no longer part of the topic. `None`
    /// when the topic has no polls.
    ///
    /// Check and initialization happen under one lock acquisition, so
    /// concurrent first callers all observe the same poll.
    pub fn ensure_active(&self, catalog: &PollCatalog, run: &RunId, subject: &str, topic: &str) -> Option<String> {
        let poll_ids = catalog.topic_poll_ids(subject, topic);
        let first = poll_ids.first()?;

        let mut active = self.active.lock();
        let current = active
            .entry(TopicKey::new(run, subject, topic))
            .or_insert_with(|| first.clone());
        if !poll_ids.contains(current) {
            debug!("Active poll {current} left {subject}/{topic}; resetting to {first}");
            *current = first.clone();
        }
        Some(current.clone())
    }
}
