use super::AggregateEntry;
use crate::models::{Answer, PollDefinition};
use std::collections::BTreeSet;

fn selection(answer: Option<&Answer>) -> BTreeSet<&str> {
    match answer {
        Some(Answer::Choices(choices)) => choices.iter().map(String::as_str).collect(),
        _ => BTreeSet::new(),
    }
}

/// Applies a change of selection.
///
/// The responder count only moves when a participant goes from no
/// selection to some selection or back. Option counts are adjusted by
/// taking one away from every previously selected option and adding one
/// to every currently selected option, so options kept across a revision
/// net to zero.
pub fn apply(entry: &mut AggregateEntry, poll: &PollDefinition, previous: Option<&Answer>, current: &Answer) {
    let previous = selection(previous);
    let current = selection(Some(current));

    match (previous.is_empty(), current.is_empty()) {
        (true, false) => entry.multi_choice_response_count += 1,
        (false, true) => {
            entry.multi_choice_response_count = entry.multi_choice_response_count.saturating_sub(1);
        }
        _ => {}
    }

    for label in &previous {
        entry.decrement_option(label);
    }
    for label in &current {
        if poll.has_option(label) {
            entry.increment_option(label);
        }
    }
}

/// Number of responders, regardless of how many options each selected.
pub fn total(entry: &AggregateEntry) -> u64 {
    entry.multi_choice_response_count
}
