//! Running tallies for one poll and the views derived from them.
//!
//! Tallies are never recomputed from scratch: every accepted submission
//! arrives as a `(previous, current)` pair and is folded into the
//! [`AggregateEntry`] by [`apply_diff`]. The caller is responsible for
//! holding the lock that also guards the submission ledger, so the pair
//! always reflects the ledger as it was immediately before the write.

pub mod multiple;
pub mod single;
pub mod text;

use crate::models::{Answer, AnswerKind, PollDefinition};
use serde::Serialize;
use std::collections::HashMap;

/// Count of one free-text answer plus the order in which it first appeared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextTally {
    pub count: u64,
    pub first_seen: u64,
}

/// Aggregated state of one poll within one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateEntry {
    pub option_counts: HashMap<String, u64>,
    pub text_counts: HashMap<String, TextTally>,
    pub multi_choice_response_count: u64,
    next_sequence: u64,
}

impl AggregateEntry {
    pub fn option_count(&self, label: &str) -> u64 {
        self.option_counts.get(label).copied().unwrap_or(0)
    }

    #[cfg(test)]
    pub fn text_count(&self, answer: &str) -> u64 {
        self.text_counts.get(answer).map_or(0, |tally| tally.count)
    }

    // Decrement, flooring at zero. Returns whether anything changed.
    fn decrement_option(&mut self, label: &str) -> bool {
        match self.option_counts.get_mut(label) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    fn increment_option(&mut self, label: &str) {
        *self.option_counts.entry(label.to_string()).or_insert(0) += 1;
    }

    fn next_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }
}

/// Folds a participant's answer change into the poll's tallies.
///
/// `previous` is `None` for a first submission. Answers whose shape does
/// not match the poll's kind are ignored, as are unsupported kinds.
pub fn apply_diff(entry: &mut AggregateEntry, poll: &PollDefinition, previous: Option<&Answer>, current: &Answer) {
    match poll.answer_kind {
        AnswerKind::SingleChoice => single::apply(entry, poll, previous, current),
        AnswerKind::MultipleChoice => multiple::apply(entry, poll, previous, current),
        AnswerKind::Text => text::apply(entry, previous, current),
        AnswerKind::Unsupported(_) => {}
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionResult {
    pub label: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceReport {
    pub total: u64,
    pub options: Vec<OptionResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub term: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextReport {
    pub total: u64,
    pub terms: Vec<TermCount>,
}

/// Options of a choice poll in definition order with counts and
/// percentages of the poll's total.
///
/// Single choice totals voters; multiple choice totals responders, so
/// multiple-choice percentages may add up to more than 100.
pub fn project_choice_report(poll: &PollDefinition, entry: &AggregateEntry) -> ChoiceReport {
    let total = match poll.answer_kind {
        AnswerKind::SingleChoice => single::total(poll, entry),
        AnswerKind::MultipleChoice => multiple::total(entry),
        _ => 0,
    };

    let options = poll
        .options
        .iter()
        .map(|label| {
            let count = entry.option_count(label);
            OptionResult {
                label: label.clone(),
                count,
                percentage: percentage(count, total),
            }
        })
        .collect();

    ChoiceReport { total, options }
}

pub fn project_text_report(entry: &AggregateEntry) -> TextReport {
    TextReport {
        total: text::total(entry),
        terms: text::top_terms(entry, text::MAX_TERMS),
    }
}

/// `count / total` as a percentage rounded to one decimal place, with
/// exact halves going to the even neighbour.
pub fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let value = count as f64 / total as f64 * 100.0;
    (value * 10.0).round_ties_even() / 10.0
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::PollPath;

    pub(crate) fn poll(kind: AnswerKind, options: &[&str]) -> PollDefinition {
        PollDefinition {
            path: PollPath::new("s", "t", "p"),
            question: "q".to_string(),
            answer_kind: kind,
            options: options.iter().map(|label| label.to_string()).collect(),
            language: "en".to_string(),
        }
    }

    #[test]
    fn percentages_of_single_choice() {
        let poll = poll(AnswerKind::SingleChoice, &["A", "B"]);
        let mut entry = AggregateEntry::default();
        entry.option_counts.insert("A".into(), 3);
        entry.option_counts.insert("B".into(), 1);

        let report = project_choice_report(&poll, &entry);
        assert_eq!(report.total, 4);
        assert_eq!(report.options[0].percentage, 75.0);
        assert_eq!(report.options[1].percentage, 25.0);
    }

    #[test]
    fn zero_total_gives_zero_percentages() {
        let poll = poll(AnswerKind::SingleChoice, &["A", "B"]);
        let report = project_choice_report(&poll, &AggregateEntry::default());
        assert_eq!(report.total, 0);
        assert!(report.options.iter().all(|option| option.count == 0 && option.percentage == 0.0));
    }

    #[test]
    fn percentage_rounds_to_one_decimal() {
        assert_eq!(percentage(1, 3), 33.3);
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(0, 0), 0.0);
    }

    #[test]
    fn percentage_halves_round_to_even() {
        assert_eq!(percentage(1, 16), 6.2);
        assert_eq!(percentage(5, 16), 31.2);
        assert_eq!(percentage(3, 16), 18.8);
    }

    #[test]
    fn options_outside_the_definition_are_not_reported() {
        let poll = poll(AnswerKind::SingleChoice, &["A"]);
        let mut entry = AggregateEntry::default();
        entry.option_counts.insert("A".into(), 1);
        entry.option_counts.insert("Retired".into(), 5);

        let report = project_choice_report(&poll, &entry);
        assert_eq!(report.total, 1);
        assert_eq!(report.options.len(), 1);
        assert_eq!(report.options[0].percentage, 100.0);
    }

    #[test]
    fn unsupported_kinds_are_ignored() {
        let poll = poll(AnswerKind::Unsupported("ranking".into()), &["A"]);
        let mut entry = AggregateEntry::default();
        apply_diff(&mut entry, &poll, None, &Answer::Choice("A".into()));
        assert_eq!(entry, AggregateEntry::default());
    }
}
