use super::{AggregateEntry, TermCount, TextTally};
use crate::models::Answer;
use std::collections::HashMap;

pub const MAX_TERMS: usize = 40;

/// Replaces the previous text answer with the current one. Terms whose
/// count drops to zero are removed.
pub fn apply(entry: &mut AggregateEntry, previous: Option<&Answer>, current: &Answer) {
    let Answer::Text(current) = current else {
        return;
    };

    if let Some(Answer::Text(previous)) = previous {
        if !previous.is_empty() {
            if let Some(tally) = entry.text_counts.get_mut(previous.as_str()) {
                tally.count = tally.count.saturating_sub(1);
                if tally.count == 0 {
                    entry.text_counts.remove(previous.as_str());
                }
            }
        }
    }

    if let Some(tally) = entry.text_counts.get_mut(current.as_str()) {
        tally.count += 1;
    } else {
        let first_seen = entry.next_sequence();
        entry
            .text_counts
            .insert(current.clone(), TextTally { count: 1, first_seen });
    }
}

pub fn total(entry: &AggregateEntry) -> u64 {
    entry.text_counts.values().map(|tally| tally.count).sum()
}

/// The `limit` most frequent answers.
///
/// Ties are broken by first appearance (a term that disappears and comes
/// back counts as new), then lexicographically.
pub fn top_terms(entry: &AggregateEntry, limit: usize) -> Vec<TermCount> {
    // Answers are trimmed on submission; merging on the trimmed form keeps
    // the ranking sane even if an untrimmed term slipped in.
    let mut merged: HashMap<&str, TextTally> = HashMap::new();
    for (answer, tally) in &entry.text_counts {
        let term = answer.trim();
        if tally.count == 0 || term.is_empty() {
            continue;
        }
        merged
            .entry(term)
            .and_modify(|existing| {
                existing.count += tally.count;
                existing.first_seen = existing.first_seen.min(tally.first_seen);
            })
            .or_insert(*tally);
    }

    let mut ranked: Vec<(&str, TextTally)> = merged.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.count
            .cmp(&a.1.count)
            .then(a.1.first_seen.cmp(&b.1.first_seen))
            .then(a.0.cmp(b.0))
    });

    ranked
        .into_iter()
        .take(limit)
        .map(|(term, tally)| TermCount {
            term: term.to_string(),
            count: tally.count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tally::project_text_report;

    fn text(value: &str) -> Answer {
        Answer::Text(value.to_string())
    }

    #[test]
    fn revising_to_zero_removes_the_term() {
        let mut entry = AggregateEntry::default();
        apply(&mut entry, None, &text("light"));
        apply(&mut entry, Some(&text("light")), &text("waves"));

        assert!(!entry.text_counts.contains_key("light"));
        assert_eq!(entry.text_count("waves"), 1);

        let report = project_text_report(&entry);
        assert_eq!(report.total, 1);
        assert_eq!(report.terms, vec![TermCount { term: "waves".into(), count: 1 }]);
    }

    #[test]
    fn same_answer_twice_is_net_zero() {
        let mut entry = AggregateEntry::default();
        apply(&mut entry, None, &text("light"));
        apply(&mut entry, Some(&text("light")), &text("light"));
        assert_eq!(entry.text_count("light"), 1);
        assert_eq!(total(&entry), 1);
    }

    #[test]
    fn ties_break_by_first_appearance() {
        let mut entry = AggregateEntry::default();
        for answer in ["zeta", "alpha", "mid", "alpha", "zeta"] {
            apply(&mut entry, None, &text(answer));
        }

        let terms: Vec<String> = top_terms(&entry, MAX_TERMS).into_iter().map(|term| term.term).collect();
        assert_eq!(terms, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn ranking_is_capped() {
        let mut entry = AggregateEntry::default();
        for i in 0..(MAX_TERMS + 10) {
            apply(&mut entry, None, &text(&format!("term{i}")));
        }
        let report = project_text_report(&entry);
        assert_eq!(report.terms.len(), MAX_TERMS);
        assert_eq!(report.total, (MAX_TERMS + 10) as u64);
        assert_eq!(report.terms[0].term, "term0");
    }

    #[test]
    fn untrimmed_variants_merge() {
        let mut entry = AggregateEntry::default();
        apply(&mut entry, None, &text("light"));
        apply(&mut entry, None, &text(" light "));
        let terms = top_terms(&entry, MAX_TERMS);
        assert_eq!(terms, vec![TermCount { term: "light".into(), count: 2 }]);
    }
}
