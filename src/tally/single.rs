use super::AggregateEntry;
use crate::models::{Answer, PollDefinition};

/// Moves one vote from the previous choice (if any) to the current one.
/// When both are the same option the two steps cancel out.
pub fn apply(entry: &mut AggregateEntry, poll: &PollDefinition, previous: Option<&Answer>, current: &Answer) {
    let Answer::Choice(current) = current else {
        return;
    };

    if let Some(Answer::Choice(previous)) = previous {
        entry.decrement_option(previous);
    }
    if poll.has_option(current) {
        entry.increment_option(current);
    }
}

/// Number of voters, counted over the options the poll still defines.
pub fn total(poll: &PollDefinition, entry: &AggregateEntry) -> u64 {
    poll.options.iter().map(|label| entry.option_count(label)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnswerKind;
    use crate::tally::tests::poll;

    fn choice(label: &str) -> Answer {
        Answer::Choice(label.to_string())
    }

    #[test]
    fn revision_moves_exactly_one_vote() {
        let poll = poll(AnswerKind::SingleChoice, &["A", "B"]);
        let mut entry = AggregateEntry::default();

        apply(&mut entry, &poll, None, &choice("A"));
        apply(&mut entry, &poll, None, &choice("A"));
        assert_eq!(total(&poll, &entry), 2);

        apply(&mut entry, &poll, Some(&choice("A")), &choice("B"));
        assert_eq!(entry.option_count("A"), 1);
        assert_eq!(entry.option_count("B"), 1);
        assert_eq!(total(&poll, &entry), 2);
    }

    #[test]
    fn resubmitting_the_same_choice_is_net_zero() {
        let poll = poll(AnswerKind::SingleChoice, &["A", "B"]);
        let mut entry = AggregateEntry::default();

        apply(&mut entry, &poll, None, &choice("A"));
        apply(&mut entry, &poll, Some(&choice("A")), &choice("A"));
        assert_eq!(entry.option_count("A"), 1);
        assert_eq!(total(&poll, &entry), 1);
    }

    #[test]
    fn stale_previous_never_goes_negative() {
        let poll = poll(AnswerKind::SingleChoice, &["A", "B"]);
        let mut entry = AggregateEntry::default();

        apply(&mut entry, &poll, Some(&choice("A")), &choice("B"));
        assert_eq!(entry.option_count("A"), 0);
        assert_eq!(entry.option_count("B"), 1);
    }

    #[test]
    fn mismatched_answer_shape_is_ignored() {
        let poll = poll(AnswerKind::SingleChoice, &["A"]);
        let mut entry = AggregateEntry::default();
        apply(&mut entry, &poll, None, &Answer::Text("A".into()));
        assert_eq!(total(&poll, &entry), 0);
    }
}
