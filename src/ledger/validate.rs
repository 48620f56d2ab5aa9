use crate::error::ValidationError;
use crate::models::{Answer, AnswerKind, PollDefinition, RawAnswer};

/// Turns raw participant input into the answer that will be stored.
pub fn validate_answer(poll: &PollDefinition, raw: &RawAnswer) -> Result<Answer, ValidationError> {
    match &poll.answer_kind {
        AnswerKind::Text => {
            let text = raw.answer_text.as_deref().unwrap_or_default().trim();
            if text.is_empty() {
                return Err(ValidationError::MissingAnswer);
            }
            Ok(Answer::Text(text.to_string()))
        }
        AnswerKind::SingleChoice => {
            let choice = raw.answer_choice.as_deref().unwrap_or_default().trim();
            if choice.is_empty() {
                return Err(ValidationError::MissingAnswer);
            }
            if !poll.has_option(choice) {
                return Err(ValidationError::InvalidAnswer);
            }
            Ok(Answer::Choice(choice.to_string()))
        }
        AnswerKind::MultipleChoice => {
            let mut selected: Vec<String> = Vec::new();
            for candidate in &raw.answer_choices {
                if poll.has_option(candidate) && !selected.contains(candidate) {
                    selected.push(candidate.clone());
                }
            }
            if selected.is_empty() {
                return Err(ValidationError::MissingAnswer);
            }
            Ok(Answer::Choices(selected))
        }
        AnswerKind::Unsupported(kind) => Err(ValidationError::UnsupportedAnswerType(kind.clone())),
    }
}
