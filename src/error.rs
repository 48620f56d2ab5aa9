use thiserror::Error;

/// The poll catalog could not be read or parsed.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read poll file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed poll catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A submission was rejected before anything was stored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no answer provided")]
    MissingAnswer,

    #[error("answer is not one of the poll's options")]
    InvalidAnswer,

    #[error("unsupported answer type: {0}")]
    UnsupportedAnswerType(String),
}

impl ValidationError {
    /// Key of the localized message shown to the participant.
    pub fn message_key(&self) -> &'static str {
        match self {
            // An invalid choice is treated as if nothing was chosen.
            ValidationError::MissingAnswer | ValidationError::InvalidAnswer => "missing_answer",
            ValidationError::UnsupportedAnswerType(_) => "unsupported_answer_type",
        }
    }
}

#[derive(Error, Debug)]
pub enum PollError {
    #[error("no such run, subject, topic or poll")]
    NotFound,

    #[error("poll {poll_id} does not belong to topic {subject}/{topic}")]
    InvalidActivation {
        subject: String,
        topic: String,
        poll_id: String,
    },
}
