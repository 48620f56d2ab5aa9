use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The shape of answer a poll collects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnswerKind {
    SingleChoice,
    MultipleChoice,
    Text,
    /// Anything the catalog declares that we do not know how to tally.
    Unsupported(String),
}

impl AnswerKind {
    pub fn as_str(&self) -> &str {
        match self {
            AnswerKind::SingleChoice => "single_choice",
            AnswerKind::MultipleChoice => "multiple_choice",
            AnswerKind::Text => "text",
            AnswerKind::Unsupported(kind) => kind,
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(self, AnswerKind::SingleChoice | AnswerKind::MultipleChoice)
    }
}

impl From<String> for AnswerKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "single_choice" => AnswerKind::SingleChoice,
            "multiple_choice" => AnswerKind::MultipleChoice,
            "text" => AnswerKind::Text,
            _ => AnswerKind::Unsupported(value),
        }
    }
}

impl From<AnswerKind> for String {
    fn from(kind: AnswerKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for AnswerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog position of a poll: (subject, topic, poll).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PollPath {
    pub subject: String,
    pub topic: String,
    pub poll: String,
}

impl PollPath {
    pub fn new(subject: impl Into<String>, topic: impl Into<String>, poll: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            topic: topic.into(),
            poll: poll.into(),
        }
    }

    pub fn url(&self) -> String {
        format!("/{}/{}/{}", self.subject, self.topic, self.poll)
    }
}

impl fmt::Display for PollPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.subject, self.topic, self.poll)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PollDefinition {
    pub path: PollPath,
    pub question: String,
    pub answer_kind: AnswerKind,
    pub options: Vec<String>,
    pub language: String,
}

impl PollDefinition {
    pub fn has_option(&self, label: &str) -> bool {
        self.options.iter().any(|option| option == label)
    }
}

/// Canonical run identifier. Only constructible from a valid UUID.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(String);

impl RunId {
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw)
            .ok()
            .map(|uuid| Self(uuid.hyphenated().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of the active poll pointer for one topic within a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicKey {
    pub run: RunId,
    pub subject: String,
    pub topic: String,
}

impl TopicKey {
    pub fn new(run: &RunId, subject: &str, topic: &str) -> Self {
        Self {
            run: run.clone(),
            subject: subject.to_string(),
            topic: topic.to_string(),
        }
    }
}

/// Key of one poll's aggregate within a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PollKey {
    pub run: RunId,
    pub path: PollPath,
}

impl PollKey {
    pub fn new(run: &RunId, path: &PollPath) -> Self {
        Self {
            run: run.clone(),
            path: path.clone(),
        }
    }
}

impl fmt::Display for PollKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.run, self.path)
    }
}

/// Key of one participant's submission record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubmissionKey {
    pub poll: PollKey,
    pub participant: String,
}

impl SubmissionKey {
    pub fn new(poll: PollKey, participant: impl Into<String>) -> Self {
        Self {
            poll,
            participant: participant.into(),
        }
    }
}

/// A validated answer as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Answer {
    Text(String),
    Choice(String),
    Choices(Vec<String>),
}

impl Answer {
    pub fn display(&self) -> String {
        match self {
            Answer::Text(value) | Answer::Choice(value) => value.clone(),
            Answer::Choices(values) => values.join(", "),
        }
    }

    pub fn selected(&self) -> Vec<String> {
        match self {
            Answer::Text(_) => Vec::new(),
            Answer::Choice(value) => vec![value.clone()],
            Answer::Choices(values) => values.clone(),
        }
    }
}

/// Unvalidated input as it arrives from a participant.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAnswer {
    #[serde(default)]
    pub answer_text: Option<String>,
    #[serde(default)]
    pub answer_choice: Option<String>,
    #[serde(default)]
    pub answer_choices: Vec<String>,
}
