mod source;

pub use source::{PollSource, StaticSource, YamlFileSource};

use crate::error::ConfigError;
use crate::locale::normalize_language;
use crate::models::{AnswerKind, PollDefinition, PollPath};
use serde::Deserialize;
use std::collections::HashMap;

const LEGACY_SUBJECT: &str = "general";
const LEGACY_TOPIC: &str = "general";

// Raw YAML shapes. Everything is optional so that a partially filled
// catalog still loads; incomplete entries are skipped during flattening.
#[derive(Debug, Default, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    polls: Vec<RawPoll>,
    #[serde(default)]
    subjects: Vec<RawSubject>,
}

#[derive(Debug, Deserialize)]
struct RawSubject {
    id: Option<String>,
    language: Option<String>,
    #[serde(default)]
    topics: Vec<RawTopic>,
}

#[derive(Debug, Deserialize)]
struct RawTopic {
    id: Option<String>,
    #[serde(default)]
    polls: Vec<RawPoll>,
}

#[derive(Debug, Deserialize)]
struct RawPoll {
    id: Option<String>,
    question: Option<String>,
    answer_type: Option<String>,
    #[serde(default)]
    answers: Vec<String>,
}

/// Immutable set of poll definitions, kept in declaration order.
#[derive(Debug, Clone, Default)]
pub struct PollCatalog {
    polls: Vec<PollDefinition>,
    index: HashMap<PollPath, usize>,
}

impl PollCatalog {
    /// Parses a catalog in either the flat legacy shape, the grouped
    /// subject/topic shape, or both at once.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to `None`.
        let raw: Option<RawCatalog> = serde_yaml::from_str(contents)?;
        Ok(Self::flatten(raw.unwrap_or_default()))
    }

    fn flatten(raw: RawCatalog) -> Self {
        let mut catalog = Self::default();

        for poll in raw.polls {
            if let Some(definition) = build_definition(LEGACY_SUBJECT, LEGACY_TOPIC, "en", poll) {
                catalog.insert(definition);
            }
        }

        for subject in raw.subjects {
            let language = normalize_language(subject.language.as_deref());
            let Some(subject_id) = subject.id.filter(|id| !id.is_empty()) else {
                continue;
            };
            for topic in subject.topics {
                let Some(topic_id) = topic.id.filter(|id| !id.is_empty()) else {
                    continue;
                };
                for poll in topic.polls {
                    if let Some(definition) = build_definition(&subject_id, &topic_id, language, poll) {
                        catalog.insert(definition);
                    }
                }
            }
        }

        catalog
    }

    // A repeated path replaces the earlier definition but keeps its position.
    fn insert(&mut self, definition: PollDefinition) {
        match self.index.get(&definition.path) {
            Some(&position) => self.polls[position] = definition,
            None => {
                self.index.insert(definition.path.clone(), self.polls.len());
                self.polls.push(definition);
            }
        }
    }

    pub fn get(&self, path: &PollPath) -> Option<&PollDefinition> {
        self.index.get(path).map(|&position| &self.polls[position])
    }

    pub fn lookup(&self, subject: &str, topic: &str, poll: &str) -> Option<&PollDefinition> {
        self.get(&PollPath::new(subject, topic, poll))
    }

    /// Poll ids of a topic in declaration order. The first one is the
    /// default active poll.
    pub fn topic_poll_ids(&self, subject: &str, topic: &str) -> Vec<String> {
        self.topic_polls(subject, topic)
            .map(|definition| definition.path.poll.clone())
            .collect()
    }

    pub fn topic_polls<'a>(
        &'a self,
        subject: &'a str,
        topic: &'a str,
    ) -> impl Iterator<Item = &'a PollDefinition> + 'a {
        self.polls
            .iter()
            .filter(move |definition| definition.path.subject == subject && definition.path.topic == topic)
    }

    /// Language of the first poll declared under `subject`.
    pub fn subject_language(&self, subject: &str) -> Option<&str> {
        self.polls
            .iter()
            .find(|definition| definition.path.subject == subject)
            .map(|definition| definition.language.as_str())
    }

    /// All definitions in declaration order.
    pub fn polls(&self) -> &[PollDefinition] {
        &self.polls
    }

    /// All definitions ordered by (subject, topic, poll).
    pub fn sorted(&self) -> Vec<&PollDefinition> {
        let mut sorted: Vec<&PollDefinition> = self.polls.iter().collect();
        sorted.sort_by(|a, b| a.path.cmp(&b.path));
        sorted
    }

    pub fn len(&self) -> usize {
        self.polls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polls.is_empty()
    }
}

fn build_definition(subject: &str, topic: &str, language: &str, poll: RawPoll) -> Option<PollDefinition> {
    let poll_id = poll.id.filter(|id| !id.is_empty())?;
    Some(PollDefinition {
        question: poll.question.unwrap_or_else(|| poll_id.clone()),
        path: PollPath::new(subject, topic, poll_id),
        answer_kind: AnswerKind::from(poll.answer_type.unwrap_or_default()),
        options: poll.answers,
        language: language.to_string(),
    })
}
