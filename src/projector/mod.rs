use crate::catalog::PollCatalog;
use crate::engine::{AggregationEngine, Aggregates};
use crate::models::{AnswerKind, PollDefinition, PollKey, RunId};
use crate::tally::{AggregateEntry, OptionResult, TermCount, project_choice_report, project_text_report};
use serde::Serialize;

/// One dashboard row for one poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollReport {
    pub subject: String,
    pub topic: String,
    pub poll_id: String,
    pub question: String,
    pub answer_type: AnswerKind,
    pub path: String,
    pub language: String,
    pub total_responses: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<OptionResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms: Option<Vec<TermCount>>,
}

/// Builds dashboard rows from catalog metadata and the engine's tallies.
pub struct ResultsProjector<'a> {
    catalog: &'a PollCatalog,
    engine: &'a AggregationEngine,
}

impl<'a> ResultsProjector<'a> {
    pub fn new(catalog: &'a PollCatalog, engine: &'a AggregationEngine) -> Self {
        Self { catalog, engine }
    }

    /// Rows for every poll of a topic, in catalog order. Empty when the
    /// topic has no polls.
    pub fn topic(&self, run: &RunId, subject: &str, topic: &str) -> Vec<PollReport> {
        self.engine.read(|aggregates| {
            self.catalog
                .topic_polls(subject, topic)
                .map(|poll| project(run, poll, aggregates))
                .collect()
        })
    }

    /// Rows for every poll in the catalog, ordered by (subject, topic, poll).
    pub fn all(&self, run: &RunId) -> Vec<PollReport> {
        self.engine.read(|aggregates| {
            self.catalog
                .sorted()
                .into_iter()
                .map(|poll| project(run, poll, aggregates))
                .collect()
        })
    }

    pub fn poll(&self, run: &RunId, subject: &str, topic: &str, poll_id: &str) -> Option<PollReport> {
        let poll = self.catalog.lookup(subject, topic, poll_id)?;
        Some(self.engine.read(|aggregates| project(run, poll, aggregates)))
    }
}

fn project(run: &RunId, poll: &PollDefinition, aggregates: &Aggregates<'_>) -> PollReport {
    let empty = AggregateEntry::default();
    let entry = aggregates.get(&PollKey::new(run, &poll.path)).unwrap_or(&empty);

    let mut report = PollReport {
        subject: poll.path.subject.clone(),
        topic: poll.path.topic.clone(),
        poll_id: poll.path.poll.clone(),
        question: poll.question.clone(),
        answer_type: poll.answer_kind.clone(),
        path: poll.path.url(),
        language: poll.language.clone(),
        total_responses: 0,
        options: None,
        terms: None,
    };

    match poll.answer_kind {
        AnswerKind::SingleChoice | AnswerKind::MultipleChoice => {
            let choices = project_choice_report(poll, entry);
            report.total_responses = choices.total;
            report.options = Some(choices.options);
        }
        AnswerKind::Text => {
            let text = project_text_report(entry);
            report.total_responses = text.total;
            report.terms = Some(text.terms);
        }
        // A misconfigured poll still gets a row so the dashboard renders.
        AnswerKind::Unsupported(_) => {}
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample;
    use crate::models::{PollPath, RawAnswer, SubmissionKey};

    fn run() -> RunId {
        RunId::parse("9430e003-162c-4f85-aac0-408211a62f01").unwrap()
    }

    fn submit(engine: &AggregationEngine, catalog: &PollCatalog, poll: &str, participant: &str, raw: RawAnswer) {
        let definition = catalog.lookup("physics", "optics", poll).unwrap();
        let key = SubmissionKey::new(PollKey::new(&run(), &definition.path), participant);
        engine.submit(definition, key, &raw).unwrap();
    }

    #[test]
    fn topic_rows_follow_catalog_order() {
        let catalog = sample();
        let engine = AggregationEngine::new();
        let rows = ResultsProjector::new(&catalog, &engine).topic(&run(), "physics", "optics");

        let ids: Vec<&str> = rows.iter().map(|row| row.poll_id.as_str()).collect();
        assert_eq!(ids, vec!["lens", "colours", "feeling", "ranking"]);
        assert!(rows.iter().all(|row| row.total_responses == 0));
        assert_eq!(rows[0].path, "/physics/optics/lens");
        assert_eq!(rows[0].language, "de");
    }

    #[test]
    fn rows_carry_the_projection_for_their_kind() {
        let catalog = sample();
        let engine = AggregationEngine::new();
        submit(&engine, &catalog, "lens", "ada", RawAnswer {
            answer_choice: Some("Convex".into()),
            ..RawAnswer::default()
        });
        submit(&engine, &catalog, "colours", "ada", RawAnswer {
            answer_choices: vec!["Red".into(), "Blue".into()],
            ..RawAnswer::default()
        });
        submit(&engine, &catalog, "feeling", "ada", RawAnswer {
            answer_text: Some("bright".into()),
            ..RawAnswer::default()
        });

        let rows = ResultsProjector::new(&catalog, &engine).topic(&run(), "physics", "optics");

        let lens = &rows[0];
        assert_eq!(lens.total_responses, 1);
        let options = lens.options.as_ref().unwrap();
        assert_eq!(options[0].percentage, 100.0);
        assert_eq!(options[1].percentage, 0.0);
        assert!(lens.terms.is_none());

        let colours = &rows[1];
        assert_eq!(colours.total_responses, 1);
        let counts: Vec<u64> = colours.options.as_ref().unwrap().iter().map(|option| option.count).collect();
        assert_eq!(counts, vec![1, 0, 1, 0]);

        let feeling = &rows[2];
        assert_eq!(feeling.total_responses, 1);
        assert_eq!(feeling.terms.as_ref().unwrap()[0].term, "bright");

        let ranking = &rows[3];
        assert_eq!(ranking.total_responses, 0);
        assert!(ranking.options.is_none() && ranking.terms.is_none());
    }

    #[test]
    fn unsupported_rows_serialize_without_breakdown() {
        let catalog = sample();
        let engine = AggregationEngine::new();
        let row = ResultsProjector::new(&catalog, &engine)
            .poll(&run(), "physics", "optics", "ranking")
            .unwrap();
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["answer_type"], "ranking");
        assert_eq!(json["total_responses"], 0);
        assert!(json.get("options").is_none());
        assert!(json.get("terms").is_none());
    }

    #[test]
    fn all_rows_are_sorted_by_path() {
        let catalog = sample();
        let engine = AggregationEngine::new();
        let rows = ResultsProjector::new(&catalog, &engine).all(&run());
        assert_eq!(rows.len(), catalog.len());
        let paths: Vec<PollPath> = rows
            .iter()
            .map(|row| PollPath::new(&row.subject, &row.topic, &row.poll_id))
            .collect();
        let mut sorted = paths.clone();
        sorted.sort();
        assert_eq!(paths, sorted);
    }
}
