use super::{Participant, RunQuery};
use crate::catalog::PollCatalog;
use crate::error::PollError;
use crate::locale::{message, ui_texts};
use crate::models::{Answer, AnswerKind, PollDefinition, PollKey, RawAnswer, RunId, SubmissionKey};
use crate::server::error::ApiResult;
use crate::server::state::AppState;
use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Everything a participant page needs to render the active poll.
#[derive(Debug, Serialize)]
pub struct ParticipantView {
    pub run_id: String,
    pub subject: String,
    pub topic: String,
    pub poll_id: String,
    pub question: String,
    pub answer_type: AnswerKind,
    pub options: Vec<String>,
    pub language: String,
    pub submitted_answer: Option<Answer>,
    pub submitted_answer_display: Option<String>,
    pub selected_answers: Vec<String>,
    pub first_submitted_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub revisions: u32,
    pub already_submitted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revised: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub ui: BTreeMap<&'static str, &'static str>,
}

struct ActivePoll {
    run: RunId,
    definition: PollDefinition,
}

impl ActivePoll {
    async fn resolve(state: &AppState, query: &RunQuery, subject: &str, topic: &str) -> ApiResult<Self> {
        let run = query.run()?;
        let catalog: PollCatalog = state.catalog().await?;
        let poll_id = state
            .selections
            .ensure_active(&catalog, &run, subject, topic)
            .ok_or(PollError::NotFound)?;
        let definition = catalog
            .lookup(subject, topic, &poll_id)
            .cloned()
            .ok_or(PollError::NotFound)?;
        Ok(Self { run, definition })
    }

    fn submission_key(&self, participant: &Participant) -> SubmissionKey {
        SubmissionKey::new(PollKey::new(&self.run, &self.definition.path), participant.token.clone())
    }

    fn view(&self, state: &AppState, participant: &Participant) -> ParticipantView {
        let record = state.engine.record(&self.submission_key(participant));
        let definition = &self.definition;
        let answer = record.as_ref().map(|record| record.answer.clone());

        ParticipantView {
            run_id: self.run.to_string(),
            subject: definition.path.subject.clone(),
            topic: definition.path.topic.clone(),
            poll_id: definition.path.poll.clone(),
            question: definition.question.clone(),
            answer_type: definition.answer_kind.clone(),
            options: if definition.answer_kind.is_choice() {
                definition.options.clone()
            } else {
                Vec::new()
            },
            language: definition.language.clone(),
            submitted_answer_display: answer.as_ref().map(Answer::display),
            selected_answers: answer.as_ref().map(Answer::selected).unwrap_or_default(),
            submitted_answer: answer,
            first_submitted_at: record.as_ref().map(|record| record.first_submitted_at),
            updated_at: record.as_ref().map(|record| record.updated_at),
            revisions: record.as_ref().map_or(0, |record| record.revisions),
            already_submitted: record.is_some(),
            revised: None,
            error: None,
            ui: ui_texts(&definition.language),
        }
    }
}

/// GET /:subject/:topic
pub async fn show_active_poll(
    State(state): State<Arc<AppState>>,
    Path((subject, topic)): Path<(String, String)>,
    Query(query): Query<RunQuery>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let active = ActivePoll::resolve(&state, &query, &subject, &topic).await?;
    let participant = Participant::from_headers(&headers);
    let view = active.view(&state, &participant);
    Ok(participant.attach(Json(view).into_response()))
}

/// POST /:subject/:topic
///
/// A body that does not decode counts as an empty answer, so it gets the
/// same localized rejection as a blank submission.
pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    Path((subject, topic)): Path<(String, String)>,
    Query(query): Query<RunQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    let active = ActivePoll::resolve(&state, &query, &subject, &topic).await?;
    let participant = Participant::from_headers(&headers);
    let raw = serde_json::from_slice::<RawAnswer>(&body).unwrap_or_else(|e| {
        debug!("Unreadable answer body for {}: {}", active.definition.path, e);
        RawAnswer::default()
    });
    let key = active.submission_key(&participant);

    let response = match state.engine.submit(&active.definition, key, &raw) {
        Ok(outcome) => {
            let mut view = active.view(&state, &participant);
            view.revised = Some(outcome.is_revision());
            Json(view).into_response()
        }
        Err(rejection) => {
            let kind = active.definition.answer_kind.to_string();
            let mut view = active.view(&state, &participant);
            view.error = Some(message(
                rejection.message_key(),
                &active.definition.language,
                &[("answer_type", kind.as_str())],
            ));
            (StatusCode::UNPROCESSABLE_ENTITY, Json(view)).into_response()
        }
    };

    Ok(participant.attach(response))
}

/// GET|POST /:subject/:topic/:poll, kept so old poll-specific links still work.
pub async fn legacy_poll_redirect(
    Path((subject, topic, _poll)): Path<(String, String, String)>,
    Query(query): Query<RunQuery>,
) -> ApiResult<Redirect> {
    let run = query.run()?;
    Ok(Redirect::to(&format!("/{subject}/{topic}?id={run}")))
}
