use super::RunQuery;
use crate::error::PollError;
use crate::locale::{facilitator_texts, normalize_language};
use crate::projector::{PollReport, ResultsProjector};
use crate::server::error::{ApiError, ApiResult};
use crate::server::state::AppState;
use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
};
use log::warn;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Entry point of the facilitator's screen for one topic.
#[derive(Debug, Serialize)]
pub struct TopicView {
    pub run_id: String,
    pub subject: String,
    pub topic: String,
    pub language: &'static str,
    pub poll_ids: Vec<String>,
    pub active_poll_id: String,
    pub active_poll: PollReport,
    pub ui: BTreeMap<&'static str, &'static str>,
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub polls: Vec<PollReport>,
}

#[derive(Debug, Serialize)]
pub struct TopicResultsResponse {
    pub polls: Vec<PollReport>,
    pub active_poll_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ActivateResponse {
    pub ok: bool,
    pub active_poll_id: String,
}

/// GET /api/facilitator/:subject/:topic
pub async fn topic_view(
    State(state): State<Arc<AppState>>,
    Path((subject, topic)): Path<(String, String)>,
    Query(query): Query<RunQuery>,
) -> ApiResult<Json<TopicView>> {
    let run = query.run()?;
    let catalog = state.catalog().await?;

    let poll_ids = catalog.topic_poll_ids(&subject, &topic);
    if poll_ids.is_empty() {
        return Err(PollError::NotFound.into());
    }
    let language = normalize_language(catalog.subject_language(&subject));
    let active_poll_id = state
        .selections
        .ensure_active(&catalog, &run, &subject, &topic)
        .ok_or(PollError::NotFound)?;
    let active_poll = ResultsProjector::new(&catalog, &state.engine)
        .poll(&run, &subject, &topic, &active_poll_id)
        .ok_or(PollError::NotFound)?;

    Ok(Json(TopicView {
        run_id: run.to_string(),
        subject,
        topic,
        language,
        poll_ids,
        active_poll_id,
        active_poll,
        ui: facilitator_texts(language),
    }))
}

/// GET /api/facilitator/results
pub async fn all_results(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RunQuery>,
) -> ApiResult<Json<ResultsResponse>> {
    let run = query.run()?;
    let catalog = state.catalog().await?;
    let polls = ResultsProjector::new(&catalog, &state.engine).all(&run);
    Ok(Json(ResultsResponse { polls }))
}

/// GET /api/facilitator/:subject/:topic/results
pub async fn topic_results(
    State(state): State<Arc<AppState>>,
    Path((subject, topic)): Path<(String, String)>,
    Query(query): Query<RunQuery>,
) -> ApiResult<Json<TopicResultsResponse>> {
    let run = query.run()?;
    let catalog = state.catalog().await?;

    let polls = ResultsProjector::new(&catalog, &state.engine).topic(&run, &subject, &topic);
    if polls.is_empty() {
        return Err(PollError::NotFound.into());
    }
    let active_poll_id = state.selections.ensure_active(&catalog, &run, &subject, &topic);

    Ok(Json(TopicResultsResponse { polls, active_poll_id }))
}

/// POST /api/facilitator/:subject/:topic/active
///
/// The body is read leniently: anything that is not a JSON object with a
/// non-empty string `poll_id` is answered with "poll_id is required".
pub async fn activate_poll(
    State(state): State<Arc<AppState>>,
    Path((subject, topic)): Path<(String, String)>,
    Query(query): Query<RunQuery>,
    body: Bytes,
) -> ApiResult<Json<ActivateResponse>> {
    let run = query.run()?;
    let catalog = state.catalog().await?;
    if catalog.topic_poll_ids(&subject, &topic).is_empty() {
        return Err(PollError::NotFound.into());
    }

    let poll_id = serde_json::from_slice::<Value>(&body)
        .ok()
        .and_then(|payload| payload.get("poll_id").and_then(Value::as_str).map(str::to_string))
        .filter(|poll_id| !poll_id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("poll_id is required".to_string()))?;

    if !state.selections.set(&catalog, &run, &subject, &topic, &poll_id) {
        let rejection = PollError::InvalidActivation {
            subject,
            topic,
            poll_id,
        };
        warn!("{}", rejection);
        return Err(rejection.into());
    }

    Ok(Json(ActivateResponse {
        ok: true,
        active_poll_id: poll_id,
    }))
}
