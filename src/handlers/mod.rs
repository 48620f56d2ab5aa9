pub mod facilitator;
pub mod participant;

use crate::models::RunId;
use crate::server::error::{ApiError, ApiResult};
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::Response;
use log::warn;
use serde::Deserialize;
use uuid::Uuid;

pub const PARTICIPANT_COOKIE: &str = "poll_participant";

/// `?id=<run uuid>`, required on every route.
#[derive(Debug, Deserialize)]
pub struct RunQuery {
    id: Option<String>,
}

impl RunQuery {
    /// The canonical run id. Anything that is not a UUID is a 404 so the
    /// request never reaches the engine.
    pub fn run(&self) -> ApiResult<RunId> {
        let raw = self.id.as_deref().unwrap_or_default();
        RunId::parse(raw).ok_or_else(|| {
            warn!("Rejected request with invalid run id {:?}", raw);
            ApiError::NotFound
        })
    }
}

/// The participant's opaque token, plus a freshly minted one when the
/// request carried none.
pub struct Participant {
    pub token: String,
    minted: bool,
}

impl Participant {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match cookie_value(headers, PARTICIPANT_COOKIE) {
            Some(token) => Self { token, minted: false },
            None => Self {
                token: Uuid::new_v4().to_string(),
                minted: true,
            },
        }
    }

    /// Attaches `Set-Cookie` when the token was minted for this request.
    pub fn attach(&self, mut response: Response) -> Response {
        if self.minted {
            let cookie = format!("{PARTICIPANT_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", self.token);
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        response
    }
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
