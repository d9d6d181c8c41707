//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Game play itself happens over the WebSocket session; HTTP is stateless.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::{info, instrument, warn};

use crate::challenge::{is_consistent, reshuffle};
use crate::logic::{generate_challenge, resolve_request};
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_settings(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(SettingsOut::new(
    state.game.default_pair_count,
    state.game.models.clone(),
    state.default_model.clone(),
    state.game.auto_shuffle,
    state.oracle.is_some(),
  ))
}

#[instrument(level = "info", skip(state, body), fields(prompt_len = body.prompt.len(), pair_count = ?body.pair_count))]
pub async fn http_post_challenge(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ChallengeIn>,
) -> impl IntoResponse {
  let req = resolve_request(&state, &body.prompt, body.pair_count, body.model, body.auto_shuffle);
  let out = generate_challenge(&state, &req).await;
  info!(target: "challenge", id = %out.challenge.id, source = ?out.challenge.source, fallback = out.warning.is_some(), "HTTP challenge served");
  Json(GeneratedOut { challenge: to_out(&out.challenge), warning: out.warning })
}

#[instrument(level = "info", skip(body), fields(id = %body.challenge.id))]
pub async fn http_post_reshuffle(Json(body): Json<ReshuffleIn>) -> axum::response::Response {
  let challenge = from_out(body.challenge);
  if !is_consistent(&challenge) {
    warn!(target: "challenge", id = %challenge.id, "Rejected inconsistent challenge");
    let err = ErrorOut { error: "challenge terms, concepts and answerKey do not describe the same pairs".into() };
    return (StatusCode::UNPROCESSABLE_ENTITY, Json(err)).into_response();
  }
  Json(to_out(&reshuffle(&challenge))).into_response()
}
