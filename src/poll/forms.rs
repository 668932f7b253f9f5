//! Poll submission endpoints.
//!
//! Answers arrive over a same-origin POST (not the WebSocket itself) as
//! `{ "data": "<json-string>" }`. Malformed payloads are rejected here, at
//! the boundary, and never reach the aggregator.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::error::FormError;
use crate::identity::Identity;
use crate::poll::{Answers, PollQuestion};
use crate::state::AppState;
use crate::ws::broadcast;
use crate::ws::protocol::Outbound;

#[derive(Debug, Deserialize)]
pub struct FormBody {
    pub data: String,
}

/// POST /form — poll answer submission from a member.
///
/// Once representatives are selected, submissions from a representative
/// identity land in the representative answer lane instead of the team-wide
/// vote tally.
pub async fn submit_form(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<FormBody>,
) -> Result<StatusCode, (StatusCode, String)> {
    let answers: Answers = serde_json::from_str(&body.data).map_err(|e| {
        let err = FormError::MalformedPayload(e);
        tracing::warn!(name = %identity.name, team = identity.team, %err, "rejected poll submission");
        (StatusCode::BAD_REQUEST, err.to_string())
    })?;

    if state.reps.is_representative(&identity) {
        tracing::debug!(name = %identity.name, team = identity.team, "representative answer recorded");
        state.reps.record_answer(identity.team, answers);
    } else {
        tracing::debug!(name = %identity.name, team = identity.team, "vote recorded");
        state.votes.record_answer(identity.team, &answers);
    }

    Ok(StatusCode::OK)
}

/// POST /admin_form — push a new poll to every member.
///
/// Clears the vote and representative tallies first, so stale results from a
/// previous poll never leak into this one, then broadcasts the poll JSON as
/// a `form:` event. The representative list itself survives; it is only
/// recomputed by the `select`/`repmode` admin commands.
pub async fn push_poll(
    State(state): State<AppState>,
    Json(body): Json<FormBody>,
) -> Result<StatusCode, (StatusCode, String)> {
    let poll: Vec<PollQuestion> = serde_json::from_str(&body.data).map_err(|e| {
        let err = FormError::MalformedPayload(e);
        tracing::warn!(%err, "rejected admin poll");
        (StatusCode::BAD_REQUEST, err.to_string())
    })?;
    tracing::info!(questions = poll.len(), "broadcasting new poll");

    state.votes.reset();
    state.reps.reset_answers();
    broadcast::broadcast_all(&state.registry, &Outbound::Form(body.data));

    Ok(StatusCode::OK)
}
