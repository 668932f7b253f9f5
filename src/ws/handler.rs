//! WebSocket upgrade endpoints.

use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
};

use crate::identity::Identity;
use crate::state::AppState;
use crate::ws::actor;

/// GET /ws/chat — member WebSocket upgrade.
///
/// The identity extractor runs before the upgrade: an unregistered visitor
/// gets the redirect instead of a socket, so the core only ever sees
/// connections that carry a validated `(name, team)`.
pub async fn chat_upgrade(
    State(state): State<AppState>,
    identity: Identity,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| actor::run_member(socket, state, identity))
}

/// GET /ws/admin — admin WebSocket upgrade. No identity required; possession
/// of the endpoint is the only gate (see non-goals).
pub async fn admin_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| actor::run_admin(socket, state))
}
