use axum::{routing::get, routing::post, Json, Router};
use tower_cookies::{CookieManagerLayer, Cookies};

use crate::identity::{self, registration};
use crate::poll::forms;
use crate::state::AppState;
use crate::ws::handler as ws_handler;

/// Build the full axum Router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let pages = Router::new()
        .route("/", get(landing))
        .route("/register", get(registration::register))
        .route("/unregister", get(registration::unregister));

    let form_routes = Router::new()
        .route("/form", post(forms::submit_form))
        .route("/admin_form", post(forms::push_poll));

    let ws_routes = Router::new()
        .route("/ws/chat", get(ws_handler::chat_upgrade))
        .route("/ws/admin", get(ws_handler::admin_upgrade));

    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(pages)
        .merge(form_routes)
        .merge(ws_routes)
        .merge(health)
        .layer(CookieManagerLayer::new())
        .with_state(state)
}

/// GET / — registration state for the landing page. Page rendering lives in
/// the client bundle; the server only reports the cookie state.
async fn landing(cookies: Cookies) -> Json<serde_json::Value> {
    match identity::resolve(&cookies) {
        Some(id) => Json(serde_json::json!({
            "registered": true,
            "name": id.name,
            "team": id.team,
        })),
        None => Json(serde_json::json!({ "registered": false })),
    }
}

/// Basic health check endpoint
async fn health_check() -> &'static str {
    "ok"
}
