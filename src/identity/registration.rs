//! Cookie issuance endpoints: the external step that hands the core a
//! validated `(name, team)` identity.

use axum::extract::Query;
use axum::response::Redirect;
use serde::Deserialize;
use tower_cookies::{Cookie, Cookies};

use super::{NAME_COOKIE, TEAM_COOKIE};

#[derive(Debug, Deserialize)]
pub struct RegisterQuery {
    pub name: String,
    pub team: u32,
}

/// GET /register?name=..&team=.. — issue the identity cookie pair and
/// redirect to the landing page.
pub async fn register(cookies: Cookies, Query(q): Query<RegisterQuery>) -> Redirect {
    tracing::info!(name = %q.name, team = q.team, "participant registered");
    cookies.add(Cookie::new(NAME_COOKIE, q.name));
    cookies.add(Cookie::new(TEAM_COOKIE, q.team.to_string()));
    Redirect::to("/")
}

/// GET /unregister — drop the identity cookies and redirect.
pub async fn unregister(cookies: Cookies) -> Redirect {
    cookies.remove(Cookie::from(NAME_COOKIE));
    cookies.remove(Cookie::from(TEAM_COOKIE));
    Redirect::to("/")
}
