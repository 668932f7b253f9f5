//! Participant identity: an immutable `(name, team)` pair established by the
//! cookie-issuing boundary before any WebSocket connection is accepted.

pub mod registration;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use tower_cookies::Cookies;

pub const NAME_COOKIE: &str = "name";
pub const TEAM_COOKIE: &str = "team";

/// One participant. Never mutated after issuance; destroyed only by
/// disconnect. The uniqueness key for a connection slot is `(team, name)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    pub name: String,
    pub team: u32,
}

impl Identity {
    pub fn key(&self) -> (u32, String) {
        (self.team, self.name.clone())
    }
}

/// Rejection for requests lacking a valid identity cookie pair.
///
/// Rendered as a redirect to the landing page. Modeled as an extractor
/// rejection (a result, not an exception) so it never crosses into the core.
#[derive(Debug)]
pub struct Unregistered;

impl IntoResponse for Unregistered {
    fn into_response(self) -> Response {
        Redirect::to("/").into_response()
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Unregistered;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cookies = Cookies::from_request_parts(parts, state)
            .await
            .map_err(|_| Unregistered)?;
        resolve(&cookies).ok_or(Unregistered)
    }
}

/// Resolve the cookie pair to an identity. `None` means unregistered; a
/// non-numeric team cookie is treated the same as a missing one.
pub fn resolve(cookies: &Cookies) -> Option<Identity> {
    let name = cookies.get(NAME_COOKIE)?.value().to_string();
    let team = cookies.get(TEAM_COOKIE)?.value().parse::<u32>().ok()?;
    if name.is_empty() {
        return None;
    }
    Some(Identity { name, team })
}
