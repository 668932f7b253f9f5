//! Domain error taxonomy.
//!
//! Registry and aggregator operations are local and non-retrying: the only
//! recovery action on an internal error is to leave in-memory state unchanged
//! and log. Transport disconnects are normal lifecycle events, not errors.

use thiserror::Error;

/// Errors from connection registry mutations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A live connection already holds this `(team, name)` slot.
    ///
    /// The server policy is close-and-replace, so the member connect path
    /// never returns this; it exists for callers that want reject semantics.
    #[error("identity {name:?} on team {team} already has a live connection")]
    DuplicateIdentity { team: u32, name: String },
}

/// Errors from direct routing.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The `(team, name)` target has no live connection. Callers may ignore
    /// this for fire-and-forget notifications.
    #[error("no live connection for {name:?} on team {team}")]
    NoSuchRecipient { team: u32, name: String },
}

/// Errors from poll submission decoding. Rejected at the HTTP boundary,
/// never silently tallied.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("malformed answer payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}
