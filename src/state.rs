//! Shared application state passed to all handlers via axum State extractor.
//!
//! All state is in-memory and resets on restart: constructed once at startup,
//! injected into handlers, no teardown. Nothing here is an ambient global.

use std::sync::Arc;

use crate::admin::score::ScoreBoard;
use crate::poll::VoteBook;
use crate::registry::SessionRegistry;
use crate::rep::RepBoard;

#[derive(Clone)]
pub struct AppState {
    /// Connection registry: identities and roles → live connection handles.
    pub registry: Arc<SessionRegistry>,
    /// Per-team, per-question vote tallies for the current poll.
    pub votes: Arc<VoteBook>,
    /// Selected representatives and their separate answer lane.
    pub reps: Arc<RepBoard>,
    /// Team scores; survive reconnects, reset only on restart.
    pub scores: Arc<ScoreBoard>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(SessionRegistry::new()),
            votes: Arc::new(VoteBook::new()),
            reps: Arc::new(RepBoard::new()),
            scores: Arc::new(ScoreBoard::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
