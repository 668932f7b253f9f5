//! Representative selection.
//!
//! Each team elects one member by plurality vote; the winner answers on the
//! team's behalf in a later phase, through a separate answer lane that is
//! never merged into the team-wide tally.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use indexmap::IndexMap;

use crate::identity::Identity;
use crate::poll::Answers;
use crate::state::AppState;
use crate::ws::broadcast;
use crate::ws::protocol::Outbound;

/// The representative-election question is always positional index 0 of
/// whatever poll was last pushed for that purpose. A convention, not
/// enforced by type.
pub const ELECTION_QUESTION_ID: &str = "q0";

/// Current representatives and their separate answer lane.
pub struct RepBoard {
    /// `(team, name)` per team, rebuilt on every selection run.
    selected: Mutex<Vec<(u32, String)>>,
    /// team → raw decoded answers from that team's representative.
    answers: Mutex<IndexMap<u32, HashMap<String, String>>>,
}

impl RepBoard {
    pub fn new() -> Self {
        Self {
            selected: Mutex::new(Vec::new()),
            answers: Mutex::new(IndexMap::new()),
        }
    }

    fn selected_lock(&self) -> MutexGuard<'_, Vec<(u32, String)>> {
        self.selected.lock().expect("representative mutex poisoned")
    }

    fn answers_lock(&self) -> MutexGuard<'_, IndexMap<u32, HashMap<String, String>>> {
        self.answers.lock().expect("representative answers mutex poisoned")
    }

    pub fn is_representative(&self, identity: &Identity) -> bool {
        self.selected_lock()
            .iter()
            .any(|(team, name)| *team == identity.team && *name == identity.name)
    }

    /// Replace the selection wholesale (cleared and rebuilt each run).
    pub fn replace_selection(&self, winners: Vec<(u32, String)>) {
        *self.selected_lock() = winners;
    }

    pub fn representatives(&self) -> Vec<(u32, String)> {
        self.selected_lock().clone()
    }

    /// Record a representative's submission. A later submission from the same
    /// team's representative replaces the earlier one.
    pub fn record_answer(&self, team: u32, answers: Answers) {
        self.answers_lock().insert(team, answers);
    }

    pub fn answers_snapshot(&self) -> IndexMap<u32, HashMap<String, String>> {
        self.answers_lock().clone()
    }

    pub fn reset_answers(&self) {
        self.answers_lock().clear();
    }
}

impl Default for RepBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// Run representative selection: for each team with at least one recorded
/// answer, the plurality winner of the election question becomes that team's
/// representative and is told to switch UI mode with a direct `hide:`.
///
/// Does not broadcast the election poll itself; that is a separate admin
/// action which must precede this call for the results to be meaningful.
pub fn select_representatives(state: &AppState) -> Vec<(u32, String)> {
    let winners: Vec<(u32, String)> = state
        .votes
        .plurality()
        .iter()
        .filter_map(|(team, questions)| {
            questions
                .get(ELECTION_QUESTION_ID)
                .map(|winner| (*team, winner.clone()))
        })
        .collect();

    state.reps.replace_selection(winners.clone());

    for (team, name) in &winners {
        tracing::info!(team, name = %name, "representative selected");
        // Fire-and-forget: the winner may have disconnected since voting.
        if let Err(err) = broadcast::send_direct(&state.registry, *team, name, &Outbound::Hide) {
            tracing::debug!(%err, "representative hide notification skipped");
        }
    }

    winners
}
