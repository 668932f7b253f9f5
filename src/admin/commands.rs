//! Admin command interpreter.
//!
//! One inbound admin text line is one command: split at the first space into
//! `command` and `args`. Every line is echoed back prefixed `$ ` whether
//! recognized or not; unrecognized commands are otherwise silently ignored.
//! Commands are idempotent to repeat except the score mutations (`iscore`
//! accumulates by design).

use serde::Serialize;

use crate::admin::score;
use crate::rep;
use crate::state::AppState;
use crate::ws::broadcast;
use crate::ws::protocol::Outbound;

/// Dispatch one admin line.
pub fn handle_line(state: &AppState, line: &str) {
    // Echo back for admin-side visibility, recognized or not.
    broadcast::send_admin(&state.registry, &format!("$ {}", line));

    let (command, args) = match line.split_once(' ') {
        Some((command, args)) => (command, args.trim()),
        None => (line.trim(), ""),
    };

    match command {
        "votes" => dump(state, "votes", &state.votes.snapshot()),
        "calc" => {
            dump(state, "plurality", &state.votes.plurality());
            dump(state, "rep-answers", &state.reps.answers_snapshot());
        }
        "disable" => broadcast::broadcast_all(&state.registry, &Outbound::Disable),
        "who" => dump(state, "registrants", &state.registry.registrants()),
        "select" => {
            rep::select_representatives(state);
        }
        "reps" => dump(state, "reps", &state.reps.representatives()),
        "repmode" => repmode(state),
        "show" => broadcast::broadcast_all(&state.registry, &Outbound::Show),
        "say" => broadcast::broadcast_all(&state.registry, &Outbound::Chat(args.to_string())),
        "img" => broadcast::broadcast_all(&state.registry, &Outbound::Image(args.to_string())),
        "clearchat" => broadcast::broadcast_all(&state.registry, &Outbound::ClearChat),
        "timer" => broadcast::broadcast_all(&state.registry, &Outbound::Timer(args.to_string())),
        "scores" => dump(state, "scores", &score::snapshot(&state.scores)),
        "iscore" => {
            if let Some((team, delta)) = parse_team_value(args) {
                let total = score::increment(&state.scores, team, delta);
                tracing::info!(team, delta, total, "score incremented");
            } else {
                tracing::debug!(args, "iscore: expected <team> <delta>");
            }
        }
        "sscore" => {
            if let Some((team, value)) = parse_team_value(args) {
                score::set(&state.scores, team, value);
                tracing::info!(team, value, "score set");
            } else {
                tracing::debug!(args, "sscore: expected <team> <value>");
            }
        }
        "scoreboard" => {
            let html = score::render_html(&state.scores);
            broadcast::broadcast_all(&state.registry, &Outbound::Score(html));
        }
        _ => {
            tracing::debug!(command, "unrecognized admin command");
        }
    }
}

/// `repmode`: run representative selection, then pull the chat input from
/// every member who was not selected, in one step. Representatives get the
/// `hide:` mode switch from selection; everyone else gets `disable:`.
fn repmode(state: &AppState) {
    let winners = rep::select_representatives(state);
    for identity in state.registry.member_identities() {
        let is_winner = winners
            .iter()
            .any(|(team, name)| *team == identity.team && *name == identity.name);
        if is_winner {
            continue;
        }
        if let Err(err) =
            broadcast::send_direct(&state.registry, identity.team, &identity.name, &Outbound::Disable)
        {
            tracing::debug!(%err, "repmode disable skipped");
        }
    }
}

/// Send a labeled JSON dump to the admin console.
fn dump<T: Serialize>(state: &AppState, label: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => broadcast::send_admin(&state.registry, &format!("{} {}", label, json)),
        Err(err) => tracing::warn!(label, %err, "admin dump failed to serialize"),
    }
}

fn parse_team_value(args: &str) -> Option<(u32, i64)> {
    let mut parts = args.split_whitespace();
    let team = parts.next()?.parse().ok()?;
    let value = parts.next()?.parse().ok()?;
    Some((team, value))
}
