//! Team scoreboard.
//!
//! Scores are initialized to 0 the first time any member of a team connects,
//! survive disconnects and reconnects, and are mutated only by explicit admin
//! commands. A team missing from the map reads as score 0, never a panic.

use std::collections::BTreeMap;

use dashmap::DashMap;

/// team → score. Independent of the connection registry, so a plain
/// concurrent map suffices (no cross-structure invariant to protect).
pub type ScoreBoard = DashMap<u32, i64>;

/// Add `delta` to a team's score, treating an absent entry as 0.
/// Not idempotent by design: repeating it accumulates.
pub fn increment(scores: &ScoreBoard, team: u32, delta: i64) -> i64 {
    let mut entry = scores.entry(team).or_insert(0);
    *entry += delta;
    *entry
}

/// Set a team's score to an absolute value.
pub fn set(scores: &ScoreBoard, team: u32, value: i64) -> i64 {
    scores.insert(team, value);
    value
}

/// Scores in team order, for deterministic admin dumps.
pub fn snapshot(scores: &ScoreBoard) -> BTreeMap<u32, i64> {
    scores.iter().map(|e| (*e.key(), *e.value())).collect()
}

/// Rank order: descending by score, ties broken by ascending team id.
pub fn ranked(scores: &ScoreBoard) -> Vec<(u32, i64)> {
    let mut entries: Vec<(u32, i64)> = scores.iter().map(|e| (*e.key(), *e.value())).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    entries
}

/// Pre-rendered scoreboard fragment broadcast to clients as a `score:` event.
pub fn render_html(scores: &ScoreBoard) -> String {
    let items: String = ranked(scores)
        .iter()
        .map(|(team, score)| format!("<li>Team {}: {}</li>", team, score))
        .collect();
    format!("<ol>{}</ol>", items)
}
