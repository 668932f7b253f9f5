//! Poll types and the vote aggregator.
//!
//! A poll is an ordered list of questions pushed to clients as JSON; question
//! ids are positional (`"q0"`, `"q1"`, ...) matching poll order. The tally is
//! nested insertion-ordered maps so the plurality tie-break ("first option to
//! reach the max count wins") is deterministic.

pub mod forms;

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One poll question as pushed to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollQuestion {
    pub question: String,
    pub options: Vec<String>,
}

/// Decoded submission: question-id → chosen option.
pub type Answers = HashMap<String, String>;

/// team → question-id → option → count.
pub type Tally = IndexMap<u32, IndexMap<String, IndexMap<String, u32>>>;

/// Per-team plurality winners: team → question-id → winning option.
pub type PluralityResult = IndexMap<u32, IndexMap<String, String>>;

/// Accumulates per-team, per-question answer counts for the current poll.
/// Reset whenever the admin pushes a new poll, so stale tallies never leak
/// into a new poll's results.
pub struct VoteBook {
    tally: Mutex<Tally>,
}

impl VoteBook {
    pub fn new() -> Self {
        Self {
            tally: Mutex::new(Tally::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tally> {
        self.tally.lock().expect("vote tally mutex poisoned")
    }

    /// Pure tally with defaulted-insert nesting. Options are not validated
    /// against the poll's declared options; an unknown option tallies as a
    /// new bucket.
    pub fn record_answer(&self, team: u32, answers: &Answers) {
        let mut tally = self.lock();
        let record = tally.entry(team).or_default();
        for (question_id, option) in answers {
            *record
                .entry(question_id.clone())
                .or_default()
                .entry(option.clone())
                .or_insert(0) += 1;
        }
    }

    /// For every team and every question with at least one recorded answer,
    /// the option with the strictly highest count. Ties resolve to the first
    /// option recorded, by insertion order.
    pub fn plurality(&self) -> PluralityResult {
        let tally = self.lock();
        tally
            .iter()
            .map(|(team, questions)| {
                let winners = questions
                    .iter()
                    .filter_map(|(question_id, counts)| {
                        first_max(counts).map(|option| (question_id.clone(), option.to_string()))
                    })
                    .collect();
                (*team, winners)
            })
            .collect()
    }

    /// Clear every tally. Invoked when the admin pushes a brand-new poll.
    pub fn reset(&self) {
        self.lock().clear();
    }

    /// Current tally, for admin dumps.
    pub fn snapshot(&self) -> Tally {
        self.lock().clone()
    }
}

impl Default for VoteBook {
    fn default() -> Self {
        Self::new()
    }
}

/// The option holding the strictly highest count; on a tie, the option
/// recorded first (insertion order) keeps the win.
fn first_max(counts: &IndexMap<String, u32>) -> Option<&str> {
    let mut best: Option<(&str, u32)> = None;
    for (option, count) in counts {
        if best.is_none_or(|(_, c)| *count > c) {
            best = Some((option, *count));
        }
    }
    best.map(|(option, _)| option)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(question_id: &str, option: &str) -> Answers {
        HashMap::from([(question_id.to_string(), option.to_string())])
    }

    #[test]
    fn plurality_picks_the_highest_count() {
        let votes = VoteBook::new();
        votes.record_answer(1, &answer("q0", "A"));
        votes.record_answer(1, &answer("q0", "A"));
        votes.record_answer(1, &answer("q0", "B"));

        let result = votes.plurality();
        assert_eq!(result[&1]["q0"], "A");
    }

    #[test]
    fn tie_resolves_to_first_recorded_option() {
        let votes = VoteBook::new();
        votes.record_answer(1, &answer("q0", "A"));
        votes.record_answer(1, &answer("q0", "B"));
        assert_eq!(votes.plurality()[&1]["q0"], "A");

        // Reverse recording order flips the winner.
        let votes = VoteBook::new();
        votes.record_answer(1, &answer("q0", "B"));
        votes.record_answer(1, &answer("q0", "A"));
        assert_eq!(votes.plurality()[&1]["q0"], "B");
    }

    #[test]
    fn teams_tally_independently() {
        let votes = VoteBook::new();
        votes.record_answer(1, &answer("q0", "alice"));
        votes.record_answer(2, &answer("q0", "bob"));
        votes.record_answer(2, &answer("q1", "yes"));

        let result = votes.plurality();
        assert_eq!(result[&1]["q0"], "alice");
        assert_eq!(result[&2]["q0"], "bob");
        assert_eq!(result[&2]["q1"], "yes");
        assert!(!result[&1].contains_key("q1"));
    }

    #[test]
    fn reset_empties_every_team() {
        let votes = VoteBook::new();
        votes.record_answer(1, &answer("q0", "A"));
        votes.record_answer(2, &answer("q0", "B"));
        votes.reset();
        assert!(votes.plurality().is_empty());
        assert!(votes.snapshot().is_empty());
    }

    #[test]
    fn multi_question_submissions_tally_each_pair() {
        let votes = VoteBook::new();
        let answers = Answers::from([
            ("q0".to_string(), "A".to_string()),
            ("q1".to_string(), "X".to_string()),
        ]);
        votes.record_answer(1, &answers);

        let snapshot = votes.snapshot();
        assert_eq!(snapshot[&1]["q0"]["A"], 1);
        assert_eq!(snapshot[&1]["q1"]["X"], 1);
    }
}
