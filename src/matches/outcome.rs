//! Match outcome resolution
//!
//! Determines the winner of a completed match, or whether it ended in a draw,
//! from its team score records. Technical wins take precedence over numeric
//! scores. Ties (several technical wins, several equal maximum scores) are
//! broken by list order: the first listed record wins.
//!
//! Winner and draw are independent signals. A completed match in which every
//! team has the same score reports `is_draw == true` *and* names the first
//! listed team as winner; callers that want a single answer should use
//! [`MatchOutcome::evaluate`], which reports the draw.

use crate::matches::score::TeamScore;
use crate::types::{MatchStatus, TeamId};
use serde::{Deserialize, Serialize};

/// Winning team of a match, if one can be determined.
///
/// Returns `None` unless the match is completed and has at least one score.
pub fn resolve_winner(status: MatchStatus, scores: &[TeamScore]) -> Option<TeamId> {
    if status != MatchStatus::Completed || scores.is_empty() {
        return None;
    }

    if let Some(technical) = scores.iter().find(|ts| ts.has_technical_win()) {
        return Some(technical.team_id);
    }

    // Strict comparison keeps the first record among equal maxima
    scores
        .iter()
        .reduce(|best, candidate| {
            if candidate.score > best.score {
                candidate
            } else {
                best
            }
        })
        .map(|ts| ts.team_id)
}

/// Whether a completed match ended with every team on the same score.
///
/// Any technical win rules out a draw.
pub fn is_draw(status: MatchStatus, scores: &[TeamScore]) -> bool {
    if status != MatchStatus::Completed {
        return false;
    }

    let Some(first) = scores.first() else {
        return false;
    };

    if scores.iter().any(TeamScore::has_technical_win) {
        return false;
    }

    scores.iter().all(|ts| ts.score == first.score)
}

/// Single reconciled view of a match result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "teamId", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchOutcome {
    /// Match not completed, or no teams recorded
    Undetermined,
    Draw,
    Winner(TeamId),
}

impl MatchOutcome {
    pub fn evaluate(status: MatchStatus, scores: &[TeamScore]) -> Self {
        if is_draw(status, scores) {
            return MatchOutcome::Draw;
        }

        match resolve_winner(status, scores) {
            Some(team_id) => MatchOutcome::Winner(team_id),
            None => MatchOutcome::Undetermined,
        }
    }

    /// Metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            MatchOutcome::Undetermined => "undetermined",
            MatchOutcome::Draw => "draw",
            MatchOutcome::Winner(_) => "winner",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TechResult;
    use crate::utils::generate_id;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn score(team_id: Uuid, points: i32) -> TeamScore {
        TeamScore::new(Uuid::nil(), team_id).with_score(points)
    }

    fn teams(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| generate_id()).collect()
    }

    #[test]
    fn test_technical_win_beats_numeric_score() {
        let t = teams(2);
        let scores = vec![
            score(t[0], 0).with_tech_result(TechResult::Win),
            score(t[1], 100),
        ];

        assert_eq!(resolve_winner(MatchStatus::Completed, &scores), Some(t[0]));
        assert!(!is_draw(MatchStatus::Completed, &scores));
        assert_eq!(
            MatchOutcome::evaluate(MatchStatus::Completed, &scores),
            MatchOutcome::Winner(t[0])
        );
    }

    #[test]
    fn test_first_technical_win_in_list_order() {
        let t = teams(3);
        let scores = vec![
            score(t[0], 10),
            score(t[1], 0).with_tech_result(TechResult::Win),
            score(t[2], 0).with_tech_result(TechResult::Win),
        ];

        assert_eq!(resolve_winner(MatchStatus::Completed, &scores), Some(t[1]));
    }

    #[test]
    fn test_all_equal_scores_is_draw_and_first_listed_wins() {
        let t = teams(3);
        let scores = vec![score(t[0], 5), score(t[1], 5), score(t[2], 5)];

        assert!(is_draw(MatchStatus::Completed, &scores));
        assert_eq!(resolve_winner(MatchStatus::Completed, &scores), Some(t[0]));
        assert_eq!(
            MatchOutcome::evaluate(MatchStatus::Completed, &scores),
            MatchOutcome::Draw
        );
    }

    #[test]
    fn test_distinct_scores_highest_wins() {
        let t = teams(3);
        let scores = vec![score(t[0], 3), score(t[1], 7), score(t[2], 2)];

        assert_eq!(resolve_winner(MatchStatus::Completed, &scores), Some(t[1]));
        assert!(!is_draw(MatchStatus::Completed, &scores));
    }

    #[test]
    fn test_tied_maximum_goes_to_first_listed() {
        let t = teams(3);
        let scores = vec![score(t[0], 1), score(t[1], 9), score(t[2], 9)];

        assert_eq!(resolve_winner(MatchStatus::Completed, &scores), Some(t[1]));
        // Only the top two tie, so this is not a draw
        assert!(!is_draw(MatchStatus::Completed, &scores));
    }

    #[test]
    fn test_negative_scores() {
        let t = teams(2);
        let scores = vec![score(t[0], -4), score(t[1], -1)];

        assert_eq!(resolve_winner(MatchStatus::Completed, &scores), Some(t[1]));
    }

    #[test]
    fn test_technical_draw_and_loss_do_not_override() {
        let t = teams(2);
        let scores = vec![
            score(t[0], 2).with_tech_result(TechResult::Loss),
            score(t[1], 1).with_tech_result(TechResult::Draw),
        ];

        assert_eq!(resolve_winner(MatchStatus::Completed, &scores), Some(t[0]));
        assert!(!is_draw(MatchStatus::Completed, &scores));
    }

    #[test]
    fn test_single_team_is_a_draw_with_itself() {
        let t = teams(1);
        let scores = vec![score(t[0], 3)];

        assert!(is_draw(MatchStatus::Completed, &scores));
        assert_eq!(resolve_winner(MatchStatus::Completed, &scores), Some(t[0]));
    }

    #[test]
    fn test_not_completed_yields_nothing() {
        let t = teams(2);
        let scores = vec![
            score(t[0], 3).with_tech_result(TechResult::Win),
            score(t[1], 3),
        ];

        for status in [
            MatchStatus::Scheduled,
            MatchStatus::InProgress,
            MatchStatus::Cancelled,
        ] {
            assert_eq!(resolve_winner(status, &scores), None);
            assert!(!is_draw(status, &scores));
            assert_eq!(
                MatchOutcome::evaluate(status, &scores),
                MatchOutcome::Undetermined
            );
        }
    }

    #[test]
    fn test_empty_completed_match() {
        assert_eq!(resolve_winner(MatchStatus::Completed, &[]), None);
        assert!(!is_draw(MatchStatus::Completed, &[]));
        assert_eq!(
            MatchOutcome::evaluate(MatchStatus::Completed, &[]),
            MatchOutcome::Undetermined
        );
    }

    #[test]
    fn test_outcome_serialization() {
        let team_id = generate_id();
        let json = serde_json::to_value(MatchOutcome::Winner(team_id)).unwrap();
        assert_eq!(json["kind"], "WINNER");
        assert_eq!(json["teamId"], team_id.to_string());

        let json = serde_json::to_value(MatchOutcome::Draw).unwrap();
        assert_eq!(json["kind"], "DRAW");
    }

    fn arb_scores() -> impl Strategy<Value = Vec<(i32, bool)>> {
        prop::collection::vec((-50i32..50, prop::bool::weighted(0.2)), 1..8)
    }

    fn build(raw: &[(i32, bool)]) -> Vec<TeamScore> {
        raw.iter()
            .map(|(points, tech_win)| {
                let ts = score(generate_id(), *points);
                if *tech_win {
                    ts.with_tech_result(TechResult::Win)
                } else {
                    ts
                }
            })
            .collect()
    }

    proptest! {
        #[test]
        fn prop_technical_win_always_takes_precedence(raw in arb_scores()) {
            let scores = build(&raw);
            let winner = resolve_winner(MatchStatus::Completed, &scores);

            if let Some(first_tech) = scores.iter().find(|ts| ts.has_technical_win()) {
                prop_assert_eq!(winner, Some(first_tech.team_id));
                prop_assert!(!is_draw(MatchStatus::Completed, &scores));
            }
        }

        #[test]
        fn prop_numeric_winner_is_first_maximum(raw in arb_scores()) {
            let scores: Vec<TeamScore> = build(&raw)
                .into_iter()
                .map(|ts| ts.with_tech_result(TechResult::None))
                .collect();
            let max = scores.iter().map(|ts| ts.score).max().unwrap();
            let expected = scores.iter().find(|ts| ts.score == max).map(|ts| ts.team_id);

            prop_assert_eq!(resolve_winner(MatchStatus::Completed, &scores), expected);
        }

        #[test]
        fn prop_unfinished_matches_never_resolve(raw in arb_scores()) {
            let scores = build(&raw);
            for status in [MatchStatus::Scheduled, MatchStatus::InProgress, MatchStatus::Cancelled] {
                prop_assert_eq!(resolve_winner(status, &scores), None);
                prop_assert!(!is_draw(status, &scores));
            }
        }
    }
}
