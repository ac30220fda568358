use crate::models::{Game, LineSelection, PickOutcome, PickRecord, Side};
use std::collections::HashMap;

/// Evaluate a pick against the spread
///
/// The spread is home-relative: -7 means the home team must win by more
/// than 7 to cover. We compute the adjusted differential
/// `(home_score - away_score) + spread` and read the result off its sign;
/// the away side sees the sign flipped. Exactly zero is a push, so spreads
/// must reach this function unrounded (half-point spreads can never push).
pub fn evaluate_spread(home_score: i32, away_score: i32, spread: f64, side: Side) -> PickOutcome {
    let adjusted = (home_score - away_score) as f64 + spread;

    match side {
        Side::Home => {
            if adjusted > 0.0 {
                PickOutcome::Win
            } else if adjusted < 0.0 {
                PickOutcome::Loss
            } else {
                PickOutcome::Push
            }
        }
        Side::Away => {
            if adjusted < 0.0 {
                PickOutcome::Win
            } else if adjusted > 0.0 {
                PickOutcome::Loss
            } else {
                PickOutcome::Push
            }
        }
    }
}

/// Tally the record for a slate of games against a set of picks
///
/// Games without a pick, without final scores, or without a numeric spread
/// under the selection policy contribute nothing. A missing spread is
/// never treated as zero.
pub fn slate_record(
    games: &[Game],
    picks: &HashMap<i32, Side>,
    policy: &LineSelection,
) -> PickRecord {
    let mut record = PickRecord::default();

    for game in games {
        let Some(&side) = picks.get(&game.id) else {
            continue;
        };
        let Some(spread) = game.spread(policy) else {
            continue;
        };
        let (Some(home_score), Some(away_score)) = (game.home_score, game.away_score) else {
            continue;
        };

        record.add(evaluate_spread(home_score, away_score, spread, side));
    }

    record
}
