use crate::models::{Game, LineSelection, PickOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One game in a team's ATS history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamGameRecord {
    pub week: i32,
    pub opponent: String,
    pub result: PickOutcome,
    /// Cover margin as seen by this team (positive means it covered)
    pub margin: f64,
    /// Spread as seen by this team (home gets the published number, away its negation)
    pub spread: f64,
    /// Final score from this team's perspective, e.g. "24-10"
    pub score: String,
    /// Raw score differential from this team's perspective
    pub score_diff: i32,
}

/// Season-long ATS rollup for one team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub team: String,
    pub wins: u32,
    pub losses: u32,
    pub pushes: u32,
    pub total_margin: f64,
    pub avg_margin: f64,
    pub games: u32,
    /// ATS win percentage, pushes counted as half a win
    pub win_pct: f64,
    /// Win percentage plus average cover margin
    pub dominance_score: f64,
    /// Game-by-game results, most recent week first
    pub history: Vec<TeamGameRecord>,
}

impl TeamStats {
    pub fn format_record(&self) -> String {
        format!("{}-{}-{}", self.wins, self.losses, self.pushes)
    }
}

/// Truncation point for "standings as of week N"
///
/// A date cutoff from the season calendar is preferred, since raw week
/// numbers are ambiguous across the regular/postseason boundary; the week
/// variant is the fallback when no calendar data is available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatsCutoff {
    Date(DateTime<Utc>),
    Week(i32),
}

#[derive(Default)]
struct TeamAccum {
    wins: u32,
    losses: u32,
    pushes: u32,
    total_margin: f64,
    games: u32,
    history: Vec<TeamGameRecord>,
}

impl TeamAccum {
    fn add(&mut self, record: TeamGameRecord) {
        match record.result {
            PickOutcome::Win => self.wins += 1,
            PickOutcome::Loss => self.losses += 1,
            PickOutcome::Push => self.pushes += 1,
        }
        self.total_margin += record.margin;
        self.games += 1;
        self.history.push(record);
    }
}

fn classify(margin: f64) -> PickOutcome {
    if margin > 0.0 {
        PickOutcome::Win
    } else if margin < 0.0 {
        PickOutcome::Loss
    } else {
        PickOutcome::Push
    }
}

/// Compute per-team ATS stats over a set of season games
///
/// Only games with both final scores and a numeric spread under the
/// selection policy count; anything else is skipped outright rather than
/// scored as a push or loss. Output is sorted by dominance score
/// descending; ties keep the order in which teams first appeared in the
/// input.
pub fn compute_team_stats(
    games: &[Game],
    cutoff: Option<StatsCutoff>,
    policy: &LineSelection,
) -> Vec<TeamStats> {
    let mut accums: HashMap<String, TeamAccum> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();

    for game in games {
        match cutoff {
            Some(StatsCutoff::Date(date)) => {
                if game.start_date > date {
                    continue;
                }
            }
            Some(StatsCutoff::Week(week)) => {
                if game.week > week {
                    continue;
                }
            }
            None => {}
        }

        let (Some(home_score), Some(away_score)) = (game.home_score, game.away_score) else {
            continue;
        };
        let Some(spread) = game.spread(policy) else {
            tracing::debug!(game_id = game.id, "skipping game with no numeric spread");
            continue;
        };

        // Cover margins, each from its own side's perspective
        let home_margin = (home_score - away_score) as f64 + spread;
        let away_margin = (away_score - home_score) as f64 - spread;

        let home_record = TeamGameRecord {
            week: game.week,
            opponent: game.away_team.clone(),
            result: classify(home_margin),
            margin: home_margin,
            spread,
            score: format!("{}-{}", home_score, away_score),
            score_diff: home_score - away_score,
        };
        let away_record = TeamGameRecord {
            week: game.week,
            opponent: game.home_team.clone(),
            result: classify(away_margin),
            margin: away_margin,
            spread: -spread,
            score: format!("{}-{}", away_score, home_score),
            score_diff: away_score - home_score,
        };

        for (team, record) in [(&game.home_team, home_record), (&game.away_team, away_record)] {
            if !accums.contains_key(team) {
                first_seen.push(team.clone());
            }
            accums.entry(team.clone()).or_default().add(record);
        }
    }

    let mut stats: Vec<TeamStats> = first_seen
        .into_iter()
        .filter_map(|team| accums.remove(&team).map(|accum| (team, accum)))
        .map(|(team, mut accum)| {
            let games = accum.games;
            let win_pct = if games > 0 {
                (accum.wins as f64 + 0.5 * accum.pushes as f64) / games as f64 * 100.0
            } else {
                0.0
            };
            let avg_margin = if games > 0 {
                accum.total_margin / games as f64
            } else {
                0.0
            };

            accum.history.sort_by(|a, b| b.week.cmp(&a.week));

            TeamStats {
                team,
                wins: accum.wins,
                losses: accum.losses,
                pushes: accum.pushes,
                total_margin: accum.total_margin,
                avg_margin,
                games,
                win_pct,
                dominance_score: win_pct + avg_margin,
                history: accum.history,
            }
        })
        .collect();

    // Stable sort keeps first-appearance order on ties
    stats.sort_by(|a, b| {
        b.dominance_score
            .partial_cmp(&a.dominance_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    stats
}
