use crate::models::Game;
use crate::utils::season_stats::TeamStats;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Five-level read on an upcoming matchup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    StrongHome,
    LeanHome,
    TossUp,
    LeanAway,
    StrongAway,
}

impl Recommendation {
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::StrongHome => "Strong Home",
            Recommendation::LeanHome => "Lean Home",
            Recommendation::TossUp => "Toss Up",
            Recommendation::LeanAway => "Lean Away",
            Recommendation::StrongAway => "Strong Away",
        }
    }
}

/// Dominance comparison for one matchup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchupEdge {
    /// Home dominance minus away dominance
    pub delta: f64,
    pub recommendation: Recommendation,
    /// Absolute delta, capped at 100
    pub confidence: f64,
}

/// A game paired with both teams' stats and the resulting read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartPick {
    pub game: Game,
    pub home_team_stats: Option<TeamStats>,
    pub away_team_stats: Option<TeamStats>,
    pub delta: f64,
    pub recommendation: Recommendation,
    pub confidence: f64,
}

/// Classify a matchup from the two teams' dominance scores
pub fn recommend_matchup(home_dominance: f64, away_dominance: f64) -> MatchupEdge {
    let delta = home_dominance - away_dominance;

    let recommendation = if delta >= 15.0 {
        Recommendation::StrongHome
    } else if delta >= 5.0 {
        Recommendation::LeanHome
    } else if delta <= -15.0 {
        Recommendation::StrongAway
    } else if delta <= -5.0 {
        Recommendation::LeanAway
    } else {
        Recommendation::TossUp
    };

    MatchupEdge {
        delta,
        recommendation,
        confidence: delta.abs().min(100.0),
    }
}

/// Build recommendations for a week's slate from prior-week stats
///
/// A game where either side has no stats entry (week one, or a team with
/// no qualifying games) comes back as a zero-confidence toss-up rather
/// than being scored off missing data. Output is sorted by confidence
/// descending.
pub fn build_smart_picks(games: &[Game], stats: &[TeamStats]) -> Vec<SmartPick> {
    let stats_by_team: HashMap<&str, &TeamStats> =
        stats.iter().map(|s| (s.team.as_str(), s)).collect();

    let mut picks: Vec<SmartPick> = games
        .iter()
        .map(|game| {
            let home_stats = stats_by_team.get(game.home_team.as_str()).copied();
            let away_stats = stats_by_team.get(game.away_team.as_str()).copied();

            let edge = match (home_stats, away_stats) {
                (Some(home), Some(away)) => {
                    recommend_matchup(home.dominance_score, away.dominance_score)
                }
                _ => MatchupEdge {
                    delta: 0.0,
                    recommendation: Recommendation::TossUp,
                    confidence: 0.0,
                },
            };

            SmartPick {
                game: game.clone(),
                home_team_stats: home_stats.cloned(),
                away_team_stats: away_stats.cloned(),
                delta: edge.delta,
                recommendation: edge.recommendation,
                confidence: edge.confidence,
            }
        })
        .collect();

    picks.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    picks
}
