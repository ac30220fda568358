use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single college football game with any betting lines attached
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: i32,
    pub season: i32,
    pub week: i32,
    pub season_type: String,
    pub start_date: DateTime<Utc>,
    pub home_team: String,
    pub home_conference: Option<String>,
    pub home_score: Option<i32>,
    pub away_team: String,
    pub away_conference: Option<String>,
    pub away_score: Option<i32>,
    #[serde(default)]
    pub lines: Vec<BettingLine>,
}

/// A point spread published by one provider
///
/// The spread is signed relative to the home team: -13.5 means the home
/// team is favored and must win by 14 or more to cover. A missing spread
/// stays `None`; it is never coerced to zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BettingLine {
    pub provider: String,
    pub spread: Option<f64>,
    pub formatted_spread: Option<String>,
    pub over_under: Option<f64>,
}

/// Policy for choosing among multiple published lines on a game
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LineSelection {
    /// Take the first line in wire order
    #[default]
    First,
    /// Prefer a named provider (case-insensitive), falling back to wire order
    Provider(String),
}

impl Game {
    /// True once both final scores are known
    pub fn is_final(&self) -> bool {
        self.home_score.is_some() && self.away_score.is_some()
    }

    /// The home-relative spread under the given selection policy, if any
    /// line carries a numeric spread
    pub fn spread(&self, policy: &LineSelection) -> Option<f64> {
        let with_spread = |line: &&BettingLine| line.spread.is_some();
        let line = match policy {
            LineSelection::First => self.lines.iter().find(with_spread),
            LineSelection::Provider(name) => self
                .lines
                .iter()
                .find(|l| l.provider.eq_ignore_ascii_case(name) && l.spread.is_some())
                .or_else(|| self.lines.iter().find(with_spread)),
        };
        line.and_then(|l| l.spread)
    }
}

/// Which side of the spread a pick is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

/// Outcome of a pick measured against the spread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickOutcome {
    Win,
    Loss,
    Push,
}

/// A win-loss-push tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickRecord {
    pub wins: u32,
    pub losses: u32,
    pub pushes: u32,
}

impl PickRecord {
    pub fn add(&mut self, outcome: PickOutcome) {
        match outcome {
            PickOutcome::Win => self.wins += 1,
            PickOutcome::Loss => self.losses += 1,
            PickOutcome::Push => self.pushes += 1,
        }
    }

    pub fn format(&self) -> String {
        format!("{}-{}-{}", self.wins, self.losses, self.pushes)
    }
}

/// One week's window in the season calendar, from the CFBD /calendar endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarWeek {
    pub season: i32,
    pub week: i32,
    pub season_type: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub first_game_start: DateTime<Utc>,
    pub last_game_start: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(provider: &str, spread: Option<f64>) -> BettingLine {
        BettingLine {
            provider: provider.to_string(),
            spread,
            formatted_spread: None,
            over_under: None,
        }
    }

    fn game_with_lines(lines: Vec<BettingLine>) -> Game {
        Game {
            id: 1,
            season: 2024,
            week: 1,
            season_type: "regular".to_string(),
            start_date: "2024-08-31T12:00:00Z".parse().unwrap(),
            home_team: "Georgia".to_string(),
            home_conference: Some("SEC".to_string()),
            home_score: None,
            away_team: "Clemson".to_string(),
            away_conference: Some("ACC".to_string()),
            away_score: None,
            lines,
        }
    }

    #[test]
    fn test_spread_first_line_wins() {
        let game = game_with_lines(vec![
            line("DraftKings", Some(-7.5)),
            line("consensus", Some(-6.5)),
        ]);
        assert_eq!(game.spread(&LineSelection::First), Some(-7.5));
    }

    #[test]
    fn test_spread_skips_lines_without_numbers() {
        let game = game_with_lines(vec![line("DraftKings", None), line("Bovada", Some(-3.0))]);
        assert_eq!(game.spread(&LineSelection::First), Some(-3.0));
    }

    #[test]
    fn test_spread_provider_policy_with_fallback() {
        let game = game_with_lines(vec![
            line("DraftKings", Some(-7.5)),
            line("consensus", Some(-6.5)),
        ]);
        let policy = LineSelection::Provider("Consensus".to_string());
        assert_eq!(game.spread(&policy), Some(-6.5));

        let policy = LineSelection::Provider("Pinnacle".to_string());
        assert_eq!(game.spread(&policy), Some(-7.5));
    }

    #[test]
    fn test_spread_none_when_no_lines() {
        let game = game_with_lines(vec![]);
        assert_eq!(game.spread(&LineSelection::First), None);
    }
}
