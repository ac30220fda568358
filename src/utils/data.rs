use crate::models::{BettingLine, CalendarWeek, Game};
use crate::store::Pick;
use crate::utils::season_stats::TeamStats;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;

/// Save fetched games to a JSON cache file
pub fn save_games_to_cache(games: &[Game], cache_file: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(games).context("Failed to serialize games")?;
    if let Some(parent) = std::path::Path::new(cache_file).parent() {
        std::fs::create_dir_all(parent).context("Failed to create cache directory")?;
    }
    std::fs::write(cache_file, json).context("Failed to write cache file")?;
    Ok(())
}

/// Load games from a JSON cache file
pub fn load_games_from_cache(cache_file: &str) -> Result<Vec<Game>> {
    let json = std::fs::read_to_string(cache_file).context("Failed to read cache file")?;
    let games: Vec<Game> = serde_json::from_str(&json).context("Failed to deserialize games")?;
    Ok(games)
}

/// Save a season calendar to a JSON cache file
pub fn save_calendar_to_cache(calendar: &[CalendarWeek], cache_file: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(calendar).context("Failed to serialize calendar")?;
    if let Some(parent) = std::path::Path::new(cache_file).parent() {
        std::fs::create_dir_all(parent).context("Failed to create cache directory")?;
    }
    std::fs::write(cache_file, json).context("Failed to write cache file")?;
    Ok(())
}

/// Load a season calendar from a JSON cache file
pub fn load_calendar_from_cache(cache_file: &str) -> Result<Vec<CalendarWeek>> {
    let json = std::fs::read_to_string(cache_file).context("Failed to read cache file")?;
    let calendar: Vec<CalendarWeek> =
        serde_json::from_str(&json).context("Failed to deserialize calendar")?;
    Ok(calendar)
}

/// Save season standings to CSV
pub fn save_standings_to_csv(stats: &[TeamStats], filename: &str) -> Result<()> {
    let mut file = File::create(filename).context("Failed to create CSV file")?;

    writeln!(
        file,
        "Team,Wins,Losses,Pushes,Games,Win %,Avg Margin,Dominance Score"
    )?;

    for team in stats {
        writeln!(
            file,
            "{},{},{},{},{},{:.1},{:.2},{:.2}",
            team.team,
            team.wins,
            team.losses,
            team.pushes,
            team.games,
            team.win_pct,
            team.avg_margin,
            team.dominance_score
        )?;
    }

    Ok(())
}

/// Save the pick collection to CSV
pub fn save_picks_to_csv(picks: &[&Pick], filename: &str) -> Result<()> {
    let mut file = File::create(filename).context("Failed to create CSV file")?;

    writeln!(
        file,
        "Game ID,Season,Week,Home Team,Away Team,Side,Spread,Status,Score"
    )?;

    for pick in picks {
        let (status, score) = match pick.status {
            crate::store::PickStatus::Pending => ("pending".to_string(), String::new()),
            crate::store::PickStatus::Resolved {
                outcome,
                home_score,
                away_score,
            } => (
                format!("{:?}", outcome).to_lowercase(),
                format!("{}-{}", home_score, away_score),
            ),
        };
        writeln!(
            file,
            "{},{},{},{},{},{:?},{:+.1},{},{}",
            pick.game_id,
            pick.season,
            pick.week,
            pick.home_team,
            pick.away_team,
            pick.side,
            pick.spread,
            status,
            score
        )?;
    }

    Ok(())
}

/// A small offline slate used when the API is unreachable
pub fn fixture_games() -> Vec<Game> {
    let line = |provider: &str, spread: f64, formatted: &str, total: f64| BettingLine {
        provider: provider.to_string(),
        spread: Some(spread),
        formatted_spread: Some(formatted.to_string()),
        over_under: Some(total),
    };

    vec![
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
            lines: vec![line("consensus", -13.5, "Georgia -13.5", 48.5)],
        },
        Game {
            id: 2,
            season: 2024,
            week: 1,
            season_type: "regular".to_string(),
            start_date: "2024-08-31T15:30:00Z".parse().unwrap(),
            home_team: "Florida".to_string(),
            home_conference: Some("SEC".to_string()),
            home_score: None,
            away_team: "Miami".to_string(),
            away_conference: Some("ACC".to_string()),
            away_score: None,
            lines: vec![line("consensus", 2.5, "Florida +2.5", 54.0)],
        },
        Game {
            id: 3,
            season: 2024,
            week: 1,
            season_type: "regular".to_string(),
            start_date: "2024-08-31T19:30:00Z".parse().unwrap(),
            home_team: "Texas A&M".to_string(),
            home_conference: Some("SEC".to_string()),
            home_score: None,
            away_team: "Notre Dame".to_string(),
            away_conference: Some("Independent".to_string()),
            away_score: None,
            lines: vec![line("consensus", -2.5, "Texas A&M -2.5", 49.5)],
        },
    ]
}
