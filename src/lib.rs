pub mod api;
pub mod models;
pub mod store;
pub mod utils;

pub use api::CfbApiClient;
pub use models::*;
pub use store::{JsonFileStorage, MemoryStorage, Pick, PickStatus, PickStore, RecordScope, StoreError};
pub use utils::scoring::{evaluate_spread, slate_record};
pub use utils::season_stats::{compute_team_stats, StatsCutoff, TeamGameRecord, TeamStats};
pub use utils::smart_picks::{build_smart_picks, recommend_matchup, Recommendation, SmartPick};

use anyhow::{Context, Result};
use std::path::Path;
use utils::data::{
    load_calendar_from_cache, load_games_from_cache, save_calendar_to_cache, save_games_to_cache,
};

/// Everything the UI layer needs for one request: the season's games (one
/// week or the full slate) and the week calendar
#[derive(Debug, Clone)]
pub struct SeasonData {
    pub games: Vec<Game>,
    pub calendar: Vec<CalendarWeek>,
}

/// Fetch games and the season calendar from the API or cache
///
/// On fetch failure the fixture slate is substituted so downstream
/// computation still has data to work with; the caller sees a warning,
/// not a transport error.
pub async fn fetch_season_data(year: i32, week: Option<i32>, use_cache: bool) -> Result<SeasonData> {
    dotenv::dotenv().ok();

    let api_key = std::env::var("COLLEGE_FOOTBALL_DATA_API_KEY")
        .context("COLLEGE_FOOTBALL_DATA_API_KEY not set in .env file")?;
    let client = CfbApiClient::new(api_key);

    let games_cache_file = match week {
        Some(week) => format!("cache/games_{}_{}.json", year, week),
        None => format!("cache/games_{}_all.json", year),
    };
    let calendar_cache_file = format!("cache/calendar_{}.json", year);

    let games = if use_cache && Path::new(&games_cache_file).exists() {
        tracing::debug!(cache_file = %games_cache_file, "loading games from cache");
        load_games_from_cache(&games_cache_file)?
    } else {
        match client.fetch_games(year, week, "regular").await {
            Ok(games) => {
                save_games_to_cache(&games, &games_cache_file)?;
                games
            }
            Err(e) => {
                tracing::warn!(error = %e, "game fetch failed, using fixture slate");
                utils::data::fixture_games()
            }
        }
    };

    let calendar = if use_cache && Path::new(&calendar_cache_file).exists() {
        tracing::debug!(cache_file = %calendar_cache_file, "loading calendar from cache");
        load_calendar_from_cache(&calendar_cache_file)?
    } else {
        match client.fetch_calendar(year).await {
            Ok(calendar) => {
                save_calendar_to_cache(&calendar, &calendar_cache_file)?;
                calendar
            }
            Err(e) => {
                tracing::warn!(error = %e, "calendar fetch failed, continuing without one");
                Vec::new()
            }
        }
    };

    Ok(SeasonData { games, calendar })
}

/// Stats cutoff for "through week N", preferring a calendar date over the
/// raw week number
pub fn cutoff_through_week(calendar: &[CalendarWeek], week: i32) -> StatsCutoff {
    match utils::calendar::week_cutoff(calendar, week) {
        Some(date) => StatsCutoff::Date(date),
        None => StatsCutoff::Week(week),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cutoff_prefers_calendar_date() {
        let calendar = vec![CalendarWeek {
            season: 2024,
            week: 4,
            season_type: "regular".to_string(),
            start_date: "2024-09-17T00:00:00Z".parse().unwrap(),
            end_date: "2024-09-22T23:59:59Z".parse().unwrap(),
            first_game_start: "2024-09-20T23:00:00Z".parse().unwrap(),
            last_game_start: "2024-09-21T23:00:00Z".parse().unwrap(),
        }];

        assert_eq!(
            cutoff_through_week(&calendar, 4),
            StatsCutoff::Date("2024-09-22T23:59:59Z".parse().unwrap())
        );
        assert_eq!(cutoff_through_week(&calendar, 7), StatsCutoff::Week(7));
        assert_eq!(cutoff_through_week(&[], 2), StatsCutoff::Week(2));
    }
}
