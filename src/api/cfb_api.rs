use crate::models::{BettingLine, CalendarWeek, Game};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;

const BASE_URL: &str = "https://api.collegefootballdata.com";

/// One game from the /games endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiGame {
    id: i32,
    season: i32,
    week: i32,
    season_type: String,
    start_date: DateTime<Utc>,
    home_team: String,
    home_conference: Option<String>,
    home_points: Option<i32>,
    away_team: String,
    away_conference: Option<String>,
    away_points: Option<i32>,
}

/// Lines for one game from the /lines endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiGameLines {
    id: i32,
    #[serde(default)]
    lines: Vec<BettingLine>,
}

pub struct CfbApiClient {
    client: Client,
    api_key: String,
}

impl CfbApiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", BASE_URL, path);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", path))?;

        if !response.status().is_success() {
            anyhow::bail!("CFBD API returned error for {}: {}", path, response.status());
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", path))
    }

    /// Fetch games for a season (optionally one week) with betting lines
    /// joined on by game id
    pub async fn fetch_games(
        &self,
        year: i32,
        week: Option<i32>,
        season_type: &str,
    ) -> Result<Vec<Game>> {
        let mut query = vec![
            ("year", year.to_string()),
            ("seasonType", season_type.to_string()),
        ];
        if let Some(week) = week {
            query.push(("week", week.to_string()));
        }

        let games: Vec<ApiGame> = self.get_json("/games", &query).await?;
        let lines: Vec<ApiGameLines> = self.get_json("/lines", &query).await?;

        let mut lines_by_game: HashMap<i32, Vec<BettingLine>> =
            lines.into_iter().map(|l| (l.id, l.lines)).collect();

        tracing::debug!(year, ?week, games = games.len(), "fetched games with lines");

        Ok(games
            .into_iter()
            .map(|game| Game {
                id: game.id,
                season: game.season,
                week: game.week,
                season_type: game.season_type,
                start_date: game.start_date,
                home_team: game.home_team,
                home_conference: game.home_conference,
                home_score: game.home_points,
                away_team: game.away_team,
                away_conference: game.away_conference,
                away_score: game.away_points,
                lines: lines_by_game.remove(&game.id).unwrap_or_default(),
            })
            .collect())
    }

    /// Fetch the week calendar for a season
    pub async fn fetch_calendar(&self, year: i32) -> Result<Vec<CalendarWeek>> {
        self.get_json("/calendar", &[("year", year.to_string())])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_from_env() -> CfbApiClient {
        dotenv::dotenv().ok();
        let api_key = std::env::var("COLLEGE_FOOTBALL_DATA_API_KEY")
            .expect("COLLEGE_FOOTBALL_DATA_API_KEY not set");
        CfbApiClient::new(api_key)
    }

    #[tokio::test]
    #[ignore]
    async fn test_fetch_games() {
        let client = client_from_env();
        let games = client.fetch_games(2024, Some(1), "regular").await.unwrap();
        assert!(!games.is_empty());
        assert!(games.iter().any(|g| !g.lines.is_empty()));
    }

    #[tokio::test]
    #[ignore]
    async fn test_fetch_calendar() {
        let client = client_from_env();
        let calendar = client.fetch_calendar(2024).await.unwrap();
        assert!(!calendar.is_empty());
    }
}
