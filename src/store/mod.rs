use crate::models::{Game, PickOutcome, PickRecord, Side};
use crate::utils::scoring::evaluate_spread;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access pick storage: {0}")]
    Storage(#[from] std::io::Error),
    #[error("failed to encode or decode picks: {0}")]
    Serde(#[from] serde_json::Error),
}

/// A user's pick on one game, with the game metadata snapshotted at pick
/// time
///
/// The spread is frozen when the pick is made; later line movement never
/// changes how the pick scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    pub game_id: i32,
    pub side: Side,
    pub season: i32,
    pub week: i32,
    pub home_team: String,
    pub away_team: String,
    pub spread: f64,
    #[serde(flatten)]
    pub status: PickStatus,
}

/// Lifecycle of a pick: pending until final scores arrive, then resolved
/// with the outcome derived from the snapshotted side and spread
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PickStatus {
    Pending,
    Resolved {
        outcome: PickOutcome,
        home_score: i32,
        away_score: i32,
    },
}

impl PickStatus {
    pub fn is_resolved(&self) -> bool {
        matches!(self, PickStatus::Resolved { .. })
    }

    pub fn outcome(&self) -> Option<PickOutcome> {
        match self {
            PickStatus::Resolved { outcome, .. } => Some(*outcome),
            PickStatus::Pending => None,
        }
    }
}

/// Filter for aggregate records over stored picks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordScope {
    Week { year: i32, week: i32 },
    Year { year: i32 },
    All,
}

/// Durable backing for the pick collection, stored as one opaque blob
pub trait PickStorage {
    fn load(&self) -> Result<Option<String>, StoreError>;
    fn save(&mut self, blob: &str) -> Result<(), StoreError>;
}

/// Pick storage backed by a JSON file on disk
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PickStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<String>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&self.path)?))
    }

    fn save(&mut self, blob: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, blob)?;
        Ok(())
    }
}

/// In-memory pick storage, for tests and ephemeral stores
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blob: Option<String>,
}

impl PickStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.blob.clone())
    }

    fn save(&mut self, blob: &str) -> Result<(), StoreError> {
        self.blob = Some(blob.to_string());
        Ok(())
    }
}

/// Owns the user's picks, keyed by game id, on top of injected storage
///
/// Every mutation persists the full collection before returning, so a
/// reload always reconstructs the same state.
pub struct PickStore<S: PickStorage> {
    storage: S,
    picks: HashMap<i32, Pick>,
}

impl<S: PickStorage> PickStore<S> {
    pub fn load(storage: S) -> Result<Self, StoreError> {
        let picks = match storage.load()? {
            Some(blob) => serde_json::from_str(&blob)?,
            None => HashMap::new(),
        };
        Ok(Self { storage, picks })
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let blob = serde_json::to_string_pretty(&self.picks)?;
        self.storage.save(&blob)
    }

    /// Record a pick against the given spread, overwriting any earlier
    /// pick for the same game (and discarding its result)
    ///
    /// If the game already has final scores the pick resolves immediately;
    /// otherwise it stays pending until scores are attached.
    pub fn record_pick(&mut self, game: &Game, side: Side, spread: f64) -> Result<Pick, StoreError> {
        let status = match (game.home_score, game.away_score) {
            (Some(home_score), Some(away_score)) => PickStatus::Resolved {
                outcome: evaluate_spread(home_score, away_score, spread, side),
                home_score,
                away_score,
            },
            _ => PickStatus::Pending,
        };

        let pick = Pick {
            game_id: game.id,
            side,
            season: game.season,
            week: game.week,
            home_team: game.home_team.clone(),
            away_team: game.away_team.clone(),
            spread,
            status,
        };

        self.picks.insert(game.id, pick.clone());
        self.persist()?;
        Ok(pick)
    }

    /// Attach final scores to a stored pick, resolving it with its own
    /// frozen side and spread
    ///
    /// A game id with no stored pick is a no-op, not an error.
    pub fn attach_result(
        &mut self,
        game_id: i32,
        home_score: i32,
        away_score: i32,
    ) -> Result<(), StoreError> {
        let Some(pick) = self.picks.get_mut(&game_id) else {
            return Ok(());
        };

        pick.status = PickStatus::Resolved {
            outcome: evaluate_spread(home_score, away_score, pick.spread, pick.side),
            home_score,
            away_score,
        };
        self.persist()
    }

    /// Resolve every pending pick whose game is final in the given list,
    /// returning how many picks were resolved
    pub fn resolve_from_games(&mut self, games: &[Game]) -> Result<u32, StoreError> {
        let mut resolved = 0;

        for game in games {
            let (Some(home_score), Some(away_score)) = (game.home_score, game.away_score) else {
                continue;
            };
            let Some(pick) = self.picks.get_mut(&game.id) else {
                continue;
            };
            if pick.status.is_resolved() {
                continue;
            }

            pick.status = PickStatus::Resolved {
                outcome: evaluate_spread(home_score, away_score, pick.spread, pick.side),
                home_score,
                away_score,
            };
            resolved += 1;
        }

        if resolved > 0 {
            self.persist()?;
        }
        Ok(resolved)
    }

    pub fn get(&self, game_id: i32) -> Option<&Pick> {
        self.picks.get(&game_id)
    }

    /// Which side is picked for a game, if any
    pub fn side_for(&self, game_id: i32) -> Option<Side> {
        self.picks.get(&game_id).map(|p| p.side)
    }

    pub fn picks(&self) -> impl Iterator<Item = &Pick> {
        self.picks.values()
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    /// Win-loss-push record over resolved picks in the given scope
    ///
    /// Pending picks are excluded; accumulation is order-independent.
    pub fn aggregate_record(&self, scope: RecordScope) -> PickRecord {
        let mut record = PickRecord::default();

        for pick in self.picks.values() {
            match scope {
                RecordScope::Week { year, week } => {
                    if pick.season != year || pick.week != week {
                        continue;
                    }
                }
                RecordScope::Year { year } => {
                    if pick.season != year {
                        continue;
                    }
                }
                RecordScope::All => {}
            }

            if let Some(outcome) = pick.status.outcome() {
                record.add(outcome);
            }
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BettingLine;

    fn game(id: i32, season: i32, week: i32, score: Option<(i32, i32)>) -> Game {
        Game {
            id,
            season,
            week,
            season_type: "regular".to_string(),
            start_date: "2024-08-31T16:00:00Z".parse().unwrap(),
            home_team: "Georgia".to_string(),
            home_conference: Some("SEC".to_string()),
            home_score: score.map(|s| s.0),
            away_team: "Clemson".to_string(),
            away_conference: Some("ACC".to_string()),
            away_score: score.map(|s| s.1),
            lines: vec![BettingLine {
                provider: "consensus".to_string(),
                spread: Some(-7.0),
                formatted_spread: None,
                over_under: None,
            }],
        }
    }

    fn store() -> PickStore<MemoryStorage> {
        PickStore::load(MemoryStorage::default()).unwrap()
    }

    #[test]
    fn test_pick_without_scores_stays_pending() {
        let mut store = store();
        let pick = store
            .record_pick(&game(1, 2024, 1, None), Side::Home, -7.0)
            .unwrap();
        assert_eq!(pick.status, PickStatus::Pending);
        assert_eq!(store.side_for(1), Some(Side::Home));
    }

    #[test]
    fn test_pick_with_scores_resolves_immediately() {
        let mut store = store();
        let pick = store
            .record_pick(&game(1, 2024, 1, Some((31, 17))), Side::Home, -7.0)
            .unwrap();
        assert_eq!(pick.status.outcome(), Some(PickOutcome::Win));
    }

    #[test]
    fn test_attach_result_uses_frozen_spread() {
        let mut store = store();
        // Picked at -7; by kickoff the line may have moved, but the stored
        // pick still scores at -7
        store
            .record_pick(&game(1, 2024, 1, None), Side::Home, -7.0)
            .unwrap();
        store.attach_result(1, 24, 17).unwrap();

        let pick = store.get(1).unwrap();
        assert_eq!(pick.status.outcome(), Some(PickOutcome::Push));
    }

    #[test]
    fn test_attach_result_for_unknown_game_is_noop() {
        let mut store = store();
        store.attach_result(99, 24, 17).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_repick_discards_previous_result() {
        let mut store = store();
        store
            .record_pick(&game(5, 2024, 1, Some((31, 17))), Side::Home, -7.0)
            .unwrap();
        assert!(store.get(5).unwrap().status.is_resolved());

        // Re-pick the other side before kickoff data is final again
        store
            .record_pick(&game(5, 2024, 1, None), Side::Away, -7.0)
            .unwrap();
        let pick = store.get(5).unwrap();
        assert_eq!(pick.side, Side::Away);
        assert_eq!(pick.status, PickStatus::Pending);
    }

    #[test]
    fn test_resolve_from_games_sweeps_pending_picks() {
        let mut store = store();
        store
            .record_pick(&game(1, 2024, 1, None), Side::Home, -7.0)
            .unwrap();
        store
            .record_pick(&game(2, 2024, 1, None), Side::Away, -7.0)
            .unwrap();

        let games = vec![
            game(1, 2024, 1, Some((31, 17))),
            game(2, 2024, 1, None), // still in progress
            game(3, 2024, 1, Some((14, 10))), // no pick
        ];
        let resolved = store.resolve_from_games(&games).unwrap();
        assert_eq!(resolved, 1);
        assert!(store.get(1).unwrap().status.is_resolved());
        assert_eq!(store.get(2).unwrap().status, PickStatus::Pending);
    }

    #[test]
    fn test_aggregate_record_scopes() {
        let mut store = store();
        store
            .record_pick(&game(1, 2023, 10, Some((31, 17))), Side::Home, -7.0)
            .unwrap(); // win
        store
            .record_pick(&game(2, 2024, 1, Some((20, 17))), Side::Home, -7.0)
            .unwrap(); // loss (won by 3, needed 7)
        store
            .record_pick(&game(3, 2024, 1, Some((24, 17))), Side::Away, -7.0)
            .unwrap(); // push
        store
            .record_pick(&game(4, 2024, 2, None), Side::Home, -3.0)
            .unwrap(); // pending, never counted

        let all = store.aggregate_record(RecordScope::All);
        assert_eq!((all.wins, all.losses, all.pushes), (1, 1, 1));

        let year = store.aggregate_record(RecordScope::Year { year: 2024 });
        assert_eq!((year.wins, year.losses, year.pushes), (0, 1, 1));

        let week = store.aggregate_record(RecordScope::Week {
            year: 2024,
            week: 1,
        });
        assert_eq!((week.wins, week.losses, week.pushes), (0, 1, 1));

        // All-time equals the sum over every distinct year present
        let y2023 = store.aggregate_record(RecordScope::Year { year: 2023 });
        assert_eq!(all.wins, year.wins + y2023.wins);
        assert_eq!(all.losses, year.losses + y2023.losses);
        assert_eq!(all.pushes, year.pushes + y2023.pushes);
    }

    #[test]
    fn test_round_trip_through_memory_storage() {
        let mut storage = MemoryStorage::default();
        {
            let mut store = PickStore::load(std::mem::take(&mut storage)).unwrap();
            store
                .record_pick(&game(1, 2024, 1, Some((31, 17))), Side::Home, -7.0)
                .unwrap();
            store
                .record_pick(&game(2, 2024, 2, None), Side::Away, 3.5)
                .unwrap();
            storage = store.storage;
        }

        let reloaded = PickStore::load(storage).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(
            reloaded.get(1).unwrap().status.outcome(),
            Some(PickOutcome::Win)
        );
        assert_eq!(reloaded.get(2).unwrap().status, PickStatus::Pending);
        assert_eq!(reloaded.get(2).unwrap().spread, 3.5);
    }

    #[test]
    fn test_round_trip_through_json_file() {
        let path = std::env::temp_dir().join(format!(
            "ats_picks_roundtrip_{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        {
            let mut store = PickStore::load(JsonFileStorage::new(&path)).unwrap();
            store
                .record_pick(&game(1, 2024, 1, None), Side::Away, 6.5)
                .unwrap();
        }

        let reloaded = PickStore::load(JsonFileStorage::new(&path)).unwrap();
        assert_eq!(reloaded.len(), 1);
        let pick = reloaded.get(1).unwrap();
        assert_eq!(pick.side, Side::Away);
        assert_eq!(pick.spread, 6.5);
        assert_eq!(pick.status, PickStatus::Pending);

        let _ = std::fs::remove_file(&path);
    }
}
