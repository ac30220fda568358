use anyhow::{bail, Context, Result};
use cfb_ats_tracker::store::{JsonFileStorage, PickStatus, PickStore, RecordScope};
use cfb_ats_tracker::utils::calendar::current_week;
use cfb_ats_tracker::utils::data::{save_picks_to_csv, save_standings_to_csv};
use cfb_ats_tracker::utils::scoring::slate_record;
use cfb_ats_tracker::utils::season_stats::compute_team_stats;
use cfb_ats_tracker::utils::smart_picks::build_smart_picks;
use cfb_ats_tracker::{cutoff_through_week, fetch_season_data, Game, LineSelection, Side};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::collections::HashMap;

#[derive(Parser)]
#[command(name = "cfb-ats", about = "Track against-the-spread picks on college football games")]
struct Cli {
    /// Pick storage file
    #[arg(long, default_value = "cache/picks.json", global = true)]
    picks_file: String,

    /// Prefer a named line provider instead of the first published line
    #[arg(long, global = true)]
    provider: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List a week's games with lines, scores, and your picks
    Games {
        #[arg(long)]
        year: i32,
        /// Defaults to the current week from the season calendar
        #[arg(long)]
        week: Option<i32>,
    },
    /// Record a pick on a game
    Pick {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        week: Option<i32>,
        #[arg(long)]
        game_id: i32,
        #[arg(long, value_enum)]
        side: SideArg,
    },
    /// Attach final scores to pending picks
    Resolve {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        week: Option<i32>,
    },
    /// Show your aggregate win-loss-push record
    Record {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        week: Option<i32>,
        /// Also write every stored pick to a CSV file
        #[arg(long)]
        csv: Option<String>,
    },
    /// Season ATS standings by dominance score
    Standings {
        #[arg(long)]
        year: i32,
        /// Only count games through this week
        #[arg(long)]
        through_week: Option<i32>,
        /// Also write the table to a CSV file
        #[arg(long)]
        csv: Option<String>,
    },
    /// Recommendations for a week's matchups from prior-week stats
    Smart {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        week: i32,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SideArg {
    Home,
    Away,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Home => Side::Home,
            SideArg::Away => Side::Away,
        }
    }
}

fn format_line(game: &Game, policy: &LineSelection) -> String {
    match game.spread(policy) {
        Some(spread) => format!("{} {:+.1}", game.home_team, spread),
        None => "no line".to_string(),
    }
}

fn format_score(game: &Game) -> String {
    match (game.home_score, game.away_score) {
        (Some(home), Some(away)) => format!("final {}-{}", home, away),
        _ => "scheduled".to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let use_cache = std::env::var("USE_CACHE").unwrap_or_default() == "1";
    let policy = match &cli.provider {
        Some(name) => LineSelection::Provider(name.clone()),
        None => LineSelection::First,
    };
    let mut store = PickStore::load(JsonFileStorage::new(&cli.picks_file))
        .context("Failed to load pick store")?;

    match cli.command {
        Command::Games { year, week } => {
            let data = fetch_season_data(year, week, use_cache).await?;
            let week = week.unwrap_or_else(|| current_week(&data.calendar, Utc::now()));
            let slate: Vec<Game> = data
                .games
                .into_iter()
                .filter(|g| g.week == week)
                .collect();

            println!("{} week {} - {} games\n", year, week, slate.len());
            for game in &slate {
                let marker = match store.side_for(game.id) {
                    Some(Side::Home) => format!(" [picked {}]", game.home_team),
                    Some(Side::Away) => format!(" [picked {}]", game.away_team),
                    None => String::new(),
                };
                println!(
                    "{:>9}  {} @ {} | {} | {}{}",
                    game.id,
                    game.away_team,
                    game.home_team,
                    format_line(game, &policy),
                    format_score(game),
                    marker
                );
            }

            let picks: HashMap<i32, Side> = slate
                .iter()
                .filter_map(|g| store.side_for(g.id).map(|s| (g.id, s)))
                .collect();
            if !picks.is_empty() {
                let record = slate_record(&slate, &picks, &policy);
                println!("\nWeek record so far: {}", record.format());
            }
        }

        Command::Pick {
            year,
            week,
            game_id,
            side,
        } => {
            let data = fetch_season_data(year, week, use_cache).await?;
            let game = data
                .games
                .iter()
                .find(|g| g.id == game_id)
                .with_context(|| format!("Game {} not found in the fetched slate", game_id))?;
            let Some(spread) = game.spread(&policy) else {
                bail!(
                    "Game {} ({} @ {}) has no numeric spread to pick against",
                    game_id,
                    game.away_team,
                    game.home_team
                );
            };

            let side: Side = side.into();
            let pick = store.record_pick(game, side, spread)?;
            let team = match side {
                Side::Home => &game.home_team,
                Side::Away => &game.away_team,
            };
            match pick.status {
                PickStatus::Pending => {
                    println!("Picked {} ({:+.1}) - pending", team, pick.spread)
                }
                PickStatus::Resolved { outcome, .. } => println!(
                    "Picked {} ({:+.1}) - game already final: {:?}",
                    team, pick.spread, outcome
                ),
            }
        }

        Command::Resolve { year, week } => {
            let data = fetch_season_data(year, week, use_cache).await?;
            let resolved = store.resolve_from_games(&data.games)?;
            println!("Resolved {} pick(s)", resolved);
            let record = store.aggregate_record(RecordScope::Year { year });
            println!("{} record: {}", year, record.format());
        }

        Command::Record { year, week, csv } => {
            let scope = match (year, week) {
                (Some(year), Some(week)) => RecordScope::Week { year, week },
                (Some(year), None) => RecordScope::Year { year },
                (None, None) => RecordScope::All,
                (None, Some(_)) => bail!("--week requires --year"),
            };
            let record = store.aggregate_record(scope);
            println!("Record: {}", record.format());

            if let Some(path) = csv {
                let mut picks: Vec<_> = store.picks().collect();
                picks.sort_by_key(|p| (p.season, p.week, p.game_id));
                save_picks_to_csv(&picks, &path)?;
                println!("Saved {} pick(s) to {}", picks.len(), path);
            }
        }

        Command::Standings {
            year,
            through_week,
            csv,
        } => {
            let data = fetch_season_data(year, None, use_cache).await?;
            let cutoff = through_week.map(|w| cutoff_through_week(&data.calendar, w));
            let stats = compute_team_stats(&data.games, cutoff, &policy);

            match through_week {
                Some(week) => println!("{} ATS standings through week {}\n", year, week),
                None => println!("{} ATS standings\n", year),
            }
            println!(
                "{:<4} {:<25} {:>7} {:>7} {:>11} {:>10}",
                "#", "Team", "Record", "Win %", "Avg Margin", "Dominance"
            );
            for (i, team) in stats.iter().enumerate() {
                println!(
                    "{:<4} {:<25} {:>7} {:>6.1}% {:>11.2} {:>10.2}",
                    i + 1,
                    team.team,
                    team.format_record(),
                    team.win_pct,
                    team.avg_margin,
                    team.dominance_score
                );
            }

            if let Some(path) = csv {
                save_standings_to_csv(&stats, &path)?;
                println!("\nSaved standings to {}", path);
            }
        }

        Command::Smart { year, week } => {
            let data = fetch_season_data(year, None, use_cache).await?;

            // Stats through the previous week; week one has no history and
            // every matchup comes back a toss-up
            let stats = if week > 1 {
                let cutoff = cutoff_through_week(&data.calendar, week - 1);
                compute_team_stats(&data.games, Some(cutoff), &policy)
            } else {
                Vec::new()
            };

            let slate: Vec<Game> = data
                .games
                .into_iter()
                .filter(|g| g.week == week)
                .collect();
            let picks = build_smart_picks(&slate, &stats);

            println!("{} week {} smart picks\n", year, week);
            for pick in &picks {
                println!(
                    "{} @ {} | {} | delta {:+.1} | confidence {:.0}",
                    pick.game.away_team,
                    pick.game.home_team,
                    pick.recommendation.label(),
                    pick.delta,
                    pick.confidence
                );
            }
        }
    }

    Ok(())
}
