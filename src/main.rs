use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use futlife_league::api::state::AppState;
use futlife_league::calculate::{
    format_gametime, format_percent, MatchFilter, MatchdayRange, MatchdaySelection,
};
use futlife_league::config::AppConfig;
use futlife_league::league::{League, ResultEdit, StatsQuery};
use futlife_league::models::{
    DefWin, DivisionId, GamePosition, MatchId, PeriodId, PlayerId, TeamId,
};
use futlife_league::storage::{LeagueStore, StorageConfig};

#[derive(Parser)]
#[command(name = "futlife")]
#[command(about = "FUTLIFE league scores, statistics and standings")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./futlife.toml")]
    config: String,

    /// Data directory path (overrides the configuration file)
    #[arg(long)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a division's standings
    Standings {
        /// Division id or name
        division: String,

        /// First matchday label to count
        #[arg(long)]
        from: Option<String>,

        /// Last matchday label to count
        #[arg(long)]
        to: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List matches
    Matches {
        /// Division id or name (all divisions when omitted)
        #[arg(long)]
        division: Option<String>,

        /// Team id, name or initials
        #[arg(long)]
        team: Option<String>,

        /// Matchday label
        #[arg(long)]
        matchday: Option<String>,
    },

    /// Show one match with per-team stat sheets
    Match {
        id: u32,

        /// Only show one period (1-based)
        #[arg(long)]
        period: Option<usize>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print player statistics of a division
    Stats {
        /// Division id or name
        division: String,

        /// Team id, name or initials
        #[arg(long)]
        team: Option<String>,

        /// First matchday label (default: first matchday)
        #[arg(long)]
        from: Option<String>,

        /// Last matchday label (default: last fully played matchday)
        #[arg(long)]
        to: Option<String>,

        /// Only show one position (GK, DM, AM, ST)
        #[arg(long)]
        position: Option<String>,

        /// Hide players with less than one full game
        #[arg(long)]
        full_games_only: bool,

        /// Show counters per full game
        #[arg(long)]
        normalize: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Replace the result data of a match
    EditResult {
        /// Match id
        #[arg(long = "match")]
        match_id: u32,

        /// Period ids, comma separated (played in id order)
        #[arg(long, value_delimiter = ',')]
        periods: Vec<u32>,

        /// The second team played red in the first period
        #[arg(long)]
        second_starts_red: bool,

        /// Default win: 0 none, 1 first team, 2 second team, 3 void
        #[arg(long, default_value = "0")]
        defwin: u8,

        /// Goals added to the team that started red
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        add_red: i32,

        /// Goals added to the team that started blue
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        add_blue: i32,

        /// Replay link (empty clears it)
        #[arg(long)]
        replay_url: Option<String>,
    },

    /// Move a period from its match back to the pool
    DetachPeriod { period: u32 },

    /// Set the two teams of a match (the first one is home and starts red)
    SetTeams {
        #[arg(long = "match")]
        match_id: u32,

        team1: String,
        team2: String,
    },

    /// Add a nickname to a player
    AddNick {
        /// Player id or name
        player: String,
        nick: String,
    },

    /// Move a player to another team
    ChangeTeam {
        /// Player id or name
        player: String,

        /// New team id, name or initials (no team when omitted)
        #[arg(long)]
        team: Option<String>,
    },

    /// Register a new player
    AddPlayer {
        name: String,

        /// In-game nickname, repeatable
        #[arg(long = "nick")]
        nicks: Vec<String>,

        /// Team id, name or initials
        #[arg(long)]
        team: Option<String>,
    },

    /// Check the league data for integrity problems
    Validate,

    /// Start the API server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(Path::new(&cli.config))
        .with_context(|| format!("Failed to load configuration from {}", cli.config))?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = PathBuf::from(dir);
    }
    let log_level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::debug!("Starting futlife v{}", env!("CARGO_PKG_VERSION"));

    let store = LeagueStore::new(StorageConfig::new(config.data_dir.clone()));
    let rules = config.rules.clone();

    match cli.command {
        Commands::Standings {
            division,
            from,
            to,
            json,
        } => {
            let league = store.load()?;
            let division = find_division(&league, &division)?;
            let range = matchday_range(&league, division, from.as_deref(), to.as_deref())?;
            let rows = league.standings(division, range.as_ref(), &rules)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!(
                    "{:<4} {:<24} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4} {:>4} {:>5}",
                    "#", "Team", "GP", "W", "D", "L", "PTS", "DEF", "GF", "GA", "DIFF"
                );
                for (rank, row) in rows.iter().enumerate() {
                    println!(
                        "{:<4} {:<24} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4} {:>4} {:>5}",
                        rank + 1,
                        row.team_name,
                        row.games,
                        row.wins,
                        row.draws,
                        row.losses,
                        row.points,
                        row.defwins,
                        row.goals_scored,
                        row.goals_conceded,
                        row.differential
                    );
                }
            }
        }
        Commands::Matches {
            division,
            team,
            matchday,
        } => {
            let league = store.load()?;
            let divisions = match division {
                Some(d) => vec![find_division(&league, &d)?],
                None => league.divisions.iter().map(|d| d.id).collect(),
            };
            let team = team.map(|t| find_team(&league, &t)).transpose()?;
            let matchdays = match matchday {
                Some(label) => MatchdaySelection::Exactly(label),
                None => MatchdaySelection::All,
            };

            for division in divisions {
                let filter = MatchFilter::division(division)
                    .with_team(team)
                    .with_matchdays(matchdays.clone());
                for row in league.match_rows(&filter, &rules) {
                    let date = row
                        .date
                        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_default();
                    println!(
                        "{:>5}  {:<16}  {:<40}  {:>5}",
                        row.id, date, row.title, row.score
                    );
                }
            }
        }
        Commands::Match { id, period, json } => {
            let league = store.load()?;
            let report = league.match_report(MatchId::new(id), period, &rules)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                match report.period {
                    Some(number) => println!("=== {} (period {}) ===", report.title, number),
                    None => println!("=== {} ===", report.title),
                }
                println!("Score:       {}", report.result.display_score());
                if let Some((a, b)) = report.possession {
                    println!("Possession:  {} - {}", format_percent(a), format_percent(b));
                }
                if let Some((a, b)) = report.action_zone {
                    println!("Action zone: {} - {}", format_percent(a), format_percent(b));
                }
                if let Some(url) = &report.replay_url {
                    println!("Replay:      {}", url);
                }
                for team in &report.teams {
                    println!("\n{}", team.team_name);
                    for sheet in &team.sheets {
                        println!(
                            "  {:<24} {:<7} {:>7}  G {:>2}  A {:>2}  S {:>2}  CS {}",
                            sheet.player_name,
                            sheet.stats.position.label(),
                            format_gametime(sheet.stats.gametime),
                            sheet.stats.goals,
                            sheet.stats.assists,
                            sheet.stats.saves,
                            sheet.clean_sheets
                        );
                    }
                }
            }
        }
        Commands::Stats {
            division,
            team,
            from,
            to,
            position,
            full_games_only,
            normalize,
            json,
        } => {
            let league = store.load()?;
            let division = find_division(&league, &division)?;
            let query = StatsQuery {
                division,
                team: team.map(|t| find_team(&league, &t)).transpose()?,
                range: matchday_range(&league, division, from.as_deref(), to.as_deref())?,
                position: position
                    .map(|p| {
                        GamePosition::from_label(&p).ok_or_else(|| anyhow!("Unknown position '{}'", p))
                    })
                    .transpose()?,
                full_games_only,
            };
            let sheets = league.statistics(&query, &rules)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&sheets)?);
            } else {
                println!(
                    "{:<24} {:<16} {:<7} {:>7} {:>6} {:>6} {:>6} {:>6} {:>7}",
                    "Player", "Team", "Pos", "Time", "G", "A", "CS", "Saves", "Pass%"
                );
                for sheet in &sheets {
                    let (goals, assists, clean_sheets, saves) = if normalize {
                        let rates = sheet.per_full_game(rules.full_game_secs());
                        (rates.goals, rates.assists, rates.clean_sheets, rates.saves)
                    } else {
                        (
                            sheet.stats.goals as f64,
                            sheet.stats.assists as f64,
                            sheet.clean_sheets as f64,
                            sheet.stats.saves as f64,
                        )
                    };
                    println!(
                        "{:<24} {:<16} {:<7} {:>7} {:>6.2} {:>6.2} {:>6.2} {:>6.2} {:>7}",
                        sheet.player_name,
                        league.team_name(sheet.team),
                        sheet.stats.position.label(),
                        format_gametime(sheet.stats.gametime),
                        goals,
                        assists,
                        clean_sheets,
                        saves,
                        format_percent(sheet.pass_success())
                    );
                }
            }
        }
        Commands::EditResult {
            match_id,
            periods,
            second_starts_red,
            defwin,
            add_red,
            add_blue,
            replay_url,
        } => {
            let mut league = store.load()?;
            let edit = ResultEdit {
                first_team_starts_red: !second_starts_red,
                defwin: DefWin::try_from(defwin).map_err(|e| anyhow!(e))?,
                add_red,
                add_blue,
                period_ids: periods.into_iter().map(PeriodId::new).collect(),
                replay_url,
            };
            league.edit_result(MatchId::new(match_id), edit, &rules)?;
            store.save(&league)?;
            println!("Match {} updated", match_id);
        }
        Commands::DetachPeriod { period } => {
            let mut league = store.load()?;
            let owner = league.detach_period(PeriodId::new(period))?;
            store.save(&league)?;
            println!("Period {} detached from match {}", period, owner);
        }
        Commands::SetTeams {
            match_id,
            team1,
            team2,
        } => {
            let mut league = store.load()?;
            let first = find_team(&league, &team1)?;
            let second = find_team(&league, &team2)?;
            league.set_match_teams(MatchId::new(match_id), first, second)?;
            store.save(&league)?;
            let title = league.match_title(league.get_match(MatchId::new(match_id))?);
            println!("Match {} is now {}", match_id, title);
        }
        Commands::AddNick { player, nick } => {
            let mut league = store.load()?;
            let player = find_player(&league, &player)?;
            league.add_nick(player, &nick)?;
            store.save(&league)?;
            println!("Nickname '{}' added to player {}", nick.trim(), player);
        }
        Commands::ChangeTeam { player, team } => {
            let mut league = store.load()?;
            let player = find_player(&league, &player)?;
            let team = team.map(|t| find_team(&league, &t)).transpose()?;
            league.change_team(player, team)?;
            store.save(&league)?;
            match team {
                Some(team) => println!("Player {} moved to {}", player, league.team_name(team)),
                None => println!("Player {} no longer has a team", player),
            }
        }
        Commands::AddPlayer { name, nicks, team } => {
            let mut league = store.load()?;
            let team = team.map(|t| find_team(&league, &t)).transpose()?;
            let id = league.register_player(&name, &nicks, team)?;
            store.save(&league)?;
            println!("Registered {} with id {}", name.trim(), id);
        }
        Commands::Validate => {
            let league = store.load()?;
            let report = league.validate();
            if report.is_clean() {
                println!("No integrity issues found");
            } else {
                println!("{} integrity issue(s):", report.issues.len());
                for issue in &report.issues {
                    println!("  - {}", issue);
                }
                std::process::exit(1);
            }
        }
        Commands::Serve { host, port } => {
            let league = store.load()?;
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState::new(league, rules, &config.server.cors_origin);
            let app = futlife_league::api::build_router(state);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("API: http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

/// Division by numeric id or name.
fn find_division(league: &League, key: &str) -> Result<DivisionId> {
    if let Ok(id) = key.parse::<DivisionId>() {
        if let Ok(division) = league.division(id) {
            return Ok(division.id);
        }
    }
    league
        .division_by_name(key)
        .map(|d| d.id)
        .ok_or_else(|| anyhow!("Unknown division '{}'", key))
}

/// Team by numeric id, name or initials.
fn find_team(league: &League, key: &str) -> Result<TeamId> {
    if let Ok(id) = key.parse::<TeamId>() {
        if let Ok(team) = league.team(id) {
            return Ok(team.id);
        }
    }
    league
        .team_by_name(key)
        .map(|t| t.id)
        .ok_or_else(|| anyhow!("Unknown team '{}'", key))
}

/// Player by numeric id or name.
fn find_player(league: &League, key: &str) -> Result<PlayerId> {
    if let Ok(id) = key.parse::<PlayerId>() {
        if let Ok(player) = league.player(id) {
            return Ok(player.id);
        }
    }
    league
        .player_by_name(key)
        .map(|p| p.id)
        .ok_or_else(|| anyhow!("Unknown player '{}'", key))
}

/// Inclusive matchday range from optional labels; `None` when neither is given.
fn matchday_range(
    league: &League,
    division: DivisionId,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<Option<MatchdayRange>> {
    if from.is_none() && to.is_none() {
        return Ok(None);
    }
    let order = league.matchday_order(division);
    match order.range_between(from, to) {
        Some(range) => Ok(Some(range)),
        None => bail!(
            "Unknown matchday; expected one of: {}",
            order.labels().join(", ")
        ),
    }
}
