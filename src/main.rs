use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swiss_engine::config::AppConfig;
use swiss_engine::lifecycle::ResultEntry;
use swiss_engine::models::{EntityId, Pair, RoundState, Tournament};
use swiss_engine::storage::{JsonlStore, StorageConfig, TournamentStore};
use swiss_engine::tournament::TournamentService;

#[derive(Parser)]
#[command(name = "swiss-engine")]
#[command(about = "Swiss-style chess tournament pairing and standings")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new tournament
    CreateTournament {
        /// Tournament name (must be unique)
        name: String,
    },

    /// List all tournaments
    Tournaments,

    /// Rename a tournament
    RenameTournament {
        /// Current tournament name
        tournament: String,

        /// New tournament name (must be unique)
        new_name: String,
    },

    /// Delete a tournament and all of its players, rounds, and results
    DeleteTournament {
        /// Tournament name
        tournament: String,
    },

    /// Register a player
    AddPlayer {
        /// Tournament name
        tournament: String,

        /// Player name
        name: String,

        /// Round the player joins from
        #[arg(long, default_value_t = 1)]
        joined_round: u32,
    },

    /// Import players from a name-per-line file
    ImportPlayers {
        /// Tournament name
        tournament: String,

        /// Path to the player list
        file: PathBuf,
    },

    /// List a tournament's players
    Players {
        /// Tournament name
        tournament: String,
    },

    /// Generate and persist the next round's pairings
    GenerateRound {
        /// Tournament name
        tournament: String,
    },

    /// List a tournament's rounds
    Rounds {
        /// Tournament name
        tournament: String,
    },

    /// Move a pairing to a new position within a round
    Reorder {
        /// Tournament name
        tournament: String,

        /// Round number
        round: u32,

        /// Current position (0-based)
        source: usize,

        /// New position (0-based)
        target: usize,
    },

    /// Record (or re-record) a round's results
    RecordResult {
        /// Tournament name
        tournament: String,

        /// Round number
        round: u32,

        /// One per board: "WHITE,BLACK=WPTS,BPTS" or "WHITE=0" for a bye
        #[arg(long = "game", required = true)]
        games: Vec<String>,
    },

    /// Show the current standings table
    Standings {
        /// Tournament name
        tournament: String,
    },
}

fn open_store(cli: &Cli) -> Result<JsonlStore> {
    let config_path = PathBuf::from(&cli.config);
    let mut config = if config_path.exists() {
        AppConfig::from_file(&config_path)
            .with_context(|| format!("Failed to load config from {}", cli.config))?
    } else {
        AppConfig::default()
    };

    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }

    Ok(JsonlStore::new(StorageConfig::new(config.data_dir)))
}

fn find_tournament(store: &JsonlStore, name: &str) -> Result<Tournament> {
    store
        .list_tournaments()?
        .into_iter()
        .find(|t| t.name == name)
        .ok_or_else(|| anyhow!("No tournament named '{}'", name))
}

fn open_service(cli: &Cli, tournament: &str) -> Result<TournamentService<JsonlStore>> {
    let store = open_store(cli)?;
    let tournament = find_tournament(&store, tournament)?;
    Ok(TournamentService::new(store, tournament.id))
}

/// Parse one `--game` argument: "WHITE,BLACK=WPTS,BPTS" or "WHITE=0".
fn parse_game(raw: &str) -> Result<ResultEntry> {
    let (players, points) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected 'WHITE,BLACK=WPTS,BPTS', got '{}'", raw))?;

    let mut player_parts = players.splitn(2, ',');
    let white = player_parts
        .next()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| anyhow!("Missing white player in '{}'", raw))?;
    let black = player_parts.next().map(str::trim).filter(|s| !s.is_empty());

    let (white_points, black_points) = match points.split_once(',') {
        Some((w, b)) => (w.to_string(), b.to_string()),
        None => (points.to_string(), "0".to_string()),
    };

    Ok(ResultEntry {
        white: EntityId::from(white.trim()),
        black: black.map(EntityId::from),
        white_points,
        black_points,
    })
}

fn describe_pair(pair: &Pair) -> String {
    match &pair.black {
        Some(black) => format!("{} vs {}", pair.white, black),
        None => format!("{} (bye)", pair.white),
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::CreateTournament { name } => {
            let store = open_store(cli)?;
            let tournament = Tournament::new(name.clone());
            store.create_tournament(&tournament)?;
            println!("Created tournament '{}' ({})", tournament.name, tournament.id);
        }

        Commands::Tournaments => {
            let store = open_store(cli)?;
            for tournament in store.list_tournaments()? {
                println!("{}  {}", tournament.id, tournament.name);
            }
        }

        Commands::RenameTournament {
            tournament,
            new_name,
        } => {
            let store = open_store(cli)?;
            let existing = find_tournament(&store, tournament)?;
            store.rename_tournament(&existing.id, new_name)?;
            println!("Renamed '{}' to '{}'", tournament, new_name);
        }

        Commands::DeleteTournament { tournament } => {
            let store = open_store(cli)?;
            let existing = find_tournament(&store, tournament)?;
            store.delete_tournament(&existing.id)?;
            println!("Deleted tournament '{}'", tournament);
        }

        Commands::AddPlayer {
            tournament,
            name,
            joined_round,
        } => {
            let service = open_service(cli, tournament)?;
            let player = service.add_player(name, *joined_round)?;
            println!("Added {} ({})", player.name, player.id);
        }

        Commands::ImportPlayers { tournament, file } => {
            let service = open_service(cli, tournament)?;
            let contents = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let imported = service.import_players(&contents)?;
            println!("Imported {} players", imported.len());
        }

        Commands::Players { tournament } => {
            let service = open_service(cli, tournament)?;
            for (player, points) in service.roster()? {
                println!(
                    "{}  {:<24} joined round {:<3} {:.1} pts",
                    player.id, player.name, player.joined_round, points
                );
            }
        }

        Commands::GenerateRound { tournament } => {
            let service = open_service(cli, tournament)?;
            let round = service.generate_round()?;
            println!("Round {}:", round.number);
            for (i, pair) in round.pairings.iter().enumerate() {
                println!("  {}. {}", i + 1, describe_pair(pair));
            }
        }

        Commands::Rounds { tournament } => {
            let service = open_service(cli, tournament)?;
            for round in service.rounds()? {
                let status = match round.state() {
                    RoundState::Resulted => "resulted",
                    RoundState::Paired => "pending",
                };
                println!(
                    "Round {:<3} {:<10} {} boards  ({})",
                    round.number,
                    status,
                    round.pairings.len(),
                    round.id
                );
            }
        }

        Commands::Reorder {
            tournament,
            round,
            source,
            target,
        } => {
            let service = open_service(cli, tournament)?;
            let round_id = round_id_by_number(&service, *round)?;
            let updated = service.reorder_round_pairings(&round_id, *source, *target)?;
            for (i, pair) in updated.pairings.iter().enumerate() {
                println!("  {}. {}", i + 1, describe_pair(pair));
            }
        }

        Commands::RecordResult {
            tournament,
            round,
            games,
        } => {
            let service = open_service(cli, tournament)?;
            let round_id = round_id_by_number(&service, *round)?;
            let entries = games
                .iter()
                .map(|g| parse_game(g))
                .collect::<Result<Vec<_>>>()?;
            service.record_result(&round_id, &entries)?;
            println!("Recorded results for round {}", round);
        }

        Commands::Standings { tournament } => {
            let service = open_service(cli, tournament)?;
            println!(
                "{:<5} {:<24} {:>7} {:>9} {:>5}",
                "Rank", "Player", "Points", "Buchholz", "Wins"
            );
            for row in service.standings()? {
                println!(
                    "{:<5} {:<24} {:>7.1} {:>9.1} {:>5}",
                    row.rank, row.name, row.points, row.buchholz, row.wins
                );
            }
        }
    }

    Ok(())
}

fn round_id_by_number(
    service: &TournamentService<JsonlStore>,
    number: u32,
) -> Result<swiss_engine::models::RoundId> {
    let round = service
        .rounds()?
        .into_iter()
        .find(|r| r.number == number)
        .ok_or_else(|| anyhow!("No round numbered {}", number))?;
    Ok(round.id)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    run(&cli)
}
