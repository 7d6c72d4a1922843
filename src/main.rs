//! Role Reveal CLI
//!
//! Private role reveal and score keeping for one device in a room.
//! Pure queries (`role`, `deal`, `tip`) need no saved state; room commands
//! persist to a data directory.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use role_reveal::{
    game::scoring::format_delta,
    normalize_room_code,
    storage::StorageConfig,
    FileStore, GameStore, JoinRequest, Outcome, PlayerNumber, Role, RoomSession, VERSION,
};

#[derive(Parser)]
#[command(name = "role-reveal", version, about = "Deterministic role reveal and scoring")]
struct Cli {
    /// Data directory (overrides ROLE_REVEAL_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show one player's role for a round
    Role {
        #[arg(long)]
        room: String,
        #[arg(long)]
        round: u32,
        #[arg(long)]
        players: u32,
        #[arg(long)]
        player: PlayerNumber,
    },
    /// Show every player's role for a round (end-of-round reveal)
    Deal {
        #[arg(long)]
        room: String,
        #[arg(long)]
        round: u32,
        #[arg(long)]
        players: u32,
    },
    /// Show the tip for a role
    Tip { role: String },
    /// Show the deltas an outcome would award
    Deltas {
        #[arg(long)]
        room: String,
        #[arg(long)]
        round: u32,
        #[arg(long)]
        players: u32,
        #[arg(long)]
        outcome: Outcome,
    },
    /// Join a room on this device
    Join {
        #[arg(long)]
        room: String,
        #[arg(long)]
        players: u32,
        #[arg(long)]
        player: PlayerNumber,
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Show the joined room, round and your role
    Status,
    /// Score the current round and move to the next one
    EndRound {
        #[arg(long)]
        outcome: Outcome,
        /// Only print the deltas
        #[arg(long)]
        dry_run: bool,
    },
    /// Abandon the current round without scoring
    SkipRound,
    /// Show a room's scoreboard (defaults to the joined room)
    Scores {
        #[arg(long)]
        room: Option<String>,
    },
    /// Show or edit the scoring table
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Print a room snapshot as JSON (defaults to the joined room)
    Export {
        #[arg(long)]
        room: Option<String>,
    },
    /// Import a room snapshot from a file, or stdin if none is given
    Import { file: Option<PathBuf> },
    /// Delete a room's scoreboard and progress
    Clear {
        #[arg(long)]
        room: String,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the current table
    Show,
    /// Set points for one role under one outcome
    Set {
        #[arg(long)]
        outcome: Outcome,
        #[arg(long)]
        role: Role,
        #[arg(long, allow_hyphen_values = true)]
        points: i32,
    },
    /// Restore the default table
    Reset,
}

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("Role Reveal v{}", VERSION);

    match cli.command {
        Command::Role { room, round, players, player } => {
            let room = normalize_room_code(&room);
            let role = role_reveal::get_role_for_player(&room, round, players, player)?;
            println!("Player {player}: {role}");
            println!("{}", role.tip());
        }
        Command::Deal { room, round, players } => {
            let room = normalize_room_code(&room);
            let roles = role_reveal::generate_roles(&room, round, players)?;
            for (idx, role) in roles.iter().enumerate() {
                println!("Player {}: {}", idx + 1, role);
            }
        }
        Command::Tip { role } => {
            println!("{}", role_reveal::role_tip(&role));
        }
        Command::Deltas { room, round, players, outcome } => {
            let room = normalize_room_code(&room);
            let store = open_store(cli.data_dir)?;
            let config = store.scoring_config();
            let roles = role_reveal::generate_roles(&room, round, players)?;
            let deltas = role_reveal::calculate_deltas(&config, &room, round, players, outcome)?;
            for line in role_reveal::summarize_deltas(&deltas, &roles) {
                println!("{line}");
            }
        }
        Command::Join { room, players, player, name } => {
            let store = open_store(cli.data_dir)?;
            let request = JoinRequest {
                room_code: room,
                player_number: player,
                num_players: players,
                display_name: name,
            };
            let session = RoomSession::join(store, request)?;
            print_status(&session)?;
        }
        Command::Status => {
            let session = resume(cli.data_dir)?;
            print_status(&session)?;
        }
        Command::EndRound { outcome, dry_run } => {
            let mut session = resume(cli.data_dir)?;
            for line in session.preview(outcome)? {
                println!("{line}");
            }
            if !dry_run {
                session.confirm_round(outcome)?;
                println!("Scores applied. Now on round {}.", session.round_number());
                println!("Every device in the room must apply the same outcome.");
            }
        }
        Command::SkipRound => {
            let mut session = resume(cli.data_dir)?;
            session.skip_round();
            println!("Round skipped. Now on round {}.", session.round_number());
        }
        Command::Scores { room } => {
            let store = open_store(cli.data_dir)?;
            let room = room_or_joined(&store, room)?;
            let scoreboard = store.load_scoreboard(&room);
            if scoreboard.is_empty() {
                println!("No scores yet for {room}.");
            }
            for (player, score) in scoreboard.iter() {
                println!("Player {player}: {score}");
            }
        }
        Command::Config { action } => {
            let mut store = open_store(cli.data_dir)?;
            let config = match action {
                ConfigAction::Show => store.scoring_config(),
                ConfigAction::Set { outcome, role, points } => {
                    let mut config = store.scoring_config();
                    config.points_mut(outcome).set(role, points);
                    store
                        .set_scoring_config(&config)
                        .context("failed to save scoring config")?;
                    config
                }
                ConfigAction::Reset => store.reset_scoring_config(),
            };
            for outcome in Outcome::ALL {
                println!("{outcome}:");
                for role in Role::ALL {
                    println!("  {:<10} {}", role.name(), format_delta(config.delta(outcome, role)));
                }
            }
        }
        Command::Export { room } => {
            let store = open_store(cli.data_dir)?;
            let room = room_or_joined(&store, room)?;
            println!("{}", store.export_room(&room)?);
        }
        Command::Import { file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("failed to read stdin")?;
                    buf
                }
            };
            let mut store = open_store(cli.data_dir)?;
            let room = store.import_room(&text).context("import failed")?;
            println!("Scoreboard imported for room: {room}");
        }
        Command::Clear { room } => {
            let mut store = open_store(cli.data_dir)?;
            let room = normalize_room_code(&room);
            store.clear_room(&room)?;
            println!("Cleared data for room {room}.");
        }
    }

    Ok(())
}

fn open_store(data_dir: Option<PathBuf>) -> Result<GameStore<FileStore>> {
    let mut config = StorageConfig::from_env();
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    let store = FileStore::from_config(&config)
        .with_context(|| format!("failed to open data dir {}", config.data_dir.display()))?;
    Ok(GameStore::new(store))
}

fn resume(data_dir: Option<PathBuf>) -> Result<RoomSession<FileStore>> {
    let store = open_store(data_dir)?;
    RoomSession::resume(store).context("run `role-reveal join` first")
}

fn room_or_joined(store: &GameStore<FileStore>, room: Option<String>) -> Result<String> {
    match room {
        Some(room) => Ok(normalize_room_code(&room)),
        None => store
            .load_player_identity()
            .map(|identity| identity.room_code)
            .context("no room given and no room joined"),
    }
}

fn print_status(session: &RoomSession<FileStore>) -> Result<()> {
    println!(
        "Room {} | Round {} | {} players",
        session.room_code(),
        session.round_number(),
        session.num_players()
    );
    if !session.display_name().is_empty() {
        println!("Playing as: {}", session.display_name());
    }
    let role = session.role()?;
    println!("Player {}: {}", session.player_number(), role);
    println!("{}", role.tip());
    Ok(())
}
