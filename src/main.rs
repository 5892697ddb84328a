//! SuperCards CLI
//!
//! Command-line front end over supercards-core. Bookmarks persist in a redb
//! database under the data directory; cards come from the JSON catalogue.
//!
//! ## Usage
//!
//! ```bash
//! # Show data locations and counts
//! supercards info
//!
//! # Deal a random spread
//! supercards deal --seed 42
//!
//! # Show, bookmark or turn over a single card
//! supercards show m1
//! supercards toggle m1
//! supercards flip a3
//!
//! # Manage favourites
//! supercards favourites list
//! supercards favourites delete m1
//! supercards favourites repair
//!
//! # Keep a board open and type commands
//! supercards session
//! ```

mod session;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use supercards_core::config::default_data_dir;
use supercards_core::{Board, BoardConfig, CardFields, CardId, Catalogue};
use tokio::io::AsyncBufReadExt;
use tracing::info;

use crate::session::{Flow, Session};

/// SuperCards - flippable, bookmarkable mission and assessment cards
#[derive(Parser)]
#[command(name = "supercards")]
#[command(version = "0.1.0")]
#[command(about = "SuperCards - flippable, bookmarkable mission and assessment cards")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Data directory holding the bookmark database
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Catalogue directory holding mission.json and assessment.json
    #[arg(short, long, global = true)]
    catalogue: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show data locations and counts
    Info,

    /// Deal a random spread of cards
    Deal {
        /// Seed for a repeatable deal
        #[arg(long)]
        seed: Option<u64>,
        /// Number of missions to deal
        #[arg(short, long)]
        missions: Option<usize>,
    },

    /// Show one card
    Show {
        /// Card id from the catalogue
        card_id: String,
        /// Show the back of the card
        #[arg(long)]
        back: bool,
    },

    /// Bookmark or un-bookmark a card
    Toggle {
        /// Card id from the catalogue
        card_id: String,
    },

    /// Turn a card over
    Flip {
        /// Card id from the catalogue
        card_id: String,
    },

    /// Favourites list management
    Favourites {
        #[command(subcommand)]
        action: FavouritesAction,
    },

    /// Keep a board open and read commands from stdin
    Session {
        /// Seed for repeatable deals
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Subcommand)]
enum FavouritesAction {
    /// List bookmarked cards
    List,
    /// Delete a card from the list
    Delete {
        /// Card id
        card_id: String,
    },
    /// Bring bookmark flags back in line with the list
    Repair,
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

async fn load_catalogue(dir: &Path) -> Result<Catalogue> {
    Catalogue::load(dir)
        .await
        .with_context(|| format!("Failed to load cards from {}", dir.display()))
}

fn find_card(catalogue: &Catalogue, id: &str) -> Result<CardFields> {
    catalogue
        .find(&CardId::from(id))
        .cloned()
        .ok_or_else(|| anyhow!("Card '{}' is not in the catalogue", id))
}

fn open_board(config: &BoardConfig) -> Result<Board> {
    Board::open(config).with_context(|| {
        format!(
            "Failed to open bookmark database at {}",
            config.database_path().display()
        )
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let mut config = BoardConfig::default().with_data_dir(cli.data_dir.unwrap_or_else(default_data_dir));
    if let Some(dir) = cli.catalogue {
        config = config.with_catalogue_dir(dir);
    }
    info!(
        data_dir = %config.data_dir.display(),
        catalogue = %config.catalogue_dir.display(),
        "Starting supercards"
    );

    match cli.command {
        Commands::Info => {
            let board = open_board(&config)?;

            println!("SuperCards v0.1.0");
            println!();
            println!("Data directory: {}", config.data_dir.display());
            println!("Database: {}", config.database_path().display());
            println!("Catalogue: {}", config.catalogue_dir.display());
            match Catalogue::load(&config.catalogue_dir).await {
                Ok(catalogue) => {
                    println!("  Missions: {}", catalogue.missions().len());
                    println!("  Assessments: {}", catalogue.assessments().len());
                }
                Err(e) => println!("  (unavailable: {})", e),
            }
            println!("Favourites: {}", board.store().get_all().len());
        }

        Commands::Deal { seed, missions } => {
            let catalogue = load_catalogue(&config.catalogue_dir).await?;
            let mut board = open_board(&config)?;
            let spread = catalogue.deal(
                &mut seeded_rng(seed),
                missions.unwrap_or(config.mission_count),
            );
            board.show(&spread);

            if board.cards().is_empty() {
                println!("No cards to deal.");
            }
            for mounted in board.cards() {
                println!("{}", mounted.view());
            }
        }

        Commands::Show { card_id, back } => {
            let catalogue = load_catalogue(&config.catalogue_dir).await?;
            let fields = find_card(&catalogue, &card_id)?;
            let mut board = open_board(&config)?;
            board.show_cards([fields]);

            let id = CardId::from(card_id);
            if back {
                board.flip(&id)?;
            }
            if let Some(mounted) = board.card(&id) {
                println!("{}", mounted.view());
            }
        }

        Commands::Toggle { card_id } => {
            let catalogue = load_catalogue(&config.catalogue_dir).await?;
            let fields = find_card(&catalogue, &card_id)?;
            let mut board = open_board(&config)?;
            board.show_cards([fields]);

            let id = CardId::from(card_id);
            if board.toggle(&id)? {
                println!("Bookmarked {}", id);
            } else {
                println!("Removed bookmark {}", id);
            }
            if let Some(mounted) = board.card(&id) {
                println!("{}", mounted.view());
            }
        }

        Commands::Flip { card_id } => {
            let catalogue = load_catalogue(&config.catalogue_dir).await?;
            let fields = find_card(&catalogue, &card_id)?;
            let mut board = open_board(&config)?;
            board.show_cards([fields]);

            let id = CardId::from(card_id);
            board.flip(&id)?;
            if let Some(mounted) = board.card(&id) {
                println!("{}", mounted.view());
            }
        }

        Commands::Favourites { action } => match action {
            FavouritesAction::List => {
                let board = open_board(&config)?;
                session::print_entries(&board, &mut std::io::stdout())?;
            }

            FavouritesAction::Delete { card_id } => {
                let mut board = open_board(&config)?;
                let id = CardId::from(card_id);
                if board.delete_favourite(&id) {
                    println!("Deleted {}", id);
                } else {
                    println!("{} is not in favourites", id);
                }
            }

            FavouritesAction::Repair => {
                let board = open_board(&config)?;
                let report = board.store().reconcile()?;
                if report.is_clean() {
                    println!("Bookmarks are consistent.");
                } else {
                    println!("Repaired bookmarks:");
                    println!("  Flags cleared: {}", report.flags_cleared.len());
                    println!("  Flags set: {}", report.flags_set.len());
                    println!("  Duplicates dropped: {}", report.duplicates_dropped.len());
                }
            }
        },

        Commands::Session { seed } => {
            let catalogue = load_catalogue(&config.catalogue_dir).await?;
            let board = open_board(&config)?;
            info!(cards = catalogue.len(), "Session started");
            let mut session = Session::new(board, catalogue, seeded_rng(seed), config.mission_count);

            println!("SuperCards session. Type 'help' for commands.");

            let stdin = tokio::io::stdin();
            let reader = tokio::io::BufReader::new(stdin);
            let mut lines = reader.lines();
            let mut stdout = std::io::stdout();

            loop {
                tokio::select! {
                    line = lines.next_line() => {
                        match line {
                            Ok(Some(text)) => match session.execute(&text, &mut stdout) {
                                Ok(Flow::Continue) => {}
                                Ok(Flow::Quit) => break,
                                Err(e) => eprintln!("{}", e),
                            },
                            Ok(None) => {
                                // EOF - stdin closed
                                break;
                            }
                            Err(e) => {
                                eprintln!("Read error: {}", e);
                                break;
                            }
                        }
                        stdout.flush()?;
                    }
                    _ = tokio::signal::ctrl_c() => {
                        println!();
                        break;
                    }
                }
            }
            println!("Bye.");
        }
    }

    Ok(())
}
