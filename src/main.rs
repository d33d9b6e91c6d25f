//! # GeoMoves CLI (`geomoves`)
//!
//! ## Usage
//!
//! ```bash
//! geomoves --config ./config/geomoves.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `geomoves animate <PERSON_ID>` | Animate all generations of descendants |
//! | `geomoves levels <PERSON_ID>` | Print who is drawn at each generation |
//! | `geomoves marks <PERSON_ID>` | Print one person's geocoded events |
//! | `geomoves describe <PERSON_ID> <PLACE_ID>` | Describe a person's events at one place |

use clap::{Parser, Subcommand};
use geomoves::render::OutputMode;
use geomoves::{animate, config, inspect, logging};
use std::path::PathBuf;

/// GeoMoves: animated maps of a family's migrations.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/geomoves.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "geomoves",
    about = "GeoMoves: animated maps of a family's migrations, one generation at a time",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/geomoves.toml`.
    #[arg(long, global = true, default_value = "./config/geomoves.toml")]
    config: PathBuf,

    /// Family-tree JSON file, overriding `[tree].path`.
    ///
    /// When the config file does not exist, defaults are used for
    /// everything else.
    #[arg(long, global = true)]
    tree: Option<PathBuf>,

    /// Show debug logs on stderr (ignored when `RUST_LOG` is set).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Animate the descendants of a person.
    ///
    /// Draws one generation per `generation_interval` milliseconds, up to
    /// `maximum_generations`, then prints a summary and the places that
    /// have no coordinates.
    Animate {
        /// Id of the root person (e.g. `I0001`).
        person_id: String,

        /// Output format. Defaults to `human` on a terminal, `json` otherwise.
        #[arg(long, value_enum)]
        output: Option<OutputMode>,
    },

    /// Print the level assignment and visits for each generation.
    Levels {
        /// Id of the root person.
        person_id: String,
    },

    /// Print one person's marks in drawing order.
    Marks {
        /// Id of the person.
        person_id: String,
    },

    /// Describe a person's events at one place, as a map pop-up would.
    Describe {
        /// Id of the person.
        person_id: String,

        /// Id of the place (e.g. `P0003`).
        place_id: String,
    },
}

fn load(cli: &Cli) -> anyhow::Result<config::Config> {
    match &cli.tree {
        Some(tree) if !cli.config.exists() => Ok(config::Config::with_tree(tree.clone())),
        Some(tree) => {
            let mut cfg = config::load_config(&cli.config)?;
            cfg.tree.path = tree.clone();
            Ok(cfg)
        }
        None => config::load_config(&cli.config),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let cfg = load(&cli)?;

    match cli.command {
        Commands::Animate { person_id, output } => {
            let mode = output.unwrap_or_else(OutputMode::default_for_tty);
            animate::run_animate(&cfg, &person_id, mode).await?;
        }
        Commands::Levels { person_id } => {
            inspect::run_levels(&cfg, &person_id)?;
        }
        Commands::Marks { person_id } => {
            inspect::run_marks(&cfg, &person_id)?;
        }
        Commands::Describe {
            person_id,
            place_id,
        } => {
            inspect::run_describe(&cfg, &person_id, &place_id)?;
        }
    }

    Ok(())
}
