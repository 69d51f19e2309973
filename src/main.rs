// src/main.rs - alphax-4chan board configuration tool
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use hellen_shared::config;
use hellen_shared::event_interface::EventInterface;
use hellen_board::board::{self, Board};
use hellen_board::events::{BoardEvent, BoardListener, ConfigChangeBus, ConfigStore};
use hellen_board::pin_map::PULL_RESISTOR_PINS;
use hellen_board::revision::FixedRevision;
use hellen_board::sim::RecordingPinProvider;
use hellen_board::{BoardRevision, PinRole, RevisionBand};

type CliResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;

#[derive(Parser)]
#[command(name = "board-tool", version, about = "alphax-4chan board configuration tool")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the default engine configuration for a board revision
    Defaults {
        /// Board revision letter (D, E, F, G, ...)
        #[arg(short, long)]
        revision: Option<String>,
        #[arg(short, long, value_enum, default_value_t = Format::Toml)]
        format: Format,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run board init against simulated pins and show the pull resistor state
    BringUp {
        #[arg(short, long)]
        revision: Option<String>,
        /// Engine configuration to load instead of the board defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Pull resistor to switch on after init, by label (e.g. a-tach)
        #[arg(short, long = "enable")]
        enable: Vec<String>,
        /// Pull resistor to switch off after init, by label
        #[arg(short, long = "disable")]
        disable: Vec<String>,
    },
    /// List the outputs exposed to diagnostic tooling
    Outputs,
    /// List known revisions and their pin layout band
    Revisions,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Toml,
    Json,
}

fn parse_role(label: &str) -> Result<PinRole, String> {
    PinRole::from_label(label).ok_or_else(|| {
        let known: Vec<&str> = PinRole::ALL.iter().map(PinRole::label).collect();
        format!("unknown pull resistor '{}', expected one of: {}", label, known.join(", "))
    })
}

fn run_defaults(revision: BoardRevision, format: Format, output: Option<PathBuf>) -> CliResult {
    let engine = hellen_board::build_defaults(revision);
    let text = match format {
        Format::Toml => config::to_toml(&engine),
        Format::Json => config::to_json(&engine),
    }
    .map_err(|e| {
        tracing::error!("Failed to serialize defaults for {}: {}", revision, e);
        e
    })?;
    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, text) {
                tracing::error!("Failed to write {}: {}", path.display(), e);
                return Err(e.into());
            }
            tracing::info!("Wrote defaults for {} to {}", revision, path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

async fn run_bring_up(
    revision: BoardRevision,
    config_path: Option<PathBuf>,
    enable: Vec<String>,
    disable: Vec<String>,
) -> CliResult {
    let changes = enable
        .iter()
        .map(|label| parse_role(label).map(|role| (role, true)))
        .chain(disable.iter().map(|label| parse_role(label).map(|role| (role, false))))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            tracing::error!("{}", e);
            e
        })?;

    let engine = hellen_board::load_board_configuration(config_path.as_deref(), revision)?;

    let board = Board::new(RecordingPinProvider::new(), revision)
        .init_hardware(&engine)
        .map_err(|e| {
            tracing::error!("Board bring-up failed: {}", e);
            Box::new(e) as Box<dyn std::error::Error + Send + Sync + 'static>
        })?;

    let bus = Arc::new(ConfigChangeBus::new(16));
    let store = ConfigStore::new(engine, &bus);
    let listener = tokio::spawn(BoardListener::new(board, &store).run(bus.clone()));

    for (role, value) in changes {
        tracing::info!("Switching {} {}", role, if value { "on" } else { "off" });
        store.update(|c| board::set_requested_state(role, c, value)).await?;
    }
    bus.send_event(BoardEvent::Shutdown).await?;
    let board = listener.await?;

    println!("{} ({})", board.revision(), board.revision().band());
    println!("{:<10} {:<14} {}", "role", "pin", "state");
    for role in PinRole::ALL {
        let pin = board.registry().physical_pin(role).unwrap_or_default();
        let state = match board.pull_resistor(role) {
            Some(true) => "on",
            Some(false) => "off",
            None => "-",
        };
        println!("{:<10} {:<14} {}", role.label(), pin, state);
    }
    Ok(())
}

fn run_outputs() {
    println!("{} meta outputs:", hellen_board::board_meta_outputs_count());
    for pin in hellen_board::board_meta_outputs() {
        println!("  {}", pin);
    }
}

fn run_revisions() {
    for letter in 'D'..='H' {
        let revision = BoardRevision::from_letter(letter);
        println!("{:<6} {}", revision, revision.band());
    }
    println!("{:<6} {} (default for unknown revisions)", "?", RevisionBand::default());
    println!();
    println!("{:<10} {:<14} {}", "role", "legacy", "mega-module");
    for entry in PULL_RESISTOR_PINS.iter() {
        println!("{:<10} {:<14} {}", entry.role.label(), entry.legacy, entry.mega_module);
    }
}

#[tokio::main]
async fn main() -> CliResult {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Defaults { revision, format, output } => {
            run_defaults(BoardRevision::detect(&FixedRevision(revision)), format, output)
        }
        Command::BringUp { revision, config, enable, disable } => {
            run_bring_up(BoardRevision::detect(&FixedRevision(revision)), config, enable, disable).await
        }
        Command::Outputs => {
            run_outputs();
            Ok(())
        }
        Command::Revisions => {
            run_revisions();
            Ok(())
        }
    }
}
