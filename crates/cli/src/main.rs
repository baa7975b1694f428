// panelconf CLI - inspect, apply, reset, and sync admin options
// Reads definitions from a TOML manifest; values live in a SQLite store.

mod exit_codes;

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::Value;

use panelconf_engine::{read_record, ConfigError, Engine, Manifest, Mode, StaticFlags};
use panelconf_store::SqliteStore;

use exit_codes::{
    EXIT_STORE, EXIT_SUCCESS, EXIT_SYNC_PARTIAL, EXIT_UNKNOWN_KEY, EXIT_USAGE,
};

type CliEngine = Engine<SqliteStore, StaticFlags>;

#[derive(Parser)]
#[command(name = "panelconf")]
#[command(about = "Admin option reconciliation: resolve, apply, reset, sync")]
#[command(version)]
struct Cli {
    /// Definition manifest (TOML)
    #[arg(long)]
    defs: PathBuf,

    /// SQLite store path
    #[arg(long, default_value = "panelconf.db")]
    db: PathBuf,

    /// Authoring mode: live feature flags win over panel-saved values
    #[arg(long)]
    authoring: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one key and print its effective value as JSON
    Get { key: String },

    /// List definitions with their effective values
    List {
        /// Limit to one panel section
        #[arg(long)]
        section: Option<String>,
    },

    /// Apply a panel submission: a JSON object of key to raw value
    #[command(after_help = "\
Examples:
  echo '{\"site_title\": \"My Shop\"}' | panelconf --defs site.toml apply
  panelconf --defs site.toml apply --input edits.json")]
    Apply {
        /// Input file (omit to read from stdin)
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Reset keys back to their current code defaults
    Reset {
        #[arg(long, conflicts_with = "section")]
        key: Option<String>,

        #[arg(long)]
        section: Option<String>,
    },

    /// Push updated code defaults forward, preserving panel edits
    Sync,
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    ExitCode::from(run(cli))
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(false).init();
}

fn run(cli: Cli) -> u8 {
    let manifest = match Manifest::from_path(&cli.defs) {
        Ok(manifest) => manifest,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_USAGE;
        }
    };

    let store = match SqliteStore::open(&cli.db) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_STORE;
        }
    };

    let mode = if cli.authoring { Mode::Authoring } else { Mode::Production };
    let mut engine = Engine::new(manifest.build_registry(), store, manifest.static_flags(), mode);

    match cli.command {
        Commands::Get { key } => cmd_get(&engine, &key),
        Commands::List { section } => cmd_list(&engine, section.as_deref()),
        Commands::Apply { input } => cmd_apply(&mut engine, input.as_deref()),
        Commands::Reset { key, section } => cmd_reset(&mut engine, key, section),
        Commands::Sync => cmd_sync(&mut engine),
    }
}

fn cmd_get(engine: &CliEngine, key: &str) -> u8 {
    match engine.resolve(key) {
        Ok(value) => {
            println!("{value}");
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            error_code(&e)
        }
    }
}

fn cmd_list(engine: &CliEngine, section: Option<&str>) -> u8 {
    let definitions: Vec<_> = match section {
        Some(slug) => engine.registry().section(slug).collect(),
        None => engine.registry().all().collect(),
    };

    for definition in definitions {
        let value = match engine.resolve(&definition.key) {
            Ok(value) => value.to_string(),
            Err(e) => format!("<error: {e}>"),
        };
        let marker = match read_record(engine.store(), &definition.key) {
            Ok(Some(record)) if record.panel_saved => "panel",
            Ok(Some(_)) => "synced",
            _ => "code",
        };
        println!(
            "{:<28} {:<14} {:<14} {:<7} {}",
            definition.key, definition.section, definition.field_type, marker, value,
        );
    }
    EXIT_SUCCESS
}

fn cmd_apply(engine: &mut CliEngine, input: Option<&Path>) -> u8 {
    let raw = match read_input(input) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_USAGE;
        }
    };

    let submitted: HashMap<String, Value> = match serde_json::from_str(&raw) {
        Ok(submitted) => submitted,
        Err(e) => {
            eprintln!("error: input must be a JSON object of key to value: {e}");
            return EXIT_USAGE;
        }
    };

    match engine.apply_batch(&submitted) {
        Ok(outcome) => {
            println!("saved {}, skipped {}", outcome.saved, outcome.skipped);
            for warning in &outcome.warnings {
                eprintln!("warning: {warning}");
            }
            // Warnings are non-fatal: the best-effort values were saved.
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            error_code(&e)
        }
    }
}

fn cmd_reset(engine: &mut CliEngine, key: Option<String>, section: Option<String>) -> u8 {
    let result = match (key, section) {
        (Some(key), None) => engine.reset_key(&key),
        (None, Some(slug)) => engine.reset_section(&slug),
        _ => {
            eprintln!("error: pass exactly one of --key or --section");
            return EXIT_USAGE;
        }
    };

    match result {
        Ok(outcome) => {
            println!("reset {}", outcome.reset);
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            error_code(&e)
        }
    }
}

fn cmd_sync(engine: &mut CliEngine) -> u8 {
    let outcome = engine.sync_all();
    println!(
        "updated {}, preserved {}, failed {}",
        outcome.updated, outcome.preserved, outcome.failed,
    );
    if outcome.failed > 0 {
        EXIT_SYNC_PARTIAL
    } else {
        EXIT_SUCCESS
    }
}

fn read_input(input: Option<&Path>) -> Result<String, std::io::Error> {
    match input {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn error_code(e: &ConfigError) -> u8 {
    match e {
        ConfigError::UnknownKey(_) => EXIT_UNKNOWN_KEY,
        ConfigError::Store(_) => EXIT_STORE,
        ConfigError::ManifestParse(_) | ConfigError::ManifestValidation(_) => EXIT_USAGE,
    }
}
