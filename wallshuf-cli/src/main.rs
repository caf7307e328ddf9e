use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use wallshuf_common::shuffle;
use wallshuf_common::{
    read_active, Backend, CommandStore, ConfigStore, ErrorReporting, MemoryStore, StoreKeys,
    WallpaperEntry, WallshufError,
};
use wallshuf_config::Config;

#[derive(Parser)]
#[command(name = "wallshuf")]
#[command(about = "Switch to a random wallpaper from the GNOME background list")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Wallpaper catalog to read instead of the configured one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Settings store to write to (gsettings or gconf)
    #[arg(long, global = true)]
    backend: Option<Backend>,

    /// Config file to use instead of ~/.config/wallshuf/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for a reproducible choice
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Print what would be written without touching the desktop settings
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a random wallpaper from the catalog (default)
    Shuffle,

    /// List the wallpapers a shuffle would choose from
    List,

    /// Show the active wallpaper
    Current {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

// Warnings and errors unless RUST_LOG says otherwise
fn logger_builder(env: env_logger::Env) -> env_logger::Builder {
    env_logger::Builder::from_env(env.default_filter_or("warn"))
}

fn main() {
    logger_builder(env_logger::Env::default()).init();

    let cli = Cli::parse();

    if let Err(e) = run_cli(cli) {
        match e.downcast_ref::<WallshufError>() {
            Some(err) => {
                err.log_error("wallshuf");
                eprintln!("Error: {}", err.user_friendly_message());
            }
            None => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    if let Some(backend) = cli.backend {
        config.store.backend = backend;
    }

    let catalog_path = match cli.catalog.clone() {
        Some(path) => path,
        None => config.catalog_path()?,
    };
    let keys = config.store.keys();

    match cli.command.unwrap_or(Commands::Shuffle) {
        Commands::Shuffle => {
            if cli.dry_run {
                let mut store = MemoryStore::new();
                shuffle_with(&mut store, &catalog_path, &keys, cli.seed)?;
                for (key, value) in store.writes() {
                    println!("would set {} = {}", key, value);
                }
            } else {
                let mut store = open_store(&config);
                shuffle_with(&mut store, &catalog_path, &keys, cli.seed)?;
            }
        }

        Commands::List => {
            let entries = shuffle::candidates(&catalog_path)?;
            for entry in &entries {
                print_entry(entry);
            }
            log::info!("{} candidates in {:?}", entries.len(), catalog_path);
        }

        Commands::Current { json } => {
            let store = open_store(&config);
            let active = read_active(&store, &keys)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&active)?);
            } else {
                print_entry(&active);
            }
        }
    }

    Ok(())
}

fn open_store(config: &Config) -> CommandStore {
    let store = CommandStore::new(config.store.backend, &config.store.namespace());
    log::debug!("Opened {} store", store.backend());
    store
}

// Process-wide generator unless a seed was given
fn shuffle_with<S: ConfigStore + ?Sized>(
    store: &mut S,
    catalog_path: &std::path::Path,
    keys: &StoreKeys,
    seed: Option<u64>,
) -> anyhow::Result<WallpaperEntry> {
    let chosen = match seed {
        Some(seed) => shuffle::run(None, catalog_path, store, keys, &mut StdRng::seed_from_u64(seed))?,
        None => shuffle::run(None, catalog_path, store, keys, &mut rand::thread_rng())?,
    };
    Ok(chosen)
}

fn print_entry(entry: &WallpaperEntry) {
    match &entry.display_name {
        Some(name) => println!("{} | {} | {}", name, entry.file_path, entry.display_option),
        None => println!("{} | {}", entry.file_path, entry.display_option),
    }
}
