//! Binary entrypoint for the Tumbleweed CLI.
//!
//! Commands:
//! - `init` - write a starter `config.toml` and seed the world database
//! - `look <room> [--as <character>]` - print a room as a character sees it
//! - `enter <character> <room>` - move a character and print what they hear
//! - `echo-sim <room> [--ticks N] [--seed S]` - simulate an echoing room's ticker
//! - `run` - drive the echo ticker until Ctrl-C
//!
//! See the library crate docs for module-level details: `tumbleweed::`.
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{thread_rng, SeedableRng};

use tumbleweed::config::Config;
use tumbleweed::server::{run_ticker, LogMessenger};
use tumbleweed::world::{
    canonical_world_seed, load_world_seed, AccountLink, CharacterRecord, Outbox, World,
    WorldStore, WorldStoreBuilder,
};

#[derive(Parser)]
#[command(name = "tumbleweed")]
#[command(about = "Frontier MUD world behaviors: rooms, NPCs, mini-maps and echoes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config (if missing) and seed the world database
    Init,
    /// Show a room as seen by a character
    Look {
        room: String,
        /// Character looking; a throwaway player is used when omitted
        #[arg(long = "as")]
        looker: Option<String>,
    },
    /// Move a character into a room (creating a player if needed)
    Enter {
        character: String,
        room: String,
        /// Mark a newly created player as a screen-reader user
        #[arg(long)]
        screenreader: bool,
    },
    /// Simulate ticks of an echoing room and print the broadcasts
    EchoSim {
        room: String,
        #[arg(short, long, default_value_t = 20)]
        ticks: u32,
        /// RNG seed for repeatable output
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run the echo ticker until interrupted
    Run,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_or_default(&cli.config).await?;
    init_logging(&config, cli.verbose);

    match cli.command {
        Commands::Init => {
            if Path::new(&cli.config).exists() {
                info!("Config {} already exists; leaving it alone", cli.config);
            } else {
                Config::create_default(&cli.config).await?;
                println!("Wrote default configuration to {}", cli.config);
            }
            let store = open_store(&config, false)?;
            let seed = match &config.storage.seed_file {
                Some(path) => load_world_seed(path, &config.echo.defaults())
                    .with_context(|| format!("loading seed {}", path))?,
                None => canonical_world_seed(chrono::Utc::now()),
            };
            let inserted = store.import_seed(seed)?;
            println!(
                "Seeded {} record(s) into {}",
                inserted,
                config.storage.db_path().display()
            );
        }
        Commands::Look { room, looker } => {
            let store = open_store(&config, true)?;
            let mut world = load_world(&store, &config)?;
            let looker_id = match looker {
                Some(id) => id,
                None => {
                    let guest = CharacterRecord::new("guest", "Guest")
                        .with_account(AccountLink::new("guest"));
                    world.insert_character(guest);
                    "guest".to_string()
                }
            };
            println!("{}", world.look(&room, &looker_id)?);
        }
        Commands::Enter {
            character,
            room,
            screenreader,
        } => {
            let store = open_store(&config, true)?;
            let mut world = load_world(&store, &config)?;
            if world.character(&character).is_none() {
                let mut account = AccountLink::new(&character);
                account.screenreader = screenreader;
                let created = CharacterRecord::new(&character, &character)
                    .with_account(account)
                    .with_location(&config.game.start_room);
                info!("Created player {}", character);
                world.insert_character(created);
            }
            let mut outbox = Outbox::new();
            world.move_character(&character, &room, &mut thread_rng(), &mut outbox)?;
            println!("{}", world.look(&room, &character)?);
            for line in outbox.for_recipient(&character) {
                println!("{}", line);
            }
            store.save_world(&world)?;
        }
        Commands::EchoSim { room, ticks, seed } => {
            let store = open_store(&config, true)?;
            let mut world = load_world(&store, &config)?;
            let rate = world
                .room(&room)
                .ok_or_else(|| anyhow!("no such room: {}", room))?
                .echo
                .as_ref()
                .map(|e| e.echo_rate)
                .ok_or_else(|| anyhow!("{} is not an echoing room", room))?;
            world.insert_character(CharacterRecord::new("listener", "listener").with_location(&room));
            world.start_echo(&room);

            let mut rng = match seed {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_entropy(),
            };
            let mut outbox = Outbox::new();
            for tick in 1..=ticks {
                outbox.clear();
                world.tick(Duration::from_secs(rate), &mut rng, &mut outbox);
                for line in outbox.for_recipient("listener") {
                    println!("[tick {:>3}] {}", tick, line);
                }
            }
            world.stop_echo(&room);
        }
        Commands::Run => {
            let store = open_store(&config, true)?;
            let mut world = load_world(&store, &config)?;
            let mut messenger = LogMessenger::default();
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    warn!("Failed to listen for Ctrl-C: {}", e);
                }
            };
            let run = run_ticker(
                &mut world,
                config.echo.tick_resolution(),
                &mut thread_rng(),
                &mut messenger,
                shutdown,
            )
            .await;
            store.save_world(&world)?;
            println!(
                "Stopped after {} passes; {} echo(es), {} deliveries",
                run.passes, run.echoes, messenger.delivered
            );
        }
    }

    Ok(())
}

fn open_store(config: &Config, seed_world: bool) -> Result<WorldStore> {
    let path = config.storage.db_path();
    let mut builder = WorldStoreBuilder::new(&path);
    if !seed_world {
        builder = builder.without_world_seed();
    }
    builder
        .open()
        .with_context(|| format!("opening world store at {}", path.display()))
}

fn load_world(store: &WorldStore, config: &Config) -> Result<World> {
    Ok(store.load_world()?.with_map(config.map.enabled))
}

fn init_logging(config: &Config, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    let base_level = match verbosity {
        0 => config
            .logging
            .level
            .parse::<log::LevelFilter>()
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let file = config.logging.file.as_ref().and_then(|path| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });
    match file {
        Some(f) => {
            let sink = std::sync::Arc::new(std::sync::Mutex::new(f));
            // Console copy only when someone is watching.
            let is_tty = atty::is(atty::Stream::Stderr);
            builder.format(move |fmt, record| {
                let line = format!(
                    "{} [{}] {}",
                    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                    record.level(),
                    record.args()
                );
                if let Ok(mut guard) = sink.lock() {
                    let _ = writeln!(guard, "{}", line);
                }
                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        }
        None => {
            builder.format(|fmt, record| {
                writeln!(
                    fmt,
                    "{} [{}] {}",
                    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                    record.level(),
                    record.args()
                )
            });
        }
    }
    let _ = builder.try_init();
}
