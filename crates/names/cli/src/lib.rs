//! names - operator CLI for the Dance name registry
//!
//! This CLI provides registrants and the administrator with a terminal
//! interface to:
//! - Initialize a registry (administrator, namespace, state file)
//! - Register names and update their record and avatar
//! - Look up records, owners and prices
//! - Inspect and withdraw the custodied balance
//! - Replay the registry's event journal

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;

use commands::{custody, events, init, names};
use config::CliConfig;
pub use error::{CliError, CliResult};
pub use output::print_error;

/// names CLI application
#[derive(Parser)]
#[command(name = "names")]
#[command(about = "Dance Name Service registry CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "NAMES_CONFIG", global = true)]
    config: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Create a configuration file and an empty registry
    Init(init::InitArgs),

    /// Register a name
    Register(names::RegisterArgs),

    /// Replace the record and avatar of an owned name
    Update(names::UpdateArgs),

    /// Show a name's record
    Get {
        name: String,
    },

    /// Show a name's owner
    Owner {
        name: String,
    },

    /// List every registered name in registration order
    #[command(alias = "ls")]
    List,

    /// Show the registration price of a name
    Price {
        name: String,
    },

    /// Show the custodied balance
    Balance,

    /// Withdraw the custodied balance to the administrator
    ///
    /// The CLI has no external value rail: the payout is credited to an
    /// in-process ledger that ends with the command. The state file records
    /// the withdrawal, and `names balance` shows the running total withdrawn.
    Withdraw {
        /// Withdrawing identity
        #[arg(long = "as")]
        caller: names_registry::Identity,
    },

    /// Replay journaled events
    Events {
        /// Only events after this sequence number
        #[arg(long, default_value = "0")]
        since: u64,
    },

    /// Show configuration
    Config,
}

/// Run using the current process arguments.
pub async fn run() -> CliResult<()> {
    run_with_args(std::env::args_os()).await
}

/// Run using the provided argument iterator.
pub async fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    // Initialize tracing; stderr keeps `--output json` parseable
    let filter = if cli.verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();

    if let Commands::Init(args) = cli.command {
        let path = CliConfig::resolve_path(cli.config.as_deref())?;
        return init::execute(args, path).await;
    }

    // Load config
    let config = CliConfig::load(cli.config.as_deref())?;
    let format = cli.output;

    if let Commands::Config = cli.command {
        println!("# {}", config.path.display());
        print!("{}", config.registry.to_toml_string()?);
        return Ok(());
    }

    let registry = config.open_registry().await?;

    // Execute command
    match cli.command {
        Commands::Register(args) => names::register(&registry, args, format).await,
        Commands::Update(args) => names::update(&registry, args, format).await,
        Commands::Get { name } => names::get(&registry, &name, format).await,
        Commands::Owner { name } => names::owner(&registry, &name, format).await,
        Commands::List => names::list(&registry, format).await,
        Commands::Price { name } => names::price(&registry, &name, format),
        Commands::Balance => custody::balance(&registry, format).await,
        Commands::Withdraw { caller } => custody::withdraw(&registry, caller, format).await,
        Commands::Events { since } => events::execute(&registry, since, format).await,
        Commands::Init(_) | Commands::Config => Ok(()),
    }
}
