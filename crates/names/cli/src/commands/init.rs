//! `names init`

use std::path::PathBuf;

use clap::Args;
use names_registry::{Identity, Namespace, RegistryConfig};

use crate::config::{default_state_path, CliConfig};
use crate::error::{CliError, CliResult};
use crate::output::print_success;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Identity allowed to withdraw registration payments
    #[arg(long = "admin")]
    pub administrator: Identity,

    /// Namespace suffix names are claimed under
    #[arg(long, default_value = "dance")]
    pub namespace: Namespace,

    /// Snapshot file (default: state.json next to the config file)
    #[arg(long)]
    pub state: Option<PathBuf>,

    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Write a configuration file and an empty state snapshot.
pub async fn execute(args: InitArgs, config_path: PathBuf) -> CliResult<()> {
    if config_path.exists() && !args.force {
        return Err(CliError::Config(format!(
            "{} already exists; pass --force to overwrite",
            config_path.display()
        )));
    }

    let state_path = match args.state {
        Some(path) if path.is_relative() => std::env::current_dir()?.join(path),
        Some(path) => path,
        None => default_state_path(&config_path),
    };

    let registry = RegistryConfig::new(args.administrator)
        .with_namespace(args.namespace)
        .with_state_path(&state_path);
    registry.save(&config_path)?;

    let config = CliConfig {
        path: config_path,
        registry,
    };
    // opening writes the empty snapshot, or validates one left by a previous init
    let opened = config.open_registry().await?;

    print_success(&format!(
        "Initialized .{} registry administered by {}",
        opened.namespace(),
        opened.administrator()
    ));
    println!("  Config: {}", config.path.display());
    println!("  State:  {}", state_path.display());
    Ok(())
}
