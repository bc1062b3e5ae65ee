//! vialctl: VIA/Vial keyboard configurator
//!
//! A command-line interface for reading and writing the keymap, macros,
//! dynamic entries and QMK settings of Vial keyboards.

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// CLI definitions
mod cli;
use cli::{Cli, Commands};

// Command handlers
mod commands;
use commands::CommandResult;

mod config;
use config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::resolve(cli.config.as_deref()) {
        Ok(config) => config.with_overrides(cli.timeout_ms, cli.device.clone()),
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    // RUST_LOG wins over the config file and -v
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_directive(cli.verbose))),
        )
        .with_writer(std::io::stderr)
        .init();
    debug!("Config: {config:?}");

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Option<Commands>, config: &Config) -> CommandResult {
    match command {
        None => {
            // Default: show device info
            commands::query::info(config, false).await?;
        }

        // === Query Commands ===
        Some(Commands::List) => {
            commands::query::list(config).await?;
        }
        Some(Commands::Info { json }) => {
            commands::query::info(config, json).await?;
        }

        // === Keymap Commands ===
        Some(Commands::Keymap { layer }) => {
            commands::keymap::show(config, layer).await?;
        }
        Some(Commands::SetKey {
            layer,
            row,
            col,
            keycode,
        }) => {
            commands::keymap::set_key(config, layer, row, col, &keycode).await?;
        }

        // === Macro Commands ===
        Some(Commands::Macros) => {
            commands::macros::show(config).await?;
        }
        Some(Commands::SetMacro { index, actions }) => {
            commands::macros::set(config, index, &actions).await?;
        }

        // === Dynamic Entries ===
        Some(Commands::Dynamic) => {
            commands::dynamic::show(config).await?;
        }

        // === Settings ===
        Some(Commands::Settings) => {
            commands::settings::show(config).await?;
        }
        Some(Commands::SetSetting { id, value }) => {
            commands::settings::set(config, &id, value).await?;
        }

        // === Security ===
        Some(Commands::Unlock { timeout }) => {
            commands::settings::unlock(config, timeout).await?;
        }
        Some(Commands::Lock) => {
            commands::settings::lock(config).await?;
        }

        // === Profiles ===
        Some(Commands::Export { file }) => {
            commands::profile::export(config, &file).await?;
        }
        Some(Commands::Import { file, dry_run }) => {
            commands::profile::import(config, &file, dry_run).await?;
        }

        // === Utility ===
        Some(Commands::Keycode { value }) => {
            commands::query::keycode(&value)?;
        }
    }

    Ok(())
}
