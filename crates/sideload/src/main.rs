// SPDX-FileCopyrightText: 2026 Sideload Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sideload - inspect the plugins a configuration discovers.
//!
//! This is the binary entry point for the `sideload` command.

mod inspect;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sideload_config::SideloadConfig;
use sideload_core::{ClasspathProvider, SideloadError};
use sideload_plugin::ConfiguredClasspathProvider;

/// Sideload - discover isolated plugins and query them by metadata.
#[derive(Parser, Debug)]
#[command(name = "sideload", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Discover implementations of a capability and list those matching a filter.
    Inspect {
        /// Capability identifier, the file name of the services manifest.
        capability: String,
        /// Required property, as key=value. Repeat to require several.
        #[arg(long = "filter", value_parser = inspect::parse_property)]
        filters: Vec<(String, String)>,
    },
    /// List the plugin classpaths the configuration describes.
    Plugins,
    /// Print the effective configuration.
    Config,
}

fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => sideload_config::load_and_validate_path(path),
        None => sideload_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            sideload_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log_level);

    let result = match cli.command {
        Some(Commands::Inspect {
            capability,
            filters,
        }) => inspect::run_inspect(&config, &capability, filters).map(|records| {
            print!("{}", inspect::format_records(&records));
            tracing::info!(matched = records.len(), "inspect complete");
        }),
        Some(Commands::Plugins) => list_plugins(&config),
        Some(Commands::Config) => print_config(&config),
        None => {
            println!("sideload: use --help for available commands");
            Ok(())
        }
    };

    if let Err(error) = result {
        eprintln!("sideload: {error}");
        if error.is_metadata() {
            eprintln!("sideload: check the services manifest and .properties files of that plugin");
        }
        std::process::exit(1);
    }
}

fn list_plugins(config: &SideloadConfig) -> Result<(), SideloadError> {
    for descriptor in ConfiguredClasspathProvider::new(config).plugins()? {
        println!("{descriptor}");
    }
    Ok(())
}

fn print_config(config: &SideloadConfig) -> Result<(), SideloadError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| SideloadError::Configuration(format!("failed to render configuration: {e}")))?;
    print!("{rendered}");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so command output stays pipeable. `RUST_LOG` overrides
/// the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "sideload={log_level},sideload_plugin={log_level},sideload_config={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
