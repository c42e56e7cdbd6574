// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PwnStore - plugin store for Pwnagotchi.
//!
//! This is the binary entry point: the command line and the embedded web
//! store both drive the same install engine.

mod browse;
mod manage;
mod output;
mod publish;
mod serve;
mod update;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use pwnstore_config::{ConfigError, PwnstoreConfig};
use pwnstore_core::{PwnstoreError, ProcessPrivilege};
use pwnstore_registry::{HttpFetcher, RegistryClient};
use pwnstore_store::Engine;

use crate::output::Printer;

/// PwnStore - browse, install, upgrade and remove Pwnagotchi plugins.
#[derive(Parser, Debug)]
#[command(name = "pwnstore", version, about, long_about = None)]
struct Cli {
    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    /// Read pwnstore settings from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List every plugin in the registry with its install status.
    List,
    /// Count registry plugins per source repository.
    Sources,
    /// Search plugin names and descriptions.
    Search {
        /// Case-insensitive text to look for.
        query: String,
    },
    /// Show details for one plugin.
    Info {
        /// Plugin name.
        name: String,
    },
    /// Install or reinstall a plugin and enable it.
    Install {
        /// Plugin name.
        name: String,
    },
    /// Remove a plugin and its settings.
    Uninstall {
        /// Plugin name.
        name: String,
    },
    /// Replace this executable with the latest published build.
    Update,
    /// Reinstall every plugin whose registry version differs from the local copy.
    Upgrade,
    /// Crawl plugin sources and write a registry document.
    Build {
        /// Source list, one archive or raw file URL per line.
        #[arg(long, value_name = "FILE")]
        sources: Option<PathBuf>,
        /// Where to write the registry JSON.
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Serve the web store.
    Serve,
    /// Write settings for a plugin.
    Configure {
        /// Plugin name.
        name: String,
        /// Settings as key=value pairs.
        #[arg(required = true, value_name = "KEY=VALUE")]
        values: Vec<String>,
    },
    /// Show the settings an installed plugin reads.
    Hints {
        /// Plugin name.
        name: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.kind() == ErrorKind::InvalidSubcommand => {
            let _ = err.print();
            print_usage();
            return;
        }
        Err(err) => err.exit(),
    };

    let Some(command) = cli.command else {
        print_usage();
        return;
    };

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            pwnstore_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    serve::init_tracing(&config.logging.level);

    let out = Printer::new(cli.plain);
    if let Err(e) = run(command, &config, &out).await {
        out.failure(&e.to_string());
        if e.is_fatal() {
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    let _ = Cli::command().print_help();
    println!();
}

fn load_config(path: Option<&Path>) -> Result<PwnstoreConfig, Vec<ConfigError>> {
    match path {
        Some(path) => pwnstore_config::load_and_validate_path(path),
        None => pwnstore_config::load_and_validate(),
    }
}

async fn run(command: Commands, config: &PwnstoreConfig, out: &Printer) -> Result<(), PwnstoreError> {
    let engine = build_engine(config)?;

    match command {
        Commands::List => browse::run_list(&engine, out).await,
        Commands::Sources => browse::run_sources(&engine, out).await,
        Commands::Search { query } => browse::run_search(&engine, &query, out).await,
        Commands::Info { name } => browse::run_info(&engine, &name, out).await,
        Commands::Install { name } => manage::run_install(&engine, &name, out).await,
        Commands::Uninstall { name } => manage::run_uninstall(&engine, &name, out).await,
        Commands::Upgrade => manage::run_upgrade(&engine, out).await,
        Commands::Configure { name, values } => {
            manage::run_configure(&engine, &name, &values, out).await
        }
        Commands::Hints { name } => manage::run_hints(&engine, &name, out),
        Commands::Update => {
            let fetcher = download_fetcher(config)?;
            let url = config.store.resolved_update_url();
            update::run_update(&engine, &fetcher, &url, out).await
        }
        Commands::Build { sources, output } => {
            let fetcher = download_fetcher(config)?;
            let sources = sources.unwrap_or_else(|| PathBuf::from(&config.builder.sources_file));
            let output = output.unwrap_or_else(|| PathBuf::from(&config.builder.output_file));
            publish::run_build(&fetcher, &sources, &output, out).await
        }
        Commands::Serve => serve::run_serve(config, engine).await,
    }
}

fn download_fetcher(config: &PwnstoreConfig) -> Result<HttpFetcher, PwnstoreError> {
    HttpFetcher::new(Duration::from_secs(config.store.download_timeout_secs))
}

/// Wires the engine to the network, the device paths and the process identity.
fn build_engine(config: &PwnstoreConfig) -> Result<Engine, PwnstoreError> {
    let registry_fetcher = HttpFetcher::new(Duration::from_secs(config.store.request_timeout_secs))?;
    let client = RegistryClient::resolve(
        Arc::new(registry_fetcher),
        &config.store.registry_url,
        Path::new(&config.device.config_file),
    )
    .with_downloader(Arc::new(download_fetcher(config)?));

    Ok(Engine::new(
        client,
        Arc::new(ProcessPrivilege),
        &config.device.plugin_dir,
        &config.device.config_file,
    ))
}
