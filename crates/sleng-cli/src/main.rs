//! sleng CLI
//!
//! Runs the HTTP API and the interactive menu over one dictionary document.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use sleng_core::{api, Config, DocumentStore};

mod commands;
mod logging;
mod prompt;
mod session;

use session::Session;

#[derive(Parser)]
#[command(name = "sleng")]
#[command(about = "sleng - Single-user slang dictionary with an HTTP API")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run only the HTTP API
    Serve {
        /// Address to listen on (defaults to bind_addr from config)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Run only the interactive menu
    Menu,
    /// Show configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;

    logging::init(&config);

    let store = Arc::new(DocumentStore::open(&config));

    match cli.command {
        Some(Commands::Config { command }) => {
            let json = matches!(command, Some(ConfigCommands::Show { json: true }));
            commands::config::show(&config, cli.config.as_ref(), json)
        }
        Some(Commands::Serve { bind }) => {
            let addr = bind.unwrap_or_else(|| config.bind_addr.clone());
            run_server(store, &addr).await
        }
        Some(Commands::Menu) => run_menu(store).await,
        None => run_all(store, &config.bind_addr).await,
    }
}

/// Serve the API in the foreground until Ctrl-C
async fn run_server(store: Arc<DocumentStore>, addr: &str) -> Result<()> {
    let listener = api::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    println!("API running on http://{}", addr);
    api::serve(listener, store, shutdown_signal())
        .await
        .context("API server failed")
}

/// Start the API in the background, then run the menu in the foreground
///
/// The menu still runs when the API cannot bind. Leaving the menu ends
/// the process, and the API with it.
async fn run_all(store: Arc<DocumentStore>, addr: &str) -> Result<()> {
    match api::bind(addr).await {
        Ok(listener) => {
            println!("API running on http://{}", addr);
            let server_store = Arc::clone(&store);
            tokio::spawn(async move {
                if let Err(e) = api::serve(listener, server_store, std::future::pending()).await {
                    error!("API server stopped: {}", e);
                }
            });
        }
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            eprintln!("Could not start the API on {}: {}", addr, e);
        }
    }

    run_menu(store).await
}

/// Run the interactive menu on a blocking thread
async fn run_menu(store: Arc<DocumentStore>) -> Result<()> {
    tokio::task::spawn_blocking(move || {
        let stdin = io::stdin();
        let mut session = Session::new(&store, stdin.lock(), io::stdout());
        session.run()
    })
    .await
    .context("Interactive session panicked")?
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a signal handler, run until killed
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
