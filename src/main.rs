//! Binary entry point for docchat.
//!
//! This binary runs the mock chat server and a few offline helpers for
//! inspecting catalogs.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use docchat::catalog::Catalog;
use docchat::client::ChatClient;
use docchat::config::DocchatConfig;
use docchat::observability::{self, InitOptions};
use docchat::server::ChatServer;
use docchat::{ChatRequest, ChatResponse, ResponseMode};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

/// docchat - Mock chat backend for the PDF viewer.
#[derive(Parser)]
#[command(name = "docchat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Port to listen on.
        #[arg(short, long)]
        port: Option<u16>,

        /// Catalog file (JSON or YAML). Defaults to the built-in catalog.
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Response mode: catalog or synthetic.
        #[arg(short, long)]
        mode: Option<String>,

        /// Directory served under `/test`.
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Match a query against the catalog without starting a server.
    Match {
        /// The user message to match.
        query: String,

        /// Catalog file (JSON or YAML).
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// List or validate catalog entries.
    Catalog {
        /// Catalog file (JSON or YAML).
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Only validate and report the entry count.
        #[arg(long)]
        validate: bool,
    },

    /// Send a message to a running server.
    Ask {
        /// The message to send.
        message: String,

        /// Server URL.
        #[arg(short, long, default_value = ChatClient::DEFAULT_URL)]
        url: String,

        /// Number of sources to request.
        #[arg(short, long)]
        source_count: Option<usize>,

        /// Turn off the Graph RAG toggle.
        #[arg(long)]
        no_graph_rag: bool,

        /// Turn on contradiction detection.
        #[arg(long)]
        detect_contradictions: bool,
    },

    /// Manage configuration.
    Config {
        /// Show current configuration.
        #[arg(long)]
        show: bool,
    },
}

/// Main entry point.
#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    let expose_metrics = matches!(cli.command, Commands::Serve { .. });
    if let Err(e) = observability::init_from_config(
        &config.observability,
        InitOptions {
            verbose: cli.verbose,
            metrics_expose: expose_metrics,
        },
    ) {
        eprintln!("Failed to initialize observability: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
async fn run_command(cli: Cli, config: DocchatConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Serve {
            port,
            catalog,
            mode,
            static_dir,
        } => cmd_serve(config, port, catalog, mode, static_dir).await,

        Commands::Match { query, catalog } => cmd_match(&config, &query, catalog),

        Commands::Catalog { catalog, validate } => cmd_catalog(&config, catalog, validate),

        Commands::Ask {
            message,
            url,
            source_count,
            no_graph_rag,
            detect_contradictions,
        } => {
            let mut request = ChatRequest::new(message)
                .with_graph_rag(!no_graph_rag)
                .with_contradiction_detection(detect_contradictions);
            if let Some(count) = source_count {
                request = request.with_source_count(count);
            }
            cmd_ask(&url, &request).await
        },

        Commands::Config { show } => cmd_config(&config, show),
    }
}

/// Loads configuration: file, then environment.
fn load_config(path: Option<&str>) -> Result<DocchatConfig, Box<dyn std::error::Error>> {
    let mut config = if let Some(config_path) = path {
        DocchatConfig::load_from_file(Path::new(config_path))?
    } else {
        match std::env::var("DOCCHAT_CONFIG_PATH") {
            Ok(config_path) if !config_path.trim().is_empty() => {
                DocchatConfig::load_from_file(Path::new(&config_path))?
            },
            _ => DocchatConfig::load_default(),
        }
    };

    config.apply_env_overrides()?;
    Ok(config)
}

/// Loads the catalog named on the command line, in the config, or the embedded one.
fn load_catalog(
    config: &DocchatConfig,
    path: Option<PathBuf>,
) -> Result<Catalog, Box<dyn std::error::Error>> {
    let path = path.or_else(|| config.catalog_path.clone());
    Ok(Catalog::load_or_embedded(path.as_deref())?)
}

/// Serve command.
async fn cmd_serve(
    mut config: DocchatConfig,
    port: Option<u16>,
    catalog: Option<PathBuf>,
    mode: Option<String>,
    static_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(port) = port {
        config = config.with_port(port);
    }
    if let Some(path) = catalog {
        config = config.with_catalog_path(path);
    }
    if let Some(mode) = mode {
        config = config.with_mode(ResponseMode::parse(&mode)?);
    }
    if let Some(dir) = static_dir {
        config = config.with_static_dir(dir);
    }

    let catalog = load_catalog(&config, None)?;
    ChatServer::new(config, Arc::new(catalog)).serve().await?;
    Ok(())
}

/// Match command.
fn cmd_match(
    config: &DocchatConfig,
    query: &str,
    catalog: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_catalog(config, catalog)?;
    let resolution = catalog.resolve(query);

    let output = serde_json::json!({
        "tier": resolution.label(),
        "response": ChatResponse::from(resolution.entry),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Catalog command.
fn cmd_catalog(
    config: &DocchatConfig,
    catalog: Option<PathBuf>,
    validate: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_catalog(config, catalog)?;

    if validate {
        println!("Catalog OK: {} entries plus fallback", catalog.len());
        return Ok(());
    }

    println!("{:>4}  {:<40}  SOURCES", "ID", "PATTERN");
    for entry in catalog.entries() {
        println!(
            "{:>4}  {:<40}  {}",
            entry.id,
            entry.pattern,
            entry.sources.len()
        );
    }
    let fallback = catalog.fallback();
    println!();
    println!("Fallback ({}): {}", fallback.id, fallback.answer);
    Ok(())
}

/// Ask command.
async fn cmd_ask(url: &str, request: &ChatRequest) -> Result<(), Box<dyn std::error::Error>> {
    let client = ChatClient::new(url)?;
    let response = client.send(request).await?;

    println!("{}", response.answer);
    if !response.sources.is_empty() {
        println!();
        println!("Sources:");
        for (i, source) in response.sources.iter().enumerate() {
            println!(
                "  [{}] {} (p. {}, score {:.2}) {}",
                i + 1,
                source.title,
                source.page,
                source.score,
                source.url
            );
        }
    }
    Ok(())
}

/// Config command.
fn cmd_config(config: &DocchatConfig, show: bool) -> Result<(), Box<dyn std::error::Error>> {
    if show {
        println!("Current Configuration");
        println!("=====================");
        println!();
        print!("{}", config.to_toml()?);
    } else {
        println!("Use --show to display configuration");
    }
    Ok(())
}
