//! Topograph CLI - Command-line interface for Topograph
//!
//! This is the main entry point for operators. It validates topology files,
//! answers one-shot dependency queries, and runs the WebSocket server that
//! keeps health state for dashboards.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "topograph")]
#[command(author = "Topograph Contributors")]
#[command(version)]
#[command(about = "Dependency and health queries over a service topology", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Topology file to load
    #[arg(short, long, global = true, default_value = "topology.json")]
    topology: PathBuf,

    /// Output as JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the topology file and show its size
    Check,

    /// Show totals and unhealthy components
    Summary,

    /// Show a single component
    Vertex {
        /// Component key
        key: String,
    },

    /// List components that depend on a component
    Dependents {
        /// Component key
        key: String,

        /// Follow dependents transitively
        #[arg(short, long)]
        all: bool,
    },

    /// List components a component depends on
    Dependencies {
        /// Component key
        key: String,

        /// Follow dependencies transitively
        #[arg(short, long)]
        all: bool,
    },

    /// List direct neighbors in both directions
    Neighbors {
        /// Component key
        key: String,
    },

    /// Find the shortest dependency path between two components
    Path {
        /// Starting component
        source: String,

        /// Destination component
        target: String,
    },

    /// Show everything upstream and downstream of a component
    Lineage {
        /// Component key
        key: String,
    },

    /// Start the Topograph server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "7450")]
        port: u16,

        /// Headless mode: bind to 0.0.0.0 for remote access
        #[arg(long)]
        headless: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let topology = cli.topology.as_path();
    let json = cli.json;

    let result = match cli.command {
        Commands::Check => commands::check(topology),
        Commands::Summary => commands::summary(topology, json),
        Commands::Vertex { key } => commands::vertex(topology, &key, json),
        Commands::Dependents { key, all } => commands::dependents(topology, &key, all, json),
        Commands::Dependencies { key, all } => commands::dependencies(topology, &key, all, json),
        Commands::Neighbors { key } => commands::neighbors(topology, &key, json),
        Commands::Path { source, target } => commands::path(topology, &source, &target, json),
        Commands::Lineage { key } => commands::lineage(topology, &key, json),
        Commands::Serve { port, headless } => commands::serve(topology, port, headless).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
