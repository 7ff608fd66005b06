//! Eventgraph CLI - serve the GraphQL API or inspect its schema and dataset

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use eventgraph::config::{self, EventgraphConfig};
use eventgraph::server;
use eventgraph::Store;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "eventgraph")]
#[command(version)]
#[command(about = "In-memory GraphQL API for users, events, locations and participants")]
#[command(long_about = r#"
Eventgraph serves a GraphQL API over an in-memory dataset of
users, events, locations and participants. Nothing is persisted:
every restart begins from the seed dataset.

Example usage:
  eventgraph serve --port 3000
  eventgraph schema > schema.graphql
  eventgraph stats --dataset ./data/dataset.json
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GraphQL server
    Serve {
        /// Address to listen on
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides PORT and the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// JSON dataset to seed the store from
        #[arg(short, long)]
        dataset: Option<PathBuf>,

        /// Do not serve the GraphQL Playground page
        #[arg(long)]
        no_playground: bool,
    },

    /// Print the GraphQL schema (SDL)
    Schema,

    /// Show record counts for a dataset
    Stats {
        /// JSON dataset to inspect (defaults to the bundled one)
        #[arg(short, long)]
        dataset: Option<PathBuf>,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

fn load_store(dataset: Option<&Path>) -> anyhow::Result<Store> {
    match dataset {
        Some(path) => Store::load(path).with_context(|| format!("loading dataset {}", path.display())),
        None => Store::load_bundled().context("loading bundled dataset"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let file_config = config::load_config(cli.config.as_deref())?.unwrap_or_default();

    match cli.command {
        Commands::Serve { host, port, dataset, no_playground } => {
            let port = config::resolve_port(port, config::port_from_env()?, &file_config);
            let settings = EventgraphConfig {
                host: host.unwrap_or(file_config.host),
                port,
                dataset: dataset
                    .map(|p| p.to_string_lossy().to_string())
                    .or(file_config.dataset),
                playground: file_config.playground && !no_playground,
            };

            let store = load_store(settings.dataset.as_deref().map(Path::new))?;
            let stats = store.stats();
            tracing::info!(
                users = stats.users,
                events = stats.events,
                locations = stats.locations,
                participants = stats.participants,
                "Loaded dataset"
            );

            server::start_server(settings.socket_addr()?, store.into_shared(), settings.playground).await?;
        }

        Commands::Schema => {
            println!("{}", server::schema::sdl());
        }

        Commands::Stats { dataset } => {
            let dataset = dataset.or_else(|| file_config.dataset.map(PathBuf::from));
            let store = load_store(dataset.as_deref())?;

            match &dataset {
                Some(path) => println!("📊 Eventgraph Statistics ({:?})", path),
                None => println!("📊 Eventgraph Statistics (bundled dataset)"),
            }
            println!("------------------------------------");
            println!("{}", store.stats());
        }

        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(config::default_config_path);
            config::write_config(&path, &EventgraphConfig::default(), force)?;
            println!("✅ Wrote {}", path.display());
        }
    }

    Ok(())
}
