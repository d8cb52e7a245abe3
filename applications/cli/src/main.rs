//! Encore - interactive queue player shell

use anyhow::Context;
use clap::{Parser, Subcommand};
use encore_catalog::{Catalog, CatalogResolver};
use encore_cli::{session, CliConfig};
use encore_core::{time::format_length, TrackResolver};
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "encore")]
#[command(about = "Queue player shell", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive shell
    Run {
        /// Configuration file
        #[arg(short, long, env = "ENCORE_CONFIG")]
        config: Option<PathBuf>,

        /// Catalog file, overriding the configuration
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Default session, overriding the configuration
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Search the catalog and exit
    Search {
        /// Search terms
        query: String,

        /// Configuration file
        #[arg(short, long, env = "ENCORE_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Print the effective configuration
    Config {
        /// Configuration file
        #[arg(short, long, env = "ENCORE_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they do not interleave with shell output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "encore_cli=info,encore_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            catalog,
            session,
        } => {
            let mut config = CliConfig::load(config.as_deref())?;
            if let Some(catalog) = catalog {
                config.catalog.path = catalog;
            }
            if let Some(session) = session {
                config.session.default = session;
            }
            config.validate()?;
            run(config).await?;
        }
        Commands::Search { query, config } => {
            let config = CliConfig::load(config.as_deref())?;
            search(&config, &query).await?;
        }
        Commands::Config { config } => {
            let config = CliConfig::load(config.as_deref())?;
            print!(
                "{}",
                toml::to_string_pretty(&config).context("Cannot render configuration")?
            );
        }
    }

    Ok(())
}

async fn run(config: CliConfig) -> anyhow::Result<()> {
    let (dispatcher, announcements) = encore_cli::build(&config)
        .await
        .with_context(|| format!("Cannot start with catalog {}", config.catalog.path.display()))?;

    tracing::info!(session = %config.session.default, "Encore shell ready, type `help`");

    let input = BufReader::new(tokio::io::stdin());
    let output = tokio::io::stdout();

    tokio::select! {
        result = session::run(&dispatcher, input, output, announcements) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, closing sessions");
            dispatcher.registry().close_all().await;
        }
    }

    Ok(())
}

async fn search(config: &CliConfig, query: &str) -> anyhow::Result<()> {
    let catalog = Catalog::load(&config.catalog.path).await?;
    let resolver = CatalogResolver::new(catalog);

    let tracks = resolver.search(query).await?;
    if tracks.is_empty() {
        println!("No results for: {}", query);
    }
    for track in tracks {
        println!(
            "{:<16} {} ({})",
            track.id,
            track.name,
            format_length(track.duration)
        );
    }
    Ok(())
}
