//! Encore shell
//!
//! Drives per-session players from text commands, backed by a TOML catalog
//! and simulated audio output.

pub mod announcer;
pub mod commands;
pub mod config;
pub mod error;
pub mod session;

pub use announcer::{Announcement, Announcer};
pub use commands::{parse, Command, Dispatcher, ParseError, Request};
pub use config::CliConfig;
pub use error::{CliError, Result};

use encore_catalog::{Catalog, CatalogResolver, SimulatedSink};
use encore_core::StreamSink;
use encore_playback::{PlayerRegistry, SinkFactory};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// Load the catalog and wire a dispatcher whose sessions announce playback
pub async fn build(
    config: &CliConfig,
) -> Result<(Dispatcher, mpsc::UnboundedReceiver<Announcement>)> {
    let catalog = Catalog::load(&config.catalog.path).await?;
    info!(
        path = %config.catalog.path.display(),
        tracks = catalog.len(),
        "Catalog loaded"
    );

    let resolver = Arc::new(CatalogResolver::new(catalog));
    let template = SimulatedSink::new(config.sink.speed)?;
    let sinks: SinkFactory = Arc::new(move |_session: &str| -> Arc<dyn StreamSink> {
        Arc::new(template.fresh())
    });

    let registry = Arc::new(PlayerRegistry::new(
        resolver.clone(),
        sinks,
        config.player.clone(),
    ));

    let (announcer, announcements) = Announcer::new();
    let dispatcher = Dispatcher::new(registry, resolver, config.session.default.clone())
        .with_announcer(announcer);

    Ok((dispatcher, announcements))
}
