//! `TrackResolver` over a loaded catalog

use crate::catalog::Catalog;
use async_trait::async_trait;
use encore_core::{EncoreError, Result, StreamSource, Track, TrackResolver};
use std::sync::Arc;
use tracing::debug;

/// URI scheme of resolved catalog sources
pub const SOURCE_SCHEME: &str = "catalog://";

#[derive(Debug, Clone)]
pub struct CatalogResolver {
    catalog: Arc<Catalog>,
}

impl CatalogResolver {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

#[async_trait]
impl TrackResolver for CatalogResolver {
    async fn resolve(&self, track_id: &str) -> Result<StreamSource> {
        let entry = self
            .catalog
            .get(track_id)
            .ok_or_else(|| EncoreError::TrackNotFound(track_id.to_string()))?;

        if entry.unavailable {
            return Err(EncoreError::Unplayable(track_id.to_string()));
        }

        debug!(track_id, "Resolved catalog track");
        Ok(StreamSource {
            track_id: track_id.to_string(),
            location: format!("{}{}", SOURCE_SCHEME, track_id),
            duration: Some(entry.track.duration),
        })
    }

    async fn suggest(&self, track_id: &str) -> Result<Vec<Track>> {
        let entry = self
            .catalog
            .get(track_id)
            .ok_or_else(|| EncoreError::TrackNotFound(track_id.to_string()))?;

        let tracks: Vec<Track> = entry
            .suggestions
            .iter()
            .filter_map(|id| self.catalog.get(id))
            .map(|suggested| suggested.track.clone())
            .collect();

        if tracks.is_empty() {
            return Err(EncoreError::NoResults(track_id.to_string()));
        }
        Ok(tracks)
    }

    async fn search(&self, query: &str) -> Result<Vec<Track>> {
        Ok(self.catalog.search(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn resolver() -> CatalogResolver {
        let catalog = Catalog::from_toml_str(
            r#"
[[tracks]]
id = "a"
name = "Alpha"
length = "2:00"
suggestions = ["b"]

[[tracks]]
id = "b"
name = "Beta"
length = "3:00"
unavailable = true
"#,
        )
        .unwrap();
        CatalogResolver::new(catalog)
    }

    #[tokio::test]
    async fn resolves_known_track() {
        let source = resolver().resolve("a").await.unwrap();
        assert_eq!(source.track_id, "a");
        assert_eq!(source.location, "catalog://a");
        assert_eq!(source.duration, Some(Duration::from_secs(120)));
    }

    #[tokio::test]
    async fn unknown_and_unavailable_tracks_fail() {
        let resolver = resolver();
        assert_eq!(
            resolver.resolve("zzz").await,
            Err(EncoreError::TrackNotFound("zzz".to_string()))
        );
        assert_eq!(
            resolver.resolve("b").await,
            Err(EncoreError::Unplayable("b".to_string()))
        );
    }

    #[tokio::test]
    async fn suggestions_follow_catalog() {
        let resolver = resolver();

        let suggested = resolver.suggest("a").await.unwrap();
        assert_eq!(suggested.len(), 1);
        assert_eq!(suggested[0].id, "b");

        assert_eq!(
            resolver.suggest("b").await,
            Err(EncoreError::NoResults("b".to_string()))
        );
    }

    #[tokio::test]
    async fn search_one_picks_best_match() {
        let resolver = resolver();
        assert_eq!(resolver.search_one("alp").await.unwrap().id, "a");
        assert_eq!(
            resolver.search_one("gamma").await,
            Err(EncoreError::NoResults("gamma".to_string()))
        );
    }
}
