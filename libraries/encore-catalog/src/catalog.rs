//! TOML track catalog
//!
//! ```toml
//! [[tracks]]
//! id = "nd-01"
//! name = "Night Drive"
//! length = "4:05"
//! suggestions = ["nd-02", "cs-07"]
//!
//! [[tracks]]
//! id = "nd-02"
//! name = "Night Drive (Reprise)"
//! length = "1:02:33"
//! unavailable = true
//! ```

use crate::error::{CatalogError, Result};
use encore_core::{time::parse_length_text, Track};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    tracks: Vec<EntryFile>,
}

#[derive(Debug, Deserialize)]
struct EntryFile {
    id: String,
    name: String,
    length: String,

    #[serde(default)]
    suggestions: Vec<String>,

    #[serde(default)]
    unavailable: bool,
}

/// One catalog track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub track: Track,

    /// Ranked follow-up track ids
    pub suggestions: Vec<String>,

    /// Listed but cannot be streamed
    pub unavailable: bool,
}

/// Validated, in-memory track catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Read and validate a catalog file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CatalogError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let catalog = Self::from_toml_str(&text)?;
        info!(path = %path.display(), tracks = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// Parse and validate catalog text
    ///
    /// Ids must be unique, lengths must be clock text and every suggestion
    /// must name a track in the catalog.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(text)?;

        let mut catalog = Self::default();
        for entry in file.tracks {
            if catalog.index.contains_key(&entry.id) {
                return Err(CatalogError::DuplicateId(entry.id));
            }

            let duration =
                parse_length_text(&entry.length).ok_or_else(|| CatalogError::InvalidLength {
                    id: entry.id.clone(),
                    text: entry.length.clone(),
                })?;

            catalog.index.insert(entry.id.clone(), catalog.entries.len());
            catalog.entries.push(CatalogEntry {
                track: Track::new(entry.id, entry.name, duration),
                suggestions: entry.suggestions,
                unavailable: entry.unavailable,
            });
        }

        for entry in &catalog.entries {
            if let Some(unknown) = entry
                .suggestions
                .iter()
                .find(|id| !catalog.index.contains_key(*id))
            {
                return Err(CatalogError::UnknownSuggestion {
                    id: entry.track.id.clone(),
                    suggestion: unknown.clone(),
                });
            }
        }

        Ok(catalog)
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive lookup, best match first
    ///
    /// An exact id ranks first, then names starting with the query, then
    /// names containing every word of the query. Ties keep catalog order.
    pub fn search(&self, query: &str) -> Vec<Track> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        let words: Vec<&str> = query.split_whitespace().collect();

        let mut ranked: Vec<(u8, &CatalogEntry)> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let name = entry.track.name.to_lowercase();
                let rank = if entry.track.id.to_lowercase() == query {
                    0
                } else if name.starts_with(&query) {
                    1
                } else if words.iter().all(|w| name.contains(w)) {
                    2
                } else {
                    return None;
                };
                Some((rank, entry))
            })
            .collect();

        // Stable sort keeps catalog order within a rank
        ranked.sort_by_key(|(rank, _)| *rank);
        ranked
            .into_iter()
            .map(|(_, entry)| entry.track.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const SAMPLE: &str = r#"
[[tracks]]
id = "nd-01"
name = "Night Drive"
length = "4:05"
suggestions = ["nd-02", "cs-07"]

[[tracks]]
id = "nd-02"
name = "Night Drive (Reprise)"
length = "1:02:33"
unavailable = true

[[tracks]]
id = "cs-07"
name = "Coastline at Night"
length = "3:10"
"#;

    #[test]
    fn parses_entries() {
        let catalog = Catalog::from_toml_str(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 3);

        let entry = catalog.get("nd-01").unwrap();
        assert_eq!(entry.track.name, "Night Drive");
        assert_eq!(entry.track.duration, Duration::from_secs(245));
        assert_eq!(entry.suggestions, vec!["nd-02", "cs-07"]);
        assert!(!entry.unavailable);

        let reprise = catalog.get("nd-02").unwrap();
        assert_eq!(reprise.track.duration, Duration::from_secs(3753));
        assert!(reprise.unavailable);
    }

    #[test]
    fn empty_catalog() {
        let catalog = Catalog::from_toml_str("").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let text = r#"
[[tracks]]
id = "a"
name = "One"
length = "1:00"

[[tracks]]
id = "a"
name = "Two"
length = "2:00"
"#;
        assert!(matches!(
            Catalog::from_toml_str(text),
            Err(CatalogError::DuplicateId(id)) if id == "a"
        ));
    }

    #[test]
    fn rejects_bad_length() {
        let text = r#"
[[tracks]]
id = "a"
name = "One"
length = "1:2:3:4"
"#;
        assert!(matches!(
            Catalog::from_toml_str(text),
            Err(CatalogError::InvalidLength { .. })
        ));
    }

    #[test]
    fn rejects_unknown_suggestion() {
        let text = r#"
[[tracks]]
id = "a"
name = "One"
length = "1:00"
suggestions = ["missing"]
"#;
        assert!(matches!(
            Catalog::from_toml_str(text),
            Err(CatalogError::UnknownSuggestion { suggestion, .. }) if suggestion == "missing"
        ));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            Catalog::from_toml_str("[[tracks]]\nid = "),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn search_ranks_matches() {
        let catalog = Catalog::from_toml_str(SAMPLE).unwrap();

        let ids = |query: &str| -> Vec<String> {
            catalog.search(query).into_iter().map(|t| t.id).collect()
        };

        assert_eq!(ids("night drive"), vec!["nd-01", "nd-02"]);
        assert_eq!(ids("NIGHT"), vec!["nd-01", "nd-02", "cs-07"]);
        assert_eq!(ids("cs-07"), vec!["cs-07"]);
        assert_eq!(ids("at night"), vec!["cs-07"]);
        assert!(ids("polka").is_empty());
        assert!(ids("   ").is_empty());
    }
}
