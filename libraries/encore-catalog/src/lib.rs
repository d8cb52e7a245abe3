//! Encore Catalog
//!
//! Self-contained collaborators for running the player without a network
//! service or audio device:
//! - [`Catalog`]: tracks loaded from a TOML file
//! - [`CatalogResolver`]: resolve, suggest and search over a catalog
//! - [`SimulatedSink`]: streams that "play" on the tokio clock
//!
//! # Example
//!
//! ```rust
//! use encore_catalog::{Catalog, CatalogResolver};
//!
//! let catalog = Catalog::from_toml_str(r#"
//! [[tracks]]
//! id = "nd-01"
//! name = "Night Drive"
//! length = "4:05"
//! "#).unwrap();
//!
//! let resolver = CatalogResolver::new(catalog);
//! assert_eq!(resolver.catalog().len(), 1);
//! ```

pub mod catalog;
pub mod error;
pub mod resolver;
pub mod sink;

pub use catalog::{Catalog, CatalogEntry};
pub use error::{CatalogError, Result};
pub use resolver::CatalogResolver;
pub use sink::{SimulatedHandle, SimulatedSink};
