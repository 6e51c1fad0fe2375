//! Domain error types.

use thiserror::Error;

use crate::cinema::{CatalogError, CinemaError};
use crate::config::ConfigError;

/// Any error the domain layer can produce.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A cinema operation referenced a missing entity.
    #[error("Cinema error: {0}")]
    Cinema(#[from] CinemaError),

    /// The catalog or the seeded reservations were inconsistent.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A configuration value could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
