//! Local persistence for Recipe Search
//!
//! This module holds the SQLite recipe cache that every use case reads
//! through, and a small JSON store for presentation snapshots so the list
//! and detail screens can be rebuilt after a restart.

mod recipe_dao;
mod state_store;

pub use recipe_dao::RecipeDao;
pub use state_store::{SavedState, StateStore};

use thiserror::Error;

/// Errors raised by the local cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// SQLite rejected a statement
    #[error("Cache database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored column could not be encoded or decoded
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored timestamp is outside the representable range
    #[error("Invalid cached timestamp: {0}")]
    InvalidTimestamp(i64),

    /// Another task panicked while holding the connection
    #[error("Cache connection lock poisoned")]
    Poisoned,

    /// Creating the cache directory failed
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),
}
