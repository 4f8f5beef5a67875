//! Command-line interface parsing for Recipe Search
//!
//! This module handles parsing of CLI arguments using clap, including the
//! initial query or category, API settings (also readable from the
//! environment) and where the local cache lives.

use std::path::PathBuf;

use clap::Parser;
use directories::ProjectDirs;
use thiserror::Error;

use crate::data::recipe_service::DEFAULT_BASE_URL;
use crate::data::FoodCategory;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified category name is not recognized
    #[error("Invalid category: '{0}'. Valid categories: chicken, beef, soup, dessert, vegetarian, milk, vegan, pizza, donut")]
    InvalidCategory(String),
}

/// Recipe Search - Find recipes, cache them, browse them offline
#[derive(Parser, Debug)]
#[command(name = "recipe-search")]
#[command(about = "Search recipes and browse them from a local cache")]
#[command(version)]
pub struct Cli {
    /// Search for this text on startup
    #[arg(long, value_name = "TEXT", conflicts_with = "category")]
    pub query: Option<String>,

    /// Start with a food category selected
    ///
    /// Valid categories: chicken, beef, soup, dessert, vegetarian, milk, vegan, pizza, donut
    #[arg(long, value_name = "CATEGORY")]
    pub category: Option<String>,

    /// Never contact the API; browse only what is cached
    #[arg(long)]
    pub offline: bool,

    /// API token sent as `Authorization: Token <TOKEN>`
    #[arg(long, env = "RECIPE_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Root URL of the recipe API
    #[arg(long, env = "RECIPE_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Directory for the recipe database, saved state and logs
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Delete every cached recipe before starting
    #[arg(long)]
    pub clear_cache: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Query to search on startup (if specified)
    pub initial_query: Option<String>,
    /// Category to select on startup (if specified)
    pub initial_category: Option<FoodCategory>,
    /// Whether use cases may contact the API
    pub network_available: bool,
    /// API token, if any
    pub token: Option<String>,
    /// Root URL of the recipe API
    pub base_url: String,
    /// Explicit data directory; the platform default is used otherwise
    pub data_dir: Option<PathBuf>,
    /// Wipe the recipe cache before starting
    pub clear_cache: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            initial_query: None,
            initial_category: None,
            network_available: true,
            token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            data_dir: None,
            clear_cache: false,
        }
    }
}

/// Parses a category string argument into a FoodCategory.
///
/// # Returns
/// * `Ok(FoodCategory)` if the string matches a category, ignoring case
/// * `Err(CliError::InvalidCategory)` if the string doesn't match
pub fn parse_category_arg(s: &str) -> Result<FoodCategory, CliError> {
    FoodCategory::from_value(s).ok_or_else(|| CliError::InvalidCategory(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if an invalid category was specified
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let initial_category = cli
            .category
            .as_deref()
            .map(parse_category_arg)
            .transpose()?;

        Ok(StartupConfig {
            initial_query: cli.query.clone().filter(|q| !q.trim().is_empty()),
            initial_category,
            network_available: !cli.offline,
            token: cli.token.clone().filter(|t| !t.trim().is_empty()),
            base_url: cli.base_url.clone(),
            data_dir: cli.data_dir.clone(),
            clear_cache: cli.clear_cache,
        })
    }

    /// Directory holding the database and saved state
    ///
    /// Returns `None` if no `--data-dir` was given and the platform
    /// directory cannot be determined (e.g., no home directory).
    pub fn resolve_data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(|| {
            ProjectDirs::from("", "", "recipe-search").map(|dirs| dirs.data_dir().to_path_buf())
        })
    }

    /// Directory for log files: `<data-dir>/logs` when a data dir was
    /// given, otherwise the platform cache directory
    pub fn resolve_log_dir(&self) -> Option<PathBuf> {
        match &self.data_dir {
            Some(dir) => Some(dir.join("logs")),
            None => ProjectDirs::from("", "", "recipe-search").map(|dirs| dirs.cache_dir().to_path_buf()),
        }
    }
}
