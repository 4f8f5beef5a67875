//! Recipe API client
//!
//! This module fetches recipes from a food2fork-compatible REST API and maps
//! the wire format into our `Recipe` domain type.

use chrono::{DateTime, Utc};
use reqwest::{header::AUTHORIZATION, Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::Recipe;

/// Base URL for the recipe API
pub const DEFAULT_BASE_URL: &str = "https://food2fork.ca/api/recipe";

/// Errors that can occur when talking to the recipe API
#[derive(Debug, Error)]
pub enum RecipeServiceError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("Recipe API returned {0}")]
    Status(StatusCode),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// A date field held a value outside the representable range
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(i64),
}

/// Recipe as the API sends it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDto {
    pub pk: i32,
    pub title: String,
    pub publisher: String,
    pub featured_image: String,
    pub rating: i32,
    pub source_url: String,
    /// The API sends `null` for recipes without an ingredient list
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    /// Unix seconds
    pub long_date_added: i64,
    /// Unix seconds
    pub long_date_updated: i64,
}

/// Body of a search response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSearchResponse {
    pub count: u32,
    #[serde(rename = "results")]
    pub recipes: Vec<RecipeDto>,
}

impl RecipeDto {
    /// Maps the wire shape into the domain model
    pub fn into_domain(self) -> Result<Recipe, RecipeServiceError> {
        Ok(Recipe {
            id: self.pk,
            title: self.title,
            publisher: self.publisher,
            featured_image: self.featured_image,
            rating: self.rating,
            source_url: self.source_url,
            ingredients: self.ingredients.unwrap_or_default(),
            date_added: timestamp_to_date(self.long_date_added)?,
            date_updated: timestamp_to_date(self.long_date_updated)?,
        })
    }
}

impl From<&Recipe> for RecipeDto {
    fn from(recipe: &Recipe) -> Self {
        Self {
            pk: recipe.id,
            title: recipe.title.clone(),
            publisher: recipe.publisher.clone(),
            featured_image: recipe.featured_image.clone(),
            rating: recipe.rating,
            source_url: recipe.source_url.clone(),
            ingredients: Some(recipe.ingredients.clone()),
            long_date_added: recipe.date_added.timestamp(),
            long_date_updated: recipe.date_updated.timestamp(),
        }
    }
}

/// Converts unix seconds to a UTC instant
fn timestamp_to_date(secs: i64) -> Result<DateTime<Utc>, RecipeServiceError> {
    DateTime::from_timestamp(secs, 0).ok_or(RecipeServiceError::InvalidTimestamp(secs))
}

/// Client for the recipe API
#[derive(Debug, Clone)]
pub struct RecipeService {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl Default for RecipeService {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipeService {
    /// Create a new RecipeService against the public API, without a token
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
        }
    }

    /// Point the client at a different API root (e.g. a mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Send `Authorization: Token <token>` with every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Search recipes by keyword
    ///
    /// # Arguments
    /// * `page` - 1-based page number
    /// * `query` - Search text; empty returns every recipe
    ///
    /// # Returns
    /// * `Ok(Vec<Recipe>)` - The recipes on that page
    /// * `Err(RecipeServiceError)` - If the request or parsing fails
    pub async fn search(&self, page: u32, query: &str) -> Result<Vec<Recipe>, RecipeServiceError> {
        let url = format!("{}/search", self.base_url);
        debug!(page, query, "searching recipes");

        let request = self
            .client
            .get(&url)
            .query(&[("page", page.to_string()), ("query", query.to_string())]);
        let text = self.send(request).await?;
        let response: RecipeSearchResponse = serde_json::from_str(&text)?;

        response
            .recipes
            .into_iter()
            .map(RecipeDto::into_domain)
            .collect()
    }

    /// Fetch a single recipe by id
    pub async fn get(&self, id: i32) -> Result<Recipe, RecipeServiceError> {
        let url = format!("{}/get", self.base_url);
        debug!(id, "fetching recipe");

        let request = self.client.get(&url).query(&[("id", id.to_string())]);
        let text = self.send(request).await?;
        let dto: RecipeDto = serde_json::from_str(&text)?;

        dto.into_domain()
    }

    /// Attaches the token, sends the request and returns the body of a
    /// successful response
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, RecipeServiceError> {
        let request = match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Token {}", token)),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RecipeServiceError::Status(status));
        }

        Ok(response.text().await?)
    }
}
