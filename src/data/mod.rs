//! Core data models for Recipe Search
//!
//! This module contains the domain types shared by the remote data source,
//! the local cache and the presentation layer.

pub mod recipe_service;

pub use recipe_service::{RecipeDto, RecipeSearchResponse, RecipeService, RecipeServiceError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of recipes the API returns per page, and the page size used for
/// every paged cache query.
pub const RECIPE_PAGINATION_PAGE_SIZE: u32 = 30;

/// A recipe as the rest of the application sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Identifier assigned by the recipe API
    pub id: i32,
    /// Recipe title
    pub title: String,
    /// Site or author that published the recipe
    pub publisher: String,
    /// URL of the featured image
    pub featured_image: String,
    /// Rating out of 100
    pub rating: i32,
    /// URL of the original recipe page
    pub source_url: String,
    /// Ingredient lines, in display order
    pub ingredients: Vec<String>,
    /// When the recipe was first added to the API
    pub date_added: DateTime<Utc>,
    /// When the recipe was last updated on the API
    pub date_updated: DateTime<Utc>,
}

/// Food categories offered as quick-search chips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoodCategory {
    Chicken,
    Beef,
    Soup,
    Dessert,
    Vegetarian,
    Milk,
    Vegan,
    Pizza,
    Donut,
}

impl FoodCategory {
    /// All categories in chip order
    pub const ALL: [FoodCategory; 9] = [
        FoodCategory::Chicken,
        FoodCategory::Beef,
        FoodCategory::Soup,
        FoodCategory::Dessert,
        FoodCategory::Vegetarian,
        FoodCategory::Milk,
        FoodCategory::Vegan,
        FoodCategory::Pizza,
        FoodCategory::Donut,
    ];

    /// The search text sent when this category is selected
    pub fn value(&self) -> &'static str {
        match self {
            FoodCategory::Chicken => "Chicken",
            FoodCategory::Beef => "Beef",
            FoodCategory::Soup => "Soup",
            FoodCategory::Dessert => "Dessert",
            FoodCategory::Vegetarian => "Vegetarian",
            FoodCategory::Milk => "Milk",
            FoodCategory::Vegan => "Vegan",
            FoodCategory::Pizza => "Pizza",
            FoodCategory::Donut => "Donut",
        }
    }

    /// Resolves a category from its value, ignoring case.
    ///
    /// Returns `None` when the text is not one of the known categories.
    pub fn from_value(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.value().eq_ignore_ascii_case(value))
    }

    /// Position of this category in `ALL`
    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|category| category == self)
            .unwrap_or(0)
    }
}

/// Envelope emitted by every use case: a loading marker, the data, or an
/// error message for the user.
#[derive(Debug, Clone, PartialEq)]
pub enum DataState<T> {
    /// Work has started
    Loading,
    /// Work finished with data
    Success(T),
    /// Work failed; the message is shown to the user
    Error(String),
}

impl<T> DataState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, DataState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            DataState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            DataState::Error(message) => Some(message),
            _ => None,
        }
    }
}
