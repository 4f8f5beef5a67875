//! Search: network → cache write → cache read → emit

use tracing::{debug, error};

use super::{emission_channel, DataStateReceiver};
use crate::cache::RecipeDao;
use crate::data::{DataState, Recipe, RecipeService, RECIPE_PAGINATION_PAGE_SIZE};

#[derive(Debug, Clone)]
pub struct SearchRecipes {
    recipe_dao: RecipeDao,
    recipe_service: RecipeService,
}

impl SearchRecipes {
    pub fn new(recipe_dao: RecipeDao, recipe_service: RecipeService) -> Self {
        Self {
            recipe_dao,
            recipe_service,
        }
    }

    /// Searches one page of recipes.
    ///
    /// Fetched recipes are written to the cache and the page is then read
    /// back from the cache. With `network_available` false the fetch is
    /// skipped and whatever the cache holds for the page is emitted.
    ///
    /// # Arguments
    /// * `page` - 1-based page number
    /// * `query` - Search text; blank lists every cached recipe
    /// * `network_available` - Whether to contact the API first
    pub fn execute(
        &self,
        page: u32,
        query: &str,
        network_available: bool,
    ) -> DataStateReceiver<Vec<Recipe>> {
        let (tx, rx) = emission_channel();
        let this = self.clone();
        let query = query.to_string();

        tokio::spawn(async move {
            let _ = tx.send(DataState::Loading).await;

            let state = match this.search(page, &query, network_available).await {
                Ok(recipes) => DataState::Success(recipes),
                Err(message) => {
                    error!(page, query = %query, error = %message, "recipe search failed");
                    DataState::Error(message)
                }
            };

            let _ = tx.send(state).await;
        });

        rx
    }

    async fn search(
        &self,
        page: u32,
        query: &str,
        network_available: bool,
    ) -> Result<Vec<Recipe>, String> {
        if network_available {
            let recipes = self
                .recipe_service
                .search(page, query)
                .await
                .map_err(|e| e.to_string())?;
            debug!(page, count = recipes.len(), "fetched recipes from network");

            self.recipe_dao
                .insert_recipes(&recipes)
                .map_err(|e| e.to_string())?;
        }

        let cached = if query.trim().is_empty() {
            self.recipe_dao
                .get_all_recipes(page, RECIPE_PAGINATION_PAGE_SIZE)
        } else {
            self.recipe_dao
                .search_recipes(query, page, RECIPE_PAGINATION_PAGE_SIZE)
        };

        cached.map_err(|e| e.to_string())
    }
}
