//! GetByID: cache lookup, falling back to network fetch + cache insert

use tracing::{debug, error};

use super::{emission_channel, DataStateReceiver};
use crate::cache::RecipeDao;
use crate::data::{DataState, Recipe, RecipeService};

/// Message shown when a recipe is neither cached nor fetchable
pub const RECIPE_NOT_FOUND: &str = "Unable to get recipe from the cache.";

#[derive(Debug, Clone)]
pub struct GetRecipe {
    recipe_dao: RecipeDao,
    recipe_service: RecipeService,
}

impl GetRecipe {
    pub fn new(recipe_dao: RecipeDao, recipe_service: RecipeService) -> Self {
        Self {
            recipe_dao,
            recipe_service,
        }
    }

    /// Loads one recipe, preferring the cache.
    ///
    /// On a cache miss with `network_available`, the recipe is fetched,
    /// inserted, and read back from the cache.
    pub fn execute(&self, recipe_id: i32, network_available: bool) -> DataStateReceiver<Recipe> {
        let (tx, rx) = emission_channel();
        let this = self.clone();

        tokio::spawn(async move {
            let _ = tx.send(DataState::Loading).await;

            let state = match this.get(recipe_id, network_available).await {
                Ok(recipe) => DataState::Success(recipe),
                Err(message) => {
                    error!(recipe_id, error = %message, "loading recipe failed");
                    DataState::Error(message)
                }
            };

            let _ = tx.send(state).await;
        });

        rx
    }

    async fn get(&self, recipe_id: i32, network_available: bool) -> Result<Recipe, String> {
        if let Some(recipe) = self.cached(recipe_id)? {
            debug!(recipe_id, "recipe served from cache");
            return Ok(recipe);
        }

        if network_available {
            let recipe = self
                .recipe_service
                .get(recipe_id)
                .await
                .map_err(|e| e.to_string())?;
            self.recipe_dao
                .insert_recipe(&recipe)
                .map_err(|e| e.to_string())?;
        }

        self.cached(recipe_id)?
            .ok_or_else(|| RECIPE_NOT_FOUND.to_string())
    }

    fn cached(&self, recipe_id: i32) -> Result<Option<Recipe>, String> {
        self.recipe_dao
            .get_recipe_by_id(recipe_id)
            .map_err(|e| e.to_string())
    }
}
