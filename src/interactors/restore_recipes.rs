//! Restore: cache read → emit, used to rebuild the list after a restart

use tracing::error;

use super::{emission_channel, DataStateReceiver};
use crate::cache::RecipeDao;
use crate::data::{DataState, Recipe, RECIPE_PAGINATION_PAGE_SIZE};

#[derive(Debug, Clone)]
pub struct RestoreRecipes {
    recipe_dao: RecipeDao,
}

impl RestoreRecipes {
    pub fn new(recipe_dao: RecipeDao) -> Self {
        Self { recipe_dao }
    }

    /// Emits every cached recipe from page 1 through `page` for `query`.
    pub fn execute(&self, page: u32, query: &str) -> DataStateReceiver<Vec<Recipe>> {
        let (tx, rx) = emission_channel();
        let recipe_dao = self.recipe_dao.clone();
        let query = query.to_string();

        tokio::spawn(async move {
            let _ = tx.send(DataState::Loading).await;

            let cached = if query.trim().is_empty() {
                recipe_dao.restore_all_recipes(page, RECIPE_PAGINATION_PAGE_SIZE)
            } else {
                recipe_dao.restore_recipes(&query, page, RECIPE_PAGINATION_PAGE_SIZE)
            };

            let state = match cached {
                Ok(recipes) => DataState::Success(recipes),
                Err(e) => {
                    error!(page, query = %query, error = %e, "restoring recipes failed");
                    DataState::Error(e.to_string())
                }
            };

            let _ = tx.send(state).await;
        });

        rx
    }
}
