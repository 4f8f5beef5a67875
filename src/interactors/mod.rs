//! Use cases that coordinate the recipe API and the local cache
//!
//! Each use case runs on a spawned task and reports progress over a channel:
//! `DataState::Loading` first, then exactly one `Success` or `Error`. Lists
//! shown to the user are always read back out of the cache, never taken
//! straight from the network response.

mod get_recipe;
mod restore_recipes;
mod search_recipes;

pub use get_recipe::{GetRecipe, RECIPE_NOT_FOUND};
pub use restore_recipes::RestoreRecipes;
pub use search_recipes::SearchRecipes;

use tokio::sync::mpsc;

use crate::data::DataState;

/// Receiving end of a use case's emissions
pub type DataStateReceiver<T> = mpsc::Receiver<DataState<T>>;

/// Loading + one result; a little headroom avoids blocking the task
const EMISSION_BUFFER: usize = 4;

fn emission_channel<T>() -> (mpsc::Sender<DataState<T>>, DataStateReceiver<T>) {
    mpsc::channel(EMISSION_BUFFER)
}
