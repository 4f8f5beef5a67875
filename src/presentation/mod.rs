//! State holders behind the recipe screens
//!
//! Each holder keeps the observable state of one screen, reacts to user
//! events by starting use cases, and folds the emitted `DataState`s back
//! into its fields. Screens render straight from these holders.

pub mod dialog_queue;
pub mod recipe_detail;
pub mod recipe_list;

pub use dialog_queue::{DialogInfo, DialogQueue};
pub use recipe_detail::{
    RecipeDetailSnapshot, RecipeDetailState, RecipeEvent, STATE_KEY_RECIPE_DETAIL,
};
pub use recipe_list::{
    RecipeListEvent, RecipeListSnapshot, RecipeListState, STATE_KEY_RECIPE_LIST,
};
