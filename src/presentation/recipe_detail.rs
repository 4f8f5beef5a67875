//! State holder for the recipe detail screen

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::error::TryRecvError;
use tracing::warn;

use crate::cache::StateStore;
use crate::data::{DataState, Recipe};
use crate::interactors::{DataStateReceiver, GetRecipe};

use super::DialogQueue;

/// Snapshot key for the detail screen
pub const STATE_KEY_RECIPE_DETAIL: &str = "recipe_detail";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeEvent {
    GetRecipe(i32),
}

/// Id of the recipe that was open, so a restart can reopen it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDetailSnapshot {
    pub recipe_id: i32,
}

pub struct RecipeDetailState {
    recipe: Option<Recipe>,
    loading: bool,
    dialog_queue: DialogQueue,
    network_available: bool,
    get_recipe: GetRecipe,
    state_store: Option<StateStore>,
    pending: Option<DataStateReceiver<Recipe>>,
}

impl RecipeDetailState {
    pub fn new(get_recipe: GetRecipe, state_store: Option<StateStore>, network_available: bool) -> Self {
        Self {
            recipe: None,
            loading: false,
            dialog_queue: DialogQueue::new(),
            network_available,
            get_recipe,
            state_store,
            pending: None,
        }
    }

    /// Id of the recipe that was open when the last session ended
    pub fn saved_recipe_id(&self) -> Option<i32> {
        self.state_store
            .as_ref()?
            .read::<RecipeDetailSnapshot>(STATE_KEY_RECIPE_DETAIL)
            .map(|saved| saved.data.recipe_id)
    }

    /// Loads a recipe unless one is already shown; call `reset` first to
    /// switch recipes.
    pub fn on_trigger_event(&mut self, event: RecipeEvent) {
        match event {
            RecipeEvent::GetRecipe(id) => {
                if self.recipe.is_none() {
                    self.pending = Some(self.get_recipe.execute(id, self.network_available));
                }
            }
        }
    }

    /// Forgets the current recipe, e.g. when the user navigates back
    pub fn reset(&mut self) {
        self.recipe = None;
        self.loading = false;
        self.pending = None;
        if let Some(store) = &self.state_store {
            if let Err(e) = store.clear(STATE_KEY_RECIPE_DETAIL) {
                warn!(error = %e, "failed to clear recipe detail snapshot");
            }
        }
    }

    pub fn recipe(&self) -> Option<&Recipe> {
        self.recipe.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn dialog_queue(&self) -> &DialogQueue {
        &self.dialog_queue
    }

    pub fn dialog_queue_mut(&mut self) -> &mut DialogQueue {
        &mut self.dialog_queue
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Applies every emission that has already arrived, without waiting
    pub fn poll(&mut self) {
        let Some(mut receiver) = self.pending.take() else {
            return;
        };

        loop {
            match receiver.try_recv() {
                Ok(state) => self.apply(state),
                Err(TryRecvError::Empty) => {
                    self.pending = Some(receiver);
                    return;
                }
                Err(TryRecvError::Disconnected) => return,
            }
        }
    }

    /// Waits for the in-flight load to finish and applies its emissions
    pub async fn settle(&mut self) {
        let Some(mut receiver) = self.pending.take() else {
            return;
        };

        while let Some(state) = receiver.recv().await {
            self.apply(state);
        }
    }

    fn apply(&mut self, state: DataState<Recipe>) {
        match state {
            DataState::Loading => self.loading = true,
            DataState::Success(recipe) => {
                self.loading = false;
                if let Some(store) = &self.state_store {
                    store.save(
                        STATE_KEY_RECIPE_DETAIL,
                        &RecipeDetailSnapshot {
                            recipe_id: recipe.id,
                        },
                    );
                }
                self.recipe = Some(recipe);
            }
            DataState::Error(message) => {
                self.loading = false;
                self.dialog_queue.append_error_message("Error", message);
            }
        }
    }
}
