//! State holder for the recipe list screen
//!
//! Holds the query text, selected category, current page, loaded recipes,
//! loading flag and error dialogs. Query, page, list position and category
//! are mirrored into a `StateStore` snapshot on every change so a restart
//! can restore the list instead of searching again.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, info};

use crate::cache::StateStore;
use crate::data::{DataState, FoodCategory, Recipe, RECIPE_PAGINATION_PAGE_SIZE};
use crate::interactors::{DataStateReceiver, RestoreRecipes, SearchRecipes};

use super::DialogQueue;

/// Snapshot key for the list screen
pub const STATE_KEY_RECIPE_LIST: &str = "recipe_list";

/// User actions on the list screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeListEvent {
    /// Start over from page 1 with the current query
    NewSearch,
    /// Append the next page once the user reaches the end of the list
    NextPage,
    /// Rebuild the list from the cache after a restart
    RestoreState,
}

/// What survives a restart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeListSnapshot {
    pub page: u32,
    pub query: String,
    pub list_position: usize,
    pub selected_category: Option<FoodCategory>,
}

impl Default for RecipeListSnapshot {
    fn default() -> Self {
        Self {
            page: 1,
            query: String::new(),
            list_position: 0,
            selected_category: None,
        }
    }
}

/// How results of the in-flight use case land in the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadMode {
    Replace,
    Append,
}

struct PendingLoad {
    mode: LoadMode,
    receiver: DataStateReceiver<Vec<Recipe>>,
}

pub struct RecipeListState {
    recipes: Vec<Recipe>,
    query: String,
    selected_category: Option<FoodCategory>,
    /// Highlighted chip in the category bar
    pub category_scroll_position: usize,
    loading: bool,
    page: u32,
    list_position: usize,
    dialog_queue: DialogQueue,
    network_available: bool,
    search_recipes: SearchRecipes,
    restore_recipes: RestoreRecipes,
    state_store: Option<StateStore>,
    pending: Option<PendingLoad>,
}

impl RecipeListState {
    /// Creates the holder, restoring query, page, position and category
    /// from the last snapshot when one exists. No use case runs until
    /// `start` or `on_trigger_event` is called.
    pub fn new(
        search_recipes: SearchRecipes,
        restore_recipes: RestoreRecipes,
        state_store: Option<StateStore>,
        network_available: bool,
    ) -> Self {
        let snapshot = state_store
            .as_ref()
            .and_then(|store| store.read::<RecipeListSnapshot>(STATE_KEY_RECIPE_LIST))
            .map(|saved| saved.data)
            .unwrap_or_default();

        Self {
            recipes: Vec::new(),
            category_scroll_position: snapshot
                .selected_category
                .map(|category| category.index())
                .unwrap_or(0),
            query: snapshot.query,
            selected_category: snapshot.selected_category,
            loading: false,
            page: snapshot.page.max(1),
            list_position: snapshot.list_position,
            dialog_queue: DialogQueue::new(),
            network_available,
            search_recipes,
            restore_recipes,
            state_store,
            pending: None,
        }
    }

    /// Kicks off the first load: a restore when the user had scrolled into
    /// a previous list, otherwise a fresh search.
    pub fn start(&mut self) {
        if self.list_position != 0 {
            self.on_trigger_event(RecipeListEvent::RestoreState);
        } else {
            self.on_trigger_event(RecipeListEvent::NewSearch);
        }
    }

    pub fn on_trigger_event(&mut self, event: RecipeListEvent) {
        match event {
            RecipeListEvent::NewSearch => self.new_search(),
            RecipeListEvent::NextPage => self.next_page(),
            RecipeListEvent::RestoreState => self.restore_state(),
        }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selected_category(&self) -> Option<FoodCategory> {
        self.selected_category
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn list_position(&self) -> usize {
        self.list_position
    }

    pub fn network_available(&self) -> bool {
        self.network_available
    }

    pub fn dialog_queue(&self) -> &DialogQueue {
        &self.dialog_queue
    }

    pub fn dialog_queue_mut(&mut self) -> &mut DialogQueue {
        &mut self.dialog_queue
    }

    /// The recipe under the list cursor
    pub fn selected_recipe(&self) -> Option<&Recipe> {
        self.recipes.get(self.list_position)
    }

    /// True when the cursor sits on the last row of the pages loaded so far
    pub fn should_load_next_page(&self) -> bool {
        !self.loading && self.list_position + 1 >= self.page as usize * page_size()
    }

    pub fn on_query_changed(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.persist();
    }

    /// Selects the chip matching `category` and searches for its value.
    ///
    /// Text that names no category clears the chip but still becomes the query.
    pub fn on_selected_category_changed(&mut self, category: &str) {
        self.selected_category = FoodCategory::from_value(category);
        if let Some(selected) = self.selected_category {
            self.category_scroll_position = selected.index();
        }
        self.on_query_changed(category);
    }

    pub fn on_change_scroll_position(&mut self, position: usize) {
        self.list_position = position;
        self.persist();
    }

    pub fn on_change_category_scroll_position(&mut self, position: usize) {
        self.category_scroll_position = position.min(FoodCategory::ALL.len() - 1);
    }

    fn new_search(&mut self) {
        info!(query = %self.query, page = self.page, "new search");
        self.reset_search_state();

        let receiver = self
            .search_recipes
            .execute(self.page, &self.query, self.network_available);
        self.pending = Some(PendingLoad {
            mode: LoadMode::Replace,
            receiver,
        });
    }

    fn next_page(&mut self) {
        // The position check keeps repeated events at the list end from
        // requesting the same page twice.
        if !self.should_load_next_page() {
            return;
        }

        self.page += 1;
        self.persist();
        debug!(page = self.page, "next page triggered");

        if self.page > 1 {
            let receiver = self
                .search_recipes
                .execute(self.page, &self.query, self.network_available);
            self.pending = Some(PendingLoad {
                mode: LoadMode::Append,
                receiver,
            });
        }
    }

    fn restore_state(&mut self) {
        info!(query = %self.query, page = self.page, "restoring recipe list");
        let receiver = self.restore_recipes.execute(self.page, &self.query);
        self.pending = Some(PendingLoad {
            mode: LoadMode::Replace,
            receiver,
        });
    }

    fn reset_search_state(&mut self) {
        self.recipes.clear();
        self.page = 1;
        self.list_position = 0;
        let category_matches_query = self
            .selected_category
            .is_some_and(|category| category.value() == self.query);
        if !category_matches_query {
            self.selected_category = None;
        }
        self.persist();
    }

    /// Applies every emission that has already arrived, without waiting
    pub fn poll(&mut self) {
        let Some(mut pending) = self.pending.take() else {
            return;
        };

        loop {
            match pending.receiver.try_recv() {
                Ok(state) => self.apply(pending.mode, state),
                Err(TryRecvError::Empty) => {
                    self.pending = Some(pending);
                    return;
                }
                Err(TryRecvError::Disconnected) => return,
            }
        }
    }

    /// Waits for the in-flight use case to finish and applies its emissions
    pub async fn settle(&mut self) {
        let Some(mut pending) = self.pending.take() else {
            return;
        };

        while let Some(state) = pending.receiver.recv().await {
            self.apply(pending.mode, state);
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn apply(&mut self, mode: LoadMode, state: DataState<Vec<Recipe>>) {
        match state {
            DataState::Loading => self.loading = true,
            DataState::Success(recipes) => {
                self.loading = false;
                match mode {
                    LoadMode::Replace => self.recipes = recipes,
                    LoadMode::Append => self.recipes.extend(recipes),
                }
                if self.list_position >= self.recipes.len() {
                    self.list_position = self.recipes.len().saturating_sub(1);
                }
            }
            DataState::Error(message) => {
                self.loading = false;
                self.dialog_queue.append_error_message("Error", message);
            }
        }
    }

    fn snapshot(&self) -> RecipeListSnapshot {
        RecipeListSnapshot {
            page: self.page,
            query: self.query.clone(),
            list_position: self.list_position,
            selected_category: self.selected_category,
        }
    }

    fn persist(&self) {
        if let Some(store) = &self.state_store {
            store.save(STATE_KEY_RECIPE_LIST, &self.snapshot());
        }
    }
}

fn page_size() -> usize {
    RECIPE_PAGINATION_PAGE_SIZE as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::RecipeDao;
    use crate::data::RecipeService;
    use chrono::DateTime;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn recipe(id: i32, title: &str) -> Recipe {
        Recipe {
            id,
            title: title.to_string(),
            publisher: "test".to_string(),
            featured_image: String::new(),
            rating: 80,
            source_url: String::new(),
            ingredients: vec!["water".to_string()],
            date_added: DateTime::from_timestamp(1_000, 0).unwrap(),
            date_updated: DateTime::from_timestamp(1_000 + id as i64, 0).unwrap(),
        }
    }

    fn seeded_dao(count: i32) -> RecipeDao {
        let dao = RecipeDao::in_memory().unwrap();
        let recipes: Vec<Recipe> = (1..=count).map(|i| recipe(i, &format!("Soup {}", i))).collect();
        dao.insert_recipes(&recipes).unwrap();
        dao
    }

    fn offline_state(dao: RecipeDao, store: Option<StateStore>) -> RecipeListState {
        let service = RecipeService::new().with_base_url("http://127.0.0.1:9");
        RecipeListState::new(
            SearchRecipes::new(dao.clone(), service),
            RestoreRecipes::new(dao),
            store,
            false,
        )
    }

    #[test]
    fn test_initial_state_without_snapshot() {
        let state = offline_state(seeded_dao(0), None);

        assert!(state.recipes().is_empty());
        assert_eq!(state.query(), "");
        assert_eq!(state.page(), 1);
        assert_eq!(state.list_position(), 0);
        assert!(!state.loading());
        assert!(!state.has_pending());
    }

    #[tokio::test]
    async fn test_new_search_replaces_list_with_first_page() {
        let mut state = offline_state(seeded_dao(45), None);

        state.on_trigger_event(RecipeListEvent::NewSearch);
        state.settle().await;

        assert_eq!(state.recipes().len(), 30);
        assert_eq!(state.recipes()[0].id, 45);
        assert_eq!(state.page(), 1);
        assert!(!state.loading());
    }

    #[tokio::test]
    async fn test_next_page_is_ignored_before_end_of_list() {
        let mut state = offline_state(seeded_dao(45), None);
        state.on_trigger_event(RecipeListEvent::NewSearch);
        state.settle().await;

        state.on_change_scroll_position(10);
        state.on_trigger_event(RecipeListEvent::NextPage);

        assert_eq!(state.page(), 1);
        assert!(!state.has_pending());
    }

    #[tokio::test]
    async fn test_next_page_appends_second_page() {
        let mut state = offline_state(seeded_dao(45), None);
        state.on_trigger_event(RecipeListEvent::NewSearch);
        state.settle().await;

        state.on_change_scroll_position(29);
        state.on_trigger_event(RecipeListEvent::NextPage);
        state.settle().await;

        assert_eq!(state.page(), 2);
        assert_eq!(state.recipes().len(), 45);
        assert_eq!(state.recipes()[30].id, 15);

        // The short second page means there is nothing left to fetch
        state.on_change_scroll_position(44);
        assert!(!state.should_load_next_page());
    }

    #[tokio::test]
    async fn test_new_search_resets_page_and_position() {
        let mut state = offline_state(seeded_dao(45), None);
        state.on_trigger_event(RecipeListEvent::NewSearch);
        state.settle().await;
        state.on_change_scroll_position(29);
        state.on_trigger_event(RecipeListEvent::NextPage);
        state.settle().await;

        state.on_query_changed("Soup 1");
        state.on_trigger_event(RecipeListEvent::NewSearch);
        state.settle().await;

        assert_eq!(state.page(), 1);
        assert_eq!(state.list_position(), 0);
        // "Soup 1", "Soup 10".."Soup 19"
        assert_eq!(state.recipes().len(), 11);
    }

    #[tokio::test]
    async fn test_category_change_sets_query_and_survives_search() {
        let mut state = offline_state(seeded_dao(3), None);

        state.on_selected_category_changed("Soup");
        state.on_trigger_event(RecipeListEvent::NewSearch);
        state.settle().await;

        assert_eq!(state.query(), "Soup");
        assert_eq!(state.selected_category(), Some(FoodCategory::Soup));
        assert_eq!(state.category_scroll_position, FoodCategory::Soup.index());
        assert_eq!(state.recipes().len(), 3);
    }

    #[tokio::test]
    async fn test_editing_query_away_from_category_clears_it() {
        let mut state = offline_state(seeded_dao(3), None);
        state.on_selected_category_changed("Soup");

        state.on_query_changed("Soup 2");
        state.on_trigger_event(RecipeListEvent::NewSearch);
        state.settle().await;

        assert_eq!(state.selected_category(), None);
        assert_eq!(state.recipes().len(), 1);
    }

    #[tokio::test]
    async fn test_search_error_is_queued_as_dialog() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let dao = seeded_dao(0);
        let service = RecipeService::new().with_base_url(mock_server.uri());
        let mut state = RecipeListState::new(
            SearchRecipes::new(dao.clone(), service),
            RestoreRecipes::new(dao),
            None,
            true,
        );

        state.on_trigger_event(RecipeListEvent::NewSearch);
        state.settle().await;

        assert!(!state.loading());
        assert!(state.recipes().is_empty());
        let dialog = state.dialog_queue().head().expect("error dialog queued");
        assert_eq!(dialog.title, "Error");
        assert!(dialog.description.contains("500"));
    }

    #[tokio::test]
    async fn test_snapshot_is_saved_and_restored() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = StateStore::with_dir(temp_dir.path().to_path_buf());
        let dao = seeded_dao(70);

        {
            let mut state = offline_state(dao.clone(), Some(store.clone()));
            state.on_trigger_event(RecipeListEvent::NewSearch);
            state.settle().await;
            state.on_change_scroll_position(29);
            state.on_trigger_event(RecipeListEvent::NextPage);
            state.settle().await;
            state.on_change_scroll_position(35);
        }

        let mut restored = offline_state(dao, Some(store));
        assert_eq!(restored.page(), 2);
        assert_eq!(restored.list_position(), 35);

        restored.start();
        restored.settle().await;

        assert_eq!(restored.recipes().len(), 60);
        assert_eq!(restored.list_position(), 35);
        assert_eq!(restored.selected_recipe().map(|r| r.id), Some(35));
    }

    #[tokio::test]
    async fn test_poll_applies_emissions_without_blocking() {
        let mut state = offline_state(seeded_dao(5), None);
        state.on_trigger_event(RecipeListEvent::NewSearch);

        for _ in 0..100 {
            state.poll();
            if !state.has_pending() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        assert!(!state.has_pending());
        assert_eq!(state.recipes().len(), 5);
        assert!(!state.loading());
    }
}
