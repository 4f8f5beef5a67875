//! Application state management for Recipe Search
//!
//! This module contains the main application state, routing keyboard input to
//! the list and detail state holders and tracking which screen is shown.

use crossterm::event::{KeyCode, KeyEvent};
use tracing::info;

use crate::cache::{CacheError, RecipeDao, StateStore};
use crate::cli::StartupConfig;
use crate::data::{FoodCategory, RecipeService};
use crate::interactors::{GetRecipe, RestoreRecipes, SearchRecipes};
use crate::presentation::{
    DialogQueue, RecipeDetailState, RecipeEvent, RecipeListEvent, RecipeListState,
    STATE_KEY_RECIPE_DETAIL, STATE_KEY_RECIPE_LIST,
};

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Search results
    RecipeList,
    /// Detail view for a specific recipe
    RecipeDetail(i32),
}

/// Whether keystrokes edit the query or drive navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    EditingQuery,
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Current input mode on the list screen
    pub input_mode: InputMode,
    /// State behind the list screen
    pub recipe_list: RecipeListState,
    /// State behind the detail screen
    pub recipe_detail: RecipeDetailState,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Scroll offset for recipe detail view
    pub detail_scroll_offset: u16,
}

impl App {
    /// Creates an App around the given cache and API client
    pub fn new(
        recipe_dao: RecipeDao,
        recipe_service: RecipeService,
        state_store: Option<StateStore>,
        network_available: bool,
    ) -> Self {
        let recipe_list = RecipeListState::new(
            SearchRecipes::new(recipe_dao.clone(), recipe_service.clone()),
            RestoreRecipes::new(recipe_dao.clone()),
            state_store.clone(),
            network_available,
        );
        let recipe_detail = RecipeDetailState::new(
            GetRecipe::new(recipe_dao, recipe_service),
            state_store,
            network_available,
        );

        Self {
            state: AppState::RecipeList,
            input_mode: InputMode::Normal,
            recipe_list,
            recipe_detail,
            should_quit: false,
            show_help: false,
            detail_scroll_offset: 0,
        }
    }

    /// Opens the cache and saved state under the configured data directory
    /// and builds the API client from the startup configuration.
    pub fn from_config(config: &StartupConfig) -> Result<Self, CacheError> {
        let data_dir = config.resolve_data_dir();

        let recipe_dao = match &data_dir {
            Some(dir) => RecipeDao::open(&dir.join("recipes.db"))?,
            None => RecipeDao::in_memory()?,
        };
        if config.clear_cache {
            let removed = recipe_dao.delete_all_recipes()?;
            info!(removed, "cleared recipe cache");
        }

        let mut recipe_service = RecipeService::new().with_base_url(&config.base_url);
        if let Some(token) = &config.token {
            recipe_service = recipe_service.with_token(token);
        }

        let state_store = data_dir.map(|dir| StateStore::with_dir(dir.join("state")));
        if let (true, Some(store)) = (config.clear_cache, &state_store) {
            store.clear(STATE_KEY_RECIPE_LIST)?;
            store.clear(STATE_KEY_RECIPE_DETAIL)?;
        }

        Ok(Self::new(
            recipe_dao,
            recipe_service,
            state_store,
            config.network_available,
        ))
    }

    /// Runs the first loads.
    ///
    /// A query or category from the command line starts a fresh search.
    /// Otherwise the list is restored from the last session, and the recipe
    /// that was open is reopened.
    pub fn start(&mut self, config: &StartupConfig) {
        if let Some(category) = config.initial_category {
            self.recipe_list.on_selected_category_changed(category.value());
            self.recipe_list.on_trigger_event(RecipeListEvent::NewSearch);
            return;
        }
        if let Some(query) = &config.initial_query {
            self.recipe_list.on_query_changed(query.clone());
            self.recipe_list.on_trigger_event(RecipeListEvent::NewSearch);
            return;
        }

        self.recipe_list.start();
        if let Some(recipe_id) = self.recipe_detail.saved_recipe_id() {
            self.open_recipe(recipe_id);
        }
    }

    /// Applies any use-case emissions that have arrived since the last tick
    pub fn poll(&mut self) {
        self.recipe_list.poll();
        self.recipe_detail.poll();
    }

    /// Dialog queue of the screen currently shown
    pub fn active_dialogs(&self) -> &DialogQueue {
        match self.state {
            AppState::RecipeList => self.recipe_list.dialog_queue(),
            AppState::RecipeDetail(_) => self.recipe_detail.dialog_queue(),
        }
    }

    fn active_dialogs_mut(&mut self) -> &mut DialogQueue {
        match self.state {
            AppState::RecipeList => self.recipe_list.dialog_queue_mut(),
            AppState::RecipeDetail(_) => self.recipe_detail.dialog_queue_mut(),
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q` (or `Esc` in RecipeList): Quit the application
    /// - `Up`/`k`, `Down`/`j`: Move selection; reaching the end loads the next page
    /// - `n`: Jump to the last loaded recipe and load the next page
    /// - `/`: Edit the query; `Enter` searches, `Esc` stops editing
    /// - `Tab`/`Shift-Tab`: Select the next/previous food category and search it
    /// - `r`: Run the current search again
    /// - `Enter`: Open the selected recipe
    /// - `Esc` (in RecipeDetail): Go back to the list
    /// - `Enter`/`Esc` with a dialog open: Dismiss it
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        // An error dialog blocks the screen behind it
        if !self.active_dialogs().is_empty() {
            if matches!(
                key_event.code,
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')
            ) {
                self.active_dialogs_mut().remove_head_message();
            }
            return;
        }

        match self.state {
            AppState::RecipeList => match self.input_mode {
                InputMode::EditingQuery => self.handle_query_key(key_event),
                InputMode::Normal => self.handle_list_key(key_event),
            },
            AppState::RecipeDetail(_) => match key_event.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                }
                KeyCode::Esc | KeyCode::Backspace => {
                    self.close_recipe();
                }
                KeyCode::Char('j') | KeyCode::Down => {
                    self.scroll_down();
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.scroll_up();
                }
                KeyCode::Char('g') => {
                    self.detail_scroll_offset = 0;
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
        }
    }

    fn handle_list_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection_up();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection_down();
            }
            KeyCode::Char('n') => {
                let last = self.recipe_list.recipes().len().saturating_sub(1);
                self.recipe_list.on_change_scroll_position(last);
                self.recipe_list.on_trigger_event(RecipeListEvent::NextPage);
            }
            KeyCode::Enter => {
                if let Some(recipe_id) = self.recipe_list.selected_recipe().map(|r| r.id) {
                    self.open_recipe(recipe_id);
                }
            }
            KeyCode::Char('/') => {
                self.input_mode = InputMode::EditingQuery;
            }
            KeyCode::Tab => {
                self.select_category_offset(1);
            }
            KeyCode::BackTab => {
                self.select_category_offset(FoodCategory::ALL.len() - 1);
            }
            KeyCode::Char('r') => {
                self.recipe_list.on_trigger_event(RecipeListEvent::NewSearch);
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    fn handle_query_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                self.recipe_list.on_trigger_event(RecipeListEvent::NewSearch);
            }
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                let mut query = self.recipe_list.query().to_string();
                query.pop();
                self.recipe_list.on_query_changed(query);
            }
            KeyCode::Char(c) => {
                let mut query = self.recipe_list.query().to_string();
                query.push(c);
                self.recipe_list.on_query_changed(query);
            }
            _ => {}
        }
    }

    /// Moves the category cursor by `offset` chips (wrapping) and searches it
    fn select_category_offset(&mut self, offset: usize) {
        let count = FoodCategory::ALL.len();
        let next = match self.recipe_list.selected_category() {
            Some(category) => (category.index() + offset) % count,
            None if offset == 1 => 0,
            None => count - 1,
        };
        let category = FoodCategory::ALL[next];

        self.recipe_list.on_change_category_scroll_position(next);
        self.recipe_list.on_selected_category_changed(category.value());
        self.recipe_list.on_trigger_event(RecipeListEvent::NewSearch);
    }

    /// Moves the selection up in the list, stopping at the top
    fn move_selection_up(&mut self) {
        let position = self.recipe_list.list_position();
        if position > 0 {
            self.recipe_list.on_change_scroll_position(position - 1);
        }
    }

    /// Moves the selection down in the list, stopping at the last recipe and
    /// requesting the next page once the end of the loaded pages is reached
    fn move_selection_down(&mut self) {
        let count = self.recipe_list.recipes().len();
        if count == 0 {
            return;
        }
        let position = self.recipe_list.list_position();
        if position + 1 < count {
            self.recipe_list.on_change_scroll_position(position + 1);
        }
        if self.recipe_list.should_load_next_page() {
            self.recipe_list.on_trigger_event(RecipeListEvent::NextPage);
        }
    }

    fn open_recipe(&mut self, recipe_id: i32) {
        self.recipe_detail.reset();
        self.detail_scroll_offset = 0;
        self.recipe_detail
            .on_trigger_event(RecipeEvent::GetRecipe(recipe_id));
        self.state = AppState::RecipeDetail(recipe_id);
    }

    fn close_recipe(&mut self) {
        self.recipe_detail.reset();
        self.detail_scroll_offset = 0;
        self.state = AppState::RecipeList;
    }

    /// Scrolls up in the detail view, stopping at 0
    pub fn scroll_up(&mut self) {
        self.detail_scroll_offset = self.detail_scroll_offset.saturating_sub(1);
    }

    /// Scrolls down in the detail view; the renderer clamps to the content
    pub fn scroll_down(&mut self) {
        const MAX_SCROLL: u16 = 200;
        if self.detail_scroll_offset < MAX_SCROLL {
            self.detail_scroll_offset += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Recipe;
    use chrono::DateTime;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    /// Helper to create a KeyEvent for testing
    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn recipe(id: i32, title: &str) -> Recipe {
        Recipe {
            id,
            title: title.to_string(),
            publisher: "test".to_string(),
            featured_image: String::new(),
            rating: 70,
            source_url: String::new(),
            ingredients: vec!["salt".to_string()],
            date_added: DateTime::from_timestamp(0, 0).unwrap(),
            date_updated: DateTime::from_timestamp(i64::from(id), 0).unwrap(),
        }
    }

    /// Offline app over an in-memory cache holding `count` recipes
    fn offline_app(count: i32) -> App {
        let dao = RecipeDao::in_memory().unwrap();
        let recipes: Vec<Recipe> = (1..=count).map(|i| recipe(i, &format!("Chicken {}", i))).collect();
        dao.insert_recipes(&recipes).unwrap();
        let service = RecipeService::new().with_base_url("http://127.0.0.1:9");
        App::new(dao, service, None, false)
    }

    async fn loaded_app(count: i32) -> App {
        let mut app = offline_app(count);
        app.start(&StartupConfig::default());
        app.recipe_list.settle().await;
        app
    }

    #[test]
    fn test_initial_state_is_recipe_list() {
        let app = offline_app(0);
        assert_eq!(app.state, AppState::RecipeList);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(!app.should_quit);
        assert!(!app.show_help);
    }

    #[test]
    fn test_q_quits_from_recipe_list() {
        let mut app = offline_app(0);
        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_help_toggles_and_swallows_keys() {
        let mut app = offline_app(0);
        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(app.show_help);

        app.handle_key(key_event(KeyCode::Char('j')));
        assert!(app.show_help);

        app.handle_key(key_event(KeyCode::Esc));
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_navigation_moves_and_stops_at_edges() {
        let mut app = loaded_app(3).await;
        assert_eq!(app.recipe_list.list_position(), 0);

        app.handle_key(key_event(KeyCode::Up));
        assert_eq!(app.recipe_list.list_position(), 0);

        app.handle_key(key_event(KeyCode::Down));
        app.handle_key(key_event(KeyCode::Char('j')));
        app.handle_key(key_event(KeyCode::Down));
        assert_eq!(app.recipe_list.list_position(), 2);

        app.handle_key(key_event(KeyCode::Char('k')));
        assert_eq!(app.recipe_list.list_position(), 1);
    }

    #[tokio::test]
    async fn test_reaching_end_of_page_loads_next_page() {
        let mut app = loaded_app(40).await;
        assert_eq!(app.recipe_list.recipes().len(), 30);

        for _ in 0..29 {
            app.handle_key(key_event(KeyCode::Down));
        }
        app.recipe_list.settle().await;

        assert_eq!(app.recipe_list.page(), 2);
        assert_eq!(app.recipe_list.recipes().len(), 40);
    }

    #[tokio::test]
    async fn test_n_jumps_to_end_and_loads_next_page() {
        let mut app = loaded_app(35).await;

        app.handle_key(key_event(KeyCode::Char('n')));
        app.recipe_list.settle().await;

        assert_eq!(app.recipe_list.recipes().len(), 35);
        assert_eq!(app.recipe_list.list_position(), 29);
    }

    #[tokio::test]
    async fn test_query_editing_then_enter_searches() {
        let mut app = loaded_app(12).await;

        app.handle_key(key_event(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::EditingQuery);

        for c in "chicken 11q".chars() {
            app.handle_key(key_event(KeyCode::Char(c)));
        }
        app.handle_key(key_event(KeyCode::Backspace));
        // 'q' is text while editing, not quit
        assert!(!app.should_quit);
        assert_eq!(app.recipe_list.query(), "chicken 11");

        app.handle_key(key_event(KeyCode::Enter));
        app.recipe_list.settle().await;

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.recipe_list.recipes().len(), 1);
        assert_eq!(app.recipe_list.recipes()[0].id, 11);
    }

    #[tokio::test]
    async fn test_tab_cycles_categories_and_searches() {
        let mut app = loaded_app(2).await;

        app.handle_key(key_event(KeyCode::Tab));
        app.recipe_list.settle().await;
        assert_eq!(app.recipe_list.selected_category(), Some(FoodCategory::Chicken));
        assert_eq!(app.recipe_list.query(), "Chicken");
        assert_eq!(app.recipe_list.recipes().len(), 2);

        app.handle_key(key_event(KeyCode::Tab));
        app.recipe_list.settle().await;
        assert_eq!(app.recipe_list.selected_category(), Some(FoodCategory::Beef));
        assert!(app.recipe_list.recipes().is_empty());

        app.handle_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        app.recipe_list.settle().await;
        assert_eq!(app.recipe_list.selected_category(), Some(FoodCategory::Chicken));
    }

    #[tokio::test]
    async fn test_enter_opens_detail_and_esc_returns() {
        let mut app = loaded_app(3).await;
        app.handle_key(key_event(KeyCode::Down));

        app.handle_key(key_event(KeyCode::Enter));
        assert_eq!(app.state, AppState::RecipeDetail(2));
        app.recipe_detail.settle().await;
        assert_eq!(app.recipe_detail.recipe().map(|r| r.id), Some(2));

        app.handle_key(key_event(KeyCode::Esc));
        assert_eq!(app.state, AppState::RecipeList);
        assert!(app.recipe_detail.recipe().is_none());
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_dialog_blocks_keys_until_dismissed() {
        let mut app = loaded_app(1).await;
        app.recipe_list
            .dialog_queue_mut()
            .append_error_message("Error", "network down");

        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(!app.should_quit);
        assert!(!app.active_dialogs().is_empty());

        app.handle_key(key_event(KeyCode::Enter));
        assert!(app.active_dialogs().is_empty());

        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_start_with_category_searches_it() {
        let mut app = offline_app(4);
        let config = StartupConfig {
            initial_category: Some(FoodCategory::Chicken),
            network_available: false,
            ..Default::default()
        };

        app.start(&config);
        app.recipe_list.settle().await;

        assert_eq!(app.recipe_list.query(), "Chicken");
        assert_eq!(app.recipe_list.recipes().len(), 4);
    }

    #[test]
    fn test_detail_scroll_is_bounded() {
        let mut app = offline_app(0);
        app.scroll_up();
        assert_eq!(app.detail_scroll_offset, 0);
        app.scroll_down();
        app.scroll_down();
        assert_eq!(app.detail_scroll_offset, 2);
    }

    #[test]
    fn test_from_config_clear_cache_empties_store_and_snapshots() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let dao = RecipeDao::open(&temp_dir.path().join("recipes.db")).unwrap();
        dao.insert_recipe(&recipe(1, "Leftover")).unwrap();
        let store = StateStore::with_dir(temp_dir.path().join("state"));
        store.write(STATE_KEY_RECIPE_DETAIL, &1).unwrap();

        let config = StartupConfig {
            data_dir: Some(temp_dir.path().to_path_buf()),
            network_available: false,
            clear_cache: true,
            ..Default::default()
        };
        let _app = App::from_config(&config).unwrap();

        assert_eq!(dao.count().unwrap(), 0);
        assert!(store.read::<i32>(STATE_KEY_RECIPE_DETAIL).is_none());
    }
}
