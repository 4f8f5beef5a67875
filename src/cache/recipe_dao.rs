//! SQLite-backed recipe cache
//!
//! Stores every recipe the API returns so lists can be re-read, paged and
//! searched without the network. Ingredients are stored as a JSON array so
//! the same column can be matched with `LIKE` during search.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use super::CacheError;
use crate::data::Recipe;

const SELECT_COLUMNS: &str = "SELECT id, title, publisher, featured_image, rating, source_url, \
     ingredients, date_added, date_updated FROM recipes";

/// Data access object for the `recipes` table
///
/// The connection sits behind `Arc<Mutex<_>>` so use cases running on
/// spawned tasks can share one handle.
#[derive(Debug, Clone)]
pub struct RecipeDao {
    conn: Arc<Mutex<Connection>>,
}

impl RecipeDao {
    /// Opens or creates the recipe database at the given path
    pub fn open(path: &Path) -> Result<Self, CacheError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "opened recipe cache");
        Self::from_connection(conn)
    }

    /// Creates an in-memory cache (useful for testing)
    pub fn in_memory() -> Result<Self, CacheError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, CacheError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS recipes (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                publisher TEXT NOT NULL,
                featured_image TEXT NOT NULL,
                rating INTEGER NOT NULL,
                source_url TEXT NOT NULL,
                ingredients TEXT NOT NULL,
                date_added INTEGER NOT NULL,
                date_updated INTEGER NOT NULL,
                date_cached INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_recipes_date_updated ON recipes(date_updated);",
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        self.conn.lock().map_err(|_| CacheError::Poisoned)
    }

    /// Inserts a recipe, replacing any cached row with the same id
    pub fn insert_recipe(&self, recipe: &Recipe) -> Result<(), CacheError> {
        let conn = self.lock()?;
        insert_row(&conn, recipe, Utc::now().timestamp())
    }

    /// Inserts many recipes in one transaction
    pub fn insert_recipes(&self, recipes: &[Recipe]) -> Result<(), CacheError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let now = Utc::now().timestamp();
        for recipe in recipes {
            insert_row(&tx, recipe, now)?;
        }
        tx.commit()?;
        debug!(count = recipes.len(), "cached recipes");
        Ok(())
    }

    /// Looks up one recipe by id
    pub fn get_recipe_by_id(&self, id: i32) -> Result<Option<Recipe>, CacheError> {
        let conn = self.lock()?;
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let row = conn
            .query_row(&sql, params![id], read_row)
            .optional()?;
        row.map(RecipeRow::into_recipe).transpose()
    }

    pub fn delete_recipe(&self, id: i32) -> Result<usize, CacheError> {
        let conn = self.lock()?;
        Ok(conn.execute("DELETE FROM recipes WHERE id = ?1", params![id])?)
    }

    pub fn delete_recipes(&self, ids: &[i32]) -> Result<usize, CacheError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut deleted = 0;
        for id in ids {
            deleted += tx.execute("DELETE FROM recipes WHERE id = ?1", params![id])?;
        }
        tx.commit()?;
        Ok(deleted)
    }

    pub fn delete_all_recipes(&self) -> Result<usize, CacheError> {
        let conn = self.lock()?;
        Ok(conn.execute("DELETE FROM recipes", [])?)
    }

    /// Number of cached recipes
    pub fn count(&self) -> Result<u64, CacheError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// One page of every cached recipe, most recently updated first
    pub fn get_all_recipes(&self, page: u32, page_size: u32) -> Result<Vec<Recipe>, CacheError> {
        let sql = format!(
            "{} ORDER BY date_updated DESC LIMIT ?1 OFFSET ?2",
            SELECT_COLUMNS
        );
        self.query_list(&sql, params![page_size, page_offset(page, page_size)])
    }

    /// One page of recipes whose title or ingredients contain `query`
    pub fn search_recipes(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Recipe>, CacheError> {
        let sql = format!(
            "{} WHERE title LIKE '%' || ?1 || '%' OR ingredients LIKE '%' || ?1 || '%' \
             ORDER BY date_updated DESC LIMIT ?2 OFFSET ?3",
            SELECT_COLUMNS
        );
        self.query_list(&sql, params![query, page_size, page_offset(page, page_size)])
    }

    /// Every cached recipe from page 1 through `page`
    pub fn restore_all_recipes(&self, page: u32, page_size: u32) -> Result<Vec<Recipe>, CacheError> {
        let sql = format!("{} ORDER BY date_updated DESC LIMIT ?1", SELECT_COLUMNS);
        self.query_list(&sql, params![restore_limit(page, page_size)])
    }

    /// Every matching recipe from page 1 through `page`
    pub fn restore_recipes(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Recipe>, CacheError> {
        let sql = format!(
            "{} WHERE title LIKE '%' || ?1 || '%' OR ingredients LIKE '%' || ?1 || '%' \
             ORDER BY date_updated DESC LIMIT ?2",
            SELECT_COLUMNS
        );
        self.query_list(&sql, params![query, restore_limit(page, page_size)])
    }

    fn query_list(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Recipe>, CacheError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, read_row)?;

        let mut recipes = Vec::new();
        for row in rows {
            recipes.push(row?.into_recipe()?);
        }
        Ok(recipes)
    }
}

/// Offset of the first row on a 1-based page; pages below 1 read page 1
fn page_offset(page: u32, page_size: u32) -> i64 {
    i64::from(page.max(1) - 1) * i64::from(page_size)
}

fn restore_limit(page: u32, page_size: u32) -> i64 {
    i64::from(page.max(1)) * i64::from(page_size)
}

fn insert_row(conn: &Connection, recipe: &Recipe, cached_at: i64) -> Result<(), CacheError> {
    let ingredients = serde_json::to_string(&recipe.ingredients)?;
    conn.execute(
        "INSERT OR REPLACE INTO recipes (id, title, publisher, featured_image, rating, \
         source_url, ingredients, date_added, date_updated, date_cached) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            recipe.id,
            recipe.title,
            recipe.publisher,
            recipe.featured_image,
            recipe.rating,
            recipe.source_url,
            ingredients,
            recipe.date_added.timestamp(),
            recipe.date_updated.timestamp(),
            cached_at,
        ],
    )?;
    Ok(())
}

/// Raw column values, decoded into a `Recipe` outside the rusqlite closure
struct RecipeRow {
    id: i32,
    title: String,
    publisher: String,
    featured_image: String,
    rating: i32,
    source_url: String,
    ingredients: String,
    date_added: i64,
    date_updated: i64,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RecipeRow> {
    Ok(RecipeRow {
        id: row.get(0)?,
        title: row.get(1)?,
        publisher: row.get(2)?,
        featured_image: row.get(3)?,
        rating: row.get(4)?,
        source_url: row.get(5)?,
        ingredients: row.get(6)?,
        date_added: row.get(7)?,
        date_updated: row.get(8)?,
    })
}

impl RecipeRow {
    fn into_recipe(self) -> Result<Recipe, CacheError> {
        Ok(Recipe {
            id: self.id,
            title: self.title,
            publisher: self.publisher,
            featured_image: self.featured_image,
            rating: self.rating,
            source_url: self.source_url,
            ingredients: serde_json::from_str(&self.ingredients)?,
            date_added: from_timestamp(self.date_added)?,
            date_updated: from_timestamp(self.date_updated)?,
        })
    }
}

fn from_timestamp(secs: i64) -> Result<DateTime<Utc>, CacheError> {
    DateTime::from_timestamp(secs, 0).ok_or(CacheError::InvalidTimestamp(secs))
}
