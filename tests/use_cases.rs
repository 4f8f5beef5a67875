//! Integration tests for the recipe use cases
//!
//! Runs search, restore and get-by-id against a mock recipe API and an
//! in-memory cache.

use recipe_search::cache::RecipeDao;
use recipe_search::data::{DataState, Recipe, RecipeDto, RecipeService};
use recipe_search::interactors::{
    DataStateReceiver, GetRecipe, RestoreRecipes, SearchRecipes, RECIPE_NOT_FOUND,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Collects every emission until the use case's task finishes
async fn collect<T>(mut rx: DataStateReceiver<T>) -> Vec<DataState<T>> {
    let mut states = Vec::new();
    while let Some(state) = rx.recv().await {
        states.push(state);
    }
    states
}

fn recipe_json(pk: i32, title: &str, updated: i64) -> serde_json::Value {
    json!({
        "pk": pk,
        "title": title,
        "publisher": "mitch",
        "featured_image": "https://example.com/image.png",
        "rating": 90,
        "source_url": "https://example.com/recipe",
        "ingredients": ["chicken", "salt"],
        "long_date_added": 1_606_348_709,
        "long_date_updated": updated
    })
}

async fn mock_api() -> (MockServer, RecipeService) {
    let server = MockServer::start().await;
    let service = RecipeService::new()
        .with_base_url(server.uri())
        .with_token("test-token");
    (server, service)
}

fn titles(recipes: &[Recipe]) -> Vec<&str> {
    recipes.iter().map(|r| r.title.as_str()).collect()
}

#[tokio::test]
async fn test_search_emits_loading_then_cached_results() {
    let (server, service) = mock_api().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "1"))
        .and(query_param("query", "chicken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "results": [
                recipe_json(1, "Chicken Soup", 100),
                recipe_json(2, "Chicken Curry", 200)
            ]
        })))
        .mount(&server)
        .await;

    let dao = RecipeDao::in_memory().unwrap();
    let search = SearchRecipes::new(dao.clone(), service);

    let states = collect(search.execute(1, "chicken", true)).await;

    assert_eq!(states.len(), 2);
    assert!(states[0].is_loading());
    let recipes = states[1].data().expect("expected success");
    assert_eq!(titles(recipes), vec!["Chicken Curry", "Chicken Soup"]);
    assert_eq!(dao.count().unwrap(), 2);
}

#[tokio::test]
async fn test_search_error_is_emitted_and_cache_untouched() {
    let (server, service) = mock_api().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let dao = RecipeDao::in_memory().unwrap();
    let search = SearchRecipes::new(dao.clone(), service);

    let states = collect(search.execute(1, "beef", true)).await;

    assert_eq!(states.len(), 2);
    assert!(states[0].is_loading());
    assert!(states[1].error().is_some_and(|e| e.contains("400")));
    assert_eq!(dao.count().unwrap(), 0);
}

#[tokio::test]
async fn test_search_offline_reads_cache_only() {
    let (server, service) = mock_api().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let dao = RecipeDao::in_memory().unwrap();
    let search = SearchRecipes::new(dao, service);

    let states = collect(search.execute(1, "", false)).await;

    assert!(states[1].data().is_some_and(|recipes| recipes.is_empty()));
}

#[tokio::test]
async fn test_restore_returns_every_page_up_to_current() {
    let (server, service) = mock_api().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "results": [
                recipe_json(1, "Pork Roast", 300),
                recipe_json(2, "Pork Chop", 200),
                recipe_json(3, "Beef Stew", 100)
            ]
        })))
        .mount(&server)
        .await;

    let dao = RecipeDao::in_memory().unwrap();
    let search = SearchRecipes::new(dao.clone(), service);
    collect(search.execute(1, "pork", true)).await;

    let restore = RestoreRecipes::new(dao);
    let states = collect(restore.execute(1, "pork")).await;

    assert!(states[0].is_loading());
    let recipes = states[1].data().expect("expected success");
    assert_eq!(titles(recipes), vec!["Pork Roast", "Pork Chop"]);
}

#[tokio::test]
async fn test_get_recipe_prefers_cache() {
    let (server, service) = mock_api().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let dao = RecipeDao::in_memory().unwrap();
    let seeded = serde_json::from_value::<RecipeDto>(recipe_json(7, "Cached Pie", 100))
        .unwrap()
        .into_domain()
        .unwrap();
    dao.insert_recipe(&seeded).unwrap();

    let get = GetRecipe::new(dao, service);
    let states = collect(get.execute(7, true)).await;

    assert_eq!(states[1].data().map(|r| r.title.as_str()), Some("Cached Pie"));
}

#[tokio::test]
async fn test_get_recipe_falls_back_to_network_and_caches() {
    let (server, service) = mock_api().await;
    Mock::given(method("GET"))
        .and(path("/get"))
        .and(query_param("id", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recipe_json(42, "Fetched Tart", 100)))
        .expect(1)
        .mount(&server)
        .await;

    let dao = RecipeDao::in_memory().unwrap();
    let get = GetRecipe::new(dao.clone(), service);

    let states = collect(get.execute(42, true)).await;

    assert!(states[0].is_loading());
    assert_eq!(states[1].data().map(|r| r.id), Some(42));
    assert!(dao.get_recipe_by_id(42).unwrap().is_some());
}

#[tokio::test]
async fn test_get_recipe_offline_miss_reports_not_found() {
    let dao = RecipeDao::in_memory().unwrap();
    let get = GetRecipe::new(dao, RecipeService::new());

    let states = collect(get.execute(99, false)).await;

    assert_eq!(states[1].error(), Some(RECIPE_NOT_FOUND));
}
