use std::fs;

use cube::{Application, Dispatch};
use cube_db::{select, Blueprint, Executor, Filter, Value};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn project(config: &str, routes: Option<&str>) -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    fs::write(dir.path().join("cube.toml"), config).unwrap();
    if let Some(routes) = routes {
        fs::write(dir.path().join("routes.toml"), routes).unwrap();
    }
    dir
}

const ROUTES: &str = r#"
[[route]]
method = "GET"
path = "/users/new"
controller = "UserController@create"

[[route]]
method = "GET"
path = "/users/{id:int}"
controller = "UserController@show"
name = "users.show"

[[route]]
path = "/posts/{slug?}"
view = "posts.index"
"#;

#[test]
fn test_boot_and_resolve() {
    let dir = project("[app]\nname = \"blog\"", Some(ROUTES));
    let app = Application::boot(dir.path().join("cube.toml")).unwrap();

    assert_eq!(app.config().app.name, "blog");
    assert_eq!(app.router().len(), 3);

    let dispatch = app.resolve("GET", "/users/new");
    let m = dispatch.route_match().unwrap();
    assert_eq!(m.route.controller.to_string(), "UserController@create");

    let dispatch = app.resolve("GET", "/users/42");
    let m = dispatch.route_match().unwrap();
    assert_eq!(m.param("id"), Some("42"));

    let dispatch = app.resolve("PUT", "/posts");
    let m = dispatch.route_match().unwrap();
    assert_eq!(m.route.controller.to_string(), "view:posts.index");
    assert!(m.params.is_empty());

    assert!(matches!(app.resolve("GET", "/users/abc"), Dispatch::NotFound));
}

#[test]
fn test_router_frozen_after_first_dispatch() {
    let dir = project("", Some(ROUTES));
    let mut app = Application::boot(dir.path().join("cube.toml")).unwrap();

    assert!(app.resolve("GET", "/users/1").is_found());

    let late = cube_router::Route::get("/late", cube_router::ControllerRef::view("late")).unwrap();
    assert!(matches!(
        app.router_mut().add_route(late),
        Err(cube_router::RouteError::RegistryFrozen(_))
    ));
}

#[test]
fn test_case_insensitive_config() {
    let dir = project("[routing]\ncase_insensitive = true", Some(ROUTES));
    let app = Application::boot(dir.path().join("cube.toml")).unwrap();
    assert!(app.resolve("GET", "/USERS/7").is_found());
}

#[test]
fn test_custom_routes_file() {
    let dir = project("[routing]\nroutes_file = \"web.toml\"", None);
    fs::write(dir.path().join("web.toml"), ROUTES).unwrap();
    let app = Application::boot(dir.path().join("cube.toml")).unwrap();
    assert_eq!(app.router().len(), 3);
}

#[test]
fn test_missing_routes_file_gives_empty_router() {
    let dir = project("", None);
    let app = Application::boot(dir.path().join("cube.toml")).unwrap();
    assert!(app.router().is_empty());
}

#[test]
fn test_broken_route_table_fails_boot() {
    let dir = project("", Some("[[route]]\npath = \"/a/{b\"\nview = \"v\""));
    assert!(Application::boot(dir.path().join("cube.toml")).is_err());
}

#[test]
fn test_broken_config_fails_boot() {
    let dir = project("[routing\n", None);
    assert!(Application::boot(dir.path().join("cube.toml")).is_err());
}

#[tokio::test]
async fn test_connect_configured_database() {
    let dir = project(
        "[database]\nurl = \"sqlite::memory:\"\nmax_connections = 1",
        None,
    );
    let mut app = Application::boot(dir.path().join("cube.toml")).unwrap();
    // keep the test independent of a DATABASE_URL in the environment
    let config = app.config().clone().with_database_url(Some("sqlite::memory:".to_string()));
    app = Application::new(config, cube_router::Router::new());

    let db = app.connect_database().await.unwrap();
    db.create_table(&Blueprint::create("notes", |t| {
        t.increments("id");
        t.text("body");
    }))
    .await
    .unwrap();

    db.table("notes")
        .without_timestamps()
        .insert([("body", "hi")])
        .unwrap()
        .fulfil(&db)
        .await
        .unwrap();

    let rows = db
        .fetch_rows(&select("notes", ["body"]).where_("id", 1).statement())
        .await
        .unwrap();
    assert_eq!(rows[0].get("body"), Some(&Value::from("hi")));
}
