//! Permission wiring tests.
//!
//! These run without a database. The pool is created lazily and the guard
//! rejects anonymous mutations before body parsing or storage access, so
//! every request below must come back 403 no matter how broken the body is.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    routing::{post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use shelfmark_server::{
    api,
    config::{AppConfig, AuthConfig, DatabaseConfig, LoggingConfig, ServerConfig},
    repository::Repository,
    services::Services,
    AppState,
};

fn test_app() -> Router {
    let config = AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig::default(),
        auth: AuthConfig::default(),
        logging: LoggingConfig::default(),
    };
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database.url)
        .expect("lazy pool");
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone());
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    Router::new()
        .route("/books", post(api::books::create_book))
        .route(
            "/books/:id",
            put(api::books::update_book)
                .patch(api::books::patch_book)
                .delete(api::books::delete_book),
        )
        .route("/authors", post(api::authors::create_author))
        .route(
            "/authors/:id",
            put(api::authors::update_author)
                .patch(api::authors::patch_author)
                .delete(api::authors::delete_author),
        )
        .with_state(state)
}

async fn status_of(request: Request<Body>) -> StatusCode {
    test_app()
        .oneshot(request)
        .await
        .expect("request handled")
        .status()
}

fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn anonymous_create_is_forbidden() {
    let request = json_request(Method::POST, "/books", r#"{"title": "X", "author": 1}"#);
    assert_eq!(status_of(request).await, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn anonymous_create_with_malformed_body_is_forbidden() {
    // The 403 must win over the body parse error.
    let request = json_request(Method::POST, "/books", "{not json at all");
    assert_eq!(status_of(request).await, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn anonymous_create_without_content_type_is_forbidden() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/books")
        .body(Body::from("{}"))
        .unwrap();
    assert_eq!(status_of(request).await, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn anonymous_update_is_forbidden() {
    let request = json_request(Method::PUT, "/books/1", "{broken");
    assert_eq!(status_of(request).await, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn anonymous_partial_update_is_forbidden() {
    let request = json_request(Method::PATCH, "/books/1", "{broken");
    assert_eq!(status_of(request).await, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn anonymous_delete_is_forbidden() {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/books/1")
        .body(Body::empty())
        .unwrap();
    assert_eq!(status_of(request).await, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn anonymous_author_mutations_are_forbidden() {
    let cases = [
        json_request(Method::POST, "/authors", "{not json"),
        json_request(Method::PUT, "/authors/1", "{not json"),
        json_request(Method::PATCH, "/authors/1", "{not json"),
        Request::builder()
            .method(Method::DELETE)
            .uri("/authors/1")
            .body(Body::empty())
            .unwrap(),
    ];
    for request in cases {
        assert_eq!(status_of(request).await, StatusCode::FORBIDDEN);
    }
}
