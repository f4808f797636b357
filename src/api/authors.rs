//! Author endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::author::{Author, AuthorQuery, CreateAuthor, UpdateAuthor},
    permissions::{require, Operation},
    AppState,
};

use super::MaybeAuthenticated;

/// List authors with filtering, searching and ordering
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(AuthorQuery),
    responses(
        (status = 200, description = "List of authors", body = Vec<Author>)
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    Query(query): Query<AuthorQuery>,
) -> AppResult<Json<Vec<Author>>> {
    let authors = state.services.catalog.list_authors(&query).await?;
    Ok(Json(authors))
}

/// Get author details by ID
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = Author),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Author>> {
    let author = state.services.catalog.get_author(id).await?;
    Ok(Json(author))
}

/// Create a new author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Validation failed", body = crate::error::FieldErrors),
        (status = 403, description = "Not authenticated")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    caller: MaybeAuthenticated,
    payload: Result<Json<CreateAuthor>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Author>)> {
    // Permission first: an unparseable body must not mask the 403.
    require(Operation::Create, caller.state())?;
    let Json(payload) = payload?;

    let created = state.services.catalog.create_author(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace an existing author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    request_body = CreateAuthor,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 400, description = "Validation failed", body = crate::error::FieldErrors),
        (status = 403, description = "Not authenticated"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    caller: MaybeAuthenticated,
    Path(id): Path<i32>,
    payload: Result<Json<CreateAuthor>, JsonRejection>,
) -> AppResult<Json<Author>> {
    require(Operation::Update, caller.state())?;
    let Json(payload) = payload?;

    let updated = state.services.catalog.update_author(id, payload).await?;
    Ok(Json(updated))
}

/// Partially update an existing author
#[utoipa::path(
    patch,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    request_body = UpdateAuthor,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 400, description = "Validation failed", body = crate::error::FieldErrors),
        (status = 403, description = "Not authenticated"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn patch_author(
    State(state): State<AppState>,
    caller: MaybeAuthenticated,
    Path(id): Path<i32>,
    payload: Result<Json<UpdateAuthor>, JsonRejection>,
) -> AppResult<Json<Author>> {
    require(Operation::Update, caller.state())?;
    let Json(payload) = payload?;

    let updated = state.services.catalog.patch_author(id, payload).await?;
    Ok(Json(updated))
}

/// Delete an author and, by cascade, all of their books
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 403, description = "Not authenticated"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    caller: MaybeAuthenticated,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    require(Operation::Delete, caller.state())?;

    state.services.catalog.delete_author(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
