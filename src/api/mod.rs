//! API handlers for Shelfmark REST endpoints

pub mod auth;
pub mod authors;
pub mod books;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{
    error::AppError, models::user::UserClaims, permissions::AuthState, AppState,
};

/// Extractor for an authenticated caller. Rejects when no valid bearer token
/// is presented.
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match MaybeAuthenticated::from_request_parts(parts, state).await? {
            MaybeAuthenticated(AuthState::Authenticated, Some(claims)) => {
                Ok(AuthenticatedUser(claims))
            }
            _ => Err(AppError::PermissionDenied(
                "Authentication credentials were not provided.".to_string(),
            )),
        }
    }
}

/// Extractor distinguishing anonymous from authenticated callers without
/// rejecting the former. Handlers feed the state into the permission policy.
///
/// A missing Authorization header is anonymous; a header that is present but
/// malformed or carries an invalid token is an authentication failure.
pub struct MaybeAuthenticated(pub AuthState, pub Option<UserClaims>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(auth_header) = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
        else {
            return Ok(MaybeAuthenticated(AuthState::Anonymous, None));
        };

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Authentication("Invalid authorization header format".to_string())
        })?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(MaybeAuthenticated(AuthState::Authenticated, Some(claims)))
    }
}

impl MaybeAuthenticated {
    pub fn state(&self) -> AuthState {
        self.0
    }
}
