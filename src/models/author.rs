//! Author model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Full author model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub name: String,
    pub bio: Option<String>,
}

/// Create author request.
///
/// `name` is declared optional so a missing field surfaces as a collected
/// validation message instead of a body-deserialization rejection.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[validate(length(min = 3, message = "Author name must be at least 3 characters long."))]
    pub name: Option<String>,
    pub bio: Option<String>,
}

/// Partial author update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAuthor {
    #[validate(length(min = 3, message = "Author name must be at least 3 characters long."))]
    pub name: Option<String>,
    pub bio: Option<String>,
}

/// Author list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct AuthorQuery {
    /// Case-insensitive substring match on name
    #[serde(alias = "name__icontains")]
    pub name: Option<String>,
    /// Case-insensitive search over name
    pub search: Option<String>,
    /// `name` or `-name`; anything else falls back to the default ordering
    pub ordering: Option<String>,
}
