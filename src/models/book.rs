//! Book model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Full book model from database.
///
/// `author` is the owning author's id; `author_name` is derived from the
/// joined author row and is never written from a payload.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub isbn: Option<String>,
    pub author: i32,
    pub author_name: String,
    pub published_date: Option<NaiveDate>,
}

/// Create book request (also used for full PUT replacement)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    pub title: Option<String>,
    #[validate(length(equal = 13, message = "ISBN must be 13 characters long."))]
    pub isbn: Option<String>,
    /// Owning author id
    pub author: Option<i32>,
    pub published_date: Option<NaiveDate>,
}

/// Partial book update request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    pub title: Option<String>,
    #[validate(length(equal = 13, message = "ISBN must be 13 characters long."))]
    pub isbn: Option<String>,
    pub author: Option<i32>,
    pub published_date: Option<NaiveDate>,
}

/// Book list query parameters.
///
/// Dates, the year and the author id are taken as raw strings so malformed
/// values come back as field-keyed validation messages rather than extractor
/// rejections; see
/// [`crate::filters::book_predicates`].
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Case-insensitive substring match on title
    #[serde(alias = "title__icontains")]
    pub title: Option<String>,
    /// Case-insensitive substring match on ISBN
    pub isbn: Option<String>,
    /// Exact match on the owning author id
    pub author: Option<String>,
    /// Case-insensitive substring match on the related author's name
    #[serde(alias = "author_name__icontains")]
    pub author_name: Option<String>,
    /// Exact date match (YYYY-MM-DD)
    pub published_date: Option<String>,
    /// published_date on or after this date (inclusive)
    pub published_after: Option<String>,
    /// published_date on or before this date (inclusive)
    pub published_before: Option<String>,
    /// Exact match on the year component of published_date
    pub publication_year: Option<String>,
    /// Case-insensitive search over title, author name and ISBN
    pub search: Option<String>,
    /// `title`, `-title`, `published_date` or `-published_date`
    pub ordering: Option<String>,
}
