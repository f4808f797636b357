//! Catalog service: validation and orchestration for authors and books.
//!
//! Field-level checks are collected into a single [`FieldErrors`] map so a
//! rejected write reports every violated constraint at once. Cross-field and
//! referential checks run against the repository before any persistence.

use chrono::NaiveDate;
use validator::Validate;

use crate::{
    error::{AppError, AppResult, FieldErrors, NON_FIELD_ERRORS},
    filters::{book_predicates, AuthorOrdering, BookOrdering},
    models::{
        author::{Author, AuthorQuery, CreateAuthor, UpdateAuthor},
        book::{Book, BookQuery, CreateBook, UpdateBook},
    },
    repository::Repository,
};

const REQUIRED: &str = "This field is required.";

/// Fully validated book write, ready for persistence.
struct BookWrite {
    title: String,
    isbn: Option<String>,
    author: i32,
    published_date: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // =========================================================================
    // Authors
    // =========================================================================

    pub async fn list_authors(&self, query: &AuthorQuery) -> AppResult<Vec<Author>> {
        let ordering = AuthorOrdering::parse(query.ordering.as_deref());
        self.repository
            .authors
            .list(query.name.as_deref(), query.search.as_deref(), ordering)
            .await
    }

    pub async fn get_author(&self, id: i32) -> AppResult<Author> {
        self.repository.authors.get(id).await
    }

    pub async fn create_author(&self, payload: CreateAuthor) -> AppResult<Author> {
        let name = self.validate_author_name(&payload, None).await?;
        let created = self
            .repository
            .authors
            .create(&name, payload.bio.as_deref())
            .await?;
        tracing::info!(author_id = created.id, "Author created");
        Ok(created)
    }

    /// Full replacement (PUT): name is required, bio resets when absent.
    pub async fn update_author(&self, id: i32, payload: CreateAuthor) -> AppResult<Author> {
        self.repository.authors.get(id).await?;
        let name = self.validate_author_name(&payload, Some(id)).await?;
        self.repository
            .authors
            .update(id, &name, payload.bio.as_deref())
            .await
    }

    /// Partial update (PATCH): absent fields keep their stored values.
    pub async fn patch_author(&self, id: i32, payload: UpdateAuthor) -> AppResult<Author> {
        let existing = self.repository.authors.get(id).await?;
        let merged = CreateAuthor {
            name: payload.name.or(Some(existing.name)),
            bio: payload.bio.or(existing.bio),
        };
        let name = self.validate_author_name(&merged, Some(id)).await?;
        self.repository
            .authors
            .update(id, &name, merged.bio.as_deref())
            .await
    }

    /// Delete an author; owned books go with it (cascade).
    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await?;
        tracing::info!(author_id = id, "Author deleted (books cascaded)");
        Ok(())
    }

    async fn validate_author_name(
        &self,
        payload: &CreateAuthor,
        exclude_id: Option<i32>,
    ) -> AppResult<String> {
        let mut errors = author_field_errors(payload);
        if let Some(ref name) = payload.name {
            if !errors.0.contains_key("name")
                && self.repository.authors.name_exists(name, exclude_id).await?
            {
                errors.push("name", "An author with this name already exists.");
            }
        }
        errors.into_result()?;
        payload
            .name
            .clone()
            .ok_or_else(|| AppError::Internal("validated author payload missing name".into()))
    }

    // =========================================================================
    // Books
    // =========================================================================

    pub async fn list_books(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let predicates = book_predicates(query)?;
        let ordering = BookOrdering::parse(query.ordering.as_deref());
        self.repository
            .books
            .list(&predicates, query.search.as_deref(), ordering)
            .await
    }

    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get(id).await
    }

    pub async fn create_book(&self, payload: CreateBook) -> AppResult<Book> {
        let write = self.validate_book_write(payload, None).await?;
        let created = self
            .repository
            .books
            .create(
                &write.title,
                write.isbn.as_deref(),
                write.author,
                write.published_date,
            )
            .await?;
        tracing::info!(book_id = created.id, "Book created");
        Ok(created)
    }

    /// Full replacement (PUT): title and author are required again.
    pub async fn update_book(&self, id: i32, payload: CreateBook) -> AppResult<Book> {
        self.repository.books.get(id).await?;
        let write = self.validate_book_write(payload, Some(id)).await?;
        self.repository
            .books
            .update(
                id,
                &write.title,
                write.isbn.as_deref(),
                write.author,
                write.published_date,
            )
            .await
    }

    /// Partial update (PATCH): absent fields keep their stored values.
    pub async fn patch_book(&self, id: i32, payload: UpdateBook) -> AppResult<Book> {
        let existing = self.repository.books.get(id).await?;
        let merged = CreateBook {
            title: payload.title.or(Some(existing.title)),
            isbn: payload.isbn.or(existing.isbn),
            author: payload.author.or(Some(existing.author)),
            published_date: payload.published_date.or(existing.published_date),
        };
        let write = self.validate_book_write(merged, Some(id)).await?;
        self.repository
            .books
            .update(
                id,
                &write.title,
                write.isbn.as_deref(),
                write.author,
                write.published_date,
            )
            .await
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }

    /// Run field, referential and cross-field checks and produce a write.
    /// `exclude_id` is the record under update, allowed to keep its own
    /// (title, author) pair.
    async fn validate_book_write(
        &self,
        payload: CreateBook,
        exclude_id: Option<i32>,
    ) -> AppResult<BookWrite> {
        let mut errors = book_field_errors(&payload);

        if let Some(author) = payload.author {
            if !self.repository.authors.exists(author).await? {
                errors.push(
                    "author",
                    format!("Invalid author id {} - object does not exist.", author),
                );
            } else if let Some(ref title) = payload.title {
                if !errors.0.contains_key("title")
                    && self
                        .repository
                        .books
                        .title_exists_for_author(title, author, exclude_id)
                        .await?
                {
                    errors.push(
                        NON_FIELD_ERRORS,
                        "A book with this title already exists for this author.",
                    );
                }
            }
        }

        errors.into_result()?;
        match (payload.title, payload.author) {
            (Some(title), Some(author)) => Ok(BookWrite {
                title,
                isbn: payload.isbn,
                author,
                published_date: payload.published_date,
            }),
            _ => Err(AppError::Internal(
                "validated book payload missing required fields".into(),
            )),
        }
    }
}

/// Field-level checks for a book write. Collects every violation.
fn book_field_errors(payload: &CreateBook) -> FieldErrors {
    let mut errors = FieldErrors::new();

    match payload.title.as_deref() {
        None | Some("") => errors.push("title", REQUIRED),
        Some(title) if is_purely_numeric(title) => {
            errors.push("title", "Book title cannot consist only of numbers.");
        }
        _ => {}
    }
    if let Err(e) = payload.validate() {
        errors.extend_from_validator(e);
    }
    if payload.author.is_none() {
        errors.push("author", REQUIRED);
    }
    errors
}

/// Field-level checks for an author write.
fn author_field_errors(payload: &CreateAuthor) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if payload.name.is_none() {
        errors.push("name", REQUIRED);
    } else if let Err(e) = payload.validate() {
        errors.extend_from_validator(e);
    }
    errors
}

// Unicode-aware so titles like "١٢٣" count as all-numeric too.
fn is_purely_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(char::is_numeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: Option<&str>, isbn: Option<&str>, author: Option<i32>) -> CreateBook {
        CreateBook {
            title: title.map(String::from),
            isbn: isbn.map(String::from),
            author,
            published_date: None,
        }
    }

    #[test]
    fn valid_book_payload_has_no_field_errors() {
        let errors = book_field_errors(&book(Some("Learning Rust"), Some("9781234567890"), Some(1)));
        assert!(errors.is_empty());
    }

    #[test]
    fn isbn_is_optional() {
        let errors = book_field_errors(&book(Some("Learning Rust"), None, Some(1)));
        assert!(errors.is_empty());
    }

    #[test]
    fn purely_numeric_title_is_rejected() {
        let errors = book_field_errors(&book(Some("12345"), None, Some(1)));
        assert_eq!(
            errors.0.get("title").unwrap(),
            &vec!["Book title cannot consist only of numbers.".to_string()]
        );
    }

    #[test]
    fn unicode_digit_title_is_rejected() {
        for title in ["١٢٣٤٥", "๑๒๓", "４２"] {
            let errors = book_field_errors(&book(Some(title), None, Some(1)));
            assert_eq!(
                errors.0.get("title").unwrap(),
                &vec!["Book title cannot consist only of numbers.".to_string()],
                "title {title:?} should be rejected"
            );
        }
    }

    #[test]
    fn numeric_title_with_letters_is_accepted() {
        let errors = book_field_errors(&book(Some("The 2023 Guide"), None, Some(1)));
        assert!(errors.is_empty());
    }

    #[test]
    fn short_isbn_is_rejected() {
        let errors = book_field_errors(&book(Some("Learning Rust"), Some("12345"), Some(1)));
        assert_eq!(
            errors.0.get("isbn").unwrap(),
            &vec!["ISBN must be 13 characters long.".to_string()]
        );
    }

    #[test]
    fn all_violations_are_reported_together() {
        let errors = book_field_errors(&book(Some("42"), Some("978"), None));
        let keys: Vec<_> = errors.0.keys().cloned().collect();
        assert_eq!(keys, vec!["title", "isbn", "author"]);
    }

    #[test]
    fn missing_required_fields_are_reported() {
        let errors = book_field_errors(&book(None, None, None));
        assert_eq!(errors.0.get("title").unwrap(), &vec![REQUIRED.to_string()]);
        assert_eq!(errors.0.get("author").unwrap(), &vec![REQUIRED.to_string()]);
    }

    #[test]
    fn author_name_shorter_than_three_chars_is_rejected() {
        let payload = CreateAuthor {
            name: Some("Jo".into()),
            bio: None,
        };
        let errors = author_field_errors(&payload);
        assert_eq!(
            errors.0.get("name").unwrap(),
            &vec!["Author name must be at least 3 characters long.".to_string()]
        );
    }

    #[test]
    fn author_name_is_required() {
        let payload = CreateAuthor {
            name: None,
            bio: Some("wrote things".into()),
        };
        let errors = author_field_errors(&payload);
        assert_eq!(errors.0.get("name").unwrap(), &vec![REQUIRED.to_string()]);
    }

    #[test]
    fn three_char_author_name_passes() {
        let payload = CreateAuthor {
            name: Some("Ada".into()),
            bio: None,
        };
        assert!(author_field_errors(&payload).is_empty());
    }
}
