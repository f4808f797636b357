//! Query-parameter filtering, searching and ordering.
//!
//! Recognized parameters map through an explicit table to structured
//! predicates; the repositories turn predicates into bound SQL conditions.
//! Unrecognized parameters are dropped during query deserialization and
//! absent parameters impose no constraint.

use chrono::NaiveDate;

use crate::{
    error::{AppResult, FieldErrors},
    models::book::BookQuery,
};

/// One conjunct of a book listing filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookPredicate {
    /// Case-insensitive substring match on title
    TitleContains(String),
    /// Case-insensitive substring match on ISBN
    IsbnContains(String),
    /// Exact match on the owning author id
    AuthorId(i32),
    /// Case-insensitive substring match on the related author's name
    AuthorNameContains(String),
    /// Exact date match
    PublishedOn(NaiveDate),
    /// published_date >= date
    PublishedAfter(NaiveDate),
    /// published_date <= date
    PublishedBefore(NaiveDate),
    /// Exact match on the year component of published_date
    PublicationYear(i32),
}

/// Translate book query parameters into a conjunctive predicate set.
///
/// Malformed dates or years do not select anything; they are all collected
/// and reported together as a validation failure keyed by parameter name.
pub fn book_predicates(query: &BookQuery) -> AppResult<Vec<BookPredicate>> {
    let mut predicates = Vec::new();
    let mut errors = FieldErrors::new();

    if let Some(ref title) = query.title {
        predicates.push(BookPredicate::TitleContains(title.clone()));
    }
    if let Some(ref isbn) = query.isbn {
        predicates.push(BookPredicate::IsbnContains(isbn.clone()));
    }
    if let Some(ref raw) = query.author {
        match raw.trim().parse::<i32>() {
            Ok(id) => predicates.push(BookPredicate::AuthorId(id)),
            Err(_) => errors.push("author", "Enter a valid author id."),
        }
    }
    if let Some(ref author_name) = query.author_name {
        predicates.push(BookPredicate::AuthorNameContains(author_name.clone()));
    }
    if let Some(ref raw) = query.published_date {
        match parse_date(raw) {
            Ok(date) => predicates.push(BookPredicate::PublishedOn(date)),
            Err(message) => errors.push("published_date", message),
        }
    }
    if let Some(ref raw) = query.published_after {
        match parse_date(raw) {
            Ok(date) => predicates.push(BookPredicate::PublishedAfter(date)),
            Err(message) => errors.push("published_after", message),
        }
    }
    if let Some(ref raw) = query.published_before {
        match parse_date(raw) {
            Ok(date) => predicates.push(BookPredicate::PublishedBefore(date)),
            Err(message) => errors.push("published_before", message),
        }
    }
    if let Some(ref raw) = query.publication_year {
        match raw.trim().parse::<i32>() {
            Ok(year) => predicates.push(BookPredicate::PublicationYear(year)),
            Err(_) => errors.push("publication_year", "Enter a valid year."),
        }
    }

    errors.into_result()?;
    Ok(predicates)
}

fn parse_date(raw: &str) -> Result<NaiveDate, &'static str> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| "Enter a valid date in YYYY-MM-DD format.")
}

/// Valid ordering fields for book listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookSortField {
    Title,
    PublishedDate,
}

/// Parsed ordering directive for book listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookOrdering {
    pub field: BookSortField,
    pub descending: bool,
}

impl Default for BookOrdering {
    fn default() -> Self {
        Self {
            field: BookSortField::Title,
            descending: false,
        }
    }
}

impl BookOrdering {
    /// Parse an `ordering` parameter. A leading `-` means descending; values
    /// naming anything other than `title` or `published_date` fall back to
    /// the default title ordering.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        let (descending, name) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        match name {
            "title" => Self {
                field: BookSortField::Title,
                descending,
            },
            "published_date" => Self {
                field: BookSortField::PublishedDate,
                descending,
            },
            _ => Self::default(),
        }
    }

    /// ORDER BY clause body. Ties always break by id, preserving insertion
    /// order between equal keys.
    pub fn sql(&self) -> &'static str {
        match (self.field, self.descending) {
            (BookSortField::Title, false) => "b.title ASC, b.id ASC",
            (BookSortField::Title, true) => "b.title DESC, b.id ASC",
            (BookSortField::PublishedDate, false) => "b.published_date ASC, b.id ASC",
            (BookSortField::PublishedDate, true) => "b.published_date DESC, b.id ASC",
        }
    }
}

/// Parsed ordering directive for author listings (name is the only key).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorOrdering {
    pub descending: bool,
}

impl AuthorOrdering {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("-name") => Self { descending: true },
            _ => Self { descending: false },
        }
    }

    pub fn sql(&self) -> &'static str {
        if self.descending {
            "name DESC, id ASC"
        } else {
            "name ASC, id ASC"
        }
    }
}

/// Escape LIKE/ILIKE metacharacters in a user-supplied search term.
pub fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_query_builds_no_predicates() {
        let predicates = book_predicates(&BookQuery::default()).unwrap();
        assert!(predicates.is_empty());
    }

    #[test]
    fn recognized_parameters_combine_conjunctively() {
        let query = BookQuery {
            title: Some("python".into()),
            isbn: Some("97809".into()),
            author: Some("3".into()),
            author_name: Some("john".into()),
            published_date: Some("2022-01-01".into()),
            published_after: Some("2021-05-15".into()),
            published_before: Some("2024-03-10".into()),
            publication_year: Some("2023".into()),
            ..Default::default()
        };
        let predicates = book_predicates(&query).unwrap();
        assert_eq!(
            predicates,
            vec![
                BookPredicate::TitleContains("python".into()),
                BookPredicate::IsbnContains("97809".into()),
                BookPredicate::AuthorId(3),
                BookPredicate::AuthorNameContains("john".into()),
                BookPredicate::PublishedOn(date(2022, 1, 1)),
                BookPredicate::PublishedAfter(date(2021, 5, 15)),
                BookPredicate::PublishedBefore(date(2024, 3, 10)),
                BookPredicate::PublicationYear(2023),
            ]
        );
    }

    #[test]
    fn malformed_values_are_collected_per_field() {
        let query = BookQuery {
            author: Some("abc".into()),
            published_after: Some("not-a-date".into()),
            published_before: Some("2024-13-40".into()),
            publication_year: Some("twenty".into()),
            ..Default::default()
        };
        let err = book_predicates(&query).unwrap_err();
        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        let keys: Vec<_> = errors.0.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                "author",
                "published_after",
                "published_before",
                "publication_year"
            ]
        );
        assert_eq!(errors.0["author"], vec!["Enter a valid author id."]);
    }

    #[test]
    fn ordering_parses_sign_prefix() {
        assert_eq!(
            BookOrdering::parse(Some("-title")),
            BookOrdering {
                field: BookSortField::Title,
                descending: true
            }
        );
        assert_eq!(
            BookOrdering::parse(Some("published_date")),
            BookOrdering {
                field: BookSortField::PublishedDate,
                descending: false
            }
        );
    }

    #[test]
    fn invalid_ordering_falls_back_to_title() {
        for raw in [Some("isbn"), Some("-id"), Some(""), None] {
            assert_eq!(BookOrdering::parse(raw), BookOrdering::default());
        }
    }

    #[test]
    fn ordering_sql_breaks_ties_by_id() {
        assert_eq!(
            BookOrdering::parse(Some("published_date")).sql(),
            "b.published_date ASC, b.id ASC"
        );
        assert_eq!(
            BookOrdering::parse(Some("-title")).sql(),
            "b.title DESC, b.id ASC"
        );
    }

    #[test]
    fn author_ordering_only_accepts_name() {
        assert!(AuthorOrdering::parse(Some("-name")).descending);
        assert!(!AuthorOrdering::parse(Some("name")).descending);
        assert!(!AuthorOrdering::parse(Some("-bio")).descending);
        assert!(!AuthorOrdering::parse(None).descending);
    }

    #[test]
    fn like_escaping_neutralizes_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
