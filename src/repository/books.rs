//! Books repository for database operations

use chrono::NaiveDate;
use sqlx::{Pool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    filters::{escape_like, BookOrdering, BookPredicate},
    models::book::Book,
};

const BOOK_COLUMNS: &str = "SELECT b.id, b.title, b.isbn, b.author_id AS author, \
     a.name AS author_name, b.published_date \
     FROM books b JOIN authors a ON a.id = b.author_id";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List books matching all predicates, optionally narrowed by a search
    /// term, in the given order.
    pub async fn list(
        &self,
        predicates: &[BookPredicate],
        search: Option<&str>,
        ordering: BookOrdering,
    ) -> AppResult<Vec<Book>> {
        let mut qb = build_list_query(predicates, search, ordering);
        let books = qb.build_query_as::<Book>().fetch_all(&self.pool).await?;
        Ok(books)
    }

    /// Get a book by id, with the derived author name.
    pub async fn get(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!("{} WHERE b.id = $1", BOOK_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    pub async fn create(
        &self,
        title: &str,
        isbn: Option<&str>,
        author: i32,
        published_date: Option<NaiveDate>,
    ) -> AppResult<Book> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO books (title, isbn, author_id, published_date) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(title)
        .bind(isbn)
        .bind(author)
        .bind(published_date)
        .fetch_one(&self.pool)
        .await?;

        self.get(id).await
    }

    /// Full-row replacement. Returns NotFound when the id does not exist.
    pub async fn update(
        &self,
        id: i32,
        title: &str,
        isbn: Option<&str>,
        author: i32,
        published_date: Option<NaiveDate>,
    ) -> AppResult<Book> {
        let result = sqlx::query(
            "UPDATE books SET title = $1, isbn = $2, author_id = $3, published_date = $4 \
             WHERE id = $5",
        )
        .bind(title)
        .bind(isbn)
        .bind(author)
        .bind(published_date)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        self.get(id).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }

    /// Whether another book with this exact title exists under this author,
    /// excluding the record being updated.
    pub async fn title_exists_for_author(
        &self,
        title: &str,
        author: i32,
        exclude_id: Option<i32>,
    ) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM books WHERE title = $1 AND author_id = $2 AND id != $3)",
            )
            .bind(title)
            .bind(author)
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM books WHERE title = $1 AND author_id = $2)",
            )
            .bind(title)
            .bind(author)
            .fetch_one(&self.pool)
            .await?
        };
        Ok(exists)
    }
}

/// Build the listing query with bound parameters for every user value.
fn build_list_query(
    predicates: &[BookPredicate],
    search: Option<&str>,
    ordering: BookOrdering,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("{} WHERE 1=1", BOOK_COLUMNS));

    for predicate in predicates {
        qb.push(" AND ");
        match predicate {
            BookPredicate::TitleContains(term) => {
                qb.push("b.title ILIKE ");
                qb.push_bind(contains_pattern(term));
            }
            BookPredicate::IsbnContains(term) => {
                qb.push("b.isbn ILIKE ");
                qb.push_bind(contains_pattern(term));
            }
            BookPredicate::AuthorId(id) => {
                qb.push("b.author_id = ");
                qb.push_bind(*id);
            }
            BookPredicate::AuthorNameContains(term) => {
                qb.push("a.name ILIKE ");
                qb.push_bind(contains_pattern(term));
            }
            BookPredicate::PublishedOn(date) => {
                qb.push("b.published_date = ");
                qb.push_bind(*date);
            }
            BookPredicate::PublishedAfter(date) => {
                qb.push("b.published_date >= ");
                qb.push_bind(*date);
            }
            BookPredicate::PublishedBefore(date) => {
                qb.push("b.published_date <= ");
                qb.push_bind(*date);
            }
            BookPredicate::PublicationYear(year) => {
                qb.push("EXTRACT(YEAR FROM b.published_date) = ");
                qb.push_bind(*year);
            }
        }
    }

    if let Some(term) = search {
        let pattern = contains_pattern(term);
        qb.push(" AND (b.title ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR a.name ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR b.isbn ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }

    qb.push(" ORDER BY ");
    qb.push(ordering.sql());
    qb
}

fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn list_query_defaults_to_title_ordering() {
        let qb = build_list_query(&[], None, BookOrdering::default());
        let sql = qb.sql();
        assert!(sql.contains("JOIN authors a ON a.id = b.author_id"));
        assert!(sql.ends_with("ORDER BY b.title ASC, b.id ASC"));
        assert!(!sql.contains("$1"));
    }

    #[test]
    fn predicates_become_bound_conjuncts() {
        let predicates = vec![
            BookPredicate::TitleContains("python".into()),
            BookPredicate::AuthorId(7),
            BookPredicate::PublishedAfter(date(2022, 11, 20)),
            BookPredicate::PublicationYear(2023),
        ];
        let qb = build_list_query(&predicates, None, BookOrdering::default());
        let sql = qb.sql();
        assert!(sql.contains("b.title ILIKE $1"));
        assert!(sql.contains("AND b.author_id = $2"));
        assert!(sql.contains("AND b.published_date >= $3"));
        assert!(sql.contains("AND EXTRACT(YEAR FROM b.published_date) = $4"));
    }

    #[test]
    fn search_adds_disjunction_over_three_fields() {
        let qb = build_list_query(&[], Some("john"), BookOrdering::parse(Some("-title")));
        let sql = qb.sql();
        assert!(sql.contains(
            "(b.title ILIKE $1 OR a.name ILIKE $2 OR b.isbn ILIKE $3)"
        ));
        assert!(sql.ends_with("ORDER BY b.title DESC, b.id ASC"));
    }
}
