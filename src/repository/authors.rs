//! Authors repository for database operations

use sqlx::{Pool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    filters::{escape_like, AuthorOrdering},
    models::author::Author,
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List authors, optionally narrowed by a name filter and a search term.
    pub async fn list(
        &self,
        name_contains: Option<&str>,
        search: Option<&str>,
        ordering: AuthorOrdering,
    ) -> AppResult<Vec<Author>> {
        let mut qb =
            QueryBuilder::<Postgres>::new("SELECT id, name, bio FROM authors WHERE 1=1");

        if let Some(term) = name_contains {
            qb.push(" AND name ILIKE ");
            qb.push_bind(format!("%{}%", escape_like(term)));
        }
        if let Some(term) = search {
            qb.push(" AND name ILIKE ");
            qb.push_bind(format!("%{}%", escape_like(term)));
        }
        qb.push(" ORDER BY ");
        qb.push(ordering.sql());

        let authors = qb.build_query_as::<Author>().fetch_all(&self.pool).await?;
        Ok(authors)
    }

    pub async fn get(&self, id: i32) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT id, name, bio FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    pub async fn create(&self, name: &str, bio: Option<&str>) -> AppResult<Author> {
        let author = sqlx::query_as::<_, Author>(
            "INSERT INTO authors (name, bio) VALUES ($1, $2) RETURNING id, name, bio",
        )
        .bind(name)
        .bind(bio)
        .fetch_one(&self.pool)
        .await?;
        Ok(author)
    }

    pub async fn update(&self, id: i32, name: &str, bio: Option<&str>) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(
            "UPDATE authors SET name = $1, bio = $2 WHERE id = $3 RETURNING id, name, bio",
        )
        .bind(name)
        .bind(bio)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
    }

    /// Delete an author. Owned books are removed by the cascade rule on the
    /// books foreign key.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author with id {} not found", id)));
        }
        Ok(())
    }

    /// Whether another author already uses this exact name.
    pub async fn name_exists(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM authors WHERE name = $1 AND id != $2)",
            )
            .bind(name)
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE name = $1)")
                .bind(name)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }
}
