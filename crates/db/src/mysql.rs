//! MySQL-backed catalog over the `book2018` table.

use async_trait::async_trait;
use sqlx::mysql::MySql;
use sqlx::pool::PoolConnection;
use sqlx::{Connection, MySqlPool};

use crate::error::StoreError;
use crate::lease::Lease;
use crate::models::{prefix_pattern, Book, BookRow, PageWindow, SearchPage, TitleRow};
use crate::store::BookStore;

const SQL_COUNT_BY_PREFIX: &str = "SELECT COUNT(title) FROM book2018 WHERE title LIKE ?";
const SQL_FIND_TITLES_BY_PREFIX: &str = "SELECT book_id, title FROM book2018 \
     WHERE title LIKE ? ORDER BY title, book_id LIMIT ? OFFSET ?";
const SQL_GET_BOOK_BY_ID: &str = "SELECT book_id, title, authors, description, edition, format, \
     pages, rating, rating_count, review_count, genres, image_url \
     FROM book2018 WHERE book_id = ?";

pub struct MySqlBookStore {
    pool: MySqlPool,
}

impl MySqlBookStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn lease(&self) -> Result<Lease<PoolConnection<MySql>>, StoreError> {
        let conn = self.pool.acquire().await.map_err(StoreError::from_acquire)?;
        Ok(Lease::new(conn, "mysql"))
    }
}

#[async_trait]
impl BookStore for MySqlBookStore {
    async fn search(&self, prefix: &str, window: PageWindow) -> Result<SearchPage, StoreError> {
        let pattern = prefix_pattern(prefix);
        let mut lease = self.lease().await?;

        let total: i64 = sqlx::query_scalar(SQL_COUNT_BY_PREFIX)
            .bind(&pattern)
            .fetch_one(&mut **lease.begin_query())
            .await
            .map_err(StoreError::Search)?;

        let rows: Vec<TitleRow> = sqlx::query_as(SQL_FIND_TITLES_BY_PREFIX)
            .bind(&pattern)
            .bind(window.limit)
            .bind(window.offset)
            .fetch_all(&mut **lease.begin_query())
            .await
            .map_err(StoreError::Search)?;

        tracing::debug!(prefix, total, returned = rows.len(), "prefix search");

        Ok(SearchPage {
            total: total.max(0) as u64,
            rows,
        })
    }

    async fn find(&self, id: &str) -> Result<Book, StoreError> {
        let mut lease = self.lease().await?;

        let row: Option<BookRow> = sqlx::query_as(SQL_GET_BOOK_BY_ID)
            .bind(id)
            .fetch_optional(&mut **lease.begin_query())
            .await
            .map_err(StoreError::Query)?;

        row.map(BookRow::into_book)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut lease = self.lease().await?;
        lease.begin_query().ping().await.map_err(StoreError::Query)
    }

    fn leased(&self) -> u32 {
        self.pool.size().saturating_sub(self.pool.num_idle() as u32)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statements_bind_every_user_value() {
        for sql in [SQL_COUNT_BY_PREFIX, SQL_FIND_TITLES_BY_PREFIX, SQL_GET_BOOK_BY_ID] {
            assert!(sql.contains('?'));
            assert!(!sql.contains('\''));
        }
        assert_eq!(SQL_FIND_TITLES_BY_PREFIX.matches('?').count(), 3);
    }

    #[test]
    fn both_search_statements_filter_the_same_way() {
        assert!(SQL_COUNT_BY_PREFIX.contains("WHERE title LIKE ?"));
        assert!(SQL_FIND_TITLES_BY_PREFIX.contains("WHERE title LIKE ?"));
    }
}
