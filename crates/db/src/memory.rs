//! In-process catalog with the same leasing rules as the MySQL store.
//!
//! Backs the router tests and the CLI's `--demo` mode. Leases come from a
//! bounded semaphore sized like a real pool, so exhaustion and release
//! behave the way they do against MySQL.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::StoreError;
use crate::lease::Lease;
use crate::models::{Book, BookRow, PageWindow, SearchPage, TitleRow};
use crate::store::BookStore;

pub struct MemoryBookStore {
    rows: Vec<BookRow>,
    permits: Arc<Semaphore>,
    capacity: u32,
    acquire_timeout: Duration,
    failing_prefixes: HashSet<String>,
    failing_ids: HashSet<String>,
}

impl MemoryBookStore {
    pub fn new(rows: Vec<BookRow>, capacity: u32) -> Self {
        let capacity = capacity.max(1);
        Self {
            rows,
            permits: Arc::new(Semaphore::new(capacity as usize)),
            capacity,
            acquire_timeout: Duration::from_secs(30),
            failing_prefixes: HashSet::new(),
            failing_ids: HashSet::new(),
        }
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Make searches for exactly this prefix fail after the lease is taken.
    pub fn failing_on_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.failing_prefixes.insert(prefix.into());
        self
    }

    /// Make lookups of this id fail after the lease is taken.
    pub fn failing_on_id(mut self, id: impl Into<String>) -> Self {
        self.failing_ids.insert(id.into());
        self
    }

    /// A small fixed catalog for demos and tests.
    pub fn demo() -> Self {
        Self::new(demo_rows(), 4)
    }

    async fn lease(&self) -> Result<Lease<OwnedSemaphorePermit>, StoreError> {
        let acquire = self.permits.clone().acquire_owned();
        match tokio::time::timeout(self.acquire_timeout, acquire).await {
            Ok(Ok(permit)) => Ok(Lease::new(permit, "memory")),
            Ok(Err(_closed)) => Err(StoreError::Acquire(sqlx::Error::PoolClosed)),
            Err(_elapsed) => Err(StoreError::AcquireTimeout),
        }
    }
}

fn simulated_failure(what: &str) -> sqlx::Error {
    sqlx::Error::Protocol(format!("simulated failure during {}", what))
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn search(&self, prefix: &str, window: PageWindow) -> Result<SearchPage, StoreError> {
        let mut lease = self.lease().await?;
        let needle = prefix.to_lowercase();

        lease.begin_query();
        tokio::task::yield_now().await;
        if self.failing_prefixes.contains(prefix) {
            return Err(StoreError::Search(simulated_failure("count")));
        }
        let mut matches: Vec<TitleRow> = self
            .rows
            .iter()
            .filter(|row| row.title.to_lowercase().starts_with(&needle))
            .map(|row| TitleRow {
                book_id: row.book_id.clone(),
                title: row.title.clone(),
            })
            .collect();
        let total = matches.len() as u64;

        lease.begin_query();
        tokio::task::yield_now().await;
        matches.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.book_id.cmp(&b.book_id)));
        let rows = matches
            .into_iter()
            .skip(usize::try_from(window.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(window.limit).unwrap_or(usize::MAX))
            .collect();

        Ok(SearchPage { total, rows })
    }

    async fn find(&self, id: &str) -> Result<Book, StoreError> {
        let mut lease = self.lease().await?;

        lease.begin_query();
        tokio::task::yield_now().await;
        if self.failing_ids.contains(id) {
            return Err(StoreError::Query(simulated_failure("lookup")));
        }

        self.rows
            .iter()
            .find(|row| row.book_id == id)
            .cloned()
            .map(BookRow::into_book)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut lease = self.lease().await?;
        lease.begin_query();
        Ok(())
    }

    fn leased(&self) -> u32 {
        self.capacity
            .saturating_sub(self.permits.available_permits() as u32)
    }

    async fn close(&self) {
        self.permits.close();
    }
}

fn demo_row(id: &str, title: &str, authors: &str, genres: &str, pages: i32, rating: f64) -> BookRow {
    BookRow {
        book_id: id.to_string(),
        title: title.to_string(),
        authors: Some(authors.to_string()),
        genres: Some(genres.to_string()),
        description: Some(format!("{} is part of the demo catalog.", title)),
        format: Some("Paperback".to_string()),
        pages: Some(pages),
        rating: Some(rating),
        rating_count: Some(1000),
        review_count: Some(100),
        ..Default::default()
    }
}

fn demo_rows() -> Vec<BookRow> {
    vec![
        demo_row("1", "The Hobbit", "J.R.R. Tolkien", "Fantasy|Classics", 366, 4.25),
        demo_row("2", "The Name of the Wind", "Patrick Rothfuss", "Fantasy|Fiction", 662, 4.52),
        demo_row("3", "Good Omens", "Terry Pratchett|Neil Gaiman", "Fantasy|Humor", 412, 4.25),
        demo_row("4", "Dune", "Frank Herbert", "Science Fiction|Classics", 604, 4.22),
        demo_row("5", "The Left Hand of Darkness", "Ursula K. Le Guin", "Science Fiction", 304, 4.08),
    ]
}
