//! Error types for the database layer

use thiserror::Error;

/// Failures while bringing the pool up at startup.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("cannot connect to database at {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("cannot ping database at {endpoint}: {source}")]
    Ping {
        endpoint: String,
        #[source]
        source: sqlx::Error,
    },
}

/// Failures on the request path.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("timed out waiting for a database connection")]
    AcquireTimeout,

    #[error("could not lease a database connection: {0}")]
    Acquire(#[source] sqlx::Error),

    #[error("search failed: {0}")]
    Search(#[source] sqlx::Error),

    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),

    #[error("book {0} not found")]
    NotFound(String),
}

impl StoreError {
    /// Map a pool acquisition failure, separating exhaustion from other causes.
    pub fn from_acquire(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => StoreError::AcquireTimeout,
            other => StoreError::Acquire(other),
        }
    }
}
