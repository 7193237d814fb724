//! Scoped ownership of one pooled connection.
//!
//! A request holds at most one [`Lease`]. Acquiring it moves the request from
//! idle to acquired, every [`Lease::begin_query`] marks a query against the
//! same connection, and dropping the value releases the connection back to its
//! pool. Release is tied to `Drop`, so every exit path (success, `?` on a query
//! error, a panic unwinding through the handler, or the request future being
//! dropped) returns the connection exactly once.

use std::time::Instant;

pub struct Lease<R> {
    resource: R,
    label: &'static str,
    queries: u32,
    acquired_at: Instant,
}

impl<R> Lease<R> {
    pub fn new(resource: R, label: &'static str) -> Self {
        tracing::debug!(lease = label, "connection acquired");
        Self {
            resource,
            label,
            queries: 0,
            acquired_at: Instant::now(),
        }
    }

    /// Borrow the leased resource for one more query.
    pub fn begin_query(&mut self) -> &mut R {
        self.queries += 1;
        tracing::trace!(lease = self.label, query = self.queries, "query on leased connection");
        &mut self.resource
    }

    /// Number of queries issued on this lease so far.
    pub fn queries(&self) -> u32 {
        self.queries
    }
}

impl<R> Drop for Lease<R> {
    fn drop(&mut self) {
        tracing::debug!(
            lease = self.label,
            queries = self.queries(),
            held_ms = self.acquired_at.elapsed().as_millis() as u64,
            "connection released"
        );
    }
}
