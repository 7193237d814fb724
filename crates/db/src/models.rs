use serde::{Deserialize, Serialize};

/// One catalog entry, with multi-value fields already normalized for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    /// Comma-and-space separated author names
    pub authors: String,
    /// Comma-and-space separated genres
    pub genres: String,
    pub description: String,
    pub edition: String,
    pub format: String,
    pub pages: i32,
    pub rating: f64,
    pub rating_count: i64,
    pub review_count: i64,
    pub image_url: String,
}

/// Raw `book2018` row as stored, pipe-delimited fields and nullable columns included.
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct BookRow {
    pub book_id: String,
    pub title: String,
    pub authors: Option<String>,
    pub description: Option<String>,
    pub edition: Option<String>,
    pub format: Option<String>,
    pub pages: Option<i32>,
    pub rating: Option<f64>,
    pub rating_count: Option<i64>,
    pub review_count: Option<i64>,
    pub genres: Option<String>,
    pub image_url: Option<String>,
}

impl BookRow {
    /// Convert the stored row into a display-ready [`Book`].
    pub fn into_book(self) -> Book {
        Book {
            id: self.book_id,
            title: self.title,
            authors: normalize_delimited(&self.authors.unwrap_or_default()),
            genres: normalize_delimited(&self.genres.unwrap_or_default()),
            description: self.description.unwrap_or_default(),
            edition: self.edition.unwrap_or_default(),
            format: self.format.unwrap_or_default(),
            pages: self.pages.unwrap_or_default(),
            rating: self.rating.unwrap_or_default(),
            rating_count: self.rating_count.unwrap_or_default(),
            review_count: self.review_count.unwrap_or_default(),
            image_url: self.image_url.unwrap_or_default(),
        }
    }
}

/// Identifier and title of one search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TitleRow {
    pub book_id: String,
    pub title: String,
}

/// Bounded slice of the matching titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: u64,
    pub offset: u64,
}

/// Count plus one page of titles, read on a single lease.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    pub total: u64,
    pub rows: Vec<TitleRow>,
}

/// Turn a pipe-delimited multi-value field into `", "`-joined text.
///
/// Strings without pipes are returned unchanged, so running this on an
/// already normalized value is a no-op.
pub fn normalize_delimited(raw: &str) -> String {
    raw.replace('|', ", ")
}

/// Build the `LIKE` pattern for a literal title prefix.
pub fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
