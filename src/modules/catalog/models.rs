use booklist_db::{Book, SearchPage, TitleRow};
use serde::Serialize;
use utoipa::ToSchema;

use super::pagination::{paginate, Pagination, PAGE_SIZE};

/// Query string of `GET /search`. Both values are optional on the wire.
#[derive(Debug, Default, PartialEq)]
pub struct SearchParams {
    pub q: Option<String>,
    pub offset: Option<String>,
}

impl SearchParams {
    /// Collect from raw query pairs; a repeated key keeps its first value.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "q" => &mut params.q,
                "offset" => &mut params.offset,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

/// Everything a search page renders, built once per request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchView {
    pub q: String,
    pub total: u64,
    pub results: Vec<TitleRow>,
    pub pagination: Pagination,
}

impl SearchView {
    pub fn new(q: String, offset: u64, page: SearchPage) -> Self {
        Self {
            pagination: paginate(offset, PAGE_SIZE, page.total),
            q,
            total: page.total,
            results: page.rows,
        }
    }

    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }
}

/// Detail page context; HTML, JSON and text are all rendered from this.
#[derive(Debug, Clone, PartialEq)]
pub struct BookView {
    pub book: Book,
}

impl From<Book> for BookView {
    fn from(book: Book) -> Self {
        Self { book }
    }
}

impl BookView {
    pub fn has_image(&self) -> bool {
        !self.book.image_url.is_empty()
    }

    pub fn rating_display(&self) -> String {
        format!("{:.2}", self.book.rating)
    }
}

/// Flat JSON form of a book.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookJson {
    pub id: String,
    pub title: String,
    /// Comma-separated author names
    pub authors: String,
    pub summary: String,
    pub pages: i32,
    pub rating: f64,
    pub rating_count: i64,
    /// Comma-separated genres
    pub genre: String,
}

impl From<&BookView> for BookJson {
    fn from(view: &BookView) -> Self {
        let book = &view.book;
        Self {
            id: book.id.clone(),
            title: book.title.clone(),
            authors: book.authors.clone(),
            summary: book.description.clone(),
            pages: book.pages,
            rating: book.rating,
            rating_count: book.rating_count,
            genre: book.genres.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TitleJson {
    pub id: String,
    pub title: String,
}

/// JSON form of one search page.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchJson {
    pub q: String,
    pub total: u64,
    pub has_results: bool,
    pub results: Vec<TitleJson>,
    pub previous_offset: u64,
    pub next_offset: u64,
}

impl From<&SearchView> for SearchJson {
    fn from(view: &SearchView) -> Self {
        Self {
            q: view.q.clone(),
            total: view.total,
            has_results: view.has_results(),
            results: view
                .results
                .iter()
                .map(|row| TitleJson {
                    id: row.book_id.clone(),
                    title: row.title.clone(),
                })
                .collect(),
            previous_offset: view.pagination.previous,
            next_offset: view.pagination.next,
        }
    }
}
