use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{Html, Response},
};
use booklist_db::{BookStore, PageWindow};
use booklist_http::AppError;

use super::models::{BookJson, BookView, SearchJson, SearchParams, SearchView};
use super::negotiate::{accept_header, negotiate, Representation};
use super::pagination::{parse_offset, PAGE_SIZE};
use super::views::{self, render, BOOK_RENDERERS, SEARCH_RENDERERS};

#[derive(Clone)]
pub struct CatalogState {
    pub store: Arc<dyn BookStore>,
}

pub async fn landing() -> Html<String> {
    Html(views::landing_page())
}

/// Titles starting with `q`, ten per page
#[utoipa::path(
    get,
    path = "/search",
    tag = "Catalog",
    params(
        ("q" = Option<String>, Query, description = "Title prefix, matched literally"),
        ("offset" = Option<String>, Query, description = "Rows to skip; anything unparsable counts as 0")
    ),
    responses(
        (status = 200, description = "One page of matching titles", body = SearchJson),
        (status = 500, description = "Database failure")
    )
)]
pub async fn search(
    State(state): State<CatalogState>,
    Query(pairs): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let params = SearchParams::from_pairs(pairs);
    let q = params.q.unwrap_or_default();
    let offset = parse_offset(params.offset.as_deref());

    let page = state
        .store
        .search(
            &q,
            PageWindow {
                limit: PAGE_SIZE,
                offset,
            },
        )
        .await?;

    tracing::debug!(q = %q, offset, total = page.total, "search page loaded");

    let view = SearchView::new(q, offset, page);
    let representation = negotiate(
        accept_header(&headers),
        &views::offered(SEARCH_RENDERERS),
    )
    .unwrap_or(Representation::Html);

    Ok(render(SEARCH_RENDERERS, representation, &view))
}

/// A single book as HTML, JSON or plain text depending on `Accept`
#[utoipa::path(
    get,
    path = "/show/{id}",
    tag = "Catalog",
    params(("id" = String, Path, description = "Book identifier")),
    responses(
        (status = 200, description = "The book", body = BookJson),
        (status = 404, description = "No book with this id"),
        (status = 500, description = "Database failure")
    )
)]
pub async fn show_book(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let book = state.store.find(&id).await?;
    let view = BookView::from(book);

    let representation = negotiate(accept_header(&headers), &views::offered(BOOK_RENDERERS))
        .unwrap_or(Representation::Text);

    Ok(render(BOOK_RENDERERS, representation, &view))
}
