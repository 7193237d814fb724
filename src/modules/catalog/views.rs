//! Renderers for the catalog pages. Each takes a prepared view context.

use axum::{
    response::{Html, IntoResponse, Response},
    Json,
};

use super::models::{BookJson, BookView, SearchJson, SearchView};
use super::negotiate::Representation;
use crate::utils::{escape_html, layout};

pub type Renderer<V> = fn(&V) -> Response;

/// Detail page representations, in server preference order.
pub const BOOK_RENDERERS: &[(Representation, Renderer<BookView>)] = &[
    (Representation::Html, book_html),
    (Representation::Json, book_json),
    (Representation::Text, book_text),
];

/// Search page representations, in server preference order.
pub const SEARCH_RENDERERS: &[(Representation, Renderer<SearchView>)] = &[
    (Representation::Html, search_html),
    (Representation::Json, search_json),
];

pub fn landing_page() -> String {
    layout(
        "Book Catalog",
        r#"    <p>Find a book by the first letters of its title.</p>
    <form action="/search" method="get">
        <input type="text" name="q" placeholder="Title starts with..." autofocus>
        <input type="hidden" name="offset" value="0">
        <button type="submit">Search</button>
    </form>"#,
    )
}

fn search_link(q: &str, offset: u64) -> String {
    format!("/search?q={}&offset={}", urlencoding::encode(q), offset)
}

fn search_html(view: &SearchView) -> Response {
    let mut body = String::new();

    if view.has_results() {
        body.push_str(&format!(
            "    <p class=\"muted\">{} titles start with &quot;{}&quot;</p>\n    <ol start=\"{}\">\n",
            view.total,
            escape_html(&view.q),
            view.pagination.offset + 1
        ));
        for row in &view.results {
            body.push_str(&format!(
                "        <li><a href=\"/show/{}\">{}</a></li>\n",
                urlencoding::encode(&row.book_id),
                escape_html(&row.title)
            ));
        }
        body.push_str("    </ol>\n");
    } else {
        body.push_str(&format!(
            "    <p>No titles start with &quot;{}&quot;.</p>\n",
            escape_html(&view.q)
        ));
    }

    body.push_str("    <p>");
    if view.pagination.has_previous() {
        body.push_str(&format!(
            "<a href=\"{}\">Previous</a> ",
            escape_html(&search_link(&view.q, view.pagination.previous))
        ));
    }
    if view.pagination.has_next() {
        body.push_str(&format!(
            "<a href=\"{}\">Next</a>",
            escape_html(&search_link(&view.q, view.pagination.next))
        ));
    }
    body.push_str("</p>");

    Html(layout("Search Results", &body)).into_response()
}

fn search_json(view: &SearchView) -> Response {
    Json(SearchJson::from(view)).into_response()
}

fn book_html(view: &BookView) -> Response {
    let book = &view.book;
    let mut body = String::new();

    if view.has_image() {
        body.push_str(&format!(
            "    <img src=\"{}\" alt=\"Cover of {}\" width=\"160\">\n",
            escape_html(&book.image_url),
            escape_html(&book.title)
        ));
    }

    body.push_str(&format!(
        r#"    <dl>
        <dt>Authors</dt><dd>{authors}</dd>
        <dt>Genres</dt><dd>{genres}</dd>
        <dt>Pages</dt><dd>{pages}</dd>
        <dt>Rating</dt><dd>{rating} ({rating_count} ratings, {review_count} reviews)</dd>
        <dt>Format</dt><dd>{format} {edition}</dd>
    </dl>
    <p>{description}</p>
    <p><a href="/api/{review_path}">Reviews of this title</a></p>"#,
        authors = escape_html(&book.authors),
        genres = escape_html(&book.genres),
        pages = book.pages,
        rating = view.rating_display(),
        rating_count = book.rating_count,
        review_count = book.review_count,
        format = escape_html(&book.format),
        edition = escape_html(&book.edition),
        description = escape_html(&book.description),
        review_path = escape_html(&urlencoding::encode(&book.title)),
    ));

    Html(layout(&book.title, &body)).into_response()
}

fn book_json(view: &BookView) -> Response {
    Json(BookJson::from(view)).into_response()
}

fn book_text(view: &BookView) -> Response {
    let book = &view.book;
    format!(
        "{}\nAuthors: {}\nGenres: {}\nPages: {}\nRating: {} ({} ratings)\n\n{}\n",
        book.title,
        book.authors,
        book.genres,
        book.pages,
        view.rating_display(),
        book.rating_count,
        book.description
    )
    .into_response()
}

/// Render `view` with the renderer registered for `representation`,
/// or the table's first renderer when it has none.
pub fn render<V>(
    table: &[(Representation, Renderer<V>)],
    representation: Representation,
    view: &V,
) -> Response {
    let renderer = table
        .iter()
        .find(|(r, _)| *r == representation)
        .or_else(|| table.first())
        .map(|(_, renderer)| *renderer);

    match renderer {
        Some(renderer) => renderer(view),
        None => axum::http::StatusCode::NOT_ACCEPTABLE.into_response(),
    }
}

/// Representations a renderer table can produce, in table order.
pub fn offered<V>(table: &[(Representation, Renderer<V>)]) -> Vec<Representation> {
    table.iter().map(|(r, _)| *r).collect()
}
