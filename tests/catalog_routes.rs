use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use booklist_app::register_all;
use booklist_db::{models::BookRow, BookStore, MemoryBookStore};
use booklist_kernel::{settings::Settings, ModuleRegistry};
use booklist_reviews::{parse_reviews, Review, ReviewError, ReviewGateway, ReviewList};
use serde_json::Value;
use tower::ServiceExt;

enum StubReviews {
    Empty,
    Listed,
    Malformed,
}

#[async_trait]
impl ReviewGateway for StubReviews {
    async fn fetch_reviews(&self, title: &str) -> Result<ReviewList, ReviewError> {
        match self {
            StubReviews::Empty => Ok(ReviewList {
                results: Vec::new(),
                result_count: 0,
                copyright: "Copyright (c) test".to_string(),
            }),
            StubReviews::Listed => Ok(ReviewList {
                results: vec![Review {
                    title: title.to_string(),
                    author: "Haruki Murakami".to_string(),
                    byline: "JANET MASLIN".to_string(),
                    date: "2011-11-10".to_string(),
                    summary: "Two moons.".to_string(),
                    url: "http://example.test/review".to_string(),
                }],
                result_count: 1,
                copyright: "Copyright (c) test".to_string(),
            }),
            StubReviews::Malformed => parse_reviews(r#"{"fault":"Invalid ApiKey"}"#),
        }
    }
}

fn catalog_rows() -> Vec<BookRow> {
    let mut rows = vec![BookRow {
        book_id: "1".to_string(),
        title: "Good Omens".to_string(),
        authors: Some("Terry Pratchett|Neil Gaiman".to_string()),
        genres: Some("Fantasy|Humor|Fiction".to_string()),
        description: Some("The world ends on a Saturday.".to_string()),
        pages: Some(412),
        rating: Some(4.25),
        rating_count: Some(500_000),
        ..Default::default()
    }];
    for n in 1..=23 {
        rows.push(BookRow {
            book_id: format!("t{:02}", n),
            title: format!("The Book {:02}", n),
            authors: Some("Anonymous".to_string()),
            ..Default::default()
        });
    }
    rows
}

fn app_with(store: Arc<dyn BookStore>, reviews: StubReviews) -> Router {
    let mut registry = ModuleRegistry::new();
    register_all(&mut registry, store, Arc::new(reviews));
    booklist_http::build_router(&registry, &Settings::default())
}

fn app() -> (Router, Arc<MemoryBookStore>) {
    let store = Arc::new(MemoryBookStore::new(catalog_rows(), 4));
    (app_with(store.clone(), StubReviews::Empty), store)
}

async fn get(app: &Router, uri: &str, accept: Option<&str>) -> Response {
    let mut request = Request::get(uri);
    if let Some(accept) = accept {
        request = request.header(header::ACCEPT, accept);
    }
    app.clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

fn content_type(response: &Response) -> &str {
    response.headers()[header::CONTENT_TYPE].to_str().unwrap()
}

#[tokio::test]
async fn landing_page_renders_search_form() {
    let (app, _) = app();
    let response = get(&app, "/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("text/html"));
    assert!(body_text(response).await.contains("action=\"/search\""));
}

#[tokio::test]
async fn first_page_of_a_prefix_search() {
    let (app, store) = app();
    let response = get(&app, "/search?q=The&offset=0", Some("application/json")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["total"], 23);
    assert_eq!(json["hasResults"], true);
    assert_eq!(json["previousOffset"], 0);
    assert_eq!(json["nextOffset"], 10);
    assert_eq!(json["results"].as_array().unwrap().len(), 10);
    assert_eq!(json["results"][0]["title"], "The Book 01");
    assert_eq!(store.leased(), 0);
}

#[tokio::test]
async fn last_page_stays_put() {
    let (app, _) = app();
    let json = body_json(get(&app, "/search?q=The&offset=20", Some("application/json")).await).await;
    assert_eq!(json["results"].as_array().unwrap().len(), 3);
    assert_eq!(json["previousOffset"], 10);
    assert_eq!(json["nextOffset"], 20);
}

#[tokio::test]
async fn search_without_matches_is_empty_not_an_error() {
    let (app, _) = app();
    let response = get(&app, "/search?q=Zzz", Some("application/json")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["total"], 0);
    assert_eq!(json["hasResults"], false);
    assert_eq!(json["previousOffset"], 0);
    assert_eq!(json["nextOffset"], 0);
}

#[tokio::test]
async fn invalid_offset_degrades_to_zero() {
    let (app, _) = app();
    for uri in [
        "/search?q=The&offset=abc",
        "/search?q=The&offset=-5",
        "/search?q=The",
        "/search?q=The&offset=&offset=20",
    ] {
        let response = get(&app, uri, Some("application/json")).await;
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        let json = body_json(response).await;
        assert_eq!(json["results"][0]["title"], "The Book 01", "{}", uri);
        assert_eq!(json["previousOffset"], 0, "{}", uri);
    }
}

#[tokio::test]
async fn repeated_query_keys_use_the_first_value() {
    let (app, _) = app();
    let response = get(&app, "/search?q=The&q=Dune&offset=10&offset=20", Some("application/json")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["q"], "The");
    assert_eq!(json["results"][0]["title"], "The Book 11");
    assert_eq!(json["previousOffset"], 0);
    assert_eq!(json["nextOffset"], 20);
}

#[tokio::test]
async fn search_defaults_to_html() {
    let (app, _) = app();
    let response = get(&app, "/search?q=The", None).await;
    assert!(content_type(&response).starts_with("text/html"));
    let body = body_text(response).await;
    assert!(body.contains("href=\"/show/t01\""));
    assert!(body.contains("/search?q=The&amp;offset=10"));
}

#[tokio::test]
async fn book_json_has_exactly_eight_normalized_fields() {
    let (app, _) = app();
    let response = get(&app, "/show/1", Some("application/json")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json.as_object().unwrap().len(), 8);
    assert_eq!(json["authors"], "Terry Pratchett, Neil Gaiman");
    assert_eq!(json["genre"], "Fantasy, Humor, Fiction");
    assert_eq!(json["summary"], "The world ends on a Saturday.");
    assert_eq!(json["ratingCount"], 500_000);
}

#[tokio::test]
async fn book_representations_follow_accept() {
    let (app, _) = app();

    let html = get(&app, "/show/1", Some("text/html")).await;
    assert!(content_type(&html).starts_with("text/html"));
    assert!(body_text(html).await.contains("Terry Pratchett, Neil Gaiman"));

    let text = get(&app, "/show/1", Some("text/plain")).await;
    assert!(content_type(&text).starts_with("text/plain"));

    let unmatched = get(&app, "/show/1", Some("image/png")).await;
    assert!(content_type(&unmatched).starts_with("text/plain"));

    let browser = get(&app, "/show/1", None).await;
    assert!(content_type(&browser).starts_with("text/html"));
}

#[tokio::test]
async fn missing_book_is_404() {
    let (app, store) = app();
    let response = get(&app, "/show/42", Some("application/json")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(store.leased(), 0);
}

#[tokio::test]
async fn query_failure_is_500_and_releases_the_lease() {
    let store = Arc::new(
        MemoryBookStore::new(catalog_rows(), 2)
            .failing_on_prefix("Broken")
            .failing_on_id("1"),
    );
    let app = app_with(store.clone(), StubReviews::Empty);

    let search = get(&app, "/search?q=Broken", None).await;
    assert_eq!(search.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let show = get(&app, "/show/1", None).await;
    assert_eq!(show.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(store.leased(), 0);
}

#[tokio::test]
async fn concurrent_requests_leave_no_lease_outstanding() {
    let store = Arc::new(MemoryBookStore::new(catalog_rows(), 3).failing_on_prefix("Broken"));
    let app = app_with(store.clone(), StubReviews::Empty);

    let mut tasks = Vec::new();
    for n in 0..48 {
        let app = app.clone();
        let uri = match n % 4 {
            0 => "/search?q=The".to_string(),
            1 => "/search?q=Broken".to_string(),
            2 => "/show/1".to_string(),
            _ => format!("/show/missing-{}", n),
        };
        tasks.push(tokio::spawn(async move { get(&app, &uri, None).await.status() }));
    }

    let mut statuses = Vec::new();
    for task in tasks {
        statuses.push(task.await.unwrap());
    }

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::OK).count(), 24);
    assert_eq!(
        statuses
            .iter()
            .filter(|s| **s == StatusCode::INTERNAL_SERVER_ERROR)
            .count(),
        12
    );
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::NOT_FOUND).count(), 12);
    assert_eq!(store.leased(), 0);
}

#[tokio::test]
async fn reviews_render_entries_and_copyright() {
    let app = app_with(Arc::new(MemoryBookStore::demo()), StubReviews::Listed);
    let response = get(&app, "/api/1Q84", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Reviewed by JANET MASLIN"));
    assert!(body.contains("Copyright (c) test"));
}

#[tokio::test]
async fn empty_review_list_is_not_an_error() {
    let app = app_with(Arc::new(MemoryBookStore::demo()), StubReviews::Empty);
    let response = get(&app, "/api/Zzz", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("No reviews found."));
}

#[tokio::test]
async fn upstream_failure_is_500_without_a_partial_page() {
    let app = app_with(Arc::new(MemoryBookStore::demo()), StubReviews::Malformed);
    let response = get(&app, "/api/anytitle", None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(content_type(&response).starts_with("application/json"));
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "upstream_error");
}

#[tokio::test]
async fn unmatched_paths_redirect_to_the_landing_page() {
    let (app, _) = app();
    for uri in ["/nowhere", "/show", "/show/1/extra"] {
        let response = get(&app, uri, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }
}

#[tokio::test]
async fn openapi_document_lists_module_routes() {
    let (app, _) = app();
    let json = body_json(get(&app, "/docs/openapi.json", None).await).await;
    assert!(json["paths"]["/search"]["get"].is_object());
    assert!(json["paths"]["/show/{id}"]["get"].is_object());
    assert!(json["paths"]["/api/{title}"]["get"].is_object());
}
