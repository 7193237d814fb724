//! Review list pages proxied from the external review API.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    response::Html,
    routing::get,
    Router,
};
use booklist_http::AppError;
use booklist_kernel::{InitCtx, Module};
use booklist_reviews::{ReviewGateway, ReviewList};

use crate::utils::{escape_html, layout};

#[derive(Clone)]
struct ReviewsState {
    gateway: Arc<dyn ReviewGateway>,
}

pub struct ReviewsModule {
    gateway: Arc<dyn ReviewGateway>,
}

impl ReviewsModule {
    pub fn new(gateway: Arc<dyn ReviewGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Module for ReviewsModule {
    fn name(&self) -> &'static str {
        "reviews"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            endpoint = %ctx.settings.reviews.endpoint,
            "reviews module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/api/{title}", get(show_reviews))
            .with_state(ReviewsState {
                gateway: self.gateway.clone(),
            })
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/api/{title}": {
                    "get": {
                        "summary": "Reviews of a title",
                        "tags": ["Reviews"],
                        "parameters": [{
                            "name": "title",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "string" }
                        }],
                        "responses": {
                            "200": {
                                "description": "Review list page",
                                "content": { "text/html": { "schema": { "type": "string" } } }
                            },
                            "500": {
                                "description": "Review API unreachable or malformed",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }))
    }
}

async fn show_reviews(
    State(state): State<ReviewsState>,
    Path(title): Path<String>,
) -> Result<Html<String>, AppError> {
    let list = state.gateway.fetch_reviews(&title).await?;
    tracing::debug!(title = %title, result_count = list.result_count, "rendering reviews");
    Ok(Html(review_page(&title, &list)))
}

fn review_page(title: &str, list: &ReviewList) -> String {
    let mut body = String::new();

    if list.result_count > 0 && !list.results.is_empty() {
        body.push_str("    <ul>\n");
        for review in &list.results {
            body.push_str(&format!(
                r#"        <li>
            <strong>{title}</strong> by {author}<br>
            <span class="muted">Reviewed by {byline} on {date}</span>
            <p>{summary}</p>
            <a href="{url}">Read the review</a>
        </li>
"#,
                title = escape_html(&review.title),
                author = escape_html(&review.author),
                byline = escape_html(&review.byline),
                date = escape_html(&review.date),
                summary = escape_html(&review.summary),
                url = escape_html(&review.url),
            ));
        }
        body.push_str("    </ul>\n");
    } else {
        body.push_str("    <p>No reviews found.</p>\n");
    }

    body.push_str(&format!(
        "    <p class=\"muted\">{}</p>",
        escape_html(&list.copyright)
    ));

    layout(&format!("Reviews of {}", title), &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use booklist_reviews::Review;

    #[test]
    fn empty_list_renders_a_notice_and_copyright() {
        let page = review_page(
            "Zzz",
            &ReviewList {
                results: Vec::new(),
                result_count: 0,
                copyright: "Copyright (c) NYT".to_string(),
            },
        );
        assert!(page.contains("No reviews found."));
        assert!(page.contains("Copyright (c) NYT"));
    }

    #[test]
    fn entries_are_escaped() {
        let page = review_page(
            "1Q84",
            &ReviewList {
                results: vec![Review {
                    title: "1Q84".to_string(),
                    author: "Haruki Murakami".to_string(),
                    byline: "JANET MASLIN".to_string(),
                    date: "2011-11-10".to_string(),
                    summary: "Two <moons>".to_string(),
                    url: "http://example.test/review".to_string(),
                }],
                result_count: 1,
                copyright: "c".to_string(),
            },
        );
        assert!(page.contains("Two &lt;moons&gt;"));
        assert!(page.contains("Reviewed by JANET MASLIN on 2011-11-10"));
        assert!(page.contains("href=\"http://example.test/review\""));
    }
}
