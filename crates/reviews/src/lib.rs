//! Gateway to the New York Times Books reviews API.

use std::time::Duration;

use async_trait::async_trait;
use booklist_kernel::settings::ReviewSettings;
use secrecy::{ExposeSecret, Secret};

pub mod error;
pub mod models;

pub use error::ReviewError;
pub use models::{Review, ReviewList};

use models::ReviewsResponse;

/// The narrow interface the catalog uses to look up reviews for a title.
/// Implementations must never hand back a partially parsed list.
#[async_trait]
pub trait ReviewGateway: Send + Sync {
    async fn fetch_reviews(&self, title: &str) -> Result<ReviewList, ReviewError>;
}

/// `ReviewGateway` backed by `GET {endpoint}/reviews.json`.
#[derive(Clone)]
pub struct NytReviewClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Secret<String>,
}

impl NytReviewClient {
    pub fn new(settings: &ReviewSettings) -> Result<Self, ReviewError> {
        if settings.api_key.expose_secret().is_empty() {
            tracing::warn!("review API key is not configured; upstream calls will be rejected");
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        })
    }

    fn reviews_url(&self) -> String {
        format!("{}/reviews.json", self.endpoint)
    }
}

#[async_trait]
impl ReviewGateway for NytReviewClient {
    async fn fetch_reviews(&self, title: &str) -> Result<ReviewList, ReviewError> {
        let response = self
            .client
            .get(self.reviews_url())
            .query(&[("title", title), ("api-key", self.api_key.expose_secret().as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ReviewError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let list = parse_reviews(&body)?;
        tracing::debug!(title, result_count = list.result_count, "fetched reviews");
        Ok(list)
    }
}

/// Decode a `reviews.json` body, rejecting anything without the expected shape.
pub fn parse_reviews(body: &str) -> Result<ReviewList, ReviewError> {
    serde_json::from_str::<ReviewsResponse>(body)
        .map(ReviewList::from)
        .map_err(|e| ReviewError::Malformed(e.to_string()))
}
