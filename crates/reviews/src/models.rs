use serde::{Deserialize, Serialize};

/// One review as shown on the review list page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    pub title: String,
    pub author: String,
    pub byline: String,
    pub date: String,
    pub summary: String,
    pub url: String,
}

/// Reviews for one title, plus the attribution the API requires us to show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewList {
    pub results: Vec<Review>,
    pub result_count: usize,
    pub copyright: String,
}

// Wire format of `GET /reviews.json`. Only the fields we render are required.

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewsResponse {
    pub copyright: String,
    #[serde(default)]
    pub num_results: Option<usize>,
    pub results: Vec<ReviewEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewEntry {
    pub url: Option<String>,
    pub publication_dt: Option<String>,
    pub byline: Option<String>,
    pub book_title: Option<String>,
    pub book_author: Option<String>,
    pub summary: Option<String>,
}

impl From<ReviewsResponse> for ReviewList {
    fn from(response: ReviewsResponse) -> Self {
        let results: Vec<Review> = response
            .results
            .into_iter()
            .map(|entry| Review {
                title: entry.book_title.unwrap_or_default(),
                author: entry.book_author.unwrap_or_default(),
                byline: entry.byline.unwrap_or_default(),
                date: entry.publication_dt.unwrap_or_default(),
                summary: entry.summary.unwrap_or_default(),
                url: entry.url.unwrap_or_default(),
            })
            .collect();

        Self {
            result_count: response.num_results.unwrap_or(results.len()),
            results,
            copyright: response.copyright,
        }
    }
}
