use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewError {
    /// The request URL carries the API key, so it is never kept here.
    #[error("review API request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("review API answered with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("review API returned an unexpected payload: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ReviewError {
    fn from(err: reqwest::Error) -> Self {
        ReviewError::Transport(err.without_url())
    }
}
