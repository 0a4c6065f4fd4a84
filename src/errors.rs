use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum SyncError {
    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),
    #[error("Selector error: {0}")]
    SelectorError(String),
    #[error("Fetch error: {0}")]
    FetchError(#[from] reqwest::Error),
    #[error("Unexpected status {status} fetching {url}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
    },
    #[error("Missing configuration: {0}")]
    MissingConfig(&'static str),
    #[error("Notion API error: {0}")]
    NotionError(String),
}
