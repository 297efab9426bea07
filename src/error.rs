use thiserror::Error;

/// Failure taxonomy for one scrape invocation. Every variant is fatal for
/// the race being processed; there is no retry policy. A missing
/// reporting-percentage label is not an error (the request URL is
/// substituted instead, see `summary::parse_race_summary`).
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("network request failed for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// The page no longer matches the expected table layout (fewer than
    /// three tables, a row narrower than the header, a missing "Name"
    /// column, ...). The site template has changed.
    #[error("page structure mismatch: {0}")]
    Structure(String),

    #[error("invalid selection: {0}")]
    Selection(String),

    #[error("building fetch thread pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
