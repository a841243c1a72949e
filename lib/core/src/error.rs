use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to load embedding data: {0}")]
    DataLoad(String),

    #[error("user not found: {0}")]
    NotFound(String),

    #[error("no usable posts for user: {0}")]
    NoContent(String),

    #[error("zero-magnitude embedding for user: {0}")]
    DegenerateVector(String),

    #[error("requested {requested} samples but store holds {available} users")]
    InsufficientData { requested: usize, available: usize },

    #[error("could not resolve '{username}': {source}")]
    Resolution {
        username: String,
        #[source]
        source: Box<Error>,
    },

    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("embedding error: {0}")]
    Embed(#[from] EmbedError),
}

impl Error {
    /// Wrap a failure with the username whose resolution caused it.
    pub fn resolving(username: &str, source: Error) -> Self {
        Error::Resolution {
            username: username.to_string(),
            source: Box::new(source),
        }
    }
}

/// Failures at the post-fetching boundary (remote platform API).
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("account does not exist: {0}")]
    UserNotFound(String),

    #[error("rate limited by platform API{}", .retry_after.map(|s| format!(", retry after {s}s")).unwrap_or_default())]
    RateLimited { retry_after: Option<u64> },

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("platform API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Failures at the sentence-encoding boundary (embedding model).
#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("encoder service error: {0}")]
    Service(String),

    #[error("encoder request timed out")]
    Timeout,

    #[error("encoder returned {actual} vectors for a batch of {expected}")]
    BatchShape { expected: usize, actual: usize },

    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
