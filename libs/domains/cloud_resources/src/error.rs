use thiserror::Error;

pub type ResourceResult<T> = Result<T, ResourceError>;

/// Errors raised while ingesting a resource graph
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Failed to read resource graph [{path}]: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Resource graph [{path}] is not valid: {source}")]
    InvalidDocument {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Resource graph is not valid: {0}")]
    Parse(#[from] serde_json::Error),
}
