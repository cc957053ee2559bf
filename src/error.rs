use std::fmt;

/// Unified error type for collection loading, persistence and API operations
#[derive(Debug)]
pub enum CollectionError {
    /// HTTP request failed (network error, timeout, etc.)
    Network(reqwest::Error),
    /// Failed to parse a JSON blob (cart, image cache, API response)
    Parse(serde_json::Error),
    /// CSV file could not be read or decoded
    Csv(csv::Error),
    /// Required columns are missing from the inventory header row
    MissingColumns(Vec<String>),
    /// HTTP error status code
    HttpStatus(reqwest::StatusCode),
    /// File I/O error
    Io(std::io::Error),
    /// Cache operation failed
    Cache(String),
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionError::Network(e) => write!(f, "Network error: {}", e),
            CollectionError::Parse(e) => write!(f, "Parse error: {}", e),
            CollectionError::Csv(e) => write!(f, "CSV error: {}", e),
            CollectionError::MissingColumns(cols) => {
                write!(f, "Missing required columns: {}", cols.join(", "))
            }
            CollectionError::HttpStatus(status) => write!(f, "HTTP error: {}", status),
            CollectionError::Io(e) => write!(f, "I/O error: {}", e),
            CollectionError::Cache(msg) => write!(f, "Cache error: {}", msg),
        }
    }
}

impl std::error::Error for CollectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectionError::Network(e) => Some(e),
            CollectionError::Parse(e) => Some(e),
            CollectionError::Csv(e) => Some(e),
            CollectionError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CollectionError {
    fn from(err: reqwest::Error) -> Self {
        CollectionError::Network(err)
    }
}

impl From<serde_json::Error> for CollectionError {
    fn from(err: serde_json::Error) -> Self {
        CollectionError::Parse(err)
    }
}

impl From<csv::Error> for CollectionError {
    fn from(err: csv::Error) -> Self {
        CollectionError::Csv(err)
    }
}

impl From<std::io::Error> for CollectionError {
    fn from(err: std::io::Error) -> Self {
        CollectionError::Io(err)
    }
}

/// Result type alias for collection operations
pub type CollectionResult<T> = Result<T, CollectionError>;
