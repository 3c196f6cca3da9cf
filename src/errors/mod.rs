use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    // Request errors
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0}")]
    HttpStatus(u16),

    // Parsing errors
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected response shape: {0}")]
    ResponseShape(String),

    // Storage errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // User input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidPreference { key: String, value: String },
}

pub type NewsResult<T> = Result<T, NewsError>;
