use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DhelpError {
    #[error("Nothing exists at {}", .0.display())]
    NotFound(PathBuf),

    #[error("Page not found: {0}")]
    UrlNotFound(String),

    #[error("{} is not a {expected}", path.display())]
    WrongKind { path: PathBuf, expected: &'static str },

    #[error("Item exists at {} and overwrite not specified", .0.display())]
    OverwriteDenied(PathBuf),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Unsupported text encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("{language} backend is missing {missing}; run setup() first")]
    BackendUnavailable { language: String, missing: String },

    #[error("Transform failed on record {record}: {source}")]
    TransformFailed {
        record: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Fetching {url} failed after {attempts} attempt(s): {reason}")]
    FetchFailed {
        url: String,
        attempts: u32,
        reason: String,
    },

    #[error("Invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid CSS selector: {0}")]
    Selector(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, DhelpError>;
