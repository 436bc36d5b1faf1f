use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid time range: start - {start} end - {end}")]
    InvalidRange { start: String, end: String },

    #[error("Invalid URL pattern: {0}")]
    InvalidPattern(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {code} for {url}")]
    Status { url: String, code: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0} cannot service this query")]
    Unsupported(&'static str),

    #[error("Query has no time range")]
    MissingTime,

    #[error("No data source can service this query")]
    NoSource,

    #[error("Worker pipeline failed: {0}")]
    Channel(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }
}
