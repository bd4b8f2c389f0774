use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Scraping error: {0}")]
    Scraping(String),

    #[error("Email error: {0}")]
    Email(String),

    /// Writing the digest or preview failed.
    #[error("Report error: {0}")]
    Report(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Timeouts and refused connections. Scrapers count these separately
    /// from other failures.
    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl Error {
    /// Maps a transport failure to `Timeout` when it is one, `Http` otherwise.
    pub fn from_request(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Error::Timeout(err.to_string())
        } else {
            Error::Http(err)
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
