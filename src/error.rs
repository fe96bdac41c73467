use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown integer type: {0}")]
    UnknownType(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    Connection(#[from] diesel::ConnectionError),

    #[error("Query error: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("Enumeration error: {0}")]
    Enumeration(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Invalid database url: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
