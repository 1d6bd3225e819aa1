use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Request signing failures.
///
/// A signing failure aborts the request in progress. Callers must never
/// retry it or fall back to sending the request unsigned.
#[derive(Error, Debug)]
pub enum SigningError {
    #[error("failed to read private key {path}: {source}")]
    ReadKey {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid private key material: {0}")]
    InvalidKey(String),

    #[error("failed to produce signature: {0}")]
    Sign(String),

    #[error("signature header is not a valid header value: {0}")]
    Header(String),
}

/// Structured error returned by the exchange inside an HTTP response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("exchange rejected request ({code}): {message}")]
pub struct ExchangeError {
    pub code: String,
    pub message: String,
}

impl ExchangeError {
    pub const INSUFFICIENT_BALANCE: &'static str = "insufficient_balance";

    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// True when the account cannot fund the order.
    #[must_use]
    pub fn is_insufficient_balance(&self) -> bool {
        self.code == Self::INSUFFICIENT_BALANCE
    }
}

/// Unexpected or malformed streaming feed payloads.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("malformed feed message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{msg_type} message has no payload")]
    MissingPayload { msg_type: String },

    #[error("invalid price level in {msg_type}: {source}")]
    InvalidLevel {
        msg_type: String,
        #[source]
        source: DomainError,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("live order check failed: {0}")]
    OrderCheck(String),
}

impl Error {
    /// The exchange's structured rejection, if this error carries one.
    #[must_use]
    pub const fn as_exchange(&self) -> Option<&ExchangeError> {
        match self {
            Self::Exchange(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::WebSocket(Box::new(err))
    }
}
