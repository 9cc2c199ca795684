//! Error types for configuration loading and back-end access.

use thiserror::Error;

/// An error loading or validating the gateway configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        /// Path of the file that could not be read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration was not valid JSON of the expected shape.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A `${NAME}` placeholder named an unset variable and carried no default.
    #[error("unresolved environment variable: {name}")]
    UnresolvedVariable {
        /// The variable name.
        name: String,
    },

    /// `chunkSize` was zero.
    #[error("chunkSize must be at least 1")]
    InvalidChunkSize,
}

/// An error from a back-end HTTP call.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The back end answered with a non-success HTTP status.
    ///
    /// `message` is the decoded error body: the `errorMessage` field when
    /// the body is JSON, the raw body otherwise.
    #[error("back end returned HTTP {status}: {message}")]
    Http {
        /// The HTTP status code.
        status: u16,
        /// The decoded error message.
        message: String,
    },

    /// The request never produced a response (connect, timeout, TLS...).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A successful login response carried no `X-Okapi-token` header.
    #[error("login response carried no X-Okapi-token header")]
    MissingToken,

    /// A successful response body could not be decoded.
    #[error("invalid response body: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

impl BackendError {
    /// The message reported to the client as diagnostic addinfo.
    pub fn message(&self) -> String {
        match self {
            BackendError::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Decodes a back-end error body.
///
/// Bodies that begin with `{` are parsed as JSON and the `errorMessage`
/// field used; anything else is used verbatim.
pub(crate) fn decode_error_body(body: &str) -> String {
    if body.starts_with('{') {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
            if let Some(message) = value.get("errorMessage").and_then(|m| m.as_str()) {
                return message.to_string();
            }
        }
    }
    body.to_string()
}
