use serde::Deserialize;
use thiserror::Error;

/// A server-supplied error detail.
///
/// The backend reports validation failures as an array of strings and
/// everything else as a single string; `untagged` lets serde accept both.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
    Text(String),
    List(Vec<String>),
}

impl ServerMessage {
    /// Flatten the message into a single string, joining list entries
    /// with the given separator.
    pub fn join(&self, sep: &str) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::List(parts) => parts.join(sep),
        }
    }
}

/// Top-level error type for the `shopsync-api` crate.
///
/// Covers every failure mode of the resource clients: transport,
/// HTTP-status errors with an optional structured body, and payloads the
/// normalization layer cannot accept. `shopsync-core` maps these into
/// user-facing messages -- nothing here is meant for direct display.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Non-2xx response from the API, with the parsed error body when the
    /// server sent one.
    #[error("API error (HTTP {status})")]
    Api {
        status: u16,
        message: Option<ServerMessage>,
    },

    /// The response body could not be normalized into the expected shape.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// The HTTP status behind this error, if one was received.
    ///
    /// Connectivity failures have no status -- the request never completed.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The server-supplied error detail, if any.
    pub fn server_message(&self) -> Option<&ServerMessage> {
        match self {
            Self::Api { message, .. } => message.as_ref(),
            _ => None,
        }
    }

    /// Returns `true` when the server was never reached (the browser-era
    /// "status 0" case): connection refused, DNS failure, or timeout.
    pub fn is_connectivity(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }

    /// Returns `true` if this error means the credential is invalid or
    /// expired and re-authentication might resolve it.
    pub fn is_auth_invalid(&self) -> bool {
        self.status() == Some(401)
    }
}
