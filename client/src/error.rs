//! Error types of the discovery client.

use crate::http_utils::transport::TransportError;

/// Failure of a discovery API call made by the search store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The API answered with a non-success status.
    #[error("discovery API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not the expected JSON shape.
    #[error("could not decode discovery response: {0}")]
    Decode(String),

    /// A newer search (or a clear) replaced the results this call was for.
    #[error("superseded by a newer search")]
    Superseded,
}

impl From<TransportError> for SearchError {
    fn from(err: TransportError) -> Self {
        SearchError::Transport(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("login flow replaced by a newer one")]
    Superseded,

    #[error("login window closed before completing")]
    PopupClosed,
}
