use thiserror::Error;

/// Failure of a search request.
///
/// Every way a `fetch` can go wrong lands here, so callers only need to
/// handle one error type. The status code of a rejected request is kept on
/// [`SearchError::Status`] even though the message stays generic.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The HTTP layer itself failed (connect, timeout, protocol).
    #[error("Failed to fetch search results: {0}")]
    Transport(String),

    /// The API answered with something other than 200.
    #[error("Failed to fetch search results")]
    Status { status: u16 },

    /// A 200 response whose body is not the expected JSON.
    #[error("Failed to fetch search results: {0}")]
    MalformedResponse(String),

    /// `fetch` was called without `new_search`, or twice for one search.
    #[error("No active search: call new_search before configuring or fetching")]
    NoActiveSearch,

    #[error("Failed to serialize search results: {0}")]
    Serialize(String),
}

impl SearchError {
    /// HTTP status of a rejected request, if that is what happened.
    pub fn status(&self) -> Option<u16> {
        match self {
            SearchError::Status { status } => Some(*status),
            _ => None,
        }
    }
}
