//! Unified error types for pagesift.
//!
//! Every variant carries a stable UPPER_SNAKE code prefix so downstream
//! consumers can match on the rendered message as well as the variant.
//! The batch operations never let these escape the per-URL boundary:
//! there they become empty records or a "try the next candidate" signal.

/// Unified error types for the extraction engine.
///
/// Deliberately narrow: a body exceeding the download cap is not an
/// error (bounded fetches return `Ok(None)`), and extraction failures
/// surface as empty records rather than variants here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// URL failed normalization or parsing.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Request exceeded its timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Network-level failure or non-2xx HTTP status.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),
}
