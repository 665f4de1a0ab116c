//! errors
//!
//! Error types for GitLab API operations.
//!
//! # Design
//!
//! Failures form a closed two-kind taxonomy:
//!
//! - [`GitLabError::InvalidIdentifier`]: the caller-supplied project
//!   reference could not be resolved to an id or path form. Raised
//!   synchronously, before any request is sent.
//! - [`GitLabError::Api`]: a request failed in flight, either at the
//!   transport level or with an unexpected HTTP status. Carries a
//!   human-readable description of the failed operation plus the
//!   original cause for diagnostic chaining.
//!
//! Expected absence is not an error: existence checks map a 404 to
//! `false`, and version / raw-file retrieval map a non-200 success
//! status to `None`.

use thiserror::Error;

/// Boxed cause attached to [`GitLabError::Api`].
///
/// Usually a `reqwest::Error` (connection failure or a non-2xx status
/// folded in via `Response::error_for_status`).
pub type ApiCause = Box<dyn std::error::Error + Send + Sync>;

/// Errors from GitLab API operations.
#[derive(Debug, Error)]
pub enum GitLabError {
    /// The supplied project reference is neither a numeric id nor a
    /// usable path form.
    #[error("invalid project identifier: {reference:?}")]
    InvalidIdentifier {
        /// The reference as supplied by the caller
        reference: String,
    },

    /// A request failed at the transport level or returned an
    /// unexpected HTTP status.
    #[error("{context}")]
    Api {
        /// Which operation failed, and against which identifier(s)
        context: String,
        /// The underlying cause
        #[source]
        source: ApiCause,
    },
}

impl GitLabError {
    /// Wrap an underlying failure with operation context.
    pub(crate) fn api(context: impl Into<String>, source: impl Into<ApiCause>) -> Self {
        GitLabError::Api {
            context: context.into(),
            source: source.into(),
        }
    }
}
