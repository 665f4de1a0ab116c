//! gitlab-client - A minimal async client for the GitLab REST API (v4)
//!
//! This crate resolves a user-supplied project reference (numeric id,
//! namespace path, or full URL) into the correct API endpoint and maps
//! HTTP outcomes into domain-meaningful values: parsed bodies for
//! lookups, booleans for existence checks and commit submission, typed
//! errors for everything unexpected.
//!
//! # Architecture
//!
//! - [`identifier`] - Project identifier resolution (pure)
//! - [`client`] - The API client and its operations
//! - [`errors`] - Closed error taxonomy
//!
//! # Error contract
//!
//! Failures are either [`GitLabError::InvalidIdentifier`] (raised
//! before any request is sent) or [`GitLabError::Api`] (transport
//! failure or unexpected status, with the original cause chained).
//! Expected absence is not an error: existence checks return `false`
//! on a 404, and version / raw-file retrieval return `None` on a
//! non-200 success status.
//!
//! # Example
//!
//! ```ignore
//! use gitlab_client::GitLabClient;
//!
//! let client = GitLabClient::new("gitlab.example.com", "glpat-xxx", false);
//!
//! let branches = client.get_branches("group/proj").await?;
//! if client.branch_exists(42, "main").await? {
//!     client.post_commit(42, &payload).await?;
//! }
//! ```

pub mod client;
pub mod errors;
pub mod identifier;

pub use client::GitLabClient;
pub use errors::GitLabError;
pub use identifier::ProjectId;
