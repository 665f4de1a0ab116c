//! identifier
//!
//! Project identifier resolution.
//!
//! GitLab addresses a project either by its numeric id or by its
//! namespace path (`group/project`, URL-encoded on the wire). Callers
//! may supply either form, or a full web URL copied out of a browser;
//! [`ProjectId::resolve`] normalizes all of them once, at the boundary,
//! so the client never re-checks "id or path?" per call site.

use std::fmt;

use crate::errors::GitLabError;

/// A resolved reference to a GitLab project.
///
/// Exactly one form is populated: the numeric project id, or the
/// namespace path with no surrounding slashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectId {
    /// Numeric project id
    Id(u64),
    /// Namespace path, e.g. `group/project`
    Path(String),
}

impl ProjectId {
    /// Resolve a caller-supplied project reference against a base URL.
    ///
    /// - An integer-valued reference becomes [`ProjectId::Id`].
    /// - A reference starting with `base_url` has that prefix stripped
    ///   and the remainder taken as the namespace path.
    /// - Any other non-empty reference is taken as the path verbatim.
    ///
    /// Leading and trailing slashes are trimmed from paths. A reference
    /// that is empty, or that reduces to an empty path, fails with
    /// [`GitLabError::InvalidIdentifier`].
    ///
    /// # Example
    ///
    /// ```
    /// use gitlab_client::ProjectId;
    ///
    /// let base = "https://gitlab.example.com";
    /// assert_eq!(ProjectId::resolve(base, "42").unwrap(), ProjectId::Id(42));
    /// assert_eq!(
    ///     ProjectId::resolve(base, "https://gitlab.example.com/group/proj/").unwrap(),
    ///     ProjectId::Path("group/proj".to_string()),
    /// );
    /// ```
    pub fn resolve(base_url: &str, reference: &str) -> Result<Self, GitLabError> {
        if let Ok(id) = reference.parse::<u64>() {
            return Ok(ProjectId::Id(id));
        }

        let rest = reference.strip_prefix(base_url).unwrap_or(reference);
        let path = rest.trim_matches('/');
        if path.is_empty() {
            return Err(GitLabError::InvalidIdentifier {
                reference: reference.to_string(),
            });
        }
        Ok(ProjectId::Path(path.to_string()))
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectId::Id(id) => write!(f, "{}", id),
            ProjectId::Path(path) => write!(f, "{}", path),
        }
    }
}
