//! client
//!
//! GitLab API client over REST v4.
//!
//! # Design
//!
//! [`GitLabClient`] holds an immutable configuration (normalized base
//! URL, access token, verbose flag) and one `reqwest::Client`. Each
//! operation builds a URL under the `/api/v4` root, issues a single
//! request, and maps the response:
//!
//! - lookups (`get_project`, `get_branches`) return the parsed JSON
//!   body, wrapping any failure in [`GitLabError::Api`];
//! - existence checks (`branch_exists`, `file_exists`) map a 404 to
//!   `false` instead of an error;
//! - commit submission (`post_commit`, `post_snippet_commit`) reports
//!   `true` only for status 201, `false` for any other success status;
//! - `get_raw_file` and `get_version` map a non-200 success status to
//!   `None`.
//!
//! # Authentication
//!
//! Every request carries the access token in the `PRIVATE-TOKEN`
//! header. No refresh or OAuth flow exists at this layer; the token is
//! whatever the caller constructed the client with.
//!
//! # Example
//!
//! ```ignore
//! use gitlab_client::GitLabClient;
//!
//! let client = GitLabClient::new("gitlab.example.com", "glpat-xxx", false);
//!
//! let project = client.get_project("group/proj").await?;
//! if client.branch_exists(42, "main").await? {
//!     let ok = client.post_commit(42, &payload).await?;
//! }
//! ```

use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::errors::GitLabError;
use crate::identifier::ProjectId;

/// Fixed API path prefix under which all endpoints are addressed.
const API_PREFIX: &str = "/api/v4";

/// Request header carrying the access token.
const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Client for the GitLab REST API.
///
/// Holds no mutable state: all methods take `&self`, so one client may
/// be shared across tasks and calls may be issued concurrently. The
/// client imposes no ordering, retry, or timeout policy of its own;
/// connection handling is whatever `reqwest` does by default.
pub struct GitLabClient {
    /// HTTP client for making requests
    http: Client,
    /// Normalized base URL (secure scheme, no trailing slash)
    base_url: String,
    /// Base URL plus the fixed API path prefix
    api_root: String,
    /// Access token, sent with every request
    token: String,
    /// Log each request line before issuing it
    verbose: bool,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitLabClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitLabClient")
            .field("base_url", &self.base_url)
            .field("api_root", &self.api_root)
            .field("has_token", &!self.token.is_empty())
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl GitLabClient {
    /// Create a new client.
    ///
    /// The base URL is normalized before use: `http://` is rewritten to
    /// `https://`, a missing scheme gets `https://` prepended, and
    /// trailing slashes are removed.
    ///
    /// # Example
    ///
    /// ```
    /// use gitlab_client::GitLabClient;
    ///
    /// let client = GitLabClient::new("http://gitlab.example.com/", "glpat-xxx", false);
    /// assert_eq!(client.base_url(), "https://gitlab.example.com");
    /// assert_eq!(client.api_root(), "https://gitlab.example.com/api/v4");
    /// ```
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, verbose: bool) -> Self {
        Self::from_base_url(normalize_base_url(&base_url.into()), token, verbose)
    }

    /// Create a client that uses `base_url` as given, apart from
    /// trailing-slash removal.
    ///
    /// [`new`] rewrites the scheme to HTTPS; this constructor skips the
    /// rewrite, for instances reachable only over plain HTTP (local
    /// test servers, for instance).
    ///
    /// [`new`]: GitLabClient::new
    pub fn with_base_url(
        base_url: impl Into<String>,
        token: impl Into<String>,
        verbose: bool,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self::from_base_url(base_url, token, verbose)
    }

    fn from_base_url(base_url: String, token: impl Into<String>, verbose: bool) -> Self {
        let api_root = format!("{}{}", base_url, API_PREFIX);
        Self {
            http: Client::new(),
            base_url,
            api_root,
            token: token.into(),
            verbose,
        }
    }

    /// Get the normalized base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the API root (base URL plus `/api/v4`).
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// Build the projects endpoint URL for a caller-supplied reference.
    ///
    /// A numeric reference addresses the project by id; anything else
    /// resolves to a namespace path, which is percent-encoded into a
    /// single URL segment per GitLab's encoded-path convention.
    ///
    /// # Errors
    ///
    /// [`GitLabError::InvalidIdentifier`] if the reference resolves to
    /// neither form.
    pub fn project_url(&self, reference: &str) -> Result<String, GitLabError> {
        let url = match ProjectId::resolve(&self.base_url, reference)? {
            ProjectId::Id(id) => format!("{}/projects/{}", self.api_root, id),
            ProjectId::Path(path) => {
                format!("{}/projects/{}", self.api_root, urlencoding::encode(&path))
            }
        };
        Ok(url)
    }

    /// Fetch a project.
    ///
    /// Returns the project as parsed JSON; the body is not validated
    /// against any schema at this layer.
    pub async fn get_project(&self, reference: &str) -> Result<Value, GitLabError> {
        let url = self.project_url(reference)?;
        let context = format!("fetching project {}", reference);
        let resp = self.get(&url, &context).await?;
        self.json_body(resp, &context).await
    }

    /// List a project's branches.
    pub async fn get_branches(&self, reference: &str) -> Result<Value, GitLabError> {
        let url = format!("{}/repository/branches", self.project_url(reference)?);
        let context = format!("listing branches of project {}", reference);
        let resp = self.get(&url, &context).await?;
        self.json_body(resp, &context).await
    }

    /// Check whether a branch exists on a project.
    ///
    /// A 404 means the branch is absent and yields `Ok(false)`; any
    /// other failure is a [`GitLabError::Api`].
    pub async fn branch_exists(
        &self,
        project_id: u64,
        branch: &str,
    ) -> Result<bool, GitLabError> {
        let url = format!(
            "{}/projects/{}/repository/branches/{}",
            self.api_root, project_id, branch
        );
        let context = format!("checking branch {} on project {}", branch, project_id);
        let resp = self.get(&url, &context).await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        resp.error_for_status()
            .map_err(|e| GitLabError::api(&context, e))?;
        Ok(true)
    }

    /// Check whether a file exists on a branch.
    ///
    /// The file path is slash-trimmed and percent-encoded into a single
    /// URL segment. Same 404-as-`false` contract as [`branch_exists`].
    ///
    /// [`branch_exists`]: GitLabClient::branch_exists
    pub async fn file_exists(
        &self,
        project_id: u64,
        branch: &str,
        file_path: &str,
    ) -> Result<bool, GitLabError> {
        let encoded = urlencoding::encode(file_path.trim_matches('/')).into_owned();
        let url = format!(
            "{}/projects/{}/repository/files/{}?ref={}",
            self.api_root, project_id, encoded, branch
        );
        let context = format!(
            "checking file {} on branch {} of project {}",
            file_path, branch, project_id
        );
        let resp = self.get(&url, &context).await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        resp.error_for_status()
            .map_err(|e| GitLabError::api(&context, e))?;
        Ok(true)
    }

    /// Create a commit on a project.
    ///
    /// The payload (branch, commit message, file actions) is serialized
    /// as JSON and passed through unmodified; this client does not
    /// validate it. Returns `true` iff the API answers 201. A non-201
    /// success status yields `false`, not an error, so callers must
    /// check the boolean.
    pub async fn post_commit<P: Serialize>(
        &self,
        project_id: u64,
        payload: &P,
    ) -> Result<bool, GitLabError> {
        let url = format!(
            "{}/projects/{}/repository/commits",
            self.api_root, project_id
        );
        let context = format!("posting commit to project {}", project_id);
        self.trace("POST", &url);
        let resp = self
            .http
            .post(&url)
            .header(TOKEN_HEADER, &self.token)
            .json(payload)
            .send()
            .await
            .map_err(|e| GitLabError::api(&context, e))?;
        let status = resp.status();
        resp.error_for_status()
            .map_err(|e| GitLabError::api(&context, e))?;
        Ok(status == StatusCode::CREATED)
    }

    /// Update a snippet's content.
    ///
    /// Same 201-boolean contract as [`post_commit`].
    ///
    /// [`post_commit`]: GitLabClient::post_commit
    pub async fn post_snippet_commit<P: Serialize>(
        &self,
        snippet_id: u64,
        payload: &P,
    ) -> Result<bool, GitLabError> {
        let url = format!("{}/snippets/{}", self.api_root, snippet_id);
        let context = format!("posting commit to snippet {}", snippet_id);
        self.trace("PUT", &url);
        let resp = self
            .http
            .put(&url)
            .header(TOKEN_HEADER, &self.token)
            .json(payload)
            .send()
            .await
            .map_err(|e| GitLabError::api(&context, e))?;
        let status = resp.status();
        resp.error_for_status()
            .map_err(|e| GitLabError::api(&context, e))?;
        Ok(status == StatusCode::CREATED)
    }

    /// Fetch a file's raw content from a branch.
    ///
    /// When `branch` is `None`, the project is looked up first and its
    /// default branch is used, so this issues two requests. Returns
    /// `Some(text)` for status 200 and `None` for any other success
    /// status.
    pub async fn get_raw_file(
        &self,
        reference: &str,
        file_path: &str,
        branch: Option<&str>,
    ) -> Result<Option<String>, GitLabError> {
        let resolved;
        let branch = match branch {
            Some(branch) => branch,
            None => {
                resolved = self.default_branch(reference).await?;
                &resolved
            }
        };
        let url = format!(
            "{}/repository/files/{}/raw?ref={}",
            self.project_url(reference)?,
            urlencoding::encode(file_path),
            branch
        );
        let context = format!("fetching raw file {} from project {}", file_path, reference);
        let resp = self.get(&url, &context).await?;
        let resp = resp
            .error_for_status()
            .map_err(|e| GitLabError::api(&context, e))?;
        if resp.status() != StatusCode::OK {
            return Ok(None);
        }
        let text = resp
            .text()
            .await
            .map_err(|e| GitLabError::api(&context, e))?;
        Ok(Some(text))
    }

    /// Fetch the GitLab instance version.
    ///
    /// Returns `Some(body)` for status 200 and `None` for any other
    /// success status.
    pub async fn get_version(&self) -> Result<Option<Value>, GitLabError> {
        let url = format!("{}/version", self.api_root);
        let context = "fetching GitLab version";
        let resp = self.get(&url, context).await?;
        let resp = resp
            .error_for_status()
            .map_err(|e| GitLabError::api(context, e))?;
        if resp.status() != StatusCode::OK {
            return Ok(None);
        }
        let body = resp
            .json()
            .await
            .map_err(|e| GitLabError::api(context, e))?;
        Ok(Some(body))
    }

    /// Look up a project's default branch.
    async fn default_branch(&self, reference: &str) -> Result<String, GitLabError> {
        let project = self.get_project(reference).await?;
        project
            .get("default_branch")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| {
                GitLabError::api(
                    format!("fetching raw file from project {}", reference),
                    format!("project {} has no default branch", reference),
                )
            })
    }

    /// Issue a GET with the token header, mapping transport errors.
    async fn get(&self, url: &str, context: &str) -> Result<Response, GitLabError> {
        self.trace("GET", url);
        self.http
            .get(url)
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await
            .map_err(|e| GitLabError::api(context, e))
    }

    /// Map a response to its parsed JSON body, treating any non-2xx
    /// status as an error.
    async fn json_body(&self, resp: Response, context: &str) -> Result<Value, GitLabError> {
        let resp = resp
            .error_for_status()
            .map_err(|e| GitLabError::api(context, e))?;
        resp.json()
            .await
            .map_err(|e| GitLabError::api(context, e))
    }

    /// Log the request line when verbose diagnostics are enabled.
    fn trace(&self, method: &str, url: &str) {
        if self.verbose {
            debug!(method, url, "sending API request");
        }
    }
}

/// Normalize a caller-supplied base URL: upgrade `http://` to
/// `https://`, prepend the scheme when absent, drop trailing slashes.
fn normalize_base_url(raw: &str) -> String {
    let url = if let Some(rest) = raw.strip_prefix("http://") {
        format!("https://{}", rest)
    } else if raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod normalize_base_url {
        use super::*;

        #[test]
        fn upgrades_http_and_drops_trailing_slash() {
            assert_eq!(
                normalize_base_url("http://example.com/"),
                "https://example.com"
            );
        }

        #[test]
        fn prepends_scheme_when_absent() {
            assert_eq!(normalize_base_url("example.com"), "https://example.com");
        }

        #[test]
        fn leaves_https_untouched() {
            assert_eq!(
                normalize_base_url("https://example.com"),
                "https://example.com"
            );
        }

        #[test]
        fn drops_repeated_trailing_slashes() {
            assert_eq!(
                normalize_base_url("https://example.com///"),
                "https://example.com"
            );
        }
    }

    mod construction {
        use super::*;

        #[test]
        fn computes_api_root() {
            let client = GitLabClient::new("example.com", "token", false);
            assert_eq!(client.base_url(), "https://example.com");
            assert_eq!(client.api_root(), "https://example.com/api/v4");
        }

        #[test]
        fn with_base_url_keeps_scheme() {
            let client = GitLabClient::with_base_url("http://127.0.0.1:8080/", "token", false);
            assert_eq!(client.base_url(), "http://127.0.0.1:8080");
            assert_eq!(client.api_root(), "http://127.0.0.1:8080/api/v4");
        }

        #[test]
        fn debug_redacts_token() {
            let client = GitLabClient::new("example.com", "glpat-secret123", false);
            let debug_output = format!("{:?}", client);
            assert!(!debug_output.contains("glpat-secret123"));
            assert!(debug_output.contains("has_token"));
        }
    }

    mod project_url {
        use super::*;

        fn client() -> GitLabClient {
            GitLabClient::new("https://example.com", "token", false)
        }

        #[test]
        fn numeric_id() {
            assert_eq!(
                client().project_url("42").unwrap(),
                "https://example.com/api/v4/projects/42"
            );
        }

        #[test]
        fn path_is_percent_encoded() {
            assert_eq!(
                client().project_url("a/b c").unwrap(),
                "https://example.com/api/v4/projects/a%2Fb%20c"
            );
        }

        #[test]
        fn full_url_reference_recovers_the_path() {
            assert_eq!(
                client().project_url("https://example.com/group/proj/").unwrap(),
                "https://example.com/api/v4/projects/group%2Fproj"
            );
        }

        #[test]
        fn unresolvable_reference_fails() {
            assert!(matches!(
                client().project_url(""),
                Err(GitLabError::InvalidIdentifier { .. })
            ));
        }
    }
}
