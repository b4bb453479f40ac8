//! One complete audit run: set up a gateway, fetch and group, then render.
//!
//! Both entry points report failures with the same fixed prefixes, taken from
//! [`AuditFailure`]'s `Display`.

use std::fmt;
use std::future::Future;

use crate::error::{Error, Result};
use crate::gateway::FetchGateway;

use super::ext::AuditGatewayExt;
use super::render::{render_json, render_text};

/// Format of a rendered report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Markdown-flavoured text report
    #[default]
    Text,
    /// JSON array of grouped posts
    Json,
}

/// Stage at which an audit run stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditFailure {
    /// Configuration, credentials or login failed
    Setup(Error),
    /// Fetching the user's activity failed
    Build(Error),
    /// The grouped result could not be encoded as JSON
    Marshal(Error),
}

impl AuditFailure {
    /// Get the underlying error.
    pub fn error(&self) -> &Error {
        match self {
            AuditFailure::Setup(e) | AuditFailure::Build(e) | AuditFailure::Marshal(e) => e,
        }
    }
}

impl fmt::Display for AuditFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditFailure::Setup(e) => write!(f, "Error setting up auditor! {e}"),
            AuditFailure::Build(e) => write!(f, "Error building post data! {e}"),
            AuditFailure::Marshal(e) => write!(f, "Error marshalling response to JSON! {e}"),
        }
    }
}

impl std::error::Error for AuditFailure {}

/// Set up a gateway with `setup`, audit `user` in `community` and render the report.
///
/// # Example
///
/// ```
/// use subreddit_audit::audit::{run_audit, OutputFormat};
/// use subreddit_audit::mock::MockGateway;
/// use subreddit_audit::{Error, RawPost};
///
/// # #[tokio::main]
/// # async fn main() {
/// let gateway = MockGateway::new().with_posts(vec![RawPost::new("t3_p1", "/p1", "Hello")]);
/// let json = run_audit("CrossStitch", "stitcher", OutputFormat::Json, || async { Ok(gateway) })
///     .await
///     .unwrap();
/// assert!(json.contains("Hello"));
///
/// let failure = run_audit("CrossStitch", "stitcher", OutputFormat::Text, || async {
///     Err::<MockGateway, _>(Error::Config("REDDIT_PASSWORD not set".to_string()))
/// })
/// .await
/// .unwrap_err();
/// assert_eq!(failure.to_string(), "Error setting up auditor! REDDIT_PASSWORD not set");
/// # }
/// ```
pub async fn run_audit<F, Fut, G>(
    community: &str,
    user: &str,
    format: OutputFormat,
    setup: F,
) -> std::result::Result<String, AuditFailure>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<G>>,
    G: FetchGateway,
{
    let mut gateway = setup().await.map_err(AuditFailure::Setup)?;

    let report = gateway
        .audit_user(community, user)
        .await
        .map_err(AuditFailure::Build)?;

    tracing::info!(
        community,
        user,
        posts = report.post_count(),
        comments = report.total_comments(),
        "Audit complete"
    );

    match format {
        OutputFormat::Text => Ok(render_text(&report)),
        OutputFormat::Json => render_json(&report).map_err(AuditFailure::Marshal),
    }
}
