//! Extension trait for running a whole audit against a gateway.
//!
//! This module defines the `AuditGatewayExt` trait which adds the fetch and
//! aggregate sequence to every [`FetchGateway`].

use async_trait::async_trait;

use crate::error::Result;
use crate::gateway::FetchGateway;

use super::algorithm::aggregate;
use super::types::AuditReport;

/// Extension trait adding audit operations to fetch gateways.
///
/// # Example
///
/// ```
/// use subreddit_audit::audit::{render_text, AuditGatewayExt};
/// use subreddit_audit::mock::MockGateway;
/// use subreddit_audit::{RawComment, RawPost};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut gateway = MockGateway::new()
///     .with_posts(vec![RawPost::new("t3_p1", "/r/x/p1", "Hello")])
///     .with_comments(vec![RawComment::new("t1_c1", "t3_p1", "/r/x/p1/c1", "nice")]);
///
/// let report = gateway.audit_user("CrossStitch", "stitcher").await?;
/// assert_eq!(report.len(), 2);
/// println!("{}", render_text(&report));
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait AuditGatewayExt: FetchGateway {
    /// Fetch a user's posts and comments in `community` and group them.
    ///
    /// Posts are fetched first, then comments. If either fetch fails the
    /// error is returned unchanged and no partial report is built.
    async fn audit_user(&mut self, community: &str, user: &str) -> Result<AuditReport>;
}

/// Blanket implementation of `AuditGatewayExt` for every `FetchGateway`.
#[async_trait]
impl<G: FetchGateway + ?Sized> AuditGatewayExt for G {
    async fn audit_user(&mut self, community: &str, user: &str) -> Result<AuditReport> {
        let posts = self.fetch_posts(community, user).await?;
        let comments = self.fetch_comments(community, user).await?;

        tracing::debug!(
            community,
            user,
            posts = posts.len(),
            comments = comments.len(),
            "Fetched user activity"
        );

        Ok(aggregate(posts, comments))
    }
}
