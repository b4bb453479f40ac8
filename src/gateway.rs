//! The fetch gateway seam.
//!
//! Anything that can list a user's posts and comments within a community can
//! feed the aggregator: the network client in [`crate::net_client`], the
//! in-memory [`crate::mock::MockGateway`], or a caller's own implementation.

use async_trait::async_trait;

use crate::error::Result;
use crate::listing::{RawComment, RawPost};

/// A source of a user's posts and comments within one community.
///
/// Implementations return at most one page of results (100 items), newest
/// first, and only items made in `community`.
#[async_trait]
pub trait FetchGateway: Send {
    /// Fetch the newest posts submitted by `user` in `community`.
    async fn fetch_posts(&mut self, community: &str, user: &str) -> Result<Vec<RawPost>>;

    /// Fetch the newest comments written by `user` in `community`.
    async fn fetch_comments(&mut self, community: &str, user: &str) -> Result<Vec<RawComment>>;
}

#[async_trait]
impl<G: FetchGateway + ?Sized> FetchGateway for Box<G> {
    async fn fetch_posts(&mut self, community: &str, user: &str) -> Result<Vec<RawPost>> {
        (**self).fetch_posts(community, user).await
    }

    async fn fetch_comments(&mut self, community: &str, user: &str) -> Result<Vec<RawComment>> {
        (**self).fetch_comments(community, user).await
    }
}
