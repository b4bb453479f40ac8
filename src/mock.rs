//! Mock fetch gateway for testing purposes.
//!
//! This module provides an in-memory gateway that serves canned posts and
//! comments, can be told to fail, and records every call it receives.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::MAX_PAGE_SIZE;
use crate::error::{Error, Result};
use crate::gateway::FetchGateway;
use crate::listing::{RawComment, RawPost};

/// A call received by a [`MockGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    /// `fetch_posts(community, user)`
    Posts {
        /// Community asked for
        community: String,
        /// User asked for
        user: String,
    },
    /// `fetch_comments(community, user)`
    Comments {
        /// Community asked for
        community: String,
        /// User asked for
        user: String,
    },
}

/// Shared view of the calls a [`MockGateway`] received.
///
/// Stays readable after the gateway itself has been moved or dropped.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<GatewayCall>>>,
}

impl CallLog {
    fn record(&self, call: GatewayCall) {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);
    }

    /// Get a snapshot of all recorded calls, oldest first.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Get the number of recorded calls.
    pub fn len(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Check if no call was recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An in-memory [`FetchGateway`].
///
/// Like the real gateway, each fetch returns at most one page
/// ([`MAX_PAGE_SIZE`] items).
#[derive(Debug, Clone, Default)]
pub struct MockGateway {
    posts: Vec<RawPost>,
    comments: Vec<RawComment>,
    post_error: Option<Error>,
    comment_error: Option<Error>,
    log: CallLog,
}

impl MockGateway {
    /// Create a gateway with no posts and no comments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve these posts.
    pub fn with_posts(mut self, posts: Vec<RawPost>) -> Self {
        self.posts = posts;
        self
    }

    /// Serve these comments.
    pub fn with_comments(mut self, comments: Vec<RawComment>) -> Self {
        self.comments = comments;
        self
    }

    /// Fail every post fetch with `error`.
    pub fn fail_posts(mut self, error: Error) -> Self {
        self.post_error = Some(error);
        self
    }

    /// Fail every comment fetch with `error`.
    pub fn fail_comments(mut self, error: Error) -> Self {
        self.comment_error = Some(error);
        self
    }

    /// Get a handle on the calls this gateway receives.
    pub fn call_log(&self) -> CallLog {
        self.log.clone()
    }
}

fn first_page<T: Clone>(items: &[T]) -> Vec<T> {
    items.iter().take(MAX_PAGE_SIZE as usize).cloned().collect()
}

#[async_trait]
impl FetchGateway for MockGateway {
    async fn fetch_posts(&mut self, community: &str, user: &str) -> Result<Vec<RawPost>> {
        self.log.record(GatewayCall::Posts {
            community: community.to_string(),
            user: user.to_string(),
        });
        match &self.post_error {
            Some(error) => Err(error.clone()),
            None => Ok(first_page(&self.posts)),
        }
    }

    async fn fetch_comments(&mut self, community: &str, user: &str) -> Result<Vec<RawComment>> {
        self.log.record(GatewayCall::Comments {
            community: community.to_string(),
            user: user.to_string(),
        });
        match &self.comment_error {
            Some(error) => Err(error.clone()),
            None => Ok(first_page(&self.comments)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_serves_canned_data() {
        let mut gateway = MockGateway::new()
            .with_posts(vec![RawPost::new("t3_a", "/a", "A")])
            .with_comments(vec![RawComment::new("t1_b", "t3_a", "/a/b", "B")]);
        let log = gateway.call_log();

        assert_eq!(gateway.fetch_posts("CrossStitch", "u").await.unwrap().len(), 1);
        assert_eq!(gateway.fetch_comments("CrossStitch", "u").await.unwrap().len(), 1);
        assert_eq!(
            log.calls(),
            vec![
                GatewayCall::Posts {
                    community: "CrossStitch".to_string(),
                    user: "u".to_string()
                },
                GatewayCall::Comments {
                    community: "CrossStitch".to_string(),
                    user: "u".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_mock_caps_page_size() {
        let comments = (0..150)
            .map(|i| RawComment::new(format!("t1_{i}"), "", "/c", "x"))
            .collect();
        let mut gateway = MockGateway::new().with_comments(comments);
        let fetched = gateway.fetch_comments("CrossStitch", "u").await.unwrap();
        assert_eq!(fetched.len(), 100);
        assert_eq!(fetched[0].id, "t1_0");
    }

    #[tokio::test]
    async fn test_mock_failure_injection() {
        let mut gateway = MockGateway::new().fail_posts(Error::Api {
            status: 503,
            message: "unavailable".to_string(),
        });
        assert!(gateway.fetch_posts("CrossStitch", "u").await.is_err());
        assert!(gateway.fetch_comments("CrossStitch", "u").await.is_ok());
        assert_eq!(gateway.call_log().len(), 2);
    }
}
