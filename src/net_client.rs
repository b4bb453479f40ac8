//! Network fetch gateway.
//!
//! This module provides [`RedditClient`], which drives the sans-io [`Client`]
//! over HTTP with `reqwest` and throttles its own requests so the remote
//! service's rate limits are respected.
//!
//! # Example
//!
//! ```rust,no_run
//! use subreddit_audit::audit::{render_text, AuditGatewayExt};
//! use subreddit_audit::net_client::RedditClient;
//! use subreddit_audit::{AuditorConfig, Credentials};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AuditorConfig::from_env()?;
//! let mut client = RedditClient::login(config.clone(), Credentials::from_env()?).await?;
//!
//! let report = client.audit_user(&config.community, "some_user").await?;
//! println!("{}", render_text(&report));
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use tokio::time::{sleep_until, Instant};

use crate::client::{Client, Response};
use crate::config::{AuditorConfig, Credentials};
use crate::error::{Error, Result};
use crate::gateway::FetchGateway;
use crate::listing::{RawComment, RawPost};
use crate::request::{Authorization, HttpRequest, Method, Request};

/// Fetch gateway backed by the remote API.
///
/// Requests go out one at a time, at least [`AuditorConfig::throttle`] apart.
pub struct RedditClient {
    /// The sans-io client handling request encoding and session state.
    client: Client,
    /// HTTP transport.
    http: reqwest::Client,
    /// Settings this session was created with.
    config: AuditorConfig,
    /// Earliest moment the next request may be sent.
    next_request_at: Option<Instant>,
}

impl RedditClient {
    /// Authenticate as the configured bot account.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built, the token request
    /// cannot be sent, or the service rejects the credentials.
    pub async fn login(config: AuditorConfig, credentials: Credentials) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Http(format!("Failed to build HTTP client: {e}")))?;

        let mut client = Self {
            client: Client::new(config.client_id.clone()),
            http,
            config,
            next_request_at: None,
        };

        let request = Request::access_token(client.config.username.clone(), credentials);
        match client.execute(request).await {
            Ok(Response::Token { expires_in }) => {
                tracing::info!(
                    username = %client.config.username,
                    ?expires_in,
                    "Authenticated"
                );
                Ok(client)
            }
            Ok(_) => Err(Error::InvalidResponse(
                "Expected token response".to_string(),
            )),
            Err(e) => {
                tracing::error!(username = %client.config.username, "Failed to authenticate: {e}");
                Err(e)
            }
        }
    }

    /// Get the settings this session was created with.
    pub fn config(&self) -> &AuditorConfig {
        &self.config
    }

    /// Check if the session still holds a token.
    pub fn is_authenticated(&self) -> bool {
        self.client.is_authenticated()
    }

    /// Send a request and decode its reply.
    async fn execute(&mut self, request: Request) -> Result<Response> {
        let encoded = self.client.encode_request(request)?;

        self.throttle().await;
        tracing::debug!(method = ?encoded.method, url = %encoded.url, "Sending request");

        let reply = match self.send(&encoded).await {
            Ok(reply) => reply,
            Err(e) => {
                // Session stays usable for the next request
                self.client.abort_pending();
                return Err(e);
            }
        };

        let status = reply.status().as_u16();
        let body = match reply.bytes().await {
            Ok(body) => body,
            Err(e) => {
                self.client.abort_pending();
                return Err(Error::Http(format!("Failed to read response: {e}")));
            }
        };

        let response = self.client.decode_response(status, body);
        if let Err(e) = &response {
            tracing::warn!(status, url = %encoded.url, "Request failed: {e}");
        }
        response
    }

    async fn send(&self, encoded: &HttpRequest) -> Result<reqwest::Response> {
        let mut builder = match encoded.method {
            Method::Get => self.http.get(&encoded.url),
            Method::Post => self.http.post(&encoded.url),
        };

        if !encoded.query.is_empty() {
            builder = builder.query(&encoded.query);
        }
        if !encoded.form.is_empty() {
            builder = builder.form(&encoded.form);
        }
        builder = match &encoded.authorization {
            Some(Authorization::Basic {
                client_id,
                client_secret,
            }) => builder.basic_auth(client_id, Some(client_secret)),
            Some(Authorization::Bearer(token)) => builder.bearer_auth(token),
            None => builder,
        };

        builder
            .send()
            .await
            .map_err(|e| Error::Http(format!("Failed to send request: {e}")))
    }

    /// Wait until the throttle allows another request, then book the next slot.
    async fn throttle(&mut self) {
        if let Some(at) = self.next_request_at {
            sleep_until(at).await;
        }
        self.next_request_at = Some(Instant::now() + self.config.throttle);
    }
}

#[async_trait]
impl FetchGateway for RedditClient {
    async fn fetch_posts(&mut self, community: &str, user: &str) -> Result<Vec<RawPost>> {
        let request = Request::user_posts(community, user, self.config.effective_page_size());
        match self.execute(request).await? {
            Response::Posts(posts) => Ok(posts),
            _ => Err(Error::InvalidResponse("Expected post listing".to_string())),
        }
    }

    async fn fetch_comments(&mut self, community: &str, user: &str) -> Result<Vec<RawComment>> {
        let request = Request::user_comments(community, user, self.config.effective_page_size());
        match self.execute(request).await? {
            Response::Comments(comments) => Ok(comments),
            _ => Err(Error::InvalidResponse(
                "Expected comment listing".to_string(),
            )),
        }
    }
}
