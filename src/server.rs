//! HTTP endpoint for on-demand audits.
//!
//! `POST /` (or `POST /audit`) with a body like `{"user": "some_user"}` answers
//! with the grouped result as a JSON array. Every failure is reported as
//! plain text in a `200 OK` body, prefixed with a fixed message.
//!
//! Each request sets up its own gateway through a [`GatewaySetup`], so no
//! session or collection is shared between requests.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::Router;
use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::audit::{run_audit, OutputFormat};
use crate::config::{AuditorConfig, Credentials};
use crate::error::Result;
use crate::gateway::FetchGateway;
use crate::net_client::RedditClient;
use crate::utils::escape_html;

/// Body text returned when the request names no user.
pub const NO_USER_MESSAGE: &str = "No user given!";

/// Expected request body.
///
/// Field names match case-insensitively and a repeated `user` key overrides
/// earlier ones; a `null` value leaves the field as it was.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditRequest {
    /// User to audit
    pub user: Option<String>,
}

impl<'de> Deserialize<'de> for AuditRequest {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RequestVisitor;

        impl<'de> Visitor<'de> for RequestVisitor {
            type Value = AuditRequest;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object with a `user` string")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<AuditRequest, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut request = AuditRequest::default();
                while let Some(key) = map.next_key::<String>()? {
                    if key.eq_ignore_ascii_case("user") {
                        if let Some(user) = map.next_value::<Option<String>>()? {
                            request.user = Some(user);
                        }
                    } else {
                        map.next_value::<IgnoredAny>()?;
                    }
                }
                Ok(request)
            }
        }

        deserializer.deserialize_map(RequestVisitor)
    }
}

/// Creates a fresh gateway for each request.
#[async_trait]
pub trait GatewaySetup: Send + Sync + 'static {
    /// Gateway type produced by this setup.
    type Gateway: FetchGateway;

    /// Community audits are scoped to.
    fn community(&self) -> &str;

    /// Create and authenticate a gateway.
    async fn connect(&self) -> Result<Self::Gateway>;
}

/// Setup that logs in to the remote API with credentials from the environment.
///
/// Credentials are read on every request, so rotating them needs no restart.
#[derive(Debug, Clone)]
pub struct RedditSetup {
    config: AuditorConfig,
}

impl RedditSetup {
    /// Create a setup for the given configuration.
    pub fn new(config: AuditorConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl GatewaySetup for RedditSetup {
    type Gateway = RedditClient;

    fn community(&self) -> &str {
        &self.config.community
    }

    async fn connect(&self) -> Result<RedditClient> {
        let credentials = Credentials::from_env()?;
        RedditClient::login(self.config.clone(), credentials).await
    }
}

/// Build the router serving the audit endpoint.
pub fn router<S: GatewaySetup>(setup: S) -> Router {
    Router::new()
        .route("/", post(audit_handler::<S>))
        .route("/audit", post(audit_handler::<S>))
        .route("/health", get(health_handler))
        .with_state(Arc::new(setup))
}

async fn audit_handler<S: GatewaySetup>(State(setup): State<Arc<S>>, body: Bytes) -> String {
    let community = setup.community().to_string();
    respond_to_audit(&body, &community, || setup.connect()).await
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Produce the response body for an audit request.
///
/// The steps stop at the first failure, whose message becomes the whole body:
///
/// 1. Decode the body (`Error decoding request body! ...`)
/// 2. Reject a missing or empty user ([`NO_USER_MESSAGE`])
/// 3. Set up a gateway (`Error setting up auditor! ...`)
/// 4. Audit the HTML-escaped user (`Error building post data! ...`)
/// 5. Render JSON (`Error marshalling response to JSON! ...`)
pub async fn respond_to_audit<F, Fut, G>(body: &[u8], community: &str, setup: F) -> String
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<G>>,
    G: FetchGateway,
{
    let request = match decode_request(body) {
        Ok(request) => request,
        Err(e) => return failure(format!("Error decoding request body! {e}")),
    };

    let user = match request.user.as_deref() {
        Some(user) if !user.is_empty() => escape_html(user),
        _ => return NO_USER_MESSAGE.to_string(),
    };

    tracing::info!(community, user = %user, "Auditing user");
    match run_audit(community, &user, OutputFormat::Json, setup).await {
        Ok(json) => json,
        Err(e) => failure(e.to_string()),
    }
}

/// Decode the first JSON value of the body, ignoring anything after it.
///
/// A bare `null` decodes as a request without a user.
fn decode_request(body: &[u8]) -> serde_json::Result<AuditRequest> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    let request = Option::<AuditRequest>::deserialize(&mut deserializer)?;
    Ok(request.unwrap_or_default())
}

fn failure(message: String) -> String {
    tracing::warn!("{message}");
    message
}
