//! # subreddit-audit
//!
//! Audit a single user's posts and comments within one subreddit.
//!
//! Every comment the user wrote is grouped under the post it replies to. Comments
//! on posts that were not fetched (usually other people's posts) share one
//! catch-all bucket. The grouped result renders as a markdown-flavoured text
//! report or as a JSON array.
//!
//! ## Design Philosophy
//!
//! This library follows the "sans-io" design pattern:
//! - **Protocol Logic**: [`Client`] encodes API requests and decodes replies without doing I/O
//! - **I/O Separation**: sending requests is left to the caller or the runtime integration
//! - **Pure Core**: grouping and rendering in [`audit`] never touch the network
//!
//! ## Examples
//!
//! ### Grouping and Rendering
//!
//! ```rust
//! use subreddit_audit::audit::{aggregate, render_text};
//! use subreddit_audit::{RawComment, RawPost};
//!
//! let report = aggregate(
//!     vec![RawPost::new("t3_p1", "https://www.reddit.com/r/x/p1", "Hello")],
//!     vec![RawComment::new("t1_c1", "t3_p1", "https://www.reddit.com/r/x/p1/c1", "nice work")],
//! );
//! print!("{}", render_text(&report));
//! ```
//!
//! ### Sans-IO Usage
//!
//! ```rust
//! use subreddit_audit::{Client, Credentials, Request};
//!
//! let mut client = Client::new("client-id");
//! let credentials = Credentials {
//!     client_secret: "secret".to_string(),
//!     password: "password".to_string(),
//! };
//! let http_request = client
//!     .encode_request(Request::access_token("CrossStitchBot", credentials))
//!     .unwrap();
//! // Send http_request through your HTTP stack, then feed the reply back:
//! // client.decode_response(status, body)
//! ```
//!
//! ### With Runtime Integration
//!
//! ```rust,no_run
//! # #[cfg(feature = "tokio-runtime")]
//! # {
//! use subreddit_audit::audit::AuditGatewayExt;
//! use subreddit_audit::net_client::RedditClient;
//! use subreddit_audit::{AuditorConfig, Credentials};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AuditorConfig::default();
//! let mut client = RedditClient::login(config.clone(), Credentials::from_env()?).await?;
//! let report = client.audit_user(&config.community, "some_user").await?;
//! # Ok(())
//! # }
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod audit;
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod listing;
pub mod request;
pub mod utils;

// Mock gateway for testing
pub mod mock;

pub use audit::{AuditGatewayExt, AuditReport, GroupedComment, GroupedPost, PostKey};
pub use client::{Client, Response};
pub use config::{AuditorConfig, Credentials};
pub use error::{Error, Result};
pub use gateway::FetchGateway;
pub use listing::{RawComment, RawPost};
pub use request::{HttpRequest, Request};

// Optional async runtime integration
#[cfg(feature = "tokio-runtime")]
#[cfg_attr(docsrs, doc(cfg(feature = "tokio-runtime")))]
pub mod net_client;

#[cfg(feature = "server")]
#[cfg_attr(docsrs, doc(cfg(feature = "server")))]
pub mod server;
