//! Grouping and rendering of a user's activity.
//!
//! This module turns the flat post and comment lists supplied by a
//! [`FetchGateway`](crate::gateway::FetchGateway) into a per-post report:
//!
//! - **Grouping**: every comment lands under the post it replies to, or in a
//!   single catch-all bucket when that post was not fetched
//! - **Rendering**: the grouped result becomes a markdown-flavoured text report
//!   or a JSON array
//! - **Extension trait**: the whole fetch, group sequence on any gateway
//!
//! # Overview
//!
//! - [`PostKey`]: key of a grouped entry, with an explicit catch-all variant
//! - [`GroupedPost`] and [`GroupedComment`]: the wire shape of the result
//! - [`AuditReport`]: the ordered grouped result
//! - [`aggregate`]: the grouping algorithm
//! - [`render_text`] and [`render_json`]: the renderers
//! - [`AuditGatewayExt`]: adds `audit_user` to every gateway
//! - [`run_audit`]: gateway setup, audit and rendering in one call, failing
//!   with an [`AuditFailure`] that names the stage
//!
//! # Example
//!
//! ```
//! use subreddit_audit::audit::{aggregate, render_json, render_text};
//! use subreddit_audit::{RawComment, RawPost};
//!
//! let posts = vec![RawPost::new("t3_p1", "https://www.reddit.com/r/x/p1", "Hello")];
//! let comments = vec![
//!     RawComment::new("t1_c1", "t3_p1", "https://www.reddit.com/r/x/p1/c1", "nice work"),
//!     RawComment::new("t1_c2", "t3_zz", "https://www.reddit.com/r/x/zz/c2", "cool"),
//! ];
//!
//! let report = aggregate(posts, comments);
//! assert_eq!(report.len(), 2);
//! assert_eq!(report.catch_all().comment_count(), 1);
//!
//! let text = render_text(&report);
//! assert!(text.contains("[**Hello**](https://www.reddit.com/r/x/p1)"));
//!
//! let json = render_json(&report).unwrap();
//! assert!(json.starts_with('['));
//! ```

mod algorithm;
mod ext;
mod render;
mod run;
mod types;

// Re-export public types
pub use algorithm::aggregate;
pub use ext::AuditGatewayExt;
pub use render::{render_json, render_text, CATCH_ALL_HEADER};
pub use run::{run_audit, AuditFailure, OutputFormat};
pub use types::{AuditReport, GroupedComment, GroupedPost, PostKey};
