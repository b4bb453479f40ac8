//! Raw posts and comments, and decoding of the listings that carry them.
//!
//! The remote service answers user listings with a JSON envelope:
//!
//! ```text
//! {"kind": "Listing", "data": {"children": [{"kind": "t3", "data": {...}}, ...]}}
//! ```
//!
//! Posts are things of kind `t3`, comments are things of kind `t1`. Only the
//! fields the audit needs are decoded; everything else is ignored.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::utils::full_permalink;

/// Thing kind of a post (link submission).
pub const POST_KIND: &str = "t3";

/// Thing kind of a comment.
pub const COMMENT_KIND: &str = "t1";

/// A post authored by the audited user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPost {
    /// Fullname of the post (e.g. `t3_abc123`), unique per post
    pub id: String,
    /// Absolute permalink
    pub permalink: String,
    /// Post title
    pub title: String,
}

impl RawPost {
    /// Create a post from its parts.
    pub fn new(id: impl Into<String>, permalink: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            permalink: permalink.into(),
            title: title.into(),
        }
    }
}

/// A comment authored by the audited user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawComment {
    /// Fullname of the comment (e.g. `t1_def456`)
    pub id: String,
    /// Fullname of the post this comment belongs to, if known
    pub parent_post_id: Option<String>,
    /// Absolute permalink
    pub permalink: String,
    /// Comment text, possibly spanning several lines
    pub body: String,
}

impl RawComment {
    /// Create a comment from its parts.
    ///
    /// An empty `parent_post_id` means the comment has no identifiable parent.
    pub fn new(
        id: impl Into<String>,
        parent_post_id: impl Into<String>,
        permalink: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let parent_post_id = parent_post_id.into();
        Self {
            id: id.into(),
            parent_post_id: (!parent_post_id.is_empty()).then_some(parent_post_id),
            permalink: permalink.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Listing<T> {
    kind: String,
    data: ListingData<T>,
}

#[derive(Debug, Deserialize)]
struct ListingData<T> {
    #[serde(default = "Vec::new")]
    children: Vec<Thing<T>>,
}

#[derive(Debug, Deserialize)]
struct Thing<T> {
    kind: String,
    data: T,
}

#[derive(Debug, Deserialize)]
struct PostData {
    name: String,
    #[serde(default)]
    permalink: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    subreddit: String,
}

#[derive(Debug, Deserialize)]
struct CommentData {
    name: String,
    #[serde(default)]
    link_id: Option<String>,
    #[serde(default)]
    permalink: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    subreddit: String,
}

/// Decode a listing body into things of the expected kind.
fn decode_things<T>(body: &[u8], expected_kind: &str) -> Result<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
{
    let listing: Listing<T> = serde_json::from_slice(body)?;
    if listing.kind != "Listing" {
        return Err(Error::InvalidResponse(format!(
            "Expected Listing, got {}",
            listing.kind
        )));
    }

    listing
        .data
        .children
        .into_iter()
        .map(|thing| {
            if thing.kind == expected_kind {
                Ok(thing.data)
            } else {
                Err(Error::InvalidResponse(format!(
                    "Expected {expected_kind} entry, got {}",
                    thing.kind
                )))
            }
        })
        .collect()
}

fn in_community(subreddit: &str, community: &str) -> bool {
    subreddit.eq_ignore_ascii_case(community)
}

/// Decode a listing of posts, keeping only those made in `community`.
pub fn parse_posts(body: &[u8], community: &str) -> Result<Vec<RawPost>> {
    let posts = decode_things::<PostData>(body, POST_KIND)?
        .into_iter()
        .filter(|p| in_community(&p.subreddit, community))
        .map(|p| RawPost {
            id: p.name,
            permalink: full_permalink(&p.permalink),
            title: p.title,
        })
        .collect();
    Ok(posts)
}

/// Decode a listing of comments, keeping only those made in `community`.
pub fn parse_comments(body: &[u8], community: &str) -> Result<Vec<RawComment>> {
    let comments = decode_things::<CommentData>(body, COMMENT_KIND)?
        .into_iter()
        .filter(|c| in_community(&c.subreddit, community))
        .map(|c| RawComment {
            id: c.name,
            parent_post_id: c.link_id.filter(|id| !id.is_empty()),
            permalink: full_permalink(&c.permalink),
            body: c.body,
        })
        .collect();
    Ok(comments)
}
