//! Comment grouping algorithm.
//!
//! This module groups a flat list of comments under the posts they reply to.

use super::types::{AuditReport, GroupedComment, PostKey};
use crate::listing::{RawComment, RawPost};

/// Group comments under their parent posts.
///
/// Steps:
/// 1. Start from a report holding only the empty catch-all bucket
/// 2. Add one entry per post, keyed by its fullname (a repeated fullname
///    replaces the earlier link and title)
/// 3. Append each comment to its parent's entry, or to the catch-all bucket
///    when the parent is missing, empty, or was not fetched
///
/// Comment order within an entry follows the input order. The result always
/// holds one entry per distinct post fullname plus the catch-all bucket.
pub fn aggregate(posts: Vec<RawPost>, comments: Vec<RawComment>) -> AuditReport {
    let mut report = AuditReport::with_capacity(posts.len());

    for post in posts {
        report.upsert_post(post.id, post.permalink, post.title);
    }

    for comment in comments {
        let key = PostKey::for_parent(comment.parent_post_id.as_deref());
        report.push_comment(
            &key,
            GroupedComment {
                link: comment.permalink,
                body: comment.body,
            },
        );
    }

    report
}
