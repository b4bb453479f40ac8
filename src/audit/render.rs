//! Text and JSON rendering of a grouped audit result.

use std::fmt;
use std::fmt::Write as _;

use super::types::{AuditReport, GroupedPost};
use crate::error::{Error, Result};
use crate::utils::single_line;

/// Section header emitted for the catch-all bucket.
pub const CATCH_ALL_HEADER: &str = "\n**(comments on other people's posts)**\n\n";

/// Render a report as markdown-flavoured text.
///
/// Each entry contributes a header line (a link to the post, or
/// [`CATCH_ALL_HEADER`] for the catch-all bucket) followed by one list line per
/// comment. Line feeds inside comment bodies become single spaces.
///
/// # Example
///
/// ```
/// use subreddit_audit::audit::{aggregate, render_text};
/// use subreddit_audit::{RawComment, RawPost};
///
/// let report = aggregate(
///     vec![RawPost::new("p1", "/r/x/p1", "Hello")],
///     vec![RawComment::new("c1", "p1", "/r/x/p1/c1", "nice\nwork")],
/// );
///
/// let expected = concat!(
///     "\n**(comments on other people's posts)**\n\n",
///     "\n[**Hello**](/r/x/p1)\n\n",
///     " *  [`nice work`](/r/x/p1/c1)\n",
/// );
/// assert_eq!(render_text(&report), expected);
/// ```
pub fn render_text(report: &AuditReport) -> String {
    let mut audit = String::new();
    for post in report {
        write_post(&mut audit, post);
    }
    audit
}

fn write_post(out: &mut String, post: &GroupedPost) {
    if post.is_catch_all() {
        out.push_str(CATCH_ALL_HEADER);
    } else {
        // Writing into a String cannot fail
        let _ = write!(out, "\n[**{}**]({})\n\n", post.title, post.link);
    }

    for comment in &post.comments {
        let _ = writeln!(out, " *  [`{}`]({})", single_line(&comment.body), comment.link);
    }
}

/// Render a report as a JSON array of `{link, title, comments}` objects.
///
/// A serialization failure is returned as [`Error::Serialize`]; no partial
/// output is produced.
pub fn render_json(report: &AuditReport) -> Result<String> {
    serde_json::to_string(report.posts()).map_err(|e| Error::Serialize(e.to_string()))
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_text(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::aggregate;
    use crate::audit::types::GroupedComment;
    use crate::listing::{RawComment, RawPost};

    fn sample_report() -> AuditReport {
        aggregate(
            vec![
                RawPost::new("p1", "https://reddit.test/p1", "Hello"),
                RawPost::new("p2", "https://reddit.test/p2", "Quiet post"),
            ],
            vec![
                RawComment::new("c1", "p1", "https://reddit.test/p1/c1", "nice work"),
                RawComment::new("c2", "zz", "https://reddit.test/zz/c2", "line one\nline two"),
            ],
        )
    }

    #[test]
    fn test_render_text_full_report() {
        let expected = concat!(
            "\n**(comments on other people's posts)**\n\n",
            " *  [`line one line two`](https://reddit.test/zz/c2)\n",
            "\n[**Hello**](https://reddit.test/p1)\n\n",
            " *  [`nice work`](https://reddit.test/p1/c1)\n",
            "\n[**Quiet post**](https://reddit.test/p2)\n\n",
        );
        assert_eq!(render_text(&sample_report()), expected);
    }

    #[test]
    fn test_render_text_empty_report() {
        assert_eq!(render_text(&AuditReport::new()), CATCH_ALL_HEADER);
    }

    #[test]
    fn test_render_text_replaces_every_newline() {
        let report = aggregate(
            Vec::new(),
            vec![RawComment::new("c", "", "/c", "a\nb\n\nc\n")],
        );
        let text = render_text(&report);
        assert!(text.contains("[`a b  c `](/c)"));
        // Only the line terminators emitted by the renderer remain
        assert_eq!(text.matches('\n').count(), CATCH_ALL_HEADER.matches('\n').count() + 1);
    }

    #[test]
    fn test_render_text_is_deterministic() {
        let report = sample_report();
        assert_eq!(render_text(&report), render_text(&report));
        assert_eq!(report.to_string(), render_text(&report));
    }

    #[test]
    fn test_render_json_shape() {
        let json = render_json(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 3);

        assert_eq!(entries[0]["link"], "");
        assert_eq!(entries[0]["title"], "");
        assert_eq!(entries[0]["comments"][0]["body"], "line one\nline two");

        assert_eq!(entries[1]["title"], "Hello");
        assert_eq!(entries[1]["comments"][0]["link"], "https://reddit.test/p1/c1");

        // Empty comment lists are arrays, never null or missing
        assert_eq!(entries[2]["comments"], serde_json::json!([]));
    }

    #[test]
    fn test_render_json_parses_back() {
        let report = sample_report();
        let json = render_json(&report).unwrap();
        let parsed: Vec<GroupedPost> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_slice(), report.posts());
        assert_eq!(
            parsed[1].comments,
            vec![GroupedComment {
                link: "https://reddit.test/p1/c1".to_string(),
                body: "nice work".to_string(),
            }]
        );
    }
}
