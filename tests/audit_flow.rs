//! End-to-end audit tests against the mock gateway.
//!
//! These tests drive the public API the way the entry points do: fetch through
//! a gateway, group, then render.

use subreddit_audit::audit::{render_json, render_text, AuditGatewayExt, CATCH_ALL_HEADER};
use subreddit_audit::mock::{GatewayCall, MockGateway};
use subreddit_audit::{Error, GroupedPost, PostKey, RawComment, RawPost};

fn stitching_gateway() -> MockGateway {
    MockGateway::new()
        .with_posts(vec![
            RawPost::new(
                "t3_p2",
                "https://www.reddit.com/r/CrossStitch/comments/p2/finished/",
                "[FO] Finished my first sampler",
            ),
            RawPost::new(
                "t3_p1",
                "https://www.reddit.com/r/CrossStitch/comments/p1/wip/",
                "[WIP] Halfway there",
            ),
        ])
        .with_comments(vec![
            RawComment::new(
                "t1_c3",
                "t3_p2",
                "https://www.reddit.com/r/CrossStitch/comments/p2/finished/c3/",
                "Thanks!\nIt took three months.",
            ),
            RawComment::new(
                "t1_c2",
                "t3_other",
                "https://www.reddit.com/r/CrossStitch/comments/other/x/c2/",
                "Gorgeous colours",
            ),
            RawComment::new(
                "t1_c1",
                "t3_p2",
                "https://www.reddit.com/r/CrossStitch/comments/p2/finished/c1/",
                "Pattern is linked in the post",
            ),
        ])
}

/// Scenario: one post, one comment on it.
#[tokio::test]
async fn test_single_post_scenario() {
    let mut gateway = MockGateway::new()
        .with_posts(vec![RawPost::new("p1", "/r/x/p1", "Hello")])
        .with_comments(vec![RawComment::new("c1", "p1", "/r/x/p1/c1", "nice work")]);

    let report = gateway.audit_user("x", "someone").await.unwrap();

    assert_eq!(report.len(), 2);
    let entry = report.get(&PostKey::AttachedTo("p1".to_string())).unwrap();
    assert_eq!(entry.title, "Hello");
    assert_eq!(entry.comments.len(), 1);
    assert_eq!(entry.comments[0].link, "/r/x/p1/c1");
    assert_eq!(entry.comments[0].body, "nice work");
    assert!(report.get(&PostKey::Unattached).unwrap().comments.is_empty());
}

/// Scenario: no posts, one comment without a parent.
#[tokio::test]
async fn test_orphan_comment_scenario() {
    let mut gateway = MockGateway::new().with_comments(vec![RawComment::new(
        "c2",
        "",
        "/r/x/other/c2",
        "cool",
    )]);

    let report = gateway.audit_user("x", "someone").await.unwrap();

    assert_eq!(report.len(), 1);
    let catch_all = report.catch_all();
    assert_eq!(catch_all.link, "");
    assert_eq!(catch_all.title, "");
    assert_eq!(catch_all.comments.len(), 1);
    assert_eq!(catch_all.comments[0].body, "cool");
}

#[tokio::test]
async fn test_audit_fetches_posts_then_comments() {
    let mut gateway = stitching_gateway();
    let log = gateway.call_log();

    gateway.audit_user("CrossStitch", "stitcher").await.unwrap();

    assert_eq!(
        log.calls(),
        vec![
            GatewayCall::Posts {
                community: "CrossStitch".to_string(),
                user: "stitcher".to_string(),
            },
            GatewayCall::Comments {
                community: "CrossStitch".to_string(),
                user: "stitcher".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn test_text_report() {
    let mut gateway = stitching_gateway();
    let report = gateway.audit_user("CrossStitch", "stitcher").await.unwrap();

    let expected = [
        CATCH_ALL_HEADER,
        " *  [`Gorgeous colours`](https://www.reddit.com/r/CrossStitch/comments/other/x/c2/)\n",
        "\n[**[FO] Finished my first sampler**](https://www.reddit.com/r/CrossStitch/comments/p2/finished/)\n\n",
        " *  [`Thanks! It took three months.`](https://www.reddit.com/r/CrossStitch/comments/p2/finished/c3/)\n",
        " *  [`Pattern is linked in the post`](https://www.reddit.com/r/CrossStitch/comments/p2/finished/c1/)\n",
        "\n[**[WIP] Halfway there**](https://www.reddit.com/r/CrossStitch/comments/p1/wip/)\n\n",
    ]
    .concat();

    assert_eq!(render_text(&report), expected);
}

#[tokio::test]
async fn test_json_report_round_trip() {
    let mut gateway = stitching_gateway();
    let report = gateway.audit_user("CrossStitch", "stitcher").await.unwrap();

    let json = render_json(&report).unwrap();
    let parsed: Vec<GroupedPost> = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed.as_slice(), report.posts());
    // The post without comments still carries an empty array
    assert!(json.contains(r#""comments":[]"#));
}

#[tokio::test]
async fn test_comment_fetch_failure_aborts_audit() {
    let mut gateway = stitching_gateway().fail_comments(Error::Api {
        status: 429,
        message: "Too Many Requests".to_string(),
    });

    let err = gateway.audit_user("CrossStitch", "stitcher").await.unwrap_err();
    assert_eq!(
        err,
        Error::Api {
            status: 429,
            message: "Too Many Requests".to_string(),
        }
    );
}

#[tokio::test]
async fn test_post_fetch_failure_skips_comment_fetch() {
    let mut gateway = stitching_gateway().fail_posts(Error::Auth("expired".to_string()));
    let log = gateway.call_log();

    assert!(gateway.audit_user("CrossStitch", "stitcher").await.is_err());
    assert_eq!(log.len(), 1);
}

#[tokio::test]
async fn test_boxed_gateway() {
    let mut gateway: Box<dyn subreddit_audit::FetchGateway> = Box::new(stitching_gateway());
    let report = gateway.audit_user("CrossStitch", "stitcher").await.unwrap();
    assert_eq!(report.total_comments(), 3);
}
