//! Core types for the grouped audit result.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Key of an entry in the grouped result.
///
/// Comments whose parent post was not fetched (typically comments on other
/// people's posts) share the single [`PostKey::Unattached`] entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PostKey {
    /// The catch-all bucket
    Unattached,
    /// A fetched post, by fullname
    AttachedTo(String),
}

impl PostKey {
    /// Key for a comment's declared parent.
    ///
    /// A missing or empty parent identifier maps to [`PostKey::Unattached`].
    pub fn for_parent(parent_post_id: Option<&str>) -> Self {
        match parent_post_id {
            Some(id) if !id.is_empty() => PostKey::AttachedTo(id.to_string()),
            _ => PostKey::Unattached,
        }
    }

    /// Check if this is the catch-all key.
    pub fn is_unattached(&self) -> bool {
        matches!(self, PostKey::Unattached)
    }
}

/// A comment as it appears in the grouped result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedComment {
    /// Permalink of the comment
    pub link: String,
    /// Comment text, unmodified
    pub body: String,
}

/// A post together with the audited user's comments on it.
///
/// The catch-all entry has an empty `link` and `title`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedPost {
    /// Permalink of the post
    pub link: String,
    /// Title of the post
    pub title: String,
    /// Comments in the order they were fetched
    #[serde(default)]
    pub comments: Vec<GroupedComment>,
}

impl GroupedPost {
    /// Create an entry for a post with no comments yet.
    pub fn new(link: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            title: title.into(),
            comments: Vec::new(),
        }
    }

    /// Create the empty catch-all entry.
    pub fn catch_all() -> Self {
        Self::new("", "")
    }

    /// Check if this entry is the catch-all bucket.
    pub fn is_catch_all(&self) -> bool {
        self.link.is_empty()
    }

    /// Get the number of comments in this entry.
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }
}

/// The grouped result of an audit.
///
/// Entries iterate in a fixed order: the catch-all bucket first, then posts in
/// the order they were first supplied. The catch-all bucket always exists, so
/// a report is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditReport {
    posts: Vec<GroupedPost>,
    index: HashMap<PostKey, usize>,
}

impl Default for AuditReport {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditReport {
    /// Create a report holding only the empty catch-all bucket.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty report with room for `post_count` posts.
    pub fn with_capacity(post_count: usize) -> Self {
        let mut posts = Vec::with_capacity(post_count + 1);
        let mut index = HashMap::with_capacity(post_count + 1);
        posts.push(GroupedPost::catch_all());
        index.insert(PostKey::Unattached, 0);
        Self { posts, index }
    }

    /// Insert a post entry, or replace the link and title of an existing one.
    ///
    /// A replaced entry keeps its position and its comments.
    pub(crate) fn upsert_post(&mut self, id: String, link: String, title: String) {
        let key = PostKey::AttachedTo(id);
        if let Some(&position) = self.index.get(&key) {
            let entry = &mut self.posts[position];
            entry.link = link;
            entry.title = title;
        } else {
            self.index.insert(key, self.posts.len());
            self.posts.push(GroupedPost::new(link, title));
        }
    }

    /// Append a comment to the entry for `key`, falling back to the catch-all.
    pub(crate) fn push_comment(&mut self, key: &PostKey, comment: GroupedComment) {
        let position = self.index.get(key).copied().unwrap_or(0);
        self.posts[position].comments.push(comment);
    }

    /// Get all entries in iteration order.
    pub fn posts(&self) -> &[GroupedPost] {
        &self.posts
    }

    /// Get the entry for a key.
    pub fn get(&self, key: &PostKey) -> Option<&GroupedPost> {
        self.index.get(key).map(|&position| &self.posts[position])
    }

    /// Get the entry for a post fullname.
    pub fn post(&self, id: &str) -> Option<&GroupedPost> {
        self.get(&PostKey::AttachedTo(id.to_string()))
    }

    /// Get the catch-all bucket.
    pub fn catch_all(&self) -> &GroupedPost {
        &self.posts[0]
    }

    /// Get the number of entries, including the catch-all bucket.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Always false: the catch-all bucket is always present.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Get the number of post entries, excluding the catch-all bucket.
    pub fn post_count(&self) -> usize {
        self.posts.len() - 1
    }

    /// Get the total number of comments across all entries.
    pub fn total_comments(&self) -> usize {
        self.posts.iter().map(|p| p.comment_count()).sum()
    }

    /// Iterate over entries.
    pub fn iter(&self) -> impl Iterator<Item = &GroupedPost> {
        self.posts.iter()
    }

    /// Consume the report, returning its entries in iteration order.
    pub fn into_posts(self) -> Vec<GroupedPost> {
        self.posts
    }
}

impl IntoIterator for AuditReport {
    type Item = GroupedPost;
    type IntoIter = std::vec::IntoIter<GroupedPost>;

    fn into_iter(self) -> Self::IntoIter {
        self.posts.into_iter()
    }
}

impl<'a> IntoIterator for &'a AuditReport {
    type Item = &'a GroupedPost;
    type IntoIter = std::slice::Iter<'a, GroupedPost>;

    fn into_iter(self) -> Self::IntoIter {
        self.posts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(link: &str, body: &str) -> GroupedComment {
        GroupedComment {
            link: link.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_post_key_for_parent() {
        assert_eq!(PostKey::for_parent(None), PostKey::Unattached);
        assert_eq!(PostKey::for_parent(Some("")), PostKey::Unattached);
        assert_eq!(
            PostKey::for_parent(Some("t3_p1")),
            PostKey::AttachedTo("t3_p1".to_string())
        );
        assert!(PostKey::Unattached.is_unattached());
    }

    #[test]
    fn test_new_report_has_catch_all() {
        let report = AuditReport::new();
        assert_eq!(report.len(), 1);
        assert!(!report.is_empty());
        assert_eq!(report.post_count(), 0);
        assert!(report.catch_all().is_catch_all());
        assert_eq!(report.get(&PostKey::Unattached), Some(report.catch_all()));
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut report = AuditReport::new();
        report.upsert_post("t3_a".into(), "/a".into(), "First".into());
        report.upsert_post("t3_b".into(), "/b".into(), "Second".into());
        report.push_comment(&PostKey::AttachedTo("t3_a".into()), comment("/a/1", "hi"));
        report.upsert_post("t3_a".into(), "/a2".into(), "First again".into());

        assert_eq!(report.len(), 3);
        let titles: Vec<&str> = report.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["", "First again", "Second"]);
        assert_eq!(report.post("t3_a").unwrap().link, "/a2");
        assert_eq!(report.post("t3_a").unwrap().comment_count(), 1);
    }

    #[test]
    fn test_push_comment_unknown_key_falls_back() {
        let mut report = AuditReport::new();
        report.push_comment(&PostKey::AttachedTo("t3_gone".into()), comment("/c", "x"));
        assert_eq!(report.catch_all().comment_count(), 1);
        assert_eq!(report.total_comments(), 1);
    }

    #[test]
    fn test_grouped_post_serializes_empty_comments() {
        let json = serde_json::to_string(&GroupedPost::new("/p", "Title")).unwrap();
        assert_eq!(json, r#"{"link":"/p","title":"Title","comments":[]}"#);
    }
}
