//! Small string helpers shared by the gateway, renderer and HTTP endpoint.

/// Origin that relative permalinks are resolved against.
pub const PERMALINK_BASE: &str = "https://www.reddit.com";

/// Turn a listing permalink into an absolute URL.
///
/// # Example
///
/// ```
/// use subreddit_audit::utils::full_permalink;
///
/// assert_eq!(
///     full_permalink("/r/CrossStitch/comments/abc/hello/"),
///     "https://www.reddit.com/r/CrossStitch/comments/abc/hello/"
/// );
///
/// // Already absolute links are kept as they are
/// assert_eq!(full_permalink("https://example.com/x"), "https://example.com/x");
/// assert_eq!(full_permalink(""), "");
/// ```
pub fn full_permalink(permalink: &str) -> String {
    if permalink.is_empty() || permalink.starts_with("http://") || permalink.starts_with("https://") {
        permalink.to_string()
    } else if permalink.starts_with('/') {
        format!("{PERMALINK_BASE}{permalink}")
    } else {
        format!("{PERMALINK_BASE}/{permalink}")
    }
}

/// Escape the characters that are special in HTML.
///
/// Only `<`, `>`, `&`, `'` and `"` are escaped.
///
/// # Example
///
/// ```
/// use subreddit_audit::utils::escape_html;
///
/// assert_eq!(escape_html("plain_user-1"), "plain_user-1");
/// assert_eq!(
///     escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
///     "&lt;b&gt;&#34;Tom&#34; &amp; &#39;Jerry&#39;&lt;/b&gt;"
/// );
/// ```
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Replace every line feed with a single space so text fits on one line.
///
/// # Example
///
/// ```
/// use subreddit_audit::utils::single_line;
///
/// assert_eq!(single_line("line one\nline two"), "line one line two");
/// assert_eq!(single_line("a\n\nb\n"), "a  b ");
/// ```
pub fn single_line(text: &str) -> String {
    text.replace('\n', " ")
}
