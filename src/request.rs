//! API request types and encoding.
//!
//! Requests are encoded into transport-neutral [`HttpRequest`] values. Sending
//! them is left to whatever HTTP stack the caller runs.

use crate::config::Credentials;
use crate::error::{Error, Result};

/// Endpoint that exchanges bot credentials for a bearer token.
pub const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// Origin of all authenticated API calls.
pub const OAUTH_BASE: &str = "https://oauth.reddit.com";

/// Requests the auditor can make.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// Exchange the bot's username and password for a bearer token
    AccessToken {
        /// Account the bot logs in as
        username: String,
        /// Client secret and account password
        credentials: Credentials,
    },

    /// Newest posts submitted by a user
    UserPosts {
        /// Subreddit results are kept for
        community: String,
        /// Audited user
        user: String,
        /// Listing size
        limit: u32,
    },

    /// Newest comments written by a user
    UserComments {
        /// Subreddit results are kept for
        community: String,
        /// Audited user
        user: String,
        /// Listing size
        limit: u32,
    },
}

/// HTTP method of an encoded request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
}

/// Authorization attached to an encoded request.
#[derive(Clone, PartialEq, Eq)]
pub enum Authorization {
    /// HTTP basic auth with the OAuth client ID and secret
    Basic {
        /// Client ID
        client_id: String,
        /// Client secret
        client_secret: String,
    },
    /// Bearer token from a previous token exchange
    Bearer(String),
}

impl std::fmt::Debug for Authorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Authorization::Basic { client_id, .. } => f
                .debug_struct("Basic")
                .field("client_id", client_id)
                .finish_non_exhaustive(),
            Authorization::Bearer(_) => f.write_str("Bearer(<redacted>)"),
        }
    }
}

/// A fully described HTTP request, ready to be sent by any client.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// Method
    pub method: Method,
    /// Absolute URL without query string
    pub url: String,
    /// Query parameters
    pub query: Vec<(String, String)>,
    /// URL-encoded form body (empty for GET)
    pub form: Vec<(String, String)>,
    /// Authorization, if any
    pub authorization: Option<Authorization>,
}

impl Request {
    /// Build a token request.
    pub fn access_token(username: impl Into<String>, credentials: Credentials) -> Self {
        Request::AccessToken {
            username: username.into(),
            credentials,
        }
    }

    /// Build a request for a user's posts.
    pub fn user_posts(community: impl Into<String>, user: impl Into<String>, limit: u32) -> Self {
        Request::UserPosts {
            community: community.into(),
            user: user.into(),
            limit,
        }
    }

    /// Build a request for a user's comments.
    pub fn user_comments(community: impl Into<String>, user: impl Into<String>, limit: u32) -> Self {
        Request::UserComments {
            community: community.into(),
            user: user.into(),
            limit,
        }
    }

    /// Whether this request needs a bearer token.
    pub fn requires_token(&self) -> bool {
        !matches!(self, Request::AccessToken { .. })
    }

    /// Encode the request without authorization.
    ///
    /// The session adds the authorization header that matches its state.
    pub fn encode(&self) -> Result<HttpRequest> {
        match self {
            Request::AccessToken {
                username,
                credentials,
            } => {
                validate_parameter("username", username)?;
                Ok(HttpRequest {
                    method: Method::Post,
                    url: TOKEN_URL.to_string(),
                    query: Vec::new(),
                    form: vec![
                        ("grant_type".to_string(), "password".to_string()),
                        ("username".to_string(), username.clone()),
                        ("password".to_string(), credentials.password.clone()),
                    ],
                    authorization: None,
                })
            }
            Request::UserPosts { user, limit, .. } => listing_request(user, "submitted", *limit),
            Request::UserComments { user, limit, .. } => listing_request(user, "comments", *limit),
        }
    }
}

fn listing_request(user: &str, listing: &str, limit: u32) -> Result<HttpRequest> {
    validate_parameter("user", user)?;
    if limit == 0 {
        return Err(Error::Config("Listing limit must be positive".to_string()));
    }

    Ok(HttpRequest {
        method: Method::Get,
        url: format!("{OAUTH_BASE}/user/{user}/{listing}"),
        query: vec![
            ("sort".to_string(), "new".to_string()),
            ("limit".to_string(), limit.to_string()),
            ("raw_json".to_string(), "1".to_string()),
        ],
        form: Vec::new(),
        authorization: None,
    })
}

/// Validate that a path parameter cannot escape its URL segment
fn validate_parameter(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::Config(format!("{name} cannot be empty")));
    }
    if value
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '?' | '#' | '%'))
    {
        return Err(Error::Config(format!(
            "{name} contains characters not allowed in a URL segment: {value:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            client_secret: "secret".to_string(),
            password: "hunter2".to_string(),
        }
    }

    #[test]
    fn test_user_posts_request() {
        let encoded = Request::user_posts("CrossStitch", "stitcher", 100)
            .encode()
            .unwrap();
        assert_eq!(encoded.method, Method::Get);
        assert_eq!(encoded.url, "https://oauth.reddit.com/user/stitcher/submitted");
        assert!(encoded
            .query
            .contains(&("limit".to_string(), "100".to_string())));
        assert!(encoded.query.contains(&("sort".to_string(), "new".to_string())));
        assert!(encoded.form.is_empty());
    }

    #[test]
    fn test_user_comments_request() {
        let encoded = Request::user_comments("CrossStitch", "stitcher", 25)
            .encode()
            .unwrap();
        assert_eq!(encoded.url, "https://oauth.reddit.com/user/stitcher/comments");
        assert!(encoded.query.contains(&("limit".to_string(), "25".to_string())));
    }

    #[test]
    fn test_access_token_request() {
        let request = Request::access_token("CrossStitchBot", credentials());
        assert!(!request.requires_token());

        let encoded = request.encode().unwrap();
        assert_eq!(encoded.method, Method::Post);
        assert_eq!(encoded.url, TOKEN_URL);
        assert!(encoded
            .form
            .contains(&("grant_type".to_string(), "password".to_string())));
        assert!(encoded
            .form
            .contains(&("username".to_string(), "CrossStitchBot".to_string())));
    }

    #[test]
    fn test_escaped_user_is_accepted() {
        // HTML-escaped names stay inside their path segment
        let encoded = Request::user_posts("CrossStitch", "a&amp;b", 100)
            .encode()
            .unwrap();
        assert_eq!(encoded.url, "https://oauth.reddit.com/user/a&amp;b/submitted");
    }

    #[test]
    fn test_invalid_parameter() {
        assert!(Request::user_posts("CrossStitch", "", 100).encode().is_err());
        assert!(Request::user_posts("CrossStitch", "x/../about", 100)
            .encode()
            .is_err());
        assert!(Request::user_comments("CrossStitch", "a b", 100)
            .encode()
            .is_err());
        assert!(Request::user_comments("CrossStitch", "ok", 0).encode().is_err());
    }

    #[test]
    fn test_authorization_debug_hides_secrets() {
        let auth = Authorization::Bearer("tok".to_string());
        assert!(!format!("{auth:?}").contains("tok"));
        let auth = Authorization::Basic {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
        };
        assert!(!format!("{auth:?}").contains("secret"));
    }
}
