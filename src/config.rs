//! Auditor configuration and credentials.
//!
//! The community and bot identity are explicit values handed to the gateway,
//! so several communities or identities can coexist in one process (and in tests).

use std::env;
use std::time::Duration;

use crate::error::{Error, Result};

/// Default subreddit audited when no override is given.
pub const DEFAULT_COMMUNITY: &str = "CrossStitch";

/// Default OAuth client ID of the auditing bot.
pub const DEFAULT_CLIENT_ID: &str = "Kkfhbwt2W5C0Rw";

/// Default account the bot authenticates as.
pub const DEFAULT_USERNAME: &str = "CrossStitchBot";

/// Maximum listing size accepted by the remote service.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Delay between consecutive remote requests.
pub const DEFAULT_THROTTLE: Duration = Duration::from_secs(5);

/// Environment variable holding the OAuth client secret.
pub const CLIENT_SECRET_VAR: &str = "REDDIT_CLIENT_SECRET";

/// Environment variable holding the bot account password.
pub const PASSWORD_VAR: &str = "REDDIT_PASSWORD";

/// Environment variable naming the user to audit from the command line.
pub const TARGET_USER_VAR: &str = "REDDIT_USER";

/// Non-secret settings for an auditor session.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditorConfig {
    /// Subreddit all fetches are scoped to
    pub community: String,
    /// OAuth client ID
    pub client_id: String,
    /// Account the bot logs in as
    pub username: String,
    /// User-Agent sent with every request
    pub user_agent: String,
    /// Items requested per listing (capped at [`MAX_PAGE_SIZE`])
    pub page_size: u32,
    /// Minimum delay between remote requests
    pub throttle: Duration,
}

impl Default for AuditorConfig {
    fn default() -> Self {
        Self {
            community: DEFAULT_COMMUNITY.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            user_agent: default_user_agent(DEFAULT_USERNAME),
            page_size: MAX_PAGE_SIZE,
            throttle: DEFAULT_THROTTLE,
        }
    }
}

impl AuditorConfig {
    /// Create a configuration for the given community with default identity.
    pub fn for_community(community: impl Into<String>) -> Self {
        Self {
            community: community.into(),
            ..Self::default()
        }
    }

    /// Load the configuration, applying overrides from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load the configuration, applying overrides from an arbitrary lookup.
    ///
    /// Recognized keys: `REDDIT_COMMUNITY`, `REDDIT_CLIENT_ID`, `REDDIT_USERNAME`
    /// and `REDDIT_THROTTLE_SECS`. Empty values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(community) = get("REDDIT_COMMUNITY") {
            config.community = community;
        }
        if let Some(client_id) = get("REDDIT_CLIENT_ID") {
            config.client_id = client_id;
        }
        if let Some(username) = get("REDDIT_USERNAME") {
            config.user_agent = default_user_agent(&username);
            config.username = username;
        }
        if let Some(secs) = get("REDDIT_THROTTLE_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                Error::Config(format!("REDDIT_THROTTLE_SECS is not a number: {secs}"))
            })?;
            config.throttle = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Set the delay between remote requests.
    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    /// Listing size actually requested, never above [`MAX_PAGE_SIZE`].
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

fn default_user_agent(username: &str) -> String {
    format!(
        "subreddit-audit/{} (by /u/{})",
        env!("CARGO_PKG_VERSION"),
        username
    )
}

/// Secrets required to authenticate the bot.
#[derive(Clone, PartialEq)]
pub struct Credentials {
    /// OAuth client secret
    pub client_secret: String,
    /// Bot account password
    pub password: String,
}

// Secrets stay out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_secret", &"<redacted>")
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read credentials through an arbitrary lookup.
    ///
    /// A missing or empty value yields `Error::Config("<NAME> not set")`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            client_secret: required(&lookup, CLIENT_SECRET_VAR)?,
            password: required(&lookup, PASSWORD_VAR)?,
        })
    }
}

/// Resolve the user to audit from the command line.
///
/// An explicit non-empty name wins; otherwise [`TARGET_USER_VAR`] is looked up.
/// Empty values count as missing and yield `Error::Config("REDDIT_USER not set")`.
pub fn target_user<F>(explicit: Option<String>, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match explicit.filter(|user| !user.is_empty()) {
        Some(user) => Ok(user),
        None => required(&lookup, TARGET_USER_VAR),
    }
}

/// Fetch a required value, rejecting missing and empty entries.
pub fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => {
            tracing::error!("{key} not set");
            Err(Error::Config(format!("{key} not set")))
        }
    }
}
