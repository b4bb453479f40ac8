//! Sans-IO API client implementation.

use bytes::Bytes;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::listing::{parse_comments, parse_posts, RawComment, RawPost};
use crate::request::{Authorization, HttpRequest, Request};

/// Decoded result of one API exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Token exchange succeeded
    Token {
        /// Lifetime of the token in seconds, if reported
        expires_in: Option<u64>,
    },
    /// Posts by the audited user, newest first
    Posts(Vec<RawPost>),
    /// Comments by the audited user, newest first
    Comments(Vec<RawComment>),
}

/// Sans-IO API client.
///
/// This client handles request encoding, response decoding and session state
/// without performing any I/O. Callers send the [`HttpRequest`] values it
/// produces and feed the status and body of each reply back in.
pub struct Client {
    client_id: String,
    state: ClientState,
    pending: Option<Request>,
}

#[derive(Clone, PartialEq)]
enum ClientState {
    /// No token yet
    Unauthenticated,
    /// Holding a bearer token
    Authenticated { token: String },
}

#[derive(Debug, Deserialize)]
struct TokenReply {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    error: Option<String>,
}

impl Client {
    /// Create a client for the given OAuth client ID.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            state: ClientState::Unauthenticated,
            pending: None,
        }
    }

    /// Encode a request for transmission.
    ///
    /// Listing requests need a token from an earlier [`Request::AccessToken`]
    /// exchange. Only one request may be in flight at a time.
    pub fn encode_request(&mut self, request: Request) -> Result<HttpRequest> {
        if let Some(pending) = &self.pending {
            return Err(Error::InvalidResponse(format!(
                "Request already in flight: {}",
                describe(pending)
            )));
        }

        let mut encoded = request.encode()?;
        encoded.authorization = match (&request, &self.state) {
            (Request::AccessToken { credentials, .. }, _) => Some(Authorization::Basic {
                client_id: self.client_id.clone(),
                client_secret: credentials.client_secret.clone(),
            }),
            (_, ClientState::Authenticated { token }) => {
                Some(Authorization::Bearer(token.clone()))
            }
            (_, ClientState::Unauthenticated) => {
                return Err(Error::Auth(format!(
                    "{} requires an authenticated session",
                    describe(&request)
                )));
            }
        };

        self.pending = Some(request);
        Ok(encoded)
    }

    /// Decode the reply to the request in flight.
    ///
    /// `status` is the HTTP status code and `body` the raw response body.
    pub fn decode_response(&mut self, status: u16, body: impl Into<Bytes>) -> Result<Response> {
        let request = self
            .pending
            .take()
            .ok_or_else(|| Error::InvalidResponse("No request in flight".to_string()))?;
        let body: Bytes = body.into();

        if !(200..300).contains(&status) {
            let message = String::from_utf8_lossy(&body).trim().to_string();
            return Err(match request {
                Request::AccessToken { .. } => {
                    self.state = ClientState::Unauthenticated;
                    Error::Auth(format!("Token request failed with status {status}: {message}"))
                }
                _ => {
                    if status == 401 {
                        // Expired or revoked token
                        self.state = ClientState::Unauthenticated;
                    }
                    Error::Api { status, message }
                }
            });
        }

        match request {
            Request::AccessToken { .. } => {
                let reply: TokenReply = serde_json::from_slice(&body)?;
                match (reply.access_token, reply.error) {
                    (Some(token), None) if !token.is_empty() => {
                        self.state = ClientState::Authenticated { token };
                        Ok(Response::Token {
                            expires_in: reply.expires_in,
                        })
                    }
                    (_, error) => {
                        self.state = ClientState::Unauthenticated;
                        Err(Error::Auth(
                            error.unwrap_or_else(|| "No access token in reply".to_string()),
                        ))
                    }
                }
            }
            Request::UserPosts { community, .. } => {
                Ok(Response::Posts(parse_posts(&body, &community)?))
            }
            Request::UserComments { community, .. } => {
                Ok(Response::Comments(parse_comments(&body, &community)?))
            }
        }
    }

    /// Drop the request in flight without a reply, e.g. after a transport failure.
    ///
    /// The session keeps its token. Returns `true` if a request was pending.
    pub fn abort_pending(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Get the current client state.
    pub fn state(&self) -> &str {
        if self.pending.is_some() {
            return "waiting";
        }
        match self.state {
            ClientState::Unauthenticated => "unauthenticated",
            ClientState::Authenticated { .. } => "authenticated",
        }
    }

    /// Check if the client is ready to send a request.
    pub fn is_ready(&self) -> bool {
        self.pending.is_none()
    }

    /// Check if the client holds a bearer token.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, ClientState::Authenticated { .. })
    }
}

fn describe(request: &Request) -> &'static str {
    match request {
        Request::AccessToken { .. } => "token request",
        Request::UserPosts { .. } => "post listing",
        Request::UserComments { .. } => "comment listing",
    }
}
