//! Pull tokens for registry requests.
//!
//! Every manifest or tag request carries a bearer token scoped to
//! `repository:{owner}/{name}:pull`. The [`Authenticator`] produces one per
//! call, either by asking the registry's token endpoint ([`TokenScheme::Fetch`])
//! or by encoding the anonymous token ghcr.io accepts locally
//! ([`TokenScheme::Encoded`]). Tokens are never cached.

use crate::client::Client;
use crate::error::{BadgeError, Result};
use crate::reference::RepositoryRef;
use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;


/// Credentials for the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Credentials {
    /// No authentication (public packages)
    #[default]
    Anonymous,

    /// HTTP Basic authentication with username and password
    Basic {
        /// Username for authentication
        username: String,
        /// Password or personal access token
        password: String,
    },
}

impl Credentials {
    /// Creates anonymous credentials.
    pub fn anonymous() -> Self {
        Self::Anonymous
    }

    /// Creates Basic authentication credentials.
    ///
    /// # Examples
    ///
    /// ```
    /// use libbadge::auth::Credentials;
    ///
    /// let creds = Credentials::basic("username", "password");
    /// assert!(creds.to_header_value().unwrap().starts_with("Basic "));
    /// ```
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the Authorization header value for these credentials.
    pub fn to_header_value(&self) -> Option<String> {
        match self {
            Self::Anonymous => None,
            Self::Basic { username, password } => {
                let credentials = format!("{}:{}", username, password);
                let encoded = general_purpose::STANDARD.encode(credentials);
                Some(format!("Basic {}", encoded))
            }
        }
    }
}

/// How pull tokens are obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenScheme {
    /// Ask the registry's token endpoint
    #[default]
    Fetch,
    /// base64 of `v1:{owner}/{name}:0`, no network call
    Encoded,
}

/// A bearer token scoped to one repository.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Wraps a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Derives the token ghcr.io hands out for anonymous pulls.
    ///
    /// # Examples
    ///
    /// ```
    /// use libbadge::auth::Token;
    /// use libbadge::reference::RepositoryRef;
    ///
    /// let repo = RepositoryRef::new("owner", "pkg").unwrap();
    /// assert_eq!(Token::encoded(&repo).as_str(), "djE6b3duZXIvcGtnOjA=");
    /// ```
    pub fn encoded(repository: &RepositoryRef) -> Self {
        let raw = format!("v1:{}/{}:0", repository.owner(), repository.name());
        Self(general_purpose::STANDARD.encode(raw))
    }

    /// Returns the token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
}

/// Produces pull tokens for repositories.
#[derive(Debug, Clone)]
pub struct Authenticator {
    client: Client,
    token_url: String,
    service: Option<String>,
    scheme: TokenScheme,
    credentials: Credentials,
}

impl Authenticator {
    /// Creates an authenticator that requests tokens from `token_url`.
    pub fn new(client: Client, token_url: impl Into<String>) -> Self {
        Self {
            client,
            token_url: token_url.into(),
            service: None,
            scheme: TokenScheme::Fetch,
            credentials: Credentials::Anonymous,
        }
    }

    /// Sets the `service` query parameter sent with token requests.
    pub fn with_service(mut self, service: Option<String>) -> Self {
        self.service = service;
        self
    }

    /// Selects how tokens are obtained.
    pub fn with_scheme(mut self, scheme: TokenScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Sets the credentials presented to the token endpoint.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Returns a pull token for `repository`.
    ///
    /// # Errors
    ///
    /// `InvalidToken` when the token endpoint cannot be reached, answers with
    /// a non-2xx status, or returns no usable token.
    pub fn authenticate(&self, repository: &RepositoryRef) -> Result<Token> {
        match self.scheme {
            TokenScheme::Encoded => Ok(Token::encoded(repository)),
            TokenScheme::Fetch => self.fetch(repository),
        }
    }

    fn fetch(&self, repository: &RepositoryRef) -> Result<Token> {
        let scope = repository.scope();
        let fetched = self
            .client
            .fetch_token(
                &self.token_url,
                &scope,
                self.service.as_deref(),
                &self.credentials,
            )
            .map_err(|e| {
                BadgeError::invalid_token_with_source(
                    format!("token request for {} failed", repository),
                    e,
                )
            })?;

        if !fetched.is_success() {
            return Err(BadgeError::invalid_token(format!(
                "token endpoint returned HTTP {} for {}",
                fetched.status, repository
            )));
        }

        let response: TokenResponse = serde_json::from_slice(&fetched.body).map_err(|e| {
            BadgeError::invalid_token_with_source("Failed to parse token response", e)
        })?;

        let token = response
            .token
            .or(response.access_token)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                BadgeError::invalid_token(format!("token response for {} has no token", repository))
            })?;

        debug!(repository = %repository, "obtained registry token");
        Ok(Token(token))
    }
}
