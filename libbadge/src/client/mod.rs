//! HTTP client for container registry communication.
//!
//! This module provides a thin blocking HTTP client built on reqwest for the
//! three registry endpoints the badges need: the token endpoint, the manifest
//! endpoint and the tag list endpoint.
//!
//! Manifest and tag responses are handed back as [`Fetched`] whatever their
//! status code, since registries report failures in a JSON `errors` body that
//! the caller inspects. Only transport failures (connection, timeout) are
//! errors at this level.

use crate::auth::Credentials;
use crate::error::{BadgeError, Result};
use reqwest::blocking::{Client as ReqwestClient, RequestBuilder};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;
use tracing::debug;


/// User agent sent with every request. ghcr.io answers anonymous pulls for
/// Docker clients.
pub const DEFAULT_USER_AGENT: &str = "Docker-Client/20.10.2 (linux)";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Accept header sent to the manifest endpoint.
pub const MANIFEST_ACCEPT: &str =
    "application/vnd.oci.image.index.v1+json, application/vnd.oci.image.manifest.v1+json";

/// Configuration for the HTTP client.
///
/// # Examples
///
/// ```
/// use libbadge::client::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_timeout(5)
///     .with_user_agent("badge-test/1.0");
/// assert_eq!(config.timeout_seconds, 5);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: 10)
    pub timeout_seconds: u64,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the User-Agent header value.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// A response that reached us, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    /// HTTP status code
    pub status: u16,
    /// Value of the `Content-Type` header, if any
    pub content_type: Option<String>,
    /// Raw response body
    pub body: Vec<u8>,
}

impl Fetched {
    /// Returns true for 2xx responses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the body as lossy UTF-8, for error messages.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Blocking HTTP client for registry operations.
///
/// Holds no mutable state; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    /// The underlying HTTP client
    http_client: ReqwestClient,
    /// Base registry URL (e.g., "https://ghcr.io")
    registry_url: String,
    timeout_seconds: u64,
}

impl Client {
    /// Creates a new client for the specified registry URL with default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use libbadge::client::Client;
    ///
    /// let client = Client::new("ghcr.io/").unwrap();
    /// assert_eq!(client.registry_url(), "https://ghcr.io");
    /// ```
    pub fn new(registry_url: &str) -> Result<Self> {
        Self::with_config(registry_url, ClientConfig::default())
    }

    /// Creates a new client for the specified registry URL with custom configuration.
    pub fn with_config(registry_url: &str, config: ClientConfig) -> Result<Self> {
        let normalized_url = normalize_url(registry_url)?;

        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| BadgeError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            http_client,
            registry_url: normalized_url,
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// Returns the base registry URL.
    pub fn registry_url(&self) -> &str {
        &self.registry_url
    }

    /// Requests a pull token from `token_url`.
    ///
    /// Sends `scope` (and `service` when given) as query parameters, with
    /// `credentials` in the Authorization header when they are not anonymous.
    pub fn fetch_token(
        &self,
        token_url: &str,
        scope: &str,
        service: Option<&str>,
        credentials: &Credentials,
    ) -> Result<Fetched> {
        let mut query = vec![("scope", scope)];
        if let Some(service) = service {
            query.push(("service", service));
        }

        let mut request = self.http_client.get(token_url).query(&query);
        if let Some(auth_header) = credentials.to_header_value() {
            request = request.header(AUTHORIZATION, auth_header);
        }

        debug!(url = token_url, scope, "requesting registry token");
        self.send(request, token_url)
    }

    /// Fetches the manifest stored under `reference` (a tag or a digest).
    pub fn fetch_manifest(&self, repository: &str, reference: &str, token: &str) -> Result<Fetched> {
        let url = format!(
            "{}/v2/{}/manifests/{}",
            self.registry_url, repository, reference
        );

        let request = self
            .http_client
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header(ACCEPT, MANIFEST_ACCEPT);

        debug!(url = %url, "fetching manifest");
        self.send(request, &url)
    }

    /// Fetches the tag list of `repository`.
    pub fn fetch_tags(&self, repository: &str, token: &str) -> Result<Fetched> {
        let url = format!("{}/v2/{}/tags/list", self.registry_url, repository);

        let request = self
            .http_client
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", token));

        debug!(url = %url, "fetching tag list");
        self.send(request, &url)
    }

    fn send(&self, request: RequestBuilder, url: &str) -> Result<Fetched> {
        let response = request
            .send()
            .map_err(|e| self.translate_reqwest_error(e, url))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response
            .bytes()
            .map_err(|e| self.translate_reqwest_error(e, url))?;

        debug!(url, status, bytes = body.len(), "received response");

        Ok(Fetched {
            status,
            content_type,
            body: body.to_vec(),
        })
    }

    /// Translates a reqwest error into a BadgeError.
    fn translate_reqwest_error(&self, error: reqwest::Error, url: &str) -> BadgeError {
        if error.is_timeout() {
            BadgeError::network_with_source(
                format!(
                    "Request to {} timed out after {} seconds",
                    url, self.timeout_seconds
                ),
                error,
            )
        } else if error.is_connect() {
            BadgeError::network_with_source(format!("Failed to connect to {}", url), error)
        } else if error.is_request() {
            BadgeError::network_with_source(format!("Failed to send request to {}", url), error)
        } else {
            BadgeError::network_with_source(format!("Network error communicating with {}", url), error)
        }
    }
}

/// Normalizes a registry URL by ensuring it has a scheme and removing trailing slashes.
///
/// A bare host defaults to `https://`.
pub fn normalize_url(url: &str) -> Result<String> {
    let url = url.trim();

    if url.is_empty() {
        return Err(BadgeError::config("Registry URL cannot be empty", None));
    }

    let url = if !url.starts_with("http://") && !url.starts_with("https://") {
        format!("https://{}", url)
    } else {
        url.to_string()
    };

    Ok(url.trim_end_matches('/').to_string())
}
