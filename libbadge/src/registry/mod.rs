//! Registry operations module.
//!
//! [`Registry`] combines the HTTP [`Client`] with an [`Authenticator`] to
//! answer the two questions badges ask: which tags does a package have, and
//! what does the manifest behind a tag look like. Manifest lists and image
//! indexes are followed through their first entry until a concrete manifest
//! is reached.

use crate::auth::Authenticator;
use crate::client::{Client, Fetched};
use crate::error::{BadgeError, Result};
use crate::oci::{Manifest, ManifestDocument};
use crate::reference::{Reference, RepositoryRef};
use std::collections::HashSet;
use tracing::debug;


/// Manifest fetches allowed for one resolution unless configured otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// High-level registry client.
///
/// Holds only immutable configuration, so one instance can serve concurrent
/// requests.
#[derive(Debug, Clone)]
pub struct Registry {
    client: Client,
    authenticator: Authenticator,
    max_depth: usize,
}

impl Registry {
    /// Creates a new `Registry`.
    ///
    /// # Examples
    ///
    /// ```
    /// use libbadge::auth::{Authenticator, TokenScheme};
    /// use libbadge::client::Client;
    /// use libbadge::registry::Registry;
    ///
    /// let client = Client::new("https://ghcr.io").unwrap();
    /// let auth = Authenticator::new(client.clone(), "https://ghcr.io/token")
    ///     .with_scheme(TokenScheme::Encoded);
    /// let registry = Registry::new(client, auth).with_max_depth(4);
    /// assert_eq!(registry.max_depth(), 4);
    /// ```
    pub fn new(client: Client, authenticator: Authenticator) -> Self {
        Self {
            client,
            authenticator,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum number of manifest fetches per resolution.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns the maximum number of manifest fetches per resolution.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Resolves `reference` down to a concrete manifest.
    ///
    /// Lists and indexes are dereferenced through their first entry. A new
    /// token is requested for every fetch.
    ///
    /// # Errors
    ///
    /// - `InvalidToken` if no token can be obtained
    /// - `InvalidManifest` for empty, error-bearing or unreachable manifests,
    ///   empty lists, digest cycles, or chains longer than the maximum depth
    /// - `InvalidMediaType` for documents of an unknown media type
    /// - `InvalidTag` when a list entry's digest is not a `sha256:` digest
    pub fn resolve_manifest(
        &self,
        repository: &RepositoryRef,
        reference: &Reference,
    ) -> Result<Manifest> {
        let mut current = reference.clone();
        let mut visited = HashSet::new();
        if let Reference::Digest(digest) = reference {
            visited.insert(digest.to_string());
        }

        for depth in 0..self.max_depth {
            debug!(repository = %repository, reference = %current, depth, "resolving manifest");

            let list = match self.fetch_document(repository, &current)? {
                ManifestDocument::DockerManifest(manifest)
                | ManifestDocument::OciManifest(manifest) => return Ok(manifest),
                ManifestDocument::DockerManifestList(list) | ManifestDocument::OciIndex(list) => {
                    list
                }
            };

            let (digest, entry) = list.first_entry()?;
            let next = match digest.parse::<Reference>()? {
                next @ Reference::Digest(_) => next,
                Reference::Tag(tag) => return Err(BadgeError::invalid_tag(tag)),
            };

            match &entry.platform {
                Some(platform) => debug!(digest = %next, %platform, "following first manifest list entry"),
                None => debug!(digest = %next, "following first manifest list entry"),
            }

            if !visited.insert(next.to_string()) {
                return Err(BadgeError::invalid_manifest(format!(
                    "manifest list of {} refers back to {}",
                    repository, next
                )));
            }
            current = next;
        }

        Err(BadgeError::invalid_manifest(format!(
            "manifest of {}:{} is nested deeper than {} levels",
            repository, reference, self.max_depth
        )))
    }

    /// Validates `reference` as a tag or digest, then resolves it.
    ///
    /// # Errors
    ///
    /// `InvalidTag` if `reference` is malformed; otherwise as
    /// [`Registry::resolve_manifest`].
    pub fn resolve_manifest_str(
        &self,
        repository: &RepositoryRef,
        reference: &str,
    ) -> Result<Manifest> {
        let reference: Reference = reference.parse()?;
        self.resolve_manifest(repository, &reference)
    }

    /// Fetches and decodes a single manifest document without following lists.
    pub fn fetch_document(
        &self,
        repository: &RepositoryRef,
        reference: &Reference,
    ) -> Result<ManifestDocument> {
        let token = self.authenticator.authenticate(repository)?;

        let fetched = self
            .client
            .fetch_manifest(&repository.to_string(), &reference.to_string(), token.as_str())
            .map_err(|e| {
                BadgeError::invalid_manifest_with_source(
                    format!("failed to fetch manifest {}:{}", repository, reference),
                    e,
                )
            })?;

        let document = ManifestDocument::from_bytes(&fetched.body, fetched.content_type.as_deref());

        if fetched.is_success() {
            if let Ok(document) = &document {
                debug!(media_type = %document.media_type(), "decoded manifest document");
            }
            return document;
        }

        Err(match document {
            Err(e @ BadgeError::InvalidManifest { .. }) => e,
            _ => status_error(&fetched, format!("manifest {}:{}", repository, reference)),
        })
    }

    /// Lists the tags of `repository` in registry order.
    ///
    /// # Errors
    ///
    /// - `InvalidToken` if no token can be obtained
    /// - `InvalidTagList` if the registry is unreachable, answers with an
    ///   error, or returns a missing, malformed or empty `tags` field
    pub fn list_tags(&self, repository: &RepositoryRef) -> Result<Vec<String>> {
        let token = self.authenticator.authenticate(repository)?;

        let fetched = self
            .client
            .fetch_tags(&repository.to_string(), token.as_str())
            .map_err(|e| {
                BadgeError::invalid_tag_list_with_source(
                    format!("failed to fetch tags of {}", repository),
                    e,
                )
            })?;

        if !fetched.is_success() {
            return Err(BadgeError::invalid_tag_list(format!(
                "registry returned HTTP {} for tags of {}: {}",
                fetched.status,
                repository,
                fetched.body_text()
            )));
        }

        let body: serde_json::Value = serde_json::from_slice(&fetched.body).map_err(|e| {
            BadgeError::invalid_tag_list_with_source("Failed to parse tags response", e)
        })?;

        let tags = match body.get("tags") {
            Some(serde_json::Value::Array(tags)) if !tags.is_empty() => tags,
            _ => {
                return Err(BadgeError::invalid_tag_list(format!(
                    "tags of {} are missing or empty",
                    repository
                )));
            }
        };

        let tags: Vec<String> = tags
            .iter()
            .map(|tag| match tag {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();

        debug!(repository = %repository, count = tags.len(), "listed tags");
        Ok(tags)
    }
}

fn status_error(fetched: &Fetched, what: String) -> BadgeError {
    BadgeError::invalid_manifest(format!(
        "registry returned HTTP {} for {}: {}",
        fetched.status,
        what,
        fetched.body_text()
    ))
}
