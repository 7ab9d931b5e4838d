//! Badge service.
//!
//! [`BadgeService`] is the entry point a badge front-end calls. It ties the
//! registry operations to the tag filter and the size formatter, and turns
//! the expected registry-side failures into the "invalid" badge.
//!
//! # Examples
//!
//! ```no_run
//! use libbadge::{BadgeParams, BadgeService, RepositoryRef};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = BadgeService::builder().build()?;
//!     let repo = RepositoryRef::new("eggplants", "ghcr-badge")?;
//!
//!     let tags = service.select_window(&repo, &service.default_policy()?, 3)?;
//!     println!("{}", tags.join(" | "));
//!
//!     let badge = service.size_badge(&repo, &BadgeParams::default())?;
//!     println!("{}", badge);
//!     Ok(())
//! }
//! ```

use crate::auth::{Authenticator, Credentials};
use crate::badge::{Badge, BadgeKind, BadgeParams, TAG_SEPARATOR};
use crate::client::{Client, ClientConfig};
use crate::config::{BadgeDefaults, Config};
use crate::error::Result;
use crate::filter::{self, FilterPolicy};
use crate::reference::RepositoryRef;
use crate::registry::Registry;
use tracing::{debug, warn};

/// Tag used by the size badge when the request names none.
pub const DEFAULT_SIZE_TAG: &str = "latest";

/// Produces tag lists, sizes and badges for packages on one registry.
///
/// Holds only immutable configuration; share it freely between threads.
#[derive(Debug, Clone)]
pub struct BadgeService {
    registry: Registry,
    defaults: BadgeDefaults,
}

impl BadgeService {
    /// Creates a builder for configuring a `BadgeService`.
    pub fn builder() -> BadgeServiceBuilder {
        BadgeServiceBuilder::new()
    }

    /// Creates a service from an already assembled registry.
    pub fn new(registry: Registry, defaults: BadgeDefaults) -> Self {
        Self { registry, defaults }
    }

    /// Returns the underlying registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the configured badge defaults.
    pub fn defaults(&self) -> &BadgeDefaults {
        &self.defaults
    }

    /// The filter policy built from the configured `ignore` and `trim`.
    pub fn default_policy(&self) -> Result<FilterPolicy> {
        FilterPolicy::parse(&self.defaults.ignore, &self.defaults.trim)
    }

    /// The filter policy of a request, falling back to configured defaults.
    pub fn policy_for(&self, params: &BadgeParams) -> Result<FilterPolicy> {
        FilterPolicy::parse(
            params.ignore.as_deref().unwrap_or(&self.defaults.ignore),
            params.trim.as_deref().unwrap_or(&self.defaults.trim),
        )
    }

    /// Lists the tags of `repository` that survive `policy`, in registry order.
    pub fn filter_tags(&self, repository: &RepositoryRef, policy: &FilterPolicy) -> Result<Vec<String>> {
        let tags = self.registry.list_tags(repository)?;
        let filtered = policy.apply(&tags);
        debug!(
            repository = %repository,
            listed = tags.len(),
            kept = filtered.len(),
            "filtered tags"
        );
        Ok(filtered)
    }

    /// Returns the most recent tag surviving `policy`.
    ///
    /// # Errors
    ///
    /// `InvalidTagList` when no tag survives.
    pub fn select_latest(&self, repository: &RepositoryRef, policy: &FilterPolicy) -> Result<String> {
        let tags = self.filter_tags(repository, policy)?;
        filter::latest(&tags).map(str::to_string)
    }

    /// Returns the `n` most recent tags surviving `policy`, oldest first.
    ///
    /// # Errors
    ///
    /// `Usage` when `n` is negative; no request is made in that case.
    pub fn select_window(
        &self,
        repository: &RepositoryRef,
        policy: &FilterPolicy,
        n: i64,
    ) -> Result<Vec<String>> {
        let n = filter::window_size(n)?;
        let tags = self.filter_tags(repository, policy)?;
        Ok(filter::window(&tags, n).to_vec())
    }

    /// Returns the image size in bytes behind a tag or digest: the config
    /// blob plus every layer of the resolved manifest.
    pub fn image_size(&self, repository: &RepositoryRef, tag_or_digest: &str) -> Result<u64> {
        let manifest = self.registry.resolve_manifest_str(repository, tag_or_digest)?;
        manifest.total_size()
    }

    /// Badge listing the most recent tags, joined with `" | "`.
    pub fn tags_badge(&self, repository: &RepositoryRef, params: &BadgeParams) -> Result<Badge> {
        let label = self.label(BadgeKind::Tags, params);
        let n = params
            .n
            .unwrap_or_else(|| i64::try_from(self.defaults.tags_count).unwrap_or(i64::MAX));
        filter::window_size(n)?;
        let policy = self.policy_for(params)?;

        let value = self
            .select_window(repository, &policy, n)
            .map(|tags| tags.join(TAG_SEPARATOR));
        self.finish(label, value, params)
    }

    /// Badge showing the most recent tag.
    pub fn latest_tag_badge(&self, repository: &RepositoryRef, params: &BadgeParams) -> Result<Badge> {
        let label = self.label(BadgeKind::LatestTag, params);
        let policy = self.policy_for(params)?;

        let value = self.select_latest(repository, &policy);
        self.finish(label, value, params)
    }

    /// Badge showing the image size of `params.tag` (default `latest`).
    pub fn size_badge(&self, repository: &RepositoryRef, params: &BadgeParams) -> Result<Badge> {
        let label = self.label(BadgeKind::Size, params);
        let tag = params.tag.as_deref().unwrap_or(DEFAULT_SIZE_TAG);

        let value = self
            .image_size(repository, tag)
            .map(|size| self.defaults.size_units.format(size));
        self.finish(label, value, params)
    }

    /// Produces the badge of the given kind.
    pub fn badge(&self, kind: BadgeKind, repository: &RepositoryRef, params: &BadgeParams) -> Result<Badge> {
        match kind {
            BadgeKind::Tags => self.tags_badge(repository, params),
            BadgeKind::LatestTag => self.latest_tag_badge(repository, params),
            BadgeKind::Size => self.size_badge(repository, params),
        }
    }

    fn label(&self, kind: BadgeKind, params: &BadgeParams) -> String {
        params
            .label
            .clone()
            .unwrap_or_else(|| kind.default_label().to_string())
    }

    fn finish(&self, label: String, value: Result<String>, params: &BadgeParams) -> Result<Badge> {
        match value {
            Ok(value) => {
                let color = params.color.as_deref().unwrap_or(&self.defaults.color);
                Ok(Badge::new(label, value, color))
            }
            Err(e) if e.renders_as_invalid() => {
                warn!(label = %label, error = %e, "rendering invalid badge");
                Ok(Badge::invalid(label).with_color(&self.defaults.invalid_color))
            }
            Err(e) => Err(e),
        }
    }
}

/// Builder for creating a configured [`BadgeService`].
///
/// # Examples
///
/// ```
/// use libbadge::{BadgeService, Config};
/// use libbadge::auth::TokenScheme;
///
/// let mut config = Config::default();
/// config.registry.token_scheme = TokenScheme::Encoded;
///
/// let service = BadgeService::builder().with_config(config).build().unwrap();
/// assert_eq!(service.defaults().tags_count, 3);
/// ```
#[derive(Debug, Default)]
pub struct BadgeServiceBuilder {
    config: Option<Config>,
    credentials: Option<Credentials>,
}

impl BadgeServiceBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set configuration directly.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Set credentials for the token endpoint.
    ///
    /// Takes precedence over `registry.username`/`registry.password`.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Build the `BadgeService`.
    pub fn build(self) -> Result<BadgeService> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let client_config = ClientConfig::new()
            .with_timeout(config.network.timeout)
            .with_user_agent(config.network.user_agent.clone());
        let client = Client::with_config(&config.registry.url, client_config)?;

        let token_url = config
            .registry
            .token_url
            .clone()
            .unwrap_or_else(|| format!("{}/token", client.registry_url()));

        let credentials = match (self.credentials, &config.registry) {
            (Some(credentials), _) => credentials,
            (None, registry) => match (&registry.username, &registry.password) {
                (Some(username), Some(password)) => Credentials::basic(username, password),
                _ => Credentials::Anonymous,
            },
        };

        let authenticator = Authenticator::new(client.clone(), token_url)
            .with_service(config.registry.service.clone())
            .with_scheme(config.registry.token_scheme)
            .with_credentials(credentials);

        let registry = Registry::new(client, authenticator).with_max_depth(config.resolver.max_depth);

        debug!(registry = %config.registry.url, "badge service ready");
        Ok(BadgeService::new(registry, config.badge))
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
