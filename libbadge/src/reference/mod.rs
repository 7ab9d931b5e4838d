//! Repository and tag references.
//!
//! [`RepositoryRef`] names a package on the registry (`owner/name`) and
//! [`Reference`] names one of its manifests by tag or by digest. Both are
//! validated when they are built, so holding one means it is safe to put into
//! a registry URL.

use crate::digest::Digest;
use crate::error::{BadgeError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;


static OWNER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9]([a-zA-Z0-9]?|[-]?([a-zA-Z0-9])){0,38}$").expect("owner pattern")
});

static NAME_SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9]{1,100}$").expect("name pattern"));

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z0-9_][a-zA-Z0-9_.-]{0,127}|sha256:[a-z0-9]{64})$").expect("tag pattern")
});

/// A package on the registry, `owner/name`.
///
/// # Examples
///
/// ```
/// use libbadge::reference::RepositoryRef;
///
/// let repo = RepositoryRef::new("eggplants", "ghcr-badge").unwrap();
/// assert_eq!(repo.to_string(), "eggplants/ghcr-badge");
/// assert_eq!(repo.scope(), "repository:eggplants/ghcr-badge:pull");
///
/// assert!(RepositoryRef::new("-leading-hyphen", "pkg").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryRef {
    owner: String,
    name: String,
}

impl RepositoryRef {
    /// Validates `owner` and `name` and builds a reference.
    ///
    /// Nested package names (`docker/jekyll`) are accepted when every
    /// `/`-separated segment matches the name pattern.
    pub fn new(owner: &str, name: &str) -> Result<Self> {
        if !OWNER_RE.is_match(owner) {
            return Err(BadgeError::invalid_image(format!(
                "owner does not match pattern: {}",
                owner
            )));
        }

        if name.split('/').any(|segment| !NAME_SEGMENT_RE.is_match(segment)) {
            return Err(BadgeError::invalid_image(format!(
                "package name does not match pattern: {}",
                name
            )));
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Returns the package owner.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the pull scope requested from the token endpoint.
    pub fn scope(&self) -> String {
        format!("repository:{}/{}:pull", self.owner, self.name)
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepositoryRef {
    type Err = BadgeError;

    /// Parses `owner/name`; everything after the first `/` is the name.
    fn from_str(s: &str) -> Result<Self> {
        let (owner, name) = s
            .split_once('/')
            .ok_or_else(|| BadgeError::invalid_image(format!("expected owner/name: {}", s)))?;
        Self::new(owner, name)
    }
}

/// A manifest reference: a tag such as `1.0.0` or a content digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// Conventional tag
    Tag(String),
    /// Content digest, used while following manifest lists
    Digest(Digest),
}

impl Reference {
    /// Returns true if this reference is a digest.
    pub fn is_digest(&self) -> bool {
        matches!(self, Reference::Digest(_))
    }
}

impl FromStr for Reference {
    type Err = BadgeError;

    /// Parses a tag or `sha256:` digest.
    ///
    /// # Examples
    ///
    /// ```
    /// use libbadge::reference::Reference;
    ///
    /// let tag: Reference = "latest".parse().unwrap();
    /// assert!(!tag.is_digest());
    ///
    /// assert!("@bad".parse::<Reference>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        if !TAG_RE.is_match(s) {
            return Err(BadgeError::invalid_tag(s));
        }

        if s.starts_with("sha256:") {
            Ok(Reference::Digest(s.parse()?))
        } else {
            Ok(Reference::Tag(s.to_string()))
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Tag(tag) => f.write_str(tag),
            Reference::Digest(digest) => digest.fmt(f),
        }
    }
}
