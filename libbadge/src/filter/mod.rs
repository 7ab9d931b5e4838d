//! Tag filtering and selection.
//!
//! A [`FilterPolicy`] removes tags in two passes, both preserving the
//! registry's order:
//!
//! 1. the trim pattern drops release tags of a given shape (`patch` drops
//!    `v1.2.3`-like tags, `major` drops `v1.2`-like tags);
//! 2. the ignore globs drop every tag they match as a whole.
//!
//! [`latest`] and [`window`] then pick from the filtered list.

use crate::error::{BadgeError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;


/// Ignore globs applied when a request leaves `ignore` out.
pub const DEFAULT_IGNORE: &str = "latest";

static PATCH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v?\d+\.\d+\.\d+[^.]*$").expect("patch pattern"));

static MAJOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v?\d+\.\d+[^.]*$").expect("major pattern"));

/// Which release tags to trim away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrimPattern {
    /// Keep everything
    #[default]
    None,
    /// Drop `x.y.z` tags (with optional `v` prefix and suffix)
    Patch,
    /// Drop `x.y` tags (with optional `v` prefix and suffix)
    Major,
}

impl TrimPattern {
    /// Parses the `trim` request parameter.
    ///
    /// Unknown values mean no trimming.
    ///
    /// # Examples
    ///
    /// ```
    /// use libbadge::filter::TrimPattern;
    ///
    /// assert_eq!(TrimPattern::parse("patch"), TrimPattern::Patch);
    /// assert_eq!(TrimPattern::parse("minor"), TrimPattern::None);
    /// ```
    pub fn parse(s: &str) -> Self {
        match s {
            "patch" => Self::Patch,
            "major" => Self::Major,
            _ => Self::None,
        }
    }

    /// Returns true if `tag` is trimmed away by this pattern.
    pub fn matches(&self, tag: &str) -> bool {
        match self {
            Self::None => false,
            Self::Patch => PATCH_RE.is_match(tag),
            Self::Major => MAJOR_RE.is_match(tag),
        }
    }
}

impl fmt::Display for TrimPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str(""),
            Self::Patch => f.write_str("patch"),
            Self::Major => f.write_str("major"),
        }
    }
}

/// Exclusion policy for tag lists.
#[derive(Debug, Clone)]
pub struct FilterPolicy {
    patterns: Vec<String>,
    ignore: GlobSet,
    trim: TrimPattern,
}

impl FilterPolicy {
    /// Builds a policy from ignore globs and a trim pattern.
    ///
    /// Globs support `*`, `?`, `[...]` and `[!...]`, are case-sensitive and
    /// must match the whole tag. Empty patterns are skipped.
    ///
    /// # Errors
    ///
    /// `Usage` if a glob does not parse.
    pub fn new<I, S>(ignore: I, trim: TrimPattern) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut patterns = Vec::new();

        for pattern in ignore {
            let pattern = pattern.as_ref();
            if pattern.is_empty() {
                continue;
            }
            let glob = Glob::new(pattern).map_err(|e| {
                BadgeError::usage(format!("invalid ignore pattern '{}': {}", pattern, e))
            })?;
            builder.add(glob);
            patterns.push(pattern.to_string());
        }

        let ignore = builder
            .build()
            .map_err(|e| BadgeError::usage(format!("failed to build ignore patterns: {}", e)))?;

        Ok(Self {
            patterns,
            ignore,
            trim,
        })
    }

    /// Builds a policy from the string request parameters.
    ///
    /// `ignore` is a comma-separated glob list, `trim` is `""`, `"patch"` or
    /// `"major"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use libbadge::filter::FilterPolicy;
    ///
    /// let policy = FilterPolicy::parse("latest,*-rc*", "").unwrap();
    /// let tags = ["1.0.0", "1.1.0-rc1", "1.1.0", "latest"].map(String::from);
    /// assert_eq!(policy.apply(&tags), vec!["1.0.0", "1.1.0"]);
    /// ```
    pub fn parse(ignore: &str, trim: &str) -> Result<Self> {
        Self::new(ignore.split(','), TrimPattern::parse(trim))
    }

    /// A policy that keeps every tag.
    pub fn keep_all() -> Self {
        Self {
            patterns: Vec::new(),
            ignore: GlobSet::empty(),
            trim: TrimPattern::None,
        }
    }

    /// Returns the ignore globs as given.
    pub fn ignore_patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Returns the trim pattern.
    pub fn trim(&self) -> TrimPattern {
        self.trim
    }

    /// Returns true if `tag` survives the policy.
    pub fn keeps(&self, tag: &str) -> bool {
        !self.trim.matches(tag) && !self.ignore.is_match(tag)
    }

    /// Filters `tags`, preserving their order.
    pub fn apply(&self, tags: &[String]) -> Vec<String> {
        tags.iter().filter(|tag| self.keeps(tag)).cloned().collect()
    }
}

/// Returns the last `n` tags, oldest first.
///
/// # Examples
///
/// ```
/// use libbadge::filter::window;
///
/// let tags = ["1.0.0", "1.0.1", "2.0.0"].map(String::from);
/// assert_eq!(window(&tags, 2), ["1.0.1", "2.0.0"]);
/// assert_eq!(window(&tags, 10).len(), 3);
/// assert!(window(&tags, 0).is_empty());
/// ```
pub fn window(tags: &[String], n: usize) -> &[String] {
    &tags[tags.len().saturating_sub(n)..]
}

/// Returns the last tag.
///
/// # Errors
///
/// `InvalidTagList` when `tags` is empty.
pub fn latest(tags: &[String]) -> Result<&str> {
    tags.last()
        .map(String::as_str)
        .ok_or_else(|| BadgeError::invalid_tag_list("no tags left after filtering"))
}

/// Converts a signed window size from a request into a count.
///
/// # Errors
///
/// `Usage` when `n` is negative.
pub fn window_size(n: i64) -> Result<usize> {
    usize::try_from(n).map_err(|_| BadgeError::usage(format!("{} should be positive.", n)))
}
