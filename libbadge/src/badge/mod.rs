//! Badge content handed to the renderer.
//!
//! The core produces plain values (a tag list, one tag, a byte count); this
//! module wraps them into an immutable [`Badge`] and parses the request
//! parameters that shape it. Drawing the badge is left to a
//! [`BadgeRenderer`] implementation.

use crate::error::{BadgeError, Result};
use std::fmt;
use std::str::FromStr;


/// Color of badges that carry a value.
pub const DEFAULT_COLOR: &str = "#44cc11";

/// Color of the "invalid" badge.
pub const INVALID_COLOR: &str = "#e05d44";

/// Value shown when the registry returned nothing usable.
pub const INVALID_VALUE: &str = "invalid";

/// Separator between tags on the tags badge.
pub const TAG_SEPARATOR: &str = " | ";

/// A badge: a label, a value and the color of the value side.
///
/// # Examples
///
/// ```
/// use libbadge::badge::Badge;
///
/// let badge = Badge::invalid("image size");
/// assert_eq!(badge.value(), "invalid");
/// assert_eq!(badge.color(), "#e05d44");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    label: String,
    value: String,
    color: String,
    invalid: bool,
}

impl Badge {
    /// Creates a badge.
    pub fn new(
        label: impl Into<String>,
        value: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            color: color.into(),
            invalid: false,
        }
    }

    /// The fixed badge shown instead of a value when the registry response
    /// was unusable.
    pub fn invalid(label: impl Into<String>) -> Self {
        Self {
            invalid: true,
            ..Self::new(label, INVALID_VALUE, INVALID_COLOR)
        }
    }

    /// Returns a copy of this badge with another color.
    pub fn with_color(self, color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            ..self
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    /// Returns true only for badges made by [`Badge::invalid`]; a tag that
    /// happens to be named `invalid` does not count.
    pub fn is_invalid(&self) -> bool {
        self.invalid
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

/// Turns a badge into its final representation, typically SVG.
pub trait BadgeRenderer {
    fn render(&self, badge: &Badge) -> String;
}

/// The badges a package can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeKind {
    /// The most recent tags
    Tags,
    /// The single most recent tag
    LatestTag,
    /// Image size of one tag
    Size,
}

impl BadgeKind {
    /// Label used when the request does not set one.
    pub fn default_label(&self) -> &'static str {
        match self {
            Self::Tags => "image tags",
            Self::LatestTag => "version",
            Self::Size => "image size",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tags => "tags",
            Self::LatestTag => "latest_tag",
            Self::Size => "size",
        }
    }
}

impl FromStr for BadgeKind {
    type Err = BadgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "tags" => Ok(Self::Tags),
            "latest_tag" => Ok(Self::LatestTag),
            "size" => Ok(Self::Size),
            other => Err(BadgeError::usage(format!("unknown badge kind: {}", other))),
        }
    }
}

impl fmt::Display for BadgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied badge parameters. Unset fields fall back to configured
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadgeParams {
    pub color: Option<String>,
    pub ignore: Option<String>,
    pub label: Option<String>,
    pub n: Option<i64>,
    pub trim: Option<String>,
    pub tag: Option<String>,
}

impl BadgeParams {
    /// Parses query-string style key/value pairs.
    ///
    /// Unknown keys are ignored; a repeated key keeps its last value.
    ///
    /// # Errors
    ///
    /// `Usage` if `n` is not an integer.
    ///
    /// # Examples
    ///
    /// ```
    /// use libbadge::badge::BadgeParams;
    ///
    /// let params = BadgeParams::from_pairs([("n", "5"), ("trim", "patch")]).unwrap();
    /// assert_eq!(params.n, Some(5));
    /// assert_eq!(params.trim.as_deref(), Some("patch"));
    ///
    /// assert!(BadgeParams::from_pairs([("n", "five")]).is_err());
    /// ```
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let value = value.into();
            match key.as_ref() {
                "color" => params.color = Some(value),
                "ignore" => params.ignore = Some(value),
                "label" => params.label = Some(value),
                "trim" => params.trim = Some(value),
                "tag" => params.tag = Some(value),
                "n" => {
                    let n = value.trim().parse::<i64>().map_err(|_| {
                        BadgeError::usage(format!("n must be an integer: {}", value))
                    })?;
                    params.n = Some(n);
                }
                _ => {}
            }
        }
        Ok(params)
    }

    /// Sets the number of tags.
    pub fn with_n(mut self, n: i64) -> Self {
        self.n = Some(n);
        self
    }

    /// Sets the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the tag or digest of the size badge.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Sets the ignore globs.
    pub fn with_ignore(mut self, ignore: impl Into<String>) -> Self {
        self.ignore = Some(ignore.into());
        self
    }

    /// Sets the trim pattern.
    pub fn with_trim(mut self, trim: impl Into<String>) -> Self {
        self.trim = Some(trim.into());
        self
    }

    /// Sets the color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}
