//! Error types for libbadge
//!
//! Every failure of the resolver and tag filter maps onto one of the kinds
//! below. Three of them ([`BadgeError::InvalidTagList`],
//! [`BadgeError::InvalidManifest`] and [`BadgeError::InvalidMediaType`]) are the
//! expected registry-side failures that callers turn into an "invalid" badge;
//! the rest are caller or configuration errors and should fail the request.

use thiserror::Error;


/// Boxed source error carried by the variants that wrap a lower-level failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for badge operations
#[derive(Error, Debug)]
pub enum BadgeError {
    /// Owner or repository name failed validation
    #[error("Invalid image: {message}")]
    InvalidImage { message: String },

    /// The token endpoint did not hand out a usable token
    #[error("Invalid token: {message}")]
    InvalidToken {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Malformed tag or digest string
    #[error("Invalid tag: {tag}")]
    InvalidTag { tag: String },

    /// Empty or malformed tag list response
    #[error("Invalid tag list: {message}")]
    InvalidTagList {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Empty, error-bearing or malformed manifest response
    #[error("Invalid manifest: {message}")]
    InvalidManifest {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The manifest declared a media type this crate does not understand
    #[error("Invalid media type: {media_type}")]
    InvalidMediaType { media_type: String },

    /// Caller supplied an unusable parameter (negative count, bad glob, ...)
    #[error("Usage error: {message}")]
    Usage { message: String },

    /// Transport failures (connection, timeout, DNS).
    ///
    /// Registry operations wrap this into the `Invalid*` kind of the endpoint
    /// that failed, so it only surfaces from the raw [`crate::client::Client`].
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Configuration errors (invalid config file, bad values)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<String>,
        #[source]
        source: Option<BoxError>,
    },
}

/// Result type alias for badge operations
pub type Result<T> = std::result::Result<T, BadgeError>;

impl BadgeError {
    /// Creates a new invalid image error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libbadge::error::BadgeError;
    ///
    /// let err = BadgeError::invalid_image("owner is too long");
    /// assert!(matches!(err, BadgeError::InvalidImage { .. }));
    /// ```
    pub fn invalid_image<S: Into<String>>(message: S) -> Self {
        Self::InvalidImage {
            message: message.into(),
        }
    }

    /// Creates a new invalid token error.
    pub fn invalid_token<S: Into<String>>(message: S) -> Self {
        Self::InvalidToken {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new invalid token error with a source error.
    pub fn invalid_token_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::InvalidToken {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new invalid tag error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libbadge::error::BadgeError;
    ///
    /// let err = BadgeError::invalid_tag("-bad");
    /// assert_eq!(err.to_string(), "Invalid tag: -bad");
    /// ```
    pub fn invalid_tag<S: Into<String>>(tag: S) -> Self {
        Self::InvalidTag { tag: tag.into() }
    }

    /// Creates a new invalid tag list error.
    pub fn invalid_tag_list<S: Into<String>>(message: S) -> Self {
        Self::InvalidTagList {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new invalid tag list error with a source error.
    pub fn invalid_tag_list_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::InvalidTagList {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new invalid manifest error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libbadge::error::BadgeError;
    ///
    /// let err = BadgeError::invalid_manifest("Returned list of manifest is empty");
    /// assert!(err.renders_as_invalid());
    /// ```
    pub fn invalid_manifest<S: Into<String>>(message: S) -> Self {
        Self::InvalidManifest {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new invalid manifest error with a source error.
    pub fn invalid_manifest_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::InvalidManifest {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new invalid media type error.
    pub fn invalid_media_type<S: Into<String>>(media_type: S) -> Self {
        Self::InvalidMediaType {
            media_type: media_type.into(),
        }
    }

    /// Creates a new usage error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libbadge::error::BadgeError;
    ///
    /// let err = BadgeError::usage("-1 should be positive.");
    /// assert!(!err.renders_as_invalid());
    /// ```
    pub fn usage<S: Into<String>>(message: S) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Creates a new network error.
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new network error with a source error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libbadge::error::BadgeError;
    /// use std::io;
    ///
    /// let io_err = io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused");
    /// let err = BadgeError::network_with_source("failed to connect", io_err);
    /// assert!(matches!(err, BadgeError::Network { .. }));
    /// ```
    pub fn network_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S, path: Option<S>) -> Self {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: None,
        }
    }

    /// Creates a new configuration error with a source error.
    pub fn config_with_source<S, E>(message: S, path: Option<S>, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: Some(Box::new(source)),
        }
    }

    /// Returns true for the failures a badge front-end shows as an "invalid"
    /// badge instead of failing the request.
    pub fn renders_as_invalid(&self) -> bool {
        matches!(
            self,
            Self::InvalidTagList { .. } | Self::InvalidManifest { .. } | Self::InvalidMediaType { .. }
        )
    }
}
