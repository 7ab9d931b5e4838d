//! libbadge - status badges for container images
//!
//! libbadge answers the questions behind image badges for packages on a
//! container registry (ghcr.io by default): which tags does a package have,
//! which one is the latest, and how large is the image behind a tag.
//!
//! # Quick Start
//!
//! ```no_run
//! use libbadge::{BadgeParams, BadgeService, RepositoryRef};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = BadgeService::builder().build()?;
//!     let repo = RepositoryRef::new("eggplants", "ghcr-badge")?;
//!
//!     // "image tags: 0.3.0 | 0.4.0 | 0.5.0"
//!     let badge = service.tags_badge(&repo, &BadgeParams::default().with_n(3))?;
//!     println!("{}", badge);
//!
//!     // Size of the image behind a tag, config plus layers
//!     let bytes = service.image_size(&repo, "latest")?;
//!     println!("{} bytes", bytes);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Main Types
//!
//! - [`BadgeService`] - Main entry point, built by [`BadgeServiceBuilder`]
//! - [`RepositoryRef`] - Validated `owner/name` of a package
//! - [`FilterPolicy`] - Ignore globs and trim pattern applied to tag lists
//! - [`Badge`] - Label, value and color handed to a [`BadgeRenderer`]
//! - [`Config`] - Layered settings (defaults, YAML file, `BADGE_*` variables)
//! - [`BadgeError`] - Every failure; see [`BadgeError::renders_as_invalid`]
//!
//! # Architecture
//!
//! - **High-level API** ([`BadgeService`]) - Recommended for most users
//! - **Low-level modules** - The registry client, token provider, manifest
//!   model and tag filter, public but hidden from the docs

#![warn(clippy::all)]

/// Returns the libbadge crate version.
///
/// # Examples
///
/// ```
/// let version = libbadge::version();
/// assert!(!version.is_empty());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// High-level public API (main entry point)
mod service;
pub use service::{BadgeService, BadgeServiceBuilder, DEFAULT_SIZE_TAG};

// Re-export commonly used types for convenience
pub use auth::{Credentials, TokenScheme};
pub use badge::{Badge, BadgeKind, BadgeParams, BadgeRenderer};
pub use config::Config;
pub use digest::Digest;
pub use error::{BadgeError, Result};
pub use filter::{FilterPolicy, TrimPattern};
pub use format::SizeUnits;
pub use oci::{Manifest, ManifestDocument};
pub use reference::{Reference, RepositoryRef};

// Low-level implementation modules (hidden from docs but still public)
#[doc(hidden)]
pub mod auth;
#[doc(hidden)]
pub mod badge;
#[doc(hidden)]
pub mod client;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod digest;
#[doc(hidden)]
pub mod error;
#[doc(hidden)]
pub mod filter;
#[doc(hidden)]
pub mod format;
#[doc(hidden)]
pub mod oci;
#[doc(hidden)]
pub mod reference;
#[doc(hidden)]
pub mod registry;
