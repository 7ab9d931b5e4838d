//! Manifest documents returned by the registry.
//!
//! A manifest endpoint answers with one of four document shapes, told apart
//! by their media type. Docker's distribution format and the OCI image format
//! each have a concrete manifest and a list/index that points at per-platform
//! manifests by digest. [`ManifestDocument`] decodes a response body into the
//! right variant by looking at the `mediaType` discriminator first.

use crate::error::{BadgeError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

#[cfg(test)]
mod tests;

/// Docker image manifest, schema 2.
pub const MEDIA_TYPE_DOCKER_MANIFEST_V2: &str = "application/vnd.docker.distribution.manifest.v2+json";
/// Docker manifest list, schema 2.
pub const MEDIA_TYPE_DOCKER_MANIFEST_LIST_V2: &str =
    "application/vnd.docker.distribution.manifest.list.v2+json";
/// OCI image manifest.
pub const MEDIA_TYPE_OCI_MANIFEST_V1: &str = "application/vnd.oci.image.manifest.v1+json";
/// OCI image index.
pub const MEDIA_TYPE_OCI_INDEX_V1: &str = "application/vnd.oci.image.index.v1+json";

/// The manifest media types this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    DockerManifestV2,
    DockerManifestListV2,
    OciManifestV1,
    OciIndexV1,
}

impl MediaType {
    /// Maps a media type string onto a known kind.
    ///
    /// Parameters after `;` (as found in `Content-Type` headers) are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use libbadge::oci::MediaType;
    ///
    /// assert_eq!(
    ///     MediaType::parse("application/vnd.oci.image.index.v1+json"),
    ///     Some(MediaType::OciIndexV1)
    /// );
    /// assert_eq!(MediaType::parse("application/json"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let essence = s.split(';').next().unwrap_or_default().trim();
        match essence {
            MEDIA_TYPE_DOCKER_MANIFEST_V2 => Some(Self::DockerManifestV2),
            MEDIA_TYPE_DOCKER_MANIFEST_LIST_V2 => Some(Self::DockerManifestListV2),
            MEDIA_TYPE_OCI_MANIFEST_V1 => Some(Self::OciManifestV1),
            MEDIA_TYPE_OCI_INDEX_V1 => Some(Self::OciIndexV1),
            _ => None,
        }
    }

    /// Returns the media type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DockerManifestV2 => MEDIA_TYPE_DOCKER_MANIFEST_V2,
            Self::DockerManifestListV2 => MEDIA_TYPE_DOCKER_MANIFEST_LIST_V2,
            Self::OciManifestV1 => MEDIA_TYPE_OCI_MANIFEST_V1,
            Self::OciIndexV1 => MEDIA_TYPE_OCI_INDEX_V1,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform of an entry in a manifest list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Platform {
    #[serde(default)]
    pub architecture: String,
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub variant: Option<String>,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.architecture)?;
        if let Some(variant) = &self.variant {
            write!(f, "/{}", variant)?;
        }
        Ok(())
    }
}

/// A content descriptor: config blob, layer, or child manifest.
///
/// Every field is optional on the wire; a missing size counts as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub platform: Option<Platform>,
}

/// A concrete single-platform manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default)]
    pub config: Option<Descriptor>,
    #[serde(default)]
    pub layers: Vec<Descriptor>,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

impl Manifest {
    /// Size of the config blob, zero when absent.
    pub fn config_size(&self) -> u64 {
        self.config.as_ref().map_or(0, |config| config.size)
    }

    /// Sum of all layer sizes.
    ///
    /// # Errors
    ///
    /// `InvalidManifest` when the sizes overflow `u64`.
    pub fn layers_size(&self) -> Result<u64> {
        self.layers
            .iter()
            .try_fold(0u64, |total, layer| total.checked_add(layer.size))
            .ok_or_else(size_overflow)
    }

    /// Aggregate image size: config plus every layer.
    ///
    /// # Errors
    ///
    /// `InvalidManifest` when the sizes overflow `u64`.
    ///
    /// # Examples
    ///
    /// ```
    /// use libbadge::oci::{Descriptor, Manifest};
    ///
    /// let manifest = Manifest {
    ///     config: Some(Descriptor { size: 100, ..Default::default() }),
    ///     layers: vec![
    ///         Descriptor { size: 200, ..Default::default() },
    ///         Descriptor { size: 300, ..Default::default() },
    ///     ],
    ///     ..Default::default()
    /// };
    /// assert_eq!(manifest.total_size().unwrap(), 600);
    /// ```
    pub fn total_size(&self) -> Result<u64> {
        self.config_size()
            .checked_add(self.layers_size()?)
            .ok_or_else(size_overflow)
    }
}

fn size_overflow() -> BadgeError {
    BadgeError::invalid_manifest("image size does not fit in 64 bits")
}

/// A manifest list (Docker) or image index (OCI).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestList {
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default)]
    pub manifests: Vec<Descriptor>,
}

impl ManifestList {
    /// Returns the entry resolution follows: always the first one.
    ///
    /// Fails when the list is empty or the first entry has no digest.
    pub fn first_entry(&self) -> Result<(&str, &Descriptor)> {
        let first = self
            .manifests
            .first()
            .ok_or_else(|| BadgeError::invalid_manifest("Returned list of manifest is empty"))?;
        let digest = first
            .digest
            .as_deref()
            .filter(|digest| !digest.is_empty())
            .ok_or_else(|| BadgeError::invalid_manifest("Digest of a manifest is empty"))?;
        Ok((digest, first))
    }
}

/// One decoded manifest response, one variant per media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestDocument {
    DockerManifest(Manifest),
    OciManifest(Manifest),
    DockerManifestList(ManifestList),
    OciIndex(ManifestList),
}

/// `{"errors": [...]}` body returned by registries on failure.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    errors: Vec<ErrorInfo>,
}

#[derive(Debug, Deserialize)]
struct ErrorInfo {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl ManifestDocument {
    /// Decodes a manifest response body.
    ///
    /// The body's `mediaType` field picks the variant; when the body has none,
    /// `content_type` (the response header) is used instead.
    ///
    /// # Errors
    ///
    /// - `InvalidManifest` for an empty, `null`, non-JSON or error-bearing body,
    ///   or a body that does not fit the shape its media type announces
    /// - `InvalidMediaType` when the media type is missing or unknown
    pub fn from_bytes(bytes: &[u8], content_type: Option<&str>) -> Result<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(BadgeError::invalid_manifest("manifest is empty."));
        }

        let value: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| BadgeError::invalid_manifest_with_source("Failed to parse manifest JSON", e))?;

        if value.is_null() {
            return Err(BadgeError::invalid_manifest("manifest is empty."));
        }

        if let Some(errors) = value.get("errors") {
            return Err(BadgeError::invalid_manifest(format!(
                "manifest contains some error: {}",
                describe_errors(errors)
            )));
        }

        let declared = value
            .get("mediaType")
            .and_then(|v| v.as_str())
            .or(content_type)
            .unwrap_or_default();

        let media_type =
            MediaType::parse(declared).ok_or_else(|| BadgeError::invalid_media_type(declared))?;

        let document = match media_type {
            MediaType::DockerManifestV2 => Self::DockerManifest(decode(value)?),
            MediaType::OciManifestV1 => Self::OciManifest(decode(value)?),
            MediaType::DockerManifestListV2 => Self::DockerManifestList(decode(value)?),
            MediaType::OciIndexV1 => Self::OciIndex(decode(value)?),
        };
        Ok(document)
    }

    /// Returns the media type this document was decoded as.
    pub fn media_type(&self) -> MediaType {
        match self {
            Self::DockerManifest(_) => MediaType::DockerManifestV2,
            Self::OciManifest(_) => MediaType::OciManifestV1,
            Self::DockerManifestList(_) => MediaType::DockerManifestListV2,
            Self::OciIndex(_) => MediaType::OciIndexV1,
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| BadgeError::invalid_manifest_with_source("Failed to decode manifest document", e))
}

fn describe_errors(errors: &serde_json::Value) -> String {
    match serde_json::from_value::<ErrorResponse>(serde_json::json!({ "errors": errors })) {
        Ok(response) if !response.errors.is_empty() => response
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.code, e.message))
            .collect::<Vec<_>>()
            .join(", "),
        _ => errors.to_string(),
    }
}
