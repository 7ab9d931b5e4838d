//! Human-readable byte sizes for the size badge.

use humansize::{BINARY, DECIMAL, format_size as format_size_human};
use serde::{Deserialize, Serialize};


/// Unit family used when rendering a byte count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeUnits {
    /// Powers of 1024 (KiB, MiB)
    #[default]
    Binary,
    /// Powers of 1000 (kB, MB)
    Decimal,
}

impl SizeUnits {
    /// Formats `size_bytes` in this unit family.
    ///
    /// # Examples
    ///
    /// ```
    /// use libbadge::format::SizeUnits;
    ///
    /// assert_eq!(SizeUnits::Binary.format(1024 * 1024), "1 MiB");
    /// assert_eq!(SizeUnits::Decimal.format(1000 * 1000), "1 MB");
    /// ```
    pub fn format(self, size_bytes: u64) -> String {
        match self {
            SizeUnits::Binary => format_size(size_bytes),
            SizeUnits::Decimal => format_size_decimal(size_bytes),
        }
    }
}

/// Formats a byte size into a human-readable string using binary units (KiB, MiB).
///
/// # Examples
///
/// ```
/// use libbadge::format::format_size;
///
/// let size = 1024 * 1024 * 5; // 5 MiB
/// assert_eq!(format_size(size), "5 MiB");
///
/// let size = 1024; // 1 KiB
/// assert_eq!(format_size(size), "1 KiB");
/// ```
pub fn format_size(size_bytes: u64) -> String {
    format_size_human(size_bytes, BINARY)
}

/// Formats a byte size into a human-readable string using decimal units (kB, MB).
///
/// # Examples
///
/// ```
/// use libbadge::format::format_size_decimal;
///
/// let size = 1000 * 1000 * 5; // 5 MB
/// assert_eq!(format_size_decimal(size), "5 MB");
/// ```
pub fn format_size_decimal(size_bytes: u64) -> String {
    format_size_human(size_bytes, DECIMAL)
}
