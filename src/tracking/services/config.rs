//! Configuration for tracking services.

use serde::Deserialize;

/// Tunables for listing endpoints.
///
/// # Examples
///
/// ```
/// use worktrack::tracking::services::TrackingConfig;
///
/// let config = TrackingConfig::default();
/// assert_eq!(config.default_page_size, 10);
///
/// let compact = TrackingConfig::compact();
/// assert!(compact.max_page_size < config.max_page_size);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Page size used when a listing request does not specify one.
    pub default_page_size: u64,
    /// Largest page size a listing request may ask for; larger requests are
    /// clamped.
    pub max_page_size: u64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl TrackingConfig {
    /// Creates a configuration with small pages.
    ///
    /// Useful for constrained clients and for exercising pagination in tests.
    #[must_use]
    pub const fn compact() -> Self {
        Self {
            default_page_size: 5,
            max_page_size: 25,
        }
    }
}
