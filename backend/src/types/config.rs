//! Runtime configuration sourced from environment variables

use std::env;
use std::str::FromStr;
use std::time::Duration;

use strum::IntoEnumIterator;

use crate::image_service::ImageExtension;

/// Default upper bound for a decoded image (10 MiB)
pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Default lifetime of presigned read URLs
pub const DEFAULT_PRESIGNED_URL_EXPIRY_SECS: u64 = 3600;

/// Service configuration that is independent of the deployment stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Extensions accepted for upload, a subset of [`ImageExtension`]
    pub allowed_extensions: Vec<ImageExtension>,
    /// Maximum decoded image size in bytes
    pub max_file_size: usize,
    /// Upper-cased region names accepted on the `x-region` header
    pub allowed_regions: Vec<String>,
    /// Value of `Access-Control-Allow-Origin`
    pub cors_origin: String,
    /// Lifetime of presigned read URLs
    pub presigned_url_expiry: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: ImageExtension::iter().collect(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_regions: Vec::new(),
            cors_origin: "*".to_string(),
            presigned_url_expiry: Duration::from_secs(DEFAULT_PRESIGNED_URL_EXPIRY_SECS),
        }
    }
}

impl ServiceConfig {
    /// Loads the configuration from process environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup
    ///
    /// Unset or unparsable values fall back to their defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let allowed_extensions = lookup("ALLOWED_EXTENSIONS").map_or(
            defaults.allowed_extensions,
            |value| {
                split_list(&value)
                    .filter_map(|ext| ImageExtension::from_str(ext).ok())
                    .collect()
            },
        );

        let max_file_size = lookup("MAX_FILE_SIZE")
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(defaults.max_file_size);

        let allowed_regions = lookup("ALLOWED_REGIONS").map_or(defaults.allowed_regions, |value| {
            split_list(&value).map(str::to_uppercase).collect()
        });

        let cors_origin = lookup("CORS_ORIGIN")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.cors_origin);

        let presigned_url_expiry = lookup("PRESIGNED_URL_EXPIRY_SECS")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map_or(defaults.presigned_url_expiry, Duration::from_secs);

        Self {
            allowed_extensions,
            max_file_size,
            allowed_regions,
            cors_origin,
            presigned_url_expiry,
        }
    }

    /// Whether uploads with this extension are accepted
    #[must_use]
    pub fn is_extension_allowed(&self, extension: ImageExtension) -> bool {
        self.allowed_extensions.contains(&extension)
    }

    /// Case-insensitive match of a region header value against the allow-list
    #[must_use]
    pub fn is_region_allowed(&self, region: &str) -> bool {
        let region = region.trim().to_uppercase();
        !region.is_empty() && self.allowed_regions.iter().any(|allowed| *allowed == region)
    }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|item| !item.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServiceConfig::from_lookup(|_| None);

        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.allowed_extensions.len(), 7);
        assert_eq!(config.presigned_url_expiry, Duration::from_secs(3600));
        assert!(config.allowed_regions.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            ("ALLOWED_EXTENSIONS", "png, JPG,svg"),
            ("MAX_FILE_SIZE", "1024"),
            ("ALLOWED_REGIONS", "eu-west, us-east"),
            ("CORS_ORIGIN", "https://example.com"),
            ("PRESIGNED_URL_EXPIRY_SECS", "60"),
        ]));

        assert_eq!(
            config.allowed_extensions,
            vec![ImageExtension::Png, ImageExtension::Jpg]
        );
        assert_eq!(config.max_file_size, 1024);
        assert_eq!(config.allowed_regions, vec!["EU-WEST", "US-EAST"]);
        assert_eq!(config.cors_origin, "https://example.com");
        assert_eq!(config.presigned_url_expiry, Duration::from_secs(60));
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            ("MAX_FILE_SIZE", "ten megabytes"),
            ("PRESIGNED_URL_EXPIRY_SECS", "-1"),
        ]));

        assert_eq!(config.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert_eq!(
            config.presigned_url_expiry,
            Duration::from_secs(DEFAULT_PRESIGNED_URL_EXPIRY_SECS)
        );
    }

    #[test]
    fn test_region_match_is_case_insensitive() {
        let config = ServiceConfig::from_lookup(lookup_from(&[("ALLOWED_REGIONS", "EU-WEST")]));

        assert!(config.is_region_allowed("eu-west"));
        assert!(config.is_region_allowed(" Eu-West "));
        assert!(!config.is_region_allowed("us-east"));
        assert!(!config.is_region_allowed(""));
    }

    #[test]
    fn test_extension_allow_list() {
        let config = ServiceConfig {
            allowed_extensions: vec![ImageExtension::Png],
            ..ServiceConfig::default()
        };

        assert!(config.is_extension_allowed(ImageExtension::Png));
        assert!(!config.is_extension_allowed(ImageExtension::Gif));
    }
}
