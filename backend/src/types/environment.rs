//! Environment configuration for different deployment stages

use std::env;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion};

/// Default bucket used against `LocalStack`
const DEVELOPMENT_BUCKET: &str = "image-service-media";

/// Default token secret used in development only
const DEVELOPMENT_JWT_SECRET: &str = "development-secret";

/// Application environment configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses `LocalStack`)
    Development,
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => Self::Development,
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Returns the S3 bucket name for the environment
    ///
    /// # Panics
    ///
    /// Panics if the `S3_BUCKET_NAME` environment variable is not set in production/staging
    #[must_use]
    pub fn s3_bucket(&self) -> String {
        match self {
            Self::Production | Self::Staging => {
                env::var("S3_BUCKET_NAME").expect("S3_BUCKET_NAME environment variable is not set")
            }
            Self::Development => {
                env::var("S3_BUCKET_NAME").unwrap_or_else(|_| DEVELOPMENT_BUCKET.to_string())
            }
        }
    }

    /// Returns the HS256 secret used to verify bearer tokens
    ///
    /// # Panics
    ///
    /// Panics if the `JWT_SECRET_KEY` environment variable is not set in production/staging
    #[must_use]
    pub fn jwt_secret(&self) -> String {
        match self {
            Self::Production | Self::Staging => {
                env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY environment variable is not set")
            }
            Self::Development => {
                env::var("JWT_SECRET_KEY").unwrap_or_else(|_| DEVELOPMENT_JWT_SECRET.to_string())
            }
        }
    }

    /// Whether logs should be emitted as JSON
    #[must_use]
    pub const fn json_logs(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }

    /// Returns the endpoint URL to use for AWS services
    #[must_use]
    pub const fn override_aws_endpoint_url(&self) -> Option<&str> {
        match self {
            // Regular AWS endpoints for production and staging
            Self::Production | Self::Staging => None,
            // LocalStack endpoint for development
            Self::Development => Some("http://localhost:4566"),
        }
    }

    /// AWS configuration with a single attempt per call and a bounded operation timeout
    ///
    /// Storage failures surface immediately; this service never retries.
    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let retry_config = RetryConfig::standard().with_max_attempts(1);

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let mut config_builder = aws_config::load_defaults(BehaviorVersion::latest())
            .await
            .to_builder()
            .retry_config(retry_config)
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = self.override_aws_endpoint_url() {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        config_builder.build()
    }

    /// AWS S3 service configuration
    pub async fn s3_client_config(&self) -> aws_sdk_s3::Config {
        let aws_config = self.aws_config().await;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();
        let mut builder = s3_config.to_builder();

        // Override "force path style" to true for compatibility with LocalStack
        // https://github.com/awslabs/aws-sdk-rust/discussions/874
        if matches!(self, Self::Development) {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }

    /// Base URL under which stored objects are addressed
    #[must_use]
    pub fn object_url_base(&self, bucket: &str) -> String {
        self.override_aws_endpoint_url().map_or_else(
            || format!("https://{bucket}.s3.amazonaws.com"),
            |endpoint| format!("{}/{bucket}", endpoint.trim_end_matches('/')),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_environment_from_env() {
        // Test development (default)
        env::remove_var("APP_ENV");
        assert_eq!(Environment::from_env(), Environment::Development);

        env::set_var("APP_ENV", " Staging ");
        assert_eq!(Environment::from_env(), Environment::Staging);

        env::set_var("APP_ENV", "production");
        assert_eq!(Environment::from_env(), Environment::Production);

        env::remove_var("APP_ENV");
    }

    #[test]
    #[serial]
    #[should_panic(expected = "Invalid environment: invalid")]
    fn test_invalid_environment() {
        env::set_var("APP_ENV", "invalid");
        let _ = Environment::from_env();
    }

    #[test]
    #[serial]
    fn test_development_defaults() {
        env::remove_var("S3_BUCKET_NAME");
        env::remove_var("JWT_SECRET_KEY");

        let env = Environment::Development;
        assert_eq!(env.s3_bucket(), DEVELOPMENT_BUCKET);
        assert_eq!(env.jwt_secret(), DEVELOPMENT_JWT_SECRET);
        assert!(!env.json_logs());
    }

    #[test]
    #[serial]
    #[should_panic(expected = "JWT_SECRET_KEY environment variable is not set")]
    fn test_production_requires_jwt_secret() {
        env::remove_var("JWT_SECRET_KEY");
        let _ = Environment::Production.jwt_secret();
    }

    #[test]
    fn test_object_url_base() {
        assert_eq!(
            Environment::Production.object_url_base("media"),
            "https://media.s3.amazonaws.com"
        );
        assert_eq!(
            Environment::Development.object_url_base("media"),
            "http://localhost:4566/media"
        );
    }
}
