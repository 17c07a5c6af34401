use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::region::Region;

/// Default bound on a single signing call
pub const DEFAULT_SIGNING_TIMEOUT: Duration = Duration::from_secs(10);

/// Process-wide provider configuration, built once at startup and never mutated
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    /// Region used when a request names none
    pub region: Region,
    /// Unknown request regions fall back to `region` instead of being rejected.
    /// Off unless `REGION_FALLBACK` is set, since `region` is always present.
    pub region_fallback: bool,
    pub signing_timeout: Duration,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("region_fallback", &self.region_fallback)
            .field("signing_timeout", &self.signing_timeout)
            .finish()
    }
}

impl ProviderConfig {
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        bucket: impl Into<String>,
        region: Region,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            bucket: bucket.into(),
            region,
            region_fallback: false,
            signing_timeout: DEFAULT_SIGNING_TIMEOUT,
        }
    }

    pub fn with_region_fallback(mut self, enabled: bool) -> Self {
        self.region_fallback = enabled;
        self
    }

    pub fn with_signing_timeout(mut self, timeout: Duration) -> Self {
        self.signing_timeout = timeout;
        self
    }

    /// Load configuration from environment variables and .env file
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok(); // Load .env file if it exists
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an explicit env file; process environment still wins
    pub fn from_env_file(path: &Path) -> Result<Self, ConfigError> {
        let env_file_error = |message: String| ConfigError::EnvFile {
            path: path.display().to_string(),
            message,
        };

        #[allow(deprecated)]
        let items = dotenv::from_path_iter(path).map_err(|e| env_file_error(e.to_string()))?;

        let mut values = HashMap::new();
        for item in items {
            let (key, value) = item.map_err(|e| env_file_error(e.to_string()))?;
            values.insert(key, value);
        }

        Self::from_lookup(|name| env::var(name).ok().or_else(|| values.get(name).cloned()))
    }

    /// Build configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing { var })
        };

        let access_key = required("SPACES_KEY")?;
        let secret_key = required("SPACES_SECRET")?;

        let bucket = required("BUCKET")?;
        Self::validate_bucket_name(&bucket)?;

        let region_name = required("REGION")?;
        let region = Region::lookup(&region_name).ok_or_else(|| ConfigError::Invalid {
            var: "REGION",
            reason: format!("'{}' is not a known Spaces region", region_name),
        })?;

        let region_fallback = match lookup("REGION_FALLBACK") {
            Some(value) => Self::parse_flag("REGION_FALLBACK", &value)?,
            None => false,
        };

        let signing_timeout = match lookup("SIGNING_TIMEOUT_SECS") {
            Some(value) => Self::parse_timeout(&value)?,
            None => DEFAULT_SIGNING_TIMEOUT,
        };

        Ok(Self {
            access_key,
            secret_key,
            bucket,
            region,
            region_fallback,
            signing_timeout,
        })
    }

    fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "" | "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ConfigError::Invalid {
                var,
                reason: format!("'{}' is not a boolean", other),
            }),
        }
    }

    fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
        let secs: u64 = value.trim().parse().map_err(|_| ConfigError::Invalid {
            var: "SIGNING_TIMEOUT_SECS",
            reason: format!("'{}' is not a whole number of seconds", value),
        })?;
        if secs == 0 {
            return Err(ConfigError::Invalid {
                var: "SIGNING_TIMEOUT_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(Duration::from_secs(secs))
    }

    /// Validate bucket name according to S3 naming rules
    fn validate_bucket_name(bucket: &str) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::Invalid {
            var: "BUCKET",
            reason,
        };

        if bucket.len() < 3 || bucket.len() > 63 {
            return Err(invalid(format!(
                "'{}' must be between 3 and 63 characters (got {})",
                bucket,
                bucket.len()
            )));
        }

        let is_edge =
            |c: Option<char>| c.is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
        if !is_edge(bucket.chars().next()) || !is_edge(bucket.chars().last()) {
            return Err(invalid(format!(
                "'{}' must start and end with a lowercase letter or number",
                bucket
            )));
        }

        if let Some(c) = bucket
            .chars()
            .find(|c| !c.is_ascii_lowercase() && !c.is_ascii_digit() && *c != '-' && *c != '.')
        {
            return Err(invalid(format!(
                "'{}' contains invalid character '{}'. Only lowercase letters, numbers, hyphens, and periods are allowed",
                bucket, c
            )));
        }

        if bucket.contains("..") {
            return Err(invalid(format!(
                "'{}' cannot contain consecutive periods",
                bucket
            )));
        }

        let parts: Vec<&str> = bucket.split('.').collect();
        if parts.len() == 4 && parts.iter().all(|part| part.parse::<u8>().is_ok()) {
            return Err(invalid(format!(
                "'{}' cannot be formatted as an IP address",
                bucket
            )));
        }

        Ok(())
    }
}
