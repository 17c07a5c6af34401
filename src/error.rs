use thiserror::Error;

/// Request rejected before any signing takes place
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Object key absent or empty
    #[error("no filename provided")]
    MissingObjectKey,

    /// Operation absent or empty
    #[error("no request type provided (expected GET or PUT)")]
    MissingOperation,

    /// Operation present but not one of the two supported tokens
    #[error("unsupported request type '{operation}' (expected GET or PUT)")]
    UnsupportedOperation { operation: String },

    /// Region hint matched no alias
    #[error("invalid region given: '{region}'")]
    UnknownRegion { region: String },

    /// Duration did not parse or is out of range
    #[error("invalid duration '{input}': {reason}")]
    InvalidDuration { input: String, reason: String },
}

/// Failure reported by the signing capability
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
    /// Expiry rejected by the presigning config
    #[error("invalid presign expiry: {message}")]
    InvalidExpiry { message: String },

    /// Bucket, key or endpoint could not be turned into a request
    #[error("could not build presign request for '{bucket}': {message}")]
    InvalidRequest { bucket: String, message: String },

    /// Credentials were rejected while computing the signature
    #[error("credentials rejected for bucket '{bucket}': {message}")]
    Credentials { bucket: String, message: String },

    /// Signing did not finish within the configured bound
    #[error("signing timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Any other SDK failure
    #[error("signing failed: {0}")]
    Sdk(String),
}

impl SigningError {
    /// Classify an AWS SDK error by its rendered message
    pub fn from_aws_error<E: std::fmt::Display>(bucket: &str, error: E) -> Self {
        let message = error.to_string();
        let lower = message.to_lowercase();
        if lower.contains("credential")
            || lower.contains("signature")
            || lower.contains("access denied")
            || lower.contains("forbidden")
        {
            Self::Credentials {
                bucket: bucket.to_string(),
                message,
            }
        } else if lower.contains("failed to construct request") || lower.contains("endpoint") {
            Self::InvalidRequest {
                bucket: bucket.to_string(),
                message,
            }
        } else {
            Self::Sdk(message)
        }
    }

    /// True when the failure was caused by caller input rather than configuration
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidExpiry { .. } | Self::InvalidRequest { .. })
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidExpiry { .. } | Self::InvalidRequest { .. } => 400,
            Self::Timeout { .. } => 504,
            Self::Credentials { .. } | Self::Sdk(_) => 500,
        }
    }
}

/// Startup configuration is missing or malformed; the process must not serve requests
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} not found in environment. Please set it in .env file")]
    Missing { var: &'static str },

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("failed to read env file {path}: {message}")]
    EnvFile { path: String, message: String },
}

/// Any failure the presign flow can surface
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PresignError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PresignError {
    /// HTTP-style status for the boundary response
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Signing(e) => e.status_code(),
            Self::Config(_) => 500,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(ValidationError::UnknownRegion { region }) => {
                format!(
                    "Invalid region given: '{}'\n\nPossible solutions:\n  \
                     1. Use one of: sfo3, fra1, ams3, nyc3, sgp1\n  \
                     2. Or a city name: San Francisco, Frankfurt, Amsterdam, New York, Singapore",
                    region
                )
            }
            Self::Validation(ValidationError::InvalidDuration { input, reason }) => {
                format!(
                    "Invalid duration '{}': {}\n\nPossible solutions:\n  \
                     1. Use a unit suffix: 90s, 5m, 1h30m\n  \
                     2. Keep it above zero and at most 7 days",
                    input, reason
                )
            }
            Self::Signing(SigningError::Credentials { bucket, message }) => {
                format!(
                    "Credentials rejected for bucket '{}': {}\n\nPossible solutions:\n  \
                     1. Check SPACES_KEY and SPACES_SECRET in .env\n  \
                     2. Verify the key has access to the bucket\n  \
                     3. Check REGION in .env matches the bucket region",
                    bucket, message
                )
            }
            Self::Config(ConfigError::Missing { var }) => {
                format!(
                    "{} not found in environment\n\nPossible solutions:\n  \
                     1. Add {}=... to the .env file\n  \
                     2. Export it in the shell: export {}=...",
                    var, var, var
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type for presign operations
pub type Result<T> = std::result::Result<T, PresignError>;
