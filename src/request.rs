use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::ProviderConfig;
use crate::error::ValidationError;
use crate::region::Region;

/// Expiry applied when the caller gives no duration
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(5 * 60);

/// S3 refuses presigned URLs valid for longer than 7 days
pub const MAX_EXPIRY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Caller-facing request, exactly as it arrives on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRequest {
    /// Name of the object to upload or download
    #[serde(default)]
    pub filename: Option<String>,
    /// "GET" or "PUT"
    #[serde(default, rename = "type")]
    pub operation: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    /// How long the URL stays valid, e.g. "5m"
    #[serde(default)]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Get,
    Put,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Get => "GET",
            Operation::Put => "PUT",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = ValidationError;

    /// Case-sensitive: only the exact tokens "GET" and "PUT" are accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Operation::Get),
            "PUT" => Ok(Operation::Put),
            other => Err(ValidationError::UnsupportedOperation {
                operation: other.to_string(),
            }),
        }
    }
}

/// A request that passed validation; every field is resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRequest {
    pub object_key: String,
    pub operation: Operation,
    pub region: Region,
    pub expires_in: Duration,
}

/// Validate a raw request and fill in defaults.
///
/// Missing filename and missing operation are both rejected; nothing is
/// substituted for them. Region and duration fall back to the configured
/// region and [`DEFAULT_EXPIRY`] when absent.
pub fn normalize(raw: &RawRequest, config: &ProviderConfig) -> Result<IssueRequest, ValidationError> {
    let object_key = match non_empty(&raw.filename) {
        Some(key) if !key.trim().is_empty() => key.to_string(),
        _ => return Err(ValidationError::MissingObjectKey),
    };

    let operation = non_empty(&raw.operation)
        .ok_or(ValidationError::MissingOperation)?
        .parse::<Operation>()?;

    let region = match non_empty(&raw.region) {
        None => config.region,
        Some(hint) => match Region::resolve(hint) {
            Ok(region) => region,
            Err(_) if config.region_fallback => {
                warn!(
                    "Unknown region '{}', falling back to {}",
                    hint, config.region
                );
                config.region
            }
            Err(e) => return Err(e),
        },
    };

    let expires_in = match non_empty(&raw.duration) {
        None => DEFAULT_EXPIRY,
        Some(input) => parse_expiry(input)?,
    };

    Ok(IssueRequest {
        object_key,
        operation,
        region,
        expires_in,
    })
}

/// Parse a duration such as "5m", "90s" or "1h30m" into a presign expiry
pub fn parse_expiry(input: &str) -> Result<Duration, ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidDuration {
        input: input.to_string(),
        reason,
    };

    let duration = humantime::parse_duration(input.trim()).map_err(|e| invalid(e.to_string()))?;

    if duration.is_zero() {
        return Err(invalid("duration must be positive".to_string()));
    }
    if duration > MAX_EXPIRY {
        return Err(invalid("duration cannot exceed 7 days".to_string()));
    }
    Ok(duration)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ProviderConfig {
        ProviderConfig::new("key", "secret", "my-bucket", Region::Sfo3)
    }

    fn raw(filename: &str, operation: &str) -> RawRequest {
        RawRequest {
            filename: Some(filename.to_string()),
            operation: Some(operation.to_string()),
            region: None,
            duration: None,
        }
    }

    #[test]
    fn test_defaults_are_applied() {
        let req = normalize(&raw("report.pdf", "PUT"), &config()).unwrap();
        assert_eq!(req.object_key, "report.pdf");
        assert_eq!(req.operation, Operation::Put);
        assert_eq!(req.region, Region::Sfo3);
        assert_eq!(req.expires_in, DEFAULT_EXPIRY);
        assert_eq!(req.expires_in.as_secs(), 300);
    }

    #[test]
    fn test_missing_object_key() {
        assert_eq!(
            normalize(&raw("", "GET"), &config()),
            Err(ValidationError::MissingObjectKey)
        );
        assert_eq!(
            normalize(&raw("   ", "GET"), &config()),
            Err(ValidationError::MissingObjectKey)
        );

        let mut request = raw("x", "GET");
        request.filename = None;
        assert_eq!(
            normalize(&request, &config()),
            Err(ValidationError::MissingObjectKey)
        );
    }

    #[test]
    fn test_missing_key_is_reported_before_operation() {
        assert_eq!(
            normalize(&raw("", "DELETE"), &config()),
            Err(ValidationError::MissingObjectKey)
        );
    }

    #[test]
    fn test_operation_is_case_sensitive() {
        for bad in ["DELETE", "get", "Put", "POST", " GET"] {
            assert_eq!(
                normalize(&raw("x.txt", bad), &config()),
                Err(ValidationError::UnsupportedOperation {
                    operation: bad.to_string()
                })
            );
        }
        assert_eq!(
            normalize(&raw("x.txt", "GET"), &config()).unwrap().operation,
            Operation::Get
        );
    }

    #[test]
    fn test_missing_operation_is_rejected() {
        let mut request = raw("x.txt", "");
        assert_eq!(
            normalize(&request, &config()),
            Err(ValidationError::MissingOperation)
        );
        request.operation = None;
        assert_eq!(
            normalize(&request, &config()),
            Err(ValidationError::MissingOperation)
        );
    }

    #[test]
    fn test_region_aliases() {
        for hint in ["SAN FRANCISCO", "san francisco", "sfo3"] {
            let mut request = raw("x", "GET");
            request.region = Some(hint.to_string());
            let cfg = ProviderConfig::new("k", "s", "my-bucket", Region::Nyc3);
            assert_eq!(normalize(&request, &cfg).unwrap().region, Region::Sfo3);
        }
    }

    #[test]
    fn test_unknown_region() {
        let mut request = raw("x", "GET");
        request.region = Some("atlantis".to_string());

        assert_eq!(
            normalize(&request, &config()),
            Err(ValidationError::UnknownRegion {
                region: "atlantis".to_string()
            })
        );

        let fallback = config().with_region_fallback(true);
        assert_eq!(normalize(&request, &fallback).unwrap().region, Region::Sfo3);
    }

    #[test]
    fn test_parse_expiry() {
        assert_eq!(parse_expiry("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_expiry("90s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_expiry("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_expiry("7d").unwrap(), MAX_EXPIRY);
    }

    #[test]
    fn test_parse_expiry_rejects_bad_values() {
        for bad in ["0s", "-5m", "five minutes", "10", "8d"] {
            assert!(
                matches!(parse_expiry(bad), Err(ValidationError::InvalidDuration { .. })),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_duration_flows_into_request() {
        let mut request = raw("x", "PUT");
        request.duration = Some("10m".to_string());
        assert_eq!(
            normalize(&request, &config()).unwrap().expires_in,
            Duration::from_secs(600)
        );

        request.duration = Some("0s".to_string());
        assert!(matches!(
            normalize(&request, &config()),
            Err(ValidationError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn test_raw_request_from_json() {
        let request: RawRequest =
            serde_json::from_str(r#"{"filename":"report.pdf","type":"PUT","region":"nyc3"}"#)
                .unwrap();
        assert_eq!(request.filename.as_deref(), Some("report.pdf"));
        assert_eq!(request.operation.as_deref(), Some("PUT"));
        assert_eq!(request.region.as_deref(), Some("nyc3"));
        assert_eq!(request.duration, None);

        let empty: RawRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, RawRequest::default());
    }
}
