use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::ProviderConfig;
use crate::error::SigningError;
use crate::request::{IssueRequest, Operation};
use crate::s3::Presigner;

/// A signed URL together with the moment it stops working
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueResult {
    pub url: String,
    pub operation: Operation,
    pub object_key: String,
    pub expires_at: DateTime<Utc>,
}

/// Sign a validated request.
///
/// PUT maps to an upload URL and GET to a download URL. The signing call is
/// bounded by `config.signing_timeout`; failures are returned as-is and never
/// retried.
pub async fn issue(
    config: &ProviderConfig,
    presigner: &dyn Presigner,
    req: &IssueRequest,
) -> Result<IssueResult, SigningError> {
    let endpoint = req.region.endpoint();
    debug!(
        "Signing {} for s3://{}/{} via {} (expires in {}s)",
        req.operation,
        config.bucket,
        req.object_key,
        endpoint.url,
        req.expires_in.as_secs()
    );

    let signing = async {
        match req.operation {
            Operation::Put => {
                presigner
                    .presign_upload(&endpoint, &config.bucket, &req.object_key, req.expires_in)
                    .await
            }
            Operation::Get => {
                presigner
                    .presign_download(&endpoint, &config.bucket, &req.object_key, req.expires_in)
                    .await
            }
        }
    };

    let url = tokio::time::timeout(config.signing_timeout, signing)
        .await
        .map_err(|_| SigningError::Timeout {
            seconds: config.signing_timeout.as_secs(),
        })??;

    let expires_at = Utc::now()
        + chrono::Duration::from_std(req.expires_in).map_err(|e| SigningError::InvalidExpiry {
            message: e.to_string(),
        })?;

    Ok(IssueResult {
        url,
        operation: req.operation,
        object_key: req.object_key.clone(),
        expires_at,
    })
}
