use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::ProviderConfig;
use crate::error::PresignError;
use crate::issuer::{IssueResult, issue};
use crate::request::{RawRequest, normalize};
use crate::s3::Presigner;

/// Boundary response: status, optional headers, and either the URL or an error message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    fn issued(result: &IssueResult) -> Self {
        let headers = BTreeMap::from([
            (
                "Content-Type".to_string(),
                "text/plain; charset=utf-8".to_string(),
            ),
            ("X-Expires-At".to_string(), result.expires_at.to_rfc3339()),
        ]);
        Self {
            status_code: 200,
            headers,
            body: result.url.clone(),
        }
    }

    fn failed(err: &PresignError) -> Self {
        Self {
            status_code: err.status_code(),
            headers: BTreeMap::new(),
            body: err.to_string(),
        }
    }
}

/// Validate, sign, and return the outcome of a single request
pub async fn try_handle(
    config: &ProviderConfig,
    presigner: &dyn Presigner,
    raw: &RawRequest,
) -> crate::error::Result<IssueResult> {
    let req = normalize(raw, config)?;
    Ok(issue(config, presigner, &req).await?)
}

/// Full request/response cycle. Always yields exactly one URL or one error.
pub async fn handle(config: &ProviderConfig, presigner: &dyn Presigner, raw: RawRequest) -> Response {
    match try_handle(config, presigner, &raw).await {
        Ok(result) => {
            info!(
                "Issued {} URL for {} (expires {})",
                result.operation,
                result.object_key,
                result.expires_at.to_rfc3339()
            );
            Response::issued(&result)
        }
        Err(err @ PresignError::Validation(_)) => {
            warn!("Rejected request: {}", err);
            Response::failed(&err)
        }
        Err(err) => {
            error!("Signing failed: {}", err);
            Response::failed(&err)
        }
    }
}
