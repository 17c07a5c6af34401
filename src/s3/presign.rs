use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::presigning::PresigningConfig;
use std::time::Duration;

use super::client::spaces_client;
use crate::config::ProviderConfig;
use crate::error::SigningError;
use crate::region::Endpoint;

/// Narrow signing capability the issuer depends on
#[async_trait]
pub trait Presigner: Send + Sync {
    /// Pre-signed URL allowing a PUT of `key`
    async fn presign_upload(
        &self,
        endpoint: &Endpoint,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, SigningError>;

    /// Pre-signed URL allowing a GET of `key`
    async fn presign_download(
        &self,
        endpoint: &Endpoint,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, SigningError>;
}

/// [`Presigner`] backed by the AWS S3 SDK, signing with the configured Spaces key
#[derive(Clone)]
pub struct SpacesPresigner {
    access_key: String,
    secret_key: String,
}

impl SpacesPresigner {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            access_key: config.access_key.clone(),
            secret_key: config.secret_key.clone(),
        }
    }
}

#[async_trait]
impl Presigner for SpacesPresigner {
    async fn presign_upload(
        &self,
        endpoint: &Endpoint,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, SigningError> {
        let client = spaces_client(&self.access_key, &self.secret_key, endpoint);

        let presigned_request = client
            .put_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning_config(expires_in)?)
            .await
            .map_err(|e| classify(bucket, e))?;

        Ok(presigned_request.uri().to_string())
    }

    async fn presign_download(
        &self,
        endpoint: &Endpoint,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, SigningError> {
        let client = spaces_client(&self.access_key, &self.secret_key, endpoint);

        let presigned_request = client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning_config(expires_in)?)
            .await
            .map_err(|e| classify(bucket, e))?;

        Ok(presigned_request.uri().to_string())
    }
}

fn presigning_config(expires_in: Duration) -> Result<PresigningConfig, SigningError> {
    PresigningConfig::expires_in(expires_in).map_err(|e| SigningError::InvalidExpiry {
        message: e.to_string(),
    })
}

fn classify<E, R>(bucket: &str, error: SdkError<E, R>) -> SigningError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let construction_failure = matches!(error, SdkError::ConstructionFailure(_));
    match SigningError::from_aws_error(bucket, DisplayErrorContext(&error)) {
        SigningError::Sdk(message) if construction_failure => SigningError::InvalidRequest {
            bucket: bucket.to_string(),
            message,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Region;

    fn presigner() -> SpacesPresigner {
        let config = ProviderConfig::new("DO00EXAMPLEKEY", "example-secret", "my-bucket", Region::Nyc3);
        SpacesPresigner::new(&config)
    }

    #[tokio::test]
    async fn test_presign_upload_url() {
        let url = presigner()
            .presign_upload(
                &Region::Nyc3.endpoint(),
                "my-bucket",
                "report.pdf",
                Duration::from_secs(300),
            )
            .await
            .unwrap();

        assert!(url.starts_with("https://"));
        assert!(url.contains("nyc3.digitaloceanspaces.com"));
        assert!(url.contains("report.pdf"));
        assert!(url.contains("X-Amz-Expires=300"));
        assert!(url.contains("X-Amz-Signature="));
        assert!(url.contains("DO00EXAMPLEKEY"));
    }

    #[tokio::test]
    async fn test_presign_download_url() {
        let url = presigner()
            .presign_download(
                &Region::Fra1.endpoint(),
                "my-bucket",
                "folder/photo.jpg",
                Duration::from_secs(600),
            )
            .await
            .unwrap();

        assert!(url.contains("fra1.digitaloceanspaces.com"));
        assert!(url.contains("photo.jpg"));
        assert!(url.contains("X-Amz-Expires=600"));
    }

    #[tokio::test]
    async fn test_expiry_beyond_limit_is_rejected() {
        let err = presigner()
            .presign_download(
                &Region::Nyc3.endpoint(),
                "my-bucket",
                "x.txt",
                Duration::from_secs(8 * 24 * 60 * 60),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SigningError::InvalidExpiry { .. }));
        assert!(err.is_client_error());
    }
}
