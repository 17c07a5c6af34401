use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::{Client, config::Builder};

use crate::region::Endpoint;

/// Build an S3 client bound to a single Spaces endpoint with static credentials.
///
/// No network traffic happens here or during presigning; the client is only
/// used to assemble and sign requests locally.
pub fn spaces_client(access_key: &str, secret_key: &str, endpoint: &Endpoint) -> Client {
    let credentials = Credentials::new(access_key, secret_key, None, None, "spaces-presign");

    let s3_config = Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .credentials_provider(credentials)
        .region(Region::new(endpoint.region.code()))
        .endpoint_url(endpoint.url.as_str())
        .build();

    Client::from_conf(s3_config)
}
