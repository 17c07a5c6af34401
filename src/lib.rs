//! Issue time-limited pre-signed URLs for DigitalOcean Spaces objects.
//!
//! A request names an object, an operation (`GET` or `PUT`), and optionally a
//! region and a duration. [`handle`] validates it, signs it with the key held
//! in [`ProviderConfig`], and returns a [`Response`] carrying either the URL or
//! an error message.

pub mod config;
pub mod error;
pub mod handler;
pub mod issuer;
pub mod region;
pub mod request;
pub mod s3;

pub use config::ProviderConfig;
pub use error::{ConfigError, PresignError, SigningError, ValidationError};
pub use handler::{Response, handle, try_handle};
pub use issuer::{IssueResult, issue};
pub use region::{Endpoint, Region};
pub use request::{IssueRequest, Operation, RawRequest, normalize};
pub use s3::{Presigner, SpacesPresigner};
