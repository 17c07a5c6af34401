pub mod client;
pub mod presign;

pub use client::spaces_client;
pub use presign::{Presigner, SpacesPresigner};
