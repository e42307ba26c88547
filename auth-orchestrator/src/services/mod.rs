pub mod identity_client;
pub mod metrics;

pub use identity_client::{Endpoint, IdentityClient, GENERIC_ERROR_MESSAGE};
