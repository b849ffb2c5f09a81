//! Adapters for the external identity provider port.

pub mod disabled;
pub mod http_identity_client;

pub use disabled::DisabledIdentityProvider;
pub use http_identity_client::HttpIdentityClient;
