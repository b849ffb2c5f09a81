pub mod external_auth;

pub use external_auth::ExternalAuthPort;
