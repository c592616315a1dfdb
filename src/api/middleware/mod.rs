//! API middleware components

pub mod api_key_auth;
pub mod logging;
pub mod security;
pub mod user_auth;

pub use api_key_auth::RequireApiKey;
pub use logging::logging_middleware;
pub use security::security_headers_middleware;
pub use user_auth::RequireUser;
