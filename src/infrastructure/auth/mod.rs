//! Authentication infrastructure module
//!
//! JWT token management for user authentication.

mod jwt;

pub use jwt::{IssuedToken, JwtClaims, JwtConfig, JwtGenerator, JwtService};
