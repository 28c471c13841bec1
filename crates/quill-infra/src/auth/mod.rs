//! Token verification for identity-provider issued bearer tokens.

mod jwt;

pub use jwt::{JwtConfig, JwtTokenService};
