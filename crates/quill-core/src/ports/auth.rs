//! Authentication port - verification of identity-provider bearer tokens.

/// Claims extracted from a verified bearer token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    /// Subject identifier assigned by the identity provider.
    pub subject: String,
    pub exp: i64,
}

/// Token verification service.
///
/// The identity provider issues tokens; the backend only verifies them
/// locally against the shared signing configuration.
pub trait TokenService: Send + Sync {
    /// Validate and decode a bearer token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Mint a token for the given subject. Used by local tooling and tests;
    /// production tokens come from the identity provider.
    fn issue_token(&self, subject: &str) -> Result<String, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,
}
