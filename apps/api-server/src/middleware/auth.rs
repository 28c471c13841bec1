//! Authentication - request-scoped identity extracted from bearer tokens.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header};
use std::future::{Ready, ready};
use std::sync::Arc;

use quill_core::ports::{AuthError, TokenClaims, TokenService};
use quill_shared::ErrorResponse;

use crate::config::is_production;

/// Verified caller identity, attached per request.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.subject)
/// }
/// ```
/// Extraction fails with 401 before handler logic runs.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Subject identifier assigned by the identity provider.
    pub subject: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            subject: claims.subject,
        }
    }
}

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Build the 401 body. Validation internals ride along as `detail` only
/// outside production.
fn auth_error_body(err: &AuthError, production: bool) -> ErrorResponse {
    match err {
        AuthError::TokenExpired => {
            ErrorResponse::new("Your authentication token has expired. Please login again.")
        }
        AuthError::InvalidToken(msg) => {
            let error = ErrorResponse::new("Invalid token");
            if production {
                error
            } else {
                error.with_detail(msg.clone())
            }
        }
        AuthError::MissingAuth => ErrorResponse::new(
            "Please provide a valid Bearer token in the Authorization header.",
        ),
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        let error = auth_error_body(&self.0, is_production());
        actix_web::HttpResponse::build(self.status_code()).json(error)
    }
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // Get token service from app data
        let token_service = match req.app_data::<actix_web::web::Data<Arc<dyn TokenService>>>() {
            Some(service) => service,
            None => {
                tracing::error!("TokenService not found in app data");
                return ready(Err(AuthenticationError(AuthError::InvalidToken(
                    "Server configuration error".to_string(),
                ))));
            }
        };

        // Extract Bearer token from Authorization header
        let auth_header = match req.headers().get(header::AUTHORIZATION) {
            Some(value) => value,
            None => return ready(Err(AuthenticationError(AuthError::MissingAuth))),
        };

        let auth_str = match auth_header.to_str() {
            Ok(s) => s,
            Err(_) => {
                return ready(Err(AuthenticationError(AuthError::InvalidToken(
                    "Invalid authorization header".to_string(),
                ))));
            }
        };

        // Parse "Bearer <token>"
        let token = match auth_str.strip_prefix("Bearer ") {
            Some(t) => t,
            None => {
                return ready(Err(AuthenticationError(AuthError::InvalidToken(
                    "Expected Bearer token".to_string(),
                ))));
            }
        };

        // Validate token
        match token_service.validate_token(token) {
            Ok(claims) => ready(Ok(Identity::from(claims))),
            Err(e) => ready(Err(AuthenticationError(e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_token_detail_is_hidden_in_production() {
        let err = AuthError::InvalidToken("signature mismatch".to_string());

        let body = auth_error_body(&err, true);
        assert_eq!(body.message, "Invalid token");
        assert!(body.detail.is_none());

        let body = auth_error_body(&err, false);
        assert_eq!(body.detail.as_deref(), Some("signature mismatch"));
    }

    #[test]
    fn expired_and_missing_tokens_never_carry_detail() {
        for err in [AuthError::TokenExpired, AuthError::MissingAuth] {
            assert!(auth_error_body(&err, false).detail.is_none());
        }
    }
}
