//! Admin authentication for the shelter backend.
//!
//! Credentials are checked with constant-time comparison to mitigate timing attacks. A successful
//! login issues an opaque bearer token that the moderation routes require.

use std::sync::Arc;

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::db::Repository;
use crate::errors::AppError;

/// Prefix of the `Authorization` header value carrying the admin token.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Bearer authentication layer for moderation routes.
pub async fn bearer_auth_layer(repo: Arc<Repository>, request: Request, next: Next) -> Response {
    let Some(token) = bearer_token(&request) else {
        return AppError::Unauthorized("Missing bearer token".to_string()).into_response();
    };

    match repo.session_exists(&token).await {
        Ok(true) => next.run(request).await,
        Ok(false) => {
            tracing::debug!("Rejected unknown bearer token");
            AppError::Unauthorized("Invalid or expired token".to_string()).into_response()
        }
        Err(e) => e.into_response(),
    }
}

fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Check submitted credentials against the configured admin account.
pub fn verify_credentials(
    expected: Option<(&str, &str)>,
    username: &str,
    password: &str,
) -> bool {
    let Some((expected_user, expected_pass)) = expected else {
        return false;
    };

    // Evaluate both halves so a wrong username costs the same as a wrong password
    let user_ok = constant_time_compare(username, expected_user);
    let pass_ok = constant_time_compare(password, expected_pass);
    user_ok & pass_ok
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
