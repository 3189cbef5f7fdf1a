//! Request extractors.
//!
//! - `Payload<T>`: a JSON body whose rejections render as `ApiError`
//! - `Params<T>`: query-string parameters, rejected the same way
//! - `Identity`: the user behind the request's API token

use crate::error::{ApiError, INVALID_TOKEN, NOT_AUTHENTICATED};
use crate::state::AppState;
use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use filters::filters::OwnedBy;
use filters::FilterPipeline;
use store::UserId;
use tracing::debug;

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Payload<T>(pub T);

/// Query-string parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Params<T>(pub T);

/// The authenticated caller.
///
/// Read from an `Authorization: Token <key>` header (`Bearer` is accepted
/// too). Extraction fails with `401` when the header is missing or the
/// token matches no user.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: UserId,
    pub username: String,
}

impl Identity {
    /// Filters restricting order queries to this caller's orders
    pub fn order_scope(&self) -> FilterPipeline {
        FilterPipeline::new().add_filter(OwnedBy::new(self.user_id))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(ApiError::Unauthenticated(NOT_AUTHENTICATED))?;

        let token = header
            .to_str()
            .ok()
            .and_then(token_from_header)
            .ok_or(ApiError::Unauthenticated(INVALID_TOKEN))?;

        let user = state
            .db
            .find_user_by_token(token)
            .await?
            .ok_or(ApiError::Unauthenticated(INVALID_TOKEN))?;

        debug!("Authenticated user {} ({})", user.id, user.username);
        Ok(Identity {
            user_id: user.id,
            username: user.username,
        })
    }
}

/// The key of a `Token <key>` or `Bearer <key>` header value
fn token_from_header(value: &str) -> Option<&str> {
    let (scheme, key) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("token") && !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let key = key.trim();
    if key.is_empty() || key.contains(' ') {
        return None;
    }
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_header() {
        assert_eq!(token_from_header("Token abc123"), Some("abc123"));
        assert_eq!(token_from_header("Bearer abc123"), Some("abc123"));
        assert_eq!(token_from_header("token  abc123 "), Some("abc123"));
    }

    #[test]
    fn test_token_from_header_rejects_malformed() {
        assert_eq!(token_from_header("abc123"), None);
        assert_eq!(token_from_header("Basic dXNlcjpwYXNz"), None);
        assert_eq!(token_from_header("Token "), None);
        assert_eq!(token_from_header("Token a b"), None);
    }
}
