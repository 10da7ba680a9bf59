//! Authentication middleware
//!
//! Provides the Axum extractor that turns a Bearer token into a
//! verified identity. This is the only path by which handlers learn
//! who a request belongs to.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts},
};
use gravity_store_shared::types::TokenSubject;

/// Authenticated subject extracted from a verified token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
    pub role: i16,
}

impl From<AuthUser> for TokenSubject {
    fn from(user: AuthUser) -> Self {
        TokenSubject {
            user_id: user.user_id,
            email: user.email,
            role: user.role,
        }
    }
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        // Extract Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

        // Check Bearer prefix
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("Invalid authorization format".to_string()))?;

        // One rejection message for every token failure mode
        let claims = app_state
            .tokens()
            .verify(token)
            .ok_or_else(|| ApiError::Unauthorized("Invalid token".to_string()))?;

        Ok(AuthUser {
            user_id: claims.user_id,
            email: claims.email,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_user_to_token_subject() {
        let user = AuthUser {
            user_id: 7,
            email: "ana@x.com".to_string(),
            role: 2,
        };
        let subject: TokenSubject = user.into();
        assert_eq!(subject.user_id, 7);
        assert_eq!(subject.role, 2);
    }
}
