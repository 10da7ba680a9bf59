//! Authentication routes
//!
//! Registration, login, token verification, and the authenticated
//! profile endpoints.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use gravity_store_shared::types::{
    AuthResponse, LoginRequest, RegisterRequest, TokenSubject, UpdateProfileRequest, UserProfile,
};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/verify", get(verify))
        .route("/me", get(get_profile).put(update_profile))
}

/// Register a new user
///
/// POST /api/v1/auth/register
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let response =
        UserService::register(&state.db, state.tokens(), state.passwords(), req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with email and password
///
/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let response = UserService::login(
        &state.db,
        state.tokens(),
        state.passwords(),
        &req.email,
        &req.password,
    )
    .await?;
    Ok(Json(response))
}

/// Verify a Bearer token and echo its subject
///
/// GET /api/v1/auth/verify
///
/// Answers straight from the token with no store round trip.
async fn verify(auth_user: AuthUser) -> ApiResult<Json<TokenSubject>> {
    Ok(Json(auth_user.into()))
}

/// Get current user profile (requires authentication)
///
/// GET /api/v1/auth/me
///
/// Reloads the profile from the store so the caller sees current data,
/// not the snapshot frozen into the token.
async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<Json<UserProfile>> {
    let profile = UserService::get_by_id(&state.db, auth_user.user_id).await?;
    Ok(Json(profile))
}

/// Update current user profile (requires authentication)
///
/// PUT /api/v1/auth/me
async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserProfile>> {
    let profile = UserService::update_profile(&state.db, auth_user.user_id, req).await?;
    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    // Route tests live in auth_tests.rs and tests/auth_integration_test.rs
}
