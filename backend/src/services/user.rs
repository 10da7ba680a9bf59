//! User service: the credential and token authority
//!
//! The sole gateway for turning an (email, secret) pair into a
//! verified identity and a signed token. Stateless; every operation is
//! a sequence of awaited store round trips with no shared mutable
//! state between calls.

use crate::auth::{PasswordService, TokenService, Verification};
use crate::error::ApiError;
use crate::repositories::{UpdateUserProfile, UserRecord, UserRepository};
use gravity_store_shared::types::{
    is_known_role, AuthResponse, RegisterRequest, UpdateProfileRequest, UserProfile, ROLE_CUSTOMER,
};
use gravity_store_shared::validation::validate_required;
use sqlx::PgPool;
use tracing::info;
use validator::ValidateEmail;

/// The one message for every login failure. A missing account and a
/// wrong secret must be indistinguishable to the caller.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Register a new user and issue a token for the new identity
    pub async fn register(
        pool: &PgPool,
        tokens: &TokenService,
        passwords: &PasswordService,
        req: RegisterRequest,
    ) -> Result<AuthResponse, ApiError> {
        validate_required("Name", &req.name).map_err(ApiError::Validation)?;
        validate_required("Password", &req.password).map_err(ApiError::Validation)?;
        if !req.email.validate_email() {
            return Err(ApiError::Validation("Invalid email format".to_string()));
        }

        let role = req.role.unwrap_or(ROLE_CUSTOMER);
        if !is_known_role(role) {
            return Err(ApiError::Validation(format!("Unknown role: {}", role)));
        }

        // Pre-check only; the UNIQUE constraint on email is what
        // actually prevents a duplicate insert under concurrency.
        if UserRepository::email_exists(pool, &req.email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let credential = passwords.digest(&req.password);
        let address = req.address.unwrap_or_default();

        let user = UserRepository::create(pool, &req.name, &address, &req.email, &credential, role)
            .await
            .map_err(ApiError::Internal)?;

        info!(user_id = user.id, "User registered");

        let token = tokens
            .issue(user.id, &user.email, user.role_id)
            .map_err(ApiError::Internal)?;

        Ok(AuthResponse {
            user: profile_from(user),
            token,
        })
    }

    /// Login with email and password
    ///
    /// A successful match against a legacy-format credential rewrites
    /// the stored value to the strong form before the token is issued.
    pub async fn login(
        pool: &PgPool,
        tokens: &TokenService,
        passwords: &PasswordService,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ApiError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let user = match UserRepository::find_by_email(pool, email)
            .await
            .map_err(ApiError::Internal)?
        {
            Some(user) => user,
            None => {
                // Burn the digest work a real verification would cost,
                // so a missing account is not observable by timing.
                let _ = passwords.digest(password);
                return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        match passwords.verify(password, &user.credential) {
            Verification::Rejected => {
                return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))
            }
            Verification::ValidNeedsUpgrade => {
                let upgraded = passwords.digest(password);
                UserRepository::update_credential(pool, user.id, &upgraded)
                    .await
                    .map_err(ApiError::Internal)?;
                info!(user_id = user.id, "Stored credential upgraded to strong format");
            }
            Verification::Valid => {}
        }

        let token = tokens
            .issue(user.id, &user.email, user.role_id)
            .map_err(ApiError::Internal)?;

        Ok(AuthResponse {
            user: profile_from(user),
            token,
        })
    }

    /// Fetch a user profile by id
    pub async fn get_by_id(pool: &PgPool, user_id: i64) -> Result<UserProfile, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(profile_from(user))
    }

    /// Apply a partial profile update
    ///
    /// Empty-string fields are dropped before the write; id and role are
    /// not mutable through this path at all.
    pub async fn update_profile(
        pool: &PgPool,
        user_id: i64,
        req: UpdateProfileRequest,
    ) -> Result<UserProfile, ApiError> {
        let updates = UpdateUserProfile {
            name: non_empty(req.name),
            address: non_empty(req.address),
            email: non_empty(req.email),
        };

        if let Some(ref email) = updates.email {
            if !email.validate_email() {
                return Err(ApiError::Validation("Invalid email format".to_string()));
            }
        }

        if updates.is_empty() {
            return Err(ApiError::BadRequest("No fields to update".to_string()));
        }

        let user = UserRepository::update_profile(pool, user_id, updates)
            .await
            .map_err(ApiError::Internal)?;

        Ok(profile_from(user))
    }
}

/// Drop fields that are absent or blank
fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

/// Convert a store row into its public view. The credential stays
/// behind in the dropped record.
fn profile_from(user: UserRecord) -> UserProfile {
    UserProfile {
        id: user.id,
        name: user.name,
        address: user.address,
        email: user.email,
        role: user.role_id,
    }
}
