//! User repository for database operations
//!
//! The only writer and reader of the `users` relation. The UNIQUE
//! constraint on email in the migration is the real uniqueness
//! enforcement point; the pre-insert lookup in the service is an
//! optimization only.

use anyhow::Result;
use sqlx::PgPool;

/// User row from the database. Carries the stored credential; rows
/// must not leave the service layer without being converted to a
/// profile type.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub email: String,
    pub credential: String,
    pub role_id: i16,
}

/// Partial profile update. Only these fields are mutable through the
/// profile path; id and role have no representation here.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserProfile {
    pub name: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
}

impl UpdateUserProfile {
    /// True when no field remains to write
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.address.is_none() && self.email.is_none()
    }
}

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Insert a new user and return the stored row with its
    /// store-assigned id
    pub async fn create(
        pool: &PgPool,
        name: &str,
        address: &str,
        email: &str,
        credential: &str,
        role_id: i16,
    ) -> Result<UserRecord> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (name, address, email, credential, role_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, address, email, credential, role_id
            "#,
        )
        .bind(name)
        .bind(address)
        .bind(email)
        .bind(credential)
        .bind(role_id)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, address, email, credential, role_id
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, address, email, credential, role_id
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Check if email exists
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)
            "#,
        )
        .bind(email)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }

    /// Overwrite the stored credential (login-time hash upgrade)
    pub async fn update_credential(pool: &PgPool, id: i64, credential: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users SET credential = $2 WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(credential)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Apply a partial profile update and return the fresh row
    pub async fn update_profile(
        pool: &PgPool,
        id: i64,
        updates: UpdateUserProfile,
    ) -> Result<UserRecord> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                address = COALESCE($3, address),
                email = COALESCE($4, email)
            WHERE id = $1
            RETURNING id, name, address, email, credential, role_id
            "#,
        )
        .bind(id)
        .bind(updates.name)
        .bind(updates.address)
        .bind(updates.email)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }
}
