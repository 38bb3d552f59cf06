//! # User Repository
//!
//! Account storage and credential checks.
//!
//! Plaintext passwords only pass through [`UserRepository::insert`] and
//! [`UserRepository::verify_credentials`]; everything stored is an argon2
//! PHC string.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::password::{hash_password, verify_password};
use sweetshop_core::{NewUser, Role, User};

const USER_COLUMNS: &str = "id, email, password_hash, name, role, created_at, updated_at";

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Creates an account, hashing the password.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Email already registered
    pub async fn insert(&self, new: &NewUser) -> DbResult<User> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: new.email.clone(),
            password_hash: hash_password(&new.password)?,
            name: new.name.clone(),
            role: new.role,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %user.id, email = %user.email, role = %user.role, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, name, role, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.role)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &user.email),
            other => other,
        })?;

        Ok(user)
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Gets a user by exact email.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1");

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Returns the user if `password` matches, `None` otherwise.
    ///
    /// Unknown email and wrong password both give `None`; callers cannot
    /// tell them apart.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> DbResult<Option<User>> {
        let Some(user) = self.get_by_email(email).await? else {
            debug!("Login for unknown email");
            return Ok(None);
        };

        if verify_password(password, &user.password_hash) {
            Ok(Some(user))
        } else {
            debug!(id = %user.id, "Login with wrong password");
            Ok(None)
        }
    }

    /// Changes a user's role and returns the updated record.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No such user
    pub async fn set_role(&self, id: &str, role: Role) -> DbResult<User> {
        let sql = format!(
            "UPDATE users SET role = ?2, updated_at = ?3 WHERE id = ?1 RETURNING {USER_COLUMNS}"
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(role)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))?;

        info!(id = %user.id, role = %user.role, "User role changed");
        Ok(user)
    }

    /// Counts all users.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Deletes every user. Used by the seed tool.
    pub async fn delete_all(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM users")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
