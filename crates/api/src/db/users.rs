//! User repository.
//!
//! Reads only ever return [`UserData`]; the password hash is write-only from
//! this module's point of view.

use sqlx::PgPool;

use catalog_core::UserId;

use super::RepositoryError;
use crate::models::{UserData, UserSignup};

const USER_DATA_COLUMNS: &str = r"
    id, username, first_name, last_name, email, mobile_number, date_of_birth,
    gender, profile_picture, is_customer, customer_id, is_suspended";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user's public projection by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: UserId) -> Result<Option<UserData>, RepositoryError> {
        let sql = format!("SELECT {USER_DATA_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, UserData>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(user)
    }

    /// Insert a customer account with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict("username" | "email")` if either is
    /// taken.
    pub async fn create_customer(
        &self,
        input: &UserSignup,
        password_hash: &str,
    ) -> Result<UserData, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO users (username, password_hash, first_name, last_name, email,
                               mobile_number, date_of_birth, gender, profile_picture,
                               is_customer)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, TRUE)
            RETURNING {USER_DATA_COLUMNS}
            "
        );
        let user = sqlx::query_as::<_, UserData>(&sql)
            .bind(&input.username)
            .bind(password_hash)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.mobile_number)
            .bind(input.date_of_birth)
            .bind(input.gender)
            .bind(&input.profile_picture)
            .fetch_one(self.pool)
            .await?;
        Ok(user)
    }
}
