//! Customer account creation.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::db::{RepositoryError, UserRepository};
use crate::models::{UserData, UserSignup};

/// Errors from account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("password hashing failed")]
    PasswordHash,
}

/// Create a customer account.
///
/// The password is hashed with Argon2id before it reaches the database and
/// the account is flagged `is_customer`.
///
/// # Errors
///
/// Returns `AccountError::Validation` for invalid input and
/// `AccountError::Repository` with `Conflict` if the username or email is
/// taken.
pub async fn signup(pool: &PgPool, input: &UserSignup) -> Result<UserData, AccountError> {
    input.validate()?;
    let password_hash = hash_password(&input.password)?;
    let user = UserRepository::new(pool)
        .create_customer(input, &password_hash)
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "Customer signed up");
    Ok(user)
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AccountError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AccountError::PasswordHash)
}
