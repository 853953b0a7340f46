//! Address register repository.

use sqlx::PgPool;

use catalog_core::AddressId;

use super::RepositoryError;
use crate::models::{Address, AddressPatch, AddressWrite};

/// Base query for address rows. `a` is the address, `u` its owner, embedded
/// as the same projection `UserRepository` returns.
pub const SELECT: &str = r#"
    SELECT a.id,
           json_build_object(
               'id', u.id,
               'username', u.username,
               'first_name', u.first_name,
               'last_name', u.last_name,
               'email', u.email,
               'mobile_number', u.mobile_number,
               'date_of_birth', u.date_of_birth,
               'gender', u.gender,
               'profile_picture', u.profile_picture,
               'is_customer', u.is_customer,
               'customer_id', u.customer_id,
               'is_suspended', u.is_suspended) AS "user",
           a.full_name, a.phone, a.line1, a.line2,
           a.city, a.state, a.postal_code, a.country, a.is_default,
           a.created_at, a.updated_at
    FROM address_register a
    JOIN users u ON u.id = a.user_id"#;

/// Repository for address database operations.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an address by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: AddressId) -> Result<Option<Address>, RepositoryError> {
        let sql = format!("{SELECT} WHERE a.id = $1");
        let address = sqlx::query_as::<_, Address>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(address)
    }

    /// Insert an address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference("user")` for an unknown user.
    pub async fn create(&self, input: &AddressWrite) -> Result<AddressId, RepositoryError> {
        let id = sqlx::query_scalar::<_, AddressId>(
            r"
            INSERT INTO address_register (user_id, full_name, phone, line1, line2, city,
                                          state, postal_code, country, is_default)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            ",
        )
        .bind(input.user)
        .bind(&input.full_name)
        .bind(&input.phone)
        .bind(&input.line1)
        .bind(&input.line2)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.postal_code)
        .bind(&input.country)
        .bind(input.is_default)
        .fetch_one(self.pool)
        .await?;
        Ok(id)
    }

    /// Replace every field of an address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address does not exist.
    pub async fn update(&self, id: AddressId, input: &AddressWrite) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE address_register
            SET user_id = $2, full_name = $3, phone = $4, line1 = $5, line2 = $6,
                city = $7, state = $8, postal_code = $9, country = $10,
                is_default = $11, updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(input.user)
        .bind(&input.full_name)
        .bind(&input.phone)
        .bind(&input.line1)
        .bind(&input.line2)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.postal_code)
        .bind(&input.country)
        .bind(input.is_default)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Update the fields present in `input`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address does not exist.
    pub async fn patch(&self, id: AddressId, input: &AddressPatch) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE address_register
            SET user_id = COALESCE($2, user_id),
                full_name = COALESCE($3, full_name),
                phone = COALESCE($4, phone),
                line1 = COALESCE($5, line1),
                line2 = COALESCE($6, line2),
                city = COALESCE($7, city),
                state = COALESCE($8, state),
                postal_code = COALESCE($9, postal_code),
                country = COALESCE($10, country),
                is_default = COALESCE($11, is_default),
                updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(input.user)
        .bind(&input.full_name)
        .bind(&input.phone)
        .bind(&input.line1)
        .bind(&input.line2)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.postal_code)
        .bind(&input.country)
        .bind(input.is_default)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete an address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address does not exist.
    pub async fn delete(&self, id: AddressId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM address_register WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
