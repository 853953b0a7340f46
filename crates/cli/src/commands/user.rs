//! Account management commands.

use catalog_api::models::UserSignup;
use catalog_api::services::accounts;
use catalog_core::Email;

use super::{CommandError, connect};

/// Arguments of `user create-customer`.
pub struct NewCustomer {
    pub username: String,
    pub email: Email,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Create a customer through the same path as `POST /users/signup`.
pub async fn create_customer(input: NewCustomer) -> Result<(), CommandError> {
    let pool = connect().await?;

    let signup = UserSignup {
        username: input.username,
        password: input.password,
        first_name: input.first_name,
        last_name: input.last_name,
        email: input.email,
        mobile_number: None,
        date_of_birth: None,
        gender: None,
        profile_picture: None,
    };
    let user = accounts::signup(&pool, &signup).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "Customer created");
    Ok(())
}
