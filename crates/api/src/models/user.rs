//! Customer account types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use catalog_core::{Email, Gender, UserId};

/// The public, non-sensitive view of a user.
///
/// Never carries the password hash; this is what addresses embed.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserData {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub mobile_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub profile_picture: Option<String>,
    pub is_customer: bool,
    pub customer_id: Option<String>,
    pub is_suspended: bool,
}

/// Body of `POST /users/signup`.
#[derive(Clone, Deserialize, Validate)]
pub struct UserSignup {
    #[validate(custom(function = "crate::validation::username"), length(max = 150))]
    pub username: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
    pub email: Email,
    #[validate(custom(function = "crate::validation::non_blank"))]
    pub mobile_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub profile_picture: Option<String>,
}

impl std::fmt::Debug for UserSignup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserSignup")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}
