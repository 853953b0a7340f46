//! Address register entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use validator::Validate;

use catalog_core::{AddressId, UserId};

use super::user::UserData;

/// An address with its owner's public projection embedded as `user`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Address {
    pub id: AddressId,
    pub user: Json<UserData>,
    pub full_name: String,
    pub phone: Option<String>,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddressWrite {
    pub user: UserId,
    #[validate(custom(function = "crate::validation::non_blank"), length(max = 255))]
    pub full_name: String,
    pub phone: Option<String>,
    #[validate(custom(function = "crate::validation::non_blank"), length(max = 255))]
    pub line1: String,
    pub line2: Option<String>,
    #[validate(custom(function = "crate::validation::non_blank"), length(max = 255))]
    pub city: String,
    pub state: Option<String>,
    #[validate(custom(function = "crate::validation::non_blank"), length(max = 255))]
    pub postal_code: String,
    #[validate(custom(function = "crate::validation::non_blank"), length(max = 255))]
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AddressPatch {
    pub user: Option<UserId>,
    #[validate(custom(function = "crate::validation::non_blank"), length(max = 255))]
    pub full_name: Option<String>,
    pub phone: Option<String>,
    #[validate(custom(function = "crate::validation::non_blank"), length(max = 255))]
    pub line1: Option<String>,
    pub line2: Option<String>,
    #[validate(custom(function = "crate::validation::non_blank"), length(max = 255))]
    pub city: Option<String>,
    pub state: Option<String>,
    #[validate(custom(function = "crate::validation::non_blank"), length(max = 255))]
    pub postal_code: Option<String>,
    #[validate(custom(function = "crate::validation::non_blank"), length(max = 255))]
    pub country: Option<String>,
    pub is_default: Option<bool>,
}
