//! Lookbooks: named groupings of variants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use catalog_core::{LookBookId, ProductId, VariantId};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LookBook {
    pub id: LookBookId,
    pub name: String,
    pub description: Option<String>,
    pub variants: Vec<VariantId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Read-enriched lookbook: each variant with its product.
#[derive(Debug, Clone, Serialize)]
pub struct LookBookDetail {
    pub id: LookBookId,
    pub name: String,
    pub description: Option<String>,
    pub variants: Vec<LookBookVariant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LookBookDetail {
    #[must_use]
    pub fn new(lookbook: LookBook, variants: Vec<LookBookVariant>) -> Self {
        Self {
            id: lookbook.id,
            name: lookbook.name,
            description: lookbook.description,
            variants,
            created_at: lookbook.created_at,
            updated_at: lookbook.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LookBookVariant {
    pub id: VariantId,
    pub sku: Option<String>,
    pub product: ProductId,
    pub product_name: String,
}

/// Full lookbook payload. `variants` replaces the whole set.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LookBookWrite {
    #[validate(custom(function = "crate::validation::non_blank"), length(max = 255))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub variants: Vec<VariantId>,
}

/// Partial lookbook payload. When `variants` is present it replaces the set.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LookBookPatch {
    #[validate(custom(function = "crate::validation::non_blank"), length(max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub variants: Option<Vec<VariantId>>,
}
