//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use catalog_core::{BrandId, CategoryId, CollectionId, ProductCondition, ProductId};

use super::product_image::ProductImage;
use super::variant::Variant;

/// A product as stored.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub sku: String,
    pub price: Decimal,
    pub selling_price: Option<Decimal>,
    pub condition: ProductCondition,
    pub category: Option<CategoryId>,
    pub brand: Option<BrandId>,
    pub is_disabled: bool,
    pub hsn_code: Option<String>,
    /// Review aggregate, maintained outside this service.
    pub rating: Decimal,
    pub no_of_reviews: i32,
    pub tags: Vec<String>,
    pub dimension: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Read-enriched product: the row plus its variants and images.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub variants: Vec<Variant>,
    pub images: Vec<ProductImage>,
}

/// Full product payload for create and replace.
///
/// `rating` and `no_of_reviews` are read-only.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductWrite {
    #[validate(custom(function = "crate::validation::non_blank"), length(max = 255))]
    pub name: String,
    #[validate(length(max = 500))]
    pub short_description: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "crate::validation::non_blank"), length(max = 64))]
    pub sku: String,
    #[validate(custom(function = "crate::validation::non_negative"))]
    pub price: Decimal,
    #[validate(custom(function = "crate::validation::non_negative"))]
    pub selling_price: Option<Decimal>,
    #[serde(default)]
    pub condition: ProductCondition,
    pub category: Option<CategoryId>,
    pub brand: Option<BrandId>,
    #[serde(default)]
    pub is_disabled: bool,
    pub hsn_code: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "crate::validation::non_blank_tags"))]
    pub tags: Vec<String>,
    pub dimension: Option<String>,
}

/// Partial product payload; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProductPatch {
    #[validate(custom(function = "crate::validation::non_blank"), length(max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub short_description: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "crate::validation::non_blank"), length(max = 64))]
    pub sku: Option<String>,
    #[validate(custom(function = "crate::validation::non_negative"))]
    pub price: Option<Decimal>,
    #[validate(custom(function = "crate::validation::non_negative"))]
    pub selling_price: Option<Decimal>,
    pub condition: Option<ProductCondition>,
    pub category: Option<CategoryId>,
    pub brand: Option<BrandId>,
    pub is_disabled: Option<bool>,
    pub hsn_code: Option<String>,
    #[validate(custom(function = "crate::validation::non_blank_tags"))]
    pub tags: Option<Vec<String>>,
    pub dimension: Option<String>,
}

/// Body of `POST /products/{id}/add-to-collection`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddToCollection {
    pub collection: CollectionId,
}

/// Message returned by the enable/disable actions.
#[must_use]
pub fn availability_message(name: &str, disabled: bool) -> String {
    let verb = if disabled { "disabled" } else { "enabled" };
    format!("{name} successfully {verb}.!")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn write() -> ProductWrite {
        serde_json::from_value(serde_json::json!({
            "name": "Red Shirt",
            "sku": "RS-001",
            "price": "19.99",
        }))
        .unwrap()
    }

    #[test]
    fn test_write_defaults() {
        let input = write();
        assert_eq!(input.condition, ProductCondition::New);
        assert!(!input.is_disabled);
        assert!(input.tags.is_empty());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_write_validation() {
        let mut input = write();
        input.name = " ".to_string();
        input.price = Decimal::new(-1, 0);
        input.tags = vec!["summer".to_string(), String::new()];

        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("tags"));
        assert!(!fields.contains_key("sku"));
    }

    #[test]
    fn test_empty_patch_is_valid() {
        assert!(ProductPatch::default().validate().is_ok());
        let patch = ProductPatch {
            sku: Some(String::new()),
            ..ProductPatch::default()
        };
        assert!(patch.validate().is_err());
        let patch = ProductPatch {
            name: Some("x".repeat(256)),
            ..ProductPatch::default()
        };
        assert!(patch.validate().unwrap_err().field_errors().contains_key("name"));
    }

    #[test]
    fn test_availability_message() {
        assert_eq!(
            availability_message("Red Shirt", true),
            "Red Shirt successfully disabled.!"
        );
        assert_eq!(
            availability_message("Red Shirt", false),
            "Red Shirt successfully enabled.!"
        );
    }
}
