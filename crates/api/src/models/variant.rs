//! Variant and variant attribute domain types.
//!
//! Attribute rows belong to exactly one variant. Writes never replace the set
//! wholesale: each entry either updates a row the variant already owns (by
//! id) or adds a new one, and rows not mentioned are left alone. The rules
//! live in [`plan_attribute_upsert`] so they can be checked without a
//! database.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::types::Json;
use thiserror::Error;
use validator::Validate;

use catalog_core::{AttributeId, ProductId, VariantAttributeId, VariantId};


/// One attribute value bound to a variant.
///
/// On the wire the attribute definition is sent as `attributes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantAttribute {
    pub id: VariantAttributeId,
    #[serde(rename = "attributes")]
    pub attribute: AttributeId,
    pub attribute_name: String,
    pub value: String,
}

/// A variant with its attribute rows.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Variant {
    pub id: VariantId,
    pub product: ProductId,
    pub sku: Option<String>,
    pub price: Option<Decimal>,
    pub stock: i32,
    pub attributes: Json<Vec<VariantAttribute>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Read-enriched variant: adds the owning product's name.
#[derive(Debug, Clone, Serialize)]
pub struct VariantDetail {
    #[serde(flatten)]
    pub variant: Variant,
    pub product_name: String,
}

/// A nested attribute entry in a variant write.
///
/// With `id`, overwrite that row (it must belong to the variant); without,
/// create a new row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct AttributeEntry {
    pub id: Option<VariantAttributeId>,
    #[serde(rename = "attributes")]
    pub attribute: AttributeId,
    #[validate(custom(function = "crate::validation::non_blank"), length(max = 255))]
    pub value: String,
}

/// Full variant payload for create.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VariantWrite {
    pub product: ProductId,
    #[validate(custom(function = "crate::validation::non_blank"), length(max = 64))]
    pub sku: Option<String>,
    #[validate(custom(function = "crate::validation::non_negative"))]
    pub price: Option<Decimal>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock: i32,
    #[validate(nested)]
    pub attributes: Option<Vec<AttributeEntry>>,
}

/// Partial variant payload; absent fields keep their stored value.
///
/// `sku` and `price` tell an explicit `null` (clear the value, `Some(None)`)
/// apart from an absent key (keep it, `None`).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct VariantPatch {
    pub product: Option<ProductId>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(custom(function = "crate::validation::non_blank"), length(max = 64))]
    pub sku: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(custom(function = "crate::validation::non_negative"))]
    pub price: Option<Option<Decimal>>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    #[validate(nested)]
    pub attributes: Option<Vec<AttributeEntry>>,
}

/// A present key always yields `Some`, even when its value is `null`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A single write against `variant_attributes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeOp {
    Update {
        id: VariantAttributeId,
        attribute: AttributeId,
        value: String,
    },
    Insert {
        attribute: AttributeId,
        value: String,
    },
}

/// An entry named an attribute row the variant does not own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Variant attribute {id} not found for variant {variant}")]
pub struct ForeignAttribute {
    pub variant: VariantId,
    pub id: VariantAttributeId,
}

/// Turn nested entries into row operations for `variant`.
///
/// `owned` is the set of attribute row ids currently bound to the variant.
///
/// # Errors
///
/// Returns `ForeignAttribute` for the first entry whose id is not in `owned`;
/// in that case nothing should be written.
pub fn plan_attribute_upsert(
    variant: VariantId,
    owned: &[VariantAttributeId],
    entries: &[AttributeEntry],
) -> Result<Vec<AttributeOp>, ForeignAttribute> {
    entries
        .iter()
        .map(|entry| match entry.id {
            Some(id) if owned.contains(&id) => Ok(AttributeOp::Update {
                id,
                attribute: entry.attribute,
                value: entry.value.clone(),
            }),
            Some(id) => Err(ForeignAttribute { variant, id }),
            None => Ok(AttributeOp::Insert {
                attribute: entry.attribute,
                value: entry.value.clone(),
            }),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn entries(json: serde_json::Value) -> Vec<AttributeEntry> {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_plan_updates_owned_and_inserts_new() {
        let input = entries(serde_json::json!([
            {"id": 3, "attributes": 9, "value": "XL"},
            {"attributes": 9, "value": "M"},
        ]));
        let ops = plan_attribute_upsert(
            VariantId::new(7),
            &[VariantAttributeId::new(3), VariantAttributeId::new(4)],
            &input,
        )
        .unwrap();

        assert_eq!(
            ops,
            vec![
                AttributeOp::Update {
                    id: VariantAttributeId::new(3),
                    attribute: AttributeId::new(9),
                    value: "XL".to_string(),
                },
                AttributeOp::Insert {
                    attribute: AttributeId::new(9),
                    value: "M".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_plan_rejects_foreign_ids() {
        let input = entries(serde_json::json!([
            {"attributes": 1, "value": "Red"},
            {"id": 99, "attributes": 1, "value": "Blue"},
        ]));
        let err =
            plan_attribute_upsert(VariantId::new(7), &[VariantAttributeId::new(3)], &input)
                .unwrap_err();

        assert_eq!(err.id, VariantAttributeId::new(99));
        assert_eq!(err.to_string(), "Variant attribute 99 not found for variant 7");
    }

    #[test]
    fn test_plan_empty_entries() {
        let ops = plan_attribute_upsert(VariantId::new(1), &[], &[]).unwrap();
        assert!(ops.is_empty());
    }

    #[test]
    fn test_patch_distinguishes_missing_attributes() {
        let patch: VariantPatch = serde_json::from_str(r#"{"stock": 4}"#).unwrap();
        assert!(patch.attributes.is_none());

        let patch: VariantPatch = serde_json::from_str(r#"{"attributes": []}"#).unwrap();
        assert_eq!(patch.attributes, Some(vec![]));
    }

    #[test]
    fn test_blank_attribute_value_rejected() {
        let patch: VariantPatch =
            serde_json::from_str(r#"{"attributes": [{"attributes": 2, "value": " "}]}"#).unwrap();
        let errors = crate::error::FieldErrors::from(patch.validate().unwrap_err());
        assert!(errors.field("attributes[0].value").is_some());
    }

    #[test]
    fn test_patch_distinguishes_null_from_missing() {
        let patch: VariantPatch = serde_json::from_str(r#"{"stock": 4}"#).unwrap();
        assert_eq!(patch.sku, None);
        assert_eq!(patch.price, None);

        let patch: VariantPatch =
            serde_json::from_str(r#"{"sku": null, "price": null}"#).unwrap();
        assert_eq!(patch.sku, Some(None));
        assert_eq!(patch.price, Some(None));
        assert!(patch.validate().is_ok());

        let patch: VariantPatch = serde_json::from_str(r#"{"sku": " ", "price": "-1"}"#).unwrap();
        let errors = patch.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("sku"));
        assert!(errors.field_errors().contains_key("price"));
    }

    #[test]
    fn test_attribute_serializes_with_wire_names() {
        let attr = VariantAttribute {
            id: VariantAttributeId::new(3),
            attribute: AttributeId::new(9),
            attribute_name: "Size".to_string(),
            value: "XL".to_string(),
        };
        let json = serde_json::to_value(&attr).unwrap();
        assert_eq!(json["attributes"], 9);
        assert_eq!(json["attribute_name"], "Size");
    }
}
