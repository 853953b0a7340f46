//! Collections and the collection/product association.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use validator::Validate;

use catalog_core::{CollectionId, CollectionItemId, ProductId};

/// A collection with a summary of its items.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    pub description: Option<String>,
    pub items: Json<Vec<CollectionEntry>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One item as embedded in its collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub id: CollectionItemId,
    pub product: ProductId,
    pub product_name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CollectionWrite {
    #[validate(custom(function = "crate::validation::non_blank"), length(max = 255))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CollectionPatch {
    #[validate(custom(function = "crate::validation::non_blank"), length(max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A `collection_items` row with the names of both ends.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CollectionItem {
    pub id: CollectionItemId,
    pub collection: CollectionId,
    pub collection_name: String,
    pub product: ProductId,
    pub product_name: String,
    pub created_at: DateTime<Utc>,
}

/// The association to insert. Both add-to-collection entry points build this
/// same value, as does a plain `POST /collection-items`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Validate)]
pub struct NewCollectionItem {
    pub collection: CollectionId,
    pub product: ProductId,
}

impl NewCollectionItem {
    /// Association requested from the product side.
    #[must_use]
    pub const fn from_product(product: ProductId, input: &super::product::AddToCollection) -> Self {
        Self {
            collection: input.collection,
            product,
        }
    }

    /// Association requested from the collection side.
    #[must_use]
    pub const fn from_collection(collection: CollectionId, input: &AddProduct) -> Self {
        Self {
            collection,
            product: input.product,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Validate)]
pub struct CollectionItemPatch {
    pub collection: Option<CollectionId>,
    pub product: Option<ProductId>,
}

/// Body of `POST /collections/{id}/add-product`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddProduct {
    pub product: ProductId,
}

/// Message returned by both add-to-collection actions.
#[must_use]
pub fn added_message(name: &str) -> String {
    format!("{name} successfully added to the collection.!")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::product::AddToCollection;
    use super::*;

    #[test]
    fn test_both_sides_build_same_association() {
        let from_product = NewCollectionItem::from_product(
            ProductId::new(42),
            &AddToCollection {
                collection: CollectionId::new(5),
            },
        );
        let from_collection = NewCollectionItem::from_collection(
            CollectionId::new(5),
            &AddProduct {
                product: ProductId::new(42),
            },
        );
        assert_eq!(from_product, from_collection);
    }

    #[test]
    fn test_counterpart_is_required() {
        assert!(serde_json::from_str::<AddProduct>("{}").is_err());
        assert!(serde_json::from_str::<AddToCollection>(r#"{"collection": "x"}"#).is_err());
    }

    #[test]
    fn test_added_message() {
        assert_eq!(
            added_message("Summer Sale"),
            "Summer Sale successfully added to the collection.!"
        );
    }

    #[test]
    fn test_collection_name_required() {
        let write: CollectionWrite = serde_json::from_str(r#"{"name": ""}"#).unwrap();
        let errors = write.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }
}
