//! Fixed-choice fields stored as Postgres enum types.

use serde::{Deserialize, Serialize};

/// Physical condition of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "product_condition", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ProductCondition {
    #[default]
    New,
    Used,
    Refurbished,
}

/// Gender recorded on a user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "gender", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Lifecycle of an order, from checkout to hand-over.
///
/// Any state may move to any other; the API does not enforce an ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    PaymentInitiated,
    OrderPlaced,
    OrderProcessing,
    Packed,
    ReadyForDispatch,
    Shipped,
    Delivered,
    Cancelled,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_wire_names() {
        assert_eq!(
            serde_json::to_string(&ProductCondition::Refurbished).unwrap(),
            "\"refurbished\""
        );
        let parsed: ProductCondition = serde_json::from_str("\"used\"").unwrap();
        assert_eq!(parsed, ProductCondition::Used);
        assert_eq!(ProductCondition::default(), ProductCondition::New);
    }

    #[test]
    fn test_unknown_gender_rejected() {
        assert!(serde_json::from_str::<Gender>("\"unknown\"").is_err());
    }

    #[test]
    fn test_order_status_wire_names() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(
            serde_json::to_string(&OrderStatus::ReadyForDispatch).unwrap(),
            "\"ready_for_dispatch\""
        );
        let parsed: OrderStatus = serde_json::from_str("\"payment_initiated\"").unwrap();
        assert_eq!(parsed, OrderStatus::PaymentInitiated);
        assert!(serde_json::from_str::<OrderStatus>("\"Pending\"").is_err());
    }
}
