use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::{Purchase, Sweet};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSweetRequest {
    #[validate(
        length(max = 100, message = "must be at most 100 characters"),
        custom(function = "not_blank")
    )]
    #[schema(example = "Chocolate Cake")]
    pub name: String,
    #[validate(
        length(max = 50, message = "must be at most 50 characters"),
        custom(function = "not_blank")
    )]
    #[schema(example = "Cake")]
    pub category: String,
    /// Unit price in minor units (cents).
    #[validate(range(min = 0, message = "must not be negative"))]
    #[schema(example = 2599)]
    pub price: i64,
    #[validate(range(min = 0, message = "must not be negative"))]
    #[schema(example = 10)]
    pub quantity: i32,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(url(message = "must be a valid URL"))]
    pub image_url: Option<String>,
}

/// Editable catalog fields. Stock is changed only through purchase and restock.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateSweetRequest {
    #[validate(
        length(max = 100, message = "must be at most 100 characters"),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,
    #[validate(
        length(max = 50, message = "must be at most 50 characters"),
        custom(function = "not_blank")
    )]
    pub category: Option<String>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub price: Option<i64>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(url(message = "must be a valid URL"))]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PurchaseRequest {
    #[serde(default = "default_purchase_quantity")]
    #[validate(range(min = 1, message = "must be at least 1"))]
    #[schema(example = 1)]
    pub quantity: i32,
}

impl Default for PurchaseRequest {
    fn default() -> Self {
        Self {
            quantity: default_purchase_quantity(),
        }
    }
}

fn default_purchase_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RestockRequest {
    #[validate(range(min = 1, message = "must be greater than 0"))]
    #[schema(example = 10)]
    pub amount: i32,
}

#[derive(Serialize, ToSchema)]
pub struct SweetList {
    pub items: Vec<Sweet>,
}

#[derive(Serialize, ToSchema)]
pub struct CategoryList {
    pub items: Vec<String>,
}

/// Result of a successful purchase: the ledger entry and the sweet after the decrement.
#[derive(Debug, Serialize, ToSchema)]
pub struct PurchaseReceipt {
    pub purchase: Purchase,
    pub sweet: Sweet,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}
