use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Purchase, Sweet};

/// Catalog details shown next to a purchase. The price is the current one,
/// the purchase keeps its own `total_price`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SweetSummary {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price: i64,
    pub image_url: Option<String>,
}

impl From<Sweet> for SweetSummary {
    fn from(sweet: Sweet) -> Self {
        Self {
            id: sweet.id,
            name: sweet.name,
            category: sweet.category,
            price: sweet.price,
            image_url: sweet.image_url,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PurchaseRecord {
    #[serde(flatten)]
    pub purchase: Purchase,
    /// `None` once the sweet has been removed from the catalog.
    pub sweet: Option<SweetSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderHistory {
    pub items: Vec<PurchaseRecord>,
    pub total_spent: i64,
}

impl OrderHistory {
    pub fn new(items: Vec<PurchaseRecord>) -> Self {
        let total_spent = items
            .iter()
            .map(|record| record.purchase.total_price)
            .fold(0_i64, i64::saturating_add);
        Self { items, total_spent }
    }
}
