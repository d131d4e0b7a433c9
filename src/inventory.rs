//! Stock arithmetic for the purchase and restock paths.
//!
//! These functions never touch the database. The services load the sweet row
//! under a lock, ask for a plan here, and persist the plan in the same
//! transaction, so a rejected plan leaves the store untouched.

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Sweets with fewer units than this count as low stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    #[error("Not enough stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i32, available: i32 },

    #[error("Restock amount must be greater than 0")]
    InvalidRestock,

    #[error("Stock level out of range")]
    StockOverflow,

    #[error("Total price out of range")]
    PriceOverflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchasePlan {
    /// Units left on the shelf once the purchase is written.
    pub remaining: i32,
    /// Unit price times requested quantity, in minor units.
    pub total_price: i64,
}

pub fn plan_purchase(
    available: i32,
    unit_price: i64,
    requested: i32,
) -> Result<PurchasePlan, InventoryError> {
    if requested < 1 {
        return Err(InventoryError::InvalidQuantity);
    }
    if requested > available {
        return Err(InventoryError::InsufficientStock {
            requested,
            available,
        });
    }
    let total_price = unit_price
        .checked_mul(i64::from(requested))
        .ok_or(InventoryError::PriceOverflow)?;

    Ok(PurchasePlan {
        remaining: available - requested,
        total_price,
    })
}

pub fn plan_restock(available: i32, amount: i32) -> Result<i32, InventoryError> {
    if amount <= 0 {
        return Err(InventoryError::InvalidRestock);
    }
    available
        .checked_add(amount)
        .ok_or(InventoryError::StockOverflow)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct InventoryStats {
    pub total_sweets: i64,
    /// Sum of price times quantity over the catalog, in minor units.
    pub total_value: i64,
    pub low_stock: i64,
    pub out_of_stock: i64,
    pub low_stock_threshold: i32,
}

/// Summarise `(price, quantity)` pairs into dashboard counters.
pub fn summarize<I>(items: I, low_stock_threshold: i32) -> InventoryStats
where
    I: IntoIterator<Item = (i64, i32)>,
{
    items.into_iter().fold(
        InventoryStats {
            low_stock_threshold,
            ..InventoryStats::default()
        },
        |mut stats, (price, quantity)| {
            stats.total_sweets += 1;
            stats.total_value = stats
                .total_value
                .saturating_add(price.saturating_mul(i64::from(quantity)));
            if quantity == 0 {
                stats.out_of_stock += 1;
            } else if quantity < low_stock_threshold {
                stats.low_stock += 1;
            }
            stats
        },
    )
}
