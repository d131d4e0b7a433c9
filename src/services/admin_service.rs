use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::{
    dto::sweets::SweetList,
    entity::sweets::{Column as SweetCol, Entity as Sweets},
    error::AppResult,
    inventory::{DEFAULT_LOW_STOCK_THRESHOLD, InventoryStats, summarize},
    middleware::auth::{AuthUser, ensure_admin},
    models::Sweet,
    response::{ApiResponse, Meta},
    routes::params::StockQuery,
    state::AppState,
};

fn threshold(query: &StockQuery) -> i32 {
    query.threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD).max(1)
}

pub async fn inventory_stats(
    state: &AppState,
    user: &AuthUser,
    query: StockQuery,
) -> AppResult<ApiResponse<InventoryStats>> {
    ensure_admin(user)?;
    let rows: Vec<(i64, i32)> = Sweets::find()
        .select_only()
        .column(SweetCol::Price)
        .column(SweetCol::Quantity)
        .into_tuple::<(i64, i32)>()
        .all(&state.orm)
        .await?;

    let stats = summarize(rows, threshold(&query));
    Ok(ApiResponse::success("Inventory stats", stats, Some(Meta::empty())))
}

pub async fn list_low_stock(
    state: &AppState,
    user: &AuthUser,
    query: StockQuery,
) -> AppResult<ApiResponse<SweetList>> {
    ensure_admin(user)?;
    let items: Vec<Sweet> = Sweets::find()
        .filter(SweetCol::Quantity.lt(threshold(&query)))
        .order_by_asc(SweetCol::Quantity)
        .order_by_asc(SweetCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Sweet::from)
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Low stock", SweetList { items }, Some(meta)))
}
