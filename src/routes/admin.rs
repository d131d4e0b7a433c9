use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::{purchases::OrderHistory, sweets::SweetList},
    error::AppResult,
    inventory::InventoryStats,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::{AdminPurchaseQuery, StockQuery},
    services::{admin_service, purchase_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/purchases", get(list_all_purchases))
        .route("/inventory/stats", get(inventory_stats))
        .route("/inventory/low-stock", get(list_low_stock))
}

#[utoipa::path(
    get,
    path = "/api/admin/purchases",
    params(AdminPurchaseQuery),
    responses(
        (status = 200, description = "Purchase ledger (admin only)", body = ApiResponse<OrderHistory>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_purchases(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AdminPurchaseQuery>,
) -> AppResult<Json<ApiResponse<OrderHistory>>> {
    let resp = purchase_service::list_all_purchases(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/inventory/stats",
    params(StockQuery),
    responses(
        (status = 200, description = "Inventory counters", body = ApiResponse<InventoryStats>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn inventory_stats(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<StockQuery>,
) -> AppResult<Json<ApiResponse<InventoryStats>>> {
    let resp = admin_service::inventory_stats(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/inventory/low-stock",
    params(StockQuery),
    responses(
        (status = 200, description = "Sweets below the stock threshold", body = ApiResponse<SweetList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_low_stock(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<StockQuery>,
) -> AppResult<Json<ApiResponse<SweetList>>> {
    let resp = admin_service::list_low_stock(&state, &user, query).await?;
    Ok(Json(resp))
}
