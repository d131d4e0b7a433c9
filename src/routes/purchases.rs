use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::purchases::OrderHistory,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::PurchaseQuery,
    services::purchase_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_purchases))
}

#[utoipa::path(
    get,
    path = "/api/purchases",
    params(PurchaseQuery),
    responses(
        (status = 200, description = "Order history of the current user", body = ApiResponse<OrderHistory>),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = [])),
    tag = "Purchases"
)]
pub async fn list_purchases(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<PurchaseQuery>,
) -> AppResult<Json<ApiResponse<OrderHistory>>> {
    let resp = purchase_service::list_my_purchases(&state, &user, query).await?;
    Ok(Json(resp))
}
