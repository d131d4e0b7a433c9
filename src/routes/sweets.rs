use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::sweets::{
        CategoryList, CreateSweetRequest, PurchaseReceipt, PurchaseRequest, RestockRequest,
        SweetList, UpdateSweetRequest,
    },
    error::AppResult,
    middleware::{auth::AuthUser, validate::ValidatedJson},
    models::Sweet,
    response::ApiResponse,
    routes::params::SweetQuery,
    services::{purchase_service, sweet_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sweets).post(create_sweet))
        .route("/categories", get(list_categories))
        .route(
            "/{id}",
            get(get_sweet).put(update_sweet).delete(delete_sweet),
        )
        .route("/{id}/purchase", post(purchase_sweet))
        .route("/{id}/restock", post(restock_sweet))
}

#[utoipa::path(
    get,
    path = "/api/sweets",
    params(SweetQuery),
    responses(
        (status = 200, description = "List sweets", body = ApiResponse<SweetList>)
    ),
    tag = "Sweets"
)]
pub async fn list_sweets(
    State(state): State<AppState>,
    Query(query): Query<SweetQuery>,
) -> AppResult<Json<ApiResponse<SweetList>>> {
    let resp = sweet_service::list_sweets(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/sweets/categories",
    responses(
        (status = 200, description = "Distinct categories, sorted", body = ApiResponse<CategoryList>)
    ),
    tag = "Sweets"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let resp = sweet_service::list_categories(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/sweets/{id}",
    params(
        ("id" = Uuid, Path, description = "Sweet ID")
    ),
    responses(
        (status = 200, description = "Get sweet", body = ApiResponse<Sweet>),
        (status = 404, description = "Sweet not found"),
    ),
    tag = "Sweets"
)]
pub async fn get_sweet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Sweet>>> {
    let resp = sweet_service::get_sweet(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/sweets",
    request_body = CreateSweetRequest,
    responses(
        (status = 201, description = "Create sweet", body = ApiResponse<Sweet>),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sweets"
)]
pub async fn create_sweet(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateSweetRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Sweet>>)> {
    let resp = sweet_service::create_sweet(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/sweets/{id}",
    params(
        ("id" = Uuid, Path, description = "Sweet ID")
    ),
    request_body = UpdateSweetRequest,
    responses(
        (status = 200, description = "Updated sweet", body = ApiResponse<Sweet>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Sweet not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sweets"
)]
pub async fn update_sweet(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateSweetRequest>,
) -> AppResult<Json<ApiResponse<Sweet>>> {
    let resp = sweet_service::update_sweet(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/sweets/{id}",
    params(
        ("id" = Uuid, Path, description = "Sweet ID")
    ),
    responses(
        (status = 200, description = "Deleted sweet", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Sweet not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sweets"
)]
pub async fn delete_sweet(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = sweet_service::delete_sweet(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/sweets/{id}/purchase",
    params(
        ("id" = Uuid, Path, description = "Sweet ID")
    ),
    request_body = PurchaseRequest,
    responses(
        (status = 201, description = "Purchase recorded", body = ApiResponse<PurchaseReceipt>),
        (status = 400, description = "Not enough stock or invalid quantity"),
        (status = 404, description = "Sweet not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sweets"
)]
pub async fn purchase_sweet(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<PurchaseRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<PurchaseReceipt>>)> {
    let resp = purchase_service::purchase_sweet(&state, &user, id, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/sweets/{id}/restock",
    params(
        ("id" = Uuid, Path, description = "Sweet ID")
    ),
    request_body = RestockRequest,
    responses(
        (status = 200, description = "Restocked sweet", body = ApiResponse<Sweet>),
        (status = 400, description = "Invalid amount"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Sweet not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sweets"
)]
pub async fn restock_sweet(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<RestockRequest>,
) -> AppResult<Json<ApiResponse<Sweet>>> {
    let resp = purchase_service::restock_sweet(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
