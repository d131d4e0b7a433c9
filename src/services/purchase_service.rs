use chrono::Utc;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::{
        purchases::{OrderHistory, PurchaseRecord, SweetSummary},
        sweets::{PurchaseReceipt, PurchaseRequest, RestockRequest},
    },
    entity::{
        purchases::{ActiveModel as PurchaseActive, Column as PurchaseCol, Entity as Purchases},
        sweets::{ActiveModel as SweetActive, Entity as Sweets, Model as SweetModel},
    },
    error::{AppError, AppResult},
    inventory::{plan_purchase, plan_restock},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Purchase, Sweet},
    response::{ApiResponse, Meta},
    routes::params::{AdminPurchaseQuery, PurchaseQuery, SortOrder},
    state::AppState,
};

/// Decrement stock and append a ledger entry in one transaction.
///
/// The sweet row is locked for the duration, so two buyers racing for the
/// last units are serialized and the loser sees the updated quantity.
pub async fn purchase_sweet(
    state: &AppState,
    user: &AuthUser,
    sweet_id: Uuid,
    payload: PurchaseRequest,
) -> AppResult<ApiResponse<PurchaseReceipt>> {
    let txn = state.orm.begin().await?;

    let sweet = Sweets::find_by_id(sweet_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let sweet = match sweet {
        Some(s) => s,
        None => return Err(AppError::NotFound),
    };

    let plan = plan_purchase(sweet.quantity, sweet.price, payload.quantity).inspect_err(|err| {
        tracing::debug!(sweet_id = %sweet_id, user_id = %user.user_id, error = %err, "purchase rejected");
    })?;

    let mut active: SweetActive = sweet.into();
    active.quantity = Set(plan.remaining);
    active.updated_at = Set(Utc::now().into());
    let sweet = active.update(&txn).await?;

    let purchase = PurchaseActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(Some(user.user_id)),
        sweet_id: Set(Some(sweet.id)),
        quantity: Set(payload.quantity),
        total_price: Set(plan.total_price),
        purchased_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!(
        purchase_id = %purchase.id,
        sweet_id = %sweet.id,
        user_id = %user.user_id,
        quantity = purchase.quantity,
        remaining = sweet.quantity,
        "purchase recorded"
    );
    audit::record(
        &state.pool,
        user.user_id,
        "purchase",
        "purchases",
        serde_json::json!({
            "purchase_id": purchase.id,
            "sweet_id": sweet.id,
            "quantity": purchase.quantity,
            "total_price": purchase.total_price,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Purchase complete",
        PurchaseReceipt {
            purchase: Purchase::from(purchase),
            sweet: Sweet::from(sweet),
        },
        Some(Meta::empty()),
    ))
}

pub async fn restock_sweet(
    state: &AppState,
    user: &AuthUser,
    sweet_id: Uuid,
    payload: RestockRequest,
) -> AppResult<ApiResponse<Sweet>> {
    ensure_admin(user)?;

    let txn = state.orm.begin().await?;
    let sweet = Sweets::find_by_id(sweet_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let sweet = match sweet {
        Some(s) => s,
        None => return Err(AppError::NotFound),
    };

    let new_quantity = plan_restock(sweet.quantity, payload.amount)?;

    let mut active: SweetActive = sweet.into();
    active.quantity = Set(new_quantity);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(sweet_id = %updated.id, amount = payload.amount, quantity = updated.quantity, "sweet restocked");
    audit::record(
        &state.pool,
        user.user_id,
        "sweet_restock",
        "sweets",
        serde_json::json!({ "sweet_id": updated.id, "amount": payload.amount }),
    )
    .await;

    Ok(ApiResponse::success(
        "Restocked",
        Sweet::from(updated),
        Some(Meta::empty()),
    ))
}

pub async fn list_my_purchases(
    state: &AppState,
    user: &AuthUser,
    query: PurchaseQuery,
) -> AppResult<ApiResponse<OrderHistory>> {
    let condition = Condition::all().add(PurchaseCol::UserId.eq(user.user_id));
    let history = load_history(state, condition, query.sort_order).await?;
    let meta = Meta::total(history.items.len());
    Ok(ApiResponse::success("Order history", history, Some(meta)))
}

pub async fn list_all_purchases(
    state: &AppState,
    user: &AuthUser,
    query: AdminPurchaseQuery,
) -> AppResult<ApiResponse<OrderHistory>> {
    ensure_admin(user)?;
    let mut condition = Condition::all();
    if let Some(user_id) = query.user_id {
        condition = condition.add(PurchaseCol::UserId.eq(user_id));
    }
    let history = load_history(state, condition, query.sort_order).await?;
    let meta = Meta::total(history.items.len());
    Ok(ApiResponse::success("Purchases", history, Some(meta)))
}

async fn load_history(
    state: &AppState,
    condition: Condition,
    sort_order: Option<SortOrder>,
) -> AppResult<OrderHistory> {
    let mut finder = Purchases::find().filter(condition);
    finder = match sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(PurchaseCol::PurchasedAt),
        SortOrder::Desc => finder.order_by_desc(PurchaseCol::PurchasedAt),
    };

    let items = finder
        .find_also_related(Sweets)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(purchase, sweet)| purchase_record(purchase.into(), sweet))
        .collect();

    Ok(OrderHistory::new(items))
}

fn purchase_record(purchase: Purchase, sweet: Option<SweetModel>) -> PurchaseRecord {
    PurchaseRecord {
        purchase,
        sweet: sweet.map(|s| SweetSummary::from(Sweet::from(s))),
    }
}
