use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::sweets::{CategoryList, CreateSweetRequest, SweetList, UpdateSweetRequest},
    entity::sweets::{ActiveModel as SweetActive, Column, Entity as Sweets, Model as SweetModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_owner_or_admin},
    models::Sweet,
    response::{ApiResponse, Meta},
    routes::params::{SortOrder, SweetQuery, SweetSortBy},
    state::AppState,
};

pub async fn list_sweets(state: &AppState, query: SweetQuery) -> AppResult<ApiResponse<SweetList>> {
    let condition = build_condition(&query);

    let sort_col = match query.sort_by.unwrap_or(SweetSortBy::CreatedAt) {
        SweetSortBy::CreatedAt => Column::CreatedAt,
        SweetSortBy::Name => Column::Name,
        SweetSortBy::Price => Column::Price,
        SweetSortBy::Quantity => Column::Quantity,
    };

    let mut finder = Sweets::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let items: Vec<Sweet> = finder
        .order_by_asc(Column::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Sweet::from)
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Sweets", SweetList { items }, Some(meta)))
}

fn build_condition(query: &SweetQuery) -> Condition {
    let mut condition = Condition::all();

    if let Some(search) = query.search_term() {
        let pattern = format!("%{}%", escape_like(search));
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Category).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }

    if let Some(category) = query.category_filter() {
        condition = condition.add(Column::Category.eq(category));
    }

    if let Some(range) = query.price_range {
        let (min, max) = range.bounds();
        if let Some(min) = min {
            condition = condition.add(Column::Price.gte(min));
        }
        if let Some(max) = max {
            condition = condition.add(Column::Price.lt(max));
        }
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::Price.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::Price.lte(max_price));
    }

    if query.in_stock == Some(true) {
        condition = condition.add(Column::Quantity.gt(0));
    }

    condition
}

/// Escape `LIKE` wildcards so user input only matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items: Vec<String> = Sweets::find()
        .select_only()
        .column(Column::Category)
        .distinct()
        .order_by_asc(Column::Category)
        .into_tuple::<String>()
        .all(&state.orm)
        .await?;

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Categories", CategoryList { items }, Some(meta)))
}

pub async fn get_sweet(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Sweet>> {
    let sweet = find_sweet(state, id).await?;
    Ok(ApiResponse::success("Sweet", Sweet::from(sweet), None))
}

pub async fn create_sweet(
    state: &AppState,
    user: &AuthUser,
    payload: CreateSweetRequest,
) -> AppResult<ApiResponse<Sweet>> {
    let active = SweetActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        category: Set(payload.category.trim().to_string()),
        price: Set(payload.price),
        quantity: Set(payload.quantity),
        description: Set(non_empty(payload.description)),
        image_url: Set(non_empty(payload.image_url)),
        created_by: Set(Some(user.user_id)),
        created_at: NotSet,
        updated_at: NotSet,
    };
    let sweet = active.insert(&state.orm).await?;

    tracing::info!(sweet_id = %sweet.id, user_id = %user.user_id, "sweet created");
    audit::record(
        &state.pool,
        user.user_id,
        "sweet_create",
        "sweets",
        serde_json::json!({ "sweet_id": sweet.id, "quantity": sweet.quantity }),
    )
    .await;

    Ok(ApiResponse::success(
        "Sweet created",
        Sweet::from(sweet),
        Some(Meta::empty()),
    ))
}

pub async fn update_sweet(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateSweetRequest,
) -> AppResult<ApiResponse<Sweet>> {
    let existing = find_sweet(state, id).await?;
    ensure_owner_or_admin(user, &Sweet::from(existing.clone()))?;

    let mut active: SweetActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(category) = payload.category {
        active.category = Set(category.trim().to_string());
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(description) = payload.description {
        active.description = Set(non_empty(Some(description)));
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(non_empty(Some(image_url)));
    }
    active.updated_at = Set(Utc::now().into());

    let sweet = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "sweet_update",
        "sweets",
        serde_json::json!({ "sweet_id": sweet.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        Sweet::from(sweet),
        Some(Meta::empty()),
    ))
}

pub async fn delete_sweet(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let existing = find_sweet(state, id).await?;
    ensure_owner_or_admin(user, &Sweet::from(existing))?;

    let result = Sweets::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(sweet_id = %id, user_id = %user.user_id, "sweet deleted");
    audit::record(
        &state.pool,
        user.user_id,
        "sweet_delete",
        "sweets",
        serde_json::json!({ "sweet_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Sweet deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

async fn find_sweet(state: &AppState, id: Uuid) -> AppResult<SweetModel> {
    Sweets::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("fudge"), "fudge");
    }

    #[test]
    fn blank_optional_text_becomes_none() {
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(Some(" Tart ".into())), Some("Tart".into()));
        assert_eq!(non_empty(None), None);
    }
}
