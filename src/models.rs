use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{purchases, sweets, users};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Public view of an account. The password hash never leaves the service layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Sweet {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    /// Unit price in minor units (cents).
    pub price: i64,
    pub quantity: i32,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Purchase {
    pub id: Uuid,
    /// `None` once the buyer's account has been removed.
    pub user_id: Option<Uuid>,
    pub sweet_id: Option<Uuid>,
    pub quantity: i32,
    /// Unit price at purchase time multiplied by quantity, in minor units.
    pub total_price: i64,
    pub purchased_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            full_name: model.full_name,
            role: model.role,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<sweets::Model> for Sweet {
    fn from(model: sweets::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            category: model.category,
            price: model.price,
            quantity: model.quantity,
            description: model.description,
            image_url: model.image_url,
            created_by: model.created_by,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<purchases::Model> for Purchase {
    fn from(model: purchases::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            sweet_id: model.sweet_id,
            quantity: model.quantity,
            total_price: model.total_price,
            purchased_at: model.purchased_at.with_timezone(&Utc),
        }
    }
}
