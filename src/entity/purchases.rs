use sea_orm::entity::prelude::*;

/// Ledger row. Written once by the purchase path and never updated.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub sweet_id: Option<Uuid>,
    pub quantity: i32,
    pub total_price: i64,
    pub purchased_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "SetNull"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::sweets::Entity",
        from = "Column::SweetId",
        to = "super::sweets::Column::Id",
        on_delete = "SetNull"
    )]
    Sweets,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::sweets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sweets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
