use sea_orm::entity::prelude::*;

use crate::domain::{OrderStatus, PaymentStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub canteen_id: i32,
    /// Human-readable order reference, e.g. `ORD-20250512-1a2b3c4d`.
    pub reference: String,
    pub status: OrderStatus,
    pub total_amount: i64,
    /// Set for scheduled orders, which carry a tax breakdown.
    pub subtotal: Option<i64>,
    pub tax_rate: Option<f64>,
    pub tax_amount: Option<i64>,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub payment_id: Option<String>,
    pub order_time: DateTimeWithTimeZone,
    pub confirmed_time: Option<DateTimeWithTimeZone>,
    pub preparing_time: Option<DateTimeWithTimeZone>,
    pub ready_time: Option<DateTimeWithTimeZone>,
    pub delivery_time: Option<DateTimeWithTimeZone>,
    pub cancelled_time: Option<DateTimeWithTimeZone>,
    pub pickup_time: Option<String>,
    pub customer_note: Option<String>,
    pub cancellation_reason: Option<String>,
    pub phone: Option<String>,
    pub is_pre_order: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::canteens::Entity",
        from = "Column::CanteenId",
        to = "super::canteens::Column::Id"
    )]
    Canteens,
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
    #[sea_orm(has_many = "super::order_steps::Entity")]
    OrderSteps,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::canteens::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Canteens.def()
    }
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl Related<super::order_steps::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderSteps.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
