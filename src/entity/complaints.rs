use sea_orm::entity::prelude::*;

use crate::domain::{ComplaintCategory, ComplaintStatus};

// user_id and order_id are plain references; the original schema carried no
// enforced foreign keys for complaints.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "complaints")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub order_id: i32,
    pub heading: String,
    pub complaint_text: String,
    pub category: ComplaintCategory,
    pub status: ComplaintStatus,
    pub is_escalated: bool,
    pub response_text: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
