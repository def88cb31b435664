use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "canteens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub location: Option<String>,
    /// Contact email; also the vendor authorization anchor.
    pub email: String,
    pub contact_number: Option<String>,
    pub description: Option<String>,
    /// Owning vendor user.
    pub user_id: i32,
    pub breakfast_start: Option<String>,
    pub breakfast_end: Option<String>,
    pub lunch_start: Option<String>,
    pub lunch_end: Option<String>,
    pub dinner_start: Option<String>,
    pub dinner_end: Option<String>,
    pub rating_avg: f64,
    pub rating_count: i32,
    pub supports_vegetarian: bool,
    pub supports_non_veg: bool,
    pub supports_thali: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::menu_items::Entity")]
    MenuItems,
    #[sea_orm(has_many = "super::orders::Entity")]
    Orders,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::menu_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MenuItems.def()
    }
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
