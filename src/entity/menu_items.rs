use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "menu_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Unit price in the smallest currency unit.
    pub price: i64,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub canteen_id: i32,
    pub is_available: bool,
    pub is_featured: bool,
    pub is_vegetarian: bool,
    pub is_vegan: bool,
    pub is_gluten_free: bool,
    pub has_size_variations: bool,
    /// Named size -> price delta map, JSON.
    pub size_options: Option<Json>,
    pub min_quantity: i32,
    pub max_quantity: i32,
    /// Minutes.
    pub preparation_time: Option<i32>,
    pub allows_special_instructions: bool,
    pub special_instructions_prompt: Option<String>,
    pub calories: Option<i32>,
    /// 1-5 scale.
    pub spice_level: i32,
    pub popularity_score: f64,
    pub rating_avg: f64,
    pub rating_count: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::canteens::Entity",
        from = "Column::CanteenId",
        to = "super::canteens::Column::Id"
    )]
    Canteens,
    #[sea_orm(has_many = "super::cart_items::Entity")]
    CartItems,
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
}

impl Related<super::canteens::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Canteens.def()
    }
}

impl Related<super::cart_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartItems.def()
    }
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
