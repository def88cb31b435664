use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::{
    audit::log_audit,
    auth::Identity,
    db::OrmConn,
    domain::SizeOptionMap,
    entity::{Canteens, MenuItems, canteens, menu_items},
    error::{AppError, AppResult},
    models::MenuItem,
    state::AppState,
};

pub async fn list_menu_items(
    orm: &OrmConn,
    canteen_id: Option<i32>,
    category: Option<String>,
    available_only: bool,
) -> AppResult<Vec<MenuItem>> {
    let mut condition = Condition::all();
    if let Some(canteen_id) = canteen_id {
        condition = condition.add(menu_items::Column::CanteenId.eq(canteen_id));
    }
    if let Some(category) = category.filter(|c| !c.is_empty()) {
        condition = condition.add(menu_items::Column::Category.eq(category));
    }
    if available_only {
        condition = condition.add(menu_items::Column::IsAvailable.eq(true));
    }

    let items = MenuItems::find()
        .filter(condition)
        .order_by_asc(menu_items::Column::Name)
        .all(orm)
        .await?;
    Ok(items.into_iter().map(MenuItem::from_entity).collect())
}

pub async fn get_featured_menu_items(orm: &OrmConn) -> AppResult<Vec<MenuItem>> {
    let items = MenuItems::find()
        .filter(menu_items::Column::IsFeatured.eq(true))
        .order_by_desc(menu_items::Column::PopularityScore)
        .all(orm)
        .await?;
    Ok(items.into_iter().map(MenuItem::from_entity).collect())
}

pub async fn get_menu_items_by_canteen(orm: &OrmConn, canteen_id: i32) -> AppResult<Vec<MenuItem>> {
    list_menu_items(orm, Some(canteen_id), None, false).await
}

/// Case-insensitive free-text match on name or description.
pub async fn search_menu_items(orm: &OrmConn, query: &str) -> AppResult<Vec<MenuItem>> {
    let pattern = format!("%{}%", query.to_lowercase());
    let condition = Condition::any()
        .add(Expr::expr(Func::lower(Expr::col(menu_items::Column::Name))).like(pattern.clone()))
        .add(Expr::expr(Func::lower(Expr::col(menu_items::Column::Description))).like(pattern));
    let items = MenuItems::find()
        .filter(condition)
        .order_by_asc(menu_items::Column::Name)
        .all(orm)
        .await?;
    Ok(items.into_iter().map(MenuItem::from_entity).collect())
}

/// Fetch the canteen and reject callers that are not its registered vendor.
async fn authorize_vendor(
    orm: &OrmConn,
    canteen_id: i32,
    identity: &Identity,
) -> AppResult<canteens::Model> {
    let canteen = Canteens::find_by_id(canteen_id)
        .one(orm)
        .await?
        .ok_or(AppError::NotFound("Canteen"))?;
    if !identity.can_manage(&canteen) {
        return Err(AppError::Forbidden(
            "you don't have permission to manage this canteen's menu".into(),
        ));
    }
    Ok(canteen)
}

async fn find_item(orm: &OrmConn, item_id: i32) -> AppResult<menu_items::Model> {
    MenuItems::find_by_id(item_id)
        .one(orm)
        .await?
        .ok_or(AppError::NotFound("Menu item"))
}

#[allow(clippy::too_many_arguments)]
pub async fn create_menu_item(
    state: &AppState,
    identity: &Identity,
    name: String,
    price: i64,
    canteen_id: i32,
    description: Option<String>,
    image_url: Option<String>,
    category: Option<String>,
    is_vegetarian: Option<bool>,
    is_featured: Option<bool>,
) -> AppResult<MenuItem> {
    authorize_vendor(&state.orm, canteen_id, identity).await?;

    let item = menu_items::ActiveModel {
        id: NotSet,
        name: Set(name),
        description: Set(description),
        price: Set(price),
        image_url: Set(image_url),
        category: Set(category),
        canteen_id: Set(canteen_id),
        // New items are available by default.
        is_available: Set(true),
        is_featured: Set(is_featured.unwrap_or(false)),
        is_vegetarian: Set(is_vegetarian.unwrap_or(false)),
        is_vegan: Set(false),
        is_gluten_free: Set(false),
        has_size_variations: Set(false),
        size_options: Set(None),
        min_quantity: Set(1),
        max_quantity: Set(10),
        preparation_time: Set(None),
        allows_special_instructions: Set(true),
        special_instructions_prompt: Set(None),
        calories: Set(None),
        spice_level: Set(1),
        popularity_score: Set(0.0),
        rating_avg: Set(0.0),
        rating_count: Set(0),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(identity.user_id),
        "menu_item_create",
        Some("menu_items"),
        Some(serde_json::json!({ "menu_item_id": item.id, "canteen_id": canteen_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(MenuItem::from_entity(item))
}

pub async fn update_menu_item_price(
    state: &AppState,
    identity: &Identity,
    item_id: i32,
    price: i64,
) -> AppResult<()> {
    let item = find_item(&state.orm, item_id).await?;
    authorize_vendor(&state.orm, item.canteen_id, identity).await?;

    let mut active: menu_items::ActiveModel = item.into();
    active.price = Set(price);
    active.update(&state.orm).await?;
    Ok(())
}

pub async fn update_menu_item_availability(
    state: &AppState,
    identity: &Identity,
    item_id: i32,
    is_available: bool,
) -> AppResult<()> {
    let item = find_item(&state.orm, item_id).await?;
    authorize_vendor(&state.orm, item.canteen_id, identity).await?;

    let mut active: menu_items::ActiveModel = item.into();
    active.is_available = Set(is_available);
    active.update(&state.orm).await?;
    Ok(())
}

pub async fn delete_menu_item(
    state: &AppState,
    identity: &Identity,
    item_id: i32,
) -> AppResult<String> {
    let item = find_item(&state.orm, item_id).await?;
    authorize_vendor(&state.orm, item.canteen_id, identity).await?;

    let name = item.name.clone();
    MenuItems::delete_by_id(item.id).exec(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(identity.user_id),
        "menu_item_delete",
        Some("menu_items"),
        Some(serde_json::json!({ "menu_item_id": item_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(name)
}

/// Flip the featured flag; returns the new value.
pub async fn toggle_featured_status(
    state: &AppState,
    identity: &Identity,
    item_id: i32,
) -> AppResult<bool> {
    let item = find_item(&state.orm, item_id).await?;
    authorize_vendor(&state.orm, item.canteen_id, identity).await?;

    let now_featured = !item.is_featured;
    let mut active: menu_items::ActiveModel = item.into();
    active.is_featured = Set(now_featured);
    active.update(&state.orm).await?;
    Ok(now_featured)
}

pub async fn update_preparation_time(
    state: &AppState,
    identity: &Identity,
    item_id: i32,
    preparation_time: i32,
) -> AppResult<()> {
    let item = find_item(&state.orm, item_id).await?;
    authorize_vendor(&state.orm, item.canteen_id, identity).await?;

    let mut active: menu_items::ActiveModel = item.into();
    active.preparation_time = Set(Some(preparation_time));
    active.update(&state.orm).await?;
    Ok(())
}

/// Replace the size -> price-delta map. The payload arrives as a JSON string
/// on the wire; a malformed document is a validation failure.
pub async fn update_size_variations(
    state: &AppState,
    identity: &Identity,
    item_id: i32,
    size_options: &str,
) -> AppResult<()> {
    let item = find_item(&state.orm, item_id).await?;
    authorize_vendor(&state.orm, item.canteen_id, identity).await?;

    let variations: SizeOptionMap = serde_json::from_str(size_options)
        .map_err(|_| AppError::BadRequest("invalid JSON format for size variations".into()))?;

    let mut active: menu_items::ActiveModel = item.into();
    active.has_size_variations = Set(!variations.is_empty());
    active.size_options = Set(Some(serde_json::json!(variations)));
    active.update(&state.orm).await?;
    Ok(())
}
