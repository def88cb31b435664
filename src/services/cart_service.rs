use std::collections::HashMap;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::{
    audit::log_audit,
    auth::Identity,
    db::OrmConn,
    domain::SelectedExtras,
    entity::{CartItems, Carts, Canteens, MenuItems, cart_items, carts, menu_items},
    error::{AppError, AppResult},
    models::{Cart, CartItem},
    state::AppState,
};

#[derive(Debug, Clone)]
pub struct AddToCartParams {
    pub menu_item_id: i32,
    pub quantity: i32,
    pub selected_size: Option<String>,
    pub selected_extras: Option<SelectedExtras>,
    pub special_instructions: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateCartItemParams {
    pub quantity: Option<i32>,
    pub selected_size: Option<String>,
    pub selected_extras: Option<SelectedExtras>,
    pub special_instructions: Option<String>,
    pub location: Option<String>,
}

pub async fn get_cart_by_user_id(orm: &OrmConn, user_id: i32) -> AppResult<Option<Cart>> {
    let cart = Carts::find()
        .filter(carts::Column::UserId.eq(user_id))
        .one(orm)
        .await?;
    let Some(cart) = cart else {
        return Ok(None);
    };

    let items = CartItems::find()
        .filter(cart_items::Column::CartId.eq(cart.id))
        .order_by_asc(cart_items::Column::Id)
        .all(orm)
        .await?;

    let projected = project_items(orm, items).await?;
    Ok(Some(Cart {
        id: cart.id,
        user_id: cart.user_id,
        pickup_date: cart.pickup_date,
        pickup_time: cart.pickup_time,
        created_at: cart.created_at.with_timezone(&Utc),
        updated_at: cart.updated_at.with_timezone(&Utc),
        items: projected,
    }))
}

pub async fn add_to_cart(
    state: &AppState,
    identity: &Identity,
    params: AddToCartParams,
) -> AppResult<CartItem> {
    if params.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let menu_item = MenuItems::find_by_id(params.menu_item_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Menu item"))?;

    let cart = get_or_create_cart(&state.orm, identity.user_id).await?;

    let extras_json = params
        .selected_extras
        .as_ref()
        .filter(|e| !e.is_empty())
        .map(|e| serde_json::json!(e));

    // A line is the same line only when menu item, size and extras all match
    // exactly; any difference starts a new line.
    let existing = CartItems::find()
        .filter(cart_items::Column::CartId.eq(cart.id))
        .filter(cart_items::Column::MenuItemId.eq(params.menu_item_id))
        .all(&state.orm)
        .await?
        .into_iter()
        .find(|item| same_line(item, &params.selected_size, &extras_json));

    let cart_item = if let Some(item) = existing {
        let quantity = item.quantity + params.quantity;
        let mut active: cart_items::ActiveModel = item.into();
        active.quantity = Set(quantity);
        active.update(&state.orm).await?
    } else {
        cart_items::ActiveModel {
            id: NotSet,
            cart_id: Set(cart.id),
            menu_item_id: Set(params.menu_item_id),
            quantity: Set(params.quantity),
            selected_size: Set(params.selected_size.clone()),
            selected_extras: Set(extras_json),
            special_instructions: Set(params.special_instructions.clone()),
            location: Set(params.location.clone()),
            created_at: NotSet,
        }
        .insert(&state.orm)
        .await?
    };

    touch_cart(&state.orm, cart).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(identity.user_id),
        "cart_add",
        Some("cart_items"),
        Some(serde_json::json!({
            "menu_item_id": params.menu_item_id,
            "quantity": params.quantity,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let canteen_name = Canteens::find_by_id(menu_item.canteen_id)
        .one(&state.orm)
        .await?
        .map(|c| c.name);
    Ok(CartItem::project(cart_item, Some(&menu_item), canteen_name))
}

pub async fn update_cart_item(
    state: &AppState,
    cart_item_id: i32,
    params: UpdateCartItemParams,
) -> AppResult<()> {
    let item = CartItems::find_by_id(cart_item_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Cart item"))?;
    let cart_id = item.cart_id;

    let mut active: cart_items::ActiveModel = item.into();
    if let Some(quantity) = params.quantity {
        if quantity <= 0 {
            return Err(AppError::BadRequest(
                "quantity must be greater than 0".to_string(),
            ));
        }
        active.quantity = Set(quantity);
    }
    if let Some(size) = params.selected_size {
        active.selected_size = Set(Some(size));
    }
    if let Some(extras) = params.selected_extras {
        let value = (!extras.is_empty()).then(|| serde_json::json!(extras));
        active.selected_extras = Set(value);
    }
    if let Some(instructions) = params.special_instructions {
        active.special_instructions = Set(Some(instructions));
    }
    if let Some(location) = params.location {
        active.location = Set(Some(location));
    }
    active.update(&state.orm).await?;

    if let Some(cart) = Carts::find_by_id(cart_id).one(&state.orm).await? {
        touch_cart(&state.orm, cart).await?;
    }
    Ok(())
}

pub async fn remove_from_cart(state: &AppState, user_id: i32, cart_item_id: i32) -> AppResult<()> {
    let item = CartItems::find_by_id(cart_item_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Cart item"))?;

    let cart = Carts::find_by_id(item.cart_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Cart"))?;
    if cart.user_id != user_id {
        return Err(AppError::Forbidden(
            "cart item does not belong to this user".into(),
        ));
    }

    CartItems::delete_by_id(item.id).exec(&state.orm).await?;
    touch_cart(&state.orm, cart).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user_id),
        "cart_remove",
        Some("cart_items"),
        Some(serde_json::json!({ "cart_item_id": cart_item_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(())
}

pub async fn clear_cart(state: &AppState, user_id: i32) -> AppResult<()> {
    let cart = Carts::find()
        .filter(carts::Column::UserId.eq(user_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Cart"))?;

    CartItems::delete_many()
        .filter(cart_items::Column::CartId.eq(cart.id))
        .exec(&state.orm)
        .await?;
    touch_cart(&state.orm, cart).await?;
    Ok(())
}

/// Upsert-on-first-use. Two concurrent first requests race on the insert; the
/// unique constraint on user_id makes the loser re-read the winner's row.
async fn get_or_create_cart(orm: &OrmConn, user_id: i32) -> AppResult<carts::Model> {
    if let Some(cart) = Carts::find()
        .filter(carts::Column::UserId.eq(user_id))
        .one(orm)
        .await?
    {
        return Ok(cart);
    }

    let inserted = carts::ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        pickup_date: Set(None),
        pickup_time: Set(None),
        created_at: NotSet,
        updated_at: Set(Utc::now().into()),
    }
    .insert(orm)
    .await;

    match inserted {
        Ok(cart) => Ok(cart),
        Err(err) => Carts::find()
            .filter(carts::Column::UserId.eq(user_id))
            .one(orm)
            .await?
            .ok_or_else(|| err.into()),
    }
}

async fn touch_cart(orm: &OrmConn, cart: carts::Model) -> AppResult<()> {
    let mut active: carts::ActiveModel = cart.into();
    active.updated_at = Set(Utc::now().into());
    active.update(orm).await?;
    Ok(())
}

/// Line identity: exact equality on (menu item, size, serialized extras).
fn same_line(
    item: &cart_items::Model,
    size: &Option<String>,
    extras: &Option<serde_json::Value>,
) -> bool {
    item.selected_size == *size && item.selected_extras == *extras
}

async fn project_items(
    orm: &OrmConn,
    items: Vec<cart_items::Model>,
) -> AppResult<Vec<CartItem>> {
    let menu_ids: Vec<i32> = items.iter().map(|i| i.menu_item_id).collect();
    let menu_items: HashMap<i32, menu_items::Model> = MenuItems::find()
        .filter(menu_items::Column::Id.is_in(menu_ids))
        .all(orm)
        .await?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

    let canteen_ids: Vec<i32> = menu_items.values().map(|m| m.canteen_id).collect();
    let canteen_names: HashMap<i32, String> = Canteens::find()
        .filter(crate::entity::canteens::Column::Id.is_in(canteen_ids))
        .all(orm)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    Ok(items
        .into_iter()
        .map(|item| {
            let menu_item = menu_items.get(&item.menu_item_id);
            let canteen_name =
                menu_item.and_then(|m| canteen_names.get(&m.canteen_id).cloned());
            CartItem::project(item, menu_item, canteen_name)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn line(size: Option<&str>, extras: Option<serde_json::Value>) -> cart_items::Model {
        cart_items::Model {
            id: 1,
            cart_id: 1,
            menu_item_id: 1,
            quantity: 1,
            selected_size: size.map(str::to_string),
            selected_extras: extras,
            special_instructions: None,
            location: None,
            created_at: chrono::Utc.timestamp_opt(0, 0).unwrap().into(),
        }
    }

    #[test]
    fn identical_size_and_extras_match() {
        let extras = serde_json::json!({"additions": ["cheese"], "removals": []});
        let item = line(Some("large"), Some(extras.clone()));
        assert!(same_line(&item, &Some("large".into()), &Some(extras)));
    }

    #[test]
    fn any_extras_difference_is_a_new_line() {
        let item = line(
            Some("large"),
            Some(serde_json::json!({"additions": ["cheese"], "removals": []})),
        );
        let other = serde_json::json!({"additions": ["cheese", "onion"], "removals": []});
        assert!(!same_line(&item, &Some("large".into()), &Some(other)));
        assert!(!same_line(&item, &Some("regular".into()), &item.selected_extras.clone()));
        assert!(!same_line(&item, &Some("large".into()), &None));
    }
}
