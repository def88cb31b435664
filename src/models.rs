//! API-facing shapes projected from the entities. The GraphQL schema exposes
//! these, never the SeaORM models directly.

use async_graphql::SimpleObject;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::{
    domain::{Customizations, SelectedExtras, SizeOption, size_options_from_json},
    entity,
};

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub favorite_canteens: Vec<i32>,
    pub recent_orders: Vec<i32>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn from_entity(model: entity::users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role: model.role,
            favorite_canteens: json_ids(model.favorite_canteens),
            recent_orders: json_ids(model.recent_orders),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct Canteen {
    pub id: i32,
    pub name: String,
    pub location: Option<String>,
    pub email: String,
    pub contact_number: Option<String>,
    pub description: Option<String>,
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
}

impl Canteen {
    pub fn from_entity(model: entity::canteens::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            location: model.location,
            email: model.email,
            contact_number: model.contact_number,
            description: model.description,
            user_id: model.user_id,
            breakfast_start: model.breakfast_start,
            breakfast_end: model.breakfast_end,
            lunch_start: model.lunch_start,
            lunch_end: model.lunch_end,
            dinner_start: model.dinner_start,
            dinner_end: model.dinner_end,
            rating_avg: model.rating_avg,
            rating_count: model.rating_count,
            supports_vegetarian: model.supports_vegetarian,
            supports_non_veg: model.supports_non_veg,
            supports_thali: model.supports_thali,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct MenuItem {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
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
    pub size_options: Option<Vec<SizeOption>>,
    pub min_quantity: i32,
    pub max_quantity: i32,
    pub preparation_time: Option<i32>,
    pub allows_special_instructions: bool,
    pub special_instructions_prompt: Option<String>,
    pub calories: Option<i32>,
    pub spice_level: i32,
    pub popularity_score: f64,
    pub rating_avg: f64,
    pub rating_count: i32,
}

impl MenuItem {
    pub fn from_entity(model: entity::menu_items::Model) -> Self {
        let size_options = model
            .size_options
            .as_ref()
            .and_then(size_options_from_json);
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            image_url: model.image_url,
            category: model.category,
            canteen_id: model.canteen_id,
            is_available: model.is_available,
            is_featured: model.is_featured,
            is_vegetarian: model.is_vegetarian,
            is_vegan: model.is_vegan,
            is_gluten_free: model.is_gluten_free,
            has_size_variations: model.has_size_variations,
            size_options,
            min_quantity: model.min_quantity,
            max_quantity: model.max_quantity,
            preparation_time: model.preparation_time,
            allows_special_instructions: model.allows_special_instructions,
            special_instructions_prompt: model.special_instructions_prompt,
            calories: model.calories,
            spice_level: model.spice_level,
            popularity_score: model.popularity_score,
            rating_avg: model.rating_avg,
            rating_count: model.rating_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct CartItem {
    pub id: i32,
    pub cart_id: i32,
    pub menu_item_id: i32,
    /// Denormalized from the menu item for display.
    pub name: Option<String>,
    pub price: Option<i64>,
    pub quantity: i32,
    pub canteen_id: Option<i32>,
    pub canteen_name: Option<String>,
    pub customizations: Option<Customizations>,
    pub special_instructions: Option<String>,
    pub location: Option<String>,
}

impl CartItem {
    /// Project a cart line together with its menu item (when it still
    /// exists) and the owning canteen's name.
    pub fn project(
        model: entity::cart_items::Model,
        menu_item: Option<&entity::menu_items::Model>,
        canteen_name: Option<String>,
    ) -> Self {
        let extras: Option<SelectedExtras> = model
            .selected_extras
            .as_ref()
            .and_then(|value| serde_json::from_value(value.clone()).ok());
        let customizations = Customizations::project(
            model.selected_size.as_deref(),
            extras.as_ref(),
            model.special_instructions.as_deref(),
        );
        Self {
            id: model.id,
            cart_id: model.cart_id,
            menu_item_id: model.menu_item_id,
            name: menu_item.map(|m| m.name.clone()),
            price: menu_item.map(|m| m.price),
            quantity: model.quantity,
            canteen_id: menu_item.map(|m| m.canteen_id),
            canteen_name,
            customizations,
            special_instructions: model.special_instructions,
            location: model.location,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct Cart {
    pub id: i32,
    pub user_id: i32,
    pub pickup_date: Option<NaiveDate>,
    pub pickup_time: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<CartItem>,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub menu_item_id: i32,
    pub menu_item_name: String,
    pub canteen_name: String,
    pub quantity: i32,
    pub price: i64,
    pub line_total: i64,
    pub customizations: Option<Customizations>,
    pub preparation_time: Option<i32>,
    pub is_prepared: bool,
    pub notes: Option<String>,
}

impl OrderItem {
    pub fn from_entity(model: entity::order_items::Model) -> Self {
        let customizations = model
            .customizations
            .as_ref()
            .and_then(|value| serde_json::from_value(value.clone()).ok());
        Self {
            id: model.id,
            order_id: model.order_id,
            menu_item_id: model.menu_item_id,
            menu_item_name: model.menu_item_name,
            canteen_name: model.canteen_name,
            quantity: model.quantity,
            price: model.price,
            line_total: model.line_total,
            customizations,
            preparation_time: model.preparation_time,
            is_prepared: model.is_prepared,
            notes: model.notes,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct OrderStep {
    pub id: i32,
    pub order_id: i32,
    pub position: i32,
    pub label: String,
    pub is_completed: bool,
    pub is_current: bool,
}

impl OrderStep {
    pub fn from_entity(model: entity::order_steps::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            position: model.position,
            label: model.label,
            is_completed: model.is_completed,
            is_current: model.is_current,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct Order {
    pub id: i32,
    pub user_id: i32,
    pub canteen_id: i32,
    pub reference: String,
    pub status: String,
    pub total_amount: i64,
    pub subtotal: Option<i64>,
    pub tax_rate: Option<f64>,
    pub tax_amount: Option<i64>,
    pub payment_method: String,
    pub payment_status: String,
    pub payment_id: Option<String>,
    pub order_time: DateTime<Utc>,
    pub confirmed_time: Option<DateTime<Utc>>,
    pub preparing_time: Option<DateTime<Utc>>,
    pub ready_time: Option<DateTime<Utc>>,
    pub delivery_time: Option<DateTime<Utc>>,
    pub cancelled_time: Option<DateTime<Utc>>,
    pub pickup_time: Option<String>,
    pub customer_note: Option<String>,
    pub cancellation_reason: Option<String>,
    pub phone: Option<String>,
    pub is_pre_order: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
    pub steps: Vec<OrderStep>,
}

impl Order {
    pub fn from_entity(
        model: entity::orders::Model,
        items: Vec<entity::order_items::Model>,
        steps: Vec<entity::order_steps::Model>,
    ) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            canteen_id: model.canteen_id,
            reference: model.reference,
            status: model.status.as_str().to_string(),
            total_amount: model.total_amount,
            subtotal: model.subtotal,
            tax_rate: model.tax_rate,
            tax_amount: model.tax_amount,
            payment_method: model.payment_method,
            payment_status: model.payment_status.as_str().to_string(),
            payment_id: model.payment_id,
            order_time: model.order_time.with_timezone(&Utc),
            confirmed_time: model.confirmed_time.map(|t| t.with_timezone(&Utc)),
            preparing_time: model.preparing_time.map(|t| t.with_timezone(&Utc)),
            ready_time: model.ready_time.map(|t| t.with_timezone(&Utc)),
            delivery_time: model.delivery_time.map(|t| t.with_timezone(&Utc)),
            cancelled_time: model.cancelled_time.map(|t| t.with_timezone(&Utc)),
            pickup_time: model.pickup_time,
            customer_note: model.customer_note,
            cancellation_reason: model.cancellation_reason,
            phone: model.phone,
            is_pre_order: model.is_pre_order,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
            items: items.into_iter().map(OrderItem::from_entity).collect(),
            steps: steps.into_iter().map(OrderStep::from_entity).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct Complaint {
    pub id: i32,
    pub user_id: i32,
    pub order_id: i32,
    pub heading: String,
    pub complaint_text: String,
    pub complaint_type: String,
    pub status: String,
    pub is_escalated: bool,
    pub response_text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Complaint {
    pub fn from_entity(model: entity::complaints::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            order_id: model.order_id,
            heading: model.heading,
            complaint_text: model.complaint_text,
            complaint_type: model.category.as_str().to_string(),
            status: model.status.as_str().to_string(),
            is_escalated: model.is_escalated,
            response_text: model.response_text,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.map(|t| t.with_timezone(&Utc)),
        }
    }
}

fn json_ids(value: Option<serde_json::Value>) -> Vec<i32> {
    value
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}
