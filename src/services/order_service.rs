use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    auth::Identity,
    db::OrmConn,
    domain::{Customizations, ORDER_STEP_LABELS, OrderStatus, PaymentStatus, step_cursor},
    entity::{
        Canteens, MenuItems, OrderItems, OrderSteps, Orders, canteens, order_items, order_steps,
        orders,
    },
    error::{AppError, AppResult},
    models::Order,
    state::AppState,
};

#[derive(Debug, Clone)]
pub struct OrderItemParams {
    pub item_id: i32,
    pub quantity: i32,
    pub customizations: Option<Customizations>,
    pub note: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateOrderParams {
    pub user_id: i32,
    pub canteen_id: i32,
    pub items: Vec<OrderItemParams>,
    pub payment_method: String,
    pub phone: String,
    pub customer_note: Option<String>,
    pub is_pre_order: bool,
    pub pickup_time: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ScheduledOrderItemParams {
    pub menu_item_id: i32,
    pub quantity: i32,
    pub unit_price: i64,
    pub size: Option<String>,
    pub extras: Option<crate::domain::SelectedExtras>,
    pub preparation_time: Option<i32>,
    pub special_instructions: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ScheduledOrderParams {
    pub user_id: i32,
    pub canteen_id: i32,
    pub items: Vec<ScheduledOrderItemParams>,
    pub tax_rate: f64,
    pub payment_method: Option<String>,
    pub pickup_time: Option<String>,
    pub notes_from_customer: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateOrderParams {
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub payment_method: Option<String>,
    pub pickup_time: Option<String>,
    pub customer_note: Option<String>,
}

pub async fn get_user_orders(orm: &OrmConn, user_id: i32) -> AppResult<Vec<Order>> {
    let orders = Orders::find()
        .filter(orders::Column::UserId.eq(user_id))
        .order_by_desc(orders::Column::CreatedAt)
        .all(orm)
        .await?;
    load_orders(orm, orders).await
}

pub async fn get_canteen_orders(orm: &OrmConn, canteen_id: i32) -> AppResult<Vec<Order>> {
    let orders = Orders::find()
        .filter(orders::Column::CanteenId.eq(canteen_id))
        .order_by_desc(orders::Column::CreatedAt)
        .all(orm)
        .await?;
    load_orders(orm, orders).await
}

pub async fn get_order_by_id(orm: &OrmConn, order_id: i32) -> AppResult<Option<Order>> {
    let Some(order) = Orders::find_by_id(order_id).one(orm).await? else {
        return Ok(None);
    };
    Ok(Some(load_order(orm, order).await?))
}

pub async fn get_orders_by_status(orm: &OrmConn, status: &str) -> AppResult<Vec<Order>> {
    let status: OrderStatus = status.parse()?;
    let orders = Orders::find()
        .filter(orders::Column::Status.eq(status))
        .order_by_desc(orders::Column::CreatedAt)
        .all(orm)
        .await?;
    load_orders(orm, orders).await
}

/// Orders still moving through the pipeline, newest first.
pub async fn get_active_orders(orm: &OrmConn, user_id: i32) -> AppResult<Vec<Order>> {
    let orders = Orders::find()
        .filter(orders::Column::UserId.eq(user_id))
        .filter(
            orders::Column::Status
                .is_not_in([OrderStatus::Delivered, OrderStatus::Cancelled]),
        )
        .order_by_desc(orders::Column::CreatedAt)
        .all(orm)
        .await?;
    load_orders(orm, orders).await
}

/// Create an order from a checkout item list. Prices are looked up at call
/// time; a missing menu item fails the whole operation and nothing persists.
pub async fn create_order(state: &AppState, params: CreateOrderParams) -> AppResult<Order> {
    let txn = state.orm.begin().await?;

    let canteen = Canteens::find_by_id(params.canteen_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("Canteen"))?;

    let mut lines = Vec::with_capacity(params.items.len());
    let mut total_amount: i64 = 0;
    for item in &params.items {
        if item.quantity <= 0 {
            return Err(AppError::BadRequest(
                "quantity must be greater than 0".to_string(),
            ));
        }
        let menu_item = MenuItems::find_by_id(item.item_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound("Menu item"))?;
        let line_total = menu_item.price * i64::from(item.quantity);
        total_amount += line_total;
        lines.push((menu_item, item, line_total));
    }

    let now = Utc::now();
    let order = orders::ActiveModel {
        id: NotSet,
        user_id: Set(params.user_id),
        canteen_id: Set(params.canteen_id),
        reference: Set(build_order_reference()),
        status: Set(OrderStatus::Pending),
        total_amount: Set(total_amount),
        subtotal: Set(None),
        tax_rate: Set(None),
        tax_amount: Set(None),
        payment_method: Set(params.payment_method.clone()),
        payment_status: Set(PaymentStatus::Pending),
        payment_id: Set(None),
        order_time: Set(now.into()),
        confirmed_time: Set(None),
        preparing_time: Set(None),
        ready_time: Set(None),
        delivery_time: Set(None),
        cancelled_time: Set(None),
        pickup_time: Set(params.pickup_time.clone()),
        customer_note: Set(params.customer_note.clone()),
        cancellation_reason: Set(None),
        phone: Set(Some(params.phone.clone())),
        is_pre_order: Set(params.is_pre_order),
        created_at: NotSet,
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    let mut item_models = Vec::with_capacity(lines.len());
    for (menu_item, item, line_total) in lines {
        let model = order_items::ActiveModel {
            id: NotSet,
            order_id: Set(order.id),
            menu_item_id: Set(menu_item.id),
            menu_item_name: Set(menu_item.name.clone()),
            canteen_name: Set(canteen.name.clone()),
            quantity: Set(item.quantity),
            price: Set(menu_item.price),
            line_total: Set(line_total),
            customizations: Set(item
                .customizations
                .as_ref()
                .map(|c| serde_json::json!(c))),
            preparation_time: Set(menu_item.preparation_time),
            is_prepared: Set(false),
            notes: Set(item.note.clone()),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        item_models.push(model);
    }

    let step_models = insert_steps(&txn, order.id).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(params.user_id),
        "order_create",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "total_amount": total_amount })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(Order::from_entity(order, item_models, step_models))
}

/// Scheduled-order variant: richer item shape plus a tax breakdown. Totals
/// are recomputed server-side from the submitted lines and tax rate.
pub async fn place_scheduled_order(
    state: &AppState,
    params: ScheduledOrderParams,
) -> AppResult<Order> {
    if !(0.0..=1.0).contains(&params.tax_rate) {
        return Err(AppError::BadRequest(
            "tax rate must be between 0 and 1".to_string(),
        ));
    }

    let txn = state.orm.begin().await?;

    let canteen = Canteens::find_by_id(params.canteen_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("Canteen"))?;

    let mut subtotal: i64 = 0;
    let mut lines = Vec::with_capacity(params.items.len());
    for item in &params.items {
        if item.quantity <= 0 {
            return Err(AppError::BadRequest(
                "quantity must be greater than 0".to_string(),
            ));
        }
        let menu_item = MenuItems::find_by_id(item.menu_item_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound("Menu item"))?;
        let line_total = item.unit_price * i64::from(item.quantity);
        subtotal += line_total;
        lines.push((menu_item, item, line_total));
    }

    let tax_amount = (subtotal as f64 * params.tax_rate).round() as i64;
    let total_amount = subtotal + tax_amount;

    let now = Utc::now();
    let order = orders::ActiveModel {
        id: NotSet,
        user_id: Set(params.user_id),
        canteen_id: Set(params.canteen_id),
        reference: Set(build_order_reference()),
        status: Set(OrderStatus::Pending),
        total_amount: Set(total_amount),
        subtotal: Set(Some(subtotal)),
        tax_rate: Set(Some(params.tax_rate)),
        tax_amount: Set(Some(tax_amount)),
        payment_method: Set(params.payment_method.clone().unwrap_or_default()),
        payment_status: Set(PaymentStatus::Pending),
        payment_id: Set(None),
        order_time: Set(now.into()),
        confirmed_time: Set(None),
        preparing_time: Set(None),
        ready_time: Set(None),
        delivery_time: Set(None),
        cancelled_time: Set(None),
        pickup_time: Set(params.pickup_time.clone()),
        customer_note: Set(params.notes_from_customer.clone()),
        cancellation_reason: Set(None),
        phone: Set(None),
        is_pre_order: Set(true),
        created_at: NotSet,
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    let mut item_models = Vec::with_capacity(lines.len());
    for (menu_item, item, line_total) in lines {
        let customizations = Customizations::project(
            item.size.as_deref(),
            item.extras.as_ref(),
            item.special_instructions.as_deref(),
        );
        let model = order_items::ActiveModel {
            id: NotSet,
            order_id: Set(order.id),
            menu_item_id: Set(menu_item.id),
            menu_item_name: Set(menu_item.name.clone()),
            canteen_name: Set(canteen.name.clone()),
            quantity: Set(item.quantity),
            price: Set(item.unit_price),
            line_total: Set(line_total),
            customizations: Set(customizations.map(|c| serde_json::json!(c))),
            preparation_time: Set(item.preparation_time.or(menu_item.preparation_time)),
            is_prepared: Set(false),
            notes: Set(item.notes.clone()),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        item_models.push(model);
    }

    let step_models = insert_steps(&txn, order.id).await?;

    txn.commit().await?;

    Ok(Order::from_entity(order, item_models, step_models))
}

/// Vendor-only status transition: one assignment, the matching timestamp, and
/// the fulfilment steps brought in line.
pub async fn update_order_status(
    state: &AppState,
    identity: &Identity,
    order_id: i32,
    status: &str,
) -> AppResult<Order> {
    let status: OrderStatus = status.parse()?;
    let order = find_order(&state.orm, order_id).await?;
    authorize_vendor(&state.orm, &order, identity).await?;
    if order.status.is_terminal() {
        return Err(AppError::BadRequest(format!(
            "order is already {}",
            order.status.as_str()
        )));
    }

    let now = Utc::now();
    let mut active: orders::ActiveModel = order.into();
    active.status = Set(status);
    match status {
        OrderStatus::Confirmed => active.confirmed_time = Set(Some(now.into())),
        OrderStatus::Preparing => active.preparing_time = Set(Some(now.into())),
        OrderStatus::Ready => active.ready_time = Set(Some(now.into())),
        OrderStatus::Delivered => active.delivery_time = Set(Some(now.into())),
        OrderStatus::Cancelled => active.cancelled_time = Set(Some(now.into())),
        OrderStatus::Pending => {}
    }
    active.updated_at = Set(now.into());
    let order = active.update(&state.orm).await?;

    sync_steps(&state.orm, order.id, status).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(identity.user_id),
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order_id, "status": status.as_str() })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    load_order(&state.orm, order).await
}

/// Vendor-only cancellation with a recorded reason.
pub async fn cancel_order(
    state: &AppState,
    identity: &Identity,
    order_id: i32,
    reason: &str,
) -> AppResult<Order> {
    let order = find_order(&state.orm, order_id).await?;
    authorize_vendor(&state.orm, &order, identity).await?;
    if order.status.is_terminal() {
        return Err(AppError::BadRequest(format!(
            "order is already {}",
            order.status.as_str()
        )));
    }

    let now = Utc::now();
    let mut active: orders::ActiveModel = order.into();
    active.status = Set(OrderStatus::Cancelled);
    active.cancelled_time = Set(Some(now.into()));
    active.cancellation_reason = Set(Some(reason.to_string()));
    active.updated_at = Set(now.into());
    let order = active.update(&state.orm).await?;

    sync_steps(&state.orm, order.id, OrderStatus::Cancelled).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(identity.user_id),
        "order_cancel",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    load_order(&state.orm, order).await
}

pub async fn update_payment_status(
    state: &AppState,
    identity: &Identity,
    order_id: i32,
    payment_status: &str,
) -> AppResult<Order> {
    let payment_status: PaymentStatus = payment_status.parse()?;
    let order = find_order(&state.orm, order_id).await?;
    authorize_vendor(&state.orm, &order, identity).await?;

    let mut active: orders::ActiveModel = order.into();
    active.payment_status = Set(payment_status);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;
    load_order(&state.orm, order).await
}

/// Payment-provider callback path: records the provider's verdict without a
/// vendor check.
pub async fn record_payment_result(
    state: &AppState,
    order_id: i32,
    payment_status: &str,
    payment_id: Option<String>,
) -> AppResult<Order> {
    let payment_status: PaymentStatus = payment_status.parse()?;
    let order = find_order(&state.orm, order_id).await?;

    let mut active: orders::ActiveModel = order.into();
    active.payment_status = Set(payment_status);
    if payment_id.is_some() {
        active.payment_id = Set(payment_id);
    }
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;
    load_order(&state.orm, order).await
}

/// Generic partial update, mirroring the vendor dashboard's edit form.
pub async fn update_order(
    state: &AppState,
    order_id: i32,
    params: UpdateOrderParams,
) -> AppResult<Order> {
    let order = find_order(&state.orm, order_id).await?;

    let status = params
        .status
        .as_deref()
        .map(str::parse::<OrderStatus>)
        .transpose()?;
    let payment_status = params
        .payment_status
        .as_deref()
        .map(str::parse::<PaymentStatus>)
        .transpose()?;

    let mut active: orders::ActiveModel = order.into();
    if let Some(status) = status {
        active.status = Set(status);
    }
    if let Some(payment_status) = payment_status {
        active.payment_status = Set(payment_status);
    }
    if let Some(payment_method) = params.payment_method {
        active.payment_method = Set(payment_method);
    }
    if let Some(pickup_time) = params.pickup_time {
        active.pickup_time = Set(Some(pickup_time));
    }
    if let Some(note) = params.customer_note {
        active.customer_note = Set(Some(note));
    }
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    if let Some(status) = status {
        sync_steps(&state.orm, order.id, status).await?;
    }

    load_order(&state.orm, order).await
}

async fn find_order(orm: &OrmConn, order_id: i32) -> AppResult<orders::Model> {
    Orders::find_by_id(order_id)
        .one(orm)
        .await?
        .ok_or(AppError::NotFound("Order"))
}

/// Re-derive the owning canteen and require the caller to be its vendor.
async fn authorize_vendor(
    orm: &OrmConn,
    order: &orders::Model,
    identity: &Identity,
) -> AppResult<canteens::Model> {
    let canteen = Canteens::find_by_id(order.canteen_id)
        .one(orm)
        .await?
        .ok_or(AppError::NotFound("Canteen"))?;
    if !identity.can_manage(&canteen) {
        return Err(AppError::Forbidden(
            "only the canteen vendor can manage this order".into(),
        ));
    }
    Ok(canteen)
}

/// Seed the fixed fulfilment pipeline; "Order Placed" starts completed and
/// current.
async fn insert_steps<C: ConnectionTrait>(
    conn: &C,
    order_id: i32,
) -> AppResult<Vec<order_steps::Model>> {
    let mut steps = Vec::with_capacity(ORDER_STEP_LABELS.len());
    for (position, label) in ORDER_STEP_LABELS.iter().enumerate() {
        let step = order_steps::ActiveModel {
            id: NotSet,
            order_id: Set(order_id),
            position: Set(position as i32),
            label: Set((*label).to_string()),
            is_completed: Set(position == 0),
            is_current: Set(position == 0),
        }
        .insert(conn)
        .await?;
        steps.push(step);
    }
    Ok(steps)
}

/// Bring the step rows in line with the order status: steps up to the cursor
/// are completed, exactly the cursor step is current, and a cancelled order
/// has no current step.
async fn sync_steps(orm: &OrmConn, order_id: i32, status: OrderStatus) -> AppResult<()> {
    let cursor = step_cursor(status);
    let steps = OrderSteps::find()
        .filter(order_steps::Column::OrderId.eq(order_id))
        .order_by_asc(order_steps::Column::Position)
        .all(orm)
        .await?;

    for step in steps {
        let position = step.position as usize;
        let (is_completed, is_current) = match cursor {
            Some(cursor) => (position <= cursor, position == cursor),
            None => (step.is_completed, false),
        };
        if step.is_completed == is_completed && step.is_current == is_current {
            continue;
        }
        let mut active: order_steps::ActiveModel = step.into();
        active.is_completed = Set(is_completed);
        active.is_current = Set(is_current);
        active.update(orm).await?;
    }
    Ok(())
}

async fn load_order(orm: &OrmConn, order: orders::Model) -> AppResult<Order> {
    let items = OrderItems::find()
        .filter(order_items::Column::OrderId.eq(order.id))
        .order_by_asc(order_items::Column::Id)
        .all(orm)
        .await?;
    let steps = OrderSteps::find()
        .filter(order_steps::Column::OrderId.eq(order.id))
        .order_by_asc(order_steps::Column::Position)
        .all(orm)
        .await?;
    Ok(Order::from_entity(order, items, steps))
}

async fn load_orders(orm: &OrmConn, orders: Vec<orders::Model>) -> AppResult<Vec<Order>> {
    let mut result = Vec::with_capacity(orders.len());
    for order in orders {
        result.push(load_order(orm, order).await?);
    }
    Ok(result)
}

fn build_order_reference() -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = Uuid::new_v4().to_string();
    let short = &suffix[..8];
    format!("ORD-{date}-{short}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_reference_shape() {
        let reference = build_order_reference();
        assert!(reference.starts_with("ORD-"));
        let parts: Vec<&str> = reference.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2].len(), 8);
    }
}
