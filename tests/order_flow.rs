mod common;

use canteen_graphql_api::{
    entity::Orders,
    error::AppError,
    services::order_service::{self, CreateOrderParams, OrderItemParams},
};
use sea_orm::EntityTrait;

fn order_params(
    user_id: i32,
    canteen_id: i32,
    items: Vec<OrderItemParams>,
) -> CreateOrderParams {
    CreateOrderParams {
        user_id,
        canteen_id,
        items,
        payment_method: "cash".into(),
        phone: "9999999999".into(),
        customer_note: None,
        is_pre_order: false,
        pickup_time: None,
    }
}

fn line(item_id: i32, quantity: i32) -> OrderItemParams {
    OrderItemParams {
        item_id,
        quantity,
        customizations: None,
        note: None,
    }
}

#[tokio::test]
async fn order_total_is_sum_of_line_totals() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let vendor_id = common::create_user(&state, "vendor", "vendor@campus.edu").await?;
    let user_id = common::create_user(&state, "student", "student@campus.edu").await?;
    let canteen_id = common::create_canteen(&state, vendor_id, "vendor@campus.edu").await?;
    let dosa = common::create_menu_item(&state, canteen_id, "Masala Dosa", 6000).await?;
    let tea = common::create_menu_item(&state, canteen_id, "Chai", 1000).await?;

    let order = order_service::create_order(
        &state,
        order_params(user_id, canteen_id, vec![line(dosa, 2), line(tea, 3)]),
    )
    .await?;

    assert_eq!(order.total_amount, 2 * 6000 + 3 * 1000);
    assert_eq!(order.status, "pending");
    assert_eq!(order.items.len(), 2);
    assert!(order.reference.starts_with("ORD-"));

    // Step pipeline seeded with the first step completed and current.
    assert_eq!(order.steps.len(), 4);
    assert!(order.steps[0].is_completed && order.steps[0].is_current);
    assert!(order.steps[1..].iter().all(|s| !s.is_completed && !s.is_current));

    Ok(())
}

#[tokio::test]
async fn missing_menu_item_fails_whole_order() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let vendor_id = common::create_user(&state, "vendor", "vendor@campus.edu").await?;
    let user_id = common::create_user(&state, "student", "student@campus.edu").await?;
    let canteen_id = common::create_canteen(&state, vendor_id, "vendor@campus.edu").await?;
    let dosa = common::create_menu_item(&state, canteen_id, "Masala Dosa", 6000).await?;

    let result = order_service::create_order(
        &state,
        order_params(user_id, canteen_id, vec![line(dosa, 1), line(99999, 1)]),
    )
    .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    // Nothing was persisted.
    let orders = Orders::find().all(&state.orm).await?;
    assert!(orders.is_empty());

    Ok(())
}

#[tokio::test]
async fn status_transitions_stamp_timestamps_and_steps() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let vendor_id = common::create_user(&state, "vendor", "vendor@campus.edu").await?;
    let user_id = common::create_user(&state, "student", "student@campus.edu").await?;
    let canteen_id = common::create_canteen(&state, vendor_id, "vendor@campus.edu").await?;
    let dosa = common::create_menu_item(&state, canteen_id, "Masala Dosa", 6000).await?;

    let order = order_service::create_order(
        &state,
        order_params(user_id, canteen_id, vec![line(dosa, 1)]),
    )
    .await?;

    let vendor = common::identity(vendor_id, "vendor@campus.edu", "vendor");
    let student = common::identity(user_id, "student@campus.edu", "student");

    // Only the canteen vendor may drive the pipeline.
    let denied =
        order_service::update_order_status(&state, &student, order.id, "preparing").await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    let updated =
        order_service::update_order_status(&state, &vendor, order.id, "preparing").await?;
    assert_eq!(updated.status, "preparing");
    assert!(updated.preparing_time.is_some());

    // Exactly one current step, at the preparing position.
    let current: Vec<_> = updated.steps.iter().filter(|s| s.is_current).collect();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].position, 1);
    assert!(updated.steps[0].is_completed && updated.steps[1].is_completed);

    let delivered =
        order_service::update_order_status(&state, &vendor, order.id, "delivered").await?;
    assert!(delivered.delivery_time.is_some());
    assert!(delivered.steps.iter().all(|s| s.is_completed));
    assert_eq!(delivered.steps.iter().filter(|s| s.is_current).count(), 1);
    assert_eq!(
        delivered.steps.iter().find(|s| s.is_current).map(|s| s.position),
        Some(3)
    );

    Ok(())
}

#[tokio::test]
async fn cancellation_records_reason_and_clears_current_step() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let vendor_id = common::create_user(&state, "vendor", "vendor@campus.edu").await?;
    let user_id = common::create_user(&state, "student", "student@campus.edu").await?;
    let canteen_id = common::create_canteen(&state, vendor_id, "vendor@campus.edu").await?;
    let dosa = common::create_menu_item(&state, canteen_id, "Masala Dosa", 6000).await?;

    let order = order_service::create_order(
        &state,
        order_params(user_id, canteen_id, vec![line(dosa, 1)]),
    )
    .await?;

    let vendor = common::identity(vendor_id, "vendor@campus.edu", "vendor");
    let cancelled =
        order_service::cancel_order(&state, &vendor, order.id, "out of ingredients").await?;

    assert_eq!(cancelled.status, "cancelled");
    assert!(cancelled.cancelled_time.is_some());
    assert_eq!(
        cancelled.cancellation_reason.as_deref(),
        Some("out of ingredients")
    );
    assert!(cancelled.steps.iter().all(|s| !s.is_current));

    Ok(())
}

#[tokio::test]
async fn scheduled_order_recomputes_tax_breakdown() -> anyhow::Result<()> {
    use canteen_graphql_api::services::order_service::{
        ScheduledOrderItemParams, ScheduledOrderParams,
    };

    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let vendor_id = common::create_user(&state, "vendor", "vendor@campus.edu").await?;
    let user_id = common::create_user(&state, "student", "student@campus.edu").await?;
    let canteen_id = common::create_canteen(&state, vendor_id, "vendor@campus.edu").await?;
    let dosa = common::create_menu_item(&state, canteen_id, "Masala Dosa", 6000).await?;

    let order = order_service::place_scheduled_order(
        &state,
        ScheduledOrderParams {
            user_id,
            canteen_id,
            items: vec![ScheduledOrderItemParams {
                menu_item_id: dosa,
                quantity: 2,
                unit_price: 6500,
                size: Some("large".into()),
                extras: None,
                preparation_time: None,
                special_instructions: None,
                notes: None,
            }],
            tax_rate: 0.05,
            payment_method: Some("upi".into()),
            pickup_time: Some("12:30".into()),
            notes_from_customer: None,
        },
    )
    .await?;

    assert!(order.is_pre_order);
    assert_eq!(order.subtotal, Some(13000));
    assert_eq!(order.tax_amount, Some(650));
    assert_eq!(order.total_amount, 13650);

    Ok(())
}
