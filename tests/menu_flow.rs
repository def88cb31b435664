mod common;

use canteen_graphql_api::{
    error::AppError,
    services::menu_service,
};
use sea_orm::EntityTrait;

#[tokio::test]
async fn non_vendor_menu_edits_are_rejected_without_change() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let vendor_id = common::create_user(&state, "vendor", "vendor@campus.edu").await?;
    let stranger_id = common::create_user(&state, "vendor", "other@campus.edu").await?;
    let canteen_id = common::create_canteen(&state, vendor_id, "vendor@campus.edu").await?;
    let item_id = common::create_menu_item(&state, canteen_id, "Masala Dosa", 6000).await?;

    // Neither the email nor the owning user id matches.
    let stranger = common::identity(stranger_id, "other@campus.edu", "vendor");
    let denied = menu_service::update_menu_item_price(&state, &stranger, item_id, 9999).await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    let item = canteen_graphql_api::entity::MenuItems::find_by_id(item_id)
        .one(&state.orm)
        .await?
        .expect("item");
    assert_eq!(item.price, 6000);

    let vendor = common::identity(vendor_id, "vendor@campus.edu", "vendor");
    menu_service::update_menu_item_price(&state, &vendor, item_id, 6500).await?;

    let item = canteen_graphql_api::entity::MenuItems::find_by_id(item_id)
        .one(&state.orm)
        .await?
        .expect("item");
    assert_eq!(item.price, 6500);

    Ok(())
}

#[tokio::test]
async fn matching_email_is_enough_to_manage_the_menu() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let owner_id = common::create_user(&state, "vendor", "vendor@campus.edu").await?;
    let staff_id = common::create_user(&state, "vendor", "staff@campus.edu").await?;
    let canteen_id = common::create_canteen(&state, owner_id, "vendor@campus.edu").await?;
    let item_id = common::create_menu_item(&state, canteen_id, "Chai", 1000).await?;

    // Different user id, but the token email matches the canteen's contact
    // email, which is the other accepted capability.
    let staff = common::identity(staff_id, "vendor@campus.edu", "vendor");
    let featured = menu_service::toggle_featured_status(&state, &staff, item_id).await?;
    assert!(featured);

    Ok(())
}

#[tokio::test]
async fn invalid_size_variations_json_is_a_validation_failure() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let vendor_id = common::create_user(&state, "vendor", "vendor@campus.edu").await?;
    let canteen_id = common::create_canteen(&state, vendor_id, "vendor@campus.edu").await?;
    let item_id = common::create_menu_item(&state, canteen_id, "Veg Thali", 9000).await?;
    let vendor = common::identity(vendor_id, "vendor@campus.edu", "vendor");

    let result =
        menu_service::update_size_variations(&state, &vendor, item_id, "not json at all").await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    menu_service::update_size_variations(
        &state,
        &vendor,
        item_id,
        r#"{"regular": 0, "large": 2000}"#,
    )
    .await?;

    let item = canteen_graphql_api::entity::MenuItems::find_by_id(item_id)
        .one(&state.orm)
        .await?
        .expect("item");
    assert!(item.has_size_variations);
    assert!(item.size_options.is_some());

    Ok(())
}
