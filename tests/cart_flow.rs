mod common;

use canteen_graphql_api::{
    domain::SelectedExtras,
    error::AppError,
    services::cart_service::{self, AddToCartParams},
};

fn add_params(menu_item_id: i32, extras: Option<SelectedExtras>) -> AddToCartParams {
    AddToCartParams {
        menu_item_id,
        quantity: 1,
        selected_size: Some("regular".into()),
        selected_extras: extras,
        special_instructions: None,
        location: None,
    }
}

// Adding the same line twice merges into one row; any customization
// difference starts a new row.
#[tokio::test]
async fn identical_lines_merge_and_different_extras_split() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let vendor_id = common::create_user(&state, "vendor", "vendor@campus.edu").await?;
    let user_id = common::create_user(&state, "student", "student@campus.edu").await?;
    let canteen_id = common::create_canteen(&state, vendor_id, "vendor@campus.edu").await?;
    let item_id = common::create_menu_item(&state, canteen_id, "Masala Dosa", 6000).await?;
    let user = common::identity(user_id, "student@campus.edu", "student");

    cart_service::add_to_cart(&state, &user, add_params(item_id, None)).await?;
    cart_service::add_to_cart(&state, &user, add_params(item_id, None)).await?;

    let cart = cart_service::get_cart_by_user_id(&state.orm, user_id)
        .await?
        .expect("cart exists");
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 2);

    let extras = SelectedExtras {
        additions: vec!["extra chutney".into()],
        removals: vec![],
    };
    cart_service::add_to_cart(&state, &user, add_params(item_id, Some(extras))).await?;

    let cart = cart_service::get_cart_by_user_id(&state.orm, user_id)
        .await?
        .expect("cart exists");
    assert_eq!(cart.items.len(), 2);

    Ok(())
}

#[tokio::test]
async fn removing_another_users_item_is_rejected() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let vendor_id = common::create_user(&state, "vendor", "vendor@campus.edu").await?;
    let owner_id = common::create_user(&state, "student", "owner@campus.edu").await?;
    let intruder_id = common::create_user(&state, "student", "intruder@campus.edu").await?;
    let canteen_id = common::create_canteen(&state, vendor_id, "vendor@campus.edu").await?;
    let item_id = common::create_menu_item(&state, canteen_id, "Samosa", 1500).await?;
    let owner = common::identity(owner_id, "owner@campus.edu", "student");

    let line = cart_service::add_to_cart(&state, &owner, add_params(item_id, None)).await?;

    let result = cart_service::remove_from_cart(&state, intruder_id, line.id).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    // The line is untouched.
    let cart = cart_service::get_cart_by_user_id(&state.orm, owner_id)
        .await?
        .expect("cart exists");
    assert_eq!(cart.items.len(), 1);

    cart_service::remove_from_cart(&state, owner_id, line.id).await?;
    let cart = cart_service::get_cart_by_user_id(&state.orm, owner_id)
        .await?
        .expect("cart exists");
    assert!(cart.items.is_empty());

    Ok(())
}

#[tokio::test]
async fn clear_cart_removes_all_lines() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let vendor_id = common::create_user(&state, "vendor", "vendor@campus.edu").await?;
    let user_id = common::create_user(&state, "student", "student@campus.edu").await?;
    let canteen_id = common::create_canteen(&state, vendor_id, "vendor@campus.edu").await?;
    let dosa = common::create_menu_item(&state, canteen_id, "Masala Dosa", 6000).await?;
    let tea = common::create_menu_item(&state, canteen_id, "Chai", 1000).await?;
    let user = common::identity(user_id, "student@campus.edu", "student");

    cart_service::add_to_cart(&state, &user, add_params(dosa, None)).await?;
    cart_service::add_to_cart(&state, &user, add_params(tea, None)).await?;

    cart_service::clear_cart(&state, user_id).await?;

    let cart = cart_service::get_cart_by_user_id(&state.orm, user_id)
        .await?
        .expect("cart row survives clearing");
    assert!(cart.items.is_empty());

    Ok(())
}
