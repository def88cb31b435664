#![allow(dead_code)]

use canteen_graphql_api::{
    auth::Identity,
    config::AppConfig,
    db::{create_orm_conn, create_pool},
    entity::{canteens, menu_items, users},
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};

/// Connect, migrate and truncate. Returns `None` when no database is
/// configured so the test can skip instead of failing.
pub async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
                );
                return Ok(None);
            }
        };

    let pool = create_pool(&database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let orm = create_orm_conn(&database_url).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE order_steps, order_items, orders, cart_items, carts, complaints, \
         menu_items, canteens, audit_logs, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    let config = AppConfig {
        database_url,
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "test-secret".into(),
    };

    Ok(Some(AppState { pool, orm, config }))
}

pub async fn create_user(state: &AppState, role: &str, email: &str) -> anyhow::Result<i32> {
    let user = users::ActiveModel {
        id: NotSet,
        name: Set(email.split('@').next().unwrap_or("user").to_string()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        role: Set(role.into()),
        favorite_canteens: Set(None),
        recent_orders: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

pub async fn create_canteen(
    state: &AppState,
    vendor_user_id: i32,
    email: &str,
) -> anyhow::Result<i32> {
    let canteen = canteens::ActiveModel {
        id: NotSet,
        name: Set("North Mess".into()),
        location: Set(Some("Block C".into())),
        email: Set(email.to_string()),
        contact_number: Set(None),
        description: Set(None),
        user_id: Set(vendor_user_id),
        breakfast_start: Set(None),
        breakfast_end: Set(None),
        lunch_start: Set(None),
        lunch_end: Set(None),
        dinner_start: Set(None),
        dinner_end: Set(None),
        rating_avg: Set(0.0),
        rating_count: Set(0),
        supports_vegetarian: Set(true),
        supports_non_veg: Set(false),
        supports_thali: Set(false),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(canteen.id)
}

pub async fn create_menu_item(
    state: &AppState,
    canteen_id: i32,
    name: &str,
    price: i64,
) -> anyhow::Result<i32> {
    let item = menu_items::ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        description: Set(None),
        price: Set(price),
        image_url: Set(None),
        category: Set(Some("snacks".into())),
        canteen_id: Set(canteen_id),
        is_available: Set(true),
        is_featured: Set(false),
        is_vegetarian: Set(true),
        is_vegan: Set(false),
        is_gluten_free: Set(false),
        has_size_variations: Set(false),
        size_options: Set(None),
        min_quantity: Set(1),
        max_quantity: Set(10),
        preparation_time: Set(Some(10)),
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

    Ok(item.id)
}

pub fn identity(user_id: i32, email: &str, role: &str) -> Identity {
    Identity {
        user_id,
        email: email.to_string(),
        role: role.to_string(),
    }
}
