use canteen_graphql_api::{config::AppConfig, db::create_pool};

// Development seed data: a vendor with a canteen and a small menu, plus one
// student account. Idempotent so it can run on every boot of a dev stack.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let vendor_id = ensure_user(&pool, "North Mess", "vendor@campus.edu", "vendor").await?;
    let student_id = ensure_user(&pool, "Asha", "asha@campus.edu", "student").await?;
    let canteen_id = ensure_canteen(&pool, vendor_id, "vendor@campus.edu").await?;
    seed_menu(&pool, canteen_id).await?;

    println!("Seed completed. Vendor ID: {vendor_id}, Student ID: {student_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    name: &str,
    email: &str,
    role: &str,
) -> anyhow::Result<i32> {
    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO users (name, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(email)
    .bind("seeded")
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(id)
}

async fn ensure_canteen(
    pool: &sqlx::PgPool,
    vendor_id: i32,
    email: &str,
) -> anyhow::Result<i32> {
    if let Some((id,)) = sqlx::query_as::<_, (i32,)>("SELECT id FROM canteens WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?
    {
        return Ok(id);
    }

    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO canteens (name, location, email, user_id, supports_vegetarian, supports_thali)
        VALUES ($1, $2, $3, $4, TRUE, TRUE)
        RETURNING id
        "#,
    )
    .bind("North Mess")
    .bind("Block C, near the library")
    .bind(email)
    .bind(vendor_id)
    .fetch_one(pool)
    .await?;

    println!("Created canteen North Mess");
    Ok(id)
}

async fn seed_menu(pool: &sqlx::PgPool, canteen_id: i32) -> anyhow::Result<()> {
    // Prices in the smallest currency unit.
    let items: Vec<(&str, &str, i64, &str)> = vec![
        ("Masala Dosa", "Crisp dosa with potato filling", 6000, "south-indian"),
        ("Chai", "Milk tea", 1000, "beverages"),
        ("Veg Thali", "Rice, dal, two sabzis and roti", 9000, "thali"),
        ("Samosa", "Fried pastry with spiced potatoes", 1500, "snacks"),
    ];

    for (name, desc, price, category) in items {
        let exists: Option<(i32,)> = sqlx::query_as(
            "SELECT id FROM menu_items WHERE canteen_id = $1 AND name = $2",
        )
        .bind(canteen_id)
        .bind(name)
        .fetch_optional(pool)
        .await?;
        if exists.is_some() {
            continue;
        }

        sqlx::query(
            r#"
            INSERT INTO menu_items (name, description, price, category, canteen_id, is_vegetarian)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            "#,
        )
        .bind(name)
        .bind(desc)
        .bind(price)
        .bind(category)
        .bind(canteen_id)
        .execute(pool)
        .await?;
    }

    println!("Seeded menu for canteen {canteen_id}");
    Ok(())
}
