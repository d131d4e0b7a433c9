use sweet_shop_api::{
    db::{create_pool, orm_from_pool, run_migrations},
    models::{ROLE_ADMIN, ROLE_USER},
    services::auth_service::hash_password,
};
use uuid::Uuid;

const ADMIN_EMAIL: &str = "admin@example.com";
const USER_EMAIL: &str = "user@example.com";

/// `seed` loads demo accounts and the demo catalog; `seed clean` removes the demo accounts.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")?;

    let pool = create_pool(&database_url).await?;
    run_migrations(&orm_from_pool(pool.clone())).await?;

    if std::env::args().nth(1).as_deref() == Some("clean") {
        clean(&pool).await?;
        return Ok(());
    }

    let admin_id = ensure_user_with_role(&pool, ADMIN_EMAIL, "admin123", "Admin User", ROLE_ADMIN).await?;
    let user_id = ensure_user_with_role(&pool, USER_EMAIL, "user123", "Demo User", ROLE_USER).await?;
    seed_sweets(&pool, admin_id).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user_with_role(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    full_name: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, full_name, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(full_name)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_sweets(pool: &sqlx::PgPool, created_by: Uuid) -> anyhow::Result<()> {
    let (existing,): (i64,) = sqlx::query_as("SELECT count(*) FROM sweets")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        println!("Sweets data already exists");
        return Ok(());
    }

    let sweets = [
        ("Chocolate Cake", "Cake", 2599, 10, "Rich and moist chocolate cake"),
        ("Vanilla Cupcake", "Cupcake", 599, 20, "Delicious vanilla cupcake with frosting"),
        ("Strawberry Ice Cream", "Ice Cream", 799, 15, "Creamy strawberry ice cream"),
        ("Blueberry Muffin", "Muffin", 499, 25, "Fresh blueberry muffin"),
        ("Caramel Brownie", "Brownie", 699, 12, "Chewy caramel brownie"),
        ("Lemon Tart", "Tart", 800, 8, "Tangy lemon tart with a buttery crust"),
        ("Apple Pie", "Pie", 1500, 5, "Traditional apple pie with cinnamon"),
        ("Chocolate Truffles", "Chocolate", 600, 22, "Handmade chocolate truffles"),
    ];

    for (name, category, price, quantity, description) in sweets {
        sqlx::query(
            r#"
            INSERT INTO sweets (id, name, category, price, quantity, description, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(category)
        .bind(price as i64)
        .bind(quantity as i32)
        .bind(description)
        .bind(created_by)
        .execute(pool)
        .await?;
    }

    println!("Seeded sweets");
    Ok(())
}

async fn clean(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let result = sqlx::query("DELETE FROM users WHERE email = ANY($1)")
        .bind(vec![ADMIN_EMAIL.to_string(), USER_EMAIL.to_string()])
        .execute(pool)
        .await?;
    println!("Removed {} demo account(s)", result.rows_affected());
    Ok(())
}
