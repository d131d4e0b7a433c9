use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, PaginatorTrait, Set, Statement};
use sweet_shop_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::{
        auth::{LoginRequest, RegisterRequest},
        sweets::{CreateSweetRequest, PurchaseRequest, RestockRequest, UpdateSweetRequest},
    },
    entity::{Purchases, Sweets, Users, users::ActiveModel as UserActive},
    error::AppError,
    inventory::InventoryError,
    middleware::auth::AuthUser,
    routes::params::{PriceRange, PurchaseQuery, SortOrder, StockQuery, SweetQuery, SweetSortBy},
    services::{admin_service, auth_service, purchase_service, sweet_service},
    state::AppState,
};
use uuid::Uuid;

// Integration flow: admin lists a sweet -> user buys -> oversell is refused ->
// admin restocks -> history survives deletion of the sweet.
#[tokio::test]
async fn purchase_restock_and_history_flow() -> anyhow::Result<()> {
    // The flow truncates every table, so it only runs against a dedicated database.
    let database_url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL to run the inventory flow test.");
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let admin = AuthUser {
        user_id: create_user(&state, "admin", "admin@example.com").await?,
        role: "admin".into(),
    };
    let buyer = AuthUser {
        user_id: create_user(&state, "user", "buyer@example.com").await?,
        role: "user".into(),
    };

    let sweet = sweet_service::create_sweet(
        &state,
        &admin,
        CreateSweetRequest {
            name: "Chocolate Cake".into(),
            category: "Cake".into(),
            price: 2500,
            quantity: 10,
            description: Some("Rich and moist chocolate cake".into()),
            image_url: None,
        },
    )
    .await?
    .data
    .unwrap();

    // Buy three
    let receipt = purchase_service::purchase_sweet(
        &state,
        &buyer,
        sweet.id,
        PurchaseRequest { quantity: 3 },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(receipt.sweet.quantity, 7);
    assert_eq!(receipt.purchase.quantity, 3);
    assert_eq!(receipt.purchase.total_price, 7500);
    assert_eq!(receipt.purchase.sweet_id, Some(sweet.id));

    // Oversell is refused and nothing changes
    let err = purchase_service::purchase_sweet(
        &state,
        &buyer,
        sweet.id,
        PurchaseRequest { quantity: 8 },
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        AppError::Inventory(InventoryError::InsufficientStock {
            requested: 8,
            available: 7
        })
    ));
    let stored = Sweets::find_by_id(sweet.id).one(&state.orm).await?.unwrap();
    assert_eq!(stored.quantity, 7);
    assert_eq!(Purchases::find().count(&state.orm).await?, 1);

    // Unknown sweet
    let err = purchase_service::purchase_sweet(
        &state,
        &buyer,
        Uuid::new_v4(),
        PurchaseRequest { quantity: 1 },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    // Only admins restock
    let err = purchase_service::restock_sweet(
        &state,
        &buyer,
        sweet.id,
        RestockRequest { amount: 5 },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let restocked = purchase_service::restock_sweet(
        &state,
        &admin,
        sweet.id,
        RestockRequest { amount: 5 },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(restocked.quantity, 12);

    let stats = admin_service::inventory_stats(&state, &admin, StockQuery::default())
        .await?
        .data
        .unwrap();
    assert_eq!(stats.total_sweets, 1);
    assert_eq!(stats.total_value, 2500 * 12);
    assert_eq!(stats.out_of_stock, 0);

    // Buyers cannot edit someone else's sweet
    let err = sweet_service::delete_sweet(&state, &buyer, sweet.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    // History keeps the purchase after the sweet is deleted
    let history = purchase_service::list_my_purchases(&state, &buyer, PurchaseQuery::default())
        .await?
        .data
        .unwrap();
    assert_eq!(history.items.len(), 1);
    assert_eq!(history.total_spent, 7500);
    assert_eq!(
        history.items[0].sweet.as_ref().map(|s| s.name.as_str()),
        Some("Chocolate Cake")
    );

    sweet_service::delete_sweet(&state, &admin, sweet.id).await?;
    let history = purchase_service::list_my_purchases(&state, &buyer, PurchaseQuery::default())
        .await?
        .data
        .unwrap();
    assert_eq!(history.items.len(), 1);
    assert!(history.items[0].sweet.is_none());
    assert_eq!(history.items[0].purchase.sweet_id, None);

    concurrent_buyers_never_oversell(&state, &admin, &buyer).await?;
    ledger_survives_account_removal(&state, &admin).await?;
    register_login_and_owner_edits(&state, &buyer).await?;
    catalog_filters_and_sorting(&state, &admin).await?;

    Ok(())
}

async fn ledger_survives_account_removal(state: &AppState, admin: &AuthUser) -> anyhow::Result<()> {
    let leaver = AuthUser {
        user_id: create_user(state, "user", "leaver@example.com").await?,
        role: "user".into(),
    };
    let sweet = create(state, admin, "Peanut Brittle", "Candy", 400, 5, None).await?;
    let receipt = purchase_service::purchase_sweet(
        state,
        &leaver,
        sweet.id,
        PurchaseRequest { quantity: 2 },
    )
    .await?
    .data
    .unwrap();

    let before = Purchases::find().count(&state.orm).await?;
    Users::delete_by_id(leaver.user_id).exec(&state.orm).await?;
    assert_eq!(Purchases::find().count(&state.orm).await?, before);

    let kept = Purchases::find_by_id(receipt.purchase.id)
        .one(&state.orm)
        .await?
        .unwrap();
    assert_eq!(kept.user_id, None);
    assert_eq!(kept.total_price, 800);
    Ok(())
}

async fn register_login_and_owner_edits(state: &AppState, other: &AuthUser) -> anyhow::Result<()> {
    let registered = auth_service::register_user(
        state,
        RegisterRequest {
            email: " Jane@Example.com ".into(),
            password: "sugar123".into(),
            full_name: Some("Jane".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert!(!registered.token.is_empty());
    assert_eq!(registered.user.email, "jane@example.com");
    assert_eq!(registered.user.role, "user");

    let err = auth_service::register_user(
        state,
        RegisterRequest {
            email: "jane@example.com".into(),
            password: "another1".into(),
            full_name: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg == "User already exists"));

    for (email, password) in [("jane@example.com", "wrong-pass"), ("nobody@example.com", "sugar123")] {
        let err = auth_service::login_user(
            state,
            LoginRequest {
                email: email.into(),
                password: password.into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref msg) if msg == "Invalid credentials"));
    }

    let logged_in = auth_service::login_user(
        state,
        LoginRequest {
            email: "JANE@example.com".into(),
            password: "sugar123".into(),
        },
    )
    .await?
    .data
    .unwrap();
    let jane = AuthUser {
        user_id: logged_in.user.id,
        role: logged_in.user.role.clone(),
    };
    let profile = auth_service::current_user(state, &jane).await?.data.unwrap();
    assert_eq!(profile.id, registered.user.id);

    // Regular users may edit the sweets they created, and only those
    let sweet = create(state, &jane, "Fudge Brownie", "Brownie", 600, 4, None).await?;
    let updated = sweet_service::update_sweet(
        state,
        &jane,
        sweet.id,
        UpdateSweetRequest {
            price: Some(650),
            ..UpdateSweetRequest::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(updated.price, 650);
    assert_eq!(updated.quantity, 4);

    let err = sweet_service::update_sweet(
        state,
        other,
        sweet.id,
        UpdateSweetRequest {
            name: Some("Stolen Brownie".into()),
            ..UpdateSweetRequest::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
    Ok(())
}

async fn catalog_filters_and_sorting(state: &AppState, admin: &AuthUser) -> anyhow::Result<()> {
    Sweets::delete_many().exec(&state.orm).await?;
    create(state, admin, "Vanilla Cupcake", "Cupcake", 500, 0, Some("Light and fluffy")).await?;
    create(state, admin, "Chocolate Cake", "Cake", 2500, 10, Some("Rich chocolate")).await?;
    create(state, admin, "100% Fudge", "Candy", 999, 3, None).await?;
    create(state, admin, "Lemon Tart", "Tart", 800, 5, Some("tart_of_the_day")).await?;
    create(state, admin, "Gummy Bears", "Candy", 350, 20, Some("Fruit flavoured")).await?;

    let by_name = |query: SweetQuery| SweetQuery {
        sort_by: Some(SweetSortBy::Name),
        sort_order: Some(SortOrder::Asc),
        ..query
    };
    let by_price = |query: SweetQuery| SweetQuery {
        sort_by: Some(SweetSortBy::Price),
        sort_order: Some(SortOrder::Asc),
        ..query
    };

    // Search is case-insensitive and spans name, category and description
    let found = names(state, by_name(SweetQuery { q: Some("CAKE".into()), ..SweetQuery::default() })).await?;
    assert_eq!(found, ["Chocolate Cake", "Vanilla Cupcake"]);

    // LIKE wildcards in the search term match literally
    let found = names(state, SweetQuery { q: Some("%".into()), ..SweetQuery::default() }).await?;
    assert_eq!(found, ["100% Fudge"]);
    let found = names(state, SweetQuery { q: Some("_".into()), ..SweetQuery::default() }).await?;
    assert_eq!(found, ["Lemon Tart"]);

    let bucket = |range| by_price(SweetQuery { price_range: Some(range), ..SweetQuery::default() });
    assert_eq!(names(state, bucket(PriceRange::Under5)).await?, ["Gummy Bears"]);
    assert_eq!(
        names(state, bucket(PriceRange::From5To10)).await?,
        ["Vanilla Cupcake", "Lemon Tart", "100% Fudge"]
    );
    assert_eq!(names(state, bucket(PriceRange::Over20)).await?, ["Chocolate Cake"]);
    assert_eq!(names(state, bucket(PriceRange::All)).await?.len(), 5);

    // Explicit bounds are inclusive on both ends
    let found = names(
        state,
        by_price(SweetQuery {
            min_price: Some(800),
            max_price: Some(2500),
            ..SweetQuery::default()
        }),
    )
    .await?;
    assert_eq!(found, ["Lemon Tart", "100% Fudge", "Chocolate Cake"]);

    let found = names(state, by_name(SweetQuery { in_stock: Some(true), ..SweetQuery::default() })).await?;
    assert_eq!(found, ["100% Fudge", "Chocolate Cake", "Gummy Bears", "Lemon Tart"]);

    let found = names(state, by_name(SweetQuery { category: Some("Candy".into()), ..SweetQuery::default() })).await?;
    assert_eq!(found, ["100% Fudge", "Gummy Bears"]);
    let found = names(state, SweetQuery { category: Some("all".into()), ..SweetQuery::default() }).await?;
    assert_eq!(found.len(), 5);

    let found = names(
        state,
        SweetQuery {
            sort_by: Some(SweetSortBy::Quantity),
            sort_order: Some(SortOrder::Desc),
            ..SweetQuery::default()
        },
    )
    .await?;
    assert_eq!(
        found,
        ["Gummy Bears", "Chocolate Cake", "Lemon Tart", "100% Fudge", "Vanilla Cupcake"]
    );

    let categories = sweet_service::list_categories(state).await?.data.unwrap();
    assert_eq!(categories.items, ["Cake", "Candy", "Cupcake", "Tart"]);
    Ok(())
}

async fn names(state: &AppState, query: SweetQuery) -> anyhow::Result<Vec<String>> {
    let list = sweet_service::list_sweets(state, query).await?.data.unwrap();
    Ok(list.items.into_iter().map(|sweet| sweet.name).collect())
}

async fn create(
    state: &AppState,
    user: &AuthUser,
    name: &str,
    category: &str,
    price: i64,
    quantity: i32,
    description: Option<&str>,
) -> anyhow::Result<sweet_shop_api::models::Sweet> {
    let sweet = sweet_service::create_sweet(
        state,
        user,
        CreateSweetRequest {
            name: name.into(),
            category: category.into(),
            price,
            quantity,
            description: description.map(str::to_string),
            image_url: None,
        },
    )
    .await?
    .data
    .unwrap();
    Ok(sweet)
}

async fn concurrent_buyers_never_oversell(
    state: &AppState,
    admin: &AuthUser,
    buyer: &AuthUser,
) -> anyhow::Result<()> {
    let sweet = sweet_service::create_sweet(
        state,
        admin,
        CreateSweetRequest {
            name: "Lemon Tart".into(),
            category: "Tart".into(),
            price: 800,
            quantity: 5,
            description: None,
            image_url: None,
        },
    )
    .await?
    .data
    .unwrap();

    let sweet_id = sweet.id;
    let mut handles = Vec::new();
    for _ in 0..10 {
        let state = state.clone();
        let buyer = buyer.clone();
        handles.push(tokio::spawn(async move {
            purchase_service::purchase_sweet(&state, &buyer, sweet_id, PurchaseRequest { quantity: 2 })
                .await
                .is_ok()
        }));
    }

    let mut succeeded = 0;
    for handle in handles {
        if handle.await? {
            succeeded += 1;
        }
    }

    assert_eq!(succeeded, 2);
    let stored = Sweets::find_by_id(sweet_id).one(&state.orm).await?.unwrap();
    assert_eq!(stored.quantity, 1);
    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let state = AppState::new(
        pool,
        AppConfig {
            database_url: database_url.to_string(),
            host: "127.0.0.1".into(),
            port: 0,
            jwt_secret: "flow-test-secret".into(),
            jwt_ttl_minutes: 60,
            run_migrations: true,
        },
    );
    run_migrations(&state.orm).await?;

    // Clean tables between runs
    let backend = state.orm.get_database_backend();
    state
        .orm
        .execute(Statement::from_string(
            backend,
            "TRUNCATE TABLE purchases, sweets, audit_logs, users RESTART IDENTITY CASCADE",
        ))
        .await?;

    Ok(state)
}

async fn create_user(state: &AppState, role: &str, email: &str) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        full_name: Set(None),
        role: Set(role.into()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}
