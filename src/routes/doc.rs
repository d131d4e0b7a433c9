use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{AuthResponse, LoginRequest, RegisterRequest},
        purchases::{OrderHistory, PurchaseRecord, SweetSummary},
        sweets::{
            CategoryList, CreateSweetRequest, PurchaseReceipt, PurchaseRequest, RestockRequest,
            SweetList, UpdateSweetRequest,
        },
    },
    inventory::InventoryStats,
    models::{Purchase, Sweet, User},
    response::{ApiResponse, Meta},
    routes::{admin, auth, health, params, purchases, sweets},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::readiness_check,
        auth::register,
        auth::login,
        auth::me,
        sweets::list_sweets,
        sweets::list_categories,
        sweets::get_sweet,
        sweets::create_sweet,
        sweets::update_sweet,
        sweets::delete_sweet,
        sweets::purchase_sweet,
        sweets::restock_sweet,
        purchases::list_purchases,
        admin::list_all_purchases,
        admin::inventory_stats,
        admin::list_low_stock
    ),
    components(
        schemas(
            User,
            Sweet,
            Purchase,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            CreateSweetRequest,
            UpdateSweetRequest,
            PurchaseRequest,
            RestockRequest,
            PurchaseReceipt,
            SweetList,
            CategoryList,
            SweetSummary,
            PurchaseRecord,
            OrderHistory,
            InventoryStats,
            params::SortOrder,
            params::SweetSortBy,
            params::PriceRange,
            Meta,
            ApiResponse<Sweet>,
            ApiResponse<SweetList>,
            ApiResponse<PurchaseReceipt>,
            ApiResponse<OrderHistory>,
            ApiResponse<AuthResponse>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and profile"),
        (name = "Sweets", description = "Catalog, purchase and restock"),
        (name = "Purchases", description = "Order history"),
        (name = "Admin", description = "Admin ledger and inventory views"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
