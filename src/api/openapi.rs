//! OpenAPI documentation configuration.
//!
//! Served through Swagger UI at `/swagger-ui`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    account_handler, auth_handler, blog_post_handler, brand_handler, menu_handler,
    order_handler, product_handler, promotion_handler, store_handler, transaction_handler,
    user_handler, variant_handler,
};
use crate::domain::menu::{MenuCategory, MenuCollection, MenuProductDetail, MenuVariant};
use crate::domain::{
    AccountResponse, ApplyMenuStores, AssignProducts, BlogPost, Brand, Category, CategoryType,
    Collection, CollectionDetail, CreateAccount, CreateBlogPost, CreateBrand, CreateCategory,
    CreateCollection, CreateMenu, CreateOrder, CreateProduct, CreatePromotion, CreateSessions,
    CreateStore, CreateVariant, Currency, DayOfWeek, EntityStatus, Gender, Menu, MenuDetail,
    MenuProduct, MenuProductInput, Order, OrderCustomerInput, OrderDetail, OrderExtraInput,
    OrderHistory, OrderLineInput, OrderStatus, OrderType, OrderUser, OrderWithDetails,
    PaymentType, Product, ProductType, Promotion, PromotionOrderMapping, PromotionType,
    ReportBucket, Role, Session, SessionWindow, SignUpUser, Store, StoreReport, TopUp,
    Transaction, TransactionType, UpdateAccount, UpdateBlogPost, UpdateBrand, UpdateCategory,
    UpdateCollection, UpdateMenu, UpdateOrder, UpdateProduct, UpdatePromotion, UpdateSession,
    UpdateStore, UpdateUser, UpdateVariant, UpsertMenuProducts, UserLogin, UserResponse,
    Variant, VariantDetail,
};
use crate::services::{LoginRequest, TokenResponse};

/// OpenAPI documentation for the POS backend
#[derive(OpenApi)]
#[openapi(
    info(
        title = "POS Backend",
        version = "0.1.0",
        description = "Multi-tenant point-of-sale backend: brands, stores, menus, orders and loyalty",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::login,
        auth_handler::member_login,
        auth_handler::sign_up,
        account_handler::create_account,
        account_handler::get_account,
        account_handler::update_account,
        account_handler::list_brand_accounts,
        account_handler::list_store_accounts,
        brand_handler::create_brand,
        brand_handler::list_brands,
        brand_handler::get_brand,
        brand_handler::update_brand,
        store_handler::create_store,
        store_handler::get_store,
        store_handler::update_store,
        store_handler::list_brand_stores,
        store_handler::create_sessions,
        store_handler::list_sessions,
        store_handler::get_current_session,
        store_handler::update_session,
        product_handler::create_product,
        product_handler::list_products,
        product_handler::get_product,
        product_handler::update_product,
        product_handler::create_category,
        product_handler::list_categories,
        product_handler::get_category,
        product_handler::update_category,
        product_handler::create_collection,
        product_handler::list_collections,
        product_handler::get_collection,
        product_handler::update_collection,
        product_handler::set_collection_products,
        variant_handler::create_variant,
        variant_handler::list_variants,
        variant_handler::get_variant,
        variant_handler::update_variant,
        variant_handler::assign_variant_products,
        menu_handler::create_menu,
        menu_handler::list_menus,
        menu_handler::get_menu,
        menu_handler::update_menu,
        menu_handler::list_menu_products,
        menu_handler::upsert_menu_products,
        menu_handler::remove_menu_product,
        menu_handler::apply_menu_to_stores,
        menu_handler::get_store_menu,
        promotion_handler::create_promotion,
        promotion_handler::list_promotions,
        promotion_handler::get_promotion,
        promotion_handler::update_promotion,
        order_handler::create_order,
        order_handler::list_store_orders,
        order_handler::get_order,
        order_handler::update_order,
        order_handler::store_report,
        user_handler::get_current_user,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::top_up,
        user_handler::list_brand_users,
        transaction_handler::get_transaction,
        transaction_handler::list_brand_transactions,
        transaction_handler::list_user_transactions,
        blog_post_handler::create_post,
        blog_post_handler::list_posts,
        blog_post_handler::get_post,
        blog_post_handler::update_post,
        blog_post_handler::delete_post,
        blog_post_handler::list_public_posts,
    ),
    components(
        schemas(
            // Enumerations
            Role, EntityStatus, Gender, CategoryType, ProductType, DayOfWeek,
            PromotionType, OrderStatus, OrderType, PaymentType, TransactionType, Currency,
            // Auth
            LoginRequest, UserLogin, TokenResponse,
            // Tenancy
            Brand, CreateBrand, UpdateBrand,
            Store, CreateStore, UpdateStore,
            Session, SessionWindow, CreateSessions, UpdateSession,
            AccountResponse, CreateAccount, UpdateAccount,
            // Catalog
            Product, CreateProduct, UpdateProduct,
            Category, CreateCategory, UpdateCategory,
            Collection, CollectionDetail, CreateCollection, UpdateCollection,
            Variant, VariantDetail, CreateVariant, UpdateVariant, AssignProducts,
            // Menus
            Menu, CreateMenu, UpdateMenu, MenuProduct, MenuProductInput, UpsertMenuProducts,
            ApplyMenuStores, MenuDetail, MenuProductDetail, MenuCategory, MenuCollection,
            MenuVariant,
            // Promotions
            Promotion, CreatePromotion, UpdatePromotion,
            // Orders
            Order, OrderDetail, OrderUser, OrderHistory, PromotionOrderMapping,
            OrderWithDetails, CreateOrder, OrderLineInput, OrderExtraInput,
            OrderCustomerInput, UpdateOrder, StoreReport, ReportBucket,
            // Members and ledger
            UserResponse, SignUpUser, UpdateUser, TopUp, Transaction,
            // Blog
            BlogPost, CreateBlogPost, UpdateBlogPost,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Staff and member logins, member sign-up"),
        (name = "Accounts", description = "Staff accounts"),
        (name = "Brands", description = "Tenants"),
        (name = "Stores", description = "Points of sale"),
        (name = "Sessions", description = "Cashier shifts"),
        (name = "Products", description = "Catalog products"),
        (name = "Categories", description = "Catalog categories"),
        (name = "Collections", description = "Curated product groups"),
        (name = "Variants", description = "Product options"),
        (name = "Menus", description = "Time-windowed product listings"),
        (name = "Promotions", description = "Order discounts"),
        (name = "Orders", description = "Checkout, payment and reports"),
        (name = "Users", description = "Brand members and wallets"),
        (name = "Transactions", description = "Wallet and point ledger"),
        (name = "Blog posts", description = "Brand news")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_order_and_menu_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/stores/{id}/orders"));
        assert!(doc.paths.paths.contains_key("/stores/{id}/menu"));
        assert!(doc.paths.paths.contains_key("/public/brands/{brand_code}/blog-posts"));
    }
}
