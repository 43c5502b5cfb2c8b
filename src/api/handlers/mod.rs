//! HTTP request handlers.

pub mod account_handler;
pub mod auth_handler;
pub mod blog_post_handler;
pub mod brand_handler;
pub mod menu_handler;
pub mod order_handler;
pub mod product_handler;
pub mod promotion_handler;
pub mod store_handler;
pub mod transaction_handler;
pub mod user_handler;
pub mod variant_handler;

pub use account_handler::account_routes;
pub use auth_handler::auth_routes;
pub use blog_post_handler::{blog_post_routes, public_routes};
pub use brand_handler::brand_routes;
pub use menu_handler::menu_routes;
pub use order_handler::order_routes;
pub use product_handler::{category_routes, collection_routes, product_routes};
pub use promotion_handler::promotion_routes;
pub use store_handler::{session_routes, store_routes};
pub use transaction_handler::transaction_routes;
pub use user_handler::user_routes;
pub use variant_handler::variant_routes;
