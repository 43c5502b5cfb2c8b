//! Domain layer - Core business entities and logic
//!
//! Plain types and pure business rules of the POS: no database or HTTP
//! concerns live here. Enumerations are persisted as upper-snake strings
//! and converted with `as_str` / `FromStr`.

/// Declares a string-backed enumeration with `as_str`, `Display` and `FromStr`.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            serde::Serialize,
            serde::Deserialize,
            utoipa::ToSchema,
        )]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $value)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stored representation
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $value ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::errors::AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $value => Ok($name::$variant), )+
                    other => Err($crate::errors::AppError::validation(format!(
                        "Invalid {}: {}",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

pub mod account;
pub mod blog_post;
pub mod brand;
pub mod catalog;
pub mod common;
pub mod member;
pub mod menu;
pub mod order;
pub mod password;
pub mod pricing;
pub mod promotion;
pub mod session;
pub mod store;
pub mod transaction;
pub mod wallet;

pub use account::{Account, AccountResponse, Actor, CreateAccount, Role, UpdateAccount};
pub use blog_post::{BlogPost, CreateBlogPost, UpdateBlogPost};
pub use brand::{Brand, CreateBrand, UpdateBrand};
pub use catalog::{
    AssignProducts, Category, CategoryType, Collection, CollectionDetail, CreateCategory,
    CreateCollection, CreateProduct, CreateVariant, Product, ProductFilter, ProductType,
    UpdateCategory, UpdateCollection, UpdateProduct, UpdateVariant, Variant, VariantDetail,
};
pub use common::{BusinessClock, EntityStatus};
pub use member::{
    Gender, SignUpUser, TopUp, UpdateUser, User, UserFilter, UserLogin, UserResponse,
};
pub use menu::{
    ApplyMenuStores, CreateMenu, DayOfWeek, Menu, MenuCatalog, MenuDetail, MenuProduct,
    MenuProductInput, UpdateMenu, UpsertMenuProducts,
};
pub use order::{
    CreateOrder, NewOrder, Order, OrderCustomerInput, OrderDetail, OrderExtraInput,
    OrderFilter, OrderHistory, OrderLineInput, OrderStatus, OrderType, OrderUser,
    OrderWithDetails, PaymentType, ReportBucket, ReportRange, StoreReport, UpdateOrder,
};
pub use password::Password;
pub use pricing::{LineItem, OrderTotals, PricedLine, PricedOrder, PromotionApplication};
pub use promotion::{
    CreatePromotion, Promotion, PromotionOrderMapping, PromotionType, UpdatePromotion,
};
pub use session::{CreateSessions, Session, SessionWindow, UpdateSession};
pub use store::{CreateStore, Store, UpdateStore};
pub use transaction::{Currency, Transaction, TransactionFilter, TransactionType};
