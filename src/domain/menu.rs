//! Menus: time-windowed, priority-ranked product listings.
//!
//! A store sells from exactly one menu at a time. Candidates are the active
//! menus applied to the store plus the brand's base menu (priority 0). The
//! available candidate with the highest priority wins; the base menu is the
//! fallback when nothing else is available.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, NaiveDateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::brand::normalize_code;
use super::catalog::{
    validate_prices, Category, CategoryType, Collection, Product, ProductType, Variant,
};
use super::common::EntityStatus;
use crate::config::BASE_MENU_PRIORITY;
use crate::errors::{AppError, AppResult};

string_enum! {
    pub enum DayOfWeek {
        Monday => "MONDAY",
        Tuesday => "TUESDAY",
        Wednesday => "WEDNESDAY",
        Thursday => "THURSDAY",
        Friday => "FRIDAY",
        Saturday => "SATURDAY",
        Sunday => "SUNDAY",
    }
}

/// Date filter selecting every day of the week
pub const ALL_DAYS_MASK: i32 = 0b111_1111;

impl DayOfWeek {
    /// Bit of this day in a date filter (Monday = bit 0)
    pub fn bit(&self) -> i32 {
        1 << Weekday::from(*self).num_days_from_monday()
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl From<DayOfWeek> for Weekday {
    fn from(day: DayOfWeek) -> Self {
        match day {
            DayOfWeek::Monday => Weekday::Mon,
            DayOfWeek::Tuesday => Weekday::Tue,
            DayOfWeek::Wednesday => Weekday::Wed,
            DayOfWeek::Thursday => Weekday::Thu,
            DayOfWeek::Friday => Weekday::Fri,
            DayOfWeek::Saturday => Weekday::Sat,
            DayOfWeek::Sunday => Weekday::Sun,
        }
    }
}

/// Encode days as a date filter bitmask.
pub fn date_filter_mask(days: &[DayOfWeek]) -> i32 {
    days.iter().fold(0, |mask, day| mask | day.bit())
}

/// Decode a date filter bitmask, Monday first.
pub fn days_from_mask(mask: i32) -> Vec<DayOfWeek> {
    DayOfWeek::ALL
        .iter()
        .copied()
        .filter(|day| mask & day.bit() != 0)
        .collect()
}

// =============================================================================
// Menu
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Menu {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub code: String,
    /// 0 is the brand's base menu; higher wins
    pub priority: i32,
    /// Weekday bitmask, Monday = bit 0
    pub date_filter: i32,
    #[schema(value_type = String, format = "time", example = "07:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, format = "time", example = "11:00:00")]
    pub end_time: NaiveTime,
    pub status: EntityStatus,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Menu {
    pub fn new(brand_id: Uuid, input: CreateMenu, created_by: Option<Uuid>) -> AppResult<Self> {
        if input.priority < BASE_MENU_PRIORITY {
            return Err(AppError::validation("Menu priority cannot be negative"));
        }
        let date_filter = match input.date_filter {
            Some(days) if days.is_empty() => {
                return Err(AppError::validation("A menu must run on at least one day"))
            }
            Some(days) => date_filter_mask(&days),
            None => ALL_DAYS_MASK,
        };
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            brand_id,
            code: normalize_code(&input.code),
            priority: input.priority,
            date_filter,
            start_time: input.start_time.unwrap_or(NaiveTime::MIN),
            end_time: input.end_time.unwrap_or(NaiveTime::MIN),
            status: EntityStatus::Active,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_base(&self) -> bool {
        self.priority == BASE_MENU_PRIORITY
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn days(&self) -> Vec<DayOfWeek> {
        days_from_mask(self.date_filter)
    }

    pub fn runs_on(&self, day: Weekday) -> bool {
        self.date_filter & DayOfWeek::from(day).bit() != 0
    }

    /// `start == end` covers the whole day; `start > end` wraps past midnight.
    pub fn covers_time(&self, time: NaiveTime) -> bool {
        if self.start_time == self.end_time {
            true
        } else if self.start_time < self.end_time {
            self.start_time <= time && time < self.end_time
        } else {
            time >= self.start_time || time < self.end_time
        }
    }

    /// Whether the menu may be sold at the given store-local moment.
    pub fn is_available_at(&self, local: NaiveDateTime) -> bool {
        self.is_active() && self.runs_on(local.weekday()) && self.covers_time(local.time())
    }

    /// Apply an update, keeping the base-menu invariants.
    pub fn apply(&mut self, update: UpdateMenu) -> AppResult<()> {
        if let Some(priority) = update.priority {
            if priority < BASE_MENU_PRIORITY {
                return Err(AppError::validation("Menu priority cannot be negative"));
            }
            if self.is_base() && priority != BASE_MENU_PRIORITY {
                return Err(AppError::rule("The base menu must keep priority 0"));
            }
            if !self.is_base() && priority == BASE_MENU_PRIORITY {
                return Err(AppError::rule("Priority 0 is reserved for the base menu"));
            }
            self.priority = priority;
        }
        if let Some(status) = update.status {
            if self.is_base() && !status.is_active() {
                return Err(AppError::rule("The base menu cannot be deactivated"));
            }
            self.status = status;
        }
        if let Some(days) = update.date_filter {
            if days.is_empty() {
                return Err(AppError::validation("A menu must run on at least one day"));
            }
            self.date_filter = date_filter_mask(&days);
        }
        if let Some(code) = update.code {
            self.code = normalize_code(&code);
        }
        if let Some(start_time) = update.start_time {
            self.start_time = start_time;
        }
        if let Some(end_time) = update.end_time {
            self.end_time = end_time;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateMenu {
    #[validate(length(min = 1, max = 20, message = "Code must be 1-20 characters"))]
    #[schema(example = "BREAKFAST")]
    pub code: String,
    /// 0 creates the brand's base menu
    #[schema(example = 10)]
    pub priority: i32,
    /// Days the menu runs on; every day when omitted
    pub date_filter: Option<Vec<DayOfWeek>>,
    #[schema(value_type = Option<String>, format = "time", example = "07:00:00")]
    pub start_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>, format = "time", example = "11:00:00")]
    pub end_time: Option<NaiveTime>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateMenu {
    #[validate(length(min = 1, max = 20, message = "Code must be 1-20 characters"))]
    pub code: Option<String>,
    pub priority: Option<i32>,
    pub date_filter: Option<Vec<DayOfWeek>>,
    #[schema(value_type = Option<String>, format = "time")]
    pub start_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>, format = "time")]
    pub end_time: Option<NaiveTime>,
    pub status: Option<EntityStatus>,
}

/// Pick the menu a store sells from at `local` time.
///
/// Highest priority among available candidates wins, ties go to the most
/// recently created menu. Falls back to the base menu.
pub fn select_menu(candidates: &[Menu], local: NaiveDateTime) -> Option<&Menu> {
    candidates
        .iter()
        .filter(|menu| menu.is_available_at(local))
        .max_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then(a.created_at.cmp(&b.created_at))
        })
        .or_else(|| candidates.iter().find(|menu| menu.is_base()))
}

// =============================================================================
// Menu products
// =============================================================================

/// Price of a product on a given menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuProduct {
    pub id: Uuid,
    pub menu_id: Uuid,
    pub product_id: Uuid,
    pub selling_price: f64,
    pub discount_price: f64,
    pub historical_price: f64,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MenuProduct {
    /// Price a product on a menu; unspecified prices default to the product's own.
    pub fn from_input(menu: &Menu, input: &MenuProductInput, product: &Product) -> AppResult<Self> {
        if product.brand_id != menu.brand_id {
            return Err(AppError::validation(format!(
                "Product {} belongs to another brand",
                product.id
            )));
        }
        let selling_price = input.selling_price.unwrap_or(product.selling_price);
        let discount_price = input.discount_price.unwrap_or(product.discount_price);
        let historical_price = input.historical_price.unwrap_or(product.historical_price);
        validate_prices(selling_price, discount_price, historical_price)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            menu_id: menu.id,
            product_id: product.id,
            selling_price,
            discount_price,
            historical_price,
            status: EntityStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MenuProductInput {
    pub product_id: Uuid,
    pub selling_price: Option<f64>,
    pub discount_price: Option<f64>,
    pub historical_price: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpsertMenuProducts {
    #[validate(length(min = 1, message = "At least one product is required"))]
    pub products: Vec<MenuProductInput>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ApplyMenuStores {
    pub store_ids: Vec<Uuid>,
}

// =============================================================================
// Menu detail of a store
// =============================================================================

/// Rows needed to build a menu detail
#[derive(Debug, Clone, Default)]
pub struct MenuCatalog {
    pub menu_products: Vec<MenuProduct>,
    /// Listed products and their parents
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    /// Collections with their member product ids
    pub collections: Vec<(Collection, Vec<Uuid>)>,
    /// Variants with the product ids they apply to
    pub variants: Vec<(Variant, Vec<Uuid>)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuProductDetail {
    pub menu_product_id: Uuid,
    pub product_id: Uuid,
    pub code: String,
    pub name: String,
    pub product_type: ProductType,
    pub category_id: Uuid,
    pub parent_product_id: Option<Uuid>,
    pub size: Option<String>,
    pub pic_url: Option<String>,
    pub display_order: i32,
    pub selling_price: f64,
    pub discount_price: f64,
    pub historical_price: f64,
    pub variant_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuCategory {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub category_type: CategoryType,
    pub display_order: i32,
    pub pic_url: Option<String>,
    pub product_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuCollection {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub pic_url: Option<String>,
    pub product_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuVariant {
    pub id: Uuid,
    pub name: String,
    pub options: Vec<String>,
    pub display_order: i32,
}

/// What a store sells right now
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuDetail {
    pub menu_id: Uuid,
    pub brand_id: Uuid,
    pub store_id: Uuid,
    pub code: String,
    pub priority: i32,
    pub date_filter: Vec<DayOfWeek>,
    #[schema(value_type = String, format = "time")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, format = "time")]
    pub end_time: NaiveTime,
    pub products: Vec<MenuProductDetail>,
    pub categories: Vec<MenuCategory>,
    pub collections: Vec<MenuCollection>,
    pub variants: Vec<MenuVariant>,
}

impl MenuDetail {
    /// Join a menu with its catalog rows, keeping only what is sellable.
    ///
    /// A listed product is visible when its menu entry and the product are
    /// active and, for CHILD products, the parent product is active too.
    /// Categories, collections and variants are visible when active and
    /// attached to at least one visible product.
    pub fn build(menu: &Menu, store_id: Uuid, catalog: MenuCatalog) -> Self {
        let products: HashMap<Uuid, &Product> =
            catalog.products.iter().map(|p| (p.id, p)).collect();

        let parent_active = |product: &Product| match product.parent_product_id {
            Some(parent_id) => products.get(&parent_id).is_some_and(|p| p.is_active()),
            None => true,
        };

        let variants: Vec<&(Variant, Vec<Uuid>)> = catalog
            .variants
            .iter()
            .filter(|(variant, _)| variant.status.is_active())
            .collect();

        let mut visible: Vec<MenuProductDetail> = catalog
            .menu_products
            .iter()
            .filter(|entry| entry.menu_id == menu.id && entry.status.is_active())
            .filter_map(|entry| {
                let product = products.get(&entry.product_id)?;
                let sellable = product.is_active()
                    && product.brand_id == menu.brand_id
                    && parent_active(product);
                sellable.then(|| MenuProductDetail {
                    menu_product_id: entry.id,
                    product_id: product.id,
                    code: product.code.clone(),
                    name: product.name.clone(),
                    product_type: product.product_type,
                    category_id: product.category_id,
                    parent_product_id: product.parent_product_id,
                    size: product.size.clone(),
                    pic_url: product.pic_url.clone(),
                    display_order: product.display_order,
                    selling_price: entry.selling_price,
                    discount_price: entry.discount_price,
                    historical_price: entry.historical_price,
                    variant_ids: variants
                        .iter()
                        .filter(|(_, product_ids)| product_ids.contains(&product.id))
                        .map(|(variant, _)| variant.id)
                        .collect(),
                })
            })
            .collect();
        visible.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.name.cmp(&b.name))
        });

        let visible_ids: HashSet<Uuid> = visible.iter().map(|p| p.product_id).collect();
        let ids_in_order = |keep: &dyn Fn(&MenuProductDetail) -> bool| -> Vec<Uuid> {
            visible
                .iter()
                .filter(|p| keep(p))
                .map(|p| p.product_id)
                .collect()
        };

        let mut categories: Vec<MenuCategory> = catalog
            .categories
            .iter()
            .filter(|category| category.status.is_active())
            .filter_map(|category| {
                let product_ids = ids_in_order(&|p| p.category_id == category.id);
                (!product_ids.is_empty()).then(|| MenuCategory {
                    id: category.id,
                    code: category.code.clone(),
                    name: category.name.clone(),
                    category_type: category.category_type,
                    display_order: category.display_order,
                    pic_url: category.pic_url.clone(),
                    product_ids,
                })
            })
            .collect();
        categories.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.name.cmp(&b.name))
        });

        let collections: Vec<MenuCollection> = catalog
            .collections
            .iter()
            .filter(|(collection, _)| collection.status.is_active())
            .filter_map(|(collection, members)| {
                let product_ids = ids_in_order(&|p| members.contains(&p.product_id));
                (!product_ids.is_empty()).then(|| MenuCollection {
                    id: collection.id,
                    code: collection.code.clone(),
                    name: collection.name.clone(),
                    pic_url: collection.pic_url.clone(),
                    product_ids,
                })
            })
            .collect();

        let mut menu_variants: Vec<MenuVariant> = variants
            .iter()
            .filter(|(_, product_ids)| product_ids.iter().any(|id| visible_ids.contains(id)))
            .map(|(variant, _)| MenuVariant {
                id: variant.id,
                name: variant.name.clone(),
                options: variant.options().into_iter().map(str::to_string).collect(),
                display_order: variant.display_order,
            })
            .collect();
        menu_variants.sort_by_key(|variant| variant.display_order);

        Self {
            menu_id: menu.id,
            brand_id: menu.brand_id,
            store_id,
            code: menu.code.clone(),
            priority: menu.priority,
            date_filter: menu.days(),
            start_time: menu.start_time,
            end_time: menu.end_time,
            products: visible,
            categories,
            collections,
            variants: menu_variants,
        }
    }

    /// The visible listing of a product, if any.
    pub fn find_product(&self, product_id: Uuid) -> Option<&MenuProductDetail> {
        self.products.iter().find(|p| p.product_id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{
        CreateCategory, CreateCollection, CreateProduct, CreateVariant,
    };
    use chrono::{Duration, NaiveDate};

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    /// 2024-06-03 is a Monday
    fn monday_at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_time(time(h, m))
    }

    fn menu(brand_id: Uuid, priority: i32, days: Option<Vec<DayOfWeek>>, window: (NaiveTime, NaiveTime)) -> Menu {
        Menu::new(
            brand_id,
            CreateMenu {
                code: format!("M{}", priority),
                priority,
                date_filter: days,
                start_time: Some(window.0),
                end_time: Some(window.1),
            },
            None,
        )
        .unwrap()
    }

    #[test]
    fn date_filter_mask_round_trips() {
        let days = vec![DayOfWeek::Monday, DayOfWeek::Sunday];
        let mask = date_filter_mask(&days);
        assert_eq!(mask, 0b100_0001);
        assert_eq!(days_from_mask(mask), days);
        assert_eq!(days_from_mask(ALL_DAYS_MASK).len(), 7);
    }

    #[test]
    fn time_windows() {
        let brand = Uuid::new_v4();
        let breakfast = menu(brand, 1, None, (time(7, 0), time(11, 0)));
        assert!(breakfast.covers_time(time(7, 0)));
        assert!(!breakfast.covers_time(time(11, 0)));

        let late = menu(brand, 1, None, (time(22, 0), time(2, 0)));
        assert!(late.covers_time(time(23, 30)));
        assert!(late.covers_time(time(1, 0)));
        assert!(!late.covers_time(time(12, 0)));

        let all_day = menu(brand, 1, None, (time(0, 0), time(0, 0)));
        assert!(all_day.covers_time(time(15, 45)));
    }

    #[test]
    fn highest_available_priority_wins() {
        let brand = Uuid::new_v4();
        let base = menu(brand, 0, None, (time(0, 0), time(0, 0)));
        let breakfast = menu(brand, 5, None, (time(7, 0), time(11, 0)));
        let monday_special = menu(
            brand,
            9,
            Some(vec![DayOfWeek::Monday]),
            (time(9, 0), time(10, 0)),
        );
        let candidates = vec![base.clone(), breakfast.clone(), monday_special.clone()];

        assert_eq!(select_menu(&candidates, monday_at(9, 30)).unwrap().id, monday_special.id);
        assert_eq!(select_menu(&candidates, monday_at(8, 0)).unwrap().id, breakfast.id);
        assert_eq!(select_menu(&candidates, monday_at(15, 0)).unwrap().id, base.id);

        let tuesday = monday_at(9, 30) + Duration::days(1);
        assert_eq!(select_menu(&candidates, tuesday).unwrap().id, breakfast.id);
    }

    #[test]
    fn inactive_menus_are_skipped_and_ties_go_to_newest() {
        let brand = Uuid::new_v4();
        let base = menu(brand, 0, None, (time(0, 0), time(0, 0)));
        let mut older = menu(brand, 3, None, (time(0, 0), time(0, 0)));
        older.created_at = older.created_at - Duration::days(1);
        let newer = menu(brand, 3, None, (time(0, 0), time(0, 0)));
        let mut disabled = menu(brand, 7, None, (time(0, 0), time(0, 0)));
        disabled.status = EntityStatus::Deactivate;

        let candidates = vec![base, older, newer.clone(), disabled];
        assert_eq!(select_menu(&candidates, monday_at(12, 0)).unwrap().id, newer.id);
    }

    #[test]
    fn no_candidate_and_no_base_yields_none() {
        let brand = Uuid::new_v4();
        let evening = menu(brand, 2, None, (time(18, 0), time(22, 0)));
        assert!(select_menu(&[evening], monday_at(9, 0)).is_none());
    }

    #[test]
    fn base_menu_invariants() {
        let brand = Uuid::new_v4();
        let mut base = menu(brand, 0, None, (time(0, 0), time(0, 0)));
        assert!(base
            .apply(UpdateMenu {
                priority: Some(3),
                ..Default::default()
            })
            .is_err());
        assert!(base
            .apply(UpdateMenu {
                status: Some(EntityStatus::Deactivate),
                ..Default::default()
            })
            .is_err());

        let mut other = menu(brand, 4, None, (time(0, 0), time(0, 0)));
        assert!(other
            .apply(UpdateMenu {
                priority: Some(0),
                ..Default::default()
            })
            .is_err());
        assert!(other
            .apply(UpdateMenu {
                date_filter: Some(vec![]),
                ..Default::default()
            })
            .is_err());
    }

    fn category(brand: Uuid, name: &str, order: i32) -> Category {
        Category::new(
            brand,
            CreateCategory {
                code: name.into(),
                name: name.into(),
                category_type: CategoryType::Normal,
                display_order: Some(order),
                description: None,
                pic_url: None,
            },
        )
    }

    fn product(brand: Uuid, category: &Category, name: &str, kind: ProductType, parent: Option<Uuid>) -> Product {
        Product::new(
            brand,
            CreateProduct {
                code: name.into(),
                name: name.into(),
                category_id: category.id,
                product_type: kind,
                parent_product_id: parent,
                description: None,
                pic_url: None,
                size: None,
                selling_price: 30_000.0,
                historical_price: None,
                discount_price: None,
                display_order: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn detail_keeps_only_visible_rows() {
        let brand = Uuid::new_v4();
        let menu = menu(brand, 0, None, (time(0, 0), time(0, 0)));

        let coffee = category(brand, "Coffee", 2);
        let tea = category(brand, "Tea", 1);
        let empty = category(brand, "Empty", 0);

        let latte = product(brand, &coffee, "Latte", ProductType::Single, None);
        let mut parent = product(brand, &tea, "Milk tea", ProductType::Parent, None);
        let child = product(brand, &tea, "Milk tea L", ProductType::Child, Some(parent.id));
        let mut retired = product(brand, &coffee, "Mocha", ProductType::Single, None);
        retired.status = EntityStatus::Deactivate;
        parent.status = EntityStatus::Deactivate;

        let listed = |p: &Product| {
            MenuProduct::from_input(
                &menu,
                &MenuProductInput {
                    product_id: p.id,
                    selling_price: Some(35_000.0),
                    discount_price: None,
                    historical_price: None,
                },
                p,
            )
            .unwrap()
        };

        let collection = Collection::new(
            brand,
            CreateCollection {
                code: "BEST".into(),
                name: "Best sellers".into(),
                description: None,
                pic_url: None,
            },
        );
        let sugar = Variant::new(
            brand,
            CreateVariant {
                name: "Sugar".into(),
                options: vec!["Less".into(), "Normal".into()],
                display_order: None,
            },
        )
        .unwrap();

        let catalog = MenuCatalog {
            menu_products: vec![listed(&latte), listed(&child), listed(&retired)],
            products: vec![latte.clone(), parent.clone(), child.clone(), retired.clone()],
            categories: vec![coffee.clone(), tea.clone(), empty],
            collections: vec![(collection.clone(), vec![latte.id, retired.id])],
            variants: vec![(sugar.clone(), vec![latte.id])],
        };

        let detail = MenuDetail::build(&menu, Uuid::new_v4(), catalog);

        // Retired product and the child of an inactive parent are hidden
        assert_eq!(detail.products.len(), 1);
        assert_eq!(detail.products[0].product_id, latte.id);
        assert_eq!(detail.products[0].selling_price, 35_000.0);
        assert_eq!(detail.products[0].variant_ids, vec![sugar.id]);

        // Only categories with a visible product remain
        assert_eq!(detail.categories.len(), 1);
        assert_eq!(detail.categories[0].id, coffee.id);

        assert_eq!(detail.collections.len(), 1);
        assert_eq!(detail.collections[0].product_ids, vec![latte.id]);
        assert_eq!(detail.variants.len(), 1);
        assert_eq!(detail.variants[0].options, vec!["Less", "Normal"]);

        assert!(detail.find_product(latte.id).is_some());
        assert!(detail.find_product(child.id).is_none());
    }

    #[test]
    fn categories_sorted_by_display_order() {
        let brand = Uuid::new_v4();
        let menu = menu(brand, 0, None, (time(0, 0), time(0, 0)));
        let coffee = category(brand, "Coffee", 2);
        let tea = category(brand, "Tea", 1);
        let latte = product(brand, &coffee, "Latte", ProductType::Single, None);
        let oolong = product(brand, &tea, "Oolong", ProductType::Single, None);
        let entry = |p: &Product| {
            MenuProduct::from_input(
                &menu,
                &MenuProductInput {
                    product_id: p.id,
                    selling_price: None,
                    discount_price: None,
                    historical_price: None,
                },
                p,
            )
            .unwrap()
        };

        let detail = MenuDetail::build(
            &menu,
            Uuid::new_v4(),
            MenuCatalog {
                menu_products: vec![entry(&latte), entry(&oolong)],
                products: vec![latte, oolong],
                categories: vec![coffee, tea.clone()],
                ..Default::default()
            },
        );
        assert_eq!(detail.categories[0].id, tea.id);
        assert_eq!(detail.products[0].selling_price, 30_000.0);
    }

    #[test]
    fn menu_product_rejects_foreign_brand() {
        let menu = menu(Uuid::new_v4(), 1, None, (time(0, 0), time(0, 0)));
        let other_brand = Uuid::new_v4();
        let coffee = category(other_brand, "Coffee", 0);
        let latte = product(other_brand, &coffee, "Latte", ProductType::Single, None);
        let input = MenuProductInput {
            product_id: latte.id,
            selling_price: None,
            discount_price: None,
            historical_price: None,
        };
        assert!(MenuProduct::from_input(&menu, &input, &latte).is_err());
    }
}
