//! Catalog of a brand: categories, products, collections and variants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::brand::normalize_code;
use super::common::EntityStatus;
use crate::errors::{AppError, AppResult};

string_enum! {
    pub enum CategoryType {
        Normal => "NORMAL",
        /// Toppings and add-ons; holds EXTRA products only
        Extra => "EXTRA",
    }
}

string_enum! {
    pub enum ProductType {
        Single => "SINGLE",
        /// Groups its CHILD products (e.g. sizes); not sold by itself
        Parent => "PARENT",
        Child => "CHILD",
        Extra => "EXTRA",
    }
}

// =============================================================================
// Category
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub code: String,
    pub name: String,
    pub category_type: CategoryType,
    pub display_order: i32,
    pub description: Option<String>,
    pub pic_url: Option<String>,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(brand_id: Uuid, input: CreateCategory) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            brand_id,
            code: normalize_code(&input.code),
            name: input.name.trim().to_string(),
            category_type: input.category_type,
            display_order: input.display_order.unwrap_or_default(),
            description: input.description,
            pic_url: input.pic_url,
            status: EntityStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: UpdateCategory) {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(display_order) = update.display_order {
            self.display_order = display_order;
        }
        if update.description.is_some() {
            self.description = update.description;
        }
        if update.pic_url.is_some() {
            self.pic_url = update.pic_url;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 20, message = "Code must be 1-20 characters"))]
    pub code: String,
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    pub category_type: CategoryType,
    pub display_order: Option<i32>,
    pub description: Option<String>,
    pub pic_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    pub display_order: Option<i32>,
    pub description: Option<String>,
    pub pic_url: Option<String>,
    pub status: Option<EntityStatus>,
}

// =============================================================================
// Product
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub category_id: Uuid,
    /// Set for CHILD products only
    pub parent_product_id: Option<Uuid>,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub pic_url: Option<String>,
    pub product_type: ProductType,
    pub size: Option<String>,
    pub selling_price: f64,
    pub historical_price: f64,
    pub discount_price: f64,
    pub display_order: i32,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(brand_id: Uuid, input: CreateProduct) -> AppResult<Self> {
        validate_prices(
            input.selling_price,
            input.discount_price.unwrap_or_default(),
            input.historical_price.unwrap_or(input.selling_price),
        )?;
        match (input.product_type, input.parent_product_id) {
            (ProductType::Child, None) => {
                return Err(AppError::validation("A CHILD product requires a parent product"))
            }
            (ProductType::Child, Some(_)) | (_, None) => {}
            (_, Some(_)) => {
                return Err(AppError::validation(
                    "Only CHILD products can reference a parent product",
                ))
            }
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            brand_id,
            category_id: input.category_id,
            parent_product_id: input.parent_product_id,
            code: normalize_code(&input.code),
            name: input.name.trim().to_string(),
            description: input.description,
            pic_url: input.pic_url,
            product_type: input.product_type,
            size: input.size,
            selling_price: input.selling_price,
            historical_price: input.historical_price.unwrap_or(input.selling_price),
            discount_price: input.discount_price.unwrap_or_default(),
            display_order: input.display_order.unwrap_or_default(),
            status: EntityStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Products that can be put on an order line by themselves.
    pub fn is_sellable(&self) -> bool {
        !matches!(self.product_type, ProductType::Parent)
    }

    /// The product's category must belong to the same brand, and EXTRA
    /// products live exactly in EXTRA categories.
    pub fn check_category(&self, category: &Category) -> AppResult<()> {
        if category.brand_id != self.brand_id {
            return Err(AppError::validation("Category belongs to another brand"));
        }
        let extra_product = self.product_type == ProductType::Extra;
        let extra_category = category.category_type == CategoryType::Extra;
        if extra_product != extra_category {
            return Err(AppError::validation(
                "EXTRA products must be placed in EXTRA categories and only there",
            ));
        }
        Ok(())
    }

    /// A CHILD's parent must be a PARENT product of the same brand.
    pub fn check_parent(&self, parent: &Product) -> AppResult<()> {
        if parent.brand_id != self.brand_id || parent.product_type != ProductType::Parent {
            return Err(AppError::validation(
                "Parent product must be a PARENT product of the same brand",
            ));
        }
        Ok(())
    }

    pub fn apply(&mut self, update: UpdateProduct) -> AppResult<()> {
        let selling = update.selling_price.unwrap_or(self.selling_price);
        let discount = update.discount_price.unwrap_or(self.discount_price);
        let historical = update.historical_price.unwrap_or(self.historical_price);
        validate_prices(selling, discount, historical)?;

        self.selling_price = selling;
        self.discount_price = discount;
        self.historical_price = historical;
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(category_id) = update.category_id {
            self.category_id = category_id;
        }
        if update.description.is_some() {
            self.description = update.description;
        }
        if update.pic_url.is_some() {
            self.pic_url = update.pic_url;
        }
        if update.size.is_some() {
            self.size = update.size;
        }
        if let Some(display_order) = update.display_order {
            self.display_order = display_order;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Prices are non-negative and a discount never exceeds the selling price.
pub fn validate_prices(selling: f64, discount: f64, historical: f64) -> AppResult<()> {
    if !selling.is_finite() || selling < 0.0 {
        return Err(AppError::validation("Selling price must be non-negative"));
    }
    if !historical.is_finite() || historical < 0.0 {
        return Err(AppError::validation("Historical price must be non-negative"));
    }
    if !discount.is_finite() || discount < 0.0 || discount > selling {
        return Err(AppError::validation(
            "Discount price must be between 0 and the selling price",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 20, message = "Code must be 1-20 characters"))]
    #[schema(example = "CF-SUA-DA")]
    pub code: String,
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[schema(example = "Ca phe sua da")]
    pub name: String,
    pub category_id: Uuid,
    pub product_type: ProductType,
    pub parent_product_id: Option<Uuid>,
    pub description: Option<String>,
    pub pic_url: Option<String>,
    pub size: Option<String>,
    #[schema(example = 29000.0)]
    pub selling_price: f64,
    pub historical_price: Option<f64>,
    pub discount_price: Option<f64>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    pub category_id: Option<Uuid>,
    pub description: Option<String>,
    pub pic_url: Option<String>,
    pub size: Option<String>,
    pub selling_price: Option<f64>,
    pub historical_price: Option<f64>,
    pub discount_price: Option<f64>,
    pub display_order: Option<i32>,
    pub status: Option<EntityStatus>,
}

/// Product list filters
#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    /// Case-insensitive name fragment
    pub name: Option<String>,
    pub product_type: Option<ProductType>,
    pub category_id: Option<Uuid>,
}

// =============================================================================
// Collection
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Collection {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub pic_url: Option<String>,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Collection {
    pub fn new(brand_id: Uuid, input: CreateCollection) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            brand_id,
            code: normalize_code(&input.code),
            name: input.name.trim().to_string(),
            description: input.description,
            pic_url: input.pic_url,
            status: EntityStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: UpdateCollection) {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if update.description.is_some() {
            self.description = update.description;
        }
        if update.pic_url.is_some() {
            self.pic_url = update.pic_url;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCollection {
    #[validate(length(min = 1, max = 20, message = "Code must be 1-20 characters"))]
    pub code: String,
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    pub description: Option<String>,
    pub pic_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCollection {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub pic_url: Option<String>,
    pub status: Option<EntityStatus>,
}

/// Collection together with the ids of its products
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CollectionDetail {
    pub collection: Collection,
    pub product_ids: Vec<Uuid>,
}

/// Products attached to a collection or a variant. Replaces the current set.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AssignProducts {
    pub product_ids: Vec<Uuid>,
}

impl AssignProducts {
    /// Requested ids without duplicates, first occurrence wins.
    pub fn unique_ids(&self) -> Vec<Uuid> {
        let mut seen = std::collections::HashSet::new();
        self.product_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

// =============================================================================
// Variant
// =============================================================================

/// Option group offered with products, e.g. sugar or ice level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Variant {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub name: String,
    /// Options joined with `_`, e.g. `No sugar_Less sugar_Normal`
    pub value: String,
    pub display_order: i32,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Separator between the options of a variant
pub const VARIANT_OPTION_SEPARATOR: char = '_';

impl Variant {
    pub fn new(brand_id: Uuid, input: CreateVariant) -> AppResult<Self> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            brand_id,
            name: input.name.trim().to_string(),
            value: join_options(&input.options)?,
            display_order: input.display_order.unwrap_or_default(),
            status: EntityStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn options(&self) -> Vec<&str> {
        self.value
            .split(VARIANT_OPTION_SEPARATOR)
            .filter(|option| !option.is_empty())
            .collect()
    }

    pub fn apply(&mut self, update: UpdateVariant) -> AppResult<()> {
        if let Some(options) = update.options {
            self.value = join_options(&options)?;
        }
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(display_order) = update.display_order {
            self.display_order = display_order;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn join_options(options: &[String]) -> AppResult<String> {
    let trimmed: Vec<&str> = options
        .iter()
        .map(|option| option.trim())
        .filter(|option| !option.is_empty())
        .collect();
    if trimmed.is_empty() {
        return Err(AppError::validation("A variant needs at least one option"));
    }
    if trimmed.iter().any(|option| option.contains(VARIANT_OPTION_SEPARATOR)) {
        return Err(AppError::validation(format!(
            "Variant options cannot contain '{}'",
            VARIANT_OPTION_SEPARATOR
        )));
    }
    Ok(trimmed.join(&VARIANT_OPTION_SEPARATOR.to_string()))
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VariantDetail {
    pub variant: Variant,
    pub product_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateVariant {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[schema(example = "Sugar")]
    pub name: String,
    pub options: Vec<String>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateVariant {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    pub options: Option<Vec<String>>,
    pub display_order: Option<i32>,
    pub status: Option<EntityStatus>,
}
