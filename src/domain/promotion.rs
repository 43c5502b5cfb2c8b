//! Brand promotions applied at checkout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::brand::normalize_code;
use super::common::EntityStatus;
use super::pricing::round_money;
use crate::errors::{AppError, AppResult};

string_enum! {
    pub enum PromotionType {
        Percent => "PERCENT",
        Amount => "AMOUNT",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Promotion {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub promotion_type: PromotionType,
    /// Percentage (0-100] for PERCENT, money for AMOUNT
    pub value: f64,
    /// Cap of a PERCENT discount, 0 = uncapped
    pub max_discount: f64,
    pub min_condition_amount: f64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Promotion {
    pub fn new(brand_id: Uuid, input: CreatePromotion) -> AppResult<Self> {
        let now = Utc::now();
        let promotion = Self {
            id: Uuid::new_v4(),
            brand_id,
            code: normalize_code(&input.code),
            name: input.name,
            description: input.description,
            promotion_type: input.promotion_type,
            value: input.value,
            max_discount: input.max_discount.unwrap_or(0.0),
            min_condition_amount: input.min_condition_amount.unwrap_or(0.0),
            start_date: input.start_date,
            end_date: input.end_date,
            status: EntityStatus::Active,
            created_at: now,
            updated_at: now,
        };
        promotion.validate_terms()?;
        Ok(promotion)
    }

    pub fn apply(&mut self, update: UpdatePromotion) -> AppResult<()> {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(value) = update.value {
            self.value = value;
        }
        if let Some(max_discount) = update.max_discount {
            self.max_discount = max_discount;
        }
        if let Some(min_condition_amount) = update.min_condition_amount {
            self.min_condition_amount = min_condition_amount;
        }
        if let Some(start_date) = update.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = update.end_date {
            self.end_date = end_date;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.validate_terms()?;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn validate_terms(&self) -> AppResult<()> {
        match self.promotion_type {
            PromotionType::Percent if self.value <= 0.0 || self.value > 100.0 => {
                return Err(AppError::validation(
                    "Percent promotions need a value in (0, 100]",
                ))
            }
            PromotionType::Amount if self.value <= 0.0 => {
                return Err(AppError::validation("Promotion amount must be positive"))
            }
            _ => {}
        }
        if self.max_discount < 0.0 || self.min_condition_amount < 0.0 {
            return Err(AppError::validation(
                "Promotion limits cannot be negative",
            ));
        }
        if self.start_date >= self.end_date {
            return Err(AppError::validation(
                "Promotion start date must be before its end date",
            ));
        }
        Ok(())
    }

    pub fn is_running_at(&self, now: DateTime<Utc>) -> bool {
        self.status.is_active() && self.start_date <= now && now <= self.end_date
    }

    /// Whether the promotion can be used on an order of `brand_id` worth `subtotal`.
    pub fn check_applicable(
        &self,
        brand_id: Uuid,
        subtotal: f64,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        if self.brand_id != brand_id {
            return Err(AppError::rule(format!(
                "Promotion {} does not belong to this brand",
                self.code
            )));
        }
        if !self.is_running_at(now) {
            return Err(AppError::rule(format!(
                "Promotion {} is not running",
                self.code
            )));
        }
        if subtotal < self.min_condition_amount {
            return Err(AppError::rule(format!(
                "Promotion {} requires an order of at least {}",
                self.code, self.min_condition_amount
            )));
        }
        Ok(())
    }

    /// Discount granted on `base`, never more than `base`.
    pub fn discount_for(&self, base: f64) -> f64 {
        if base <= 0.0 {
            return 0.0;
        }
        let raw = match self.promotion_type {
            PromotionType::Percent => {
                let percent = base * self.value / 100.0;
                if self.max_discount > 0.0 {
                    percent.min(self.max_discount)
                } else {
                    percent
                }
            }
            PromotionType::Amount => self.value,
        };
        round_money(raw.min(base))
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePromotion {
    #[validate(length(min = 1, max = 20, message = "Code must be 1-20 characters"))]
    #[schema(example = "SUMMER10")]
    pub code: String,
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    pub description: Option<String>,
    pub promotion_type: PromotionType,
    pub value: f64,
    pub max_discount: Option<f64>,
    pub min_condition_amount: Option<f64>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePromotion {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub value: Option<f64>,
    pub max_discount: Option<f64>,
    pub min_condition_amount: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: Option<EntityStatus>,
}

/// A promotion used by an order and the discount it granted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PromotionOrderMapping {
    pub id: Uuid,
    pub order_id: Uuid,
    pub promotion_id: Uuid,
    pub quantity: i32,
    pub discount_amount: f64,
}

impl PromotionOrderMapping {
    pub fn new(order_id: Uuid, promotion_id: Uuid, discount_amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            promotion_id,
            quantity: 1,
            discount_amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn promotion(kind: PromotionType, value: f64, max: f64, min: f64) -> Promotion {
        let now = Utc::now();
        Promotion::new(
            Uuid::new_v4(),
            CreatePromotion {
                code: "promo".into(),
                name: "Promo".into(),
                description: None,
                promotion_type: kind,
                value,
                max_discount: Some(max),
                min_condition_amount: Some(min),
                start_date: now - Duration::days(1),
                end_date: now + Duration::days(1),
            },
        )
        .unwrap()
    }

    #[test]
    fn percent_discount_respects_cap() {
        let uncapped = promotion(PromotionType::Percent, 10.0, 0.0, 0.0);
        assert_eq!(uncapped.discount_for(200_000.0), 20_000.0);

        let capped = promotion(PromotionType::Percent, 50.0, 15_000.0, 0.0);
        assert_eq!(capped.discount_for(100_000.0), 15_000.0);
    }

    #[test]
    fn amount_discount_never_exceeds_base() {
        let flat = promotion(PromotionType::Amount, 50_000.0, 0.0, 0.0);
        assert_eq!(flat.discount_for(30_000.0), 30_000.0);
        assert_eq!(flat.discount_for(0.0), 0.0);
    }

    #[test]
    fn applicability() {
        let promo = promotion(PromotionType::Amount, 10_000.0, 0.0, 100_000.0);
        let now = Utc::now();
        assert!(promo.check_applicable(promo.brand_id, 100_000.0, now).is_ok());
        assert!(promo.check_applicable(promo.brand_id, 99_999.0, now).is_err());
        assert!(promo.check_applicable(Uuid::new_v4(), 200_000.0, now).is_err());
        assert!(promo
            .check_applicable(promo.brand_id, 200_000.0, now + Duration::days(3))
            .is_err());
    }

    #[test]
    fn invalid_terms_are_rejected() {
        let now = Utc::now();
        let input = CreatePromotion {
            code: "bad".into(),
            name: "Bad".into(),
            description: None,
            promotion_type: PromotionType::Percent,
            value: 120.0,
            max_discount: None,
            min_condition_amount: None,
            start_date: now,
            end_date: now + Duration::days(1),
        };
        assert!(Promotion::new(Uuid::new_v4(), input.clone()).is_err());

        let backwards = CreatePromotion {
            value: 10.0,
            end_date: now - Duration::days(1),
            ..input
        };
        assert!(Promotion::new(Uuid::new_v4(), backwards).is_err());
    }
}
