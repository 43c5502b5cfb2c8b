//! Checkout arithmetic: line totals, promotion stacking and included VAT.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::promotion::Promotion;
use crate::errors::{AppError, AppResult};

/// Round to two decimals.
pub fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// VAT contained in a VAT-inclusive amount.
pub fn vat_included(amount: f64, rate: f64) -> f64 {
    if rate <= 0.0 {
        return 0.0;
    }
    round_money(amount * rate / (1.0 + rate))
}

/// A resolved order line: menu prices for one product and its extras.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub selling_price: f64,
    /// Per-unit discount from the menu
    pub discount_price: f64,
    pub note: Option<String>,
    pub extras: Vec<LineItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub selling_price: f64,
    pub discount_price: f64,
    pub total_amount: f64,
    pub discount: f64,
    pub final_amount: f64,
    pub note: Option<String>,
    pub extras: Vec<PricedLine>,
}

impl PricedLine {
    fn price(item: &LineItem) -> Self {
        let quantity = f64::from(item.quantity);
        let total_amount = round_money(item.selling_price * quantity);
        let discount = round_money((item.discount_price * quantity).min(total_amount));
        Self {
            product_id: item.product_id,
            product_name: item.product_name.clone(),
            quantity: item.quantity,
            selling_price: item.selling_price,
            discount_price: item.discount_price,
            total_amount,
            discount,
            final_amount: round_money(total_amount - discount),
            note: item.note.clone(),
            extras: item.extras.iter().map(Self::price).collect(),
        }
    }

    /// This row followed by its extras.
    pub fn rows(&self) -> impl Iterator<Item = &PricedLine> {
        std::iter::once(self).chain(self.extras.iter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PromotionApplication {
    pub promotion_id: Uuid,
    pub discount_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct OrderTotals {
    /// Sum of selling price × quantity over every row
    pub total_amount: f64,
    pub line_discount: f64,
    pub promotion_discount: f64,
    /// Line and promotion discounts together
    pub discount: f64,
    pub vat_rate: f64,
    pub vat_amount: f64,
    pub final_amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedOrder {
    pub lines: Vec<PricedLine>,
    pub promotions: Vec<PromotionApplication>,
    pub totals: OrderTotals,
}

/// Price an order.
///
/// Promotions are applied once each, in the given order, on what remains
/// after line discounts and earlier promotions.
pub fn price_order(
    items: &[LineItem],
    promotions: &[Promotion],
    brand_id: Uuid,
    now: DateTime<Utc>,
    vat_rate: f64,
) -> AppResult<PricedOrder> {
    if items.is_empty() {
        return Err(AppError::validation("An order needs at least one line"));
    }
    if let Some(item) = items
        .iter()
        .flat_map(|item| std::iter::once(item).chain(item.extras.iter()))
        .find(|item| item.quantity < 1)
    {
        return Err(AppError::validation(format!(
            "Quantity of product {} must be at least 1",
            item.product_id
        )));
    }

    let lines: Vec<PricedLine> = items.iter().map(PricedLine::price).collect();
    let rows = || lines.iter().flat_map(PricedLine::rows);
    let total_amount = round_money(rows().map(|row| row.total_amount).sum());
    let line_discount = round_money(rows().map(|row| row.discount).sum());

    let subtotal = round_money(total_amount - line_discount);
    let mut remaining = subtotal;
    let mut seen = HashSet::new();
    let mut applications = Vec::with_capacity(promotions.len());
    for promotion in promotions {
        if !seen.insert(promotion.id) {
            return Err(AppError::rule(format!(
                "Promotion {} is used more than once",
                promotion.code
            )));
        }
        promotion.check_applicable(brand_id, subtotal, now)?;
        let discount_amount = promotion.discount_for(remaining);
        remaining = round_money(remaining - discount_amount);
        applications.push(PromotionApplication {
            promotion_id: promotion.id,
            discount_amount,
        });
    }

    let promotion_discount = round_money(subtotal - remaining);
    let discount = round_money((line_discount + promotion_discount).min(total_amount));
    let final_amount = round_money(total_amount - discount);

    Ok(PricedOrder {
        lines,
        promotions: applications,
        totals: OrderTotals {
            total_amount,
            line_discount,
            promotion_discount,
            discount,
            vat_rate,
            vat_amount: vat_included(final_amount, vat_rate),
            final_amount,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::promotion::{CreatePromotion, PromotionType};
    use chrono::Duration;

    fn item(price: f64, discount: f64, quantity: i32) -> LineItem {
        LineItem {
            product_id: Uuid::new_v4(),
            product_name: "Item".into(),
            quantity,
            selling_price: price,
            discount_price: discount,
            note: None,
            extras: vec![],
        }
    }

    fn promotion(brand_id: Uuid, kind: PromotionType, value: f64, max: f64) -> Promotion {
        let now = Utc::now();
        Promotion::new(
            brand_id,
            CreatePromotion {
                code: format!("P{}", value),
                name: "Promo".into(),
                description: None,
                promotion_type: kind,
                value,
                max_discount: Some(max),
                min_condition_amount: None,
                start_date: now - Duration::hours(1),
                end_date: now + Duration::hours(1),
            },
        )
        .unwrap()
    }

    #[test]
    fn rounding() {
        assert_eq!(round_money(10.456), 10.46);
        assert_eq!(vat_included(108_000.0, 0.08), 8_000.0);
        assert_eq!(vat_included(50_000.0, 0.0), 0.0);
    }

    #[test]
    fn lines_and_extras_are_summed() {
        let mut latte = item(45_000.0, 5_000.0, 2);
        latte.extras.push(item(10_000.0, 0.0, 2));
        let tea = item(30_000.0, 0.0, 1);

        let priced = price_order(&[latte, tea], &[], Uuid::new_v4(), Utc::now(), 0.08).unwrap();

        assert_eq!(priced.lines[0].total_amount, 90_000.0);
        assert_eq!(priced.lines[0].discount, 10_000.0);
        assert_eq!(priced.lines[0].extras[0].total_amount, 20_000.0);
        assert_eq!(priced.totals.total_amount, 140_000.0);
        assert_eq!(priced.totals.line_discount, 10_000.0);
        assert_eq!(priced.totals.final_amount, 130_000.0);
        assert_eq!(priced.totals.vat_amount, round_money(130_000.0 * 0.08 / 1.08));
    }

    #[test]
    fn promotions_stack_on_remaining_amount() {
        let brand = Uuid::new_v4();
        let percent = promotion(brand, PromotionType::Percent, 10.0, 0.0);
        let flat = promotion(brand, PromotionType::Amount, 20_000.0, 0.0);

        let priced = price_order(
            &[item(100_000.0, 0.0, 2)],
            &[percent.clone(), flat.clone()],
            brand,
            Utc::now(),
            0.08,
        )
        .unwrap();

        assert_eq!(priced.promotions[0].discount_amount, 20_000.0);
        assert_eq!(priced.promotions[1].discount_amount, 20_000.0);
        assert_eq!(priced.totals.promotion_discount, 40_000.0);
        assert_eq!(priced.totals.final_amount, 160_000.0);

        // Reversed order: the flat amount first shrinks the percent base
        let reversed = price_order(
            &[item(100_000.0, 0.0, 2)],
            &[flat, percent],
            brand,
            Utc::now(),
            0.08,
        )
        .unwrap();
        assert_eq!(reversed.promotions[1].discount_amount, 18_000.0);
        assert_eq!(reversed.totals.final_amount, 162_000.0);
    }

    #[test]
    fn discount_never_exceeds_subtotal() {
        let brand = Uuid::new_v4();
        let big = promotion(brand, PromotionType::Amount, 500_000.0, 0.0);
        let other = promotion(brand, PromotionType::Percent, 50.0, 0.0);

        let priced = price_order(
            &[item(50_000.0, 10_000.0, 1)],
            &[big, other],
            brand,
            Utc::now(),
            0.08,
        )
        .unwrap();

        assert_eq!(priced.totals.discount, 50_000.0);
        assert_eq!(priced.totals.final_amount, 0.0);
        assert_eq!(priced.totals.vat_amount, 0.0);
        assert_eq!(priced.promotions[1].discount_amount, 0.0);
    }

    #[test]
    fn duplicate_promotions_are_rejected() {
        let brand = Uuid::new_v4();
        let promo = promotion(brand, PromotionType::Amount, 1_000.0, 0.0);
        let result = price_order(
            &[item(50_000.0, 0.0, 1)],
            &[promo.clone(), promo],
            brand,
            Utc::now(),
            0.08,
        );
        assert!(matches!(result, Err(AppError::BusinessRule(_))));
    }

    #[test]
    fn invalid_quantity_or_empty_order() {
        let brand = Uuid::new_v4();
        assert!(price_order(&[], &[], brand, Utc::now(), 0.08).is_err());
        assert!(price_order(&[item(1.0, 0.0, 0)], &[], brand, Utc::now(), 0.08).is_err());
    }

    #[test]
    fn foreign_promotion_is_rejected() {
        let promo = promotion(Uuid::new_v4(), PromotionType::Amount, 1_000.0, 0.0);
        let result = price_order(
            &[item(50_000.0, 0.0, 1)],
            &[promo],
            Uuid::new_v4(),
            Utc::now(),
            0.08,
        );
        assert!(matches!(result, Err(AppError::BusinessRule(_))));
    }
}
