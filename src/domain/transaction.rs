//! Wallet and point ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::config::{CURRENCY_POINT, CURRENCY_VND};

string_enum! {
    pub enum TransactionType {
        TopUp => "TOP_UP",
        Payment => "PAYMENT",
        Refund => "REFUND",
        PointEarn => "POINT_EARN",
    }
}

string_enum! {
    pub enum Currency {
        Vnd => "VND",
        Point => "POINT",
    }
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Vnd => CURRENCY_VND,
            Currency::Point => CURRENCY_POINT,
        }
    }
}

/// One balance or point movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Transaction {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub user_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
    pub amount: f64,
    pub currency: Currency,
    pub transaction_type: TransactionType,
    pub is_increase: bool,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    #[allow(clippy::too_many_arguments)]
    fn entry(
        brand_id: Uuid,
        user_id: Uuid,
        order_id: Option<Uuid>,
        amount: f64,
        currency: Currency,
        transaction_type: TransactionType,
        is_increase: bool,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            brand_id,
            user_id: Some(user_id),
            order_id,
            amount,
            currency,
            transaction_type,
            is_increase,
            description,
            created_at: Utc::now(),
        }
    }

    pub fn top_up(brand_id: Uuid, user_id: Uuid, amount: f64, description: Option<String>) -> Self {
        Self::entry(
            brand_id,
            user_id,
            None,
            amount,
            Currency::Vnd,
            TransactionType::TopUp,
            true,
            description.or_else(|| Some("Wallet top-up".to_string())),
        )
    }

    pub fn payment(brand_id: Uuid, user_id: Uuid, order_id: Uuid, invoice_id: &str, amount: f64) -> Self {
        Self::entry(
            brand_id,
            user_id,
            Some(order_id),
            amount,
            Currency::Vnd,
            TransactionType::Payment,
            false,
            Some(format!("Payment for order {}", invoice_id)),
        )
    }

    pub fn refund(brand_id: Uuid, user_id: Uuid, order_id: Uuid, invoice_id: &str, amount: f64) -> Self {
        Self::entry(
            brand_id,
            user_id,
            Some(order_id),
            amount,
            Currency::Vnd,
            TransactionType::Refund,
            true,
            Some(format!("Refund for order {}", invoice_id)),
        )
    }

    pub fn point_earn(brand_id: Uuid, user_id: Uuid, order_id: Uuid, invoice_id: &str, points: i64) -> Self {
        Self::entry(
            brand_id,
            user_id,
            Some(order_id),
            points as f64,
            Currency::Point,
            TransactionType::PointEarn,
            true,
            Some(format!("Points earned on order {}", invoice_id)),
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TransactionFilter {
    pub transaction_type: Option<TransactionType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_directions() {
        let (brand, user, order) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let top_up = Transaction::top_up(brand, user, 50_000.0, None);
        assert!(top_up.is_increase);
        assert_eq!(top_up.currency, Currency::Vnd);
        assert_eq!(top_up.order_id, None);

        let payment = Transaction::payment(brand, user, order, "D1", 20_000.0);
        assert!(!payment.is_increase);
        assert_eq!(payment.transaction_type, TransactionType::Payment);

        let refund = Transaction::refund(brand, user, order, "D1", 20_000.0);
        assert!(refund.is_increase);

        let earn = Transaction::point_earn(brand, user, order, "D1", 12);
        assert_eq!(earn.currency, Currency::Point);
        assert_eq!(earn.amount, 12.0);
        assert_eq!(earn.currency.code(), "POINT");
    }
}
