//! Balance and point movements.
//!
//! Each step changes the aggregates loaded under lock and returns the
//! ledger row to record, so transactional workflows only load and save.

use uuid::Uuid;

use super::brand::Brand;
use super::member::User;
use super::order::{Order, OrderStatus, PaymentType};
use super::transaction::Transaction;
use crate::errors::{AppError, AppResult};

fn ensure_member_of(brand_id: Uuid, member: &User) -> AppResult<()> {
    if member.brand_id != brand_id {
        return Err(AppError::rule("Member belongs to another brand"));
    }
    Ok(())
}

/// Debit a wallet-paid order from its member.
///
/// Free orders move no money and leave no PAYMENT row.
pub fn charge_order(order: &Order, member: &mut User) -> AppResult<Option<Transaction>> {
    ensure_member_of(order.brand_id, member)?;
    member.debit_balance(order.final_amount)?;
    Ok((order.final_amount > 0.0).then(|| {
        Transaction::payment(
            order.brand_id,
            member.id,
            order.id,
            &order.invoice_id,
            order.final_amount,
        )
    }))
}

/// Whether cancelling `order`, previously in `previous`, gives money back.
pub fn refunds_on_cancel(order: &Order, previous: OrderStatus) -> bool {
    previous == OrderStatus::Paid
        && order.payment_type == PaymentType::PointifyWallet
        && order.final_amount > 0.0
}

/// Credit a cancelled wallet payment back to the member.
pub fn refund_order(order: &Order, member: &mut User) -> AppResult<Transaction> {
    ensure_member_of(order.brand_id, member)?;
    member.credit_balance(order.final_amount)?;
    Ok(Transaction::refund(
        order.brand_id,
        member.id,
        order.id,
        &order.invoice_id,
        order.final_amount,
    ))
}

/// Money paid in at the counter: lands on the member's wallet and the brand's balance.
pub fn top_up(
    member: &mut User,
    brand: &mut Brand,
    amount: f64,
    description: Option<String>,
) -> AppResult<Transaction> {
    ensure_member_of(brand.id, member)?;
    member.credit_balance(amount)?;
    brand.credit_balance(amount);
    Ok(Transaction::top_up(brand.id, member.id, amount, description))
}

/// Points the loyalty service awarded for an order. None when nothing was earned.
pub fn earn_points(order: &Order, member: &mut User, points: i64) -> Option<Transaction> {
    if points <= 0 {
        return None;
    }
    member.credit_points(points);
    Some(Transaction::point_earn(
        order.brand_id,
        member.id,
        order.id,
        &order.invoice_id,
        points,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::member::SignUpUser;
    use crate::domain::order::OrderType;
    use crate::domain::transaction::{Currency, TransactionType};
    use crate::domain::CreateBrand;
    use chrono::Utc;

    fn brand() -> Brand {
        Brand::new(CreateBrand {
            name: "Passio".into(),
            brand_code: "PASSIO".into(),
            email: None,
            phone: None,
            address: None,
            pic_url: None,
        })
    }

    fn member(brand_id: Uuid, balance: f64) -> User {
        let mut user = User::new(
            brand_id,
            SignUpUser {
                brand_code: "passio".into(),
                phone: "0901234567".into(),
                password: "member-pass".into(),
                full_name: "Tran Thi B".into(),
                email: None,
                gender: None,
                date_of_birth: None,
                address: None,
            },
            "hash".into(),
        )
        .unwrap();
        user.balance = balance;
        user
    }

    fn wallet_order(brand_id: Uuid, status: OrderStatus, final_amount: f64) -> Order {
        let now = Utc::now();
        Order {
            id: Uuid::new_v4(),
            brand_id,
            store_id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            invoice_id: "D124060109000001".into(),
            order_type: OrderType::TakeAway,
            payment_type: PaymentType::PointifyWallet,
            status,
            total_amount: final_amount,
            line_discount: 0.0,
            promotion_discount: 0.0,
            discount: 0.0,
            vat_rate: 0.08,
            vat_amount: 0.0,
            final_amount,
            number_of_guests: 1,
            note: None,
            created_by: Uuid::new_v4(),
            checkin_date: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn wallet_payment_debits_member_and_books_payment() {
        let brand_id = Uuid::new_v4();
        let order = wallet_order(brand_id, OrderStatus::Paid, 60_000.0);
        let mut payer = member(brand_id, 100_000.0);

        let entry = charge_order(&order, &mut payer).unwrap().unwrap();

        assert_eq!(payer.balance, 40_000.0);
        assert_eq!(entry.transaction_type, TransactionType::Payment);
        assert_eq!(entry.currency, Currency::Vnd);
        assert!(!entry.is_increase);
        assert_eq!(entry.amount, 60_000.0);
        assert_eq!(entry.order_id, Some(order.id));
        assert_eq!(entry.user_id, Some(payer.id));
    }

    #[test]
    fn short_wallet_is_refused_untouched() {
        let brand_id = Uuid::new_v4();
        let order = wallet_order(brand_id, OrderStatus::Paid, 60_000.0);
        let mut payer = member(brand_id, 50_000.0);

        let result = charge_order(&order, &mut payer);
        assert!(matches!(result, Err(AppError::BusinessRule(_))));
        assert_eq!(payer.balance, 50_000.0);
    }

    #[test]
    fn free_order_leaves_no_payment_row() {
        let brand_id = Uuid::new_v4();
        let order = wallet_order(brand_id, OrderStatus::Paid, 0.0);
        let mut payer = member(brand_id, 10_000.0);

        assert!(charge_order(&order, &mut payer).unwrap().is_none());
        assert_eq!(payer.balance, 10_000.0);
    }

    #[test]
    fn members_of_other_brands_cannot_pay() {
        let order = wallet_order(Uuid::new_v4(), OrderStatus::Paid, 10_000.0);
        let mut outsider = member(Uuid::new_v4(), 100_000.0);
        assert!(matches!(
            charge_order(&order, &mut outsider),
            Err(AppError::BusinessRule(_))
        ));
    }

    #[test]
    fn cancelling_a_paid_wallet_order_refunds_it() {
        let brand_id = Uuid::new_v4();
        let mut order = wallet_order(brand_id, OrderStatus::Paid, 60_000.0);
        let mut payer = member(brand_id, 40_000.0);

        order
            .transition(OrderStatus::Canceled, None, None, None)
            .unwrap();
        assert!(refunds_on_cancel(&order, OrderStatus::Paid));
        let entry = refund_order(&order, &mut payer).unwrap();

        assert_eq!(payer.balance, 100_000.0);
        assert_eq!(entry.transaction_type, TransactionType::Refund);
        assert!(entry.is_increase);
        assert_eq!(entry.amount, 60_000.0);
    }

    #[test]
    fn only_paid_wallet_orders_are_refunded() {
        let brand_id = Uuid::new_v4();
        let wallet = wallet_order(brand_id, OrderStatus::Canceled, 60_000.0);
        assert!(!refunds_on_cancel(&wallet, OrderStatus::Pending));

        let mut cash = wallet.clone();
        cash.payment_type = PaymentType::Cash;
        assert!(!refunds_on_cancel(&cash, OrderStatus::Paid));

        let free = wallet_order(brand_id, OrderStatus::Canceled, 0.0);
        assert!(!refunds_on_cancel(&free, OrderStatus::Paid));
    }

    #[test]
    fn top_up_credits_member_and_brand() {
        let mut brand = brand();
        let mut payer = member(brand.id, 5_000.0);

        let entry = top_up(&mut payer, &mut brand, 100_000.0, None).unwrap();

        assert_eq!(payer.balance, 105_000.0);
        assert_eq!(brand.brand_balance, 100_000.0);
        assert_eq!(entry.transaction_type, TransactionType::TopUp);
        assert_eq!(entry.brand_id, brand.id);
        assert!(entry.is_increase);
        assert_eq!(entry.description.as_deref(), Some("Wallet top-up"));
    }

    #[test]
    fn top_up_into_another_brand_is_refused() {
        let mut brand = brand();
        let mut outsider = member(Uuid::new_v4(), 0.0);
        assert!(top_up(&mut outsider, &mut brand, 10_000.0, None).is_err());
        assert_eq!(brand.brand_balance, 0.0);
        assert_eq!(outsider.balance, 0.0);
    }

    #[test]
    fn earned_points_are_credited_and_booked() {
        let brand_id = Uuid::new_v4();
        let order = wallet_order(brand_id, OrderStatus::Paid, 90_000.0);
        let mut earner = member(brand_id, 0.0);

        let entry = earn_points(&order, &mut earner, 9).unwrap();
        assert_eq!(earner.point, 9);
        assert_eq!(entry.transaction_type, TransactionType::PointEarn);
        assert_eq!(entry.currency, Currency::Point);
        assert_eq!(entry.amount, 9.0);

        assert!(earn_points(&order, &mut earner, 0).is_none());
        assert_eq!(earner.point, 9);
    }
}
