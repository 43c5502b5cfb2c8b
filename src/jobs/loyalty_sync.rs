//! Loyalty points reconciliation.
//!
//! Paid orders carrying a member are reported to the loyalty service; the
//! points it awards are booked on the member and in the ledger, and the
//! order's customer row is flagged so it is never reported twice.

use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::config::{
    Config, LOYALTY_SYNC_CONCURRENCY, LOYALTY_SYNC_LOCK, LOYALTY_SYNC_LOCK_TTL_SECONDS,
    SECONDS_PER_HOUR,
};
use crate::domain::wallet;
use crate::domain::{Order, OrderUser};
use crate::errors::{AppResult, OptionExt};
use crate::infra::{Cache, EarnPointsRequest, LoyaltyClient, UnitOfWork};
use crate::with_transaction;

/// Outcome of one pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub processed: u64,
    pub synced: u64,
    pub failed: u64,
    pub skipped: u64,
}

enum Outcome {
    Synced,
    Skipped,
    Failed,
}

/// What booking an answered order writes, decided on the locked customer row.
#[derive(Debug, PartialEq, Eq)]
enum Booking {
    /// Another pass booked it first
    AlreadySynced,
    /// Nothing earned; only flag the row
    MarkOnly,
    Credit(i64),
}

fn booking_for(customer: &OrderUser, points: i64) -> Booking {
    if customer.is_sync {
        Booking::AlreadySynced
    } else if points > 0 {
        Booking::Credit(points)
    } else {
        Booking::MarkOnly
    }
}

pub struct LoyaltySync<U: UnitOfWork> {
    uow: Arc<U>,
    loyalty: Arc<dyn LoyaltyClient>,
    cache: Option<Cache>,
    batch_size: u64,
    interval: Duration,
}

impl<U: UnitOfWork + 'static> LoyaltySync<U> {
    pub fn new(uow: Arc<U>, loyalty: Arc<dyn LoyaltyClient>, config: &Config) -> Self {
        Self {
            uow,
            loyalty,
            cache: None,
            batch_size: config.loyalty_sync_batch_size,
            interval: Duration::from_secs(
                config.loyalty_sync_interval_hours * SECONDS_PER_HOUR as u64,
            ),
        }
    }

    /// Coordinate workers through a Redis lock.
    pub fn with_lock(mut self, cache: Cache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Orders waiting to be reported.
    pub async fn pending(&self) -> AppResult<u64> {
        self.uow.orders().count_unsynced().await
    }

    /// Report one batch of paid member orders.
    pub async fn run_once(&self) -> AppResult<SyncReport> {
        if !self.loyalty.is_enabled() {
            let pending = self.pending().await?;
            tracing::info!(pending, "Loyalty service disabled, nothing reported");
            return Ok(SyncReport {
                skipped: pending,
                ..SyncReport::default()
            });
        }

        let batch = self.uow.orders().list_unsynced(self.batch_size).await?;
        let outcomes: Vec<Outcome> = stream::iter(batch)
            .map(|(order, customer)| self.sync_order(order, customer))
            .buffer_unordered(LOYALTY_SYNC_CONCURRENCY)
            .collect()
            .await;

        let mut report = SyncReport::default();
        for outcome in outcomes {
            report.processed += 1;
            match outcome {
                Outcome::Synced => report.synced += 1,
                Outcome::Skipped => report.skipped += 1,
                Outcome::Failed => report.failed += 1,
            }
        }

        tracing::info!(
            processed = report.processed,
            synced = report.synced,
            failed = report.failed,
            skipped = report.skipped,
            "Loyalty sync pass finished"
        );
        Ok(report)
    }

    async fn sync_order(&self, order: Order, customer: OrderUser) -> Outcome {
        let Some(member_id) = customer.user_id else {
            return Outcome::Skipped;
        };

        let request = EarnPointsRequest {
            brand_id: order.brand_id,
            member_id,
            member_phone: customer.phone.clone(),
            order_id: order.id,
            invoice_id: order.invoice_id.clone(),
            amount: order.final_amount,
        };
        let earned = match self.loyalty.earn_points(request).await {
            Ok(earned) => earned,
            Err(e) => {
                tracing::warn!(order_id = %order.id, error = %e, "Loyalty service call failed");
                return Outcome::Failed;
            }
        };

        match self.book_points(order.clone(), customer.id, member_id, earned.points).await {
            Ok(true) => {
                tracing::debug!(order_id = %order.id, points = earned.points, "Points booked");
                Outcome::Synced
            }
            Ok(false) => Outcome::Skipped,
            Err(e) => {
                tracing::error!(order_id = %order.id, error = %e, "Failed to book loyalty points");
                Outcome::Failed
            }
        }
    }

    /// Returns false when another pass already booked the order.
    async fn book_points(
        &self,
        order: Order,
        customer_id: Uuid,
        member_id: Uuid,
        points: i64,
    ) -> AppResult<bool> {
        with_transaction!(self.uow, |ctx| {
            let customer = ctx.orders().customer(order.id).await?.ok_or_not_found()?;
            match booking_for(&customer, points) {
                Booking::AlreadySynced => return Ok(false),
                Booking::MarkOnly => {}
                Booking::Credit(points) => {
                    let mut member = ctx
                        .users()
                        .find_for_update(member_id)
                        .await?
                        .ok_or_not_found()?;
                    if let Some(entry) = wallet::earn_points(&order, &mut member, points) {
                        ctx.users().update(&member).await?;
                        ctx.transactions().record(&entry).await?;
                    }
                }
            }

            ctx.orders().mark_synced(customer_id, Utc::now()).await?;
            Ok(true)
        })
    }

    /// Run a pass every interval until Ctrl+C.
    pub async fn run_forever(&self) -> AppResult<()> {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            batch_size = self.batch_size,
            "Loyalty sync worker started. Press Ctrl+C to stop."
        );

        loop {
            if let Err(e) = self.locked_pass().await {
                tracing::error!(error = %e, "Loyalty sync pass failed");
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received shutdown signal, stopping worker...");
                    return Ok(());
                }
            }
        }
    }

    async fn locked_pass(&self) -> AppResult<()> {
        let Some(cache) = &self.cache else {
            self.run_once().await?;
            return Ok(());
        };

        let Some(lock) = cache
            .try_acquire_lock(LOYALTY_SYNC_LOCK, LOYALTY_SYNC_LOCK_TTL_SECONDS)
            .await?
        else {
            tracing::info!("Another worker holds the loyalty sync lock, skipping pass");
            return Ok(());
        };

        let result = self.run_once().await;
        lock.release().await?;
        result.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderStatus, OrderType, PaymentType};
    use crate::errors::AppError;
    use crate::infra::repositories::MockOrderRepository;
    use crate::infra::{EarnPointsResponse, MockLoyaltyClient};
    use crate::services::testing::TestUnitOfWork;

    fn paid_member_order(member: Option<Uuid>) -> (Order, OrderUser) {
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            brand_id: Uuid::new_v4(),
            store_id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            invoice_id: "D1240601090000".into(),
            order_type: OrderType::TakeAway,
            payment_type: PaymentType::Cash,
            status: OrderStatus::Paid,
            total_amount: 90_000.0,
            line_discount: 0.0,
            promotion_discount: 0.0,
            discount: 0.0,
            vat_rate: 0.08,
            vat_amount: 6_666.67,
            final_amount: 90_000.0,
            number_of_guests: 1,
            note: None,
            created_by: Uuid::new_v4(),
            checkin_date: now,
            created_at: now,
            updated_at: now,
        };
        let customer = OrderUser {
            id: Uuid::new_v4(),
            order_id: order.id,
            user_id: member,
            name: Some("Lan".into()),
            phone: Some("0901234567".into()),
            address: None,
            is_sync: false,
            synced_at: None,
            created_at: now,
        };
        (order, customer)
    }

    fn sync(orders: MockOrderRepository, loyalty: MockLoyaltyClient) -> LoyaltySync<TestUnitOfWork> {
        LoyaltySync::new(
            Arc::new(TestUnitOfWork::default().with_orders(orders)),
            Arc::new(loyalty),
            &Config::for_tests(),
        )
    }

    #[tokio::test]
    async fn disabled_service_reports_nothing() {
        let mut orders = MockOrderRepository::new();
        orders.expect_count_unsynced().returning(|| Ok(3));
        orders.expect_list_unsynced().never();
        let mut loyalty = MockLoyaltyClient::new();
        loyalty.expect_is_enabled().return_const(false);
        loyalty.expect_earn_points().never();

        let report = sync(orders, loyalty).run_once().await.unwrap();
        assert_eq!(report.skipped, 3);
        assert_eq!(report.processed, 0);
    }

    #[tokio::test]
    async fn service_failure_leaves_order_for_next_pass() {
        let pending = paid_member_order(Some(Uuid::new_v4()));
        let mut orders = MockOrderRepository::new();
        orders
            .expect_list_unsynced()
            .returning(move |_| Ok(vec![pending.clone()]));
        let mut loyalty = MockLoyaltyClient::new();
        loyalty.expect_is_enabled().return_const(true);
        loyalty
            .expect_earn_points()
            .times(1)
            .returning(|_| Err(AppError::external("earn points returned 503")));

        let report = sync(orders, loyalty).run_once().await.unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.synced, 0);
    }

    #[tokio::test]
    async fn guest_customers_are_skipped() {
        let guest = paid_member_order(None);
        let mut orders = MockOrderRepository::new();
        orders
            .expect_list_unsynced()
            .returning(move |_| Ok(vec![guest.clone()]));
        let mut loyalty = MockLoyaltyClient::new();
        loyalty.expect_is_enabled().return_const(true);
        loyalty.expect_earn_points().never();

        let report = sync(orders, loyalty).run_once().await.unwrap();
        assert_eq!(report.skipped, 1);
    }

    #[tokio::test]
    async fn request_carries_invoice_and_final_amount() {
        let member = Uuid::new_v4();
        let pending = paid_member_order(Some(member));
        let invoice = pending.0.invoice_id.clone();
        let mut orders = MockOrderRepository::new();
        orders
            .expect_list_unsynced()
            .withf(|limit| *limit == Config::for_tests().loyalty_sync_batch_size)
            .returning(move |_| Ok(vec![pending.clone()]));
        let mut loyalty = MockLoyaltyClient::new();
        loyalty.expect_is_enabled().return_const(true);
        loyalty
            .expect_earn_points()
            .withf(move |req| {
                req.member_id == member && req.invoice_id == invoice && req.amount == 90_000.0
            })
            .returning(|_| {
                Ok(EarnPointsResponse {
                    points: 9,
                    membership_level: None,
                })
            });

        // The mock unit of work cannot open a transaction, so booking fails
        let report = sync(orders, loyalty).run_once().await.unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.failed, 1);
    }

    #[test]
    fn booking_rechecks_the_locked_customer_row() {
        let (_, mut customer) = paid_member_order(Some(Uuid::new_v4()));
        assert_eq!(booking_for(&customer, 9), Booking::Credit(9));
        assert_eq!(booking_for(&customer, 0), Booking::MarkOnly);

        customer.is_sync = true;
        assert_eq!(booking_for(&customer, 9), Booking::AlreadySynced);
    }
}
