//! Checkout and order lifecycle.
//!
//! Orders are priced against the menu the store sells at checkout time and
//! booked into the store's open session. Status changes settle wallet
//! payments and keep the session accounting in step.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use super::menu_service::MenuService;
use crate::domain::pricing::price_order;
use crate::domain::wallet;
use crate::domain::{
    Actor, BusinessClock, CreateOrder, LineItem, MenuDetail, NewOrder, Order, OrderFilter,
    OrderLineInput, OrderStatus, OrderWithDetails, PaymentType, ProductType, Promotion,
    ReportRange, Role, StoreReport, UpdateOrder,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};
use crate::with_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Place an order in the store's current session.
    async fn create_order(
        &self,
        actor: &Actor,
        store_id: Uuid,
        input: CreateOrder,
        now: DateTime<Utc>,
    ) -> AppResult<OrderWithDetails>;

    async fn get_order(&self, actor: &Actor, id: Uuid) -> AppResult<OrderWithDetails>;

    async fn list_store_orders(
        &self,
        actor: &Actor,
        store_id: Uuid,
        filter: OrderFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<Order>>;

    /// Pay or cancel an order.
    async fn update_order(&self, actor: &Actor, id: Uuid, input: UpdateOrder) -> AppResult<Order>;

    async fn store_report(
        &self,
        actor: &Actor,
        store_id: Uuid,
        range: ReportRange,
    ) -> AppResult<StoreReport>;
}

/// Match requested lines against the store menu.
///
/// Main lines must be sellable non-extra products on the menu; extras must be
/// EXTRA products on the menu. Prices come from the menu entries.
pub fn resolve_lines(menu: &MenuDetail, lines: &[OrderLineInput]) -> AppResult<Vec<LineItem>> {
    let listed = |product_id: Uuid| {
        menu.find_product(product_id).ok_or_else(|| {
            AppError::rule(format!("Product {} is not on the current menu", product_id))
        })
    };

    lines
        .iter()
        .map(|line| {
            let product = listed(line.product_id)?;
            match product.product_type {
                ProductType::Extra => {
                    return Err(AppError::validation(format!(
                        "Extra {} must be attached to another product",
                        product.name
                    )))
                }
                ProductType::Parent => {
                    return Err(AppError::validation(format!(
                        "{} is not sold by itself, pick one of its variants",
                        product.name
                    )))
                }
                ProductType::Single | ProductType::Child => {}
            }

            let extras = line
                .extras
                .iter()
                .map(|extra| {
                    let extra_product = listed(extra.product_id)?;
                    if extra_product.product_type != ProductType::Extra {
                        return Err(AppError::validation(format!(
                            "{} is not an extra",
                            extra_product.name
                        )));
                    }
                    Ok(LineItem {
                        product_id: extra_product.product_id,
                        product_name: extra_product.name.clone(),
                        quantity: extra.quantity,
                        selling_price: extra_product.selling_price,
                        discount_price: extra_product.discount_price,
                        note: None,
                        extras: Vec::new(),
                    })
                })
                .collect::<AppResult<Vec<_>>>()?;

            Ok(LineItem {
                product_id: product.product_id,
                product_name: product.name.clone(),
                quantity: line.quantity,
                selling_price: product.selling_price,
                discount_price: product.discount_price,
                note: line.note.clone(),
                extras,
            })
        })
        .collect()
}

pub struct OrderManager<U: UnitOfWork> {
    uow: Arc<U>,
    menus: Arc<dyn MenuService>,
    clock: BusinessClock,
    vat_rate: f64,
}

impl<U: UnitOfWork> OrderManager<U> {
    pub fn new(
        uow: Arc<U>,
        menus: Arc<dyn MenuService>,
        clock: BusinessClock,
        vat_rate: f64,
    ) -> Self {
        Self {
            uow,
            menus,
            clock,
            vat_rate,
        }
    }

    /// Requested promotions, in request order.
    async fn promotions(&self, ids: &[Uuid]) -> AppResult<Vec<Promotion>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let found = self.uow.promotions().find_many(ids.to_vec()).await?;
        ids.iter()
            .map(|id| {
                found
                    .iter()
                    .find(|promotion| promotion.id == *id)
                    .cloned()
                    .ok_or_else(|| AppError::validation(format!("Promotion {} does not exist", id)))
            })
            .collect()
    }

    async fn visible_order(&self, actor: &Actor, id: Uuid) -> AppResult<Order> {
        let order = self.uow.orders().find_by_id(id).await?.ok_or_not_found()?;
        actor.ensure_store(order.brand_id, order.store_id)?;
        Ok(order)
    }
}

fn require_order_access(actor: &Actor) -> AppResult<()> {
    if actor.is_system_admin() {
        return Ok(());
    }
    actor.require_any(Role::STORE_OPERATORS)
}

#[async_trait]
impl<U: UnitOfWork> OrderService for OrderManager<U> {
    async fn create_order(
        &self,
        actor: &Actor,
        store_id: Uuid,
        input: CreateOrder,
        now: DateTime<Utc>,
    ) -> AppResult<OrderWithDetails> {
        actor.require_any(Role::STORE_OPERATORS)?;
        let store = self.uow.stores().find_by_id(store_id).await?.ok_or_not_found()?;
        actor.ensure_store(store.brand_id, store.id)?;
        if !store.is_active() {
            return Err(AppError::rule("Store is deactivated"));
        }

        let session = self
            .uow
            .sessions()
            .find_current(store.id, now)
            .await?
            .ok_or_else(|| AppError::rule("No active session for this store"))?;

        let menu = self.menus.resolve_store_menu(&store, now).await?;
        let items = resolve_lines(&menu, &input.lines)?;
        let promotions = self.promotions(&input.promotion_ids).await?;
        let priced = price_order(&items, &promotions, store.brand_id, now, self.vat_rate)?;

        if let Some(user_id) = input.customer.as_ref().and_then(|c| c.user_id) {
            let member = self.uow.users().find_by_id(user_id).await?;
            if !member.is_some_and(|m| m.brand_id == store.brand_id) {
                return Err(AppError::validation("Customer is not a member of this brand"));
            }
        }

        let created_by = actor.id;
        let session_id = session.id;
        let local = self.clock.local(now);
        let placed = with_transaction!(self.uow, |ctx| {
            let mut session = ctx
                .sessions()
                .find_for_update(session_id)
                .await?
                .ok_or_else(|| AppError::rule("No active session for this store"))?;
            let new_order =
                NewOrder::place(&store, &mut session, created_by, input, priced, local, now)?;
            ctx.orders().insert(&new_order).await?;
            ctx.sessions().update(&session).await?;
            Ok(new_order)
        })?;

        tracing::info!(
            order_id = %placed.order.id,
            invoice_id = %placed.order.invoice_id,
            store_id = %placed.order.store_id,
            final_amount = placed.order.final_amount,
            "Order created"
        );
        Ok(placed.into())
    }

    async fn get_order(&self, actor: &Actor, id: Uuid) -> AppResult<OrderWithDetails> {
        require_order_access(actor)?;
        let order = self
            .uow
            .orders()
            .find_with_details(id)
            .await?
            .ok_or_not_found()?;
        actor.ensure_store(order.order.brand_id, order.order.store_id)?;
        Ok(order)
    }

    async fn list_store_orders(
        &self,
        actor: &Actor,
        store_id: Uuid,
        filter: OrderFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<Order>> {
        require_order_access(actor)?;
        let store = self.uow.stores().find_by_id(store_id).await?.ok_or_not_found()?;
        actor.ensure_store(store.brand_id, store.id)?;
        let page = self
            .uow
            .orders()
            .list_by_store(store.id, filter, &params)
            .await?;
        Ok(Paginated::from_page(page, &params))
    }

    async fn update_order(&self, actor: &Actor, id: Uuid, input: UpdateOrder) -> AppResult<Order> {
        actor.require_any(Role::STORE_OPERATORS)?;
        let current = self.visible_order(actor, id).await?;
        if !current.status.can_transition_to(input.status) {
            return Err(AppError::rule(format!(
                "Order {} cannot go from {} to {}",
                current.invoice_id, current.status, input.status
            )));
        }

        let changed_by = actor.id;
        let UpdateOrder {
            status: next,
            payment_type,
            note,
        } = input;
        let order = with_transaction!(self.uow, |ctx| {
            let mut order = ctx
                .orders()
                .find_for_update(id)
                .await?
                .ok_or_not_found()?;
            let previous = order.status;
            let history = order.transition(next, payment_type, Some(changed_by), note)?;

            match next {
                OrderStatus::Paid if order.payment_type == PaymentType::PointifyWallet => {
                    let member_id = ctx
                        .orders()
                        .customer(order.id)
                        .await?
                        .and_then(|customer| customer.user_id)
                        .ok_or_else(|| {
                            AppError::rule("Wallet payments need a member on the order")
                        })?;
                    let mut member = ctx
                        .users()
                        .find_for_update(member_id)
                        .await?
                        .ok_or_not_found()?;
                    let payment = wallet::charge_order(&order, &mut member)?;
                    ctx.users().update(&member).await?;
                    if let Some(payment) = payment {
                        ctx.transactions().record(&payment).await?;
                    }
                }
                OrderStatus::Canceled => {
                    let mut session = ctx
                        .sessions()
                        .find_for_update(order.session_id)
                        .await?
                        .ok_or_not_found()?;
                    session.revert_order(&order.totals());
                    ctx.sessions().update(&session).await?;

                    if wallet::refunds_on_cancel(&order, previous) {
                        let customer = ctx.orders().customer(order.id).await?;
                        if let Some(member_id) = customer.and_then(|c| c.user_id) {
                            let mut member = ctx
                                .users()
                                .find_for_update(member_id)
                                .await?
                                .ok_or_not_found()?;
                            let refund = wallet::refund_order(&order, &mut member)?;
                            ctx.users().update(&member).await?;
                            ctx.transactions().record(&refund).await?;
                        }
                    }
                }
                _ => {}
            }

            let order = ctx.orders().update(&order).await?;
            ctx.orders().append_history(&history).await?;
            Ok(order)
        })?;

        tracing::info!(
            order_id = %order.id,
            status = %order.status,
            payment_type = %order.payment_type,
            "Order status changed"
        );
        Ok(order)
    }

    async fn store_report(
        &self,
        actor: &Actor,
        store_id: Uuid,
        range: ReportRange,
    ) -> AppResult<StoreReport> {
        require_order_access(actor)?;
        if range.from >= range.to {
            return Err(AppError::validation("Report range must start before it ends"));
        }
        let store = self.uow.stores().find_by_id(store_id).await?.ok_or_not_found()?;
        actor.ensure_store(store.brand_id, store.id)?;

        let orders = self
            .uow
            .orders()
            .list_in_range(store.id, range.from, range.to)
            .await?;
        Ok(StoreReport::from_orders(store.id, range.from, range.to, &orders))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::menu::MenuProductDetail;
    use crate::domain::{CreateStore, OrderExtraInput, OrderType, Store};
    use crate::infra::repositories::{
        MockOrderRepository, MockSessionRepository, MockStoreRepository,
    };
    use crate::services::menu_service::MockMenuService;
    use crate::services::testing::TestUnitOfWork;
    use chrono::NaiveTime;

    fn listing(name: &str, product_type: ProductType, price: f64, discount: f64) -> MenuProductDetail {
        MenuProductDetail {
            menu_product_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            code: name.to_uppercase(),
            name: name.to_string(),
            product_type,
            category_id: Uuid::new_v4(),
            parent_product_id: None,
            size: None,
            pic_url: None,
            display_order: 0,
            selling_price: price,
            discount_price: discount,
            historical_price: price,
            variant_ids: vec![],
        }
    }

    fn menu_with(products: Vec<MenuProductDetail>) -> MenuDetail {
        MenuDetail {
            menu_id: Uuid::new_v4(),
            brand_id: Uuid::new_v4(),
            store_id: Uuid::new_v4(),
            code: "BASE".into(),
            priority: 0,
            date_filter: vec![],
            start_time: NaiveTime::MIN,
            end_time: NaiveTime::MIN,
            products,
            categories: vec![],
            collections: vec![],
            variants: vec![],
        }
    }

    fn line(product_id: Uuid, quantity: i32, extras: Vec<OrderExtraInput>) -> OrderLineInput {
        OrderLineInput {
            product_id,
            quantity,
            note: None,
            extras,
        }
    }

    fn store() -> Store {
        Store::new(
            Uuid::new_v4(),
            CreateStore {
                name: "District 1".into(),
                short_name: None,
                code: "D1".into(),
                email: None,
                phone: None,
                address: None,
                wifi_name: None,
                wifi_password: None,
            },
        )
    }

    fn cashier(store: &Store) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role: Role::Staff,
            brand_id: Some(store.brand_id),
            store_id: Some(store.id),
        }
    }

    fn order_request(product_id: Uuid) -> CreateOrder {
        CreateOrder {
            order_type: OrderType::EatIn,
            payment_type: None,
            lines: vec![line(product_id, 1, vec![])],
            promotion_ids: vec![],
            customer: None,
            number_of_guests: None,
            note: None,
        }
    }

    #[test]
    fn lines_take_menu_prices_and_extras() {
        let latte = listing("Latte", ProductType::Single, 45_000.0, 5_000.0);
        let pearl = listing("Pearl", ProductType::Extra, 8_000.0, 0.0);
        let menu = menu_with(vec![latte.clone(), pearl.clone()]);

        let items = resolve_lines(
            &menu,
            &[line(
                latte.product_id,
                2,
                vec![OrderExtraInput {
                    product_id: pearl.product_id,
                    quantity: 1,
                }],
            )],
        )
        .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].selling_price, 45_000.0);
        assert_eq!(items[0].discount_price, 5_000.0);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].extras[0].product_name, "Pearl");
    }

    #[test]
    fn product_off_menu_is_a_business_rule_error() {
        let menu = menu_with(vec![listing("Latte", ProductType::Single, 45_000.0, 0.0)]);
        let result = resolve_lines(&menu, &[line(Uuid::new_v4(), 1, vec![])]);
        assert!(matches!(result, Err(AppError::BusinessRule(_))));
    }

    #[test]
    fn extras_and_parents_cannot_be_main_lines() {
        let pearl = listing("Pearl", ProductType::Extra, 8_000.0, 0.0);
        let tea = listing("Milk tea", ProductType::Parent, 0.0, 0.0);
        let menu = menu_with(vec![pearl.clone(), tea.clone()]);

        assert!(matches!(
            resolve_lines(&menu, &[line(pearl.product_id, 1, vec![])]),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            resolve_lines(&menu, &[line(tea.product_id, 1, vec![])]),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn only_extra_products_attach_as_extras() {
        let latte = listing("Latte", ProductType::Single, 45_000.0, 0.0);
        let cake = listing("Cake", ProductType::Single, 30_000.0, 0.0);
        let menu = menu_with(vec![latte.clone(), cake.clone()]);

        let result = resolve_lines(
            &menu,
            &[line(
                latte.product_id,
                1,
                vec![OrderExtraInput {
                    product_id: cake.product_id,
                    quantity: 1,
                }],
            )],
        );
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    fn manager(uow: TestUnitOfWork, menus: MockMenuService) -> OrderManager<TestUnitOfWork> {
        OrderManager::new(
            Arc::new(uow),
            Arc::new(menus),
            BusinessClock::new(7).unwrap(),
            0.08,
        )
    }

    #[tokio::test]
    async fn checkout_without_open_session_is_rejected() {
        let store = store();
        let actor = cashier(&store);
        let store_id = store.id;

        let mut stores = MockStoreRepository::new();
        stores
            .expect_find_by_id()
            .returning(move |_| Ok(Some(store.clone())));
        let mut sessions = MockSessionRepository::new();
        sessions.expect_find_current().returning(|_, _| Ok(None));
        let mut menus = MockMenuService::new();
        menus.expect_resolve_store_menu().never();

        let service = manager(
            TestUnitOfWork::default().with_stores(stores).with_sessions(sessions),
            menus,
        );
        let result = service
            .create_order(&actor, store_id, order_request(Uuid::new_v4()), Utc::now())
            .await;
        match result {
            Err(AppError::BusinessRule(message)) => assert!(message.contains("No active session")),
            other => panic!("expected business rule error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn staff_of_another_store_cannot_check_out() {
        let store = store();
        let store_id = store.id;
        let outsider = Actor {
            store_id: Some(Uuid::new_v4()),
            ..cashier(&store)
        };

        let mut stores = MockStoreRepository::new();
        stores
            .expect_find_by_id()
            .returning(move |_| Ok(Some(store.clone())));

        let service = manager(TestUnitOfWork::default().with_stores(stores), MockMenuService::new());
        let result = service
            .create_order(&outsider, store_id, order_request(Uuid::new_v4()), Utc::now())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn paid_order_cannot_go_back_to_pending_or_be_paid_twice() {
        let store = store();
        let actor = cashier(&store);
        let paid = Order {
            id: Uuid::new_v4(),
            brand_id: store.brand_id,
            store_id: store.id,
            session_id: Uuid::new_v4(),
            invoice_id: "D124060109000001".into(),
            order_type: OrderType::TakeAway,
            payment_type: PaymentType::Cash,
            status: OrderStatus::Paid,
            total_amount: 45_000.0,
            line_discount: 0.0,
            promotion_discount: 0.0,
            discount: 0.0,
            vat_rate: 0.08,
            vat_amount: 3_333.33,
            final_amount: 45_000.0,
            number_of_guests: 1,
            note: None,
            created_by: actor.id,
            checkin_date: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let id = paid.id;

        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(paid.clone())));

        let service = manager(TestUnitOfWork::default().with_orders(orders), MockMenuService::new());
        let result = service
            .update_order(
                &actor,
                id,
                UpdateOrder {
                    status: OrderStatus::Paid,
                    payment_type: None,
                    note: None,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::BusinessRule(_))));
    }

    #[tokio::test]
    async fn report_range_must_be_ordered() {
        let store = store();
        let actor = cashier(&store);
        let service = manager(TestUnitOfWork::default(), MockMenuService::new());
        let now = Utc::now();
        let result = service
            .store_report(&actor, store.id, ReportRange { from: now, to: now })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
