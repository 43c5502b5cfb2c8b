//! Checkout flow tests.
//!
//! Drives the pure part of placing and settling an order: resolving lines
//! against a store menu, pricing with promotions, assembling the rows and
//! keeping the session and the store report in step.

use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use uuid::Uuid;

use pos_backend::domain::menu::MenuProductDetail;
use pos_backend::domain::order::invoice_id;
use pos_backend::domain::pricing::price_order;
use pos_backend::domain::wallet;
use pos_backend::domain::{
    BusinessClock, CreateOrder, CreatePromotion, CreateStore, DayOfWeek, MenuDetail, NewOrder,
    OrderCustomerInput, OrderExtraInput, OrderLineInput, OrderStatus, OrderType, PaymentType,
    ProductType, Promotion, PromotionType, Session, SessionWindow, SignUpUser, Store,
    StoreReport, TransactionType, User,
};
use pos_backend::errors::AppError;
use pos_backend::services::resolve_lines;

// =============================================================================
// Fixtures
// =============================================================================

fn listed(product_type: ProductType, name: &str, price: f64, discount: f64) -> MenuProductDetail {
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

fn menu(store: &Store, products: Vec<MenuProductDetail>) -> MenuDetail {
    MenuDetail {
        menu_id: Uuid::new_v4(),
        brand_id: store.brand_id,
        store_id: store.id,
        code: "ALLDAY".to_string(),
        priority: 1,
        date_filter: DayOfWeek::ALL.to_vec(),
        start_time: NaiveTime::MIN,
        end_time: NaiveTime::from_hms_opt(23, 59, 59).unwrap(),
        products,
        categories: vec![],
        collections: vec![],
        variants: vec![],
    }
}

fn store() -> Store {
    Store::new(
        Uuid::new_v4(),
        CreateStore {
            name: "Nguyen Hue".to_string(),
            short_name: None,
            code: "pnh01".to_string(),
            email: None,
            phone: None,
            address: None,
            wifi_name: None,
            wifi_password: None,
        },
    )
}

fn promotion(
    brand_id: Uuid,
    code: &str,
    kind: PromotionType,
    value: f64,
    max_discount: Option<f64>,
) -> Promotion {
    let now = Utc::now();
    Promotion::new(
        brand_id,
        CreatePromotion {
            code: code.to_string(),
            name: code.to_string(),
            description: None,
            promotion_type: kind,
            value,
            max_discount,
            min_condition_amount: Some(50_000.0),
            start_date: now - Duration::days(1),
            end_date: now + Duration::days(1),
        },
    )
    .expect("valid promotion")
}

fn open_session(store: &Store) -> Session {
    let now = Utc::now();
    Session::new(
        store.id,
        &SessionWindow {
            name: Some("Morning shift".to_string()),
            start_date_time: now - Duration::hours(1),
            end_date_time: now + Duration::hours(7),
        },
        None,
    )
}

fn order_request(coffee: Uuid, sugar: Uuid) -> CreateOrder {
    CreateOrder {
        order_type: OrderType::TakeAway,
        payment_type: None,
        lines: vec![OrderLineInput {
            product_id: coffee,
            quantity: 2,
            note: Some("less ice".to_string()),
            extras: vec![OrderExtraInput {
                product_id: sugar,
                quantity: 1,
            }],
        }],
        promotion_ids: vec![],
        customer: None,
        number_of_guests: None,
        note: None,
    }
}

// =============================================================================
// Checkout
// =============================================================================

#[test]
fn test_checkout_prices_lines_extras_and_stacked_promotions() {
    let store = store();
    let coffee = listed(ProductType::Single, "Coffee", 45_000.0, 5_000.0);
    let sugar = listed(ProductType::Extra, "Sugar", 5_000.0, 0.0);
    let (coffee_id, sugar_id) = (coffee.product_id, sugar.product_id);
    let menu = menu(&store, vec![coffee, sugar]);

    let request = order_request(coffee_id, sugar_id);
    let items = resolve_lines(&menu, &request.lines).unwrap();

    // 10% capped at 5,000 then 20,000 off what is left
    let promotions = vec![
        promotion(store.brand_id, "TENPCT", PromotionType::Percent, 10.0, Some(5_000.0)),
        promotion(store.brand_id, "MINUS20K", PromotionType::Amount, 20_000.0, None),
    ];
    let now = Utc::now();
    let priced = price_order(&items, &promotions, store.brand_id, now, 0.08).unwrap();

    let totals = priced.totals;
    assert_eq!(totals.total_amount, 95_000.0);
    assert_eq!(totals.line_discount, 10_000.0);
    assert_eq!(totals.promotion_discount, 25_000.0);
    assert_eq!(totals.discount, 35_000.0);
    assert_eq!(totals.final_amount, 60_000.0);
    assert_eq!(totals.vat_amount, 4_444.44);
    assert_eq!(priced.promotions[0].discount_amount, 5_000.0);
    assert_eq!(priced.promotions[1].discount_amount, 20_000.0);

    let session = open_session(&store);
    let placed = NewOrder::assemble(
        &store,
        &session,
        Uuid::new_v4(),
        request,
        priced,
        "PNH0124050108300001".to_string(),
        now,
    );

    assert_eq!(placed.order.status, OrderStatus::Pending);
    assert_eq!(placed.order.payment_type, PaymentType::Cash);
    assert_eq!(placed.order.number_of_guests, 1);
    assert_eq!(placed.details.len(), 2);
    let parent = &placed.details[0];
    assert_eq!(placed.details[1].parent_detail_id, Some(parent.id));
    assert_eq!(placed.promotions.len(), 2);
    assert_eq!(placed.history.from_status, None);
    assert_eq!(placed.history.to_status, OrderStatus::Pending);
}

#[test]
fn test_checkout_rejects_products_off_menu() {
    let store = store();
    let coffee = listed(ProductType::Single, "Coffee", 45_000.0, 0.0);
    let menu = menu(&store, vec![coffee]);

    let request = order_request(Uuid::new_v4(), Uuid::new_v4());
    let result = resolve_lines(&menu, &request.lines);

    assert!(matches!(result, Err(AppError::BusinessRule(_))));
}

#[test]
fn test_promotion_below_minimum_is_refused() {
    let store = store();
    let tea = listed(ProductType::Single, "Tea", 20_000.0, 0.0);
    let tea_id = tea.product_id;
    let menu = menu(&store, vec![tea]);

    let lines = vec![OrderLineInput {
        product_id: tea_id,
        quantity: 1,
        note: None,
        extras: vec![],
    }];
    let items = resolve_lines(&menu, &lines).unwrap();
    let promotions = vec![promotion(
        store.brand_id,
        "MINUS20K",
        PromotionType::Amount,
        20_000.0,
        None,
    )];

    let result = price_order(&items, &promotions, store.brand_id, Utc::now(), 0.08);
    assert!(matches!(result, Err(AppError::BusinessRule(_))));
}

// =============================================================================
// Settlement
// =============================================================================

#[test]
fn test_cancelling_reverts_session_and_leaves_report_totals() {
    let store = store();
    let coffee = listed(ProductType::Single, "Coffee", 45_000.0, 5_000.0);
    let sugar = listed(ProductType::Extra, "Sugar", 5_000.0, 0.0);
    let (coffee_id, sugar_id) = (coffee.product_id, sugar.product_id);
    let menu = menu(&store, vec![coffee, sugar]);
    let mut session = open_session(&store);
    let now = Utc::now();
    let local = BusinessClock::new(7).unwrap().local(now);

    let place = |session: &mut Session, note: &str| {
        let mut request = order_request(coffee_id, sugar_id);
        request.note = Some(note.to_string());
        let items = resolve_lines(&menu, &request.lines).unwrap();
        let priced = price_order(&items, &[], store.brand_id, now, 0.08).unwrap();
        NewOrder::place(&store, session, Uuid::new_v4(), request, priced, local, now)
            .unwrap()
            .order
    };
    let mut kept = place(&mut session, "first");
    let mut dropped = place(&mut session, "second");
    assert_eq!(session.number_of_orders, 2);
    assert_eq!(session.total_final_amount, 170_000.0);
    assert!(kept.invoice_id.ends_with("01"));
    assert!(dropped.invoice_id.ends_with("02"));

    kept.transition(OrderStatus::Paid, Some(PaymentType::Momo), None, None)
        .unwrap();
    let history = dropped
        .transition(OrderStatus::Canceled, None, None, Some("walked out".to_string()))
        .unwrap();
    assert_eq!(history.from_status, Some(OrderStatus::Pending));
    session.revert_order(&dropped.totals());

    assert_eq!(session.number_of_orders, 1);
    assert_eq!(session.total_final_amount, 85_000.0);

    // The cancelled invoice number is never handed out again
    let next = place(&mut session, "third");
    assert!(next.invoice_id.ends_with("03"));
    assert_eq!(session.number_of_orders, 2);

    let report = StoreReport::from_orders(
        store.id,
        now - Duration::hours(1),
        now + Duration::hours(1),
        &[kept.clone(), dropped],
    );
    assert_eq!(report.total_orders, 1);
    assert_eq!(report.total_final_amount, 85_000.0);
    assert_eq!(report.by_payment_type.len(), 1);
    assert_eq!(report.by_payment_type[0].key, "MOMO");
    assert_eq!(report.by_status.len(), 2);

    // Paid orders can still be cancelled, but never paid twice
    assert!(kept
        .transition(OrderStatus::Paid, None, None, None)
        .is_err());
}

#[test]
fn test_invoice_id_uses_store_local_time() {
    let clock = BusinessClock::new(7).unwrap();
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 20, 30, 15).unwrap();

    let local = clock.local(at);
    assert_eq!(
        local.date(),
        NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
    );
    assert_eq!(invoice_id("PNH01", local, 3), "PNH0124050203301503");
}

#[test]
fn test_wallet_payment_and_refund_move_money_and_ledger() {
    let store = store();
    let coffee = listed(ProductType::Single, "Coffee", 45_000.0, 5_000.0);
    let coffee_id = coffee.product_id;
    let menu = menu(&store, vec![coffee]);
    let mut session = open_session(&store);
    let now = Utc::now();

    let mut member = User::new(
        store.brand_id,
        SignUpUser {
            brand_code: "passio".to_string(),
            phone: "0901234567".to_string(),
            password: "member-pass".to_string(),
            full_name: "Le Van C".to_string(),
            email: None,
            gender: None,
            date_of_birth: None,
            address: None,
        },
        "hash".to_string(),
    )
    .unwrap();
    member.balance = 100_000.0;

    let request = CreateOrder {
        payment_type: Some(PaymentType::PointifyWallet),
        customer: Some(OrderCustomerInput {
            user_id: Some(member.id),
            name: None,
            phone: None,
            address: None,
        }),
        lines: vec![OrderLineInput {
            product_id: coffee_id,
            quantity: 1,
            note: None,
            extras: vec![],
        }],
        ..order_request(coffee_id, coffee_id)
    };
    let items = resolve_lines(&menu, &request.lines).unwrap();
    let priced = price_order(&items, &[], store.brand_id, now, 0.08).unwrap();
    let local = BusinessClock::new(7).unwrap().local(now);
    let mut order = NewOrder::place(
        &store,
        &mut session,
        Uuid::new_v4(),
        request,
        priced,
        local,
        now,
    )
    .unwrap()
    .order;
    assert_eq!(order.final_amount, 40_000.0);

    order.transition(OrderStatus::Paid, None, None, None).unwrap();
    let payment = wallet::charge_order(&order, &mut member).unwrap().unwrap();
    assert_eq!(member.balance, 60_000.0);
    assert_eq!(payment.transaction_type, TransactionType::Payment);
    assert_eq!(payment.amount, 40_000.0);

    order.transition(OrderStatus::Canceled, None, None, None).unwrap();
    assert!(wallet::refunds_on_cancel(&order, OrderStatus::Paid));
    let refund = wallet::refund_order(&order, &mut member).unwrap();
    session.revert_order(&order.totals());

    assert_eq!(member.balance, 100_000.0);
    assert_eq!(refund.transaction_type, TransactionType::Refund);
    assert_eq!(refund.order_id, Some(order.id));
    assert_eq!(session.number_of_orders, 0);
    assert_eq!(session.total_final_amount, 0.0);
}
