//! Orders, their lines, customer info and status history.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::pricing::{round_money, OrderTotals, PricedLine, PricedOrder};
use super::promotion::PromotionOrderMapping;
use super::session::Session;
use super::store::Store;
use crate::errors::{AppError, AppResult};

string_enum! {
    pub enum OrderStatus {
        Pending => "PENDING",
        Paid => "PAID",
        Canceled => "CANCELED",
    }
}

impl OrderStatus {
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Paid)
                | (OrderStatus::Pending, OrderStatus::Canceled)
                | (OrderStatus::Paid, OrderStatus::Canceled)
        )
    }
}

string_enum! {
    pub enum OrderType {
        EatIn => "EAT_IN",
        TakeAway => "TAKE_AWAY",
        Delivery => "DELIVERY",
    }
}

string_enum! {
    pub enum PaymentType {
        Cash => "CASH",
        Banking => "BANKING",
        Visa => "VISA",
        Momo => "MOMO",
        PointifyWallet => "POINTIFY_WALLET",
    }
}

/// Invoice number: store code, local timestamp and the order's ordinal in its session.
pub fn invoice_id(store_code: &str, local: NaiveDateTime, ordinal: i32) -> String {
    format!("{}{}{:02}", store_code, local.format("%y%m%d%H%M%S"), ordinal)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub store_id: Uuid,
    pub session_id: Uuid,
    pub invoice_id: String,
    pub order_type: OrderType,
    pub payment_type: PaymentType,
    pub status: OrderStatus,
    pub total_amount: f64,
    /// Menu discounts of the lines
    pub line_discount: f64,
    pub promotion_discount: f64,
    pub discount: f64,
    pub vat_rate: f64,
    pub vat_amount: f64,
    pub final_amount: f64,
    pub number_of_guests: i32,
    pub note: Option<String>,
    pub created_by: Uuid,
    pub checkin_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn totals(&self) -> OrderTotals {
        OrderTotals {
            total_amount: self.total_amount,
            line_discount: self.line_discount,
            promotion_discount: self.promotion_discount,
            discount: self.discount,
            vat_rate: self.vat_rate,
            vat_amount: self.vat_amount,
            final_amount: self.final_amount,
        }
    }

    /// Move to `next`, returning the history row to append.
    pub fn transition(
        &mut self,
        next: OrderStatus,
        payment_type: Option<PaymentType>,
        changed_by: Option<Uuid>,
        note: Option<String>,
    ) -> AppResult<OrderHistory> {
        if !self.status.can_transition_to(next) {
            return Err(AppError::rule(format!(
                "Order {} cannot go from {} to {}",
                self.invoice_id, self.status, next
            )));
        }
        if let Some(payment_type) = payment_type {
            if next != OrderStatus::Paid {
                return Err(AppError::validation(
                    "Payment type can only be set when paying",
                ));
            }
            self.payment_type = payment_type;
        }
        let history = OrderHistory::new(self.id, Some(self.status), next, changed_by, note);
        self.status = next;
        self.updated_at = history.created_at;
        Ok(history)
    }
}

/// One row of an order; extras point at their parent row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderDetail {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub parent_detail_id: Option<Uuid>,
    pub product_name: String,
    pub quantity: i32,
    pub selling_price: f64,
    pub discount_price: f64,
    pub total_amount: f64,
    pub discount: f64,
    pub final_amount: f64,
    pub note: Option<String>,
}

impl OrderDetail {
    fn from_line(order_id: Uuid, line: &PricedLine, parent_detail_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            product_id: line.product_id,
            parent_detail_id,
            product_name: line.product_name.clone(),
            quantity: line.quantity,
            selling_price: line.selling_price,
            discount_price: line.discount_price,
            total_amount: line.total_amount,
            discount: line.discount,
            final_amount: line.final_amount,
            note: line.note.clone(),
        }
    }
}

/// Customer info attached to an order, optionally linked to a member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderUser {
    pub id: Uuid,
    pub order_id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_sync: bool,
    pub synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl OrderUser {
    pub fn new(order_id: Uuid, input: OrderCustomerInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            user_id: input.user_id,
            name: input.name,
            phone: input.phone,
            address: input.address,
            is_sync: false,
            synced_at: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderHistory {
    pub id: Uuid,
    pub order_id: Uuid,
    pub from_status: Option<OrderStatus>,
    pub to_status: OrderStatus,
    pub changed_by: Option<Uuid>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OrderHistory {
    pub fn new(
        order_id: Uuid,
        from_status: Option<OrderStatus>,
        to_status: OrderStatus,
        changed_by: Option<Uuid>,
        note: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            from_status,
            to_status,
            changed_by,
            note,
            created_at: Utc::now(),
        }
    }
}

/// Everything written when an order is placed
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub order: Order,
    pub details: Vec<OrderDetail>,
    pub promotions: Vec<PromotionOrderMapping>,
    pub customer: Option<OrderUser>,
    pub history: OrderHistory,
}

impl NewOrder {
    /// Book a checkout into the locked session it belongs to.
    ///
    /// Takes the session's next invoice ordinal and adds the order's totals
    /// to the session accounting.
    #[allow(clippy::too_many_arguments)]
    pub fn place(
        store: &Store,
        session: &mut Session,
        created_by: Uuid,
        input: CreateOrder,
        priced: PricedOrder,
        local: NaiveDateTime,
        now: DateTime<Utc>,
    ) -> AppResult<Self> {
        if !session.is_open_at(now) {
            return Err(AppError::rule("No active session for this store"));
        }
        let invoice = invoice_id(&store.code, local, session.next_invoice_ordinal());
        let placed = Self::assemble(store, session, created_by, input, priced, invoice, now);
        session.record_order(&placed.order.totals());
        Ok(placed)
    }

    /// Assemble a pending order from its priced lines.
    pub fn assemble(
        store: &Store,
        session: &Session,
        created_by: Uuid,
        input: CreateOrder,
        priced: PricedOrder,
        invoice_id: String,
        now: DateTime<Utc>,
    ) -> Self {
        let order_id = Uuid::new_v4();
        let mut details = Vec::new();
        for line in &priced.lines {
            let parent = OrderDetail::from_line(order_id, line, None);
            let parent_id = parent.id;
            details.push(parent);
            details.extend(
                line.extras
                    .iter()
                    .map(|extra| OrderDetail::from_line(order_id, extra, Some(parent_id))),
            );
        }

        let promotions = priced
            .promotions
            .iter()
            .map(|applied| {
                PromotionOrderMapping::new(order_id, applied.promotion_id, applied.discount_amount)
            })
            .collect();

        let totals = priced.totals;
        let order = Order {
            id: order_id,
            brand_id: store.brand_id,
            store_id: store.id,
            session_id: session.id,
            invoice_id,
            order_type: input.order_type,
            payment_type: input.payment_type.unwrap_or(PaymentType::Cash),
            status: OrderStatus::Pending,
            total_amount: totals.total_amount,
            line_discount: totals.line_discount,
            promotion_discount: totals.promotion_discount,
            discount: totals.discount,
            vat_rate: totals.vat_rate,
            vat_amount: totals.vat_amount,
            final_amount: totals.final_amount,
            number_of_guests: input.number_of_guests.unwrap_or(1),
            note: input.note,
            created_by,
            checkin_date: now,
            created_at: now,
            updated_at: now,
        };

        Self {
            customer: input.customer.map(|customer| OrderUser::new(order_id, customer)),
            history: OrderHistory::new(
                order_id,
                None,
                OrderStatus::Pending,
                Some(created_by),
                None,
            ),
            order,
            details,
            promotions,
        }
    }
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrder {
    pub order_type: OrderType,
    /// Defaults to CASH
    pub payment_type: Option<PaymentType>,
    #[validate(length(min = 1, message = "An order needs at least one line"), nested)]
    pub lines: Vec<OrderLineInput>,
    /// Applied in this order
    #[serde(default)]
    pub promotion_ids: Vec<Uuid>,
    #[validate(nested)]
    pub customer: Option<OrderCustomerInput>,
    #[validate(range(min = 1, message = "Number of guests must be at least 1"))]
    pub number_of_guests: Option<i32>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderLineInput {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    pub note: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub extras: Vec<OrderExtraInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderExtraInput {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct OrderCustomerInput {
    /// Member to credit loyalty points to
    pub user_id: Option<Uuid>,
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateOrder {
    pub status: OrderStatus,
    pub payment_type: Option<PaymentType>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub order_type: Option<OrderType>,
    pub payment_type: Option<PaymentType>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// Invoice id substring
    pub invoice_id: Option<String>,
}

// =============================================================================
// Views
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderWithDetails {
    #[serde(flatten)]
    pub order: Order,
    pub details: Vec<OrderDetail>,
    pub promotions: Vec<PromotionOrderMapping>,
    pub customer: Option<OrderUser>,
    pub history: Vec<OrderHistory>,
}

impl From<NewOrder> for OrderWithDetails {
    fn from(placed: NewOrder) -> Self {
        Self {
            order: placed.order,
            details: placed.details,
            promotions: placed.promotions,
            customer: placed.customer,
            history: vec![placed.history],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReportBucket {
    pub key: String,
    pub orders: u64,
    pub final_amount: f64,
}

/// Store sales within a time range. Money totals exclude cancelled orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StoreReport {
    pub store_id: Uuid,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub total_orders: u64,
    pub total_amount: f64,
    pub total_discount: f64,
    pub total_vat: f64,
    pub total_final_amount: f64,
    pub by_payment_type: Vec<ReportBucket>,
    pub by_status: Vec<ReportBucket>,
}

impl StoreReport {
    pub fn from_orders(
        store_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        orders: &[Order],
    ) -> Self {
        let counted: Vec<&Order> = orders
            .iter()
            .filter(|order| order.status != OrderStatus::Canceled)
            .collect();
        let sum = |f: fn(&Order) -> f64| round_money(counted.iter().map(|o| f(o)).sum());

        let by_payment_type = PaymentType::ALL
            .iter()
            .map(|payment| bucket(payment.as_str(), counted.iter().copied().filter(|o| o.payment_type == *payment)))
            .filter(|b| b.orders > 0)
            .collect();
        let by_status = OrderStatus::ALL
            .iter()
            .map(|status| bucket(status.as_str(), orders.iter().filter(|o| o.status == *status)))
            .filter(|b| b.orders > 0)
            .collect();

        Self {
            store_id,
            from,
            to,
            total_orders: counted.len() as u64,
            total_amount: sum(|o| o.total_amount),
            total_discount: sum(|o| o.discount),
            total_vat: sum(|o| o.vat_amount),
            total_final_amount: sum(|o| o.final_amount),
            by_payment_type,
            by_status,
        }
    }
}

fn bucket<'a>(key: &str, orders: impl Iterator<Item = &'a Order>) -> ReportBucket {
    orders.fold(
        ReportBucket {
            key: key.to_string(),
            ..Default::default()
        },
        |mut acc, order| {
            acc.orders += 1;
            acc.final_amount = round_money(acc.final_amount + order.final_amount);
            acc
        },
    )
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}
