//! Cashier sessions: the shift windows orders are booked against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::pricing::{round_money, OrderTotals};
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Session {
    pub id: Uuid,
    pub store_id: Uuid,
    pub name: Option<String>,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    pub number_of_orders: i32,
    /// Invoice ordinals handed out so far; cancellations never give one back
    pub last_invoice_ordinal: i32,
    pub total_amount: f64,
    pub total_discount_amount: f64,
    pub total_final_amount: f64,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(store_id: Uuid, window: &SessionWindow, created_by: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            store_id,
            name: window.name.clone(),
            start_date_time: window.start_date_time,
            end_date_time: window.end_date_time,
            number_of_orders: 0,
            last_invoice_ordinal: 0,
            total_amount: 0.0,
            total_discount_amount: 0.0,
            total_final_amount: 0.0,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Half-open window: `start <= at < end`.
    pub fn is_open_at(&self, at: DateTime<Utc>) -> bool {
        self.start_date_time <= at && at < self.end_date_time
    }

    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_date_time < end && start < self.end_date_time
    }

    /// Ordinal of the next invoice issued in this session.
    pub fn next_invoice_ordinal(&self) -> i32 {
        self.last_invoice_ordinal + 1
    }

    /// Book a new order's totals into the session.
    pub fn record_order(&mut self, totals: &OrderTotals) {
        self.number_of_orders += 1;
        self.last_invoice_ordinal += 1;
        self.total_amount = round_money(self.total_amount + totals.total_amount);
        self.total_discount_amount = round_money(self.total_discount_amount + totals.discount);
        self.total_final_amount = round_money(self.total_final_amount + totals.final_amount);
        self.updated_at = Utc::now();
    }

    /// Take a cancelled order's totals back out. Counters never go negative
    /// and the invoice ordinal stays where it is.
    pub fn revert_order(&mut self, totals: &OrderTotals) {
        self.number_of_orders = (self.number_of_orders - 1).max(0);
        self.total_amount = round_money((self.total_amount - totals.total_amount).max(0.0));
        self.total_discount_amount =
            round_money((self.total_discount_amount - totals.discount).max(0.0));
        self.total_final_amount =
            round_money((self.total_final_amount - totals.final_amount).max(0.0));
        self.updated_at = Utc::now();
    }

    /// Move a session that has not started yet.
    ///
    /// `others` are the store's other sessions around the new window.
    pub fn reschedule(
        &mut self,
        update: UpdateSession,
        now: DateTime<Utc>,
        others: &[Session],
    ) -> AppResult<()> {
        if update.start_date_time.is_some() || update.end_date_time.is_some() {
            if self.start_date_time <= now {
                return Err(AppError::rule("A session that already started cannot be re-timed"));
            }
            let start = update.start_date_time.unwrap_or(self.start_date_time);
            let end = update.end_date_time.unwrap_or(self.end_date_time);
            if start >= end {
                return Err(AppError::validation("Session start must be before its end"));
            }
            if others
                .iter()
                .filter(|other| other.id != self.id)
                .any(|other| other.overlaps(start, end))
            {
                return Err(AppError::rule("Session overlaps an existing session"));
            }
            self.start_date_time = start;
            self.end_date_time = end;
        }
        if update.name.is_some() {
            self.name = update.name;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// One requested session window
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionWindow {
    #[schema(example = "Morning shift")]
    pub name: Option<String>,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSessions {
    #[validate(length(min = 1, message = "At least one session is required"))]
    pub sessions: Vec<SessionWindow>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSession {
    pub name: Option<String>,
    pub start_date_time: Option<DateTime<Utc>>,
    pub end_date_time: Option<DateTime<Utc>>,
}

/// Check requested windows against each other and the store's existing sessions.
pub fn validate_windows(windows: &[SessionWindow], existing: &[Session]) -> AppResult<()> {
    for (i, window) in windows.iter().enumerate() {
        if window.start_date_time >= window.end_date_time {
            return Err(AppError::validation(format!(
                "Session #{} must start before it ends",
                i + 1
            )));
        }
        let clashes_with_request = windows[..i].iter().any(|earlier| {
            earlier.start_date_time < window.end_date_time
                && window.start_date_time < earlier.end_date_time
        });
        if clashes_with_request {
            return Err(AppError::rule(format!(
                "Session #{} overlaps another requested session",
                i + 1
            )));
        }
        if existing
            .iter()
            .any(|session| session.overlaps(window.start_date_time, window.end_date_time))
        {
            return Err(AppError::rule(format!(
                "Session #{} overlaps an existing session",
                i + 1
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
    }

    fn window(start: u32, end: u32) -> SessionWindow {
        SessionWindow {
            name: None,
            start_date_time: at(start),
            end_date_time: at(end),
        }
    }

    fn totals(total: f64, discount: f64) -> OrderTotals {
        OrderTotals {
            total_amount: total,
            line_discount: discount,
            promotion_discount: 0.0,
            discount,
            vat_rate: 0.08,
            vat_amount: 0.0,
            final_amount: total - discount,
        }
    }

    #[test]
    fn open_window_is_half_open() {
        let session = Session::new(Uuid::new_v4(), &window(8, 12), None);
        assert!(session.is_open_at(at(8)));
        assert!(session.is_open_at(at(11)));
        assert!(!session.is_open_at(at(12)));
    }

    #[test]
    fn accounting_adds_and_reverts() {
        let mut session = Session::new(Uuid::new_v4(), &window(8, 12), None);
        session.record_order(&totals(100_000.0, 10_000.0));
        session.record_order(&totals(50_000.0, 0.0));
        assert_eq!(session.number_of_orders, 2);
        assert_eq!(session.total_final_amount, 140_000.0);

        session.revert_order(&totals(100_000.0, 10_000.0));
        assert_eq!(session.number_of_orders, 1);
        assert_eq!(session.total_amount, 50_000.0);
        assert_eq!(session.total_discount_amount, 0.0);
    }

    #[test]
    fn cancellation_does_not_hand_back_an_invoice_ordinal() {
        let mut session = Session::new(Uuid::new_v4(), &window(8, 12), None);
        session.record_order(&totals(100_000.0, 0.0));
        session.record_order(&totals(50_000.0, 0.0));
        assert_eq!(session.next_invoice_ordinal(), 3);

        session.revert_order(&totals(50_000.0, 0.0));
        assert_eq!(session.number_of_orders, 1);
        assert_eq!(session.next_invoice_ordinal(), 3);

        session.record_order(&totals(20_000.0, 0.0));
        assert_eq!(session.next_invoice_ordinal(), 4);
    }

    #[test]
    fn revert_never_goes_negative() {
        let mut session = Session::new(Uuid::new_v4(), &window(8, 12), None);
        session.revert_order(&totals(10.0, 1.0));
        assert_eq!(session.number_of_orders, 0);
        assert_eq!(session.total_amount, 0.0);
    }

    #[test]
    fn windows_must_not_overlap() {
        let existing = vec![Session::new(Uuid::new_v4(), &window(8, 12), None)];
        assert!(validate_windows(&[window(12, 16), window(16, 20)], &existing).is_ok());
        assert!(matches!(
            validate_windows(&[window(11, 14)], &existing),
            Err(AppError::BusinessRule(_))
        ));
        assert!(matches!(
            validate_windows(&[window(13, 16), window(15, 18)], &[]),
            Err(AppError::BusinessRule(_))
        ));
        assert!(matches!(
            validate_windows(&[window(14, 13)], &[]),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn started_session_cannot_move() {
        let mut session = Session::new(Uuid::new_v4(), &window(8, 12), None);
        let update = UpdateSession {
            end_date_time: Some(at(13)),
            ..Default::default()
        };
        assert!(session.reschedule(update, at(9), &[]).is_err());

        let update = UpdateSession {
            end_date_time: Some(at(13)),
            ..Default::default()
        };
        let same = vec![session.clone()];
        session
            .reschedule(update, at(8) - Duration::hours(1), &same)
            .unwrap();
        assert_eq!(session.end_date_time, at(13));
    }
}
