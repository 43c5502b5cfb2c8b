//! Types shared by several aggregates.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, Utc};

use crate::config::DEFAULT_BUSINESS_UTC_OFFSET_HOURS;
use crate::errors::{AppError, AppResult};

string_enum! {
    /// Lifecycle status carried by most catalog and tenant rows
    pub enum EntityStatus {
        Active => "ACTIVE",
        Deactivate => "DEACTIVATE",
    }
}

impl EntityStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, EntityStatus::Active)
    }
}

impl Default for EntityStatus {
    fn default() -> Self {
        EntityStatus::Active
    }
}

/// Wall clock of the stores.
///
/// Menus, sessions and invoice numbers are expressed in store-local time,
/// while everything is stored in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessClock {
    offset: FixedOffset,
}

impl BusinessClock {
    /// Build a clock `offset_hours` east of UTC.
    pub fn new(offset_hours: i32) -> AppResult<Self> {
        FixedOffset::east_opt(offset_hours * 3600)
            .map(|offset| Self { offset })
            .ok_or_else(|| AppError::validation(format!("Invalid UTC offset: {}", offset_hours)))
    }

    /// Local wall time for a UTC instant.
    pub fn local(&self, at: DateTime<Utc>) -> NaiveDateTime {
        at.with_timezone(&self.offset).naive_local()
    }
}

impl Default for BusinessClock {
    fn default() -> Self {
        Self {
            offset: FixedOffset::east_opt(DEFAULT_BUSINESS_UTC_OFFSET_HOURS * 3600)
                .unwrap_or_else(|| Utc.fix()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn status_round_trips_through_storage_form() {
        assert_eq!("ACTIVE".parse::<EntityStatus>().unwrap(), EntityStatus::Active);
        assert_eq!(EntityStatus::Deactivate.as_str(), "DEACTIVATE");
        assert!("active".parse::<EntityStatus>().is_err());
    }

    #[test]
    fn clock_shifts_into_local_time() {
        let clock = BusinessClock::new(7).unwrap();
        let utc = Utc.with_ymd_and_hms(2024, 5, 1, 20, 30, 0).unwrap();
        let local = clock.local(utc);
        assert_eq!(local.hour(), 3);
        assert_eq!(local.date(), chrono::NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
    }

    #[test]
    fn clock_rejects_out_of_range_offset() {
        assert!(BusinessClock::new(30).is_err());
        assert_eq!(BusinessClock::default(), BusinessClock::new(7).unwrap());
    }
}
