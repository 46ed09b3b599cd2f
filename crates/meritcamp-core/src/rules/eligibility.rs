//! Who may register and purchase, and when.

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::models::{Event, Purchasable};

use super::Caller;

/// Non-admins may only register while the event's window is open
pub fn check_registration_window(event: &Event, today: NaiveDate, caller: &Caller) -> Result<()> {
    if caller.is_admin() || event.is_registration_open(today) {
        Ok(())
    } else {
        Err(Error::BadRequest(format!(
            "registration for {} is closed",
            event.label()
        )))
    }
}

/// Check a scout's age on the event date against a purchasable's window
pub fn check_age_window(purchasable: &Purchasable, age: i32) -> Result<()> {
    if let Some(min) = purchasable.minimum_age {
        if i64::from(age) < i64::from(min) {
            return Err(Error::BadRequest(format!(
                "{} requires a minimum age of {}",
                purchasable.item, min
            )));
        }
    }
    if let Some(max) = purchasable.maximum_age {
        if i64::from(age) > i64::from(max) {
            return Err(Error::BadRequest(format!(
                "{} allows a maximum age of {}",
                purchasable.item, max
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Price, Role, Semester};

    fn event() -> Event {
        Event {
            id: 1,
            year: 2026,
            semester: Semester::Fall,
            date: NaiveDate::from_ymd_opt(2026, 10, 10).unwrap(),
            registration_open: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            registration_close: NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
            price: Price::from_dollars(10),
        }
    }

    fn purchasable(min: Option<u32>, max: Option<u32>) -> Purchasable {
        Purchasable {
            id: 1,
            event_id: 1,
            item: "Lunch".to_string(),
            description: String::new(),
            price: Price::from_dollars(5),
            has_size: false,
            minimum_age: min,
            maximum_age: max,
            purchaser_limit: None,
        }
    }

    #[test]
    fn test_registration_window() {
        let coordinator = Caller { user_id: 2, role: Role::Coordinator };
        let admin = Caller { user_id: 1, role: Role::Admin };
        let late = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let open = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();

        assert!(check_registration_window(&event(), open, &coordinator).is_ok());
        assert!(check_registration_window(&event(), late, &coordinator).is_err());
        assert!(check_registration_window(&event(), late, &admin).is_ok());
    }

    #[test]
    fn test_age_window() {
        assert!(check_age_window(&purchasable(None, None), 5).is_ok());
        assert!(check_age_window(&purchasable(Some(12), None), 11).is_err());
        assert!(check_age_window(&purchasable(Some(12), Some(14)), 12).is_ok());
        assert!(check_age_window(&purchasable(Some(12), Some(14)), 14).is_ok());
        assert!(check_age_window(&purchasable(Some(12), Some(14)), 15).is_err());
    }

    #[test]
    fn test_age_window_extreme_bounds() {
        assert!(check_age_window(&purchasable(Some(u32::MAX), None), 12).is_err());
        assert!(check_age_window(&purchasable(None, Some(u32::MAX)), 12).is_ok());
        assert!(check_age_window(&purchasable(None, Some(10)), -1).is_ok());
    }
}
