//! Time period validation for offerings and assignments.

use crate::error::{Error, Result};

pub const FIRST_PERIOD: u8 = 1;
pub const LAST_PERIOD: u8 = 3;

/// Sort and dedupe, rejecting empty lists and out-of-range periods
pub fn normalize(periods: &[u8]) -> Result<Vec<u8>> {
    if periods.is_empty() {
        return Err(Error::bad_request("at least one period is required"));
    }
    if let Some(bad) = periods
        .iter()
        .find(|p| !(FIRST_PERIOD..=LAST_PERIOD).contains(*p))
    {
        return Err(Error::BadRequest(format!(
            "period {} is outside {}..={}",
            bad, FIRST_PERIOD, LAST_PERIOD
        )));
    }
    let mut sorted = periods.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    Ok(sorted)
}

/// Validate an offering's periods and duration
pub fn validate_offering(periods: &[u8], duration: u8) -> Result<Vec<u8>> {
    let periods = normalize(periods)?;
    if duration == 0 || duration > LAST_PERIOD {
        return Err(Error::BadRequest(format!(
            "duration must be between 1 and {}",
            LAST_PERIOD
        )));
    }
    if usize::from(duration) > periods.len() {
        return Err(Error::bad_request("duration is longer than the offered periods"));
    }
    Ok(periods)
}

/// Validate the periods requested for an assignment.
///
/// They must be offered by the class and must not collide with `taken`, the
/// periods already used by the registration's other assignments.
pub fn validate_assignment(requested: &[u8], offered: &[u8], taken: &[u8]) -> Result<Vec<u8>> {
    let requested = normalize(requested)?;
    if let Some(p) = requested.iter().find(|p| !offered.contains(p)) {
        return Err(Error::BadRequest(format!("offering does not meet in period {}", p)));
    }
    if let Some(p) = requested.iter().find(|p| taken.contains(p)) {
        return Err(Error::BadRequest(format!(
            "scout is already assigned during period {}",
            p
        )));
    }
    Ok(requested)
}
