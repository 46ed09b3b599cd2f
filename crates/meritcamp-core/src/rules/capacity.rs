//! Class-size and purchaser-limit admission checks.

use crate::error::{Error, Result};

/// Class size used when an offering does not set one.
pub const DEFAULT_CLASS_SIZE: u32 = 20;

/// Largest quantity a single purchase may order.
pub const MAX_QUANTITY: u32 = 1_000;

/// Check that one more scout fits in each requested period.
///
/// `enrolled` pairs each requested period with the number of scouts
/// already assigned to the offering in that period.
pub fn check_class_size(size_limit: u32, enrolled: &[(u8, usize)]) -> Result<()> {
    for &(period, count) in enrolled {
        if count + 1 > size_limit as usize {
            return Err(Error::BadRequest(format!(
                "class is full for period {} (limit {})",
                period, size_limit
            )));
        }
    }
    Ok(())
}

/// Check that `requested` more units fit under a purchasable's limit.
///
/// `already` is the quantity purchased by all other registrations. A limit
/// of `None` is unlimited.
pub fn check_purchaser_limit(limit: Option<u32>, already: u64, requested: u32) -> Result<()> {
    match limit {
        Some(limit) if already.saturating_add(u64::from(requested)) > u64::from(limit) => {
            Err(Error::BadRequest(format!(
                "purchaser limit reached ({} of {} taken)",
                already, limit
            )))
        }
        _ => Ok(()),
    }
}
