//! Read-only views assembled from several entities.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Assignment, Completions, Preference, Price, Purchase, Registration, Scout};

/// A scout on an offering's roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedScout {
    pub scout_id: i64,
    pub registration_id: i64,
    pub firstname: String,
    pub lastname: String,
    #[serde(default)]
    pub troop: Option<String>,
    #[serde(default)]
    pub completions: Completions,
}

/// Roster of one offering, grouped by period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferingAssignees {
    pub offering_id: i64,
    pub badge_id: i64,
    pub badge_name: String,
    pub size_limit: u32,
    pub periods: BTreeMap<u8, Vec<AssignedScout>>,
}

impl OfferingAssignees {
    pub fn total(&self) -> usize {
        self.periods.values().map(Vec::len).sum()
    }

    pub fn open_seats(&self, period: u8) -> u32 {
        let taken = self.periods.get(&period).map(Vec::len).unwrap_or(0);
        self.size_limit.saturating_sub(taken as u32)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeSummary {
    pub event_fees: Price,
    pub class_fees: Price,
    pub purchases: Price,
    pub total: Price,
}

/// Event-wide counters for administrators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStats {
    pub event_id: i64,
    pub registrations: usize,
    /// Distinct coordinators with at least one registered scout
    pub coordinators: usize,
    pub offerings: usize,
    pub assignments: usize,
    pub preferences: usize,
    pub purchases: usize,
    /// Assignments whose requirements are all complete
    pub completed_assignments: usize,
    pub requirements_completed: usize,
    pub income: IncomeSummary,
}

/// Projected and actual cost of a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostSummary {
    pub registration_id: i64,
    pub event_fee: Price,
    pub purchases: Price,
    /// Event fee, purchases and the classes the scout prefers
    pub projected: Price,
    /// Event fee, purchases and the classes the scout is assigned to
    pub actual: Price,
}

/// Everything about one registration, as shown on event rosters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationDetail {
    pub registration: Registration,
    pub scout: Scout,
    pub assignments: Vec<Assignment>,
    pub preferences: Vec<Preference>,
    pub purchases: Vec<Purchase>,
}
