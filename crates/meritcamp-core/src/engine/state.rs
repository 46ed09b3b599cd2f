use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{
    Assignment, Badge, Event, Offering, Preference, Purchasable, Purchase, Registration, Scout,
    User,
};

/// Every stored entity. Ids come from one shared counter.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct State {
    last_id: i64,
    pub users: BTreeMap<i64, User>,
    pub scouts: BTreeMap<i64, Scout>,
    pub events: BTreeMap<i64, Event>,
    pub current_event: Option<i64>,
    pub badges: BTreeMap<i64, Badge>,
    pub offerings: BTreeMap<i64, Offering>,
    pub registrations: BTreeMap<i64, Registration>,
    pub assignments: Vec<Assignment>,
    pub preferences: Vec<Preference>,
    pub purchasables: BTreeMap<i64, Purchasable>,
    pub purchases: BTreeMap<i64, Purchase>,
}

impl State {
    pub fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    // ===== Lookups =====

    pub fn user(&self, id: i64) -> Result<&User> {
        self.users
            .get(&id)
            .ok_or_else(|| Error::NotFound(format!("user {}", id)))
    }

    pub fn event(&self, id: i64) -> Result<&Event> {
        self.events
            .get(&id)
            .ok_or_else(|| Error::NotFound(format!("event {}", id)))
    }

    pub fn badge(&self, id: i64) -> Result<&Badge> {
        self.badges
            .get(&id)
            .ok_or_else(|| Error::NotFound(format!("badge {}", id)))
    }

    pub fn scout(&self, id: i64) -> Result<&Scout> {
        self.scouts
            .get(&id)
            .ok_or_else(|| Error::NotFound(format!("scout {}", id)))
    }

    /// An offering, required to belong to the given event
    pub fn offering_in(&self, event_id: i64, offering_id: i64) -> Result<&Offering> {
        self.offerings
            .get(&offering_id)
            .filter(|o| o.event_id == event_id)
            .ok_or_else(|| {
                Error::NotFound(format!("offering {} in event {}", offering_id, event_id))
            })
    }

    /// A purchasable, required to belong to the given event
    pub fn purchasable_in(&self, event_id: i64, purchasable_id: i64) -> Result<&Purchasable> {
        self.purchasables
            .get(&purchasable_id)
            .filter(|p| p.event_id == event_id)
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "purchasable {} in event {}",
                    purchasable_id, event_id
                ))
            })
    }

    /// A registration, required to belong to the given scout
    pub fn registration_of(&self, scout_id: i64, registration_id: i64) -> Result<&Registration> {
        self.registrations
            .get(&registration_id)
            .filter(|r| r.scout_id == scout_id)
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "registration {} for scout {}",
                    registration_id, scout_id
                ))
            })
    }

    /// A purchase, required to belong to the given registration
    pub fn purchase_of(&self, registration_id: i64, purchase_id: i64) -> Result<&Purchase> {
        self.purchases
            .get(&purchase_id)
            .filter(|p| p.registration_id == registration_id)
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "purchase {} in registration {}",
                    purchase_id, registration_id
                ))
            })
    }

    pub fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(email) && Some(u.id) != except)
    }

    pub fn assignments_of(&self, registration_id: i64) -> impl Iterator<Item = &Assignment> {
        self.assignments
            .iter()
            .filter(move |a| a.registration_id == registration_id)
    }

    pub fn preferences_of(&self, registration_id: i64) -> impl Iterator<Item = &Preference> {
        self.preferences
            .iter()
            .filter(move |p| p.registration_id == registration_id)
    }

    pub fn purchases_of(&self, registration_id: i64) -> impl Iterator<Item = &Purchase> {
        self.purchases
            .values()
            .filter(move |p| p.registration_id == registration_id)
    }

    pub fn registrations_for_event(&self, event_id: i64) -> impl Iterator<Item = &Registration> {
        self.registrations
            .values()
            .filter(move |r| r.event_id == event_id)
    }

    /// Scouts assigned to an offering during a period, optionally ignoring
    /// one registration (when it is changing its own periods)
    pub fn enrolled(&self, offering_id: i64, period: u8, excluding: Option<i64>) -> usize {
        self.assignments
            .iter()
            .filter(|a| {
                a.offering_id == offering_id
                    && a.periods.contains(&period)
                    && Some(a.registration_id) != excluding
            })
            .count()
    }

    /// Quantity of a purchasable bought across all registrations, optionally
    /// ignoring one purchase (when it is being updated)
    pub fn purchased_quantity(&self, purchasable_id: i64, excluding: Option<i64>) -> u64 {
        self.purchases
            .values()
            .filter(|p| p.purchasable_id == purchasable_id && Some(p.id) != excluding)
            .map(|p| u64::from(p.quantity))
            .sum()
    }

    // ===== Cascading removal =====

    pub fn remove_registration(&mut self, id: i64) {
        self.registrations.remove(&id);
        self.assignments.retain(|a| a.registration_id != id);
        self.preferences.retain(|p| p.registration_id != id);
        self.purchases.retain(|_, p| p.registration_id != id);
    }

    pub fn remove_offering(&mut self, id: i64) {
        self.offerings.remove(&id);
        self.assignments.retain(|a| a.offering_id != id);
        self.preferences.retain(|p| p.offering_id != id);
    }

    pub fn remove_purchasable(&mut self, id: i64) {
        self.purchasables.remove(&id);
        self.purchases.retain(|_, p| p.purchasable_id != id);
    }

    pub fn remove_scout(&mut self, id: i64) {
        let registrations: Vec<i64> = self
            .registrations
            .values()
            .filter(|r| r.scout_id == id)
            .map(|r| r.id)
            .collect();
        for registration in registrations {
            self.remove_registration(registration);
        }
        self.scouts.remove(&id);
    }

    pub fn remove_event(&mut self, id: i64) {
        let registrations: Vec<i64> = self.registrations_for_event(id).map(|r| r.id).collect();
        for registration in registrations {
            self.remove_registration(registration);
        }
        let offerings: Vec<i64> = self
            .offerings
            .values()
            .filter(|o| o.event_id == id)
            .map(|o| o.id)
            .collect();
        for offering in offerings {
            self.remove_offering(offering);
        }
        let purchasables: Vec<i64> = self
            .purchasables
            .values()
            .filter(|p| p.event_id == id)
            .map(|p| p.id)
            .collect();
        for purchasable in purchasables {
            self.remove_purchasable(purchasable);
        }
        self.events.remove(&id);
        if self.current_event == Some(id) {
            self.current_event = None;
        }
    }

    pub fn remove_user(&mut self, id: i64) {
        let scouts: Vec<i64> = self
            .scouts
            .values()
            .filter(|s| s.user_id == id)
            .map(|s| s.id)
            .collect();
        for scout in scouts {
            self.remove_scout(scout);
        }
        self.users.remove(&id);
    }
}
