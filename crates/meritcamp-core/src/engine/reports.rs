use std::collections::{BTreeMap, HashSet};

use super::state::State;
use super::Registry;
use crate::error::Result;
use crate::models::{
    AssignedScout, CostSummary, EventStats, IncomeSummary, OfferingAssignees, Price,
    RegistrationDetail,
};
use crate::rules::access;

/// Price of a registration's purchases
fn purchases_total(state: &State, registration_id: i64) -> Price {
    state
        .purchases_of(registration_id)
        .filter_map(|p| {
            state
                .purchasables
                .get(&p.purchasable_id)
                .map(|item| item.price.times(p.quantity))
        })
        .sum()
}

fn offering_price(state: &State, offering_id: i64) -> Price {
    state
        .offerings
        .get(&offering_id)
        .map(|o| o.price)
        .unwrap_or(Price::ZERO)
}

impl Registry {
    /// `GET /api/events/:id/offerings/assignees` (staff).
    ///
    /// One roster per offering with an entry for every period the offering
    /// meets in, scouts ordered by last name.
    pub async fn offering_assignees(
        &self,
        token: Option<&str>,
        event_id: i64,
    ) -> Result<Vec<OfferingAssignees>> {
        let caller = self.caller(token).await?;
        access::require_staff(&caller)?;

        let state = self.state.read().await;
        state.event(event_id)?;
        let mut rosters = Vec::new();
        for offering in state.offerings.values().filter(|o| o.event_id == event_id) {
            let mut periods: BTreeMap<u8, Vec<AssignedScout>> =
                offering.periods.iter().map(|&p| (p, Vec::new())).collect();
            for assignment in state
                .assignments
                .iter()
                .filter(|a| a.offering_id == offering.id)
            {
                let Some(registration) = state.registrations.get(&assignment.registration_id)
                else {
                    continue;
                };
                let Some(scout) = state.scouts.get(&registration.scout_id) else {
                    continue;
                };
                for period in &assignment.periods {
                    periods.entry(*period).or_default().push(AssignedScout {
                        scout_id: scout.id,
                        registration_id: registration.id,
                        firstname: scout.firstname.clone(),
                        lastname: scout.lastname.clone(),
                        troop: scout.troop.clone(),
                        completions: assignment.completions.clone(),
                    });
                }
            }
            for scouts in periods.values_mut() {
                scouts.sort_by(|a, b| {
                    (a.lastname.as_str(), a.firstname.as_str())
                        .cmp(&(b.lastname.as_str(), b.firstname.as_str()))
                });
            }
            let badge_name = state
                .badges
                .get(&offering.badge_id)
                .map(|b| b.name.clone())
                .unwrap_or_default();
            rosters.push(OfferingAssignees {
                offering_id: offering.id,
                badge_id: offering.badge_id,
                badge_name,
                size_limit: offering.size_limit,
                periods,
            });
        }
        rosters.sort_by(|a, b| a.badge_name.cmp(&b.badge_name));
        Ok(rosters)
    }

    /// `GET /api/events/:id/registrations` (staff)
    pub async fn event_registrations(
        &self,
        token: Option<&str>,
        event_id: i64,
    ) -> Result<Vec<RegistrationDetail>> {
        let caller = self.caller(token).await?;
        access::require_staff(&caller)?;

        let state = self.state.read().await;
        state.event(event_id)?;
        let mut details = Vec::new();
        for registration in state.registrations_for_event(event_id) {
            let scout = state.scout(registration.scout_id)?.clone();
            let mut preferences: Vec<_> = state.preferences_of(registration.id).cloned().collect();
            preferences.sort_by_key(|p| p.rank);
            details.push(RegistrationDetail {
                registration: registration.clone(),
                scout,
                assignments: state.assignments_of(registration.id).cloned().collect(),
                preferences,
                purchases: state.purchases_of(registration.id).cloned().collect(),
            });
        }
        details.sort_by(|a, b| a.scout.display_name().cmp(&b.scout.display_name()));
        Ok(details)
    }

    /// `GET /api/events/:id/stats` (admin)
    pub async fn event_stats(&self, token: Option<&str>, event_id: i64) -> Result<EventStats> {
        let caller = self.caller(token).await?;
        access::require_admin(&caller)?;

        let state = self.state.read().await;
        let event = state.event(event_id)?;
        let registrations: Vec<i64> = state.registrations_for_event(event_id).map(|r| r.id).collect();

        let coordinators: HashSet<i64> = state
            .registrations_for_event(event_id)
            .filter_map(|r| state.scouts.get(&r.scout_id))
            .map(|s| s.user_id)
            .collect();
        let assignments: Vec<_> = registrations
            .iter()
            .flat_map(|&id| state.assignments_of(id))
            .collect();
        let preferences = registrations
            .iter()
            .map(|&id| state.preferences_of(id).count())
            .sum();
        let purchases = registrations
            .iter()
            .map(|&id| state.purchases_of(id).count())
            .sum();

        let event_fees = event
            .price
            .times(u32::try_from(registrations.len()).unwrap_or(u32::MAX));
        let class_fees: Price = assignments
            .iter()
            .map(|a| offering_price(&state, a.offering_id))
            .sum();
        let purchase_income: Price = registrations
            .iter()
            .map(|&id| purchases_total(&state, id))
            .sum();

        Ok(EventStats {
            event_id,
            registrations: registrations.len(),
            coordinators: coordinators.len(),
            offerings: state
                .offerings
                .values()
                .filter(|o| o.event_id == event_id)
                .count(),
            assignments: assignments.len(),
            preferences,
            purchases,
            completed_assignments: assignments.iter().filter(|a| a.is_complete()).count(),
            requirements_completed: assignments.iter().map(|a| a.completed_count()).sum(),
            income: IncomeSummary {
                event_fees,
                class_fees,
                purchases: purchase_income,
                total: event_fees + class_fees + purchase_income,
            },
        })
    }

    /// `GET .../registrations/:registration_id/cost`.
    ///
    /// The projected cost prices the preferred offerings, the actual cost
    /// prices the assigned ones. Both include the event fee and purchases.
    pub async fn registration_cost(
        &self,
        token: Option<&str>,
        scout_id: i64,
        registration_id: i64,
    ) -> Result<CostSummary> {
        let caller = self.caller(token).await?;
        let state = self.state.read().await;
        access::require_owner_or_staff(&caller, state.scout(scout_id)?.user_id)?;
        let registration = state.registration_of(scout_id, registration_id)?;
        let event_fee = state.event(registration.event_id)?.price;
        let purchases = purchases_total(&state, registration_id);

        let preferred: Price = state
            .preferences_of(registration_id)
            .map(|p| offering_price(&state, p.offering_id))
            .sum();
        let assigned: Price = state
            .assignments_of(registration_id)
            .map(|a| offering_price(&state, a.offering_id))
            .sum();

        Ok(CostSummary {
            registration_id,
            event_fee,
            purchases,
            projected: event_fee + preferred + purchases,
            actual: event_fee + assigned + purchases,
        })
    }
}
