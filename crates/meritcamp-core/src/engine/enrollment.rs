use std::collections::HashSet;

use tracing::debug;

use super::state::State;
use super::Registry;
use crate::error::{Error, Result};
use crate::models::{
    Assignment, AssignmentInput, AssignmentUpdate, Offering, Preference, PreferenceInput,
    PreferenceUpdate, Registration,
};
use crate::rules::{access, capacity, completion, periods, Caller};

/// Owner-or-admin check for a scout, then the scout's registration
fn owned_registration(
    state: &State,
    caller: &Caller,
    scout_id: i64,
    registration_id: i64,
) -> Result<Registration> {
    access::require_owner_or_admin(caller, state.scout(scout_id)?.user_id)?;
    state.registration_of(scout_id, registration_id).cloned()
}

/// An offering that must be part of the registration's event
fn offering_for(state: &State, registration: &Registration, offering_id: i64) -> Result<Offering> {
    let offering = state
        .offerings
        .get(&offering_id)
        .ok_or_else(|| Error::NotFound(format!("offering {}", offering_id)))?;
    if offering.event_id != registration.event_id {
        return Err(Error::bad_request(
            "offering is not part of the registration's event",
        ));
    }
    Ok(offering.clone())
}

/// Periods used by a registration's assignments other than `offering_id`
fn periods_taken(state: &State, registration_id: i64, offering_id: i64) -> Vec<u8> {
    state
        .assignments_of(registration_id)
        .filter(|a| a.offering_id != offering_id)
        .flat_map(|a| a.periods.iter().copied())
        .collect()
}

/// Current enrollment of each requested period, ignoring `excluding`
fn enrollment_counts(
    state: &State,
    offering_id: i64,
    periods: &[u8],
    excluding: Option<i64>,
) -> Vec<(u8, usize)> {
    periods
        .iter()
        .map(|&p| (p, state.enrolled(offering_id, p, excluding)))
        .collect()
}

fn validate_ranks(preferences: &[PreferenceInput]) -> Result<()> {
    let mut ranks = HashSet::new();
    let mut offerings = HashSet::new();
    for preference in preferences {
        if preference.rank == 0 {
            return Err(Error::bad_request("rank must be at least 1"));
        }
        if !ranks.insert(preference.rank) {
            return Err(Error::BadRequest(format!("duplicate rank {}", preference.rank)));
        }
        if !offerings.insert(preference.offering_id) {
            return Err(Error::BadRequest(format!(
                "offering {} is listed more than once",
                preference.offering_id
            )));
        }
    }
    Ok(())
}

impl Registry {
    // ===== Assignments =====

    /// `GET /api/scouts/:id/registrations/:registration_id/assignments`
    pub async fn list_assignments(
        &self,
        token: Option<&str>,
        scout_id: i64,
        registration_id: i64,
    ) -> Result<Vec<Assignment>> {
        let caller = self.caller(token).await?;
        let state = self.state.read().await;
        access::require_owner_or_staff(&caller, state.scout(scout_id)?.user_id)?;
        state.registration_of(scout_id, registration_id)?;
        Ok(state.assignments_of(registration_id).cloned().collect())
    }

    /// `POST .../assignments` (admin).
    ///
    /// The offering must belong to the registration's event and meet in the
    /// requested periods, which must be free for the scout and have a seat
    /// left.
    pub async fn create_assignment(
        &self,
        token: Option<&str>,
        scout_id: i64,
        registration_id: i64,
        input: &AssignmentInput,
    ) -> Result<Assignment> {
        let caller = self.caller(token).await?;
        access::require_admin(&caller)?;

        let mut state = self.state.write().await;
        state.scout(scout_id)?;
        let registration = state.registration_of(scout_id, registration_id)?.clone();
        let offering = offering_for(&state, &registration, input.offering_id)?;
        if state
            .assignments_of(registration_id)
            .any(|a| a.offering_id == offering.id)
        {
            return Err(Error::bad_request("scout is already assigned to this offering"));
        }

        let taken = periods_taken(&state, registration_id, offering.id);
        let periods = periods::validate_assignment(&input.periods, &offering.periods, &taken)?;
        let counts = enrollment_counts(&state, offering.id, &periods, None);
        if let Err(err) = capacity::check_class_size(offering.size_limit, &counts) {
            debug!(offering_id = offering.id, registration_id, "Class is full");
            return Err(err);
        }

        let assignment = Assignment {
            registration_id,
            offering_id: offering.id,
            periods,
            completions: completion::initial(&offering.requirements),
        };
        state.assignments.push(assignment.clone());
        debug!(registration_id, offering_id = offering.id, "Assignment created");
        Ok(assignment)
    }

    /// `PUT .../assignments/:offering_id`.
    ///
    /// Staff record completions. Moving an assignment to other periods is
    /// reserved to admins and rechecks the class size without counting the
    /// assignment itself.
    pub async fn update_assignment(
        &self,
        token: Option<&str>,
        scout_id: i64,
        registration_id: i64,
        offering_id: i64,
        update: &AssignmentUpdate,
    ) -> Result<Assignment> {
        let caller = self.caller(token).await?;
        access::require_staff(&caller)?;
        if update.periods.is_some() {
            access::require_admin(&caller)?;
        }

        let mut state = self.state.write().await;
        state.scout(scout_id)?;
        let registration = state.registration_of(scout_id, registration_id)?.clone();
        let offering = offering_for(&state, &registration, offering_id)?;
        let mut assignment = state
            .assignments_of(registration_id)
            .find(|a| a.offering_id == offering_id)
            .cloned()
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "assignment of offering {} in registration {}",
                    offering_id, registration_id
                ))
            })?;

        if let Some(ref requested) = update.periods {
            let taken = periods_taken(&state, registration_id, offering_id);
            let periods = periods::validate_assignment(requested, &offering.periods, &taken)?;
            let counts = enrollment_counts(&state, offering_id, &periods, Some(registration_id));
            capacity::check_class_size(offering.size_limit, &counts)?;
            assignment.periods = periods;
        }
        if let Some(ref completions) = update.completions {
            assignment.completions = completion::apply_update(&assignment.completions, completions)?;
        }

        if let Some(slot) = state
            .assignments
            .iter_mut()
            .find(|a| a.registration_id == registration_id && a.offering_id == offering_id)
        {
            *slot = assignment.clone();
        }
        debug!(
            registration_id,
            offering_id,
            completed = assignment.completed_count(),
            "Assignment updated"
        );
        Ok(assignment)
    }

    /// `DELETE .../assignments/:offering_id` (admin)
    pub async fn delete_assignment(
        &self,
        token: Option<&str>,
        scout_id: i64,
        registration_id: i64,
        offering_id: i64,
    ) -> Result<()> {
        let caller = self.caller(token).await?;
        access::require_admin(&caller)?;

        let mut state = self.state.write().await;
        state.scout(scout_id)?;
        state.registration_of(scout_id, registration_id)?;
        let before = state.assignments.len();
        state
            .assignments
            .retain(|a| !(a.registration_id == registration_id && a.offering_id == offering_id));
        if state.assignments.len() == before {
            return Err(Error::NotFound(format!(
                "assignment of offering {} in registration {}",
                offering_id, registration_id
            )));
        }
        Ok(())
    }

    // ===== Preferences =====

    /// `GET .../preferences`, ordered by rank
    pub async fn list_preferences(
        &self,
        token: Option<&str>,
        scout_id: i64,
        registration_id: i64,
    ) -> Result<Vec<Preference>> {
        let caller = self.caller(token).await?;
        let state = self.state.read().await;
        access::require_owner_or_staff(&caller, state.scout(scout_id)?.user_id)?;
        state.registration_of(scout_id, registration_id)?;
        let mut preferences: Vec<Preference> =
            state.preferences_of(registration_id).cloned().collect();
        preferences.sort_by_key(|p| p.rank);
        Ok(preferences)
    }

    /// `POST .../preferences`. Replaces the registration's whole list.
    pub async fn set_preferences(
        &self,
        token: Option<&str>,
        scout_id: i64,
        registration_id: i64,
        preferences: &[PreferenceInput],
    ) -> Result<Vec<Preference>> {
        let caller = self.caller(token).await?;
        validate_ranks(preferences)?;

        let mut state = self.state.write().await;
        let registration = owned_registration(&state, &caller, scout_id, registration_id)?;
        for preference in preferences {
            offering_for(&state, &registration, preference.offering_id)?;
        }

        let mut created: Vec<Preference> = preferences
            .iter()
            .map(|p| Preference {
                registration_id,
                offering_id: p.offering_id,
                rank: p.rank,
            })
            .collect();
        created.sort_by_key(|p| p.rank);
        state
            .preferences
            .retain(|p| p.registration_id != registration_id);
        state.preferences.extend(created.iter().cloned());
        debug!(registration_id, count = created.len(), "Preferences replaced");
        Ok(created)
    }

    /// `PUT .../preferences/:offering_id`. The new rank must not be used by
    /// another preference of the registration.
    pub async fn update_preference(
        &self,
        token: Option<&str>,
        scout_id: i64,
        registration_id: i64,
        offering_id: i64,
        update: &PreferenceUpdate,
    ) -> Result<Preference> {
        let caller = self.caller(token).await?;
        if update.rank == 0 {
            return Err(Error::bad_request("rank must be at least 1"));
        }

        let mut state = self.state.write().await;
        owned_registration(&state, &caller, scout_id, registration_id)?;
        let clash = state
            .preferences_of(registration_id)
            .any(|p| p.offering_id != offering_id && p.rank == update.rank);
        if clash {
            return Err(Error::BadRequest(format!("duplicate rank {}", update.rank)));
        }
        let preference = state
            .preferences
            .iter_mut()
            .find(|p| p.registration_id == registration_id && p.offering_id == offering_id)
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "preference for offering {} in registration {}",
                    offering_id, registration_id
                ))
            })?;
        preference.rank = update.rank;
        Ok(preference.clone())
    }

    /// `DELETE .../preferences/:offering_id`
    pub async fn delete_preference(
        &self,
        token: Option<&str>,
        scout_id: i64,
        registration_id: i64,
        offering_id: i64,
    ) -> Result<()> {
        let caller = self.caller(token).await?;
        let mut state = self.state.write().await;
        owned_registration(&state, &caller, scout_id, registration_id)?;
        let before = state.preferences.len();
        state
            .preferences
            .retain(|p| !(p.registration_id == registration_id && p.offering_id == offering_id));
        if state.preferences.len() == before {
            return Err(Error::NotFound(format!(
                "preference for offering {} in registration {}",
                offering_id, registration_id
            )));
        }
        Ok(())
    }
}
