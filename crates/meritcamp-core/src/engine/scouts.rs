use chrono::Utc;
use tracing::{debug, info};

use super::{required, Registry};
use crate::error::{Error, Result};
use crate::models::{Registration, RegistrationInput, Role, Scout, ScoutInput, ScoutUpdate};
use crate::rules::{access, eligibility};

/// Trim an optional text field, treating blanks as absent
fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl Registry {
    // ===== Scouts =====

    /// `GET /api/users/:id/scouts` (the coordinator or an admin)
    pub async fn list_scouts(&self, token: Option<&str>, user_id: i64) -> Result<Vec<Scout>> {
        let caller = self.caller(token).await?;
        access::require_owner_or_admin(&caller, user_id)?;
        let state = self.state.read().await;
        state.user(user_id)?;
        Ok(state
            .scouts
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    /// `POST /api/users/:id/scouts`. Only coordinators own scouts.
    pub async fn create_scout(
        &self,
        token: Option<&str>,
        user_id: i64,
        input: &ScoutInput,
    ) -> Result<Scout> {
        let caller = self.caller(token).await?;
        access::require_owner_or_admin(&caller, user_id)?;
        if input.birthday > Self::today() {
            return Err(Error::bad_request("birthday is in the future"));
        }
        let firstname = required("firstname", &input.firstname)?;
        let lastname = required("lastname", &input.lastname)?;
        let emergency_name = required("emergency_name", &input.emergency_name)?;
        let emergency_relation = required("emergency_relation", &input.emergency_relation)?;
        let emergency_phone = required("emergency_phone", &input.emergency_phone)?;

        let mut state = self.state.write().await;
        if state.user(user_id)?.role != Role::Coordinator {
            return Err(Error::bad_request("scouts can only be added to coordinators"));
        }
        let scout = Scout {
            id: state.next_id(),
            user_id,
            firstname,
            lastname,
            birthday: input.birthday,
            troop: optional(input.troop.as_deref()),
            notes: optional(input.notes.as_deref()),
            emergency_name,
            emergency_relation,
            emergency_phone,
        };
        state.scouts.insert(scout.id, scout.clone());
        debug!(scout_id = scout.id, user_id, "Scout created");
        Ok(scout)
    }

    /// `GET /api/scouts/:id`
    pub async fn get_scout(&self, token: Option<&str>, scout_id: i64) -> Result<Scout> {
        let caller = self.caller(token).await?;
        let state = self.state.read().await;
        let scout = state.scout(scout_id)?;
        access::require_owner_or_admin(&caller, scout.user_id)?;
        Ok(scout.clone())
    }

    /// `PUT /api/scouts/:id`
    pub async fn update_scout(
        &self,
        token: Option<&str>,
        scout_id: i64,
        update: &ScoutUpdate,
    ) -> Result<Scout> {
        let caller = self.caller(token).await?;
        let mut state = self.state.write().await;
        let mut scout = state.scout(scout_id)?.clone();
        access::require_owner_or_admin(&caller, scout.user_id)?;

        if let Some(ref firstname) = update.firstname {
            scout.firstname = required("firstname", firstname)?;
        }
        if let Some(ref lastname) = update.lastname {
            scout.lastname = required("lastname", lastname)?;
        }
        if let Some(birthday) = update.birthday {
            if birthday > Self::today() {
                return Err(Error::bad_request("birthday is in the future"));
            }
            scout.birthday = birthday;
        }
        if update.troop.is_some() {
            scout.troop = optional(update.troop.as_deref());
        }
        if update.notes.is_some() {
            scout.notes = optional(update.notes.as_deref());
        }
        if let Some(ref name) = update.emergency_name {
            scout.emergency_name = required("emergency_name", name)?;
        }
        if let Some(ref relation) = update.emergency_relation {
            scout.emergency_relation = required("emergency_relation", relation)?;
        }
        if let Some(ref phone) = update.emergency_phone {
            scout.emergency_phone = required("emergency_phone", phone)?;
        }
        state.scouts.insert(scout_id, scout.clone());
        Ok(scout)
    }

    /// `DELETE /api/scouts/:id`. Removes the scout's registrations.
    pub async fn delete_scout(&self, token: Option<&str>, scout_id: i64) -> Result<()> {
        let caller = self.caller(token).await?;
        let mut state = self.state.write().await;
        let owner = state.scout(scout_id)?.user_id;
        access::require_owner_or_admin(&caller, owner)?;
        state.remove_scout(scout_id);
        info!(scout_id, "Scout deleted");
        Ok(())
    }

    // ===== Registrations =====

    /// `GET /api/scouts/:id/registrations`
    pub async fn list_registrations(
        &self,
        token: Option<&str>,
        scout_id: i64,
    ) -> Result<Vec<Registration>> {
        let caller = self.caller(token).await?;
        let state = self.state.read().await;
        access::require_owner_or_admin(&caller, state.scout(scout_id)?.user_id)?;
        Ok(state
            .registrations
            .values()
            .filter(|r| r.scout_id == scout_id)
            .cloned()
            .collect())
    }

    /// `POST /api/scouts/:id/registrations`. One registration per scout per
    /// event, inside the event's registration window unless the caller is an
    /// admin.
    pub async fn create_registration(
        &self,
        token: Option<&str>,
        scout_id: i64,
        input: &RegistrationInput,
    ) -> Result<Registration> {
        let caller = self.caller(token).await?;
        let mut state = self.state.write().await;
        access::require_owner_or_admin(&caller, state.scout(scout_id)?.user_id)?;
        let event = state.event(input.event_id)?;
        eligibility::check_registration_window(event, Self::today(), &caller)?;

        let duplicate = state
            .registrations
            .values()
            .any(|r| r.scout_id == scout_id && r.event_id == input.event_id);
        if duplicate {
            return Err(Error::bad_request("scout is already registered for this event"));
        }
        let registration = Registration {
            id: state.next_id(),
            scout_id,
            event_id: input.event_id,
            notes: optional(input.notes.as_deref()),
            created_at: Utc::now(),
        };
        state
            .registrations
            .insert(registration.id, registration.clone());
        info!(
            registration_id = registration.id,
            scout_id,
            event_id = input.event_id,
            "Scout registered"
        );
        Ok(registration)
    }

    /// `DELETE /api/scouts/:id/registrations/:registration_id`. Removes the
    /// registration's assignments, preferences and purchases.
    pub async fn delete_registration(
        &self,
        token: Option<&str>,
        scout_id: i64,
        registration_id: i64,
    ) -> Result<()> {
        let caller = self.caller(token).await?;
        let mut state = self.state.write().await;
        access::require_owner_or_admin(&caller, state.scout(scout_id)?.user_id)?;
        state.registration_of(scout_id, registration_id)?;
        state.remove_registration(registration_id);
        info!(registration_id, scout_id, "Registration deleted");
        Ok(())
    }
}
