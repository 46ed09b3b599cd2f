use std::sync::Arc;

use async_trait::async_trait;

use super::Backend;
use crate::api::ApiResult;
use crate::engine::Registry;
use crate::models::{
    Assignment, AssignmentInput, AssignmentUpdate, AuthResponse, Badge, BadgeInput, BadgeUpdate,
    CostSummary, Credentials, Event, EventInput, EventStats, EventUpdate, Offering,
    OfferingAssignees, OfferingInput, OfferingUpdate, Preference, PreferenceInput,
    PreferenceUpdate, Profile, ProfileUpdate, Purchasable, PurchasableInput, PurchasableUpdate,
    Purchase, PurchaseInput, PurchaseUpdate, Registration, RegistrationDetail,
    RegistrationInput, Role, Scout, ScoutInput, ScoutUpdate, SignupRequest, UserUpdate,
};

/// A `Backend` calling a shared in-process `Registry` as one user.
///
/// Clone it and swap the token to act as several users against the same
/// registry.
#[derive(Clone)]
pub struct LocalClient {
    registry: Arc<Registry>,
    token: Option<String>,
}

impl LocalClient {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            token: None,
        }
    }

    /// A client for the same registry acting with another session
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            token: Some(token.into()),
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    fn auth(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

#[async_trait]
impl Backend for LocalClient {
    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    // ===== Accounts =====

    async fn signup(&mut self, request: &SignupRequest) -> ApiResult<AuthResponse> {
        let auth = self.registry.signup(request).await?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    async fn authenticate(&mut self, credentials: &Credentials) -> ApiResult<AuthResponse> {
        let auth = self.registry.authenticate(credentials).await?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    async fn profile(&self) -> ApiResult<Profile> {
        Ok(self.registry.profile(self.auth()).await?)
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<Profile> {
        Ok(self.registry.update_profile(self.auth(), update).await?)
    }

    async fn list_users(&self, role: Option<Role>) -> ApiResult<Vec<Profile>> {
        Ok(self.registry.list_users(self.auth(), role).await?)
    }

    async fn update_user(&self, user_id: i64, update: &UserUpdate) -> ApiResult<Profile> {
        Ok(self.registry.update_user(self.auth(), user_id, update).await?)
    }

    async fn delete_user(&self, user_id: i64) -> ApiResult<()> {
        Ok(self.registry.delete_user(self.auth(), user_id).await?)
    }

    // ===== Events =====

    async fn list_events(&self) -> ApiResult<Vec<Event>> {
        Ok(self.registry.list_events().await)
    }

    async fn get_event(&self, event_id: i64) -> ApiResult<Event> {
        Ok(self.registry.get_event(event_id).await?)
    }

    async fn create_event(&self, input: &EventInput) -> ApiResult<Event> {
        Ok(self.registry.create_event(self.auth(), input).await?)
    }

    async fn update_event(&self, event_id: i64, update: &EventUpdate) -> ApiResult<Event> {
        Ok(self.registry.update_event(self.auth(), event_id, update).await?)
    }

    async fn delete_event(&self, event_id: i64) -> ApiResult<()> {
        Ok(self.registry.delete_event(self.auth(), event_id).await?)
    }

    async fn current_event(&self) -> ApiResult<Event> {
        Ok(self.registry.current_event().await?)
    }

    async fn set_current_event(&self, event_id: i64) -> ApiResult<Event> {
        Ok(self.registry.set_current_event(self.auth(), event_id).await?)
    }

    // ===== Badges =====

    async fn list_badges(&self) -> ApiResult<Vec<Badge>> {
        Ok(self.registry.list_badges().await)
    }

    async fn get_badge(&self, badge_id: i64) -> ApiResult<Badge> {
        Ok(self.registry.get_badge(badge_id).await?)
    }

    async fn create_badge(&self, input: &BadgeInput) -> ApiResult<Badge> {
        Ok(self.registry.create_badge(self.auth(), input).await?)
    }

    async fn update_badge(&self, badge_id: i64, update: &BadgeUpdate) -> ApiResult<Badge> {
        Ok(self.registry.update_badge(self.auth(), badge_id, update).await?)
    }

    async fn delete_badge(&self, badge_id: i64) -> ApiResult<()> {
        Ok(self.registry.delete_badge(self.auth(), badge_id).await?)
    }

    // ===== Offerings =====

    async fn list_offerings(&self, event_id: i64) -> ApiResult<Vec<Offering>> {
        Ok(self.registry.list_offerings(event_id).await?)
    }

    async fn create_offering(&self, event_id: i64, input: &OfferingInput) -> ApiResult<Offering> {
        Ok(self.registry.create_offering(self.auth(), event_id, input).await?)
    }

    async fn update_offering(
        &self,
        event_id: i64,
        offering_id: i64,
        update: &OfferingUpdate,
    ) -> ApiResult<Offering> {
        Ok(self
            .registry
            .update_offering(self.auth(), event_id, offering_id, update)
            .await?)
    }

    async fn delete_offering(&self, event_id: i64, offering_id: i64) -> ApiResult<()> {
        Ok(self
            .registry
            .delete_offering(self.auth(), event_id, offering_id)
            .await?)
    }

    // ===== Purchasables =====

    async fn list_purchasables(&self, event_id: i64) -> ApiResult<Vec<Purchasable>> {
        Ok(self.registry.list_purchasables(event_id).await?)
    }

    async fn create_purchasable(
        &self,
        event_id: i64,
        input: &PurchasableInput,
    ) -> ApiResult<Purchasable> {
        Ok(self
            .registry
            .create_purchasable(self.auth(), event_id, input)
            .await?)
    }

    async fn update_purchasable(
        &self,
        event_id: i64,
        purchasable_id: i64,
        update: &PurchasableUpdate,
    ) -> ApiResult<Purchasable> {
        Ok(self
            .registry
            .update_purchasable(self.auth(), event_id, purchasable_id, update)
            .await?)
    }

    async fn delete_purchasable(&self, event_id: i64, purchasable_id: i64) -> ApiResult<()> {
        Ok(self
            .registry
            .delete_purchasable(self.auth(), event_id, purchasable_id)
            .await?)
    }

    // ===== Scouts =====

    async fn list_scouts(&self, user_id: i64) -> ApiResult<Vec<Scout>> {
        Ok(self.registry.list_scouts(self.auth(), user_id).await?)
    }

    async fn create_scout(&self, user_id: i64, input: &ScoutInput) -> ApiResult<Scout> {
        Ok(self.registry.create_scout(self.auth(), user_id, input).await?)
    }

    async fn get_scout(&self, scout_id: i64) -> ApiResult<Scout> {
        Ok(self.registry.get_scout(self.auth(), scout_id).await?)
    }

    async fn update_scout(&self, scout_id: i64, update: &ScoutUpdate) -> ApiResult<Scout> {
        Ok(self.registry.update_scout(self.auth(), scout_id, update).await?)
    }

    async fn delete_scout(&self, scout_id: i64) -> ApiResult<()> {
        Ok(self.registry.delete_scout(self.auth(), scout_id).await?)
    }

    // ===== Registrations =====

    async fn list_registrations(&self, scout_id: i64) -> ApiResult<Vec<Registration>> {
        Ok(self.registry.list_registrations(self.auth(), scout_id).await?)
    }

    async fn create_registration(
        &self,
        scout_id: i64,
        input: &RegistrationInput,
    ) -> ApiResult<Registration> {
        Ok(self
            .registry
            .create_registration(self.auth(), scout_id, input)
            .await?)
    }

    async fn delete_registration(&self, scout_id: i64, registration_id: i64) -> ApiResult<()> {
        Ok(self
            .registry
            .delete_registration(self.auth(), scout_id, registration_id)
            .await?)
    }

    // ===== Assignments =====

    async fn list_assignments(
        &self,
        scout_id: i64,
        registration_id: i64,
    ) -> ApiResult<Vec<Assignment>> {
        Ok(self
            .registry
            .list_assignments(self.auth(), scout_id, registration_id)
            .await?)
    }

    async fn create_assignment(
        &self,
        scout_id: i64,
        registration_id: i64,
        input: &AssignmentInput,
    ) -> ApiResult<Assignment> {
        Ok(self
            .registry
            .create_assignment(self.auth(), scout_id, registration_id, input)
            .await?)
    }

    async fn update_assignment(
        &self,
        scout_id: i64,
        registration_id: i64,
        offering_id: i64,
        update: &AssignmentUpdate,
    ) -> ApiResult<Assignment> {
        Ok(self
            .registry
            .update_assignment(self.auth(), scout_id, registration_id, offering_id, update)
            .await?)
    }

    async fn delete_assignment(
        &self,
        scout_id: i64,
        registration_id: i64,
        offering_id: i64,
    ) -> ApiResult<()> {
        Ok(self
            .registry
            .delete_assignment(self.auth(), scout_id, registration_id, offering_id)
            .await?)
    }

    // ===== Preferences =====

    async fn list_preferences(
        &self,
        scout_id: i64,
        registration_id: i64,
    ) -> ApiResult<Vec<Preference>> {
        Ok(self
            .registry
            .list_preferences(self.auth(), scout_id, registration_id)
            .await?)
    }

    async fn set_preferences(
        &self,
        scout_id: i64,
        registration_id: i64,
        preferences: &[PreferenceInput],
    ) -> ApiResult<Vec<Preference>> {
        Ok(self
            .registry
            .set_preferences(self.auth(), scout_id, registration_id, preferences)
            .await?)
    }

    async fn update_preference(
        &self,
        scout_id: i64,
        registration_id: i64,
        offering_id: i64,
        update: &PreferenceUpdate,
    ) -> ApiResult<Preference> {
        Ok(self
            .registry
            .update_preference(self.auth(), scout_id, registration_id, offering_id, update)
            .await?)
    }

    async fn delete_preference(
        &self,
        scout_id: i64,
        registration_id: i64,
        offering_id: i64,
    ) -> ApiResult<()> {
        Ok(self
            .registry
            .delete_preference(self.auth(), scout_id, registration_id, offering_id)
            .await?)
    }

    // ===== Purchases =====

    async fn list_purchases(
        &self,
        scout_id: i64,
        registration_id: i64,
    ) -> ApiResult<Vec<Purchase>> {
        Ok(self
            .registry
            .list_purchases(self.auth(), scout_id, registration_id)
            .await?)
    }

    async fn create_purchase(
        &self,
        scout_id: i64,
        registration_id: i64,
        input: &PurchaseInput,
    ) -> ApiResult<Purchase> {
        Ok(self
            .registry
            .create_purchase(self.auth(), scout_id, registration_id, input)
            .await?)
    }

    async fn update_purchase(
        &self,
        scout_id: i64,
        registration_id: i64,
        purchase_id: i64,
        update: &PurchaseUpdate,
    ) -> ApiResult<Purchase> {
        Ok(self
            .registry
            .update_purchase(self.auth(), scout_id, registration_id, purchase_id, update)
            .await?)
    }

    async fn delete_purchase(
        &self,
        scout_id: i64,
        registration_id: i64,
        purchase_id: i64,
    ) -> ApiResult<()> {
        Ok(self
            .registry
            .delete_purchase(self.auth(), scout_id, registration_id, purchase_id)
            .await?)
    }

    // ===== Reports =====

    async fn offering_assignees(&self, event_id: i64) -> ApiResult<Vec<OfferingAssignees>> {
        Ok(self.registry.offering_assignees(self.auth(), event_id).await?)
    }

    async fn event_registrations(&self, event_id: i64) -> ApiResult<Vec<RegistrationDetail>> {
        Ok(self.registry.event_registrations(self.auth(), event_id).await?)
    }

    async fn event_stats(&self, event_id: i64) -> ApiResult<EventStats> {
        Ok(self.registry.event_stats(self.auth(), event_id).await?)
    }

    async fn registration_cost(
        &self,
        scout_id: i64,
        registration_id: i64,
    ) -> ApiResult<CostSummary> {
        Ok(self
            .registry
            .registration_cost(self.auth(), scout_id, registration_id)
            .await?)
    }
}
