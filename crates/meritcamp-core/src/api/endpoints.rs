//! REST endpoints of the registration API.

use async_trait::async_trait;

use super::{ApiClient, ApiResult};
use crate::backend::Backend;
use crate::models::{
    Assignment, AssignmentInput, AssignmentUpdate, AuthResponse, Badge, BadgeInput, BadgeUpdate,
    CostSummary, Credentials, CurrentEventRequest, Event, EventInput, EventStats, EventUpdate,
    Offering, OfferingAssignees, OfferingInput, OfferingUpdate, Preference, PreferenceInput,
    PreferenceUpdate, Profile, ProfileUpdate, Purchasable, PurchasableInput, PurchasableUpdate,
    Purchase, PurchaseInput, PurchaseUpdate, Registration, RegistrationDetail,
    RegistrationInput, Role, Scout, ScoutInput, ScoutUpdate, SignupRequest, UserUpdate,
};

fn registration_path(scout_id: i64, registration_id: i64) -> String {
    format!("/api/scouts/{}/registrations/{}", scout_id, registration_id)
}

#[async_trait]
impl Backend for ApiClient {
    fn token(&self) -> Option<&str> {
        ApiClient::token(self)
    }

    fn set_token(&mut self, token: Option<String>) {
        ApiClient::set_token(self, token);
    }

    // ===== Accounts =====

    async fn signup(&mut self, request: &SignupRequest) -> ApiResult<AuthResponse> {
        let auth: AuthResponse = self.post("/api/signup", request).await?;
        ApiClient::set_token(self, Some(auth.token.clone()));
        Ok(auth)
    }

    async fn authenticate(&mut self, credentials: &Credentials) -> ApiResult<AuthResponse> {
        let auth: AuthResponse = self.post("/api/authenticate", credentials).await?;
        ApiClient::set_token(self, Some(auth.token.clone()));
        Ok(auth)
    }

    async fn profile(&self) -> ApiResult<Profile> {
        self.get("/api/profile").await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<Profile> {
        self.put("/api/profile", update).await
    }

    async fn list_users(&self, role: Option<Role>) -> ApiResult<Vec<Profile>> {
        match role {
            Some(role) => self.get(&format!("/api/users?role={}", role)).await,
            None => self.get("/api/users").await,
        }
    }

    async fn update_user(&self, user_id: i64, update: &UserUpdate) -> ApiResult<Profile> {
        self.put(&format!("/api/users/{}", user_id), update).await
    }

    async fn delete_user(&self, user_id: i64) -> ApiResult<()> {
        self.delete(&format!("/api/users/{}", user_id)).await
    }

    // ===== Events =====

    async fn list_events(&self) -> ApiResult<Vec<Event>> {
        self.get("/api/events").await
    }

    async fn get_event(&self, event_id: i64) -> ApiResult<Event> {
        self.get(&format!("/api/events/{}", event_id)).await
    }

    async fn create_event(&self, input: &EventInput) -> ApiResult<Event> {
        self.post("/api/events", input).await
    }

    async fn update_event(&self, event_id: i64, update: &EventUpdate) -> ApiResult<Event> {
        self.put(&format!("/api/events/{}", event_id), update).await
    }

    async fn delete_event(&self, event_id: i64) -> ApiResult<()> {
        self.delete(&format!("/api/events/{}", event_id)).await
    }

    async fn current_event(&self) -> ApiResult<Event> {
        self.get("/api/events/current").await
    }

    async fn set_current_event(&self, event_id: i64) -> ApiResult<Event> {
        self.post("/api/events/current", &CurrentEventRequest { id: event_id })
            .await
    }

    // ===== Badges =====

    async fn list_badges(&self) -> ApiResult<Vec<Badge>> {
        self.get("/api/badges").await
    }

    async fn get_badge(&self, badge_id: i64) -> ApiResult<Badge> {
        self.get(&format!("/api/badges/{}", badge_id)).await
    }

    async fn create_badge(&self, input: &BadgeInput) -> ApiResult<Badge> {
        self.post("/api/badges", input).await
    }

    async fn update_badge(&self, badge_id: i64, update: &BadgeUpdate) -> ApiResult<Badge> {
        self.put(&format!("/api/badges/{}", badge_id), update).await
    }

    async fn delete_badge(&self, badge_id: i64) -> ApiResult<()> {
        self.delete(&format!("/api/badges/{}", badge_id)).await
    }

    // ===== Offerings =====

    async fn list_offerings(&self, event_id: i64) -> ApiResult<Vec<Offering>> {
        self.get(&format!("/api/events/{}/offerings", event_id)).await
    }

    async fn create_offering(&self, event_id: i64, input: &OfferingInput) -> ApiResult<Offering> {
        self.post(&format!("/api/events/{}/offerings", event_id), input)
            .await
    }

    async fn update_offering(
        &self,
        event_id: i64,
        offering_id: i64,
        update: &OfferingUpdate,
    ) -> ApiResult<Offering> {
        let path = format!("/api/events/{}/offerings/{}", event_id, offering_id);
        self.put(&path, update).await
    }

    async fn delete_offering(&self, event_id: i64, offering_id: i64) -> ApiResult<()> {
        self.delete(&format!("/api/events/{}/offerings/{}", event_id, offering_id))
            .await
    }

    // ===== Purchasables =====

    async fn list_purchasables(&self, event_id: i64) -> ApiResult<Vec<Purchasable>> {
        self.get(&format!("/api/events/{}/purchasables", event_id)).await
    }

    async fn create_purchasable(
        &self,
        event_id: i64,
        input: &PurchasableInput,
    ) -> ApiResult<Purchasable> {
        self.post(&format!("/api/events/{}/purchasables", event_id), input)
            .await
    }

    async fn update_purchasable(
        &self,
        event_id: i64,
        purchasable_id: i64,
        update: &PurchasableUpdate,
    ) -> ApiResult<Purchasable> {
        let path = format!("/api/events/{}/purchasables/{}", event_id, purchasable_id);
        self.put(&path, update).await
    }

    async fn delete_purchasable(&self, event_id: i64, purchasable_id: i64) -> ApiResult<()> {
        self.delete(&format!(
            "/api/events/{}/purchasables/{}",
            event_id, purchasable_id
        ))
        .await
    }

    // ===== Scouts =====

    async fn list_scouts(&self, user_id: i64) -> ApiResult<Vec<Scout>> {
        self.get(&format!("/api/users/{}/scouts", user_id)).await
    }

    async fn create_scout(&self, user_id: i64, input: &ScoutInput) -> ApiResult<Scout> {
        self.post(&format!("/api/users/{}/scouts", user_id), input).await
    }

    async fn get_scout(&self, scout_id: i64) -> ApiResult<Scout> {
        self.get(&format!("/api/scouts/{}", scout_id)).await
    }

    async fn update_scout(&self, scout_id: i64, update: &ScoutUpdate) -> ApiResult<Scout> {
        self.put(&format!("/api/scouts/{}", scout_id), update).await
    }

    async fn delete_scout(&self, scout_id: i64) -> ApiResult<()> {
        self.delete(&format!("/api/scouts/{}", scout_id)).await
    }

    // ===== Registrations =====

    async fn list_registrations(&self, scout_id: i64) -> ApiResult<Vec<Registration>> {
        self.get(&format!("/api/scouts/{}/registrations", scout_id)).await
    }

    async fn create_registration(
        &self,
        scout_id: i64,
        input: &RegistrationInput,
    ) -> ApiResult<Registration> {
        self.post(&format!("/api/scouts/{}/registrations", scout_id), input)
            .await
    }

    async fn delete_registration(&self, scout_id: i64, registration_id: i64) -> ApiResult<()> {
        self.delete(&registration_path(scout_id, registration_id)).await
    }

    // ===== Assignments =====

    async fn list_assignments(
        &self,
        scout_id: i64,
        registration_id: i64,
    ) -> ApiResult<Vec<Assignment>> {
        let path = format!("{}/assignments", registration_path(scout_id, registration_id));
        self.get(&path).await
    }

    async fn create_assignment(
        &self,
        scout_id: i64,
        registration_id: i64,
        input: &AssignmentInput,
    ) -> ApiResult<Assignment> {
        let path = format!("{}/assignments", registration_path(scout_id, registration_id));
        self.post(&path, input).await
    }

    async fn update_assignment(
        &self,
        scout_id: i64,
        registration_id: i64,
        offering_id: i64,
        update: &AssignmentUpdate,
    ) -> ApiResult<Assignment> {
        let path = format!(
            "{}/assignments/{}",
            registration_path(scout_id, registration_id),
            offering_id
        );
        self.put(&path, update).await
    }

    async fn delete_assignment(
        &self,
        scout_id: i64,
        registration_id: i64,
        offering_id: i64,
    ) -> ApiResult<()> {
        let path = format!(
            "{}/assignments/{}",
            registration_path(scout_id, registration_id),
            offering_id
        );
        self.delete(&path).await
    }

    // ===== Preferences =====

    async fn list_preferences(
        &self,
        scout_id: i64,
        registration_id: i64,
    ) -> ApiResult<Vec<Preference>> {
        let path = format!("{}/preferences", registration_path(scout_id, registration_id));
        self.get(&path).await
    }

    async fn set_preferences(
        &self,
        scout_id: i64,
        registration_id: i64,
        preferences: &[PreferenceInput],
    ) -> ApiResult<Vec<Preference>> {
        let path = format!("{}/preferences", registration_path(scout_id, registration_id));
        self.post(&path, preferences).await
    }

    async fn update_preference(
        &self,
        scout_id: i64,
        registration_id: i64,
        offering_id: i64,
        update: &PreferenceUpdate,
    ) -> ApiResult<Preference> {
        let path = format!(
            "{}/preferences/{}",
            registration_path(scout_id, registration_id),
            offering_id
        );
        self.put(&path, update).await
    }

    async fn delete_preference(
        &self,
        scout_id: i64,
        registration_id: i64,
        offering_id: i64,
    ) -> ApiResult<()> {
        let path = format!(
            "{}/preferences/{}",
            registration_path(scout_id, registration_id),
            offering_id
        );
        self.delete(&path).await
    }

    // ===== Purchases =====

    async fn list_purchases(
        &self,
        scout_id: i64,
        registration_id: i64,
    ) -> ApiResult<Vec<Purchase>> {
        let path = format!("{}/purchases", registration_path(scout_id, registration_id));
        self.get(&path).await
    }

    async fn create_purchase(
        &self,
        scout_id: i64,
        registration_id: i64,
        input: &PurchaseInput,
    ) -> ApiResult<Purchase> {
        let path = format!("{}/purchases", registration_path(scout_id, registration_id));
        self.post(&path, input).await
    }

    async fn update_purchase(
        &self,
        scout_id: i64,
        registration_id: i64,
        purchase_id: i64,
        update: &PurchaseUpdate,
    ) -> ApiResult<Purchase> {
        let path = format!(
            "{}/purchases/{}",
            registration_path(scout_id, registration_id),
            purchase_id
        );
        self.put(&path, update).await
    }

    async fn delete_purchase(
        &self,
        scout_id: i64,
        registration_id: i64,
        purchase_id: i64,
    ) -> ApiResult<()> {
        let path = format!(
            "{}/purchases/{}",
            registration_path(scout_id, registration_id),
            purchase_id
        );
        self.delete(&path).await
    }

    // ===== Reports =====

    async fn offering_assignees(&self, event_id: i64) -> ApiResult<Vec<OfferingAssignees>> {
        self.get(&format!("/api/events/{}/offerings/assignees", event_id))
            .await
    }

    async fn event_registrations(&self, event_id: i64) -> ApiResult<Vec<RegistrationDetail>> {
        self.get(&format!("/api/events/{}/registrations", event_id)).await
    }

    async fn event_stats(&self, event_id: i64) -> ApiResult<EventStats> {
        self.get(&format!("/api/events/{}/stats", event_id)).await
    }

    async fn registration_cost(
        &self,
        scout_id: i64,
        registration_id: i64,
    ) -> ApiResult<CostSummary> {
        let path = format!("{}/cost", registration_path(scout_id, registration_id));
        self.get(&path).await
    }
}
