//! The operations of the registration system, independent of transport.
//!
//! `Backend` is implemented by [`ApiClient`](crate::api::ApiClient), which
//! talks to a server over HTTP, and by [`LocalClient`], which calls an
//! in-process [`Registry`](crate::engine::Registry). Both report failures as
//! [`ApiError`] with the same status codes.

mod local;

use async_trait::async_trait;

use crate::api::ApiResult;
use crate::models::{
    Assignment, AssignmentInput, AssignmentUpdate, AuthResponse, Badge, BadgeInput, BadgeUpdate,
    CostSummary, Credentials, Event, EventInput, EventStats, EventUpdate, Offering,
    OfferingAssignees, OfferingInput, OfferingUpdate, Preference, PreferenceInput,
    PreferenceUpdate, Profile, ProfileUpdate, Purchasable, PurchasableInput, PurchasableUpdate,
    Purchase, PurchaseInput, PurchaseUpdate, Registration, RegistrationDetail,
    RegistrationInput, Role, Scout, ScoutInput, ScoutUpdate, SignupRequest, UserUpdate,
};

pub use local::LocalClient;

#[async_trait]
pub trait Backend: Send + Sync {
    /// Bearer token used for authenticated calls
    fn token(&self) -> Option<&str>;

    fn set_token(&mut self, token: Option<String>);

    // ===== Accounts =====

    /// Create an account and keep its session token
    async fn signup(&mut self, request: &SignupRequest) -> ApiResult<AuthResponse>;

    /// Log in and keep the session token
    async fn authenticate(&mut self, credentials: &Credentials) -> ApiResult<AuthResponse>;

    async fn profile(&self) -> ApiResult<Profile>;

    async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<Profile>;

    async fn list_users(&self, role: Option<Role>) -> ApiResult<Vec<Profile>>;

    async fn update_user(&self, user_id: i64, update: &UserUpdate) -> ApiResult<Profile>;

    async fn delete_user(&self, user_id: i64) -> ApiResult<()>;

    // ===== Events =====

    async fn list_events(&self) -> ApiResult<Vec<Event>>;

    async fn get_event(&self, event_id: i64) -> ApiResult<Event>;

    async fn create_event(&self, input: &EventInput) -> ApiResult<Event>;

    async fn update_event(&self, event_id: i64, update: &EventUpdate) -> ApiResult<Event>;

    async fn delete_event(&self, event_id: i64) -> ApiResult<()>;

    async fn current_event(&self) -> ApiResult<Event>;

    async fn set_current_event(&self, event_id: i64) -> ApiResult<Event>;

    // ===== Badges =====

    async fn list_badges(&self) -> ApiResult<Vec<Badge>>;

    async fn get_badge(&self, badge_id: i64) -> ApiResult<Badge>;

    async fn create_badge(&self, input: &BadgeInput) -> ApiResult<Badge>;

    async fn update_badge(&self, badge_id: i64, update: &BadgeUpdate) -> ApiResult<Badge>;

    async fn delete_badge(&self, badge_id: i64) -> ApiResult<()>;

    // ===== Offerings =====

    async fn list_offerings(&self, event_id: i64) -> ApiResult<Vec<Offering>>;

    async fn create_offering(&self, event_id: i64, input: &OfferingInput) -> ApiResult<Offering>;

    async fn update_offering(
        &self,
        event_id: i64,
        offering_id: i64,
        update: &OfferingUpdate,
    ) -> ApiResult<Offering>;

    async fn delete_offering(&self, event_id: i64, offering_id: i64) -> ApiResult<()>;

    // ===== Purchasables =====

    async fn list_purchasables(&self, event_id: i64) -> ApiResult<Vec<Purchasable>>;

    async fn create_purchasable(
        &self,
        event_id: i64,
        input: &PurchasableInput,
    ) -> ApiResult<Purchasable>;

    async fn update_purchasable(
        &self,
        event_id: i64,
        purchasable_id: i64,
        update: &PurchasableUpdate,
    ) -> ApiResult<Purchasable>;

    async fn delete_purchasable(&self, event_id: i64, purchasable_id: i64) -> ApiResult<()>;

    // ===== Scouts =====

    async fn list_scouts(&self, user_id: i64) -> ApiResult<Vec<Scout>>;

    async fn create_scout(&self, user_id: i64, input: &ScoutInput) -> ApiResult<Scout>;

    async fn get_scout(&self, scout_id: i64) -> ApiResult<Scout>;

    async fn update_scout(&self, scout_id: i64, update: &ScoutUpdate) -> ApiResult<Scout>;

    async fn delete_scout(&self, scout_id: i64) -> ApiResult<()>;

    // ===== Registrations =====

    async fn list_registrations(&self, scout_id: i64) -> ApiResult<Vec<Registration>>;

    async fn create_registration(
        &self,
        scout_id: i64,
        input: &RegistrationInput,
    ) -> ApiResult<Registration>;

    async fn delete_registration(&self, scout_id: i64, registration_id: i64) -> ApiResult<()>;

    // ===== Assignments =====

    async fn list_assignments(
        &self,
        scout_id: i64,
        registration_id: i64,
    ) -> ApiResult<Vec<Assignment>>;

    async fn create_assignment(
        &self,
        scout_id: i64,
        registration_id: i64,
        input: &AssignmentInput,
    ) -> ApiResult<Assignment>;

    async fn update_assignment(
        &self,
        scout_id: i64,
        registration_id: i64,
        offering_id: i64,
        update: &AssignmentUpdate,
    ) -> ApiResult<Assignment>;

    async fn delete_assignment(
        &self,
        scout_id: i64,
        registration_id: i64,
        offering_id: i64,
    ) -> ApiResult<()>;

    // ===== Preferences =====

    async fn list_preferences(
        &self,
        scout_id: i64,
        registration_id: i64,
    ) -> ApiResult<Vec<Preference>>;

    /// Replace the registration's preference list
    async fn set_preferences(
        &self,
        scout_id: i64,
        registration_id: i64,
        preferences: &[PreferenceInput],
    ) -> ApiResult<Vec<Preference>>;

    async fn update_preference(
        &self,
        scout_id: i64,
        registration_id: i64,
        offering_id: i64,
        update: &PreferenceUpdate,
    ) -> ApiResult<Preference>;

    async fn delete_preference(
        &self,
        scout_id: i64,
        registration_id: i64,
        offering_id: i64,
    ) -> ApiResult<()>;

    // ===== Purchases =====

    async fn list_purchases(&self, scout_id: i64, registration_id: i64)
        -> ApiResult<Vec<Purchase>>;

    async fn create_purchase(
        &self,
        scout_id: i64,
        registration_id: i64,
        input: &PurchaseInput,
    ) -> ApiResult<Purchase>;

    async fn update_purchase(
        &self,
        scout_id: i64,
        registration_id: i64,
        purchase_id: i64,
        update: &PurchaseUpdate,
    ) -> ApiResult<Purchase>;

    async fn delete_purchase(
        &self,
        scout_id: i64,
        registration_id: i64,
        purchase_id: i64,
    ) -> ApiResult<()>;

    // ===== Reports =====

    async fn offering_assignees(&self, event_id: i64) -> ApiResult<Vec<OfferingAssignees>>;

    async fn event_registrations(&self, event_id: i64) -> ApiResult<Vec<RegistrationDetail>>;

    async fn event_stats(&self, event_id: i64) -> ApiResult<EventStats>;

    async fn registration_cost(
        &self,
        scout_id: i64,
        registration_id: i64,
    ) -> ApiResult<CostSummary>;
}
