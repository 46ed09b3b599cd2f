//! Test data builders.
//!
//! Users are inserted straight into a [`Registry`] (any role, admin
//! included). Everything else goes through a [`Backend`], so the same
//! builders seed a local registry or a remote server. Independent entities
//! are created concurrently.
//!
//! [`seed_demo`] assembles a complete event for demos and manual testing.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, Utc};
use futures::future::try_join_all;
use tracing::info;

use crate::api::ApiResult;
use crate::backend::{Backend, LocalClient};
use crate::engine::Registry;
use crate::error::Result;
use crate::models::{
    Assignment, AssignmentInput, Badge, BadgeInput, Event, EventInput, NewUser, Offering,
    OfferingInput, Preference, PreferenceInput, Price, Profile, Purchasable, PurchasableInput,
    Purchase, PurchaseInput, Registration, RegistrationInput, Role, Scout, ScoutInput, Semester,
    Size,
};
use crate::rules::periods::LAST_PERIOD;

/// Password given to every fixture user
pub const DEFAULT_PASSWORD: &str = "password123";

/// Requirements given to every fixture offering
pub const DEFAULT_REQUIREMENTS: [&str; 4] = ["1", "2", "3a", "3b"];

static USER_COUNTER: AtomicU64 = AtomicU64::new(1);

/// A seeded user with a live session.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub profile: Profile,
    pub token: String,
    pub password: String,
}

impl TestUser {
    pub fn id(&self) -> i64 {
        self.profile.id
    }

    /// A backend acting as this user
    pub fn client(&self, registry: &Arc<Registry>) -> LocalClient {
        LocalClient::new(Arc::clone(registry)).with_token(self.token.clone())
    }
}

/// Seed a user with the given role and log them in
pub async fn create_user(registry: &Registry, role: Role) -> Result<TestUser> {
    let n = USER_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut details = BTreeMap::new();
    if role == Role::Coordinator {
        details.insert("troop".to_string(), format!("{}", 100 + n));
        details.insert("district".to_string(), "Pioneer".to_string());
        details.insert("council".to_string(), "Three Rivers".to_string());
    }
    let profile = registry
        .seed_user(NewUser {
            email: format!("{}{}@example.com", role, n),
            password: DEFAULT_PASSWORD.to_string(),
            firstname: format!("{}{}", role.as_str(), n),
            lastname: "Tester".to_string(),
            role,
            details,
        })
        .await?;
    let token = registry.issue_token(profile.id).await?;
    Ok(TestUser {
        profile,
        token,
        password: DEFAULT_PASSWORD.to_string(),
    })
}

/// Input for the `index`-th fixture event. Registration is open today and
/// every event lies in the future.
pub fn event_input(index: usize) -> EventInput {
    let today = Utc::now().date_naive();
    let year = today.year() + 1 + (index / 2) as i32;
    let (semester, month) = if index % 2 == 0 {
        (Semester::Spring, 4)
    } else {
        (Semester::Fall, 10)
    };
    let date = NaiveDate::from_ymd_opt(year, month, 15).unwrap_or(today + Duration::days(365));
    EventInput {
        year,
        semester,
        date,
        registration_open: today - Duration::days(30),
        registration_close: date - Duration::days(7),
        price: Price::from_dollars(10),
    }
}

/// Create `count` events after any that already exist (admin backend)
pub async fn create_events<B: Backend + ?Sized>(backend: &B, count: usize) -> ApiResult<Vec<Event>> {
    let existing = backend.list_events().await?.len();
    let inputs: Vec<EventInput> = (existing..existing + count).map(event_input).collect();
    try_join_all(inputs.iter().map(|input| backend.create_event(input))).await
}

/// Create one badge per name (admin backend)
pub async fn create_badges<B: Backend + ?Sized>(backend: &B, names: &[&str]) -> ApiResult<Vec<Badge>> {
    let inputs: Vec<BadgeInput> = names
        .iter()
        .map(|name| BadgeInput {
            name: name.to_string(),
            description: format!("{} merit badge", name),
            notes: None,
        })
        .collect();
    try_join_all(inputs.iter().map(|input| backend.create_badge(input))).await
}

/// Offer every badge at the event in all periods (admin backend)
pub async fn create_offerings<B: Backend + ?Sized>(
    backend: &B,
    event_id: i64,
    badges: &[Badge],
) -> ApiResult<Vec<Offering>> {
    let inputs: Vec<OfferingInput> = badges
        .iter()
        .map(|badge| OfferingInput {
            badge_id: badge.id,
            price: Price::from_dollars(10),
            periods: (1..=LAST_PERIOD).collect(),
            duration: 1,
            requirements: DEFAULT_REQUIREMENTS.iter().map(|r| r.to_string()).collect(),
            size_limit: None,
        })
        .collect();
    try_join_all(
        inputs
            .iter()
            .map(|input| backend.create_offering(event_id, input)),
    )
    .await
}

/// Input for the `index`-th fixture scout, about twelve years old
pub fn scout_input(index: usize) -> ScoutInput {
    let today = Utc::now().date_naive();
    let birthday = today - Duration::days(12 * 365 + 30 * index as i64);
    ScoutInput {
        firstname: format!("Scout{}", index + 1),
        lastname: "Camper".to_string(),
        birthday,
        troop: Some("101".to_string()),
        notes: None,
        emergency_name: "Pat Camper".to_string(),
        emergency_relation: "Parent".to_string(),
        emergency_phone: "5551234567".to_string(),
    }
}

/// Create `count` scouts for a coordinator (the coordinator's or an admin's backend)
pub async fn create_scouts<B: Backend + ?Sized>(
    backend: &B,
    user_id: i64,
    count: usize,
) -> ApiResult<Vec<Scout>> {
    let inputs: Vec<ScoutInput> = (0..count).map(scout_input).collect();
    try_join_all(inputs.iter().map(|input| backend.create_scout(user_id, input))).await
}

/// Register every scout for the event
pub async fn register_scouts<B: Backend + ?Sized>(
    backend: &B,
    scouts: &[Scout],
    event_id: i64,
) -> ApiResult<Vec<Registration>> {
    let input = RegistrationInput {
        event_id,
        notes: None,
    };
    try_join_all(
        scouts
            .iter()
            .map(|scout| backend.create_registration(scout.id, &input)),
    )
    .await
}

/// A sized T-shirt, a lunch and an adult-only patch (admin backend)
pub async fn create_purchasables<B: Backend + ?Sized>(
    backend: &B,
    event_id: i64,
) -> ApiResult<Vec<Purchasable>> {
    let inputs = [
        PurchasableInput {
            item: "T-Shirt".to_string(),
            description: "Event T-shirt".to_string(),
            price: Price::from_dollars(15),
            has_size: true,
            minimum_age: None,
            maximum_age: None,
            purchaser_limit: None,
        },
        PurchasableInput {
            item: "Lunch".to_string(),
            description: "Pizza lunch".to_string(),
            price: Price::from_dollars(8),
            has_size: false,
            minimum_age: None,
            maximum_age: None,
            purchaser_limit: Some(100),
        },
        PurchasableInput {
            item: "Adult Patch".to_string(),
            description: "Staff patch".to_string(),
            price: Price::from_cents(350),
            has_size: false,
            minimum_age: Some(18),
            maximum_age: None,
            purchaser_limit: None,
        },
    ];
    try_join_all(
        inputs
            .iter()
            .map(|input| backend.create_purchasable(event_id, input)),
    )
    .await
}

/// Rank the offerings in the given order, starting at 1
pub async fn create_preferences<B: Backend + ?Sized>(
    backend: &B,
    scout_id: i64,
    registration_id: i64,
    offerings: &[Offering],
) -> ApiResult<Vec<Preference>> {
    let inputs: Vec<PreferenceInput> = offerings
        .iter()
        .enumerate()
        .map(|(i, offering)| PreferenceInput {
            offering_id: offering.id,
            rank: i as u32 + 1,
        })
        .collect();
    backend
        .set_preferences(scout_id, registration_id, &inputs)
        .await
}

/// Assign the scout to each offering in successive periods (admin backend).
/// At most one offering per period is used.
pub async fn create_assignments<B: Backend + ?Sized>(
    backend: &B,
    scout_id: i64,
    registration_id: i64,
    offerings: &[Offering],
) -> ApiResult<Vec<Assignment>> {
    let inputs: Vec<AssignmentInput> = offerings
        .iter()
        .zip(1..=LAST_PERIOD)
        .map(|(offering, period)| AssignmentInput {
            offering_id: offering.id,
            periods: vec![period],
        })
        .collect();
    try_join_all(
        inputs
            .iter()
            .map(|input| backend.create_assignment(scout_id, registration_id, input)),
    )
    .await
}

/// Buy one of each item without an age limit
pub async fn create_purchases<B: Backend + ?Sized>(
    backend: &B,
    scout_id: i64,
    registration_id: i64,
    purchasables: &[Purchasable],
) -> ApiResult<Vec<Purchase>> {
    let inputs: Vec<PurchaseInput> = purchasables
        .iter()
        .filter(|p| p.minimum_age.is_none() && p.maximum_age.is_none())
        .map(|p| PurchaseInput {
            purchasable_id: p.id,
            quantity: 1,
            size: p.has_size.then_some(Size::M),
        })
        .collect();
    try_join_all(
        inputs
            .iter()
            .map(|input| backend.create_purchase(scout_id, registration_id, input)),
    )
    .await
}

/// Badges offered by [`seed_demo`]
pub const DEMO_BADGES: [&str; 6] = [
    "Camping",
    "Chess",
    "Environmental Science",
    "First Aid",
    "Geocaching",
    "Space Exploration",
];

/// Users created by [`seed_demo`]
#[derive(Debug, Clone)]
pub struct DemoUsers {
    pub admin: TestUser,
    pub teacher: TestUser,
    pub coordinators: Vec<TestUser>,
}

/// Populate a registry with a current event, its catalog, two coordinators
/// with registered scouts, preferences, assignments and purchases.
pub async fn seed_demo(registry: &Arc<Registry>) -> anyhow::Result<DemoUsers> {
    let admin = create_user(registry, Role::Admin).await?;
    let teacher = create_user(registry, Role::Teacher).await?;
    let coordinators = vec![
        create_user(registry, Role::Coordinator).await?,
        create_user(registry, Role::Coordinator).await?,
    ];
    let backend = admin.client(registry);

    let events = create_events(&backend, 2).await?;
    let event = &events[0];
    backend.set_current_event(event.id).await?;
    let badges = create_badges(&backend, &DEMO_BADGES).await?;
    let offerings = create_offerings(&backend, event.id, &badges).await?;
    let purchasables = create_purchasables(&backend, event.id).await?;

    for (c, coordinator) in coordinators.iter().enumerate() {
        let client = coordinator.client(registry);
        let scouts = create_scouts(&client, coordinator.id(), 3).await?;
        let registrations = register_scouts(&client, &scouts, event.id).await?;
        for (i, (scout, registration)) in scouts.iter().zip(&registrations).enumerate() {
            // Rotate the catalog so scouts want different classes
            let mut ranked = offerings.clone();
            ranked.rotate_left((c * scouts.len() + i) % offerings.len());
            create_preferences(&client, scout.id, registration.id, &ranked).await?;
            create_purchases(&client, scout.id, registration.id, &purchasables).await?;
            create_assignments(&backend, scout.id, registration.id, &ranked[..3]).await?;
        }
    }

    info!(
        event_id = event.id,
        badges = badges.len(),
        coordinators = coordinators.len(),
        "Seeded demo data"
    );
    Ok(DemoUsers {
        admin,
        teacher,
        coordinators,
    })
}
