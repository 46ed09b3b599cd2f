//! Shared setup for the integration tests: a registry with an admin, one
//! open event and its catalog.

#![allow(dead_code)]

use std::sync::Arc;

use meritcamp_core::api::ApiResult;
use meritcamp_core::fixtures::{self, TestUser};
use meritcamp_core::models::{Event, Offering, Purchasable, Registration, Role, Scout};
use meritcamp_core::{Backend, LocalClient, Registry};

pub struct Camp {
    pub registry: Arc<Registry>,
    pub admin: TestUser,
    pub event: Event,
    pub offerings: Vec<Offering>,
    pub purchasables: Vec<Purchasable>,
}

impl Camp {
    /// An event offering the given badges, plus the fixture purchasables
    pub async fn new(badges: &[&str]) -> Self {
        let registry = Arc::new(Registry::default());
        let admin = fixtures::create_user(&registry, Role::Admin).await.unwrap();
        let backend = admin.client(&registry);

        let event = fixtures::create_events(&backend, 1).await.unwrap().remove(0);
        let badges = fixtures::create_badges(&backend, badges).await.unwrap();
        let offerings = fixtures::create_offerings(&backend, event.id, &badges)
            .await
            .unwrap();
        let purchasables = fixtures::create_purchasables(&backend, event.id).await.unwrap();

        Self {
            registry,
            admin,
            event,
            offerings,
            purchasables,
        }
    }

    pub fn admin(&self) -> LocalClient {
        self.admin.client(&self.registry)
    }

    pub async fn user(&self, role: Role) -> (TestUser, LocalClient) {
        let user = fixtures::create_user(&self.registry, role).await.unwrap();
        let client = user.client(&self.registry);
        (user, client)
    }

    /// A coordinator with `count` scouts registered for the event
    pub async fn troop(&self, count: usize) -> Troop {
        let (coordinator, client) = self.user(Role::Coordinator).await;
        let scouts = fixtures::create_scouts(&client, coordinator.id(), count)
            .await
            .unwrap();
        let registrations = fixtures::register_scouts(&client, &scouts, self.event.id)
            .await
            .unwrap();
        Troop {
            coordinator,
            client,
            scouts,
            registrations,
        }
    }

    pub fn purchasable(&self, item: &str) -> &Purchasable {
        self.purchasables
            .iter()
            .find(|p| p.item == item)
            .unwrap()
    }
}

pub struct Troop {
    pub coordinator: TestUser,
    pub client: LocalClient,
    pub scouts: Vec<Scout>,
    pub registrations: Vec<Registration>,
}

impl Troop {
    /// Scout and registration ids of the `i`-th scout
    pub fn ids(&self, i: usize) -> (i64, i64) {
        (self.scouts[i].id, self.registrations[i].id)
    }
}

/// Status code of a failed call
pub fn status<T: std::fmt::Debug>(result: ApiResult<T>) -> Option<u16> {
    result.unwrap_err().status()
}

/// A backend without a session
pub fn anonymous(registry: &Arc<Registry>) -> impl Backend {
    LocalClient::new(Arc::clone(registry))
}
