mod common;

use chrono::{Duration, Utc};
use common::{status, Camp};
use meritcamp_core::fixtures::{self, event_input, scout_input};
use meritcamp_core::models::{RegistrationInput, Role, ScoutUpdate};
use meritcamp_core::Backend;

fn register(event_id: i64) -> RegistrationInput {
    RegistrationInput {
        event_id,
        notes: Some("  ".to_string()),
    }
}

#[tokio::test]
async fn test_create_scout() {
    let camp = Camp::new(&[]).await;
    let (coordinator, client) = camp.user(Role::Coordinator).await;

    let scout = client
        .create_scout(coordinator.id(), &scout_input(0))
        .await
        .unwrap();
    assert_eq!(scout.user_id, coordinator.id());
    assert_eq!(scout.troop.as_deref(), Some("101"));
    assert_eq!(client.list_scouts(coordinator.id()).await.unwrap(), vec![scout.clone()]);
    assert_eq!(client.get_scout(scout.id).await.unwrap(), scout);

    // Admins may add scouts for a coordinator
    camp.admin()
        .create_scout(coordinator.id(), &scout_input(1))
        .await
        .unwrap();
    assert_eq!(client.list_scouts(coordinator.id()).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_scout_validation() {
    let camp = Camp::new(&[]).await;
    let (coordinator, client) = camp.user(Role::Coordinator).await;

    let mut unborn = scout_input(0);
    unborn.birthday = Utc::now().date_naive() + Duration::days(1);
    assert_eq!(status(client.create_scout(coordinator.id(), &unborn).await), Some(400));

    let mut no_contact = scout_input(0);
    no_contact.emergency_phone = " ".to_string();
    assert_eq!(status(client.create_scout(coordinator.id(), &no_contact).await), Some(400));

    let mut blank_troop = scout_input(0);
    blank_troop.troop = Some("".to_string());
    let scout = client
        .create_scout(coordinator.id(), &blank_troop)
        .await
        .unwrap();
    assert!(scout.troop.is_none());

    // Only coordinators own scouts
    let (teacher, _) = camp.user(Role::Teacher).await;
    let result = camp.admin().create_scout(teacher.id(), &scout_input(0)).await;
    assert_eq!(status(result), Some(400));
    assert_eq!(status(camp.admin().create_scout(9_999, &scout_input(0)).await), Some(404));
}

#[tokio::test]
async fn test_scouts_belong_to_their_coordinator() {
    let camp = Camp::new(&[]).await;
    let troop = camp.troop(1).await;
    let scout = &troop.scouts[0];
    let (other, other_client) = camp.user(Role::Coordinator).await;
    let (_, teacher) = camp.user(Role::Teacher).await;

    assert_eq!(status(other_client.get_scout(scout.id).await), Some(401));
    assert_eq!(status(other_client.list_scouts(troop.coordinator.id()).await), Some(401));
    assert_eq!(
        status(other_client.create_scout(troop.coordinator.id(), &scout_input(0)).await),
        Some(401)
    );
    assert_eq!(status(other_client.delete_scout(scout.id).await), Some(401));
    assert_eq!(status(teacher.get_scout(scout.id).await), Some(401));
    assert!(other_client.list_scouts(other.id()).await.unwrap().is_empty());

    let registration = troop.registrations[0].id;
    let delete = other_client.delete_registration(scout.id, registration).await;
    assert_eq!(status(delete), Some(401));
}

#[tokio::test]
async fn test_update_scout() {
    let camp = Camp::new(&[]).await;
    let troop = camp.troop(1).await;
    let scout = &troop.scouts[0];

    let updated = troop
        .client
        .update_scout(
            scout.id,
            &ScoutUpdate {
                lastname: Some("Ranger".to_string()),
                troop: Some("".to_string()),
                notes: Some("Allergic to peanuts".to_string()),
                ..ScoutUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.lastname, "Ranger");
    assert_eq!(updated.firstname, scout.firstname);
    assert!(updated.troop.is_none());
    assert_eq!(updated.notes.as_deref(), Some("Allergic to peanuts"));

    let blank = troop
        .client
        .update_scout(
            scout.id,
            &ScoutUpdate {
                firstname: Some(String::new()),
                ..ScoutUpdate::default()
            },
        )
        .await;
    assert_eq!(status(blank), Some(400));

    let future = troop
        .client
        .update_scout(
            scout.id,
            &ScoutUpdate {
                birthday: Some(Utc::now().date_naive() + Duration::days(30)),
                ..ScoutUpdate::default()
            },
        )
        .await;
    assert_eq!(status(future), Some(400));
    assert_eq!(troop.client.get_scout(scout.id).await.unwrap(), updated);
}

#[tokio::test]
async fn test_registration() {
    let camp = Camp::new(&[]).await;
    let (coordinator, client) = camp.user(Role::Coordinator).await;
    let scout = client
        .create_scout(coordinator.id(), &scout_input(0))
        .await
        .unwrap();

    let registration = client
        .create_registration(scout.id, &register(camp.event.id))
        .await
        .unwrap();
    assert_eq!(registration.event_id, camp.event.id);
    assert!(registration.notes.is_none());
    assert_eq!(
        client.list_registrations(scout.id).await.unwrap(),
        vec![registration.clone()]
    );

    let duplicate = client
        .create_registration(scout.id, &register(camp.event.id))
        .await;
    assert_eq!(status(duplicate), Some(400));
    assert_eq!(status(client.create_registration(scout.id, &register(9_999)).await), Some(404));

    client
        .delete_registration(scout.id, registration.id)
        .await
        .unwrap();
    assert!(client.list_registrations(scout.id).await.unwrap().is_empty());
    assert_eq!(
        status(client.delete_registration(scout.id, registration.id).await),
        Some(404)
    );
}

#[tokio::test]
async fn test_registration_window() {
    let camp = Camp::new(&[]).await;
    let admin = camp.admin();
    let today = Utc::now().date_naive();

    let mut closed = event_input(7);
    closed.registration_open = today - Duration::days(30);
    closed.registration_close = today - Duration::days(1);
    let closed = admin.create_event(&closed).await.unwrap();

    let mut upcoming = event_input(9);
    upcoming.registration_open = today + Duration::days(1);
    let upcoming = admin.create_event(&upcoming).await.unwrap();

    let troop = camp.troop(2).await;
    let scout = troop.scouts[0].id;
    assert_eq!(
        status(troop.client.create_registration(scout, &register(closed.id)).await),
        Some(400)
    );
    assert_eq!(
        status(troop.client.create_registration(scout, &register(upcoming.id)).await),
        Some(400)
    );

    // Admins register late additions
    admin
        .create_registration(scout, &register(closed.id))
        .await
        .unwrap();
    assert_eq!(troop.client.list_registrations(scout).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_scout_cascades() {
    let camp = Camp::new(&["Chess"]).await;
    let admin = camp.admin();
    let troop = camp.troop(2).await;
    let (scout_id, registration_id) = troop.ids(0);
    fixtures::create_preferences(&troop.client, scout_id, registration_id, &camp.offerings)
        .await
        .unwrap();
    fixtures::create_assignments(&admin, scout_id, registration_id, &camp.offerings)
        .await
        .unwrap();
    fixtures::create_purchases(&troop.client, scout_id, registration_id, &camp.purchasables)
        .await
        .unwrap();

    troop.client.delete_scout(scout_id).await.unwrap();
    assert_eq!(status(troop.client.get_scout(scout_id).await), Some(404));

    let stats = admin.event_stats(camp.event.id).await.unwrap();
    assert_eq!(stats.registrations, 1);
    assert_eq!(stats.assignments, 0);
    assert_eq!(stats.preferences, 0);
    assert_eq!(stats.purchases, 0);
}
