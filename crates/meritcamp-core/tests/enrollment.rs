mod common;

use common::{status, Camp};
use meritcamp_core::fixtures::{self, event_input, DEFAULT_REQUIREMENTS};
use meritcamp_core::models::{
    AssignmentInput, AssignmentUpdate, BadgeInput, Completions, OfferingInput,
    OfferingUpdate, PreferenceInput, PreferenceUpdate, Price, Role,
};
use meritcamp_core::Backend;

fn assign(offering_id: i64, periods: &[u8]) -> AssignmentInput {
    AssignmentInput {
        offering_id,
        periods: periods.to_vec(),
    }
}

fn completions(pairs: &[(&str, bool)]) -> Completions {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn rank(offering_id: i64, rank: u32) -> PreferenceInput {
    PreferenceInput { offering_id, rank }
}

// ===== Assignments =====

#[tokio::test]
async fn test_create_assignment() {
    let camp = Camp::new(&["Chess", "Cooking"]).await;
    let admin = camp.admin();
    let troop = camp.troop(1).await;
    let (scout_id, registration_id) = troop.ids(0);
    let chess = camp.offerings[0].id;

    let assignment = admin
        .create_assignment(scout_id, registration_id, &assign(chess, &[2]))
        .await
        .unwrap();
    assert_eq!(assignment.periods, vec![2]);
    assert_eq!(assignment.completions.len(), DEFAULT_REQUIREMENTS.len());
    assert!(assignment.completions.values().all(|done| !done));
    assert_eq!(
        troop
            .client
            .list_assignments(scout_id, registration_id)
            .await
            .unwrap(),
        vec![assignment]
    );

    // Only admins assign
    let denied = troop
        .client
        .create_assignment(scout_id, registration_id, &assign(camp.offerings[1].id, &[1]))
        .await;
    assert_eq!(status(denied), Some(401));

    let again = admin
        .create_assignment(scout_id, registration_id, &assign(chess, &[3]))
        .await;
    assert_eq!(status(again), Some(400));
}

#[tokio::test]
async fn test_assignment_periods() {
    let camp = Camp::new(&["Chess", "Cooking", "Hiking"]).await;
    let admin = camp.admin();
    let troop = camp.troop(1).await;
    let (scout_id, registration_id) = troop.ids(0);
    let [chess, cooking, hiking] = [0, 1, 2].map(|i| camp.offerings[i].id);

    admin
        .create_assignment(scout_id, registration_id, &assign(chess, &[1, 2]))
        .await
        .unwrap();

    // Period 2 is already taken by chess
    let overlap = admin
        .create_assignment(scout_id, registration_id, &assign(cooking, &[2]))
        .await;
    assert_eq!(status(overlap), Some(400));

    let outside = admin
        .create_assignment(scout_id, registration_id, &assign(cooking, &[4]))
        .await;
    assert_eq!(status(outside), Some(400));
    let none = admin
        .create_assignment(scout_id, registration_id, &assign(cooking, &[]))
        .await;
    assert_eq!(status(none), Some(400));

    admin
        .update_offering(
            camp.event.id,
            hiking,
            &OfferingUpdate {
                periods: Some(vec![1, 2]),
                ..OfferingUpdate::default()
            },
        )
        .await
        .unwrap();
    let not_offered = admin
        .create_assignment(scout_id, registration_id, &assign(hiking, &[3]))
        .await;
    assert_eq!(status(not_offered), Some(400));

    admin
        .create_assignment(scout_id, registration_id, &assign(cooking, &[3]))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_assignment_must_match_event() {
    let camp = Camp::new(&["Chess"]).await;
    let admin = camp.admin();
    let troop = camp.troop(1).await;
    let (scout_id, registration_id) = troop.ids(0);

    let other_event = admin.create_event(&event_input(1)).await.unwrap();
    let elsewhere = admin
        .create_offering(
            other_event.id,
            &OfferingInput {
                badge_id: camp.offerings[0].badge_id,
                price: Price::from_dollars(10),
                periods: vec![1],
                duration: 1,
                requirements: vec![],
                size_limit: None,
            },
        )
        .await
        .unwrap();

    let wrong_event = admin
        .create_assignment(scout_id, registration_id, &assign(elsewhere.id, &[1]))
        .await;
    assert_eq!(status(wrong_event), Some(400));
    let missing = admin
        .create_assignment(scout_id, registration_id, &assign(9_999, &[1]))
        .await;
    assert_eq!(status(missing), Some(404));
    let wrong_scout = admin
        .create_assignment(scout_id, 9_999, &assign(camp.offerings[0].id, &[1]))
        .await;
    assert_eq!(status(wrong_scout), Some(404));
}

#[tokio::test]
async fn test_class_size_limit() {
    let camp = Camp::new(&[]).await;
    let admin = camp.admin();
    let badge = admin
        .create_badge(&BadgeInput {
            name: "Robotics".to_string(),
            description: String::new(),
            notes: None,
        })
        .await
        .unwrap();
    let robotics = admin
        .create_offering(
            camp.event.id,
            &OfferingInput {
                badge_id: badge.id,
                price: Price::from_dollars(20),
                periods: vec![1, 2],
                duration: 1,
                requirements: vec!["1".to_string()],
                size_limit: Some(2),
            },
        )
        .await
        .unwrap();
    let troop = camp.troop(3).await;

    for i in 0..2 {
        let (scout_id, registration_id) = troop.ids(i);
        admin
            .create_assignment(scout_id, registration_id, &assign(robotics.id, &[1]))
            .await
            .unwrap();
    }
    let (scout_id, registration_id) = troop.ids(2);
    let full = admin
        .create_assignment(scout_id, registration_id, &assign(robotics.id, &[1]))
        .await;
    assert_eq!(status(full), Some(400));
    // The limit applies per period
    admin
        .create_assignment(scout_id, registration_id, &assign(robotics.id, &[2]))
        .await
        .unwrap();

    // Moving into a full period is rejected, staying put is not
    let move_in = admin
        .update_assignment(
            scout_id,
            registration_id,
            robotics.id,
            &AssignmentUpdate {
                periods: Some(vec![1]),
                ..AssignmentUpdate::default()
            },
        )
        .await;
    assert_eq!(status(move_in), Some(400));
    let (first_scout, first_registration) = troop.ids(0);
    admin
        .update_assignment(
            first_scout,
            first_registration,
            robotics.id,
            &AssignmentUpdate {
                periods: Some(vec![1]),
                ..AssignmentUpdate::default()
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_assignment_completions() {
    let camp = Camp::new(&["Chess", "Cooking"]).await;
    let admin = camp.admin();
    let (_, teacher) = camp.user(Role::Teacher).await;
    let troop = camp.troop(1).await;
    let (scout_id, registration_id) = troop.ids(0);
    let chess = camp.offerings[0].id;
    fixtures::create_assignments(&admin, scout_id, registration_id, &camp.offerings)
        .await
        .unwrap();

    let record = |pairs: &[(&str, bool)]| AssignmentUpdate {
        completions: Some(completions(pairs)),
        ..AssignmentUpdate::default()
    };

    let updated = teacher
        .update_assignment(scout_id, registration_id, chess, &record(&[("1", true), ("3b", true)]))
        .await
        .unwrap();
    assert_eq!(updated.completed_count(), 2);
    assert_eq!(updated.completions.get("2"), Some(&false));

    // Partial updates merge into the record
    let updated = teacher
        .update_assignment(scout_id, registration_id, chess, &record(&[("1", false), ("2", true)]))
        .await
        .unwrap();
    assert_eq!(
        updated.completions,
        completions(&[("1", false), ("2", true), ("3a", false), ("3b", true)])
    );

    let unknown = teacher
        .update_assignment(scout_id, registration_id, chess, &record(&[("99", true)]))
        .await;
    assert_eq!(status(unknown), Some(400));

    // Coordinators cannot sign off requirements, teachers cannot move classes
    let coordinator = troop
        .client
        .update_assignment(scout_id, registration_id, chess, &record(&[("1", true)]))
        .await;
    assert_eq!(status(coordinator), Some(401));
    let moved = teacher
        .update_assignment(
            scout_id,
            registration_id,
            chess,
            &AssignmentUpdate {
                periods: Some(vec![3]),
                ..AssignmentUpdate::default()
            },
        )
        .await;
    assert_eq!(status(moved), Some(401));

    // Chess meets in period 1 and cooking in period 2
    let clash = admin
        .update_assignment(
            scout_id,
            registration_id,
            chess,
            &AssignmentUpdate {
                periods: Some(vec![2]),
                ..AssignmentUpdate::default()
            },
        )
        .await;
    assert_eq!(status(clash), Some(400));
    let moved = admin
        .update_assignment(
            scout_id,
            registration_id,
            chess,
            &AssignmentUpdate {
                periods: Some(vec![3]),
                ..AssignmentUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.periods, vec![3]);
    assert_eq!(moved.completions.get("2"), Some(&true));
}

#[tokio::test]
async fn test_delete_assignment() {
    let camp = Camp::new(&["Chess"]).await;
    let admin = camp.admin();
    let troop = camp.troop(1).await;
    let (scout_id, registration_id) = troop.ids(0);
    let chess = camp.offerings[0].id;
    fixtures::create_assignments(&admin, scout_id, registration_id, &camp.offerings)
        .await
        .unwrap();

    let denied = troop
        .client
        .delete_assignment(scout_id, registration_id, chess)
        .await;
    assert_eq!(status(denied), Some(401));

    admin
        .delete_assignment(scout_id, registration_id, chess)
        .await
        .unwrap();
    assert!(admin
        .list_assignments(scout_id, registration_id)
        .await
        .unwrap()
        .is_empty());
    let again = admin.delete_assignment(scout_id, registration_id, chess).await;
    assert_eq!(status(again), Some(404));
}

// ===== Preferences =====

#[tokio::test]
async fn test_set_preferences_replaces_list() {
    let camp = Camp::new(&["Chess", "Cooking", "Hiking"]).await;
    let troop = camp.troop(1).await;
    let (scout_id, registration_id) = troop.ids(0);
    let [chess, cooking, hiking] = [0, 1, 2].map(|i| camp.offerings[i].id);

    let first = troop
        .client
        .set_preferences(
            scout_id,
            registration_id,
            &[rank(hiking, 3), rank(chess, 1), rank(cooking, 2)],
        )
        .await
        .unwrap();
    let order: Vec<i64> = first.iter().map(|p| p.offering_id).collect();
    assert_eq!(order, vec![chess, cooking, hiking]);

    troop
        .client
        .set_preferences(scout_id, registration_id, &[rank(cooking, 1)])
        .await
        .unwrap();
    let listed = troop
        .client
        .list_preferences(scout_id, registration_id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].offering_id, cooking);
    assert_eq!(listed[0].rank, 1);

    // An empty list clears the preferences
    troop
        .client
        .set_preferences(scout_id, registration_id, &[])
        .await
        .unwrap();
    assert!(troop
        .client
        .list_preferences(scout_id, registration_id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_preference_validation() {
    let camp = Camp::new(&["Chess", "Cooking"]).await;
    let troop = camp.troop(1).await;
    let (scout_id, registration_id) = troop.ids(0);
    let [chess, cooking] = [0, 1].map(|i| camp.offerings[i].id);
    let client = &troop.client;

    let cases = [
        vec![rank(chess, 0)],
        vec![rank(chess, 1), rank(cooking, 1)],
        vec![rank(chess, 1), rank(chess, 2)],
    ];
    for preferences in &cases {
        let result = client
            .set_preferences(scout_id, registration_id, preferences)
            .await;
        assert_eq!(status(result), Some(400));
    }
    let missing = client
        .set_preferences(scout_id, registration_id, &[rank(9_999, 1)])
        .await;
    assert_eq!(status(missing), Some(404));

    // A failed replacement leaves the old list in place
    fixtures::create_preferences(client, scout_id, registration_id, &camp.offerings)
        .await
        .unwrap();
    let _ = client
        .set_preferences(scout_id, registration_id, &[rank(chess, 1), rank(cooking, 1)])
        .await;
    assert_eq!(
        client
            .list_preferences(scout_id, registration_id)
            .await
            .unwrap()
            .len(),
        2
    );
}

#[tokio::test]
async fn test_preferences_access() {
    let camp = Camp::new(&["Chess"]).await;
    let troop = camp.troop(1).await;
    let (scout_id, registration_id) = troop.ids(0);
    let (_, other) = camp.user(Role::Coordinator).await;
    let (_, teacher) = camp.user(Role::Teacher).await;
    fixtures::create_preferences(&troop.client, scout_id, registration_id, &camp.offerings)
        .await
        .unwrap();

    assert_eq!(status(other.list_preferences(scout_id, registration_id).await), Some(401));
    let hijack = other
        .set_preferences(scout_id, registration_id, &[])
        .await;
    assert_eq!(status(hijack), Some(401));

    // Staff can read but only the owner or an admin can change
    assert_eq!(
        teacher
            .list_preferences(scout_id, registration_id)
            .await
            .unwrap()
            .len(),
        1
    );
    let teacher_edit = teacher
        .set_preferences(scout_id, registration_id, &[])
        .await;
    assert_eq!(status(teacher_edit), Some(401));
    camp.admin()
        .set_preferences(scout_id, registration_id, &[])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_and_delete_preference() {
    let camp = Camp::new(&["Chess", "Cooking", "Hiking"]).await;
    let troop = camp.troop(1).await;
    let (scout_id, registration_id) = troop.ids(0);
    let client = &troop.client;
    let [chess, cooking, hiking] = [0, 1, 2].map(|i| camp.offerings[i].id);
    fixtures::create_preferences(client, scout_id, registration_id, &camp.offerings)
        .await
        .unwrap();

    let clash = client
        .update_preference(scout_id, registration_id, hiking, &PreferenceUpdate { rank: 1 })
        .await;
    assert_eq!(status(clash), Some(400));
    let zero = client
        .update_preference(scout_id, registration_id, hiking, &PreferenceUpdate { rank: 0 })
        .await;
    assert_eq!(status(zero), Some(400));

    client
        .delete_preference(scout_id, registration_id, chess)
        .await
        .unwrap();
    let moved = client
        .update_preference(scout_id, registration_id, hiking, &PreferenceUpdate { rank: 1 })
        .await
        .unwrap();
    assert_eq!(moved.rank, 1);

    let order: Vec<i64> = client
        .list_preferences(scout_id, registration_id)
        .await
        .unwrap()
        .iter()
        .map(|p| p.offering_id)
        .collect();
    assert_eq!(order, vec![hiking, cooking]);

    let gone = client
        .update_preference(scout_id, registration_id, chess, &PreferenceUpdate { rank: 5 })
        .await;
    assert_eq!(status(gone), Some(404));
    assert_eq!(
        status(client.delete_preference(scout_id, registration_id, chess).await),
        Some(404)
    );
}
