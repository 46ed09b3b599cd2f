mod common;

use common::{status, Camp};
use meritcamp_core::fixtures::{self, event_input, DEFAULT_REQUIREMENTS};
use meritcamp_core::models::{
    AssignmentUpdate, BadgeInput, BadgeUpdate, OfferingInput, OfferingUpdate, Price,
    PurchasableInput, PurchasableUpdate, PurchaseInput, Role, Size,
};
use meritcamp_core::Backend;

fn badge(name: &str) -> BadgeInput {
    BadgeInput {
        name: name.to_string(),
        description: String::new(),
        notes: None,
    }
}

fn offering(badge_id: i64) -> OfferingInput {
    OfferingInput {
        badge_id,
        price: Price::from_dollars(5),
        periods: vec![2, 1],
        duration: 1,
        requirements: vec!["1".to_string(), "2".to_string()],
        size_limit: None,
    }
}

#[tokio::test]
async fn test_badges() {
    let camp = Camp::new(&["Swimming"]).await;
    let admin = camp.admin();
    let (_, teacher) = camp.user(Role::Teacher).await;

    assert_eq!(status(teacher.create_badge(&badge("Archery")).await), Some(401));
    assert_eq!(status(admin.create_badge(&badge("swimming")).await), Some(400));
    assert_eq!(status(admin.create_badge(&badge(" ")).await), Some(400));

    let archery = admin.create_badge(&badge(" Archery ")).await.unwrap();
    assert_eq!(archery.name, "Archery");
    admin.create_badge(&badge("chess")).await.unwrap();

    let names: Vec<String> = teacher
        .list_badges()
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.name)
        .collect();
    assert_eq!(names, vec!["Archery", "chess", "Swimming"]);

    let renamed = admin
        .update_badge(
            archery.id,
            &BadgeUpdate {
                name: Some("Archery II".to_string()),
                notes: Some("Bring a bow".to_string()),
                ..BadgeUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.notes.as_deref(), Some("Bring a bow"));
    assert_eq!(admin.get_badge(archery.id).await.unwrap(), renamed);

    let taken = admin
        .update_badge(
            archery.id,
            &BadgeUpdate {
                name: Some("CHESS".to_string()),
                ..BadgeUpdate::default()
            },
        )
        .await;
    assert_eq!(status(taken), Some(400));

    admin.delete_badge(archery.id).await.unwrap();
    assert_eq!(status(admin.get_badge(archery.id).await), Some(404));
}

#[tokio::test]
async fn test_offered_badge_cannot_be_deleted() {
    let camp = Camp::new(&["Swimming"]).await;
    let admin = camp.admin();
    let badge_id = camp.offerings[0].badge_id;

    assert_eq!(status(admin.delete_badge(badge_id).await), Some(400));
    admin
        .delete_offering(camp.event.id, camp.offerings[0].id)
        .await
        .unwrap();
    admin.delete_badge(badge_id).await.unwrap();
}

#[tokio::test]
async fn test_create_offering() {
    let camp = Camp::new(&[]).await;
    let admin = camp.admin();
    let chess = admin.create_badge(&badge("Chess")).await.unwrap();

    let created = admin
        .create_offering(camp.event.id, &offering(chess.id))
        .await
        .unwrap();
    assert_eq!(created.periods, vec![1, 2]);
    assert_eq!(created.size_limit, 20);
    assert_eq!(
        admin.list_offerings(camp.event.id).await.unwrap(),
        vec![created]
    );

    // One offering per badge per event
    let again = admin.create_offering(camp.event.id, &offering(chess.id)).await;
    assert_eq!(status(again), Some(400));

    let other_event = admin.create_event(&event_input(1)).await.unwrap();
    admin
        .create_offering(other_event.id, &offering(chess.id))
        .await
        .unwrap();
    assert_eq!(admin.list_offerings(camp.event.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_offering_validation() {
    let camp = Camp::new(&[]).await;
    let admin = camp.admin();
    let chess = admin.create_badge(&badge("Chess")).await.unwrap();
    let event_id = camp.event.id;

    let mut bad_period = offering(chess.id);
    bad_period.periods = vec![4];
    assert_eq!(status(admin.create_offering(event_id, &bad_period).await), Some(400));

    let mut too_long = offering(chess.id);
    too_long.duration = 3;
    assert_eq!(status(admin.create_offering(event_id, &too_long).await), Some(400));

    let mut empty_class = offering(chess.id);
    empty_class.size_limit = Some(0);
    assert_eq!(status(admin.create_offering(event_id, &empty_class).await), Some(400));

    let mut duplicate_reqs = offering(chess.id);
    duplicate_reqs.requirements = vec!["1".to_string(), " 1".to_string()];
    assert_eq!(status(admin.create_offering(event_id, &duplicate_reqs).await), Some(400));

    let mut negative = offering(chess.id);
    negative.price = Price::from_cents(-100);
    assert_eq!(status(admin.create_offering(event_id, &negative).await), Some(400));

    assert_eq!(status(admin.create_offering(event_id, &offering(9_999)).await), Some(404));
    assert_eq!(status(admin.create_offering(9_999, &offering(chess.id)).await), Some(404));

    let (_, teacher) = camp.user(Role::Teacher).await;
    assert_eq!(status(teacher.create_offering(event_id, &offering(chess.id)).await), Some(401));
}

#[tokio::test]
async fn test_requirement_changes_reconcile_completions() {
    let camp = Camp::new(&["Chess"]).await;
    let admin = camp.admin();
    let troop = camp.troop(1).await;
    let (scout_id, registration_id) = troop.ids(0);
    let chess = &camp.offerings[0];

    fixtures::create_assignments(&admin, scout_id, registration_id, &camp.offerings[..1])
        .await
        .unwrap();
    let completions = [("1", true), ("3a", true)]
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect();
    admin
        .update_assignment(
            scout_id,
            registration_id,
            chess.id,
            &AssignmentUpdate {
                completions: Some(completions),
                ..AssignmentUpdate::default()
            },
        )
        .await
        .unwrap();

    // Drop "2" and "3a", keep "1" and "3b", add "4"
    let updated = admin
        .update_offering(
            camp.event.id,
            chess.id,
            &OfferingUpdate {
                requirements: Some(vec!["1".to_string(), "3b".to_string(), "4".to_string()]),
                ..OfferingUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.requirements, vec!["1", "3b", "4"]);

    let assignment = admin
        .list_assignments(scout_id, registration_id)
        .await
        .unwrap()
        .remove(0);
    let flags: Vec<(&str, bool)> = assignment
        .completions
        .iter()
        .map(|(k, v)| (k.as_str(), *v))
        .collect();
    assert_eq!(flags, vec![("1", true), ("3b", false), ("4", false)]);
}

#[tokio::test]
async fn test_update_offering_keeps_assignments() {
    let camp = Camp::new(&["Chess"]).await;
    let admin = camp.admin();
    let troop = camp.troop(2).await;
    for i in 0..2 {
        let (scout_id, registration_id) = troop.ids(i);
        fixtures::create_assignments(&admin, scout_id, registration_id, &camp.offerings)
            .await
            .unwrap();
    }

    let updated = admin
        .update_offering(
            camp.event.id,
            camp.offerings[0].id,
            &OfferingUpdate {
                periods: Some(vec![2, 3]),
                size_limit: Some(1),
                price: Some(Price::from_dollars(7)),
                ..OfferingUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.periods, vec![2, 3]);
    assert_eq!(updated.requirements.len(), DEFAULT_REQUIREMENTS.len());

    let stats = admin.event_stats(camp.event.id).await.unwrap();
    assert_eq!(stats.assignments, 2);

    let too_long = admin
        .update_offering(
            camp.event.id,
            camp.offerings[0].id,
            &OfferingUpdate {
                duration: Some(3),
                ..OfferingUpdate::default()
            },
        )
        .await;
    assert_eq!(status(too_long), Some(400));
}

#[tokio::test]
async fn test_delete_offering_cascades() {
    let camp = Camp::new(&["Chess", "Cooking"]).await;
    let admin = camp.admin();
    let troop = camp.troop(1).await;
    let (scout_id, registration_id) = troop.ids(0);
    fixtures::create_preferences(&troop.client, scout_id, registration_id, &camp.offerings)
        .await
        .unwrap();
    fixtures::create_assignments(&admin, scout_id, registration_id, &camp.offerings)
        .await
        .unwrap();

    admin
        .delete_offering(camp.event.id, camp.offerings[0].id)
        .await
        .unwrap();
    let preferences = troop
        .client
        .list_preferences(scout_id, registration_id)
        .await
        .unwrap();
    assert_eq!(preferences.len(), 1);
    assert_eq!(preferences[0].offering_id, camp.offerings[1].id);
    assert_eq!(
        admin
            .list_assignments(scout_id, registration_id)
            .await
            .unwrap()
            .len(),
        1
    );

    // Offerings are addressed through their own event
    let other_event = admin.create_event(&event_input(1)).await.unwrap();
    let wrong_event = admin
        .delete_offering(other_event.id, camp.offerings[1].id)
        .await;
    assert_eq!(status(wrong_event), Some(404));
}

#[tokio::test]
async fn test_purchasables() {
    let camp = Camp::new(&[]).await;
    let admin = camp.admin();
    let event_id = camp.event.id;

    let mut inverted = PurchasableInput {
        item: "Cap".to_string(),
        description: String::new(),
        price: Price::from_dollars(12),
        has_size: false,
        minimum_age: Some(14),
        maximum_age: Some(10),
        purchaser_limit: None,
    };
    assert_eq!(status(admin.create_purchasable(event_id, &inverted).await), Some(400));
    inverted.maximum_age = None;
    inverted.purchaser_limit = Some(0);
    assert_eq!(status(admin.create_purchasable(event_id, &inverted).await), Some(400));
    inverted.purchaser_limit = Some(2);
    let cap = admin.create_purchasable(event_id, &inverted).await.unwrap();
    assert_eq!(cap.minimum_age, Some(14));

    let listed = admin.list_purchasables(event_id).await.unwrap();
    assert_eq!(listed.len(), camp.purchasables.len() + 1);

    let (_, teacher) = camp.user(Role::Teacher).await;
    let denied = teacher
        .update_purchasable(event_id, cap.id, &PurchasableUpdate::default())
        .await;
    assert_eq!(status(denied), Some(401));

    let renamed = admin
        .update_purchasable(
            event_id,
            cap.id,
            &PurchasableUpdate {
                item: Some("Ball Cap".to_string()),
                minimum_age: Some(Some(11)),
                ..PurchasableUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.item, "Ball Cap");
    assert_eq!(renamed.minimum_age, Some(11));
    assert_eq!(renamed.purchaser_limit, Some(2));

    admin.delete_purchasable(event_id, cap.id).await.unwrap();
    assert_eq!(status(admin.delete_purchasable(event_id, cap.id).await), Some(404));
}

#[tokio::test]
async fn test_purchaser_limit_cannot_drop_below_sold() {
    let camp = Camp::new(&[]).await;
    let admin = camp.admin();
    let troop = camp.troop(2).await;
    let lunch = camp.purchasable("Lunch");
    for i in 0..2 {
        let (scout_id, registration_id) = troop.ids(i);
        troop
            .client
            .create_purchase(
                scout_id,
                registration_id,
                &PurchaseInput {
                    purchasable_id: lunch.id,
                    quantity: 2,
                    size: None,
                },
            )
            .await
            .unwrap();
    }

    let limit = |n| PurchasableUpdate {
        purchaser_limit: Some(Some(n)),
        ..PurchasableUpdate::default()
    };
    let too_low = admin
        .update_purchasable(camp.event.id, lunch.id, &limit(3))
        .await;
    assert_eq!(status(too_low), Some(400));
    let exact = admin
        .update_purchasable(camp.event.id, lunch.id, &limit(4))
        .await
        .unwrap();
    assert_eq!(exact.purchaser_limit, Some(4));
}

#[tokio::test]
async fn test_purchasable_bounds_can_be_cleared() {
    let camp = Camp::new(&[]).await;
    let admin = camp.admin();
    let event_id = camp.event.id;

    let mut canoe = PurchasableInput {
        item: "Canoe Trip".to_string(),
        description: String::new(),
        price: Price::from_dollars(25),
        has_size: false,
        minimum_age: Some(u32::MAX),
        maximum_age: None,
        purchaser_limit: Some(8),
    };
    assert_eq!(status(admin.create_purchasable(event_id, &canoe).await), Some(400));
    canoe.minimum_age = Some(14);
    let canoe = admin.create_purchasable(event_id, &canoe).await.unwrap();

    let out_of_range = admin
        .update_purchasable(
            event_id,
            canoe.id,
            &PurchasableUpdate {
                maximum_age: Some(Some(u32::MAX)),
                ..PurchasableUpdate::default()
            },
        )
        .await;
    assert_eq!(status(out_of_range), Some(400));

    let cleared = admin
        .update_purchasable(
            event_id,
            canoe.id,
            &PurchasableUpdate {
                minimum_age: Some(None),
                purchaser_limit: Some(None),
                ..PurchasableUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.minimum_age, None);
    assert_eq!(cleared.purchaser_limit, None);

    // Fields left out stay as they were
    let renamed = admin
        .update_purchasable(
            event_id,
            canoe.id,
            &PurchasableUpdate {
                item: Some("Kayak Trip".to_string()),
                ..PurchasableUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.purchaser_limit, None);
    assert_eq!(renamed.price, canoe.price);
}

#[tokio::test]
async fn test_sizing_locked_once_purchased() {
    let camp = Camp::new(&[]).await;
    let admin = camp.admin();
    let troop = camp.troop(1).await;
    let (scout_id, registration_id) = troop.ids(0);
    let shirt = camp.purchasable("T-Shirt");
    let sizing = |has_size| PurchasableUpdate {
        has_size: Some(has_size),
        ..PurchasableUpdate::default()
    };

    // Nobody has bought one yet
    admin
        .update_purchasable(camp.event.id, shirt.id, &sizing(false))
        .await
        .unwrap();
    admin
        .update_purchasable(camp.event.id, shirt.id, &sizing(true))
        .await
        .unwrap();

    troop
        .client
        .create_purchase(
            scout_id,
            registration_id,
            &PurchaseInput {
                purchasable_id: shirt.id,
                quantity: 1,
                size: Some(Size::M),
            },
        )
        .await
        .unwrap();
    let sizes_dropped = admin
        .update_purchasable(camp.event.id, shirt.id, &sizing(false))
        .await;
    assert_eq!(status(sizes_dropped), Some(400));
    let unchanged = admin
        .update_purchasable(camp.event.id, shirt.id, &sizing(true))
        .await
        .unwrap();
    assert!(unchanged.has_size);
}
