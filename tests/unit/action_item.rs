use retro_backend::{
    db::enums::ActionItemStatus,
    db::models::action_item::{ActionItemQuery, CreateActionItemRequest, UpdateActionItemRequest},
    db::repositories::MemoryStore,
    error::AppError,
    services::{ActionItemsService, CardsService},
};
use uuid::Uuid;

use super::{register, retro_in, team_owned_by};

fn request(title: &str, source_card_ids: Vec<Uuid>) -> CreateActionItemRequest {
    CreateActionItemRequest {
        title: title.to_string(),
        description: None,
        source_card_ids,
        assigned_to: None,
    }
}

#[test]
fn source_card_from_wrong_column_is_rejected() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let team = team_owned_by(&store, &ada);
    let retro = retro_in(&store, &ada, &team);
    CardsService::create(&store, &ada, &retro, "slow builds", "Needs Improvement").unwrap();
    let c2 = CardsService::create(&store, &ada, &retro, "good demo", "Went Well").unwrap();

    let result =
        ActionItemsService::create(&store, &ada, &retro, &request("fix build speed", vec![c2.id]));
    match result {
        Err(AppError::Validation { message }) => assert_eq!(
            message,
            "Some source cards are invalid or not from Needs Improvement column"
        ),
        other => panic!("expected validation error, got {:?}", other.map(|i| i.id)),
    }
}

#[test]
fn needs_improvement_source_cards_are_linked() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let team = team_owned_by(&store, &ada);
    let retro = retro_in(&store, &ada, &team);
    let c1 = CardsService::create(&store, &ada, &retro, "slow builds", "Needs Improvement").unwrap();

    let item =
        ActionItemsService::create(&store, &ada, &retro, &request("  fix build speed ", vec![c1.id]))
            .unwrap();
    assert_eq!(item.title, "fix build speed");
    assert_eq!(item.source_card_ids, vec![c1.id]);
    assert_eq!(item.team_id, team.id);
    assert_eq!(item.status, ActionItemStatus::Open);
    assert_eq!(item.created_by, ada.user_id);
}

#[test]
fn deleted_foreign_and_repeated_sources_are_rejected() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let team = team_owned_by(&store, &ada);
    let retro = retro_in(&store, &ada, &team);
    let other = retro_in(&store, &ada, &team);
    let live = CardsService::create(&store, &ada, &retro, "a", "Needs Improvement").unwrap();
    let gone = CardsService::create(&store, &ada, &retro, "b", "Needs Improvement").unwrap();
    CardsService::delete(&store, &ada, &retro, gone.id).unwrap();
    let foreign = CardsService::create(&store, &ada, &other, "c", "Needs Improvement").unwrap();

    for ids in [
        vec![gone.id],
        vec![foreign.id],
        vec![Uuid::new_v4()],
        vec![live.id, live.id],
    ] {
        let result = ActionItemsService::create(&store, &ada, &retro, &request("x", ids));
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }
}

#[test]
fn blank_title_is_rejected() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let team = team_owned_by(&store, &ada);
    let retro = retro_in(&store, &ada, &team);

    let result = ActionItemsService::create(&store, &ada, &retro, &request("  ", vec![]));
    assert!(matches!(result, Err(AppError::Validation { .. })));
}

#[test]
fn list_filters_by_status_and_ignores_unknown_status() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let team = team_owned_by(&store, &ada);
    let retro = retro_in(&store, &ada, &team);
    let first = ActionItemsService::create(&store, &ada, &retro, &request("Speed up CI", vec![])).unwrap();
    ActionItemsService::create(&store, &ada, &retro, &request("Write docs", vec![])).unwrap();

    let update = UpdateActionItemRequest {
        status: Some("Done".to_string()),
        ..Default::default()
    };
    ActionItemsService::update(&store, &first, &update).unwrap();

    let done = ActionItemsService::list(
        &store,
        &team,
        &ActionItemQuery {
            status: Some("Done".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].id, first.id);

    let all = ActionItemsService::list(
        &store,
        &team,
        &ActionItemQuery {
            status: Some("Whatever".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(all.len(), 2);

    let searched = ActionItemsService::list(
        &store,
        &team,
        &ActionItemQuery {
            search: Some("ci".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(searched.len(), 1);
}

#[test]
fn update_can_clear_description_and_rejects_bad_status() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let team = team_owned_by(&store, &ada);
    let retro = retro_in(&store, &ada, &team);
    let mut req = request("Speed up CI", vec![]);
    req.description = Some("cache deps".to_string());
    let item = ActionItemsService::create(&store, &ada, &retro, &req).unwrap();
    assert_eq!(item.description.as_deref(), Some("cache deps"));

    let clear = UpdateActionItemRequest {
        description: Some(None),
        ..Default::default()
    };
    let item = ActionItemsService::update(&store, &item, &clear).unwrap();
    assert_eq!(item.description, None);
    assert_eq!(item.title, "Speed up CI");

    let bad = UpdateActionItemRequest {
        status: Some("Closed".to_string()),
        ..Default::default()
    };
    let result = ActionItemsService::update(&store, &item, &bad);
    assert!(matches!(result, Err(AppError::Validation { .. })));
}
