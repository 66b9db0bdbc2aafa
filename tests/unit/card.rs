use retro_backend::{
    db::enums::CardColumn,
    error::AppError,
    services::CardsService,
    services::TeamMembersService,
    db::repositories::MemoryStore,
};

use super::{register, retro_in, team_owned_by};

#[test]
fn board_partitions_cards_by_column() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let team = team_owned_by(&store, &ada);
    let retro = retro_in(&store, &ada, &team);

    CardsService::create(&store, &ada, &retro, "slow builds", "Needs Improvement").unwrap();
    CardsService::create(&store, &ada, &retro, "good demo", "Went Well").unwrap();
    let newest = CardsService::create(&store, &ada, &retro, "flaky CI", "Needs Improvement").unwrap();

    let board = CardsService::board(&store, &retro, false).unwrap();
    assert_eq!(board.len(), 3);
    assert_eq!(board.column(CardColumn::WentWell).len(), 1);
    assert_eq!(board.column(CardColumn::NeedsImprovement).len(), 2);
    assert!(board.column(CardColumn::Kudos).is_empty());
    assert_eq!(board.column(CardColumn::NeedsImprovement)[0].id, newest.id);
}

#[test]
fn deleted_cards_only_show_when_requested() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let team = team_owned_by(&store, &ada);
    let retro = retro_in(&store, &ada, &team);

    let c1 = CardsService::create(&store, &ada, &retro, "slow builds", "Needs Improvement").unwrap();
    CardsService::create(&store, &ada, &retro, "good demo", "Went Well").unwrap();
    CardsService::delete(&store, &ada, &retro, c1.id).unwrap();

    let board = CardsService::board(&store, &retro, false).unwrap();
    assert!(board.column(CardColumn::NeedsImprovement).is_empty());
    assert_eq!(board.len(), 1);

    let board = CardsService::board(&store, &retro, true).unwrap();
    let shown = &board.column(CardColumn::NeedsImprovement)[0];
    assert_eq!(shown.id, c1.id);
    assert!(shown.is_deleted);
    assert!(shown.deleted_at.is_some());
}

#[test]
fn repeated_delete_keeps_first_timestamp() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let team = team_owned_by(&store, &ada);
    let retro = retro_in(&store, &ada, &team);
    let card = CardsService::create(&store, &ada, &retro, "noise", "Kudos").unwrap();

    let first = CardsService::delete(&store, &ada, &retro, card.id).unwrap();
    let second = CardsService::delete(&store, &ada, &retro, card.id).unwrap();
    assert!(second.is_deleted);
    assert_eq!(first.deleted_at, second.deleted_at);
}

#[test]
fn only_the_author_can_edit_or_delete() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let bob = register(&store, "bob@x.com", "Bob");
    let team = team_owned_by(&store, &ada);
    TeamMembersService::add_member(&store, team.id, "bob@x.com", None).unwrap();
    let retro = retro_in(&store, &ada, &team);
    let card = CardsService::create(&store, &ada, &retro, "mine", "Kudos").unwrap();

    let result = CardsService::update(&store, &bob, &retro, card.id, "yours now");
    assert!(matches!(result, Err(AppError::Forbidden { .. })));
    let result = CardsService::delete(&store, &bob, &retro, card.id);
    assert!(matches!(result, Err(AppError::Forbidden { .. })));

    let updated = CardsService::update(&store, &ada, &retro, card.id, "  still mine  ").unwrap();
    assert_eq!(updated.content, "still mine");
}

#[test]
fn card_from_another_retro_is_not_found() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let team = team_owned_by(&store, &ada);
    let retro = retro_in(&store, &ada, &team);
    let other = retro_in(&store, &ada, &team);
    let card = CardsService::create(&store, &ada, &other, "elsewhere", "Kudos").unwrap();

    let result = CardsService::delete(&store, &ada, &retro, card.id);
    assert!(matches!(result, Err(AppError::NotFound { .. })));
}

#[test]
fn invalid_column_and_blank_content_are_rejected() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let team = team_owned_by(&store, &ada);
    let retro = retro_in(&store, &ada, &team);

    let result = CardsService::create(&store, &ada, &retro, "text", "Went well");
    assert!(matches!(result, Err(AppError::Validation { .. })));
    let result = CardsService::create(&store, &ada, &retro, "   ", "Kudos");
    assert!(matches!(result, Err(AppError::Validation { .. })));
}
