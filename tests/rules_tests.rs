//! Card rules scenarios on hand-built boards.
//!
//! Each test seats two or three players, places workers and floors by hand,
//! then checks the legal-action set or the outcome of applying an action.

use chrono::NaiveDate;
use santorini_core::cards::CardKind;
use santorini_core::core::{Action, ActionKind, Direction, Game, Genre, Player, PlayerId, Position};
use santorini_core::rules::{legal_actions, rules_for, Rules, StandardRules};

const A: PlayerId = PlayerId::new(0);
const B: PlayerId = PlayerId::new(1);
const C: PlayerId = PlayerId::new(2);

fn date(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 6, 1).unwrap()
}

/// Seat `count` players, oldest first, named "a", "b", "c".
fn seated(count: usize) -> Game {
    let mut game = Game::new();
    game.set_num_players(count);
    for (i, name) in ["a", "b", "c"].into_iter().take(count).enumerate() {
        assert!(game.add_player(Player::new(name, date(1970 + i as i32 * 10))));
    }
    game
}

fn raise(game: &mut Game, position: Position, floors: u8) {
    for _ in 0..floors {
        game.board_mut().cell_mut(position).add_floor();
    }
}

fn moves_of(set: &santorini_core::core::LegalActionSet) -> Vec<Action> {
    set.iter().filter(|a| a.is_move()).copied().collect()
}

// =============================================================================
// Standard rules
// =============================================================================

#[test]
fn test_open_worker_has_eight_flat_moves() {
    let mut game = seated(2);
    game.place_worker(A, Genre::Male, Position::new(1, 2));

    let set = StandardRules.next_possible_actions(&game, A);

    assert_eq!(set.len(), 8);
    assert!(set.iter().all(|a| a.kind == ActionKind::Move && a.level_difference == 0));
    for direction in Direction::ALL {
        assert!(set.contains(&Action::movement(Genre::Male, direction, 0)));
    }
}

#[test]
fn test_edge_worker_has_fewer_moves() {
    let mut game = seated(2);
    game.place_worker(A, Genre::Male, Position::new(0, 2));

    let set = StandardRules.next_possible_actions(&game, A);
    assert_eq!(set.len(), 5);
}

#[test]
fn test_move_then_build_offers_only_end() {
    let mut game = seated(2);
    game.place_worker(A, Genre::Male, Position::new(2, 2));

    StandardRules
        .do_action(&mut game, A, &Action::movement(Genre::Male, Direction::East, 0))
        .unwrap();
    let builds = StandardRules.next_possible_actions(&game, A);
    assert!(builds.iter().all(|a| a.is_build() && a.worker == Some(Genre::Male)));

    StandardRules
        .do_action(&mut game, A, &Action::build_floor(Genre::Male, Direction::South, 0))
        .unwrap();
    assert!(StandardRules.next_possible_actions(&game, A).is_only(ActionKind::End));
    assert_eq!(game.board().cell(Position::new(3, 3)).floors(), 1);
}

#[test]
fn test_boxed_in_workers_lose() {
    let mut game = seated(2);
    game.place_worker(A, Genre::Male, Position::new(0, 0));
    game.place_worker(A, Genre::Female, Position::new(0, 1));
    for pos in [(1, 0), (1, 1), (1, 2), (0, 2)] {
        game.board_mut().cell_mut(Position::new(pos.0, pos.1)).place_dome();
    }

    for kind in CardKind::ALL {
        game.player_mut(A).card = Some(kind);
        assert!(
            legal_actions(&game, A).is_only(ActionKind::Lose),
            "{kind} should have no way out"
        );
    }
}

#[test]
fn test_no_build_after_move_loses() {
    let mut game = seated(2);
    game.place_worker(A, Genre::Male, Position::new(0, 1));
    game.place_worker(B, Genre::Male, Position::new(0, 2));
    game.place_worker(B, Genre::Female, Position::new(1, 1));
    game.board_mut().cell_mut(Position::new(1, 0)).place_dome();

    StandardRules
        .do_action(&mut game, A, &Action::movement(Genre::Male, Direction::West, 0))
        .unwrap();
    // (0,0): neighbours (0,1) empty now, so one build remains.
    assert_eq!(StandardRules.next_possible_actions(&game, A).len(), 1);

    game.place_worker(A, Genre::Female, Position::new(0, 1));
    assert!(StandardRules.next_possible_actions(&game, A).is_only(ActionKind::Lose));
}

#[test]
fn test_climb_to_third_floor_wins_for_every_card() {
    for kind in CardKind::ALL {
        let mut game = seated(2);
        game.player_mut(A).card = Some(kind);
        game.place_worker(A, Genre::Female, Position::new(2, 2));
        raise(&mut game, Position::new(2, 2), 2);
        raise(&mut game, Position::new(2, 3), 3);

        let climb = Action::movement(Genre::Female, Direction::East, 1);
        assert!(legal_actions(&game, A).contains(&climb), "{kind} cannot climb");
        assert!(rules_for(kind).do_action(&mut game, A, &climb).unwrap(), "{kind} did not win");
    }
}

#[test]
fn test_reaching_third_floor_from_third_floor_does_not_win() {
    let mut game = seated(2);
    game.place_worker(A, Genre::Male, Position::new(2, 2));
    raise(&mut game, Position::new(2, 2), 3);
    raise(&mut game, Position::new(2, 1), 3);

    let step = Action::movement(Genre::Male, Direction::West, 0);
    assert!(!StandardRules.do_action(&mut game, A, &step).unwrap());
}

// =============================================================================
// Powers
// =============================================================================

#[test]
fn test_pan_wins_by_dropping_two_floors() {
    let mut game = seated(2);
    game.place_worker(A, Genre::Male, Position::new(2, 2));
    raise(&mut game, Position::new(2, 2), 2);
    raise(&mut game, Position::new(2, 1), 1);

    let pan = rules_for(CardKind::Pan);
    assert!(pan.is_winning_move(2, 0));
    assert!(pan.is_winning_move(3, 1));
    assert!(!pan.is_winning_move(2, 1));
    assert!(!StandardRules.is_winning_move(2, 0));

    let small_drop = Action::movement(Genre::Male, Direction::West, -1);
    let mut other = game.clone();
    assert!(!pan.do_action(&mut other, A, &small_drop).unwrap());

    let big_drop = Action::movement(Genre::Male, Direction::East, -2);
    assert!(pan.do_action(&mut game, A, &big_drop).unwrap());
}

#[test]
fn test_minotaur_cannot_push_off_the_board() {
    let mut game = seated(2);
    game.player_mut(A).card = Some(CardKind::Minotaur);
    game.place_worker(A, Genre::Male, Position::new(1, 3));
    game.place_worker(B, Genre::Male, Position::new(1, 4));

    let set = legal_actions(&game, A);
    assert!(set.find(ActionKind::Move, Some(Genre::Male), Some(Direction::East)).is_none());
    assert_eq!(moves_of(&set).len(), 7);
}

#[test]
fn test_minotaur_pushes_enemy_back() {
    let mut game = seated(2);
    game.player_mut(A).card = Some(CardKind::Minotaur);
    game.place_worker(A, Genre::Male, Position::new(2, 1));
    game.place_worker(B, Genre::Female, Position::new(2, 2));

    let push = Action::movement(Genre::Male, Direction::East, 0);
    assert!(legal_actions(&game, A).contains(&push));

    rules_for(CardKind::Minotaur).do_action(&mut game, A, &push).unwrap();
    assert_eq!(game.worker_position(A, Genre::Male), Some(Position::new(2, 2)));
    assert_eq!(game.worker_position(B, Genre::Female), Some(Position::new(2, 3)));
}

#[test]
fn test_minotaur_blocked_by_own_worker_or_dome_behind() {
    let mut game = seated(2);
    game.player_mut(A).card = Some(CardKind::Minotaur);
    game.place_worker(A, Genre::Male, Position::new(2, 1));
    game.place_worker(A, Genre::Female, Position::new(1, 1));
    game.place_worker(B, Genre::Male, Position::new(2, 2));
    game.board_mut().cell_mut(Position::new(2, 3)).place_dome();

    let set = legal_actions(&game, A);
    assert!(set.find(ActionKind::Move, Some(Genre::Male), Some(Direction::East)).is_none());
    assert!(set.find(ActionKind::Move, Some(Genre::Male), Some(Direction::North)).is_none());
}

#[test]
fn test_apollo_swaps_with_enemy() {
    let mut game = seated(2);
    game.player_mut(A).card = Some(CardKind::Apollo);
    game.place_worker(A, Genre::Male, Position::new(2, 2));
    game.place_worker(A, Genre::Female, Position::new(2, 1));
    game.place_worker(B, Genre::Male, Position::new(3, 3));

    let set = legal_actions(&game, A);
    let swap = Action::movement(Genre::Male, Direction::SouthEast, 0);
    assert!(set.contains(&swap));
    assert!(set.find(ActionKind::Move, Some(Genre::Male), Some(Direction::West)).is_none());

    rules_for(CardKind::Apollo).do_action(&mut game, A, &swap).unwrap();
    assert_eq!(game.worker_position(A, Genre::Male), Some(Position::new(3, 3)));
    assert_eq!(game.worker_position(B, Genre::Male), Some(Position::new(2, 2)));
}

#[test]
fn test_artemis_second_move_not_back() {
    let mut game = seated(2);
    game.player_mut(A).card = Some(CardKind::Artemis);
    game.place_worker(A, Genre::Male, Position::new(2, 2));
    let artemis = rules_for(CardKind::Artemis);

    artemis
        .do_action(&mut game, A, &Action::movement(Genre::Male, Direction::East, 0))
        .unwrap();
    let set = artemis.next_possible_actions(&game, A);

    assert!(set.find(ActionKind::Move, Some(Genre::Male), Some(Direction::West)).is_none());
    assert!(set.contains(&Action::movement(Genre::Male, Direction::East, 0)));
    assert!(set.contains(&Action::build_floor(Genre::Male, Direction::West, 0)));

    artemis
        .do_action(&mut game, A, &Action::movement(Genre::Male, Direction::South, 0))
        .unwrap();
    let set = artemis.next_possible_actions(&game, A);
    assert!(!set.is_empty());
    assert!(set.iter().all(|a| a.is_build()));
}

#[test]
fn test_demeter_second_build_elsewhere() {
    let mut game = seated(2);
    game.place_worker(A, Genre::Female, Position::new(2, 2));
    let demeter = rules_for(CardKind::Demeter);

    demeter
        .do_action(&mut game, A, &Action::movement(Genre::Female, Direction::North, 0))
        .unwrap();
    demeter
        .do_action(&mut game, A, &Action::build_floor(Genre::Female, Direction::West, 0))
        .unwrap();

    let set = demeter.next_possible_actions(&game, A);
    assert!(set.contains(&Action::end()));
    assert!(set.find(ActionKind::BuildFloor, Some(Genre::Female), Some(Direction::West)).is_none());
    assert!(set.contains(&Action::build_floor(Genre::Female, Direction::East, 0)));

    demeter
        .do_action(&mut game, A, &Action::build_floor(Genre::Female, Direction::East, 0))
        .unwrap();
    assert!(demeter.next_possible_actions(&game, A).is_only(ActionKind::End));
}

#[test]
fn test_hephaestus_stacks_or_ends() {
    let mut game = seated(2);
    game.place_worker(A, Genre::Male, Position::new(2, 2));
    let hephaestus = rules_for(CardKind::Hephaestus);

    hephaestus
        .do_action(&mut game, A, &Action::movement(Genre::Male, Direction::North, 0))
        .unwrap();
    hephaestus
        .do_action(&mut game, A, &Action::build_floor(Genre::Male, Direction::North, 0))
        .unwrap();

    let set = hephaestus.next_possible_actions(&game, A);
    assert_eq!(set.len(), 2);
    assert!(set.contains(&Action::end()));
    assert!(set.contains(&Action::build_floor(Genre::Male, Direction::North, 1)));
}

#[test]
fn test_atlas_domes_at_any_height() {
    let mut game = seated(2);
    game.place_worker(A, Genre::Male, Position::new(2, 2));
    let atlas = rules_for(CardKind::Atlas);

    atlas
        .do_action(&mut game, A, &Action::movement(Genre::Male, Direction::South, 0))
        .unwrap();
    let set = atlas.next_possible_actions(&game, A);
    let domes = set.iter().filter(|a| a.kind == ActionKind::BuildDome).count();
    assert_eq!(domes, 8);
    assert_eq!(StandardRules.next_possible_actions(&game, A).len(), 8);

    atlas
        .do_action(&mut game, A, &Action::build_dome(Genre::Male, Direction::East, 0))
        .unwrap();
    let cell = game.board().cell(Position::new(3, 3));
    assert!(cell.has_dome());
    assert_eq!(cell.floors(), 0);
}

#[test]
fn test_prometheus_builds_first_then_stays_level() {
    let mut game = seated(2);
    game.place_worker(A, Genre::Male, Position::new(2, 2));
    raise(&mut game, Position::new(2, 3), 1);
    let prometheus = rules_for(CardKind::Prometheus);

    let opening = prometheus.next_possible_actions(&game, A);
    assert!(opening.iter().any(|a| a.is_move()));
    assert!(opening.iter().any(|a| a.is_build()));

    prometheus
        .do_action(&mut game, A, &Action::build_floor(Genre::Male, Direction::North, 0))
        .unwrap();
    let set = prometheus.next_possible_actions(&game, A);
    assert!(set.iter().all(|a| a.is_move() && a.level_difference <= 0));
    assert!(set.find(ActionKind::Move, Some(Genre::Male), Some(Direction::East)).is_none());
    assert!(set.find(ActionKind::Move, Some(Genre::Male), Some(Direction::North)).is_none());

    prometheus
        .do_action(&mut game, A, &Action::movement(Genre::Male, Direction::South, 0))
        .unwrap();
    let set = prometheus.next_possible_actions(&game, A);
    assert!(set.iter().all(|a| a.is_build()));

    prometheus
        .do_action(&mut game, A, &Action::build_floor(Genre::Male, Direction::South, 0))
        .unwrap();
    assert!(prometheus.next_possible_actions(&game, A).is_only(ActionKind::End));
}

// =============================================================================
// Enemy rules
// =============================================================================

#[test]
fn test_athena_blocks_climbing_after_moving_up() {
    let mut game = seated(2);
    game.player_mut(A).card = Some(CardKind::Athena);
    game.player_mut(B).card = Some(CardKind::Pan);
    game.place_worker(A, Genre::Male, Position::new(0, 0));
    game.place_worker(B, Genre::Male, Position::new(3, 3));
    raise(&mut game, Position::new(0, 1), 1);
    raise(&mut game, Position::new(3, 4), 1);

    let before = legal_actions(&game, B);
    assert!(before.contains(&Action::movement(Genre::Male, Direction::East, 1)));

    rules_for(CardKind::Athena)
        .do_action(&mut game, A, &Action::movement(Genre::Male, Direction::East, 1))
        .unwrap();

    let after = legal_actions(&game, B);
    assert_eq!(after.len(), before.len() - 1);
    assert!(after.iter().all(|a| a.level_difference <= 0));

    // The block lasts until the Athena holder starts a new round.
    game.begin_turn(A);
    assert_eq!(legal_actions(&game, B), before);
}

#[test]
fn test_athena_block_empties_to_lose() {
    let mut game = seated(2);
    game.player_mut(A).card = Some(CardKind::Athena);
    game.place_worker(A, Genre::Male, Position::new(2, 2));
    game.player_mut(A).history.push(Action::movement(Genre::Male, Direction::East, 1));

    game.place_worker(B, Genre::Male, Position::new(0, 0));
    for pos in [(0, 1), (1, 0), (1, 1)] {
        raise(&mut game, Position::new(pos.0, pos.1), 1);
    }

    assert!(legal_actions(&game, B).is_only(ActionKind::Lose));
}

#[test]
fn test_eliminated_athena_no_longer_interferes() {
    let mut game = seated(3);
    game.player_mut(A).card = Some(CardKind::Athena);
    game.player_mut(A).history.push(Action::movement(Genre::Male, Direction::East, 1));
    game.place_worker(C, Genre::Male, Position::new(3, 3));
    raise(&mut game, Position::new(3, 4), 1);

    let climb = Action::movement(Genre::Male, Direction::East, 1);
    assert!(!legal_actions(&game, C).contains(&climb));

    game.player_mut(A).loser = true;
    assert!(legal_actions(&game, C).contains(&climb));
}
