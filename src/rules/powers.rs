//! One unit struct per power card.
//!
//! Each struct implements `Rules` (overriding only what its power changes)
//! and `EnemyRules` (only Athena interferes with opponents). The static
//! lookup table at the bottom maps a `CardKind` to its entries.

use crate::cards::CardKind;
use crate::core::{Action, ActionKind, Direction, Game, Genre, LegalActionSet, PlayerId, Position, MAX_FLOORS};

use super::enemy::EnemyRules;
use super::engine::{resolve_target, scan_builds, scan_moves, Rules, RulesError};

/// Moves into an opponent's cell by swapping places.
#[derive(Clone, Copy, Debug, Default)]
pub struct Apollo;

impl Rules for Apollo {
    fn possible_moves(&self, game: &Game, player: PlayerId, genre: Genre) -> LegalActionSet {
        scan_moves(game, player, genre, |_, _, occupant| {
            occupant.map_or(true, |(owner, _)| owner != player)
        })
    }

    fn apply_move(&self, game: &mut Game, player: PlayerId, action: &Action) -> Result<bool, RulesError> {
        let (origin, target) = resolve_target(game, player, action)?;
        let genre = action.worker.ok_or(RulesError::MissingTarget(action.kind))?;

        if let Some((enemy, enemy_genre)) = game.occupant(target) {
            game.place_worker(enemy, enemy_genre, origin);
        }
        game.place_worker(player, genre, target);
        Ok(self.climb_wins(game, origin, target))
    }
}

/// Moves the same worker a second time, never straight back.
#[derive(Clone, Copy, Debug, Default)]
pub struct Artemis;

impl Artemis {
    /// Second moves for the worker that already moved, excluding the cell it left.
    fn second_moves(&self, game: &Game, player: PlayerId) -> LegalActionSet {
        let history = &game.player(player).history;
        let Some((genre, direction)) = history.first_move().and_then(|a| a.worker.zip(a.direction)) else {
            return LegalActionSet::new();
        };
        let Some(current) = game.worker_position(player, genre) else {
            return LegalActionSet::new();
        };
        let left_from = game.board().prev_cell(current, direction).map(|cell| cell.position());

        let mut moves = self.possible_moves(game, player, genre);
        moves.retain(|a| a.direction.and_then(|d| current.step(d)) != left_from);
        moves
    }
}

impl Rules for Artemis {
    fn next_possible_actions(&self, game: &Game, player: PlayerId) -> LegalActionSet {
        let history = &game.player(player).history;
        if history.contains_end() {
            return LegalActionSet::end();
        }

        match (history.move_count(), history.build_count()) {
            (0, _) => self.moves_for_both(game, player).or_lose(),
            (1, 0) => {
                let mut set = self.second_moves(game, player);
                if let Some(genre) = history.moved_worker() {
                    set.extend(self.builds_and_domes(game, player, genre));
                }
                set.or_lose()
            }
            (_, 0) => self.builds_after_move(game, player),
            _ => LegalActionSet::end(),
        }
    }
}

/// Standard rules for herself; blocks opponents from moving up.
#[derive(Clone, Copy, Debug, Default)]
pub struct Athena;

impl Rules for Athena {}

/// Domes at any height.
#[derive(Clone, Copy, Debug, Default)]
pub struct Atlas;

impl Rules for Atlas {
    fn possible_domes(&self, game: &Game, player: PlayerId, genre: Genre) -> LegalActionSet {
        scan_builds(game, player, genre, ActionKind::BuildDome, |_| true)
    }
}

/// Builds a second time, on a different cell.
#[derive(Clone, Copy, Debug, Default)]
pub struct Demeter;

impl Rules for Demeter {
    fn next_possible_actions(&self, game: &Game, player: PlayerId) -> LegalActionSet {
        let history = &game.player(player).history;
        if history.contains_end() {
            return LegalActionSet::end();
        }

        match (history.move_count(), history.build_count()) {
            (0, _) => self.moves_for_both(game, player).or_lose(),
            (_, 0) => self.builds_after_move(game, player),
            (_, 1) => {
                let mut set = match history.moved_worker() {
                    Some(genre) => self.builds_and_domes(game, player, genre),
                    None => LegalActionSet::new(),
                };
                // The worker has not moved since building, so the same
                // direction means the same cell.
                let first_direction = history.first_build().and_then(|a| a.direction);
                set.retain(|a| a.direction != first_direction);
                set.push(Action::end());
                set
            }
            _ => LegalActionSet::end(),
        }
    }
}

/// Builds a second floor on top of the first.
#[derive(Clone, Copy, Debug, Default)]
pub struct Hephaestus;

impl Hephaestus {
    /// The stacked floor on the first build's cell, if it still fits.
    fn second_floor(&self, game: &Game, player: PlayerId) -> Option<Action> {
        let first = game.player(player).history.first_build().copied()?;
        if first.kind != ActionKind::BuildFloor {
            return None;
        }
        let (_, target) = resolve_target(game, player, &first).ok()?;
        let cell = game.board().cell(target);
        if cell.has_dome() || cell.floors() + 1 >= MAX_FLOORS {
            return None;
        }
        Some(Action::build_floor(first.worker?, first.direction?, first.level_difference + 1))
    }
}

impl Rules for Hephaestus {
    fn next_possible_actions(&self, game: &Game, player: PlayerId) -> LegalActionSet {
        let history = &game.player(player).history;
        if history.contains_end() {
            return LegalActionSet::end();
        }

        match (history.move_count(), history.build_count()) {
            (0, _) => self.moves_for_both(game, player).or_lose(),
            (_, 0) => self.builds_after_move(game, player),
            (_, 1) => {
                let mut set = LegalActionSet::new();
                if let Some(second) = self.second_floor(game, player) {
                    set.push(second);
                }
                set.push(Action::end());
                set
            }
            _ => LegalActionSet::end(),
        }
    }
}

/// Pushes an opponent one cell straight back.
#[derive(Clone, Copy, Debug, Default)]
pub struct Minotaur;

impl Minotaur {
    /// The cell a pushed worker would land on, if it can take it.
    fn push_destination(game: &Game, target: Position, direction: Direction) -> Option<Position> {
        let beyond = target.step(direction)?;
        let free = !game.board().cell(beyond).has_dome() && !game.is_occupied(beyond);
        free.then_some(beyond)
    }
}

impl Rules for Minotaur {
    fn possible_moves(&self, game: &Game, player: PlayerId, genre: Genre) -> LegalActionSet {
        scan_moves(game, player, genre, |target, direction, occupant| match occupant {
            None => true,
            Some((owner, _)) if owner == player => false,
            Some(_) => Self::push_destination(game, target, direction).is_some(),
        })
    }

    fn apply_move(&self, game: &mut Game, player: PlayerId, action: &Action) -> Result<bool, RulesError> {
        let (origin, target) = resolve_target(game, player, action)?;
        let genre = action.worker.ok_or(RulesError::MissingTarget(action.kind))?;

        if let Some((enemy, enemy_genre)) = game.occupant(target) {
            let direction = action.direction.ok_or(RulesError::MissingTarget(action.kind))?;
            let beyond = target
                .step(direction)
                .ok_or(RulesError::OffBoard { from: target, direction })?;
            game.place_worker(enemy, enemy_genre, beyond);
        }
        game.place_worker(player, genre, target);
        Ok(self.climb_wins(game, origin, target))
    }
}

/// Also wins by dropping two or more floors.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pan;

impl Rules for Pan {
    fn is_winning_move(&self, from_floor: u8, to_floor: u8) -> bool {
        let standard = from_floor == MAX_FLOORS - 1 && to_floor == MAX_FLOORS;
        standard || i16::from(to_floor) - i16::from(from_floor) <= -2
    }
}

/// May build before moving, then only moves without climbing.
#[derive(Clone, Copy, Debug, Default)]
pub struct Prometheus;

impl Rules for Prometheus {
    fn next_possible_actions(&self, game: &Game, player: PlayerId) -> LegalActionSet {
        let history = &game.player(player).history;
        if history.contains_end() {
            return LegalActionSet::end();
        }

        let moves = history.move_count();
        let builds = history.build_count();

        if history.built_before_moving() {
            let Some(builder) = history.first_build().and_then(|a| a.worker) else {
                return LegalActionSet::lose();
            };
            return match (moves, builds) {
                (0, _) => {
                    let mut set = self.possible_moves(game, player, builder);
                    set.retain(|a| a.level_difference <= 0);
                    set.or_lose()
                }
                (_, 1) => self.builds_and_domes(game, player, builder).or_lose(),
                _ => LegalActionSet::end(),
            };
        }

        match (moves, builds) {
            (0, _) => {
                let mut set = self.moves_for_both(game, player);
                for genre in Genre::BOTH {
                    set.extend(self.builds_and_domes(game, player, genre));
                }
                set.or_lose()
            }
            (_, 0) => self.builds_after_move(game, player),
            _ => LegalActionSet::end(),
        }
    }
}

impl EnemyRules for Apollo {}
impl EnemyRules for Artemis {}
impl EnemyRules for Atlas {}
impl EnemyRules for Demeter {}
impl EnemyRules for Hephaestus {}
impl EnemyRules for Minotaur {}
impl EnemyRules for Pan {}
impl EnemyRules for Prometheus {}

/// Rules table entry for a card.
#[must_use]
pub fn rules_for(kind: CardKind) -> &'static dyn Rules {
    match kind {
        CardKind::Apollo => &Apollo,
        CardKind::Artemis => &Artemis,
        CardKind::Athena => &Athena,
        CardKind::Atlas => &Atlas,
        CardKind::Demeter => &Demeter,
        CardKind::Hephaestus => &Hephaestus,
        CardKind::Minotaur => &Minotaur,
        CardKind::Pan => &Pan,
        CardKind::Prometheus => &Prometheus,
    }
}

/// Enemy-rules table entry for a card.
#[must_use]
pub fn enemy_rules_for(kind: CardKind) -> &'static dyn EnemyRules {
    match kind {
        CardKind::Apollo => &Apollo,
        CardKind::Artemis => &Artemis,
        CardKind::Athena => &Athena,
        CardKind::Atlas => &Atlas,
        CardKind::Demeter => &Demeter,
        CardKind::Hephaestus => &Hephaestus,
        CardKind::Minotaur => &Minotaur,
        CardKind::Pan => &Pan,
        CardKind::Prometheus => &Prometheus,
    }
}
