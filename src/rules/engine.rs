//! Rules trait for power cards.
//!
//! Every default method is the standard (no power) behavior. A card
//! overrides only the methods its power changes:
//! - `possible_moves` / `possible_builds` / `possible_domes`: candidate
//!   actions for one worker
//! - `next_possible_actions`: the per-round micro state machine
//! - `do_action`: apply a chosen action and report a win
//! - `is_winning_move`: the win predicate

use thiserror::Error;
use tracing::debug;

use crate::core::{
    Action, ActionKind, Cell, Direction, Game, Genre, LegalActionSet, PlayerId, Position, MAX_FLOORS,
};

/// An action could not be applied to the board.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RulesError {
    /// The acting worker has no position yet.
    #[error("{genre:?} worker of {player} is not on the board")]
    WorkerNotPlaced { player: PlayerId, genre: Genre },

    /// A move or build without a worker or direction.
    #[error("{0:?} action is missing its worker or direction")]
    MissingTarget(ActionKind),

    /// The action points off the board.
    #[error("no cell {direction} of {from}")]
    OffBoard { from: Position, direction: Direction },
}

/// A worker standing on a cell: owner and genre.
pub type Occupant = (PlayerId, Genre);

/// Move/build rules for a card holder.
pub trait Rules: Sync {
    /// Candidate MOVE actions for one worker.
    ///
    /// Standard: adjacent, not domed, at most one floor up, unoccupied.
    fn possible_moves(&self, game: &Game, player: PlayerId, genre: Genre) -> LegalActionSet {
        scan_moves(game, player, genre, |_, _, occupant| occupant.is_none())
    }

    /// Candidate BUILD_FLOOR actions: unoccupied, undomed neighbours below three floors.
    fn possible_builds(&self, game: &Game, player: PlayerId, genre: Genre) -> LegalActionSet {
        scan_builds(game, player, genre, ActionKind::BuildFloor, |cell| cell.floors() < MAX_FLOORS)
    }

    /// Candidate BUILD_DOME actions: unoccupied, undomed neighbours at three floors.
    fn possible_domes(&self, game: &Game, player: PlayerId, genre: Genre) -> LegalActionSet {
        scan_builds(game, player, genre, ActionKind::BuildDome, |cell| cell.floors() == MAX_FLOORS)
    }

    /// What the player may do next this round, driven by their history.
    ///
    /// - no move yet: moves for both workers
    /// - moved, not built: builds and domes for the moved worker
    /// - built: `{END}`
    ///
    /// Any empty stage yields `{LOSE}`.
    fn next_possible_actions(&self, game: &Game, player: PlayerId) -> LegalActionSet {
        let history = &game.player(player).history;
        if history.contains_end() {
            return LegalActionSet::end();
        }

        match (history.move_count(), history.build_count()) {
            (0, _) => self.moves_for_both(game, player).or_lose(),
            (_, 0) => self.builds_after_move(game, player),
            _ => LegalActionSet::end(),
        }
    }

    /// Apply `action` for `player` and append it to their round history.
    ///
    /// Returns `true` when the action wins the match.
    fn do_action(&self, game: &mut Game, player: PlayerId, action: &Action) -> Result<bool, RulesError> {
        let won = match action.kind {
            ActionKind::Move => self.apply_move(game, player, action)?,
            ActionKind::BuildFloor => {
                let (_, target) = resolve_target(game, player, action)?;
                game.board_mut().cell_mut(target).add_floor();
                false
            }
            ActionKind::BuildDome => {
                let (_, target) = resolve_target(game, player, action)?;
                game.board_mut().cell_mut(target).place_dome();
                false
            }
            ActionKind::End | ActionKind::Lose => false,
        };

        game.player_mut(player).history.push(*action);
        debug!(%player, %action, won, "action applied");
        Ok(won)
    }

    /// Relocate the moving worker; returns the win predicate for the step.
    fn apply_move(&self, game: &mut Game, player: PlayerId, action: &Action) -> Result<bool, RulesError> {
        let (origin, target) = resolve_target(game, player, action)?;
        let genre = action.worker.ok_or(RulesError::MissingTarget(action.kind))?;
        game.place_worker(player, genre, target);
        Ok(self.climb_wins(game, origin, target))
    }

    /// Win predicate for a move between two floor heights.
    ///
    /// Standard: stepping from the second floor onto the third.
    fn is_winning_move(&self, from_floor: u8, to_floor: u8) -> bool {
        from_floor == MAX_FLOORS - 1 && to_floor == MAX_FLOORS
    }

    // === Building blocks for overrides ===

    /// `possible_moves` for every placed worker.
    fn moves_for_both(&self, game: &Game, player: PlayerId) -> LegalActionSet {
        let mut set = LegalActionSet::new();
        for genre in Genre::BOTH {
            set.extend(self.possible_moves(game, player, genre));
        }
        set
    }

    /// Builds followed by domes for one worker.
    fn builds_and_domes(&self, game: &Game, player: PlayerId, genre: Genre) -> LegalActionSet {
        let mut set = self.possible_builds(game, player, genre);
        set.extend(self.possible_domes(game, player, genre));
        set
    }

    /// Builds and domes for the worker that moved this round, or `{LOSE}`.
    fn builds_after_move(&self, game: &Game, player: PlayerId) -> LegalActionSet {
        match game.player(player).history.moved_worker() {
            Some(genre) => self.builds_and_domes(game, player, genre).or_lose(),
            None => LegalActionSet::lose(),
        }
    }

    /// Evaluate `is_winning_move` for a step already applied to `game`.
    fn climb_wins(&self, game: &Game, origin: Position, target: Position) -> bool {
        let board = game.board();
        self.is_winning_move(board.cell(origin).floors(), board.cell(target).floors())
    }
}

/// The standard rules with no power.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardRules;

impl Rules for StandardRules {}

/// Origin and target cells of a targeted action.
pub fn resolve_target(game: &Game, player: PlayerId, action: &Action) -> Result<(Position, Position), RulesError> {
    let (genre, direction) = match (action.worker, action.direction) {
        (Some(genre), Some(direction)) => (genre, direction),
        _ => return Err(RulesError::MissingTarget(action.kind)),
    };
    let origin = game
        .worker_position(player, genre)
        .ok_or(RulesError::WorkerNotPlaced { player, genre })?;
    let target = origin
        .step(direction)
        .ok_or(RulesError::OffBoard { from: origin, direction })?;
    Ok((origin, target))
}

/// Enumerate moves for one worker.
///
/// Skips off-board, domed, and too-high cells; `admit` decides on the rest
/// given the target, the direction, and whoever stands there.
pub fn scan_moves<F>(game: &Game, player: PlayerId, genre: Genre, admit: F) -> LegalActionSet
where
    F: Fn(Position, Direction, Option<Occupant>) -> bool,
{
    let Some(origin) = game.worker_position(player, genre) else {
        return LegalActionSet::new();
    };
    let board = game.board();

    Direction::ALL
        .into_iter()
        .filter_map(|dir| origin.step(dir).map(|target| (dir, target)))
        .filter(|&(_, target)| !board.cell(target).has_dome())
        .filter_map(|(dir, target)| {
            let diff = board.level_difference(origin, target);
            (diff <= 1 && admit(target, dir, game.occupant(target)))
                .then(|| Action::movement(genre, dir, diff))
        })
        .collect()
}

/// Enumerate builds of `kind` for one worker.
///
/// Skips off-board, domed, and occupied cells; `accept` decides on the rest.
pub fn scan_builds<F>(game: &Game, player: PlayerId, genre: Genre, kind: ActionKind, accept: F) -> LegalActionSet
where
    F: Fn(&Cell) -> bool,
{
    let Some(origin) = game.worker_position(player, genre) else {
        return LegalActionSet::new();
    };
    let board = game.board();

    Direction::ALL
        .into_iter()
        .filter_map(|dir| origin.step(dir).map(|target| (dir, board.cell(target))))
        .filter(|(_, cell)| !cell.has_dome() && !game.is_occupied(cell.position()) && accept(cell))
        .map(|(dir, cell)| {
            let diff = board.level_difference(origin, cell.position());
            match kind {
                ActionKind::BuildDome => Action::build_dome(genre, dir, diff),
                _ => Action::build_floor(genre, dir, diff),
            }
        })
        .collect()
}
