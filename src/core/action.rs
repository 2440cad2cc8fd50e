//! Action vocabulary and the two containers built from it.
//!
//! The same `Action` value plays two roles:
//! - a candidate the current player may choose (`LegalActionSet`)
//! - a step already committed this round (`ActionHistory`)
//!
//! The containers are distinct types so the roles never mix.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::direction::Direction;
use super::player::Genre;

/// What an action does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Move,
    BuildFloor,
    BuildDome,
    End,
    Lose,
}

/// A single game action.
///
/// `worker` and `direction` are `None` for `End` and `Lose`.
/// `level_difference` is destination floor minus origin floor, where the
/// origin is the acting worker's cell at the time the action was generated.
///
/// ## Example
///
/// ```
/// use santorini_core::core::{Action, ActionKind, Direction, Genre};
///
/// let step_up = Action::movement(Genre::Female, Direction::East, 1);
/// assert_eq!(step_up.kind, ActionKind::Move);
/// assert!(step_up.is_move());
///
/// let end = Action::end();
/// assert_eq!(end.worker, None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    pub worker: Option<Genre>,
    pub direction: Option<Direction>,
    pub level_difference: i8,
}

impl Action {
    /// Move `worker` one cell towards `direction`.
    #[must_use]
    pub const fn movement(worker: Genre, direction: Direction, level_difference: i8) -> Self {
        Self::targeted(ActionKind::Move, worker, direction, level_difference)
    }

    /// Add a floor to the cell next to `worker` in `direction`.
    #[must_use]
    pub const fn build_floor(worker: Genre, direction: Direction, level_difference: i8) -> Self {
        Self::targeted(ActionKind::BuildFloor, worker, direction, level_difference)
    }

    /// Dome the cell next to `worker` in `direction`.
    #[must_use]
    pub const fn build_dome(worker: Genre, direction: Direction, level_difference: i8) -> Self {
        Self::targeted(ActionKind::BuildDome, worker, direction, level_difference)
    }

    /// Finish the round.
    #[must_use]
    pub const fn end() -> Self {
        Self::bare(ActionKind::End)
    }

    /// No legal continuation: the player is eliminated.
    #[must_use]
    pub const fn lose() -> Self {
        Self::bare(ActionKind::Lose)
    }

    const fn targeted(kind: ActionKind, worker: Genre, direction: Direction, level_difference: i8) -> Self {
        Self {
            kind,
            worker: Some(worker),
            direction: Some(direction),
            level_difference,
        }
    }

    const fn bare(kind: ActionKind) -> Self {
        Self {
            kind,
            worker: None,
            direction: None,
            level_difference: 0,
        }
    }

    #[must_use]
    pub fn is_move(&self) -> bool {
        self.kind == ActionKind::Move
    }

    /// Floor or dome.
    #[must_use]
    pub fn is_build(&self) -> bool {
        matches!(self.kind, ActionKind::BuildFloor | ActionKind::BuildDome)
    }

    /// Check `(kind, worker, direction)`, ignoring the level difference.
    #[must_use]
    pub fn matches(&self, kind: ActionKind, worker: Option<Genre>, direction: Option<Direction>) -> bool {
        self.kind == kind && self.worker == worker && self.direction == direction
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.worker, self.direction) {
            (Some(worker), Some(direction)) => write!(
                f,
                "{:?} {:?} {} ({:+})",
                self.kind, worker, direction, self.level_difference
            ),
            _ => write!(f, "{:?}", self.kind),
        }
    }
}

/// Every action the current player may choose right now.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalActionSet {
    actions: Vec<Action>,
}

impl LegalActionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The set `{LOSE}`.
    #[must_use]
    pub fn lose() -> Self {
        Self {
            actions: vec![Action::lose()],
        }
    }

    /// The set `{END}`.
    #[must_use]
    pub fn end() -> Self {
        Self {
            actions: vec![Action::end()],
        }
    }

    /// Replace an empty set with `{LOSE}`.
    #[must_use]
    pub fn or_lose(self) -> Self {
        if self.actions.is_empty() {
            Self::lose()
        } else {
            self
        }
    }

    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn extend(&mut self, other: LegalActionSet) {
        self.actions.extend(other.actions);
    }

    /// Keep only the actions matching `keep`.
    pub fn retain(&mut self, keep: impl FnMut(&Action) -> bool) {
        self.actions.retain(keep);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    #[must_use]
    pub fn contains(&self, action: &Action) -> bool {
        self.actions.contains(action)
    }

    /// Exactly one action, of `kind`.
    #[must_use]
    pub fn is_only(&self, kind: ActionKind) -> bool {
        matches!(self.actions.as_slice(), [only] if only.kind == kind)
    }

    #[must_use]
    pub fn find(&self, kind: ActionKind, worker: Option<Genre>, direction: Option<Direction>) -> Option<&Action> {
        self.actions.iter().find(|a| a.matches(kind, worker, direction))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Action] {
        &self.actions
    }
}

impl FromIterator<Action> for LegalActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for LegalActionSet {
    type Item = Action;
    type IntoIter = std::vec::IntoIter<Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.into_iter()
    }
}

/// Actions committed by one player during their current (or most recent) round.
///
/// Rounds are short, so the history stays inline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionHistory {
    actions: SmallVec<[Action; 4]>,
}

impl ActionHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Number of MOVE actions taken.
    #[must_use]
    pub fn move_count(&self) -> usize {
        self.actions.iter().filter(|a| a.is_move()).count()
    }

    /// Number of floor and dome builds taken.
    #[must_use]
    pub fn build_count(&self) -> usize {
        self.actions.iter().filter(|a| a.is_build()).count()
    }

    #[must_use]
    pub fn contains_end(&self) -> bool {
        self.actions.iter().any(|a| a.kind == ActionKind::End)
    }

    #[must_use]
    pub fn contains_lose(&self) -> bool {
        self.actions.iter().any(|a| a.kind == ActionKind::Lose)
    }

    #[must_use]
    pub fn find(&self, kind: ActionKind, worker: Option<Genre>, direction: Option<Direction>) -> Option<&Action> {
        self.actions.iter().find(|a| a.matches(kind, worker, direction))
    }

    /// The worker of the first MOVE this round.
    #[must_use]
    pub fn moved_worker(&self) -> Option<Genre> {
        self.first_of(Action::is_move).and_then(|a| a.worker)
    }

    /// The first MOVE this round.
    #[must_use]
    pub fn first_move(&self) -> Option<&Action> {
        self.first_of(Action::is_move)
    }

    /// The first floor or dome build this round.
    #[must_use]
    pub fn first_build(&self) -> Option<&Action> {
        self.first_of(Action::is_build)
    }

    /// A build was committed before any move.
    #[must_use]
    pub fn built_before_moving(&self) -> bool {
        self.actions.first().is_some_and(Action::is_build)
    }

    /// Any MOVE that climbed at least one floor.
    #[must_use]
    pub fn moved_up(&self) -> bool {
        self.actions.iter().any(|a| a.is_move() && a.level_difference > 0)
    }

    #[must_use]
    pub fn last(&self) -> Option<&Action> {
        self.actions.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    fn first_of(&self, predicate: impl Fn(&Action) -> bool) -> Option<&Action> {
        self.actions.iter().find(|a| predicate(a))
    }
}

/// A committed action in the match-wide log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Player who took the action.
    pub nickname: String,

    /// Turn number when the action was taken (starts at 1).
    pub turn: u32,

    pub action: Action,
}

impl ActionRecord {
    #[must_use]
    pub fn new(nickname: impl Into<String>, turn: u32, action: Action) -> Self {
        Self {
            nickname: nickname.into(),
            turn,
            action,
        }
    }
}
