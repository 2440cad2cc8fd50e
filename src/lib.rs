//! # santorini-core
//!
//! Rules engine and match controller for a Santorini-style board game.
//!
//! ## Design Principles
//!
//! 1. **Override Only What Differs**: The standard rules live in the default
//!    methods of `Rules`. Each power card is a unit struct that overrides a
//!    handful of them, reached through a static table keyed by `CardKind`.
//!
//! 2. **Losing Is An Action**: `LOSE` and `END` flow through the same
//!    legal-action machinery as moves and builds. Elimination and victory
//!    are state transitions, not errors.
//!
//! 3. **One Writer**: The `Controller` is the only code that mutates a
//!    `Game`. Players talk to it through a `ControllerHandle` channel.
//!
//! ## Modules
//!
//! - `core`: Board, positions, directions, actions, players, game state, RNG, configuration
//! - `cards`: Power card kinds and the card catalog
//! - `rules`: Per-card rules, enemy restrictions, legal-action composition
//! - `controller`: Phase state machine driven by player events

pub mod core;
pub mod cards;
pub mod rules;
pub mod controller;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionHistory, ActionKind, ActionRecord, Board, Cell, Color, Direction, Game, GameRng, Genre,
    LegalActionSet, MatchConfig, Player, PlayerId, Position, Worker, BOARD_SIZE, MAX_FLOORS,
};

pub use crate::cards::{Card, CardCatalog, CardKind};

pub use crate::rules::{enemy_rules_for, legal_actions, rules_for, EnemyRules, Rules, RulesError, StandardRules};

pub use crate::controller::{
    BoardSnapshot, Controller, ControllerError, ControllerHandle, MatchOutcome, Notification, Outbound, PlayerEvent,
    Recipient, WorkerView,
};
